//! Newline-delimited JSON transport.
//!
//! [`Transport`] owns both protocol streams. Reading blocks until a full line
//! is available; writing serializes one [`Response`] per line and flushes
//! before returning so the host never waits on a buffered message.

use crate::domain::Result;
use crate::protocol::{DecodeError, Event, Response};
use std::io::{BufRead, Write};

/// Outcome of reading one inbound line.
#[derive(Debug)]
pub enum Inbound {
    /// A decoded event.
    Event(Event),
    /// A line that could not be decoded.
    Invalid(DecodeError),
    /// The host closed the inbound stream.
    Closed,
}

/// Reader/writer pair speaking the line protocol.
pub struct Transport<R, W> {
    reader: R,
    writer: W,
    buffer: Vec<u8>,
}

impl<R: BufRead, W: Write> Transport<R, W> {
    /// Wraps an inbound reader and an outbound writer.
    pub const fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            buffer: Vec::new(),
        }
    }

    /// Reads and decodes the next inbound line.
    ///
    /// Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error only when the inbound stream itself fails. Decoding
    /// failures, invalid UTF-8 included, are reported as [`Inbound::Invalid`].
    pub fn read_event(&mut self) -> Result<Inbound> {
        loop {
            self.buffer.clear();
            if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
                tracing::debug!("inbound stream closed");
                return Ok(Inbound::Closed);
            }

            let line = match std::str::from_utf8(&self.buffer) {
                Ok(text) => text.trim(),
                Err(e) => return Ok(Inbound::Invalid(e.into())),
            };
            if line.is_empty() {
                continue;
            }

            tracing::trace!(line = %line, "inbound line");
            return Ok(match Event::decode(line) {
                Ok(event) => Inbound::Event(event),
                Err(e) => Inbound::Invalid(e),
            });
        }
    }

    /// Writes one response as a JSON line and flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write/flush fails.
    pub fn write_response(&mut self, response: &Response) -> Result<()> {
        let json = serde_json::to_string(response)?;
        tracing::trace!(line = %json, "outbound line");
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Consumes the transport and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R, W> std::fmt::Debug for Transport<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport").finish_non_exhaustive()
    }
}
