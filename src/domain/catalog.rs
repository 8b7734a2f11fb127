//! Ordered line storage.
//!
//! [`LineCatalog`] mirrors the list the host is currently displaying. It keeps
//! insertion order, never deduplicates, and is replaced wholesale whenever an
//! outbound message carries a new `lines` array.

use super::Line;

/// The ordered set of lines the host currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineCatalog {
    lines: Vec<Line>,
}

impl LineCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the catalog holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterates over the lines in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    /// Returns the lines as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Line] {
        &self.lines
    }

    /// Appends a line at the end.
    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Replaces every line at once.
    pub fn replace(&mut self, lines: Vec<Line>) {
        self.lines = lines;
    }

    /// Removes the first line whose identifier matches.
    ///
    /// Returns the removed line, or `None` (catalog untouched) when nothing
    /// matches.
    pub fn remove(&mut self, identifier: &str) -> Option<Line> {
        let index = self.lines.iter().position(|l| l.identifier() == identifier)?;
        Some(self.lines.remove(index))
    }

    /// Resolves an identifier to exactly one line.
    ///
    /// Returns `None` when no line or more than one line carries the
    /// identifier.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> Option<&Line> {
        let mut matches = self.lines.iter().filter(|l| l.identifier() == identifier);
        let first = matches.next()?;
        if matches.next().is_some() {
            tracing::debug!(identifier = %identifier, "identifier is ambiguous");
            return None;
        }
        Some(first)
    }

    /// Returns a copy of the lines for serialization.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Line> {
        self.lines.clone()
    }
}

impl From<Vec<Line>> for LineCatalog {
    fn from(lines: Vec<Line>) -> Self {
        Self { lines }
    }
}

impl FromIterator<Line> for LineCatalog {
    fn from_iter<I: IntoIterator<Item = Line>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LineCatalog {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
