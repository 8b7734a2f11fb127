//! Numeric values and their arithmetic.
//!
//! Integer arithmetic stays integral and reports overflow instead of
//! wrapping; `/` always produces a float; `//` and `%` floor toward negative
//! infinity. Rendering follows the familiar calculator conventions: `4`,
//! `3.5`, `4.0`, `1e+20`.

use super::EvalError;
use std::cmp::Ordering;
use std::fmt;

/// Result of an arithmetic evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Exact integer.
    Int(i64),
    /// Floating point value.
    Float(f64),
}

impl Number {
    /// Value as a float.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    pub(crate) fn neg(self) -> Result<Self, EvalError> {
        match self {
            Self::Int(i) => i.checked_neg().map(Self::Int).ok_or(EvalError::Overflow),
            Self::Float(f) => Ok(Self::Float(-f)),
        }
    }

    pub(crate) fn add(self, rhs: Self) -> Result<Self, EvalError> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a.checked_add(b).map(Self::Int).ok_or(EvalError::Overflow),
            (a, b) => Ok(Self::Float(a.as_f64() + b.as_f64())),
        }
    }

    pub(crate) fn sub(self, rhs: Self) -> Result<Self, EvalError> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a.checked_sub(b).map(Self::Int).ok_or(EvalError::Overflow),
            (a, b) => Ok(Self::Float(a.as_f64() - b.as_f64())),
        }
    }

    pub(crate) fn mul(self, rhs: Self) -> Result<Self, EvalError> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a.checked_mul(b).map(Self::Int).ok_or(EvalError::Overflow),
            (a, b) => Ok(Self::Float(a.as_f64() * b.as_f64())),
        }
    }

    pub(crate) fn div(self, rhs: Self) -> Result<Self, EvalError> {
        let divisor = rhs.as_f64();
        if divisor == 0.0 {
            return Err(EvalError::ZeroDivision);
        }
        Ok(Self::Float(self.as_f64() / divisor))
    }

    pub(crate) fn floor_div(self, rhs: Self) -> Result<Self, EvalError> {
        match (self, rhs) {
            (Self::Int(_), Self::Int(0)) => Err(EvalError::ZeroDivision),
            (Self::Int(a), Self::Int(b)) => {
                let q = a.checked_div(b).ok_or(EvalError::Overflow)?;
                if a % b != 0 && ((a < 0) != (b < 0)) {
                    Ok(Self::Int(q - 1))
                } else {
                    Ok(Self::Int(q))
                }
            }
            (a, b) => {
                let divisor = b.as_f64();
                if divisor == 0.0 {
                    return Err(EvalError::ZeroDivision);
                }
                Ok(Self::Float((a.as_f64() / divisor).floor()))
            }
        }
    }

    pub(crate) fn rem(self, rhs: Self) -> Result<Self, EvalError> {
        match (self, rhs) {
            (Self::Int(_), Self::Int(0)) => Err(EvalError::ZeroDivision),
            (Self::Int(a), Self::Int(b)) => {
                let r = a.checked_rem(b).ok_or(EvalError::Overflow)?;
                if r != 0 && ((r < 0) != (b < 0)) {
                    Ok(Self::Int(r + b))
                } else {
                    Ok(Self::Int(r))
                }
            }
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                if b == 0.0 {
                    return Err(EvalError::ZeroDivision);
                }
                let r = a % b;
                if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                    Ok(Self::Float(r + b))
                } else {
                    Ok(Self::Float(r))
                }
            }
        }
    }

    pub(crate) fn pow(self, rhs: Self) -> Result<Self, EvalError> {
        match (self, rhs) {
            (Self::Int(base), Self::Int(exp)) if exp >= 0 => {
                let exp = u32::try_from(exp).map_err(|_| EvalError::Overflow)?;
                base.checked_pow(exp).map(Self::Int).ok_or(EvalError::Overflow)
            }
            (base, exp) => {
                let (b, e) = (base.as_f64(), exp.as_f64());
                if b == 0.0 && e < 0.0 {
                    return Err(EvalError::ZeroDivision);
                }
                if b < 0.0 && e.fract() != 0.0 {
                    return Err(EvalError::Domain("fractional power of a negative number".into()));
                }
                let result = b.powf(e);
                if result.is_infinite() && b.is_finite() && e.is_finite() {
                    return Err(EvalError::Overflow);
                }
                Ok(Self::Float(result))
            }
        }
    }

    pub(crate) fn xor(self, rhs: Self) -> Result<Self, EvalError> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => Ok(Self::Int(a ^ b)),
            _ => Err(EvalError::Type("unsupported operand type for ^: float".into())),
        }
    }

    pub(crate) fn compare(self, rhs: Self) -> Ordering {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a.cmp(&b),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()).unwrap_or(Ordering::Equal),
        }
    }

    /// Converts an integral float to an integer, failing on NaN/infinity or
    /// out-of-range values.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub(crate) fn float_to_int(value: f64) -> Result<Self, EvalError> {
        if value.is_nan() {
            return Err(EvalError::Domain("cannot convert NaN to integer".into()));
        }
        if value.is_infinite() || value < i64::MIN as f64 || value >= i64::MAX as f64 {
            return Err(EvalError::Overflow);
        }
        Ok(Self::Int(value as i64))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => f.write_str(&format_float(x)),
        }
    }
}

fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let scientific = format!("{x:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let plain = format!("{x}");
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_like_a_calculator() {
        assert_eq!(Number::Int(4).to_string(), "4");
        assert_eq!(Number::Float(4.0).to_string(), "4.0");
        assert_eq!(Number::Float(3.5).to_string(), "3.5");
        assert_eq!(Number::Float(0.1 + 0.2).to_string(), "0.30000000000000004");
        assert_eq!(Number::Float(1e20).to_string(), "1e+20");
        assert_eq!(Number::Float(1.5e-5).to_string(), "1.5e-05");
        assert_eq!(Number::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Number::Float(f64::INFINITY).to_string(), "inf");
    }

    #[test]
    fn floor_division_and_modulo_round_down() {
        assert_eq!(Number::Int(-7).floor_div(Number::Int(2)).unwrap(), Number::Int(-4));
        assert_eq!(Number::Int(7).floor_div(Number::Int(2)).unwrap(), Number::Int(3));
        assert_eq!(Number::Int(-7).rem(Number::Int(3)).unwrap(), Number::Int(2));
        assert_eq!(Number::Int(7).rem(Number::Int(-3)).unwrap(), Number::Int(-2));
        assert_eq!(Number::Float(7.5).floor_div(Number::Int(2)).unwrap(), Number::Float(3.0));
    }

    #[test]
    fn integer_overflow_is_an_error() {
        assert!(matches!(
            Number::Int(i64::MAX).add(Number::Int(1)),
            Err(EvalError::Overflow)
        ));
        assert!(matches!(
            Number::Int(10).pow(Number::Int(100)),
            Err(EvalError::Overflow)
        ));
    }

    #[test]
    fn negative_exponent_yields_float() {
        assert_eq!(Number::Int(2).pow(Number::Int(-1)).unwrap(), Number::Float(0.5));
        assert!(matches!(
            Number::Int(0).pow(Number::Int(-1)),
            Err(EvalError::ZeroDivision)
        ));
    }

    #[test]
    fn division_by_zero() {
        assert!(matches!(Number::Int(1).div(Number::Int(0)), Err(EvalError::ZeroDivision)));
        assert!(matches!(Number::Int(1).rem(Number::Float(0.0)), Err(EvalError::ZeroDivision)));
    }
}
