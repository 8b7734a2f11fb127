//! Name tables available to expressions.
//!
//! A [`Scope`] is a fixed, read-only set of constants and functions. Nothing
//! outside the table can be reached from an expression.

use super::value::Number;
use super::EvalError;
use std::f64::consts;

type Call = fn(&[Number]) -> Result<Number, EvalError>;

/// Accepted argument counts of a function.
#[derive(Debug, Clone, Copy)]
enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::Range(min, max) => count >= min && count <= max,
            Self::AtLeast(min) => count >= min,
        }
    }

    fn describe(self) -> String {
        match self {
            Self::Exact(n) => n.to_string(),
            Self::Range(min, max) => format!("{min} to {max}"),
            Self::AtLeast(min) => format!("at least {min}"),
        }
    }
}

#[derive(Clone, Copy)]
struct Function {
    name: &'static str,
    arity: Arity,
    call: Call,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Constants and functions an expression may reference.
#[derive(Debug, Clone, Copy)]
pub struct Scope {
    constants: &'static [(&'static str, f64)],
    functions: &'static [Function],
}

/// A resolved name.
pub(crate) enum Binding {
    /// A numeric constant.
    Constant(Number),
    /// A callable function.
    Function,
}

impl Scope {
    /// The `math` namespace: trigonometry, logarithms, rounding and friends.
    #[must_use]
    pub const fn math() -> Self {
        Self {
            constants: MATH_CONSTANTS,
            functions: MATH_FUNCTIONS,
        }
    }

    /// Small builtin set: `abs round min max pow int float`.
    #[must_use]
    pub const fn builtins() -> Self {
        Self {
            constants: &[],
            functions: BUILTIN_FUNCTIONS,
        }
    }

    /// Looks up a bare name.
    pub(crate) fn lookup(&self, name: &str) -> Option<Binding> {
        if let Some((_, value)) = self.constants.iter().find(|(n, _)| *n == name) {
            return Some(Binding::Constant(Number::Float(*value)));
        }
        self.functions
            .iter()
            .any(|f| f.name == name)
            .then_some(Binding::Function)
    }

    /// Calls a function by name.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownName`], [`EvalError::NotCallable`],
    /// [`EvalError::Arity`], or whatever the function itself reports.
    pub fn call(&self, name: &str, args: &[Number]) -> Result<Number, EvalError> {
        let Some(function) = self.functions.iter().find(|f| f.name == name) else {
            return Err(if self.constants.iter().any(|(n, _)| *n == name) {
                EvalError::NotCallable(name.to_string())
            } else {
                EvalError::UnknownName(name.to_string())
            });
        };
        if !function.arity.accepts(args.len()) {
            return Err(EvalError::Arity {
                name: name.to_string(),
                expected: function.arity.describe(),
                found: args.len(),
            });
        }
        (function.call)(args)
    }
}

const MATH_CONSTANTS: &[(&str, f64)] = &[
    ("pi", consts::PI),
    ("e", consts::E),
    ("tau", consts::TAU),
    ("inf", f64::INFINITY),
    ("nan", f64::NAN),
];

macro_rules! float_fn {
    ($name:literal, $f:expr) => {
        Function {
            name: $name,
            arity: Arity::Exact(1),
            call: |args| Ok(Number::Float(($f)(args[0].as_f64()))),
        }
    };
}

const MATH_FUNCTIONS: &[Function] = &[
    Function {
        name: "sqrt",
        arity: Arity::Exact(1),
        call: |args| {
            let x = args[0].as_f64();
            if x < 0.0 {
                return Err(EvalError::Domain("sqrt of a negative number".into()));
            }
            Ok(Number::Float(x.sqrt()))
        },
    },
    Function {
        name: "exp",
        arity: Arity::Exact(1),
        call: |args| {
            let result = args[0].as_f64().exp();
            if result.is_infinite() && args[0].as_f64().is_finite() {
                return Err(EvalError::Overflow);
            }
            Ok(Number::Float(result))
        },
    },
    Function {
        name: "log",
        arity: Arity::Range(1, 2),
        call: |args| {
            let x = positive(args[0], "log")?;
            match args.get(1) {
                None => Ok(Number::Float(x.ln())),
                Some(base) => {
                    let base = positive(*base, "log")?;
                    if base == 1.0 {
                        return Err(EvalError::ZeroDivision);
                    }
                    Ok(Number::Float(x.ln() / base.ln()))
                }
            }
        },
    },
    Function {
        name: "log2",
        arity: Arity::Exact(1),
        call: |args| Ok(Number::Float(positive(args[0], "log2")?.log2())),
    },
    Function {
        name: "log10",
        arity: Arity::Exact(1),
        call: |args| Ok(Number::Float(positive(args[0], "log10")?.log10())),
    },
    float_fn!("sin", f64::sin),
    float_fn!("cos", f64::cos),
    float_fn!("tan", f64::tan),
    Function {
        name: "asin",
        arity: Arity::Exact(1),
        call: |args| Ok(Number::Float(unit_interval(args[0], "asin")?.asin())),
    },
    Function {
        name: "acos",
        arity: Arity::Exact(1),
        call: |args| Ok(Number::Float(unit_interval(args[0], "acos")?.acos())),
    },
    float_fn!("atan", f64::atan),
    Function {
        name: "atan2",
        arity: Arity::Exact(2),
        call: |args| Ok(Number::Float(args[0].as_f64().atan2(args[1].as_f64()))),
    },
    float_fn!("sinh", f64::sinh),
    float_fn!("cosh", f64::cosh),
    float_fn!("tanh", f64::tanh),
    Function {
        name: "floor",
        arity: Arity::Exact(1),
        call: |args| integral(args[0], f64::floor),
    },
    Function {
        name: "ceil",
        arity: Arity::Exact(1),
        call: |args| integral(args[0], f64::ceil),
    },
    Function {
        name: "trunc",
        arity: Arity::Exact(1),
        call: |args| integral(args[0], f64::trunc),
    },
    float_fn!("fabs", f64::abs),
    float_fn!("degrees", f64::to_degrees),
    float_fn!("radians", f64::to_radians),
    Function {
        name: "factorial",
        arity: Arity::Exact(1),
        call: |args| {
            let Number::Int(n) = args[0] else {
                return Err(EvalError::Type("factorial() only accepts integers".into()));
            };
            if n < 0 {
                return Err(EvalError::Domain("factorial() of a negative number".into()));
            }
            (2..=n)
                .try_fold(1_i64, |acc, k| acc.checked_mul(k))
                .map(Number::Int)
                .ok_or(EvalError::Overflow)
        },
    },
    Function {
        name: "pow",
        arity: Arity::Exact(2),
        call: |args| Number::Float(args[0].as_f64()).pow(Number::Float(args[1].as_f64())),
    },
    Function {
        name: "hypot",
        arity: Arity::AtLeast(0),
        call: |args| {
            let sum: f64 = args.iter().map(|a| a.as_f64().powi(2)).sum();
            Ok(Number::Float(sum.sqrt()))
        },
    },
    Function {
        name: "gcd",
        arity: Arity::AtLeast(0),
        call: |args| {
            args.iter().try_fold(Number::Int(0), |acc, arg| match (acc, *arg) {
                (Number::Int(a), Number::Int(b)) => gcd(a, b),
                _ => Err(EvalError::Type("gcd() only accepts integers".into())),
            })
        },
    },
];

const BUILTIN_FUNCTIONS: &[Function] = &[
    Function {
        name: "abs",
        arity: Arity::Exact(1),
        call: |args| match args[0] {
            Number::Int(i) => i.checked_abs().map(Number::Int).ok_or(EvalError::Overflow),
            Number::Float(f) => Ok(Number::Float(f.abs())),
        },
    },
    Function {
        name: "round",
        arity: Arity::Range(1, 2),
        call: |args| match (args[0], args.get(1)) {
            (Number::Int(i), _) => Ok(Number::Int(i)),
            (Number::Float(f), None) => Number::float_to_int(f.round_ties_even()),
            (Number::Float(f), Some(Number::Int(digits))) => {
                let digits = i32::try_from(*digits).map_err(|_| EvalError::Overflow)?;
                let scale = 10_f64.powi(digits);
                Ok(Number::Float((f * scale).round_ties_even() / scale))
            }
            (Number::Float(_), Some(Number::Float(_))) => {
                Err(EvalError::Type("round() digits must be an integer".into()))
            }
        },
    },
    Function {
        name: "min",
        arity: Arity::AtLeast(2),
        call: |args| Ok(extreme(args, std::cmp::Ordering::Less)),
    },
    Function {
        name: "max",
        arity: Arity::AtLeast(2),
        call: |args| Ok(extreme(args, std::cmp::Ordering::Greater)),
    },
    Function {
        name: "pow",
        arity: Arity::Exact(2),
        call: |args| args[0].pow(args[1]),
    },
    Function {
        name: "int",
        arity: Arity::Exact(1),
        call: |args| match args[0] {
            Number::Int(i) => Ok(Number::Int(i)),
            Number::Float(f) => Number::float_to_int(f.trunc()),
        },
    },
    Function {
        name: "float",
        arity: Arity::Exact(1),
        call: |args| Ok(Number::Float(args[0].as_f64())),
    },
];

fn positive(value: Number, name: &str) -> Result<f64, EvalError> {
    let x = value.as_f64();
    if x <= 0.0 {
        return Err(EvalError::Domain(format!("{name}() of a non-positive number")));
    }
    Ok(x)
}

fn unit_interval(value: Number, name: &str) -> Result<f64, EvalError> {
    let x = value.as_f64();
    if !(-1.0..=1.0).contains(&x) {
        return Err(EvalError::Domain(format!("{name}() argument outside [-1, 1]")));
    }
    Ok(x)
}

fn integral(value: Number, round: fn(f64) -> f64) -> Result<Number, EvalError> {
    match value {
        Number::Int(i) => Ok(Number::Int(i)),
        Number::Float(f) => Number::float_to_int(round(f)),
    }
}

fn extreme(args: &[Number], wanted: std::cmp::Ordering) -> Number {
    args.iter()
        .copied()
        .reduce(|best, next| if next.compare(best) == wanted { next } else { best })
        .unwrap_or(Number::Int(0))
}

fn gcd(a: i64, b: i64) -> Result<Number, EvalError> {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    i64::try_from(a).map(Number::Int).map_err(|_| EvalError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn math_scope_resolves_constants_and_functions() {
        let scope = Scope::math();
        assert!(matches!(scope.lookup("pi"), Some(Binding::Constant(Number::Float(p))) if p == consts::PI));
        assert!(matches!(scope.lookup("sqrt"), Some(Binding::Function)));
        assert!(scope.lookup("open").is_none());
    }

    #[test]
    fn arity_is_checked() {
        let scope = Scope::math();
        assert!(matches!(
            scope.call("sqrt", &[]),
            Err(EvalError::Arity { found: 0, .. })
        ));
        assert!(matches!(scope.call("pi", &[]), Err(EvalError::NotCallable(_))));
        assert!(matches!(scope.call("system", &[]), Err(EvalError::UnknownName(_))));
    }

    #[test]
    fn rounding_functions_return_integers() {
        let scope = Scope::math();
        assert_eq!(scope.call("floor", &[Number::Float(-1.5)]).unwrap(), Number::Int(-2));
        assert_eq!(scope.call("ceil", &[Number::Float(1.2)]).unwrap(), Number::Int(2));
        assert_eq!(scope.call("factorial", &[Number::Int(5)]).unwrap(), Number::Int(120));
        assert_eq!(
            scope.call("gcd", &[Number::Int(12), Number::Int(-18)]).unwrap(),
            Number::Int(6)
        );
    }

    #[test]
    fn builtins_round_half_to_even() {
        let scope = Scope::builtins();
        assert_eq!(scope.call("round", &[Number::Float(2.5)]).unwrap(), Number::Int(2));
        assert_eq!(scope.call("round", &[Number::Float(3.5)]).unwrap(), Number::Int(4));
        assert_eq!(
            scope.call("max", &[Number::Int(1), Number::Float(2.5), Number::Int(2)]).unwrap(),
            Number::Float(2.5)
        );
        assert!(scope.lookup("sqrt").is_none());
    }

    #[test]
    fn domain_errors() {
        let scope = Scope::math();
        assert!(matches!(scope.call("sqrt", &[Number::Int(-1)]), Err(EvalError::Domain(_))));
        assert!(matches!(scope.call("log", &[Number::Int(0)]), Err(EvalError::Domain(_))));
        assert!(matches!(scope.call("asin", &[Number::Int(2)]), Err(EvalError::Domain(_))));
    }
}
