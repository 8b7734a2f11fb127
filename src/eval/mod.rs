//! Safe arithmetic evaluation for the calculator modes.
//!
//! Expressions are tokenized, parsed into a small tree and walked against a
//! fixed [`Scope`]. There is no way to reach anything beyond the numbers,
//! operators and names of that scope.
//!
//! ```text
//! "sqrt(16) + 1"
//!       │ lexer::tokenize
//!       ▼
//! [Ident(sqrt) LParen Number(16) RParen Plus Number(1)]
//!       │ parser::parse
//!       ▼
//! Binary(Add, Call(sqrt, [16]), 1)
//!       │ Arithmetic::walk
//!       ▼
//! Float(5.0)  ──Display──▶ "5.0"
//! ```
//!
//! Two flavours exist. [`Arithmetic::math`] treats `^` as power and exposes
//! the math namespace; [`Arithmetic::builtins`] treats `^` as integer xor and
//! exposes a handful of builtin functions.

mod functions;
mod lexer;
mod parser;
mod value;

pub use functions::Scope;
pub use lexer::Caret;
pub use value::Number;

use functions::Binding;
use parser::{BinaryOp, Expr, UnaryOp};
use thiserror::Error;

/// Reasons an expression cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The text is not a well-formed expression.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Nothing to evaluate.
    #[error("empty expression")]
    Empty,

    /// A name outside the scope.
    #[error("name `{0}` is not defined")]
    UnknownName(String),

    /// A constant was used as a function.
    #[error("`{0}` is not callable")]
    NotCallable(String),

    /// A function was used without calling it.
    #[error("`{0}` is a function, not a number")]
    NotAValue(String),

    /// Wrong number of arguments.
    #[error("{name}() takes {expected} argument(s), {found} given")]
    Arity {
        /// Function name.
        name: String,
        /// Accepted argument count.
        expected: String,
        /// Supplied argument count.
        found: usize,
    },

    #[error("division by zero")]
    ZeroDivision,

    /// Argument outside the function's domain.
    #[error("math domain error: {0}")]
    Domain(String),

    #[error("numeric overflow")]
    Overflow,

    /// Operand of the wrong kind, e.g. xor on a float.
    #[error("type error: {0}")]
    Type(String),
}

/// Anything that turns an expression string into a number.
pub trait Evaluator {
    /// Evaluates `expression`.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] describing why the expression has no value.
    fn evaluate(&self, expression: &str) -> Result<Number, EvalError>;
}

/// Tree-walking evaluator over a fixed [`Scope`].
#[derive(Debug, Clone, Copy)]
pub struct Arithmetic {
    caret: Caret,
    scope: Scope,
}

impl Arithmetic {
    /// `^` as power, math functions and constants.
    #[must_use]
    pub const fn math() -> Self {
        Self {
            caret: Caret::Power,
            scope: Scope::math(),
        }
    }

    /// `^` as xor, builtin functions only.
    #[must_use]
    pub const fn builtins() -> Self {
        Self {
            caret: Caret::Xor,
            scope: Scope::builtins(),
        }
    }

    fn walk(&self, expr: &Expr) -> Result<Number, EvalError> {
        match expr {
            Expr::Number(n) => Ok(*n),
            Expr::Name(name) => match self.scope.lookup(name) {
                Some(Binding::Constant(value)) => Ok(value),
                Some(Binding::Function) => Err(EvalError::NotAValue(name.clone())),
                None => Err(EvalError::UnknownName(name.clone())),
            },
            Expr::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.walk(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.scope.call(name, &args)
            }
            Expr::Unary { op, operand } => {
                let value = self.walk(operand)?;
                match op {
                    UnaryOp::Plus => Ok(value),
                    UnaryOp::Neg => value.neg(),
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let (lhs, rhs) = (self.walk(lhs)?, self.walk(rhs)?);
                match op {
                    BinaryOp::Add => lhs.add(rhs),
                    BinaryOp::Sub => lhs.sub(rhs),
                    BinaryOp::Mul => lhs.mul(rhs),
                    BinaryOp::Div => lhs.div(rhs),
                    BinaryOp::FloorDiv => lhs.floor_div(rhs),
                    BinaryOp::Rem => lhs.rem(rhs),
                    BinaryOp::Pow => lhs.pow(rhs),
                    BinaryOp::Xor => lhs.xor(rhs),
                }
            }
        }
    }
}

impl Evaluator for Arithmetic {
    fn evaluate(&self, expression: &str) -> Result<Number, EvalError> {
        let tokens = lexer::tokenize(expression, self.caret)?;
        let tree = parser::parse(&tokens)?;
        self.walk(&tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn math(source: &str) -> String {
        Arithmetic::math().evaluate(source).unwrap().to_string()
    }

    fn builtins(source: &str) -> String {
        Arithmetic::builtins().evaluate(source).unwrap().to_string()
    }

    #[test]
    fn evaluates_basic_arithmetic() {
        assert_eq!(math("2 + 2"), "4");
        assert_eq!(math("7 / 2"), "3.5");
        assert_eq!(math("8 / 2"), "4.0");
        assert_eq!(math("2 ** 10"), "1024");
        assert_eq!(math("-2 ** 2"), "-4");
        assert_eq!(math("(1 + 2) * 3"), "9");
    }

    #[test]
    fn math_scope_functions() {
        assert_eq!(math("sqrt(16)"), "4.0");
        assert_eq!(math("2 ^ 3"), "8");
        assert_eq!(math("floor(pi)"), "3");
        assert_eq!(math("log2(8)"), "3.0");
    }

    #[test]
    fn builtins_treat_caret_as_xor() {
        assert_eq!(builtins("2 ^ 3"), "1");
        assert_eq!(builtins("abs(-3)"), "3");
        assert_eq!(builtins("round(2.5)"), "2");
        assert_eq!(builtins("max(1, 5, 3)"), "5");
    }

    #[test]
    fn reports_errors() {
        let calc = Arithmetic::math();
        assert_eq!(calc.evaluate("1 / 0"), Err(EvalError::ZeroDivision));
        assert_eq!(calc.evaluate(""), Err(EvalError::Empty));
        assert_eq!(calc.evaluate("sqrt"), Err(EvalError::NotAValue("sqrt".into())));
        assert_eq!(calc.evaluate("open(1)"), Err(EvalError::UnknownName("open".into())));
        assert!(matches!(calc.evaluate("2 +"), Err(EvalError::Syntax(_))));

        let simple = Arithmetic::builtins();
        assert_eq!(simple.evaluate("pi"), Err(EvalError::UnknownName("pi".into())));
        assert!(matches!(simple.evaluate("1.5 ^ 2"), Err(EvalError::Type(_))));
    }

    #[test]
    fn long_flat_chains() {
        let near_limit = format!("{}1", "1+".repeat(511));
        assert_eq!(builtins(&near_limit), "512");

        let chain = format!("{}1", "1+".repeat(5000));
        assert!(matches!(Arithmetic::builtins().evaluate(&chain), Err(EvalError::Syntax(_))));
    }
}
