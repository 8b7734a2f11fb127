//! Recursive-descent parser producing an expression tree.
//!
//! Precedence, loosest first: `^` (xor), `+ -`, `* / // %`, unary `+ -`,
//! `**`. Power is right-associative and binds tighter than a unary operator
//! on its left, so `-2**2` is `-4` and `2**-1` is `0.5`.

use super::lexer::Token;
use super::EvalError;
use super::value::Number;

const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Rem,
    Pow,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Number),
    Name(String),
    Call { name: String, args: Vec<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr> },
}

pub fn parse(tokens: &[Token]) -> Result<Expr, EvalError> {
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    let expr = parser.xor()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(EvalError::Syntax(format!("unexpected `{}`", token.describe()))),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::Syntax("expression nested too deeply".into()));
        }
        Ok(())
    }

    fn xor(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.additive()?;
        while self.eat(&Token::Caret) {
            let rhs = self.additive()?;
            lhs = binary(BinaryOp::Xor, lhs, rhs);
        }
        Ok(lhs)
    }

    fn additive(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::DoubleSlash) => BinaryOp::FloorDiv,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn factor(&mut self) -> Result<Expr, EvalError> {
        let op = match self.peek() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Neg,
            _ => return self.power(),
        };
        self.pos += 1;
        self.enter()?;
        let operand = self.factor()?;
        self.depth -= 1;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn power(&mut self) -> Result<Expr, EvalError> {
        let base = self.primary()?;
        if self.eat(&Token::DoubleStar) {
            self.enter()?;
            let exponent = self.factor()?;
            self.depth -= 1;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        match self.next().cloned() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Ident(name)) => {
                if self.eat(&Token::LParen) {
                    let args = self.arguments()?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Name(name))
                }
            }
            Some(Token::LParen) => {
                self.enter()?;
                let inner = self.xor()?;
                self.depth -= 1;
                if !self.eat(&Token::RParen) {
                    return Err(EvalError::Syntax("missing `)`".into()));
                }
                Ok(inner)
            }
            Some(token) => Err(EvalError::Syntax(format!("unexpected `{}`", token.describe()))),
            None => Err(EvalError::Syntax("unexpected end of expression".into())),
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, EvalError> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        self.enter()?;
        loop {
            args.push(self.xor()?);
            if self.eat(&Token::RParen) {
                break;
            }
            if !self.eat(&Token::Comma) {
                return Err(EvalError::Syntax("expected `,` or `)`".into()));
            }
        }
        self.depth -= 1;
        Ok(args)
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

#[cfg(test)]
mod tests {
    use super::super::lexer::{tokenize, Caret};
    use super::*;

    fn tree(source: &str) -> Expr {
        parse(&tokenize(source, Caret::Power).unwrap()).unwrap()
    }

    #[test]
    fn power_binds_tighter_than_unary_minus() {
        assert_eq!(
            tree("-2**2"),
            Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(binary(
                    BinaryOp::Pow,
                    Expr::Number(Number::Int(2)),
                    Expr::Number(Number::Int(2))
                )),
            }
        );
    }

    #[test]
    fn power_is_right_associative() {
        let Expr::Binary { op, rhs, .. } = tree("2**3**2") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Pow);
        assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::Pow, .. }));
    }

    #[test]
    fn parses_calls() {
        assert_eq!(
            tree("atan2(1, 2)"),
            Expr::Call {
                name: "atan2".into(),
                args: vec![Expr::Number(Number::Int(1)), Expr::Number(Number::Int(2))],
            }
        );
    }

    #[test]
    fn reports_syntax_errors() {
        for source in ["2 +", "(1", "1 2", "f(1 2)", ")"] {
            let tokens = tokenize(source, Caret::Power).unwrap();
            assert!(matches!(parse(&tokens), Err(EvalError::Syntax(_))), "{source}");
        }
        assert!(matches!(parse(&[]), Err(EvalError::Empty)));
    }

    #[test]
    fn limits_nesting() {
        let source = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        let tokens = tokenize(&source, Caret::Power).unwrap();
        assert!(matches!(parse(&tokens), Err(EvalError::Syntax(_))));
    }
}
