//! # Expression Parser
//!
//! Pratt (operator-precedence) parsing for Oxylang expressions. Precedence
//! climbs from assignment (lowest, right-associative) through logical,
//! equality, relational, additive, multiplicative, up to exponentiation
//! (highest binary precedence, also right-associative) — then unary and
//! postfix forms sit above all of that as the primary-expression layer.

use super::common::Parser;
use crate::ast::nodes::{BinOpKind, Expr, NumberLit};
use crate::compiler::error::CompileError;
use crate::compiler::lexer::Token;

pub struct ExpressionParser;

impl ExpressionParser {
    pub fn parse_expression(parser: &mut Parser) -> Result<Expr, CompileError> {
        Self::parse_assignment(parser)
    }

    /// Assignment family: right-associative, so `a = b = c` parses as
    /// `a = (b = c)`.
    fn parse_assignment(parser: &mut Parser) -> Result<Expr, CompileError> {
        let left = Self::parse_or(parser)?;

        let op = match parser.peek() {
            Token::Eq => BinOpKind::Assign,
            Token::PlusEq => BinOpKind::PlusAssign,
            Token::MinusEq => BinOpKind::MinusAssign,
            Token::StarEq => BinOpKind::MulAssign,
            Token::SlashEq => BinOpKind::DivAssign,
            Token::PercentEq => BinOpKind::ModAssign,
            _ => return Ok(left),
        };
        parser.advance();
        let right = Self::parse_assignment(parser)?;
        Ok(Expr::BinOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_or(parser: &mut Parser) -> Result<Expr, CompileError> {
        let mut left = Self::parse_and(parser)?;
        while matches!(parser.peek(), Token::OrOr) {
            parser.advance();
            let right = Self::parse_and(parser)?;
            left = Self::bin(BinOpKind::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(parser: &mut Parser) -> Result<Expr, CompileError> {
        let mut left = Self::parse_equality(parser)?;
        while matches!(parser.peek(), Token::AndAnd) {
            parser.advance();
            let right = Self::parse_equality(parser)?;
            left = Self::bin(BinOpKind::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality(parser: &mut Parser) -> Result<Expr, CompileError> {
        let mut left = Self::parse_relational(parser)?;
        loop {
            let op = match parser.peek() {
                Token::EqEq => BinOpKind::Eq,
                Token::NotEq => BinOpKind::Ne,
                _ => break,
            };
            parser.advance();
            let right = Self::parse_relational(parser)?;
            left = Self::bin(op, left, right);
        }
        Ok(left)
    }

    fn parse_relational(parser: &mut Parser) -> Result<Expr, CompileError> {
        let mut left = Self::parse_additive(parser)?;
        loop {
            let op = match parser.peek() {
                Token::Lt => BinOpKind::Lt,
                Token::LtEq => BinOpKind::Le,
                Token::Gt => BinOpKind::Gt,
                Token::GtEq => BinOpKind::Ge,
                _ => break,
            };
            parser.advance();
            let right = Self::parse_additive(parser)?;
            left = Self::bin(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(parser: &mut Parser) -> Result<Expr, CompileError> {
        let mut left = Self::parse_multiplicative(parser)?;
        loop {
            let op = match parser.peek() {
                Token::Plus => BinOpKind::Add,
                Token::Minus => BinOpKind::Sub,
                _ => break,
            };
            parser.advance();
            let right = Self::parse_multiplicative(parser)?;
            left = Self::bin(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(parser: &mut Parser) -> Result<Expr, CompileError> {
        let mut left = Self::parse_power(parser)?;
        loop {
            let op = match parser.peek() {
                Token::Star => BinOpKind::Mul,
                Token::Slash => BinOpKind::Div,
                Token::Percent => BinOpKind::Mod,
                _ => break,
            };
            parser.advance();
            let right = Self::parse_power(parser)?;
            left = Self::bin(op, left, right);
        }
        Ok(left)
    }

    /// `^` binds tighter than `*`/`/`/`%` and is right-associative, so
    /// `2 ^ 3 ^ 2` parses as `2 ^ (3 ^ 2)`.
    fn parse_power(parser: &mut Parser) -> Result<Expr, CompileError> {
        let left = Self::parse_unary(parser)?;
        if matches!(parser.peek(), Token::Caret) {
            parser.advance();
            let right = Self::parse_power(parser)?;
            return Ok(Self::bin(BinOpKind::Pow, left, right));
        }
        Ok(left)
    }

    fn parse_unary(parser: &mut Parser) -> Result<Expr, CompileError> {
        match parser.peek() {
            Token::Minus => {
                parser.advance();
                let operand = Self::parse_unary(parser)?;
                Ok(Expr::UnaryMinus(Box::new(operand)))
            }
            Token::Amp => {
                parser.advance();
                let operand = Self::parse_unary(parser)?;
                Ok(Expr::AddrOf(Box::new(operand)))
            }
            Token::Star => {
                parser.advance();
                let operand = Self::parse_unary(parser)?;
                Ok(Expr::Deref(Box::new(operand)))
            }
            Token::PlusPlus => {
                parser.advance();
                let operand = Self::parse_unary(parser)?;
                Ok(Expr::PreInc(Box::new(operand)))
            }
            Token::MinusMinus => {
                parser.advance();
                let operand = Self::parse_unary(parser)?;
                Ok(Expr::PreDec(Box::new(operand)))
            }
            _ => Self::parse_postfix(parser),
        }
    }

    fn parse_postfix(parser: &mut Parser) -> Result<Expr, CompileError> {
        let mut expr = Self::parse_primary(parser)?;
        loop {
            match parser.peek() {
                Token::LBracket => {
                    parser.advance();
                    let index = Self::parse_expression(parser)?;
                    parser.expect(Token::RBracket)?;
                    expr = Expr::ArrayIndex {
                        base: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                Token::PlusPlus => {
                    parser.advance();
                    expr = Expr::PostInc(Box::new(expr));
                }
                Token::MinusMinus => {
                    parser.advance();
                    expr = Expr::PostDec(Box::new(expr));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(parser: &mut Parser) -> Result<Expr, CompileError> {
        match parser.peek().clone() {
            Token::IntNumber(n) => {
                parser.advance();
                Ok(Expr::Number(NumberLit::Int(n)))
            }
            Token::FloatNumber(f) => {
                parser.advance();
                Ok(Expr::Number(NumberLit::Float(f)))
            }
            Token::StringLit(s) => {
                parser.advance();
                Ok(Expr::Str(s))
            }
            Token::CharLit(c) => {
                parser.advance();
                Ok(Expr::CharLit(c))
            }
            Token::Identifier(name) => {
                parser.advance();
                if matches!(parser.peek(), Token::LParen) {
                    parser.advance();
                    let mut args = Vec::new();
                    if !matches!(parser.peek(), Token::RParen) {
                        loop {
                            args.push(Self::parse_expression(parser)?);
                            if matches!(parser.peek(), Token::Comma) {
                                parser.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    parser.expect(Token::RParen)?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Identifier(name))
                }
            }
            Token::LParen => {
                parser.advance();
                let expr = Self::parse_expression(parser)?;
                parser.expect(Token::RParen)?;
                Ok(expr)
            }
            other => Err(CompileError::parse(
                parser.position(),
                format!("expected expression, found {:?}", other),
            )),
        }
    }

    fn bin(op: BinOpKind, left: Expr, right: Expr) -> Expr {
        Expr::BinOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::lexer;

    fn parse_expr(src: &str) -> Expr {
        let tokens = lexer::tokenize(src).unwrap();
        let mut parser = Parser::new(tokens);
        ExpressionParser::parse_expression(&mut parser).unwrap()
    }

    /// `a + b * c` must parse as `a + (b * c)`: the outermost node is `Add`,
    /// and its right child is the `Mul`.
    #[test]
    fn multiplicative_binds_tighter_than_additive() {
        let expr = parse_expr("a + b * c");
        match expr {
            Expr::BinOp { op: BinOpKind::Add, left, right } => {
                assert!(matches!(*left, Expr::Identifier(n) if n == "a"));
                assert!(matches!(*right, Expr::BinOp { op: BinOpKind::Mul, .. }));
            }
            other => panic!("expected top-level Add, got {other:?}"),
        }
    }

    /// `a = b = c` is right-associative: `a = (b = c)`.
    #[test]
    fn assignment_is_right_associative() {
        let expr = parse_expr("a = b = c");
        match expr {
            Expr::BinOp { op: BinOpKind::Assign, left, right } => {
                assert!(matches!(*left, Expr::Identifier(n) if n == "a"));
                match *right {
                    Expr::BinOp { op: BinOpKind::Assign, left, right } => {
                        assert!(matches!(*left, Expr::Identifier(n) if n == "b"));
                        assert!(matches!(*right, Expr::Identifier(n) if n == "c"));
                    }
                    other => panic!("expected nested Assign, got {other:?}"),
                }
            }
            other => panic!("expected top-level Assign, got {other:?}"),
        }
    }

    /// `a < b == c < d` parses as `(a<b) == (c<d)`: equality binds looser
    /// than relational, so each side of `==` is a complete relational
    /// comparison.
    #[test]
    fn equality_binds_looser_than_relational() {
        let expr = parse_expr("a < b == c < d");
        match expr {
            Expr::BinOp { op: BinOpKind::Eq, left, right } => {
                assert!(matches!(*left, Expr::BinOp { op: BinOpKind::Lt, .. }));
                assert!(matches!(*right, Expr::BinOp { op: BinOpKind::Lt, .. }));
            }
            other => panic!("expected top-level Eq, got {other:?}"),
        }
    }

    /// `2 ^ 3 ^ 2` is right-associative and binds tighter than `*`.
    #[test]
    fn power_is_right_associative_and_binds_tightest() {
        let expr = parse_expr("a * b ^ c ^ d");
        match expr {
            Expr::BinOp { op: BinOpKind::Mul, left, right } => {
                assert!(matches!(*left, Expr::Identifier(n) if n == "a"));
                match *right {
                    Expr::BinOp { op: BinOpKind::Pow, left, right } => {
                        assert!(matches!(*left, Expr::Identifier(n) if n == "b"));
                        assert!(matches!(*right, Expr::BinOp { op: BinOpKind::Pow, .. }));
                    }
                    other => panic!("expected nested Pow, got {other:?}"),
                }
            }
            other => panic!("expected top-level Mul, got {other:?}"),
        }
    }
}
