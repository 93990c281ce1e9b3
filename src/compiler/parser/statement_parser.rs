//! # Statement & Declaration Parser
//!
//! Parses everything outside of expressions: top-level declarations
//! (functions, globals, `include`, `extern`) and the statement forms
//! allowed inside a function body. Expression parsing itself is delegated
//! to [`super::expression_parser::ExpressionParser`].

use super::common::Parser;
use super::expression_parser::ExpressionParser;
use crate::ast::nodes::{Function, Param, Program, Stmt, TopLevel, TypeNode, VarDecl};
use crate::ast::types::{BaseType, TypeKind};
use crate::compiler::error::CompileError;
use crate::compiler::lexer::Token;

pub struct StatementParser;

impl StatementParser {
    pub fn parse_program(parser: &mut Parser) -> Result<Program, CompileError> {
        let mut items = Vec::new();
        while !parser.is_at_end() {
            items.push(Self::parse_top_level(parser)?);
        }
        Ok(Program { items })
    }

    fn parse_top_level(parser: &mut Parser) -> Result<TopLevel, CompileError> {
        match parser.peek() {
            Token::Fn => Ok(TopLevel::Function(Self::parse_function(parser)?)),
            Token::Include => Self::parse_include(parser),
            Token::Extern => Self::parse_extern(parser),
            _ => Ok(TopLevel::VarDecl(Self::parse_var_decl(parser)?)),
        }
    }

    fn parse_base_type(parser: &mut Parser) -> Result<BaseType, CompileError> {
        let keyword = match parser.peek() {
            Token::Int => "int",
            Token::Int16 => "int16",
            Token::Int32 => "int32",
            Token::Int64 => "int64",
            Token::Char => "char",
            Token::Float => "float",
            Token::Void => "void",
            other => {
                return Err(CompileError::parse(
                    parser.position(),
                    format!("expected a type keyword, found {:?}", other),
                ));
            }
        };
        parser.advance();
        Ok(BaseType::from_keyword(keyword).expect("token/keyword tables are kept in sync"))
    }

    /// Parses `TYPE [*]`, the declarator prefix shared by params, globals,
    /// locals, and return types.
    fn parse_type_kind(parser: &mut Parser) -> Result<TypeKind, CompileError> {
        let base = Self::parse_base_type(parser)?;
        if matches!(parser.peek(), Token::Star) {
            parser.advance();
            Ok(TypeKind::Ptr(base))
        } else {
            Ok(TypeKind::Scalar(base))
        }
    }

    fn parse_function(parser: &mut Parser) -> Result<Function, CompileError> {
        parser.expect(Token::Fn)?;
        let name = parser.expect_identifier()?;
        parser.expect(Token::LParen)?;

        let mut params = Vec::new();
        if !matches!(parser.peek(), Token::RParen) {
            loop {
                let kind = Self::parse_type_kind(parser)?;
                let pname = parser.expect_identifier()?;
                params.push(Param {
                    name: pname,
                    ty: TypeNode::scalar(kind),
                });
                if matches!(parser.peek(), Token::Comma) {
                    parser.advance();
                } else {
                    break;
                }
            }
        }
        parser.expect(Token::RParen)?;
        parser.expect(Token::Arrow)?;
        let return_kind = Self::parse_type_kind(parser)?;
        parser.expect(Token::LBrace)?;
        let body = Self::parse_block(parser)?;
        parser.expect(Token::RBrace)?;

        Ok(Function {
            name,
            return_type: TypeNode::scalar(return_kind),
            params,
            body,
        })
    }

    fn parse_block(parser: &mut Parser) -> Result<Vec<Stmt>, CompileError> {
        let mut stmts = Vec::new();
        while !matches!(parser.peek(), Token::RBrace) && !parser.is_at_end() {
            stmts.push(Self::parse_statement(parser)?);
        }
        Ok(stmts)
    }

    fn parse_statement(parser: &mut Parser) -> Result<Stmt, CompileError> {
        match parser.peek() {
            Token::Ret => {
                parser.advance();
                let value = if matches!(parser.peek(), Token::Semicolon) {
                    None
                } else {
                    Some(ExpressionParser::parse_expression(parser)?)
                };
                parser.expect(Token::Semicolon)?;
                Ok(Stmt::Return(value))
            }
            Token::If => Self::parse_if(parser),
            Token::While => Self::parse_while(parser),
            Token::For => Self::parse_for(parser),
            Token::Unsafe => {
                parser.advance();
                parser.expect(Token::LBrace)?;
                let body = Self::parse_block(parser)?;
                parser.expect(Token::RBrace)?;
                Ok(Stmt::Unsafe(body))
            }
            Token::Break => {
                parser.advance();
                parser.expect(Token::Semicolon)?;
                Ok(Stmt::Break)
            }
            Token::Continue => {
                parser.advance();
                parser.expect(Token::Semicolon)?;
                Ok(Stmt::Continue)
            }
            Token::Int | Token::Int16 | Token::Int32 | Token::Int64 | Token::Char
            | Token::Float | Token::Void => Ok(Stmt::VarDecl(Self::parse_var_decl(parser)?)),
            _ => {
                let expr = ExpressionParser::parse_expression(parser)?;
                parser.expect(Token::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn parse_if(parser: &mut Parser) -> Result<Stmt, CompileError> {
        parser.expect(Token::If)?;
        parser.expect(Token::LParen)?;
        let cond = ExpressionParser::parse_expression(parser)?;
        parser.expect(Token::RParen)?;
        parser.expect(Token::LBrace)?;
        let then_branch = Self::parse_block(parser)?;
        parser.expect(Token::RBrace)?;

        let else_branch = if matches!(parser.peek(), Token::Else) {
            parser.advance();
            parser.expect(Token::LBrace)?;
            let branch = Self::parse_block(parser)?;
            parser.expect(Token::RBrace)?;
            branch
        } else {
            Vec::new()
        };

        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(parser: &mut Parser) -> Result<Stmt, CompileError> {
        parser.expect(Token::While)?;
        parser.expect(Token::LParen)?;
        let cond = ExpressionParser::parse_expression(parser)?;
        parser.expect(Token::RParen)?;
        parser.expect(Token::LBrace)?;
        let body = Self::parse_block(parser)?;
        parser.expect(Token::RBrace)?;
        Ok(Stmt::While { cond, body })
    }

    fn parse_for(parser: &mut Parser) -> Result<Stmt, CompileError> {
        parser.expect(Token::For)?;
        parser.expect(Token::LParen)?;

        let init = if matches!(parser.peek(), Token::Semicolon) {
            None
        } else {
            Some(ExpressionParser::parse_expression(parser)?)
        };
        parser.expect(Token::Semicolon)?;

        let cond = if matches!(parser.peek(), Token::Semicolon) {
            None
        } else {
            Some(ExpressionParser::parse_expression(parser)?)
        };
        parser.expect(Token::Semicolon)?;

        let step = if matches!(parser.peek(), Token::RParen) {
            None
        } else {
            Some(ExpressionParser::parse_expression(parser)?)
        };
        parser.expect(Token::RParen)?;

        parser.expect(Token::LBrace)?;
        let body = Self::parse_block(parser)?;
        parser.expect(Token::RBrace)?;

        Ok(Stmt::For {
            init,
            cond,
            step,
            body,
        })
    }

    fn parse_var_decl(parser: &mut Parser) -> Result<VarDecl, CompileError> {
        let kind = Self::parse_type_kind(parser)?;
        let name = parser.expect_identifier()?;

        let array_size = if matches!(parser.peek(), Token::LBracket) {
            parser.advance();
            let size = match parser.advance() {
                Token::IntNumber(n) if n >= 0 => n as u64,
                other => {
                    return Err(CompileError::parse(
                        parser.position(),
                        format!("expected array size integer literal, found {:?}", other),
                    ));
                }
            };
            parser.expect(Token::RBracket)?;
            Some(size)
        } else {
            None
        };

        let init = if matches!(parser.peek(), Token::Eq) {
            parser.advance();
            Some(ExpressionParser::parse_expression(parser)?)
        } else {
            None
        };
        parser.expect(Token::Semicolon)?;

        Ok(VarDecl {
            name,
            ty: TypeNode { kind, array_size },
            init,
        })
    }

    fn parse_include(parser: &mut Parser) -> Result<TopLevel, CompileError> {
        parser.expect(Token::Include)?;
        let target = match parser.advance() {
            Token::StringLit(s) => s,
            other => {
                return Err(CompileError::parse(
                    parser.position(),
                    format!("expected include target string, found {:?}", other),
                ));
            }
        };
        parser.expect(Token::Semicolon)?;
        Ok(TopLevel::Include(target))
    }

    fn parse_extern(parser: &mut Parser) -> Result<TopLevel, CompileError> {
        parser.expect(Token::Extern)?;
        let name = parser.expect_identifier()?;
        parser.expect(Token::Semicolon)?;
        Ok(TopLevel::Extern(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::lexer;

    fn parse_src(src: &str) -> Program {
        let tokens = lexer::tokenize(src).unwrap();
        let mut parser = Parser::new(tokens);
        StatementParser::parse_program(&mut parser).unwrap()
    }

    #[test]
    fn empty_source_yields_empty_program() {
        let program = parse_src("");
        assert!(program.items.is_empty());
    }

    #[test]
    fn array_declarator_records_its_extent() {
        let program = parse_src("int buf[10];");
        match &program.items[0] {
            TopLevel::VarDecl(decl) => assert_eq!(decl.ty.array_size, Some(10)),
            other => panic!("expected a VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn pointer_declarator_produces_ptr_type() {
        let program = parse_src("char* s;");
        match &program.items[0] {
            TopLevel::VarDecl(decl) => assert!(matches!(decl.ty.kind, TypeKind::Ptr(BaseType::Char))),
            other => panic!("expected a VarDecl, got {other:?}"),
        }
    }
}
