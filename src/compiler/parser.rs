//! # Parser Module
//!
//! This module serves as the primary interface for the syntactic analysis
//! (parsing) phase of the Oxylang compiler. It orchestrates the process of
//! converting the linear stream of tokens produced by the lexer into a
//! tagged-variant Abstract Syntax Tree.

pub mod common;
pub mod expression_parser;
pub mod statement_parser;

use crate::ast::nodes::Program;
use crate::compiler::error::CompileError;
use crate::compiler::lexer::Spanned;

/// The main entry point for the parsing phase.
///
/// Initializes the concrete [`common::Parser`] cursor and starts recursive
/// descent at the top level by calling `parse_program`.
pub fn parse(tokens: Vec<Spanned>) -> Result<Program, CompileError> {
    use common::Parser;
    use statement_parser::StatementParser;

    let mut parser = Parser::new(tokens);
    StatementParser::parse_program(&mut parser)
}
