//! # Parser Cursor
//!
//! A thin cursor over the token stream shared by [`super::expression_parser`]
//! and [`super::statement_parser`]. It owns no grammar knowledge itself —
//! just lookahead, consumption, and the two recurring checks every
//! production needs (`check` for optional tokens, `expect` for required
//! ones).

use crate::compiler::error::CompileError;
use crate::compiler::lexer::{Spanned, Token};

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// The token under the cursor. Never advances past the final `Eof`.
    pub fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].0
    }

    pub fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].0
    }

    /// The byte offset of the current token, for error reporting.
    pub fn position(&self) -> usize {
        self.tokens[self.pos.min(self.tokens.len() - 1)].1.start
    }

    pub fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }

    /// Consumes and returns the current token.
    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// True if the current token has the same variant as `expected`,
    /// ignoring any payload (`Token::Identifier(String::new())` matches any
    /// identifier).
    pub fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(expected)
    }

    /// Consumes the current token if it matches `expected`, else fails with
    /// a `ParseError` naming both.
    pub fn expect(&mut self, expected: Token) -> Result<Token, CompileError> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(CompileError::parse(
                self.position(),
                format!("expected {:?}, found {:?}", expected, self.peek()),
            ))
        }
    }

    /// Consumes the current token if it is `Identifier`, returning its name.
    pub fn expect_identifier(&mut self) -> Result<String, CompileError> {
        match self.advance() {
            Token::Identifier(name) => Ok(name),
            other => Err(CompileError::parse(
                self.position(),
                format!("expected identifier, found {:?}", other),
            )),
        }
    }
}
