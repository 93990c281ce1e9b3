//! # Compiler Error Definitions
//!
//! This module centralizes all custom error types that can occur during the
//! entire compilation and execution process of Oxylang programs.
//!
//! It leverages the `thiserror` crate to simplify error reporting and provide
//! clear, descriptive messages to the user.

use std::process::ExitStatus;
use thiserror::Error;

/// The primary error enumeration for the Oxylang compiler.
#[derive(Error, Debug)]
pub enum CompileError {
    /// Wrapper for standard I/O errors (e.g., file reading/writing).
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error raised when the compiler cannot find any source files to process.
    #[error("No .oxy source files found in current directory")]
    NoSourceFiles,

    /// Lexical analysis failure: an unrecognized character, an unterminated
    /// string or char literal, or a malformed numeric literal.
    #[error("Lex error at position {position}: {message}")]
    LexError { position: usize, message: String },

    /// Parser failure: the token stream does not match the grammar.
    #[error("Parse error at position {position}: {message}")]
    ParseError { position: usize, message: String },

    /// Include expansion failure: a missing include target, a target not
    /// ending in `.oxy`, or some other preprocessing problem.
    #[error("Preprocessor error: {message}")]
    PreprocessError { message: String },

    /// Semantic analysis failure: illegal top-level declarations, a missing
    /// or malformed `main`, a global declared after a function, etc.
    #[error("Semantic error: {message}")]
    SemanticError { message: String },

    /// Code generation failure: an operation the generator cannot lower,
    /// e.g. an unmangled overload collision or an unsupported operand shape.
    #[error("Codegen error: {message}")]
    CodegenError { message: String },

    /// Error raised if the compiled executable or object file is missing
    /// after the assemble/link stage.
    #[error("Binary not found after compilation")]
    BinaryNotFound,

    /// Error raised during program execution if an I/O issue occurs
    /// launching `nasm`, the linker, or the compiled binary.
    #[error("Execution error: {0}")]
    ExecutionError(#[source] std::io::Error),

    /// Error raised if the executed program terminates with a non-zero exit
    /// status.
    #[error("Execution failed with status: {0}")]
    ExecutionFailed(ExitStatus),

    /// Error raised when `--target` names an architecture triple
    /// `target-lexicon` cannot parse.
    #[error("Unknown target architecture: {0}")]
    UnknownTarget(String),
}

impl CompileError {
    /// Constructs a `LexError` at the given byte offset.
    pub fn lex(position: usize, message: impl Into<String>) -> Self {
        Self::LexError {
            position,
            message: message.into(),
        }
    }

    /// Constructs a `ParseError` at the given token position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            position,
            message: message.into(),
        }
    }

    /// Constructs a `PreprocessError` for include-expansion failures.
    pub fn preprocess(message: impl Into<String>) -> Self {
        Self::PreprocessError {
            message: message.into(),
        }
    }

    /// Constructs a `SemanticError` for analyzer failures.
    pub fn semantic(message: impl Into<String>) -> Self {
        Self::SemanticError {
            message: message.into(),
        }
    }

    /// Constructs a `CodegenError` for lowering failures.
    pub fn codegen(message: impl Into<String>) -> Self {
        Self::CodegenError {
            message: message.into(),
        }
    }

    /// Constructs an `UnknownTarget` error for an unparseable `--target` string.
    pub fn unknown_target(target: impl Into<String>) -> Self {
        Self::UnknownTarget(target.into())
    }
}
