//! # Oxylang Compiler Crate
//!
//! This crate contains the core implementation of the Oxylang compiler,
//! providing modules for lexical analysis, parsing, include expansion,
//! semantic analysis, and code generation. It exposes the main `Compiler`
//! structure and the individual pipeline stage functions for callers that
//! want to stop short of a full build.

pub mod ast;
pub mod codegen;
pub mod compiler;
pub mod debug;

pub use compiler::Compiler;
pub use compiler::analyze;
pub use compiler::parse;
pub use compiler::preprocess;
pub use compiler::tokenize;

pub use crate::codegen::OxylangAssemblyGenerator;

/// Lexes, parses, include-expands, and semantically analyzes `source`
/// without generating assembly. Intended for tooling (editors, linters)
/// that want a fast correctness check without invoking `nasm`/a linker.
///
/// `source_path` is used only to seed the preprocessor's include-cycle
/// guard; it need not exist on disk if `source` contains no `include`
/// directives.
pub fn check(source: &str, source_path: &std::path::Path) -> Result<(), compiler::error::CompileError> {
    let tokens = tokenize(source)?;
    let program = parse(tokens)?;
    let program = preprocess(source_path, program)?;
    analyze(&program)?;
    Ok(())
}
