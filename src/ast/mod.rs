//! # Abstract Syntax Tree (AST) for Oxylang
//!
//! This module defines the core structures for the Abstract Syntax Tree (AST)
//! of the Oxylang language. The AST is the shared representation that flows
//! from the parser through the semantic analyzer into the code generator.
//!
//! It includes:
//! - [`nodes`]: Program, declaration, statement, and expression node types.
//! - [`types`]: Definitions for the scalar data types and type-related utilities.

pub mod nodes;
pub mod types;