//! # Code Generation Module
//!
//! Translates an analyzed [`crate::ast::nodes::Program`] into NASM x86_64
//! assembly text. The pipeline is: collect every function's frame layout,
//! lower each top-level item to instructions against a shared
//! [`common::GeneratorState`], append the fixed runtime helpers, emit the
//! `.rodata`/`.data` sections the lowering passes accumulated, then run the
//! emitted instruction stream through a small peephole pass.
//!
//! Each sub-module owns one concern so that a lowering bug is easy to
//! localize: `frame` only ever assigns offsets, `expression` only ever
//! leaves a value in `rax`/`xmm0`, `call` only ever marshals arguments and
//! picks a symbol name.

pub mod call;
pub mod common;
pub mod expression;
pub mod frame;
pub mod oxy_asm;
pub mod peephole;
pub mod runtime;
pub mod statement;

pub use oxy_asm::OxylangAssemblyGenerator;
