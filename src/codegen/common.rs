//! # Generator State
//!
//! [`GeneratorState`] is the single piece of mutable context threaded
//! through every lowering function in this module: the growing instruction
//! stream, the label counter, the deduplicated string pool, the loop-label
//! stack `break`/`continue` consult, and the variable tables (locals for
//! whichever function is currently being lowered, globals for the whole
//! translation unit).
//!
//! Keeping this in one struct rather than threading half a dozen loose
//! arguments through every `lower_*` call is the same shape the teacher's
//! original `CodeGenCommon` used; the fields themselves are specific to
//! Oxylang's evaluation model (accumulator + `ValueKind` tag) rather than
//! the teacher's.

use std::collections::HashMap;

use crate::ast::types::TypeKind;

/// Which register class an expression's result landed in once lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Float,
}

#[derive(Debug, Clone, Copy)]
pub struct LocalSlot {
    /// Offset from `rbp`, always negative.
    pub offset: i64,
    pub size: u64,
    pub ty: TypeKind,
}

#[derive(Debug, Clone, Copy)]
pub struct GlobalVar {
    pub size: u64,
    pub ty: TypeKind,
}

/// A `.data`/`.rodata` entry produced while lowering, emitted verbatim at
/// the end of generation.
#[derive(Debug, Clone)]
pub enum DataEntry {
    Global { name: String, size: u64, value: String },
    /// A floating point literal, stored as its raw bit pattern so the
    /// emitted `dq` directive is exact regardless of how NASM's own float
    /// parser would round the source text.
    FloatConst { label: String, bits: u64 },
}

#[derive(Debug, Default)]
pub struct GeneratorState {
    pub lines: Vec<String>,
    label_id: u64,
    strings: HashMap<String, String>,
    string_order: Vec<(String, String)>,
    pub loop_stack: Vec<(String, String)>,
    pub globals: HashMap<String, GlobalVar>,
    pub locals: HashMap<String, LocalSlot>,
    pub frame_size: i64,
    pub function_returns: HashMap<String, TypeKind>,
    pub data: Vec<DataEntry>,
}

impl GeneratorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Matches the teacher's `next_label` counter scheme: `{prefix}{n}`,
    /// monotonically increasing for the whole translation unit.
    pub fn next_label(&mut self, prefix: &str) -> String {
        self.label_id += 1;
        format!("{prefix}{}", self.label_id)
    }

    /// Interns a string literal into the rodata pool, returning its label.
    /// Equal contents always get the same label — Oxylang's one dedup
    /// guarantee, unlike `.data` globals and float constants below, which
    /// are never deduplicated.
    pub fn intern_string(&mut self, content: &str) -> String {
        if let Some(label) = self.strings.get(content) {
            return label.clone();
        }
        let label = format!("LC{}", self.strings.len());
        self.strings.insert(content.to_string(), label.clone());
        self.string_order.push((label.clone(), content.to_string()));
        label
    }

    pub fn string_pool(&self) -> &[(String, String)] {
        &self.string_order
    }

    pub fn intern_float(&mut self, bits: u64) -> String {
        let label = self.next_label("float");
        self.data.push(DataEntry::FloatConst { label: label.clone(), bits });
        label
    }

    pub fn register_global(&mut self, name: &str, ty: TypeKind, size: u64) {
        self.globals.insert(name.to_string(), GlobalVar { size, ty });
    }

    pub fn find_global(&self, name: &str) -> Option<GlobalVar> {
        self.globals.get(name).copied()
    }
}
