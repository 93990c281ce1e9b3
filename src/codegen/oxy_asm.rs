//! # Top-Level Assembly Generator
//!
//! [`OxylangAssemblyGenerator`] drives the whole translation unit: it
//! pre-registers every global and every function's return type (so a call
//! to a function declared later in the file, or a reference to a global
//! declared earlier, both resolve correctly), lowers each top-level item in
//! source order, appends the fixed runtime helpers, and finally emits the
//! `.rodata`/`.data` sections the lowering passes accumulated. The
//! instruction stream is run through [`crate::codegen::peephole`] before
//! being joined into the returned assembly text.

use crate::ast::nodes::{Expr, NumberLit, Program, TopLevel};
use crate::codegen::common::GeneratorState;
use crate::codegen::{peephole, runtime, statement};
use crate::compiler::error::CompileError;

pub struct OxylangAssemblyGenerator {
    state: GeneratorState,
}

impl OxylangAssemblyGenerator {
    pub fn new() -> Self {
        Self { state: GeneratorState::new() }
    }

    pub fn generate(&mut self, program: &Program) -> Result<String, CompileError> {
        self.register_declarations(program);

        self.state.emit("global main");
        self.state.emit("extern puts");
        self.state.emit("");
        self.state.emit("section .text");

        for item in &program.items {
            match item {
                TopLevel::Function(func) => statement::lower_function(&mut self.state, func)?,
                TopLevel::VarDecl(decl) => self.lower_global(decl),
                TopLevel::Extern(name) => self.state.emit(format!("extern {name}")),
                TopLevel::Include(target) => {
                    return Err(CompileError::codegen(format!(
                        "unexpanded include `{target}` reached the generator"
                    )));
                }
            }
        }

        self.state.emit("");
        runtime::emit(&mut self.state.lines);

        let string_pool = self.state.string_pool().to_vec();
        if !string_pool.is_empty() {
            self.state.emit("");
            self.state.emit("section .rodata");
            for (label, content) in &string_pool {
                self.state.emit(format!("{label}: db \"{}\", 0", escape_string(content)));
            }
        }

        self.state.emit("");
        self.state.emit("section .data");
        self.state.emit("    buffer times 20 db 0");
        self.emit_data_entries();

        let cleaned = peephole::run(std::mem::take(&mut self.state.lines));
        Ok(cleaned.join("\n"))
    }

    /// Collects every function's return type and every global's type/size
    /// before lowering any body, so forward references (a call to a
    /// function declared further down, an identifier naming a global
    /// declared earlier in the same pass) both resolve.
    fn register_declarations(&mut self, program: &Program) {
        for item in &program.items {
            match item {
                TopLevel::Function(func) => {
                    self.state.function_returns.insert(func.name.clone(), func.return_type.kind);
                }
                TopLevel::VarDecl(decl) => {
                    self.state.register_global(&decl.name, decl.ty.kind, decl.ty.storage_size());
                }
                TopLevel::Extern(_) | TopLevel::Include(_) => {}
            }
        }
    }

    fn lower_global(&mut self, decl: &crate::ast::nodes::VarDecl) {
        let size = decl.ty.storage_size();
        let value = self.global_initializer(decl.init.as_ref());
        self.state.data.push(crate::codegen::common::DataEntry::Global {
            name: decl.name.clone(),
            size,
            value,
        });
    }

    /// Only literal initializers are meaningful at link time; anything
    /// else (an expression that needs runtime evaluation) falls back to a
    /// zeroed global, since Oxylang has no static initializer evaluator.
    fn global_initializer(&self, init: Option<&Expr>) -> String {
        match init {
            Some(Expr::Number(NumberLit::Int(n))) => n.to_string(),
            Some(Expr::Number(NumberLit::Float(f))) => format!("0x{:016x}", f.to_bits()),
            Some(Expr::CharLit(c)) => (*c as u32).to_string(),
            _ => "0".to_string(),
        }
    }

    fn emit_data_entries(&mut self) {
        let entries = std::mem::take(&mut self.state.data);
        for entry in entries {
            match entry {
                crate::codegen::common::DataEntry::Global { name, size, value } => {
                    if size == 1 {
                        self.state.emit(format!("{name}: db {value}"));
                    } else {
                        self.state.emit(format!("{name}: dq {value}"));
                    }
                }
                crate::codegen::common::DataEntry::FloatConst { label, bits } => {
                    self.state.emit(format!("{label}: dq 0x{bits:016x}"));
                }
            }
        }
    }
}

impl Default for OxylangAssemblyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{lexer, parser};

    fn generate_src(src: &str) -> String {
        let tokens = lexer::tokenize(src).unwrap();
        let program = parser::parse(tokens).unwrap();
        let mut gen = OxylangAssemblyGenerator::new();
        gen.generate(&program).unwrap()
    }

    #[test]
    fn minimal_main_emits_prologue_and_epilogue() {
        let asm = generate_src("fn main() -> int { ret 0; }");
        assert!(asm.contains("global main"));
        assert!(asm.contains("main:"));
        assert!(asm.contains("    mov rax, 0"));
        assert!(asm.contains("    ret"));
        assert!(asm.contains("display_number:"));
    }

    #[test]
    fn string_literals_are_deduplicated() {
        let asm = generate_src(
            r#"fn main() -> int { puts("hi"); puts("hi"); puts("bye"); ret 0; }"#,
        );
        assert_eq!(asm.matches("LC0: db").count(), 1);
        assert_eq!(asm.matches("LC1: db").count(), 1);
        assert!(!asm.contains("LC2:"));
    }

    #[test]
    fn overloaded_function_mangles_by_signature() {
        let asm = generate_src(
            "fn add(int a, int b) -> int { ret a + b; } fn add(float a, float b) -> float { ret a + b; } fn main() -> int { ret add(1, 2); }",
        );
        assert!(asm.contains("add__INT_INT:"));
        assert!(asm.contains("add__FLOAT_FLOAT:"));
        assert!(asm.contains("call add__INT_INT"));
    }

    #[test]
    fn break_outside_loop_is_rejected() {
        let tokens = lexer::tokenize("fn main() -> int { break; ret 0; }").unwrap();
        let program = parser::parse(tokens).unwrap();
        let mut gen = OxylangAssemblyGenerator::new();
        assert!(matches!(gen.generate(&program), Err(CompileError::CodegenError { .. })));
    }

    #[test]
    fn global_precedes_data_section_and_carries_initializer() {
        let asm = generate_src("int counter = 5; fn main() -> int { ret counter; }");
        assert!(asm.contains("counter: dq 5"));
    }
}
