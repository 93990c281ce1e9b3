//! # Semantic Analyzer
//!
//! A single pass over the (already include-expanded) program: collects
//! function declarations, accepts global variable declarations and
//! `extern`s in their place, and verifies `main`'s shape. No local name
//! resolution or expression typing happens here — that is deferred to the
//! generator, which is the only stage that actually needs a scope to check
//! against (per the pipeline's error-handling design).

use std::collections::HashMap;

use crate::ast::nodes::{Function, Program, TopLevel};
use crate::ast::types::{BaseType, TypeKind};
use crate::compiler::error::CompileError;

pub struct Analyzer {
    functions: HashMap<String, Function>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn analyze(program: &Program) -> Result<(), CompileError> {
        let mut analyzer = Self::new();
        analyzer.collect(program)?;
        analyzer.check_main()
    }

    fn collect(&mut self, program: &Program) -> Result<(), CompileError> {
        let mut seen_function = false;
        for item in &program.items {
            match item {
                TopLevel::Function(func) => {
                    self.functions.insert(func.name.clone(), func.clone());
                    seen_function = true;
                }
                TopLevel::VarDecl(decl) => {
                    if seen_function {
                        return Err(CompileError::semantic(format!(
                            "global `{}` declared after a function; globals must precede all functions",
                            decl.name
                        )));
                    }
                }
                TopLevel::Extern(_) => {}
                TopLevel::Include(target) => {
                    return Err(CompileError::semantic(format!(
                        "unexpanded include `{target}` reached the analyzer"
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_main(&self) -> Result<(), CompileError> {
        let main = self
            .functions
            .get("main")
            .ok_or_else(|| CompileError::semantic("program has no `main` function"))?;

        if !main.params.is_empty() {
            return Err(CompileError::semantic("`main` must take no parameters"));
        }

        let ok_return = matches!(
            main.return_type.kind,
            TypeKind::Scalar(BaseType::Int) | TypeKind::Scalar(BaseType::Int32)
        );
        if !ok_return {
            return Err(CompileError::semantic(
                "`main` must return `int` or `int32`",
            ));
        }

        Ok(())
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to call the analyzer.
pub fn analyze(program: &Program) -> Result<(), CompileError> {
    Analyzer::analyze(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{lexer, parser};

    fn analyze_src(src: &str) -> Result<(), CompileError> {
        let tokens = lexer::tokenize(src).unwrap();
        let program = parser::parse(tokens).unwrap();
        analyze(&program)
    }

    #[test]
    fn accepts_minimal_main() {
        assert!(analyze_src("fn main() -> int { ret 0; }").is_ok());
    }

    #[test]
    fn rejects_missing_main() {
        assert!(matches!(
            analyze_src("fn helper() -> int { ret 0; }"),
            Err(CompileError::SemanticError { .. })
        ));
    }

    #[test]
    fn rejects_main_with_params() {
        assert!(matches!(
            analyze_src("fn main(int x) -> int { ret x; }"),
            Err(CompileError::SemanticError { .. })
        ));
    }

    #[test]
    fn rejects_global_after_function() {
        assert!(matches!(
            analyze_src("fn main() -> int { ret 0; } int g = 1;"),
            Err(CompileError::SemanticError { .. })
        ));
    }
}
