//! # Include Preprocessor
//!
//! Expands `include` directives by re-running the lexer and parser over the
//! target file and splicing its top-level items in place of the `INCLUDE`
//! node, recursively. Each include target is fully processed at most once
//! per compilation; a target reached again — directly or through another
//! include — contributes nothing the second time.
//!
//! Identity for that "already processed" check is the canonicalized
//! filesystem path, not the include string as written, so two different
//! spellings of the same file (`"a.oxy"` from two different directories, or
//! via a relative vs. absolute route) cannot both be spliced in.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ast::nodes::{Program, TopLevel};
use crate::compiler::error::CompileError;
use crate::compiler::{lexer, parser};

const SOURCE_SUFFIX: &str = ".oxy";

/// The compiler-bundled fallback directory searched after the working
/// directory, per the module lookup contract: `<dir containing the running
/// binary>/includes`.
pub fn default_includes_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("includes")))
        .unwrap_or_else(|| PathBuf::from("includes"))
}

pub struct Preprocessor {
    includes_dir: PathBuf,
    visited: HashSet<PathBuf>,
}

impl Preprocessor {
    pub fn new(includes_dir: impl Into<PathBuf>) -> Self {
        Self {
            includes_dir: includes_dir.into(),
            visited: HashSet::new(),
        }
    }

    /// Locates an include target: the working directory first, then the
    /// bundled `includes` directory.
    fn resolve(&self, filename: &str) -> Result<PathBuf, CompileError> {
        if !filename.ends_with(SOURCE_SUFFIX) {
            return Err(CompileError::preprocess(format!(
                "module `{filename}` must be a {SOURCE_SUFFIX} file"
            )));
        }

        let cwd_candidate = PathBuf::from(filename);
        if cwd_candidate.is_file() {
            return Ok(cwd_candidate);
        }

        let bundled_candidate = self.includes_dir.join(filename);
        if bundled_candidate.is_file() {
            return Ok(bundled_candidate);
        }

        Err(CompileError::preprocess(format!(
            "could not find module '{filename}'"
        )))
    }

    fn process_file(&mut self, filename: &str) -> Result<Program, CompileError> {
        let path = self.resolve(filename)?;
        let canonical = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());

        if !self.visited.insert(canonical) {
            return Ok(Program { items: Vec::new() });
        }

        let source = fs::read_to_string(&path)?;
        let tokens = lexer::tokenize(&source)?;
        let program = parser::parse(tokens)?;
        self.expand(program)
    }

    fn expand(&mut self, program: Program) -> Result<Program, CompileError> {
        let mut items = Vec::with_capacity(program.items.len());
        for item in program.items {
            match item {
                TopLevel::Include(target) => {
                    let expanded = self.process_file(&target)?;
                    items.extend(expanded.items);
                }
                other => items.push(other),
            }
        }
        Ok(Program { items })
    }
}

/// Expands every `include` reachable from `program`, which was parsed from
/// `entry_path` (used to seed the "already visited" set so the entry file
/// itself can't be re-included).
pub fn preprocess(entry_path: &Path, program: Program) -> Result<Program, CompileError> {
    let mut pp = Preprocessor::new(default_includes_dir());
    if let Ok(canonical) = fs::canonicalize(entry_path) {
        pp.visited.insert(canonical);
    }
    pp.expand(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_oxy_target() {
        let mut pp = Preprocessor::new("includes");
        assert!(matches!(
            pp.resolve("helpers.txt"),
            Err(CompileError::PreprocessError { .. })
        ));
    }

    #[test]
    fn missing_target_is_reported() {
        let mut pp = Preprocessor::new("does-not-exist-includes-dir");
        assert!(matches!(
            pp.resolve("nowhere.oxy"),
            Err(CompileError::PreprocessError { .. })
        ));
    }
}
