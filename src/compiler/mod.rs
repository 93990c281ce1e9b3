//! # Compiler Module
//!
//! This module is the core entry point and orchestrator for the Oxylang
//! compiler. It aggregates the pipeline stages (lexer, parser,
//! preprocessor, analyzer, generator) and defines the [`Compiler`] struct
//! responsible for the build/run lifecycle of an Oxylang source file:
//! lexing, parsing, include expansion, semantic analysis, assembly
//! generation, and — unless `--show-asm` is given — invoking `nasm` and a
//! linker on the result.

pub mod analyzer;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod preprocessor;

pub use analyzer::analyze;
pub use lexer::tokenize;
pub use parser::parse;
pub use preprocessor::preprocess;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::codegen::oxy_asm::OxylangAssemblyGenerator;
use crate::debug::{self, PerfTimer};
use error::CompileError;

const SOURCE_SUFFIX: &str = "oxy";

/// The central structure that manages compiling, assembling, linking, and
/// running a single Oxylang source file.
pub struct Compiler {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    /// `"linux"` (default), `"windows"`, or `"mac"` — validated against
    /// `target_lexicon::Triple` by the CLI layer before reaching here.
    pub target: String,
    pub show_asm: bool,
    pub verbose: bool,
}

impl Compiler {
    pub fn new(source_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            source_path,
            output_path,
            target: "linux".to_string(),
            show_asm: false,
            verbose: false,
        }
    }

    /// Runs the full pipeline and, unless `show_asm` is set, assembles (and
    /// links, if `output_path` doesn't name an object file) the result.
    pub fn build(&self) -> Result<(), CompileError> {
        if !self.source_path.is_file() || !self.is_oxy_file(&self.source_path) {
            return Err(CompileError::NoSourceFiles);
        }

        let _timer = PerfTimer::new("build");
        self.log_verbose(&format!("compiling {:?}", self.source_path));

        let content = fs::read_to_string(&self.source_path)?;
        let tokens = tokenize(&content)?;
        debug::log_lexer(&format!("{} tokens", tokens.len()));

        let program = parse(tokens)?;
        let program = preprocess(&self.source_path, program)?;
        debug::log_parser(&format!("{} top-level items", program.items.len()));

        analyze(&program)?;

        let mut generator = OxylangAssemblyGenerator::new();
        let asm = generator.generate(&program)?;
        debug::log_codegen(&format!("{} lines emitted", asm.lines().count()));

        if self.show_asm {
            println!("{asm}");
            return Ok(());
        }

        let asm_path = self.output_path.with_extension("asm");
        if let Some(parent) = asm_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&asm_path, &asm)?;

        self.assemble_and_link(&asm_path)
    }

    /// Builds, then executes the resulting binary, propagating its exit
    /// status as an error if non-zero.
    pub fn run(&self) -> Result<(), CompileError> {
        self.build()?;
        self.execute_binary()
    }

    fn assemble_and_link(&self, asm_path: &Path) -> Result<(), CompileError> {
        let object_only = self
            .output_path
            .extension()
            .is_some_and(|ext| ext == "o");

        let obj_path = if object_only {
            self.output_path.clone()
        } else {
            self.output_path.with_extension("o")
        };

        self.log_verbose("assembling...");
        let assemble_status = Command::new("nasm")
            .arg("-f")
            .arg(self.target_assembly_format())
            .arg(asm_path)
            .arg("-o")
            .arg(&obj_path)
            .status()
            .map_err(CompileError::ExecutionError)?;

        if !assemble_status.success() {
            return Err(CompileError::ExecutionFailed(assemble_status));
        }

        if object_only {
            return Ok(());
        }

        self.log_verbose("linking...");
        match self.link(&obj_path, &self.output_path) {
            Ok(()) => {
                self.make_executable(&self.output_path)?;
                Ok(())
            }
            Err(primary_err) => self
                .link_with_alternative(&obj_path, &self.output_path)
                .map_err(|_| primary_err),
        }
    }

    fn link(&self, obj_path: &Path, output_path: &Path) -> Result<(), CompileError> {
        let linker = self.target_linker();
        let mut command = Command::new(linker);
        command.arg(obj_path).arg("-o").arg(output_path);
        if linker == "gcc" {
            command.arg("-nostartfiles").arg("-no-pie");
        }

        let status = command.status().map_err(CompileError::ExecutionError)?;
        if status.success() {
            Ok(())
        } else {
            Err(CompileError::ExecutionFailed(status))
        }
    }

    fn link_with_alternative(&self, obj_path: &Path, output_path: &Path) -> Result<(), CompileError> {
        let alternative = if self.target_linker() == "ld" { "gcc" } else { "ld" };
        let mut command = Command::new(alternative);
        command.arg(obj_path).arg("-o").arg(output_path);
        if alternative == "gcc" {
            command.arg("-nostartfiles").arg("-no-pie");
        }

        let status = command.status().map_err(CompileError::ExecutionError)?;
        if status.success() {
            self.make_executable(output_path)?;
            Ok(())
        } else {
            Err(CompileError::ExecutionFailed(status))
        }
    }

    fn execute_binary(&self) -> Result<(), CompileError> {
        if !self.output_path.exists() {
            return Err(CompileError::BinaryNotFound);
        }

        let status = Command::new(&self.output_path)
            .status()
            .map_err(CompileError::ExecutionError)?;

        if status.success() {
            Ok(())
        } else {
            Err(CompileError::ExecutionFailed(status))
        }
    }

    fn is_oxy_file(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == SOURCE_SUFFIX)
    }

    fn target_assembly_format(&self) -> &str {
        match self.target.as_str() {
            "windows" => "win64",
            "mac" => "macho64",
            _ => "elf64",
        }
    }

    fn target_linker(&self) -> &str {
        match self.target.as_str() {
            "windows" => "gcc",
            _ => "ld",
        }
    }

    fn make_executable(&self, path: &Path) -> Result<(), CompileError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Ok(metadata) = fs::metadata(path) {
                let mut perms = metadata.permissions();
                perms.set_mode(0o755);
                fs::set_permissions(path, perms)?;
            }
        }
        Ok(())
    }

    fn log_verbose(&self, message: &str) {
        if self.verbose {
            println!("{message}");
        }
    }
}
