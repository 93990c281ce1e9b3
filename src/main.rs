//! # Oxylang Compiler (oxyc) Executable
//!
//! The command-line entry point: two subcommands, `build` and `run`, both
//! thin wrappers around [`compiler::Compiler`]. `--target` accepts either
//! one of the three short platform names the generator understands
//! (`linux`, `windows`, `mac`) or a full target triple, validated with
//! `target_lexicon` and folded down to its operating system.

use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

mod ast;
mod codegen;
mod compiler;
mod debug;

use compiler::error::CompileError;
use compiler::Compiler;

fn main() {
    let matches = Command::new("oxyc")
        .version("0.1.0")
        .about("Oxylang compiler: lexes, parses, analyzes, and assembles .oxy sources to native binaries")
        .subcommand(
            Command::new("build")
                .about("Build an Oxylang source file")
                .arg(Arg::new("file").required(true).value_name("FILE").help("Oxylang source file to build"))
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("PATH")
                        .help("Output path; a .o extension assembles without linking"),
                )
                .arg(
                    Arg::new("target")
                        .long("target")
                        .value_name("TARGET")
                        .help("linux (default), windows, mac, or a full target triple"),
                )
                .arg(
                    Arg::new("show-asm")
                        .long("show-asm")
                        .action(ArgAction::SetTrue)
                        .help("Print the generated assembly instead of assembling it"),
                )
                .arg(
                    Arg::new("verbose")
                        .long("verbose")
                        .action(ArgAction::SetTrue)
                        .help("Print each pipeline stage as it runs"),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Build and immediately execute an Oxylang source file")
                .arg(Arg::new("file").required(true).value_name("FILE").help("Oxylang source file to run"))
                .arg(
                    Arg::new("verbose")
                        .long("verbose")
                        .action(ArgAction::SetTrue)
                        .help("Print each pipeline stage as it runs"),
                ),
        )
        .get_matches();

    let result = match matches.subcommand() {
        Some(("build", sub)) => run_build(sub),
        Some(("run", sub)) => run_run(sub),
        _ => {
            println!("Oxylang compiler (oxyc). Use 'oxyc --help' for usage.");
            return;
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run_build(sub: &clap::ArgMatches) -> Result<(), CompileError> {
    let source_path = PathBuf::from(sub.get_one::<String>("file").expect("required"));
    let output_path = output_path_for(sub.get_one::<String>("output"), &source_path);

    let mut compiler = Compiler::new(source_path, output_path);
    compiler.target = resolve_target(sub.get_one::<String>("target").map(String::as_str))?;
    compiler.show_asm = sub.get_flag("show-asm");
    compiler.verbose = sub.get_flag("verbose");
    compiler.build()
}

fn run_run(sub: &clap::ArgMatches) -> Result<(), CompileError> {
    let source_path = PathBuf::from(sub.get_one::<String>("file").expect("required"));
    let output_path = output_path_for(None, &source_path);

    let mut compiler = Compiler::new(source_path, output_path);
    compiler.verbose = sub.get_flag("verbose");
    compiler.run()
}

fn output_path_for(explicit: Option<&String>, source_path: &std::path::Path) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }
    source_path.with_extension("")
}

fn resolve_target(requested: Option<&str>) -> Result<String, CompileError> {
    let Some(requested) = requested else {
        return Ok("linux".to_string());
    };

    if matches!(requested, "linux" | "windows" | "mac") {
        return Ok(requested.to_string());
    }

    let triple = target_lexicon::Triple::from_str(requested)
        .map_err(|_| CompileError::unknown_target(requested.to_string()))?;

    Ok(match triple.operating_system {
        target_lexicon::OperatingSystem::Windows => "windows".to_string(),
        target_lexicon::OperatingSystem::Darwin(_) => "mac".to_string(),
        target_lexicon::OperatingSystem::Linux => "linux".to_string(),
        _ => return Err(CompileError::unknown_target(requested.to_string())),
    })
}
