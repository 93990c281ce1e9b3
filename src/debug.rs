//! # Debug and Timing Utilities
//!
//! Conditional logging and coarse timing for the compiler pipeline, gated
//! by environment variables rather than a log-level filter — there is only
//! one level of verbosity per concern, and most invocations of `oxyc` never
//! want to see any of it.

use std::time::Instant;

/// `OXYC_DEBUG` (or a debug build) turns on per-stage token/AST/assembly
/// summaries.
pub fn is_debug_enabled() -> bool {
    std::env::var("OXYC_DEBUG").is_ok() || cfg!(debug_assertions)
}

/// `OXYC_VERBOSE` turns on [`PerfTimer`] output.
pub fn is_perf_enabled() -> bool {
    std::env::var("OXYC_VERBOSE").is_ok()
}

pub fn log_lexer(msg: &str) {
    if is_debug_enabled() {
        eprintln!("[lexer] {msg}");
    }
}

pub fn log_parser(msg: &str) {
    if is_debug_enabled() {
        eprintln!("[parser] {msg}");
    }
}

pub fn log_codegen(msg: &str) {
    if is_debug_enabled() {
        eprintln!("[codegen] {msg}");
    }
}

pub fn log_compiler(msg: &str) {
    if is_debug_enabled() {
        eprintln!("[compiler] {msg}");
    }
}

/// Times a labeled span for as long as it stays in scope, reporting on
/// `Drop` so an early `?` return out of the timed block still gets timed.
pub struct PerfTimer {
    start: Instant,
    label: String,
}

impl PerfTimer {
    pub fn new(label: &str) -> Self {
        Self { start: Instant::now(), label: label.to_string() }
    }
}

impl Drop for PerfTimer {
    fn drop(&mut self) {
        if is_perf_enabled() {
            eprintln!("[perf] {}: {:?}", self.label, self.start.elapsed());
        }
    }
}
