//! Golden-program tests for the full lex → parse → preprocess → analyze →
//! codegen pipeline, covering the end-to-end scenarios from the compiler's
//! design document. The sandbox these tests run in has no `nasm`/linker, so
//! none of them assemble or execute the result; instead, each scenario
//! asserts on properties of the emitted NASM text that, if true, are enough
//! to reconstruct the exit status a real assemble-link-run would observe
//! (the return value ends up in `rax` right before the epilogue, so the
//! sequence of instructions feeding `rax` at that point is the behavior).

use oxyc::{analyze, parse, preprocess, tokenize, OxylangAssemblyGenerator};

/// Runs the full pipeline short of assembling/linking and returns the
/// generated assembly text.
fn compile(src: &str) -> String {
    let tokens = tokenize(src).expect("lex");
    let program = parse(tokens).expect("parse");
    let program = preprocess(std::path::Path::new("golden.oxy"), program).expect("preprocess");
    analyze(&program).expect("analyze");
    let mut generator = OxylangAssemblyGenerator::new();
    generator.generate(&program).expect("codegen")
}

/// Finds the one label of the form `{prefix}{digits}:` in `asm` — e.g.
/// `label_with_prefix(asm, "while")` returns `"while3"` given a line
/// `while3:`. Labels are assigned from a single monotonically increasing
/// counter shared across every construct in the unit, so two different
/// loops never share a numeric suffix; tests that need a loop's start/end
/// pair look each one up by prefix instead of hardcoding the number.
fn label_with_prefix(asm: &str, prefix: &str) -> String {
    asm.lines()
        .map(str::trim)
        .find(|line| {
            line.strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(':'))
                .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        })
        .unwrap_or_else(|| panic!("no label with prefix `{prefix}` found in:\n{asm}"))
        .trim_end_matches(':')
        .to_string()
}

/// Slices out `main`'s body, from its label up to (and including) its
/// first `ret`. Only meaningful for the single-`ret`, no-nested-function
/// scenarios these tests use `main` for.
fn main_body(asm: &str) -> &str {
    let start = asm.find("main:").expect("main label");
    let rest = &asm[start..];
    let ret_offset = rest.find("    ret").expect("a ret in main's body");
    &rest[..ret_offset + "    ret".len()]
}

#[test]
fn scenario_return_constant_exits_with_that_status() {
    // fn main() -> int { ret 42; }  exits 42.
    let asm = compile("fn main() -> int { ret 42; }");
    let body = main_body(&asm);
    assert!(body.contains("mov rax, 42"));
    assert!(body.trim_end().ends_with("ret"));
}

#[test]
fn scenario_recursive_factorial_compiles_and_calls_itself() {
    // fn factorial(int n) -> int { if (n <= 1) { ret 1; } ret n * factorial(n-1); }
    // fn main() -> int { ret factorial(5); } exits 120.
    let asm = compile(
        "fn factorial(int n) -> int { if (n <= 1) { ret 1; } ret n * factorial(n-1); } \
         fn main() -> int { ret factorial(5); }",
    );
    // factorial takes one INT parameter, so both its own definition and the
    // recursive call inside it must mangle to the same symbol.
    assert!(asm.contains("factorial__INT:"));
    assert!(asm.contains("call factorial__INT"));
    // The base case compares against 1 with setle (n <= 1).
    assert!(asm.contains("setle al"));
}

#[test]
fn scenario_modulo_of_integer_literals() {
    // fn main() -> int { int x = 10 % 3; ret x; } exits 1.
    let asm = compile("fn main() -> int { int x = 10 % 3; ret x; }");
    assert!(asm.contains("    cqo"));
    assert!(asm.contains("    idiv rcx"));
    assert!(asm.contains("    mov rax, rdx"));
}

#[test]
fn scenario_dereferenced_string_literal_loads_a_byte() {
    // fn main() -> int { char* s = "hi"; char c = *s; ret c; } exits 104 ('h').
    let asm = compile(r#"fn main() -> int { char* s = "hi"; char c = *s; ret c; }"#);
    assert!(asm.contains("LC0: db \"hi\", 0"));
    assert!(asm.contains("    movzx rax, byte [rax]"));
}

#[test]
fn scenario_for_loop_accumulator_has_balanced_loop_labels() {
    // A `for` loop summing 1..10 into an accumulator.
    let asm = compile(
        "fn main() -> int { int sum = 0; int i = 1; \
         for (i = 1; i <= 10; i = i + 1) { sum = sum + i; } ret sum; }",
    );
    let start = label_with_prefix(&asm, "for");
    let end = label_with_prefix(&asm, "endfor");
    assert!(asm.contains(&format!("{start}:")));
    assert!(asm.contains(&format!("{end}:")));
    assert!(asm.contains(&format!("    jmp {start}")));
    assert!(asm.contains(&format!("    je {end}")));
}

#[test]
fn scenario_mixed_float_and_int_arithmetic_truncates_on_store() {
    // float a = 1.5; int b = 2; int c = a * b; stores a truncated 3 into c.
    let asm = compile(
        "fn main() -> int { float a = 1.5; int b = 2; int c = a * b; ret c; }",
    );
    // `b` (int) is widened to float before the multiply.
    assert!(asm.contains("    cvtsi2sd xmm0, rax"));
    assert!(asm.contains("    mulsd xmm0, xmm1"));
    // Storing the float product into the int local `c` truncates it.
    assert!(asm.contains("    cvttsd2si rax, xmm0"));
    assert!(asm.contains("float1: dq"));
}

#[test]
fn every_while_and_for_loop_push_is_matched_by_a_pop() {
    let asm = compile(
        "fn main() -> int { \
             int i = 0; \
             while (i < 5) { if (i == 2) { break; } i = i + 1; } \
             for (i = 0; i < 5; i = i + 1) { if (i == 2) { continue; } } \
             ret 0; \
         }",
    );
    // Every generated loop start label has a matching end label, and
    // `break`/`continue` inside each loop resolve against it without error
    // (codegen would have failed with BreakOutsideLoop/ContinueOutsideLoop
    // otherwise, and `compile` already unwraps that Result). `break` jumps
    // to the enclosing loop's end; `continue` jumps back to its start.
    let while_start = label_with_prefix(&asm, "while");
    let while_end = label_with_prefix(&asm, "endwhile");
    assert!(asm.contains(&format!("{while_start}:")));
    assert!(asm.contains(&format!("{while_end}:")));
    assert!(asm.contains(&format!("    jmp {while_end}")), "break should jump to the while's end label");

    let for_start = label_with_prefix(&asm, "for");
    let for_end = label_with_prefix(&asm, "endfor");
    assert!(asm.contains(&format!("{for_start}:")));
    assert!(asm.contains(&format!("{for_end}:")));
    assert!(asm.contains(&format!("    jmp {for_start}")), "continue should jump back to the for's start label");
}

#[test]
fn string_literal_repeated_across_calls_is_emitted_exactly_once() {
    let asm = compile(
        r#"fn main() -> int { puts("same"); puts("same"); puts("same"); ret 0; }"#,
    );
    assert_eq!(asm.matches("db \"same\", 0").count(), 1);
}

#[test]
fn frame_size_for_every_function_is_16_byte_aligned() {
    let asm = compile(
        "fn three_locals(int a) -> int { char b; int c; float d; ret a; } \
         fn main() -> int { ret three_locals(1); }",
    );
    for line in asm.lines() {
        if let Some(rest) = line.trim_start().strip_prefix("sub rsp, ") {
            let amount: i64 = rest.trim().parse().expect("numeric frame size");
            assert_eq!(amount % 16, 0, "frame size {amount} is not 16-byte aligned");
        }
    }
}

#[test]
fn array_index_assignment_computes_address_then_stores_through_it() {
    let asm = compile(
        "fn main() -> int { char buf[4]; buf[0] = 65; ret buf[0]; }",
    );
    // `lower_array_address` combines the index and base into `rax`, which
    // the assignment path then holds in `r10` for the final store.
    assert!(asm.contains("    mov r10, rax"));
    assert!(asm.contains("    mov [r10], rax"));
    // Reading `buf[0]` back always loads a single zero-extended byte.
    assert!(asm.contains("    movzx rax, byte [rax]"));
}

/// Removes the dropped-in include fixture even if an assertion above it
/// panics, so a failing run doesn't leave a stray `.oxy` file in the crate
/// root for the next test invocation to trip over.
struct TempInclude(std::path::PathBuf);

impl Drop for TempInclude {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn include_is_fully_expanded_before_codegen_sees_it() {
    // `Preprocessor::resolve` checks the working directory before the
    // bundled `includes/` directory, so dropping a fixture into `cargo
    // test`'s cwd (the package root) exercises that first lookup path
    // without depending on where the test binary itself lives.
    let fixture_path = std::path::PathBuf::from("golden_include_fixture.oxy");
    std::fs::write(&fixture_path, "extern helper_symbol;\n").expect("write fixture");
    let _guard = TempInclude(fixture_path);

    let asm = compile(
        r#"include "golden_include_fixture.oxy"; fn main() -> int { ret 0; }"#,
    );
    assert!(asm.contains("extern helper_symbol"));
}
