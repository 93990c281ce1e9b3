//! # Expression Lowering
//!
//! Every lowering function here leaves its result in `rax` (an
//! integer-classed value) or `xmm0` (a float-classed value) and returns
//! which one via [`ValueKind`], the same convention the original compiler
//! uses — `gen_expr` returning `"INT"`/`"FLOAT"` to its caller so a binary
//! operator knows whether to widen.
//!
//! `++`/`--` and address-of are restricted to identifier, dereference, and
//! array-index operands, matching the grammar: there is no way to write
//! `(a + b)++` and have it mean anything.

use crate::ast::nodes::{BinOpKind, Expr, NumberLit};
use crate::codegen::call;
use crate::codegen::common::{GeneratorState, ValueKind};
use crate::codegen::statement;
use crate::compiler::error::CompileError;

pub fn lower_expr(state: &mut GeneratorState, expr: &Expr) -> Result<ValueKind, CompileError> {
    match expr {
        Expr::Number(NumberLit::Int(n)) => {
            state.emit(format!("    mov rax, {n}"));
            Ok(ValueKind::Int)
        }
        Expr::Number(NumberLit::Float(f)) => {
            let label = state.intern_float(f.to_bits());
            state.emit(format!("    movsd xmm0, [{label}]"));
            Ok(ValueKind::Float)
        }
        Expr::Str(s) => {
            let label = state.intern_string(s);
            state.emit(format!("    lea rax, [{label}]"));
            Ok(ValueKind::Int)
        }
        Expr::CharLit(c) => {
            state.emit(format!("    mov rax, {}", *c as u32));
            Ok(ValueKind::Int)
        }
        Expr::Identifier(name) => lower_identifier_load(state, name),
        Expr::AddrOf(inner) => lower_addr_of(state, inner),
        Expr::Deref(inner) => {
            lower_expr(state, inner)?;
            state.emit("    movzx rax, byte [rax]");
            Ok(ValueKind::Int)
        }
        Expr::ArrayIndex { base, index } => {
            lower_array_address(state, base, index)?;
            state.emit("    movzx rax, byte [rax]");
            Ok(ValueKind::Int)
        }
        Expr::UnaryMinus(inner) => {
            let kind = lower_expr(state, inner)?;
            match kind {
                ValueKind::Int => state.emit("    neg rax"),
                ValueKind::Float => {
                    state.emit("    movq rax, xmm0");
                    state.emit("    btc rax, 63");
                    state.emit("    movq xmm0, rax");
                }
            }
            Ok(kind)
        }
        Expr::PreInc(inner) => lower_incdec(state, inner, true, false),
        Expr::PreDec(inner) => lower_incdec(state, inner, false, false),
        Expr::PostInc(inner) => lower_incdec(state, inner, true, true),
        Expr::PostDec(inner) => lower_incdec(state, inner, false, true),
        Expr::Call { name, args } => call::lower_call(state, name, args),
        Expr::BinOp { op, left, right } => {
            if op.is_assignment() {
                statement::lower_assignment(state, *op, left, right)
            } else {
                lower_binary(state, *op, left, right)
            }
        }
    }
}

pub(crate) fn lower_identifier_load(state: &mut GeneratorState, name: &str) -> Result<ValueKind, CompileError> {
    if let Some(slot) = state.locals.get(name).copied() {
        if slot.ty.is_float() {
            state.emit(format!("    movsd xmm0, [rbp{}]", slot.offset));
            Ok(ValueKind::Float)
        } else if slot.size == 1 {
            state.emit(format!("    movzx rax, byte [rbp{}]", slot.offset));
            Ok(ValueKind::Int)
        } else {
            state.emit(format!("    mov rax, [rbp{}]", slot.offset));
            Ok(ValueKind::Int)
        }
    } else if let Some(global) = state.find_global(name) {
        if global.size == 1 {
            state.emit(format!("    movzx rax, byte [{name}]"));
        } else {
            state.emit(format!("    mov rax, [{name}]"));
        }
        Ok(ValueKind::Int)
    } else {
        Err(CompileError::codegen(format!("undefined variable `{name}`")))
    }
}

fn lower_addr_of(state: &mut GeneratorState, inner: &Expr) -> Result<ValueKind, CompileError> {
    match inner {
        Expr::Identifier(name) => {
            lower_identifier_address(state, name)?;
            Ok(ValueKind::Int)
        }
        Expr::ArrayIndex { base, index } => {
            lower_array_address(state, base, index)?;
            Ok(ValueKind::Int)
        }
        other => Err(CompileError::codegen(format!(
            "can only take the address of identifiers and array elements, found {other:?}"
        ))),
    }
}

pub(crate) fn lower_identifier_address(state: &mut GeneratorState, name: &str) -> Result<(), CompileError> {
    if let Some(slot) = state.locals.get(name).copied() {
        state.emit(format!("    lea rax, [rbp{}]", slot.offset));
        Ok(())
    } else if state.find_global(name).is_some() {
        state.emit(format!("    lea rax, [{name}]"));
        Ok(())
    } else {
        Err(CompileError::codegen(format!("undefined variable `{name}`")))
    }
}

pub(crate) fn lower_array_address(state: &mut GeneratorState, base: &Expr, index: &Expr) -> Result<(), CompileError> {
    lower_expr(state, index)?;
    state.emit("    push rax");
    lower_expr(state, base)?;
    state.emit("    pop rcx");
    state.emit("    add rax, rcx");
    Ok(())
}

fn lower_incdec(state: &mut GeneratorState, inner: &Expr, increment: bool, is_post: bool) -> Result<ValueKind, CompileError> {
    let name = match inner {
        Expr::Identifier(name) => name,
        other => {
            return Err(CompileError::codegen(format!(
                "++/-- target must be an identifier, found {other:?}"
            )));
        }
    };

    let slot = state
        .locals
        .get(name)
        .copied()
        .ok_or_else(|| CompileError::codegen(format!("undefined variable `{name}`")))?;
    if slot.ty.is_float() {
        return Err(CompileError::codegen("++/-- on float operands is unsupported"));
    }

    let delta_op = if increment { "add" } else { "sub" };
    if slot.size == 1 {
        state.emit(format!("    movzx rax, byte [rbp{}]", slot.offset));
        if is_post {
            state.emit("    push rax");
        }
        state.emit(format!("    {delta_op} al, 1"));
        state.emit(format!("    mov byte [rbp{}], al", slot.offset));
        if is_post {
            state.emit("    pop rax");
        } else {
            state.emit(format!("    movzx rax, byte [rbp{}]", slot.offset));
        }
    } else {
        state.emit(format!("    mov rax, [rbp{}]", slot.offset));
        if is_post {
            state.emit("    push rax");
        }
        state.emit(format!("    {delta_op} rax, 1"));
        state.emit(format!("    mov [rbp{}], rax", slot.offset));
        if is_post {
            state.emit("    pop rax");
        }
    }
    Ok(ValueKind::Int)
}

/// Evaluates `left` then `right`, widening whichever side is `INT` to
/// `FLOAT` if the other side is `FLOAT`, and dispatches to the
/// integer/float operator tables. Shared by plain binary expressions and
/// by compound-assignment's "read, combine with rhs" step.
pub(crate) fn lower_binary(state: &mut GeneratorState, op: BinOpKind, left: &Expr, right: &Expr) -> Result<ValueKind, CompileError> {
    let left_kind = lower_expr(state, left)?;
    match left_kind {
        ValueKind::Float => {
            state.emit("    sub rsp, 8");
            state.emit("    movsd [rsp], xmm0");
        }
        ValueKind::Int => state.emit("    push rax"),
    }

    let right_kind = lower_expr(state, right)?;

    if left_kind == ValueKind::Float || right_kind == ValueKind::Float {
        if right_kind == ValueKind::Int {
            state.emit("    cvtsi2sd xmm0, rax");
        }
        state.emit("    movsd xmm1, xmm0");

        if left_kind == ValueKind::Float {
            state.emit("    movsd xmm0, [rsp]");
            state.emit("    add rsp, 8");
        } else {
            state.emit("    pop rax");
            state.emit("    cvtsi2sd xmm0, rax");
        }

        if op.is_comparison() {
            emit_float_cmp(state, op)?;
            Ok(ValueKind::Int)
        } else {
            emit_float_binop(state, op)?;
            Ok(ValueKind::Float)
        }
    } else {
        state.emit("    mov rcx, rax");
        state.emit("    pop rax");
        emit_int_binop(state, op)?;
        Ok(ValueKind::Int)
    }
}

fn emit_int_binop(state: &mut GeneratorState, op: BinOpKind) -> Result<(), CompileError> {
    match op {
        BinOpKind::Add => state.emit("    add rax, rcx"),
        BinOpKind::Sub => state.emit("    sub rax, rcx"),
        BinOpKind::Mul => state.emit("    imul rax, rcx"),
        BinOpKind::Div => {
            state.emit("    cqo");
            state.emit("    idiv rcx");
        }
        BinOpKind::Mod => {
            state.emit("    cqo");
            state.emit("    idiv rcx");
            state.emit("    mov rax, rdx");
        }
        BinOpKind::Pow => {
            state.emit("    mov rbx, rax");
            state.emit("    mov rax, 1");
            let pow_loop = state.next_label("pow_loop");
            let end_pow = state.next_label("end_pow");
            state.emit(format!("{pow_loop}:"));
            state.emit("    cmp rcx, 0");
            state.emit(format!("    je {end_pow}"));
            state.emit("    imul rax, rbx");
            state.emit("    dec rcx");
            state.emit(format!("    jmp {pow_loop}"));
            state.emit(format!("{end_pow}:"));
        }
        BinOpKind::Eq | BinOpKind::Ne | BinOpKind::Lt | BinOpKind::Le | BinOpKind::Gt | BinOpKind::Ge => {
            state.emit("    cmp rax, rcx");
            state.emit(format!("    {} al", int_setcc(op)));
            state.emit("    movzx rax, al");
        }
        BinOpKind::And => {
            state.emit("    test rax, rax");
            state.emit("    setne al");
            state.emit("    test rcx, rcx");
            state.emit("    setne cl");
            state.emit("    and al, cl");
            state.emit("    movzx rax, al");
        }
        BinOpKind::Or => {
            state.emit("    test rax, rax");
            state.emit("    setne al");
            state.emit("    test rcx, rcx");
            state.emit("    setne cl");
            state.emit("    or al, cl");
            state.emit("    movzx rax, al");
        }
        BinOpKind::Assign
        | BinOpKind::PlusAssign
        | BinOpKind::MinusAssign
        | BinOpKind::MulAssign
        | BinOpKind::DivAssign
        | BinOpKind::ModAssign => {
            return Err(CompileError::codegen("assignment operators are not binary arithmetic operators"));
        }
    }
    Ok(())
}

fn int_setcc(op: BinOpKind) -> &'static str {
    match op {
        BinOpKind::Eq => "sete",
        BinOpKind::Ne => "setne",
        BinOpKind::Lt => "setl",
        BinOpKind::Le => "setle",
        BinOpKind::Gt => "setg",
        BinOpKind::Ge => "setge",
        _ => unreachable!("int_setcc only called for comparison operators"),
    }
}

fn emit_float_binop(state: &mut GeneratorState, op: BinOpKind) -> Result<(), CompileError> {
    match op {
        BinOpKind::Add => state.emit("    addsd xmm0, xmm1"),
        BinOpKind::Sub => state.emit("    subsd xmm0, xmm1"),
        BinOpKind::Mul => state.emit("    mulsd xmm0, xmm1"),
        BinOpKind::Div => state.emit("    divsd xmm0, xmm1"),
        other => return Err(CompileError::codegen(format!("{other:?} is unsupported for float operands"))),
    }
    Ok(())
}

fn emit_float_cmp(state: &mut GeneratorState, op: BinOpKind) -> Result<(), CompileError> {
    state.emit("    ucomisd xmm0, xmm1");
    let setcc = match op {
        BinOpKind::Eq => "sete",
        BinOpKind::Ne => "setne",
        BinOpKind::Lt => "setb",
        BinOpKind::Le => "setbe",
        BinOpKind::Gt => "seta",
        BinOpKind::Ge => "setae",
        other => return Err(CompileError::codegen(format!("{other:?} is not a comparison operator"))),
    };
    state.emit(format!("    {setcc} al"));
    state.emit("    movzx rax, al");
    Ok(())
}
