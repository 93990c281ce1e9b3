//! # Statement Lowering
//!
//! Control flow (`if`/`while`/`for`/`break`/`continue`), local declarations,
//! and assignment targets. Assignment computes the target's *address*
//! first (into `rdx`), then evaluates the right-hand side, combines it with
//! whatever's already at that address for a compound operator, and stores
//! through `rdx` last — the same order the original generator uses, which
//! keeps the address computation from being disturbed by any registers the
//! right-hand side's evaluation clobbers.

use crate::ast::nodes::{BinOpKind, Expr, Function, Stmt, VarDecl};
use crate::codegen::common::{GeneratorState, ValueKind};
use crate::codegen::{expression, frame};
use crate::compiler::error::CompileError;

pub fn lower_function(state: &mut GeneratorState, func: &Function) -> Result<(), CompileError> {
    frame::collect_frame(state, func);
    let mangled = crate::codegen::call::mangled_name_for_decl(func);

    state.emit("");
    state.emit(format!("{mangled}:"));
    state.emit("    push rbp");
    state.emit("    mov rbp, rsp");
    if state.frame_size > 0 {
        state.emit(format!("    sub rsp, {}", state.frame_size));
    }

    let int_regs = ["rdi", "rsi", "rdx", "rcx", "r8", "r9"];
    let mut int_idx = 0usize;
    let mut float_idx = 0usize;
    for param in &func.params {
        let slot = state.locals[&param.name];
        if slot.ty.is_float() {
            state.emit(format!("    movsd [rbp{}], xmm{float_idx}", slot.offset));
            float_idx += 1;
        } else {
            let reg = int_regs
                .get(int_idx)
                .ok_or_else(|| CompileError::codegen("too many integer parameters for the register file"))?;
            state.emit(format!("    mov [rbp{}], {reg}", slot.offset));
            int_idx += 1;
        }
    }

    lower_block(state, &func.body)?;

    state.emit("    mov rsp, rbp");
    state.emit("    pop rbp");
    state.emit("    ret");
    Ok(())
}

pub fn lower_block(state: &mut GeneratorState, stmts: &[Stmt]) -> Result<(), CompileError> {
    for stmt in stmts {
        lower_stmt(state, stmt)?;
    }
    Ok(())
}

fn lower_stmt(state: &mut GeneratorState, stmt: &Stmt) -> Result<(), CompileError> {
    match stmt {
        Stmt::VarDecl(decl) => lower_var_decl(state, decl),
        Stmt::Return(value) => lower_return(state, value.as_ref()),
        Stmt::If { cond, then_branch, else_branch } => lower_if(state, cond, then_branch, else_branch),
        Stmt::While { cond, body } => lower_while(state, cond, body),
        Stmt::For { init, cond, step, body } => lower_for(state, init.as_ref(), cond.as_ref(), step.as_ref(), body),
        Stmt::Unsafe(body) => lower_block(state, body),
        Stmt::Break => lower_break(state),
        Stmt::Continue => lower_continue(state),
        Stmt::Expr(expr) => {
            expression::lower_expr(state, expr)?;
            Ok(())
        }
    }
}

fn lower_var_decl(state: &mut GeneratorState, decl: &VarDecl) -> Result<(), CompileError> {
    let Some(init) = &decl.init else { return Ok(()) };
    let value_kind = expression::lower_expr(state, init)?;
    let slot = state.locals[&decl.name];

    if slot.ty.is_float() {
        state.emit(format!("    movsd [rbp{}], xmm0", slot.offset));
    } else {
        if value_kind == ValueKind::Float {
            state.emit("    cvttsd2si rax, xmm0");
        }
        if slot.size == 1 {
            state.emit(format!("    mov byte [rbp{}], al", slot.offset));
        } else {
            state.emit(format!("    mov [rbp{}], rax", slot.offset));
        }
    }
    Ok(())
}

fn lower_return(state: &mut GeneratorState, value: Option<&Expr>) -> Result<(), CompileError> {
    if let Some(expr) = value {
        expression::lower_expr(state, expr)?;
    }
    state.emit("    mov rsp, rbp");
    state.emit("    pop rbp");
    state.emit("    ret");
    Ok(())
}

fn lower_if(state: &mut GeneratorState, cond: &Expr, then_branch: &[Stmt], else_branch: &[Stmt]) -> Result<(), CompileError> {
    let else_label = state.next_label("else");
    let end_label = state.next_label("endif");

    expression::lower_expr(state, cond)?;
    state.emit("    cmp rax, 0");
    state.emit(format!("    je {else_label}"));
    lower_block(state, then_branch)?;
    state.emit(format!("    jmp {end_label}"));
    state.emit(format!("{else_label}:"));
    lower_block(state, else_branch)?;
    state.emit(format!("{end_label}:"));
    Ok(())
}

fn lower_while(state: &mut GeneratorState, cond: &Expr, body: &[Stmt]) -> Result<(), CompileError> {
    let start = state.next_label("while");
    let end = state.next_label("endwhile");
    state.loop_stack.push((start.clone(), end.clone()));

    state.emit(format!("{start}:"));
    expression::lower_expr(state, cond)?;
    state.emit("    cmp rax, 0");
    state.emit(format!("    je {end}"));
    lower_block(state, body)?;
    state.emit(format!("    jmp {start}"));
    state.emit(format!("{end}:"));

    state.loop_stack.pop();
    Ok(())
}

fn lower_for(
    state: &mut GeneratorState,
    init: Option<&Expr>,
    cond: Option<&Expr>,
    step: Option<&Expr>,
    body: &[Stmt],
) -> Result<(), CompileError> {
    if let Some(init) = init {
        expression::lower_expr(state, init)?;
    }

    let start = state.next_label("for");
    let end = state.next_label("endfor");
    state.loop_stack.push((start.clone(), end.clone()));

    state.emit(format!("{start}:"));
    if let Some(cond) = cond {
        expression::lower_expr(state, cond)?;
        state.emit("    cmp rax, 0");
        state.emit(format!("    je {end}"));
    }
    lower_block(state, body)?;
    if let Some(step) = step {
        expression::lower_expr(state, step)?;
    }
    state.emit(format!("    jmp {start}"));
    state.emit(format!("{end}:"));

    state.loop_stack.pop();
    Ok(())
}

fn lower_break(state: &mut GeneratorState) -> Result<(), CompileError> {
    let (_, end) = state
        .loop_stack
        .last()
        .cloned()
        .ok_or_else(|| CompileError::codegen("`break` outside of a loop"))?;
    state.emit(format!("    jmp {end}"));
    Ok(())
}

fn lower_continue(state: &mut GeneratorState) -> Result<(), CompileError> {
    let (start, _) = state
        .loop_stack
        .last()
        .cloned()
        .ok_or_else(|| CompileError::codegen("`continue` outside of a loop"))?;
    state.emit(format!("    jmp {start}"));
    Ok(())
}

/// Dispatches an assignment (`ASSIGN` or one of the `_ASSIGN` compound
/// forms) by the shape of its left-hand side: a bare identifier, `*p`, or
/// `arr[i]`.
///
/// The target address is kept in `r10`, not `rdx`: `DIV_ASSIGN`/`MOD_ASSIGN`
/// need `cqo`/`idiv`, which clobber `rdx` as the dividend's high half, so
/// the address has to live somewhere `idiv` won't touch until the final
/// store.
pub(crate) fn lower_assignment(state: &mut GeneratorState, op: BinOpKind, target: &Expr, value: &Expr) -> Result<ValueKind, CompileError> {
    let (size, is_float) = match target {
        Expr::Identifier(name) => {
            if let Some(slot) = state.locals.get(name).copied() {
                state.emit(format!("    lea r10, [rbp{}]", slot.offset));
                (slot.size, slot.ty.is_float())
            } else if let Some(global) = state.find_global(name) {
                state.emit(format!("    lea r10, [{name}]"));
                (global.size, global.ty.is_float())
            } else {
                return Err(CompileError::codegen(format!("undefined variable `{name}`")));
            }
        }
        Expr::Deref(pointer) => {
            expression::lower_expr(state, pointer)?;
            state.emit("    mov r10, rax");
            (8, false)
        }
        Expr::ArrayIndex { base, index } => {
            expression::lower_array_address(state, base, index)?;
            state.emit("    mov r10, rax");
            (8, false)
        }
        other => return Err(CompileError::codegen(format!("invalid assignment target {other:?}"))),
    };

    let rhs_kind = expression::lower_expr(state, value)?;
    if rhs_kind == ValueKind::Float && !is_float {
        state.emit("    cvttsd2si rax, xmm0");
    }
    state.emit("    mov rcx, rax");

    match op {
        BinOpKind::Assign => state.emit("    mov rax, rcx"),
        BinOpKind::PlusAssign => {
            load_through_r10(state, size);
            state.emit("    add rax, rcx");
        }
        BinOpKind::MinusAssign => {
            load_through_r10(state, size);
            state.emit("    sub rax, rcx");
        }
        BinOpKind::MulAssign => {
            load_through_r10(state, size);
            state.emit("    imul rax, rcx");
        }
        BinOpKind::DivAssign => {
            load_through_r10(state, size);
            state.emit("    cqo");
            state.emit("    idiv rcx");
        }
        BinOpKind::ModAssign => {
            load_through_r10(state, size);
            state.emit("    cqo");
            state.emit("    idiv rcx");
            state.emit("    mov rax, rdx");
        }
        other => return Err(CompileError::codegen(format!("{other:?} is not a supported assignment operator"))),
    }

    let result_kind = if is_float { ValueKind::Float } else { ValueKind::Int };
    if is_float {
        state.emit("    movsd [r10], xmm0");
    } else if size == 1 {
        state.emit("    mov byte [r10], al");
    } else {
        state.emit("    mov [r10], rax");
    }
    Ok(result_kind)
}

fn load_through_r10(state: &mut GeneratorState, size: u64) {
    if size == 1 {
        state.emit("    movzx rax, byte [r10]");
    } else {
        state.emit("    mov rax, [r10]");
    }
}
