//! # Frame Layout
//!
//! Assigns every parameter and local variable of a function its own
//! negative offset from `rbp`, then aligns the total frame size up to 16
//! bytes. Parameters are allocated first, in declaration order — they
//! arrive in argument registers and the prologue copies them straight into
//! these same slots. Locals are then discovered by a recursive walk of the
//! body: a `VAR_DECL` can appear nested inside `if`/`while`/`for`/`unsafe`
//! blocks, and each one still needs a slot of its own even though Oxylang
//! has no block scoping to speak of (every local lives for the whole
//! function).
//!
//! A name redeclared in two different branches only gets one slot — the
//! second declaration reuses the first's offset, mirroring a flat,
//! function-wide symbol table rather than nested scopes.

use crate::ast::nodes::{Function, Stmt};
use crate::ast::types::TypeKind;
use crate::codegen::common::{GeneratorState, LocalSlot};

pub fn collect_frame(state: &mut GeneratorState, func: &Function) {
    state.locals.clear();
    state.frame_size = 0;

    for param in &func.params {
        alloc_local(state, &param.name, param.ty.kind, param.ty.array_size);
    }
    collect_from_body(state, &func.body);
    state.frame_size = align_up(state.frame_size, 16);
}

fn collect_from_body(state: &mut GeneratorState, body: &[Stmt]) {
    for stmt in body {
        collect_from_stmt(state, stmt);
    }
}

fn collect_from_stmt(state: &mut GeneratorState, stmt: &Stmt) {
    match stmt {
        Stmt::VarDecl(decl) => {
            if !state.locals.contains_key(&decl.name) {
                alloc_local(state, &decl.name, decl.ty.kind, decl.ty.array_size);
            }
        }
        Stmt::If { then_branch, else_branch, .. } => {
            collect_from_body(state, then_branch);
            collect_from_body(state, else_branch);
        }
        Stmt::While { body, .. } => collect_from_body(state, body),
        Stmt::For { body, .. } => collect_from_body(state, body),
        Stmt::Unsafe(body) => collect_from_body(state, body),
        Stmt::Return(_) | Stmt::Break | Stmt::Continue | Stmt::Expr(_) => {}
    }
}

fn alloc_local(state: &mut GeneratorState, name: &str, ty: TypeKind, array_size: Option<u64>) {
    let size = ty.size_of() * array_size.unwrap_or(1);
    state.frame_size += size as i64;
    let offset = -state.frame_size;
    state.locals.insert(name.to_string(), LocalSlot { offset, size, ty });
}

fn align_up(n: i64, align: i64) -> i64 {
    if n % align == 0 {
        n
    } else {
        n + (align - n % align)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::nodes::{Param, TypeNode, VarDecl};
    use crate::ast::types::BaseType;

    fn int_param(name: &str) -> Param {
        Param { name: name.to_string(), ty: TypeNode::scalar(TypeKind::Scalar(BaseType::Int)) }
    }

    fn char_decl(name: &str) -> Stmt {
        Stmt::VarDecl(VarDecl {
            name: name.to_string(),
            ty: TypeNode::scalar(TypeKind::Scalar(BaseType::Char)),
            init: None,
        })
    }

    #[test]
    fn params_come_first_and_frame_is_16_aligned() {
        let func = Function {
            name: "f".to_string(),
            return_type: TypeNode::scalar(TypeKind::Scalar(BaseType::Int)),
            params: vec![int_param("a"), int_param("b")],
            body: vec![char_decl("c")],
        };
        let mut state = GeneratorState::new();
        collect_frame(&mut state, &func);

        assert_eq!(state.locals["a"].offset, -8);
        assert_eq!(state.locals["b"].offset, -16);
        assert_eq!(state.locals["c"].offset, -17);
        assert_eq!(state.frame_size % 16, 0);
        assert!(state.frame_size >= 17);
    }

    #[test]
    fn locals_nested_in_branches_still_get_slots() {
        let func = Function {
            name: "f".to_string(),
            return_type: TypeNode::scalar(TypeKind::Scalar(BaseType::Int)),
            params: vec![],
            body: vec![Stmt::If {
                cond: crate::ast::nodes::Expr::Number(crate::ast::nodes::NumberLit::Int(1)),
                then_branch: vec![char_decl("x")],
                else_branch: vec![char_decl("y")],
            }],
        };
        let mut state = GeneratorState::new();
        collect_frame(&mut state, &func);

        assert!(state.locals.contains_key("x"));
        assert!(state.locals.contains_key("y"));
    }
}
