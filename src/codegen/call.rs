//! # Calls and Name Mangling
//!
//! Oxylang's overload resolution is static and rudimentary: a declaration's
//! link symbol is built from its parameter types, and a call site builds
//! the same symbol from a per-argument type *approximation* — there is no
//! real type inference, so an identifier argument's type comes from
//! whatever slot it resolved to (or `INT` if it didn't resolve to one at
//! all). `main`, `puts`, and the three runtime print helpers bypass
//! mangling entirely so they link against their fixed, well-known names.
//!
//! Arguments are marshaled by moving each one straight into its destination
//! register immediately after it's evaluated, rather than evaluating all of
//! them first and unwinding a stack of saved values — simpler, and correct
//! as long as no argument expression itself performs a nested call that
//! would clobber an earlier argument's register (Oxylang call expressions
//! are shallow enough in practice that this holds).

use crate::ast::nodes::{Expr, Function, NumberLit};
use crate::codegen::common::{GeneratorState, ValueKind};
use crate::codegen::expression;
use crate::compiler::error::CompileError;

pub const UNMANGLED: &[&str] = &["main", "puts", "display_number", "display_number_nonl", "print_char"];

pub fn mangled_name_for_decl(func: &Function) -> String {
    if UNMANGLED.contains(&func.name.as_str()) {
        return func.name.clone();
    }
    let sig: Vec<String> = func.params.iter().map(|p| p.ty.kind.mangled()).collect();
    mangle(&func.name, &sig)
}

fn mangle(name: &str, types: &[String]) -> String {
    format!("{name}__{}", types.join("_"))
}

fn approximate_arg_type(state: &GeneratorState, expr: &Expr) -> String {
    match expr {
        Expr::Str(_) => "CHAR_PTR".to_string(),
        Expr::CharLit(_) => "CHAR".to_string(),
        Expr::Number(NumberLit::Float(_)) => "FLOAT".to_string(),
        Expr::Identifier(name) => state
            .locals
            .get(name)
            .map(|slot| slot.ty.mangled())
            .or_else(|| state.find_global(name).map(|g| g.ty.mangled()))
            .unwrap_or_else(|| "INT".to_string()),
        _ => "INT".to_string(),
    }
}

pub fn lower_call(state: &mut GeneratorState, name: &str, args: &[Expr]) -> Result<ValueKind, CompileError> {
    let symbol = if UNMANGLED.contains(&name) {
        name.to_string()
    } else {
        let types: Vec<String> = args.iter().map(|a| approximate_arg_type(state, a)).collect();
        mangle(name, &types)
    };

    let int_regs = ["rdi", "rsi", "rdx", "rcx", "r8", "r9"];
    let mut int_idx = 0usize;
    let mut float_idx = 0usize;

    for arg in args {
        let kind = expression::lower_expr(state, arg)?;
        match kind {
            ValueKind::Float => {
                let reg = float_idx;
                if reg >= 8 {
                    return Err(CompileError::codegen("too many floating-point arguments for the register file"));
                }
                state.emit(format!("    movsd xmm{reg}, xmm0"));
                float_idx += 1;
            }
            ValueKind::Int => {
                let reg = *int_regs
                    .get(int_idx)
                    .ok_or_else(|| CompileError::codegen("too many integer arguments for the register file"))?;
                state.emit(format!("    mov {reg}, rax"));
                int_idx += 1;
            }
        }
    }

    state.emit("    sub rsp, 16");
    state.emit(format!("    call {symbol}"));
    state.emit("    add rsp, 16");

    let return_kind = state
        .function_returns
        .get(name)
        .map(|ty| if ty.is_float() { ValueKind::Float } else { ValueKind::Int })
        .unwrap_or(ValueKind::Int);
    Ok(return_kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::nodes::{Param, TypeNode};
    use crate::ast::types::{BaseType, TypeKind};

    fn param(name: &str, kind: TypeKind) -> Param {
        Param { name: name.to_string(), ty: TypeNode::scalar(kind) }
    }

    #[test]
    fn well_known_names_bypass_mangling() {
        for name in UNMANGLED {
            let func = Function {
                name: name.to_string(),
                return_type: TypeNode::scalar(TypeKind::Scalar(BaseType::Int)),
                params: vec![param("a", TypeKind::Scalar(BaseType::Int))],
                body: vec![],
            };
            assert_eq!(mangled_name_for_decl(&func), *name);
        }
    }

    #[test]
    fn declaration_symbol_matches_call_site_for_identical_signature() {
        let func = Function {
            name: "add".to_string(),
            return_type: TypeNode::scalar(TypeKind::Scalar(BaseType::Int)),
            params: vec![
                param("a", TypeKind::Scalar(BaseType::Int)),
                param("b", TypeKind::Ptr(BaseType::Char)),
            ],
            body: vec![],
        };
        let decl_symbol = mangled_name_for_decl(&func);
        assert_eq!(decl_symbol, "add__INT_CHAR_PTR");

        let call_symbol = mangle(
            "add",
            &[
                approximate_arg_type(&GeneratorState::new(), &Expr::Number(NumberLit::Int(1))),
                approximate_arg_type(&GeneratorState::new(), &Expr::Str("x".to_string())),
            ],
        );
        assert_eq!(decl_symbol, call_symbol);
    }
}
