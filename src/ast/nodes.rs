//! # AST Nodes
//!
//! This module defines the tagged-variant tree that is Oxylang's Abstract
//! Syntax Tree. Every node kind from the language grammar gets its own enum
//! variant with its children named by position (a `Function`'s body is
//! always its fourth field, never "whichever child happens to be a BODY
//! node"), so the generator's lowering functions are exhaustive matches
//! rather than index lookups into a generic child vector.

use super::types::TypeKind;

/// The root of a compilation unit: every top-level declaration in source order.
#[derive(Debug, Clone)]
pub struct Program {
    pub items: Vec<TopLevel>,
}

/// A declaration that may appear outside any function body.
#[derive(Debug, Clone)]
pub enum TopLevel {
    Function(Function),
    VarDecl(VarDecl),
    /// `extern NAME;` — a symbol resolved at link time, not defined here.
    Extern(String),
    /// `include "NAME.oxy";` — expanded away by the preprocessor before the
    /// analyzer or generator ever see it; surviving one this far would be a
    /// preprocessor bug, but the variant exists so `Program` stays a single
    /// flat AST shape across all pipeline stages per the data model.
    Include(String),
}

/// The declared type of a variable, parameter, or return value.
#[derive(Debug, Clone, Copy)]
pub struct TypeNode {
    pub kind: TypeKind,
    /// Present only on array declarators (`int x[10];`).
    pub array_size: Option<u64>,
}

impl TypeNode {
    pub fn scalar(kind: TypeKind) -> Self {
        Self {
            kind,
            array_size: None,
        }
    }

    pub fn array(kind: TypeKind, size: u64) -> Self {
        Self {
            kind,
            array_size: Some(size),
        }
    }

    /// Total storage in bytes: the element size, times the array extent if any.
    pub fn storage_size(&self) -> u64 {
        self.kind.size_of() * self.array_size.unwrap_or(1)
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: TypeNode,
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: String,
    pub ty: TypeNode,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub return_type: TypeNode,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

/// A statement inside a function body or control-flow block.
#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl(VarDecl),
    Return(Option<Expr>),
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    For {
        init: Option<Expr>,
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Vec<Stmt>,
    },
    /// A block that disables whatever safety checks the analyzer otherwise
    /// performs on raw pointer use; has no codegen effect of its own.
    Unsafe(Vec<Stmt>),
    Break,
    Continue,
    /// An expression evaluated for its side effect (an assignment, a call).
    Expr(Expr),
}

/// An integer or floating-point literal. The two share a lexical `NUMBER`
/// token but must stay distinguishable all the way to codegen, since integers
/// evaluate into `rax` and floats into `xmm0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberLit {
    Int(i64),
    Float(f64),
}

/// All binary and assignment operator kinds. Assignment and compound
/// assignment share this enum with the arithmetic/comparison/logical
/// operators because the grammar produces them from the same `BIN_OP`
/// production; `BinOpKind::is_assignment` is how the generator tells them
/// apart before dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Assign,
    PlusAssign,
    MinusAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOpKind {
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            BinOpKind::Assign
                | BinOpKind::PlusAssign
                | BinOpKind::MinusAssign
                | BinOpKind::MulAssign
                | BinOpKind::DivAssign
                | BinOpKind::ModAssign
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOpKind::Eq
                | BinOpKind::Ne
                | BinOpKind::Lt
                | BinOpKind::Le
                | BinOpKind::Gt
                | BinOpKind::Ge
        )
    }
}

/// An expression. Evaluating one leaves its result in `rax` (integer-classed)
/// or `xmm0` (float-classed); callers learn which via the `ValueKind` the
/// generator's lowering function returns alongside the emitted text.
#[derive(Debug, Clone)]
pub enum Expr {
    Number(NumberLit),
    Str(String),
    CharLit(char),
    Identifier(String),
    BinOp {
        op: BinOpKind,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    UnaryMinus(Box<Expr>),
    /// `*p` — always a single zero-extended byte load; Oxylang has no other
    /// dereference width.
    Deref(Box<Expr>),
    AddrOf(Box<Expr>),
    ArrayIndex {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    PreInc(Box<Expr>),
    PreDec(Box<Expr>),
    PostInc(Box<Expr>),
    PostDec(Box<Expr>),
    Call {
        name: String,
        args: Vec<Expr>,
    },
}
