//! # Type Definitions
//!
//! This module defines the set of scalar data types available in Oxylang and
//! the sizing/mangling rules the code generator and name-mangler both depend
//! on. Keeping `TypeKind` a closed sum (rather than a string tag with a
//! `_PTR` suffix convention) means sizing and mangling can never drift out of
//! sync with each other the way a suffix check could.

/// The base (non-pointer) scalar types Oxylang supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Int,
    Int16,
    Int32,
    Int64,
    Char,
    Float,
    Void,
}

impl BaseType {
    /// Size in bytes of a value of this type when stored in a local slot,
    /// global, or array element.
    ///
    /// `Char` is the one sub-qword scalar; everything else (including the
    /// various integer widths, which this dialect does not narrow at the
    /// storage level) occupies a full 8-byte slot.
    pub fn size_of(self) -> u64 {
        match self {
            BaseType::Char => 1,
            _ => 8,
        }
    }

    /// The mangling fragment used in overload-signature symbols.
    pub fn mangled(self) -> &'static str {
        match self {
            BaseType::Int => "INT",
            BaseType::Int16 => "INT16",
            BaseType::Int32 => "INT32",
            BaseType::Int64 => "INT64",
            BaseType::Char => "CHAR",
            BaseType::Float => "FLOAT",
            BaseType::Void => "VOID",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "int" => Some(BaseType::Int),
            "int16" => Some(BaseType::Int16),
            "int32" => Some(BaseType::Int32),
            "int64" => Some(BaseType::Int64),
            "char" => Some(BaseType::Char),
            "float" => Some(BaseType::Float),
            "void" => Some(BaseType::Void),
            _ => None,
        }
    }
}

/// A full Oxylang type: a base scalar or a pointer to one.
///
/// Oxylang has no nested pointers (`char**`) and no user-defined types, so a
/// single level of indirection over a `BaseType` is sufficient to express
/// every declarator the grammar accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar(BaseType),
    Ptr(BaseType),
}

impl TypeKind {
    /// Size in bytes this type occupies in a frame slot, global, or as a
    /// single array element (before multiplying by an array extent).
    ///
    /// Every pointer is 8 bytes regardless of pointee, which is also the
    /// invariant array sizing relies on.
    pub fn size_of(self) -> u64 {
        match self {
            TypeKind::Scalar(base) => base.size_of(),
            TypeKind::Ptr(_) => 8,
        }
    }

    /// The mangling fragment for this type, e.g. `INT` or `CHAR_PTR`.
    pub fn mangled(self) -> String {
        match self {
            TypeKind::Scalar(base) => base.mangled().to_string(),
            TypeKind::Ptr(base) => format!("{}_PTR", base.mangled()),
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, TypeKind::Scalar(BaseType::Float))
    }

    pub fn is_ptr(self) -> bool {
        matches!(self, TypeKind::Ptr(_))
    }
}
