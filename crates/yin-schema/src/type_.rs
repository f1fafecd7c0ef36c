use yin_common::Atom;

use crate::ids::{IdentityRef, TypedefRef};

/// The YANG built-in type names (RFC 6020 §9), plus `union` and the
/// placeholder numeric/string/instance-identifier kinds the type builder
/// (§4.2) accepts structurally without further range/pattern validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltIn {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Decimal64,
    String,
    Binary,
    Boolean,
    Empty,
    Enumeration,
    Bits,
    Identityref,
    Leafref,
    InstanceIdentifier,
    Union,
}

impl BuiltIn {
    /// Map a YANG type-name argument (e.g. `"uint32"`) to its built-in kind,
    /// or `None` if it names a derived type instead.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "int8" => BuiltIn::Int8,
            "int16" => BuiltIn::Int16,
            "int32" => BuiltIn::Int32,
            "int64" => BuiltIn::Int64,
            "uint8" => BuiltIn::Uint8,
            "uint16" => BuiltIn::Uint16,
            "uint32" => BuiltIn::Uint32,
            "uint64" => BuiltIn::Uint64,
            "decimal64" => BuiltIn::Decimal64,
            "string" => BuiltIn::String,
            "binary" => BuiltIn::Binary,
            "boolean" => BuiltIn::Boolean,
            "empty" => BuiltIn::Empty,
            "enumeration" => BuiltIn::Enumeration,
            "bits" => BuiltIn::Bits,
            "identityref" => BuiltIn::Identityref,
            "leafref" => BuiltIn::Leafref,
            "instance-identifier" => BuiltIn::InstanceIdentifier,
            "union" => BuiltIn::Union,
            _ => return None,
        })
    }
}

/// How a [`Type`] was arrived at: directly naming a built-in, or by naming
/// a typedef that (transitively) resolves to one.
#[derive(Debug, Clone)]
pub enum Derivation {
    BuiltIn,
    Typedef(TypedefRef),
}

/// A single `enum` substatement's resolved name/value pair.
#[derive(Debug, Clone)]
pub struct EnumItem {
    pub name: Atom,
    pub value: i64,
    pub status: crate::Status,
}

/// A single `bit` substatement's resolved name/position pair.
#[derive(Debug, Clone)]
pub struct BitItem {
    pub name: Atom,
    pub position: u32,
    pub status: crate::Status,
}

/// The kind-specific payload of a [`Type`]. Every built-in other than the
/// ones listed here carries no further structure; range/length/pattern
/// restrictions are out of scope (see the specification's Non-goals).
#[derive(Debug, Clone)]
pub enum TypePayload {
    None,
    Enumeration(Vec<EnumItem>),
    Bits(Vec<BitItem>),
    Identityref(IdentityRef),
    Leafref { path: String, require_instance: bool },
    Union(Vec<Type>),
}

/// A fully built `type` sub-statement.
#[derive(Debug, Clone)]
pub struct Type {
    pub base: BuiltIn,
    pub der: Derivation,
    /// The prefix the type name was written with in the source, if any
    /// (used only for diagnostics; resolution already happened).
    pub prefix: Option<String>,
    pub payload: TypePayload,
}

impl Type {
    pub fn builtin(base: BuiltIn, payload: TypePayload) -> Self {
        Type { base, der: Derivation::BuiltIn, prefix: None, payload }
    }
}
