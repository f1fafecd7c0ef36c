//! Stable arena-index handles.
//!
//! The original design pointer-chases a schema tree built from `malloc`'d
//! nodes; this core instead stores every module's or submodule's schema
//! nodes, typedefs, and identities in per-owner arenas addressed by these
//! small `Copy` newtypes; see the Design Notes in the specification.

/// Identifies a loaded [`crate::Module`] within a [`crate::Context`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u32);

/// Identifies a loaded [`crate::Submodule`] within a [`crate::Context`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmoduleId(pub u32);

/// Identifies a [`crate::SchemaNode`] within its owning module's or
/// submodule's node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Identifies a [`crate::Typedef`] within whichever array owns it (a
/// module's or submodule's top-level array, or a container/list/grouping's
/// local array).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypedefId(pub u32);

/// Identifies a [`crate::Identity`] within its owning module's or
/// submodule's identity array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityId(pub u32);

/// A module or submodule, the two kinds of thing that own a top-level
/// typedef/identity/node array. Submodules have no namespace/prefix of
/// their own but do own their own arrays until `include` folds them into
/// a module's lookup (§4.1/§4.5).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Owner {
    Module(ModuleId),
    Submodule(SubmoduleId),
}

/// A resolved reference to a schema node, scoped to the module or
/// submodule that owns its arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub owner: Owner,
    pub node: NodeId,
}

/// A resolved reference to a typedef. `node` is `Some` when the typedef
/// lives in a container/list/grouping's local array rather than its
/// module's/submodule's top-level array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypedefRef {
    pub owner: Owner,
    pub node: Option<NodeId>,
    pub typedef: TypedefId,
}

/// A resolved reference to an identity. Identities have no nested scope
/// (§4.1), so unlike typedefs they are always addressed directly off the
/// owning module or submodule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdentityRef {
    pub owner: Owner,
    pub identity: IdentityId,
}
