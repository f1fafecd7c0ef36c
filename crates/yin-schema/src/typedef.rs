use yin_common::Atom;

use crate::Type;

/// A `typedef` statement: a named, reusable type definition.
///
/// Lives either in a module's/submodule's top-level typedef array, or in the
/// local typedef array of whichever container/list/grouping/rpc declares it;
/// either way it is addressed by a [`crate::TypedefId`] relative to that
/// array, never by pointer.
#[derive(Debug, Clone)]
pub struct Typedef {
    pub name: Atom,
    pub type_: Type,
    pub units: Option<String>,
    pub default: Option<String>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub status: crate::Status,
}
