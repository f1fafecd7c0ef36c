use yin_common::Atom;

use crate::ids::{ModuleId, NodeId, SubmoduleId};
use crate::identity::Identity;
use crate::node::NodeArena;
use crate::typedef::Typedef;

#[derive(Debug, Clone)]
pub struct Revision {
    pub date: String,
    pub description: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Import {
    pub module: ModuleId,
    pub prefix: Atom,
    pub revision: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Include {
    pub submodule: SubmoduleId,
    pub revision: Option<String>,
}

/// A loaded `module`.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: Atom,
    pub namespace: String,
    pub prefix: Atom,
    pub yang_version: Option<String>,
    pub organization: Option<String>,
    pub contact: Option<String>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub revisions: Vec<Revision>,
    pub imports: Vec<Import>,
    pub includes: Vec<Include>,
    pub typedefs: Vec<Typedef>,
    pub identities: Vec<Identity>,
    pub nodes: NodeArena,
    pub top_level: Vec<NodeId>,
}

impl Module {
    /// The module's most recent revision date, if it declared any.
    pub fn latest_revision(&self) -> Option<&str> {
        self.revisions.first().map(|r| r.date.as_str())
    }

    /// An empty module reserved under `name`, filled in field-by-field as
    /// the loader works through the document (§4.5's three-pass driver
    /// needs a live [`ModuleId`] before the module's own content exists,
    /// since its own typedefs/identities/nodes reference it as they are
    /// built).
    pub fn placeholder(name: Atom) -> Self {
        Module {
            name,
            namespace: String::new(),
            prefix: Atom::NONE,
            yang_version: None,
            organization: None,
            contact: None,
            description: None,
            reference: None,
            revisions: Vec::new(),
            imports: Vec::new(),
            includes: Vec::new(),
            typedefs: Vec::new(),
            identities: Vec::new(),
            nodes: NodeArena::new(),
            top_level: Vec::new(),
        }
    }
}

/// A loaded `submodule`. Submodules have no namespace or prefix of their
/// own; both are inherited from the module named by `belongs_to` once
/// `include` resolution links the two (§4.5).
#[derive(Debug, Clone)]
pub struct Submodule {
    pub name: Atom,
    pub belongs_to: Atom,
    pub prefix: Atom,
    pub yang_version: Option<String>,
    pub organization: Option<String>,
    pub contact: Option<String>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub revisions: Vec<Revision>,
    pub imports: Vec<Import>,
    pub includes: Vec<Include>,
    pub typedefs: Vec<Typedef>,
    pub identities: Vec<Identity>,
    pub nodes: NodeArena,
    pub top_level: Vec<NodeId>,
}

impl Submodule {
    pub fn latest_revision(&self) -> Option<&str> {
        self.revisions.first().map(|r| r.date.as_str())
    }

    pub fn placeholder(name: Atom) -> Self {
        Submodule {
            name,
            belongs_to: Atom::NONE,
            prefix: Atom::NONE,
            yang_version: None,
            organization: None,
            contact: None,
            description: None,
            reference: None,
            revisions: Vec::new(),
            imports: Vec::new(),
            includes: Vec::new(),
            typedefs: Vec::new(),
            identities: Vec::new(),
            nodes: NodeArena::new(),
            top_level: Vec::new(),
        }
    }
}
