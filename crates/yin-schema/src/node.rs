use smallvec::SmallVec;
use yin_common::Atom;

use crate::ids::{NodeId, NodeRef};
use crate::typedef::Typedef;

/// A data-definition node's kind, per the specification's Data Model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaNodeKind {
    Container,
    Leaf,
    LeafList,
    List,
    Choice,
    Grouping,
    Uses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Current,
    Deprecated,
    Obsolete,
}

impl Default for Status {
    fn default() -> Self {
        Status::Current
    }
}

impl Status {
    /// Parse a `status` statement's `value` attribute. `None` for any
    /// value other than the three RFC 6020 §7.21.2 literals.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "current" => Some(Status::Current),
            "deprecated" => Some(Status::Deprecated),
            "obsolete" => Some(Status::Obsolete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Config {
    ReadWrite,
    ReadOnly,
}

impl Config {
    /// Parse a `config` statement's `value` attribute. `true` is
    /// read-write, `false` is read-only; any other literal is rejected
    /// (the original parser's dead second `false` branch is not
    /// reproduced here).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "true" => Some(Config::ReadWrite),
            "false" => Some(Config::ReadOnly),
            _ => None,
        }
    }
}

/// Kind-specific data a [`SchemaNode`] carries beyond the common header.
#[derive(Debug, Clone)]
pub enum NodePayload {
    Container { typedefs: Vec<Typedef> },
    Leaf { type_: crate::Type },
    LeafList { type_: crate::Type },
    List { typedefs: Vec<Typedef>, keys: SmallVec<[NodeId; 4]> },
    Choice,
    Grouping { typedefs: Vec<Typedef> },
    Uses { grouping: NodeRef },
}

/// One node in a module's schema tree.
///
/// All children of a `container`/`list`/`choice`/`grouping` are held in
/// `children`, addressed by [`NodeId`] within the owning module's
/// [`NodeArena`] — there is no separate "first child"/"next sibling"
/// pointer pair to keep consistent.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub kind: SchemaNodeKind,
    pub name: Atom,
    pub parent: Option<NodeId>,
    pub children: SmallVec<[NodeId; 4]>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub status: Status,
    pub config: Config,
    pub payload: NodePayload,
}

/// The arena owning every [`SchemaNode`] in a module or submodule.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<SchemaNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    pub fn insert(&mut self, node: SchemaNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut SchemaNode {
        &mut self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SchemaNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }
}
