//! The in-memory YANG schema model: modules, schema nodes, typedefs,
//! types, and identities, all addressed by small `Copy` arena handles
//! instead of pointers.

mod context;
mod identity;
mod ids;
mod module;
mod node;
mod type_;
mod typedef;

pub use context::Context;
pub use identity::Identity;
pub use ids::{
    IdentityId, IdentityRef, ModuleId, NodeId, NodeRef, Owner, SubmoduleId, TypedefId, TypedefRef,
};
pub use module::{Import, Include, Module, Revision, Submodule};
pub use node::{Config, NodeArena, NodePayload, SchemaNode, SchemaNodeKind, Status};
pub use type_::{BitItem, BuiltIn, Derivation, EnumItem, Type, TypePayload};
pub use typedef::Typedef;

#[cfg(test)]
mod tests {
    use super::*;
    use yin_common::diagnostics::CollectingSink;
    use yin_common::ErrorKind;

    fn new_ctx() -> Context {
        Context::new(Box::new(CollectingSink::new()))
    }

    #[test]
    fn module_registry_round_trips() {
        let mut ctx = new_ctx();
        let name = ctx.intern("ietf-interfaces");
        let prefix = ctx.intern("if");
        let module = Module {
            name,
            namespace: "urn:ietf:params:xml:ns:yang:ietf-interfaces".into(),
            prefix,
            yang_version: Some("1".into()),
            organization: None,
            contact: None,
            description: None,
            reference: None,
            revisions: vec![Revision { date: "2018-02-20".into(), description: None, reference: None }],
            imports: Vec::new(),
            includes: Vec::new(),
            typedefs: Vec::new(),
            identities: Vec::new(),
            nodes: NodeArena::new(),
            top_level: Vec::new(),
        };
        let id = ctx.add_module(module, yin_common::Position::UNKNOWN).expect("first load succeeds");
        assert_eq!(ctx.get_module(name, None), Some(id));
        assert_eq!(ctx.get_module(name, Some("2018-02-20")), Some(id));
        assert_eq!(ctx.get_module(name, Some("1999-01-01")), None);
    }

    #[test]
    fn duplicate_module_load_is_rejected() {
        let mut ctx = new_ctx();
        let name = ctx.intern("m");
        let prefix = ctx.intern("m");
        let build = || Module {
            name,
            namespace: "urn:x".into(),
            prefix,
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
        };
        ctx.add_module(build(), yin_common::Position::UNKNOWN).unwrap();
        let err = ctx.add_module(build(), yin_common::Position::UNKNOWN).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Evalid);
    }

    #[test]
    fn node_arena_assigns_increasing_ids() {
        let mut arena = NodeArena::new();
        let name = yin_common::Atom::NONE;
        let leaf = SchemaNode {
            kind: SchemaNodeKind::Leaf,
            name,
            parent: None,
            children: Default::default(),
            description: None,
            reference: None,
            status: Status::Current,
            config: Config::ReadWrite,
            payload: NodePayload::Leaf { type_: Type::builtin(BuiltIn::String, TypePayload::None) },
        };
        let a = arena.insert(leaf.clone());
        let b = arena.insert(leaf);
        assert_eq!(a.0 + 1, b.0);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn identity_ancestry_walks_derived_edges() {
        let mut ctx = new_ctx();
        let name = ctx.intern("m");
        let prefix = ctx.intern("m");
        let iface = ctx.intern("iface-type");
        let ethernet = ctx.intern("ethernet");
        let module = Module {
            name,
            namespace: "urn:x".into(),
            prefix,
            yang_version: None,
            organization: None,
            contact: None,
            description: None,
            reference: None,
            revisions: Vec::new(),
            imports: Vec::new(),
            includes: Vec::new(),
            typedefs: Vec::new(),
            identities: vec![Identity::new(iface), Identity::new(ethernet)],
            nodes: NodeArena::new(),
            top_level: Vec::new(),
        };
        let mid = ctx.add_module(module, yin_common::Position::UNKNOWN).unwrap();
        let owner = Owner::Module(mid);
        let base = IdentityRef { owner, identity: IdentityId(0) };
        let derived = IdentityRef { owner, identity: IdentityId(1) };
        ctx.identity_mut(derived).base = Some(base);
        ctx.identity_mut(base).derived.push(derived);

        assert!(Identity::is_ancestor_of(base, derived, &ctx));
        assert!(!Identity::is_ancestor_of(derived, base, &ctx));
        assert!(Identity::is_ancestor_of(base, base, &ctx));
    }
}
