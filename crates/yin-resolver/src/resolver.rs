use yin_common::{Error, ErrorKind, Position};
use yin_schema::{
    BuiltIn, Context, IdentityId, IdentityRef, NodeId, NodeRef, Owner, SchemaNodeKind, TypedefId,
    TypedefRef,
};

/// The lexical scope a name is being resolved from: the module or
/// submodule the statement was declared in, plus the schema node
/// immediately enclosing it, if any (`None` for top-level statements).
#[derive(Clone, Copy, Debug)]
pub struct Scope {
    pub owner: Owner,
    pub node: Option<NodeId>,
}

impl Scope {
    pub fn top_level(owner: Owner) -> Self {
        Scope { owner, node: None }
    }

    pub fn at(owner: Owner, node: NodeId) -> Self {
        Scope { owner, node: Some(node) }
    }
}

/// Split `prefix:local` into its parts; a name with no `:` has no prefix.
pub fn split_prefix(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Resolve `prefix` (if any) against `owner`'s own prefix and import table,
/// yielding the owner whose top-level tables a prefixed lookup should
/// search. An unprefixed name resolves to `owner` unchanged.
fn target_owner(ctx: &Context, owner: Owner, prefix: Option<&str>, position: Position) -> Result<Owner, Error> {
    let Some(prefix) = prefix else {
        return Ok(owner);
    };
    if ctx.resolve(ctx.own_prefix(owner)) == prefix {
        return Ok(owner);
    }
    ctx.imports(owner)
        .iter()
        .find(|imp| ctx.resolve(imp.prefix) == prefix)
        .map(|imp| Owner::Module(imp.module))
        .ok_or_else(|| {
            Error::new(ErrorKind::InPrefix, position, format!("prefix '{prefix}' is not bound in this scope"))
        })
}

/// The result of resolving a `type` statement's `name` attribute: either a
/// direct built-in, or a typedef whose own `base` this type inherits.
#[derive(Clone, Copy, Debug)]
pub enum TypeLookup {
    BuiltIn(BuiltIn),
    Typedef(TypedefRef),
}

/// §4.1 typedef lookup (built-in table first, then the scope chain).
pub fn resolve_type_name(ctx: &Context, scope: Scope, name: &str, position: Position) -> Result<TypeLookup, Error> {
    let _span = tracing::trace_span!("resolve_type_name", name).entered();
    let (prefix, local) = split_prefix(name);

    if prefix.is_none() {
        if let Some(builtin) = BuiltIn::from_name(local) {
            return Ok(TypeLookup::BuiltIn(builtin));
        }
    }

    let target = target_owner(ctx, scope.owner, prefix, position)?;

    if prefix.is_none() {
        let mut current = scope.node;
        while let Some(node_id) = current {
            if let Some(index) = ctx.node_typedefs(scope.owner, node_id).iter().position(|t| ctx.resolve(t.name) == local) {
                return Ok(TypeLookup::Typedef(TypedefRef {
                    owner: scope.owner,
                    node: Some(node_id),
                    typedef: TypedefId(index as u32),
                }));
            }
            current = ctx.nodes(scope.owner).get(node_id).parent;
        }
    }

    if let Some(index) = ctx.owner_typedefs(target).iter().position(|t| ctx.resolve(t.name) == local) {
        return Ok(TypeLookup::Typedef(TypedefRef { owner: target, node: None, typedef: TypedefId(index as u32) }));
    }

    if let Owner::Module(module) = target {
        for include in ctx.includes(Owner::Module(module)) {
            let sub_owner = Owner::Submodule(include.submodule);
            if let Some(index) = ctx.owner_typedefs(sub_owner).iter().position(|t| ctx.resolve(t.name) == local) {
                return Ok(TypeLookup::Typedef(TypedefRef { owner: sub_owner, node: None, typedef: TypedefId(index as u32) }));
            }
        }
    }

    Err(Error::new(ErrorKind::InArg, position, format!("type '{name}' not found")))
}

/// §4.1 identity lookup: module/submodule top level only, no nested scope.
pub fn resolve_identity(ctx: &Context, scope: Scope, name: &str, position: Position) -> Result<IdentityRef, Error> {
    let _span = tracing::trace_span!("resolve_identity", name).entered();
    let (prefix, local) = split_prefix(name);
    let target = target_owner(ctx, scope.owner, prefix, position)?;

    if let Some(index) = ctx.identities(target).iter().position(|i| ctx.resolve(i.name) == local) {
        return Ok(IdentityRef { owner: target, identity: IdentityId(index as u32) });
    }

    if let Owner::Module(module) = target {
        for include in ctx.includes(Owner::Module(module)) {
            let sub_owner = Owner::Submodule(include.submodule);
            if let Some(index) = ctx.identities(sub_owner).iter().position(|i| ctx.resolve(i.name) == local) {
                return Ok(IdentityRef { owner: sub_owner, identity: IdentityId(index as u32) });
            }
        }
    }

    Err(Error::new(ErrorKind::InArg, position, format!("identity '{name}' not found")))
}

/// §4.1 grouping lookup for `uses`: lexical ancestors' direct `grouping`
/// children first (each ancestor's own children, walked ancestor by
/// ancestor), then the current module top level, then included
/// submodules. A prefixed name skips straight to the imported module's
/// top-level groupings.
pub fn resolve_grouping(ctx: &Context, scope: Scope, name: &str, position: Position) -> Result<NodeRef, Error> {
    let _span = tracing::trace_span!("resolve_grouping", name).entered();
    let (prefix, local) = split_prefix(name);
    let target = target_owner(ctx, scope.owner, prefix, position)?;

    if prefix.is_none() {
        let mut current = scope.node;
        while let Some(node_id) = current {
            let node = ctx.nodes(scope.owner).get(node_id);
            if let Some(found) = find_grouping_among(ctx, scope.owner, &node.children, local) {
                return Ok(found);
            }
            current = node.parent;
        }
    }

    if let Some(found) = find_grouping_among(ctx, target, ctx.top_level(target), local) {
        return Ok(found);
    }

    if let Owner::Module(module) = target {
        for include in ctx.includes(Owner::Module(module)) {
            let sub_owner = Owner::Submodule(include.submodule);
            if let Some(found) = find_grouping_among(ctx, sub_owner, ctx.top_level(sub_owner), local) {
                return Ok(found);
            }
        }
    }

    Err(Error::new(ErrorKind::InArg, position, format!("grouping '{name}' not found")))
}

fn find_grouping_among(ctx: &Context, owner: Owner, candidates: &[NodeId], local: &str) -> Option<NodeRef> {
    candidates.iter().copied().find_map(|id| {
        let node = ctx.nodes(owner).get(id);
        (node.kind == SchemaNodeKind::Grouping && ctx.resolve(node.name) == local).then_some(NodeRef { owner, node: id })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;
    use yin_common::diagnostics::CollectingSink;
    use yin_schema::{Config, Module, ModuleId, NodeArena, NodePayload, SchemaNode, Status, Type, TypePayload};

    fn new_ctx() -> Context {
        Context::new(Box::new(CollectingSink::new()))
    }

    fn bare_module(ctx: &mut Context, name: &str, prefix: &str) -> ModuleId {
        let name = ctx.intern(name);
        let prefix = ctx.intern(prefix);
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
            identities: Vec::new(),
            nodes: NodeArena::new(),
            top_level: Vec::new(),
        };
        ctx.add_module(module, Position::UNKNOWN).unwrap()
    }

    fn leaf_type_target(_ctx: &mut Context) -> Type {
        Type::builtin(BuiltIn::String, TypePayload::None)
    }

    #[test]
    fn builtin_name_short_circuits_typedef_search() {
        let mut ctx = new_ctx();
        let m = bare_module(&mut ctx, "m", "m");
        let owner = Owner::Module(m);
        let scope = Scope::top_level(owner);
        let result = resolve_type_name(&ctx, scope, "uint32", Position::UNKNOWN).unwrap();
        assert!(matches!(result, TypeLookup::BuiltIn(BuiltIn::Uint32)));
    }

    #[test]
    fn unqualified_typedef_found_at_module_top_level() {
        use yin_schema::Typedef;
        let mut ctx = new_ctx();
        let m = bare_module(&mut ctx, "m", "m");
        let name = ctx.intern("my-int");
        let owner = Owner::Module(m);
        let type_ = leaf_type_target(&mut ctx);
        ctx.module_mut(m).typedefs.push(Typedef {
            name,
            type_,
            units: None,
            default: None,
            description: None,
            reference: None,
            status: Status::Current,
        });
        let scope = Scope::top_level(owner);
        let result = resolve_type_name(&ctx, scope, "my-int", Position::UNKNOWN).unwrap();
        match result {
            TypeLookup::Typedef(r) => assert_eq!(r.typedef, TypedefId(0)),
            _ => panic!("expected typedef"),
        }
    }

    #[test]
    fn unbound_prefix_is_rejected() {
        let mut ctx = new_ctx();
        let m = bare_module(&mut ctx, "m", "m");
        let owner = Owner::Module(m);
        let scope = Scope::top_level(owner);
        let err = resolve_type_name(&ctx, scope, "other:t", Position::UNKNOWN).unwrap_err();
        assert_eq!(err.kind, yin_common::ErrorKind::InPrefix);
    }

    #[test]
    fn local_container_typedef_shadows_module_scope() {
        use yin_schema::Typedef;
        let mut ctx = new_ctx();
        let m = bare_module(&mut ctx, "m", "m");
        let owner = Owner::Module(m);
        let local_name = ctx.intern("t");
        let container_typedef = Typedef {
            name: local_name,
            type_: leaf_type_target(&mut ctx),
            units: None,
            default: None,
            description: None,
            reference: None,
            status: Status::Current,
        };
        let container = SchemaNode {
            kind: SchemaNodeKind::Container,
            name: yin_common::Atom::NONE,
            parent: None,
            children: smallvec![],
            description: None,
            reference: None,
            status: Status::Current,
            config: Config::ReadWrite,
            payload: NodePayload::Container { typedefs: vec![container_typedef] },
        };
        let node_id = ctx.nodes_mut(owner).insert(container);
        let scope = Scope::at(owner, node_id);
        let result = resolve_type_name(&ctx, scope, "t", Position::UNKNOWN).unwrap();
        match result {
            TypeLookup::Typedef(r) => assert_eq!(r.node, Some(node_id)),
            _ => panic!("expected local typedef"),
        }
    }

    #[test]
    fn grouping_lookup_finds_module_top_level_grouping() {
        let mut ctx = new_ctx();
        let m = bare_module(&mut ctx, "m", "m");
        let owner = Owner::Module(m);
        let grouping_name = ctx.intern("g");
        let grouping = SchemaNode {
            kind: SchemaNodeKind::Grouping,
            name: grouping_name,
            parent: None,
            children: smallvec![],
            description: None,
            reference: None,
            status: Status::Current,
            config: Config::ReadWrite,
            payload: NodePayload::Grouping { typedefs: Vec::new() },
        };
        let node_id = ctx.nodes_mut(owner).insert(grouping);
        ctx.top_level_mut(owner).push(node_id);

        let scope = Scope::top_level(owner);
        let found = resolve_grouping(&ctx, scope, "g", Position::UNKNOWN).unwrap();
        assert_eq!(found.node, node_id);
    }
}
