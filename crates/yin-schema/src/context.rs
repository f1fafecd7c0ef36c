use std::path::PathBuf;

use rustc_hash::FxHashMap;
use yin_common::diagnostics::DiagnosticSink;
use yin_common::{Atom, Error, ErrorKind, Interner, Position};

use crate::identity::Identity;
use crate::ids::{IdentityId, IdentityRef, ModuleId, NodeId, Owner, SubmoduleId, TypedefId, TypedefRef};
use crate::module::{Import, Include, Module, Submodule};
use crate::node::{NodeArena, NodePayload};
use crate::typedef::Typedef;

/// Everything a module load needs that outlives any single module: the
/// string pool, the registries of already-loaded modules/submodules (so
/// `import`/`include` can find siblings loaded earlier in the same run),
/// the search path for resolving module names to files, and the
/// diagnostic sink errors and warnings are reported to.
///
/// `Context` is deliberately `!Sync`: a load session is single-threaded,
/// same as the rest of this core (see the specification's Concurrency
/// section).
pub struct Context {
    pub interner: Interner,
    modules: Vec<Module>,
    modules_by_name: FxHashMap<Atom, Vec<ModuleId>>,
    submodules: Vec<Submodule>,
    submodules_by_name: FxHashMap<Atom, Vec<SubmoduleId>>,
    search_dirs: Vec<PathBuf>,
    sink: Box<dyn DiagnosticSink>,
}

impl Context {
    pub fn new(sink: Box<dyn DiagnosticSink>) -> Self {
        Context {
            interner: Interner::new(),
            modules: Vec::new(),
            modules_by_name: FxHashMap::default(),
            submodules: Vec::new(),
            submodules_by_name: FxHashMap::default(),
            search_dirs: Vec::new(),
            sink,
        }
    }

    pub fn with_search_dirs(sink: Box<dyn DiagnosticSink>, search_dirs: Vec<PathBuf>) -> Self {
        let mut ctx = Self::new(sink);
        ctx.search_dirs = search_dirs;
        ctx
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    pub fn add_search_dir(&mut self, dir: PathBuf) {
        self.search_dirs.push(dir);
    }

    pub fn intern(&mut self, s: &str) -> Atom {
        self.interner.intern(s)
    }

    pub fn resolve(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }

    pub fn report(&mut self, kind: ErrorKind, position: Position, message: impl Into<String>) {
        self.sink.report(&Error::new(kind, position, message));
    }

    /// Reserve a slot for a module being loaded, before any of its own
    /// content exists. The loader fills the returned id's module in place
    /// via [`Context::module_mut`] as it works through the document, since
    /// the module's own typedefs/identities/nodes need a live `ModuleId`
    /// to reference as they are built. The reservation is not visible to
    /// [`Context::get_module`] until [`Context::finalize_module`] commits
    /// it.
    pub fn reserve_module(&mut self, placeholder: Module) -> ModuleId {
        let id = ModuleId(self.modules.len() as u32);
        self.modules.push(placeholder);
        id
    }

    /// Commit a reserved module, rejecting a second load of the same
    /// (name, revision) pair (§4.5's duplicate-module check). On rejection
    /// the reserved slot stays allocated but unreachable; a duplicate load
    /// is rare enough that reclaiming the slot isn't worth the bookkeeping.
    pub fn finalize_module(&mut self, id: ModuleId, position: Position) -> Result<ModuleId, Error> {
        let module = self.module(id);
        if self.get_module(module.name, module.latest_revision()).is_some() {
            let name = self.resolve(module.name).to_string();
            return Err(Error::new(ErrorKind::Evalid, position, format!("module '{name}' already loaded")));
        }
        self.modules_by_name.entry(module.name).or_default().push(id);
        Ok(id)
    }

    /// Build and register a module in one step, for callers (tests, mainly)
    /// that already have the whole module built.
    pub fn add_module(&mut self, module: Module, position: Position) -> Result<ModuleId, Error> {
        let id = self.reserve_module(module);
        self.finalize_module(id, position)
    }

    pub fn reserve_submodule(&mut self, placeholder: Submodule) -> SubmoduleId {
        let id = SubmoduleId(self.submodules.len() as u32);
        self.submodules.push(placeholder);
        id
    }

    pub fn finalize_submodule(&mut self, id: SubmoduleId, position: Position) -> Result<SubmoduleId, Error> {
        let submodule = self.submodule(id);
        if self.get_submodule(submodule.name, submodule.latest_revision()).is_some() {
            let name = self.resolve(submodule.name).to_string();
            return Err(Error::new(ErrorKind::Evalid, position, format!("submodule '{name}' already loaded")));
        }
        self.submodules_by_name.entry(submodule.name).or_default().push(id);
        Ok(id)
    }

    pub fn add_submodule(&mut self, submodule: Submodule, position: Position) -> Result<SubmoduleId, Error> {
        let id = self.reserve_submodule(submodule);
        self.finalize_submodule(id, position)
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.0 as usize]
    }

    pub fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        &mut self.modules[id.0 as usize]
    }

    pub fn submodule(&self, id: SubmoduleId) -> &Submodule {
        &self.submodules[id.0 as usize]
    }

    pub fn submodule_mut(&mut self, id: SubmoduleId) -> &mut Submodule {
        &mut self.submodules[id.0 as usize]
    }

    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules.iter().enumerate().map(|(i, m)| (ModuleId(i as u32), m))
    }

    /// Find a loaded module by name, optionally pinned to a specific
    /// revision date; without one, the most recently registered module
    /// with that name wins, matching `import`'s "no revision given"
    /// fallback rule.
    pub fn get_module(&self, name: Atom, revision: Option<&str>) -> Option<ModuleId> {
        let ids = self.modules_by_name.get(&name)?;
        match revision {
            Some(rev) => ids.iter().copied().find(|id| self.module(*id).latest_revision() == Some(rev)),
            None => ids.last().copied(),
        }
    }

    pub fn get_submodule(&self, name: Atom, revision: Option<&str>) -> Option<SubmoduleId> {
        let ids = self.submodules_by_name.get(&name)?;
        match revision {
            Some(rev) => ids.iter().copied().find(|id| self.submodule(*id).latest_revision() == Some(rev)),
            None => ids.last().copied(),
        }
    }

    /// The node arena owned by `owner`.
    pub fn nodes(&self, owner: Owner) -> &NodeArena {
        match owner {
            Owner::Module(m) => &self.module(m).nodes,
            Owner::Submodule(s) => &self.submodule(s).nodes,
        }
    }

    pub fn nodes_mut(&mut self, owner: Owner) -> &mut NodeArena {
        match owner {
            Owner::Module(m) => &mut self.module_mut(m).nodes,
            Owner::Submodule(s) => &mut self.submodule_mut(s).nodes,
        }
    }

    pub fn top_level(&self, owner: Owner) -> &[NodeId] {
        match owner {
            Owner::Module(m) => &self.module(m).top_level,
            Owner::Submodule(s) => &self.submodule(s).top_level,
        }
    }

    pub fn top_level_mut(&mut self, owner: Owner) -> &mut Vec<NodeId> {
        match owner {
            Owner::Module(m) => &mut self.module_mut(m).top_level,
            Owner::Submodule(s) => &mut self.submodule_mut(s).top_level,
        }
    }

    /// The top-level typedef array owned directly by `owner` (not any
    /// node's local array).
    pub fn owner_typedefs(&self, owner: Owner) -> &[Typedef] {
        match owner {
            Owner::Module(m) => &self.module(m).typedefs,
            Owner::Submodule(s) => &self.submodule(s).typedefs,
        }
    }

    pub fn owner_typedefs_mut(&mut self, owner: Owner) -> &mut Vec<Typedef> {
        match owner {
            Owner::Module(m) => &mut self.module_mut(m).typedefs,
            Owner::Submodule(s) => &mut self.submodule_mut(s).typedefs,
        }
    }

    /// The local typedef array of a specific container/list/grouping node.
    /// Empty for node kinds that carry no typedefs of their own.
    pub fn node_typedefs(&self, owner: Owner, node: NodeId) -> &[Typedef] {
        match &self.nodes(owner).get(node).payload {
            NodePayload::Container { typedefs } | NodePayload::List { typedefs, .. } | NodePayload::Grouping { typedefs } => {
                typedefs
            }
            _ => &[],
        }
    }

    pub fn identities(&self, owner: Owner) -> &[Identity] {
        match owner {
            Owner::Module(m) => &self.module(m).identities,
            Owner::Submodule(s) => &self.submodule(s).identities,
        }
    }

    pub fn identities_mut(&mut self, owner: Owner) -> &mut Vec<Identity> {
        match owner {
            Owner::Module(m) => &mut self.module_mut(m).identities,
            Owner::Submodule(s) => &mut self.submodule_mut(s).identities,
        }
    }

    pub fn imports(&self, owner: Owner) -> &[Import] {
        match owner {
            Owner::Module(m) => &self.module(m).imports,
            Owner::Submodule(s) => &self.submodule(s).imports,
        }
    }

    /// Submodules `owner` includes. Submodules do not themselves include
    /// further submodules in this core, so this is empty for a
    /// `Owner::Submodule`.
    pub fn includes(&self, owner: Owner) -> &[Include] {
        match owner {
            Owner::Module(m) => &self.module(m).includes,
            Owner::Submodule(_) => &[],
        }
    }

    pub fn own_prefix(&self, owner: Owner) -> Atom {
        match owner {
            Owner::Module(m) => self.module(m).prefix,
            Owner::Submodule(s) => self.submodule(s).prefix,
        }
    }

    pub fn typedef(&self, reference: TypedefRef) -> &Typedef {
        let index = reference.typedef.0 as usize;
        match reference.node {
            Some(node) => &self.node_typedefs(reference.owner, node)[index],
            None => &self.owner_typedefs(reference.owner)[index],
        }
    }

    pub fn identity(&self, reference: IdentityRef) -> &Identity {
        &self.identities(reference.owner)[reference.identity.0 as usize]
    }

    pub fn identity_mut(&mut self, reference: IdentityRef) -> &mut Identity {
        &mut self.identities_mut(reference.owner)[reference.identity.0 as usize]
    }

    pub fn find_identity(&self, owner: Owner, name: Atom) -> Option<IdentityRef> {
        self.identities(owner)
            .iter()
            .position(|i| i.name == name)
            .map(|index| IdentityRef { owner, identity: IdentityId(index as u32) })
    }

    pub fn find_owner_typedef(&self, owner: Owner, name: Atom) -> Option<TypedefRef> {
        self.owner_typedefs(owner)
            .iter()
            .position(|t| t.name == name)
            .map(|index| TypedefRef { owner, node: None, typedef: TypedefId(index as u32) })
    }

    pub fn find_node_typedef(&self, owner: Owner, node: NodeId, name: Atom) -> Option<TypedefRef> {
        self.node_typedefs(owner, node)
            .iter()
            .position(|t| t.name == name)
            .map(|index| TypedefRef { owner, node: Some(node), typedef: TypedefId(index as u32) })
    }
}
