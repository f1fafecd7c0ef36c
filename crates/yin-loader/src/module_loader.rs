//! The top-level three-pass module/submodule loader (§4.5).
//!
//! Pass 1 classifies every child statement without building anything; Pass
//! 2 fills in imports, includes, revisions, identities, and typedefs (the
//! symbol tables the schema tree's type/identity/grouping lookups need);
//! Pass 3 drains the stashed data-definition statements into the node
//! arena via `node_builder`.

use std::path::PathBuf;

use yin_common::{Error, ErrorKind, Position};
use yin_resolver::{resolve_identity, Scope};
use yin_schema::{
    Context, Identity, IdentityRef, Import, Include, Module, ModuleId, Owner, Revision, Submodule, SubmoduleId,
};
use yin_xml::Element;

use crate::node_builder::{build_data_definition, build_typedef, is_data_definition};

#[derive(Clone, Copy)]
enum RootKind {
    Module,
    Submodule(ModuleId),
}

fn set_common_header(
    ctx: &mut Context,
    owner: Owner,
    yang_version: Option<String>,
    organization: Option<String>,
    contact: Option<String>,
    description: Option<String>,
    reference: Option<String>,
) {
    match owner {
        Owner::Module(m) => {
            let module = ctx.module_mut(m);
            module.yang_version = yang_version;
            module.organization = organization;
            module.contact = contact;
            module.description = description;
            module.reference = reference;
        }
        Owner::Submodule(s) => {
            let submodule = ctx.submodule_mut(s);
            submodule.yang_version = yang_version;
            submodule.organization = organization;
            submodule.contact = contact;
            submodule.description = description;
            submodule.reference = reference;
        }
    }
}

fn push_revision(ctx: &mut Context, owner: Owner, revision: Revision) {
    match owner {
        Owner::Module(m) => ctx.module_mut(m).revisions.push(revision),
        Owner::Submodule(s) => ctx.submodule_mut(s).revisions.push(revision),
    }
}

fn push_import(ctx: &mut Context, owner: Owner, import: Import) {
    match owner {
        Owner::Module(m) => ctx.module_mut(m).imports.push(import),
        Owner::Submodule(s) => ctx.submodule_mut(s).imports.push(import),
    }
}

fn push_include(ctx: &mut Context, owner: Owner, include: Include) {
    if let Owner::Module(m) = owner {
        ctx.module_mut(m).includes.push(include);
    }
}

fn build_revision<E: Element>(el: &E) -> Result<Revision, Error> {
    let position = Position::new(el.line());
    let date = el
        .attribute("date")
        .ok_or_else(|| Error::new(ErrorKind::MissArg, position, "'revision' missing required 'date' attribute"))?
        .to_string();
    let description = el.child("description").and_then(|d| d.text_child());
    let reference = el.child("reference").and_then(|r| r.text_child());
    Ok(Revision { date, description, reference })
}

fn load_from_search_path(ctx: &mut Context, name: &str, revision: Option<&str>, position: Position) -> Result<ModuleId, Error> {
    let dirs: Vec<PathBuf> = ctx.search_dirs().to_vec();
    for dir in dirs {
        let file_name = match revision {
            Some(rev) => format!("{name}@{rev}.yin"),
            None => format!("{name}.yin"),
        };
        let Ok(xml) = std::fs::read_to_string(dir.join(&file_name)) else {
            continue;
        };
        let doc = yin_xml::parse(&xml).map_err(|e| Error::new(ErrorKind::Evalid, position, format!("malformed import '{name}': {e}")))?;
        return load_module(ctx, &doc.root());
    }
    Err(Error::new(ErrorKind::Evalid, position, format!("cannot resolve import '{name}': not loaded and not found on search path")))
}

fn load_submodule_from_search_path(
    ctx: &mut Context,
    owning_module: ModuleId,
    name: &str,
    revision: Option<&str>,
    position: Position,
) -> Result<SubmoduleId, Error> {
    let dirs: Vec<PathBuf> = ctx.search_dirs().to_vec();
    for dir in dirs {
        let file_name = match revision {
            Some(rev) => format!("{name}@{rev}.yin"),
            None => format!("{name}.yin"),
        };
        let Ok(xml) = std::fs::read_to_string(dir.join(&file_name)) else {
            continue;
        };
        let doc = yin_xml::parse(&xml).map_err(|e| Error::new(ErrorKind::Evalid, position, format!("malformed include '{name}': {e}")))?;
        return load_submodule(ctx, owning_module, &doc.root());
    }
    Err(Error::new(ErrorKind::Evalid, position, format!("cannot resolve include '{name}': not loaded and not found on search path")))
}

fn resolve_import<E: Element>(ctx: &mut Context, el: &E) -> Result<Import, Error> {
    let position = Position::new(el.line());
    let module_name = el
        .attribute("module")
        .ok_or_else(|| Error::new(ErrorKind::MissArg, position, "'import' missing required 'module' attribute"))?
        .to_string();
    let prefix_el = el
        .child("prefix")
        .ok_or_else(|| Error::new(ErrorKind::MissStmt, position, "'import' missing required 'prefix' substatement"))?;
    let prefix_raw = prefix_el
        .attribute("value")
        .ok_or_else(|| Error::new(ErrorKind::MissArg, Position::new(prefix_el.line()), "'prefix' missing required 'value' attribute"))?
        .to_string();
    let revision = el.child("revision-date").and_then(|r| r.attribute("date").map(str::to_string));

    let module_name_atom = ctx.intern(&module_name);
    let target = match ctx.get_module(module_name_atom, revision.as_deref()) {
        Some(id) => id,
        None => load_from_search_path(ctx, &module_name, revision.as_deref(), position)?,
    };
    let prefix = ctx.intern(&prefix_raw);
    Ok(Import { module: target, prefix, revision })
}

fn resolve_include<E: Element>(ctx: &mut Context, owning_module: ModuleId, el: &E) -> Result<Include, Error> {
    let position = Position::new(el.line());
    let submodule_name = el
        .attribute("module")
        .ok_or_else(|| Error::new(ErrorKind::MissArg, position, "'include' missing required 'module' attribute"))?
        .to_string();
    let revision = el.child("revision-date").and_then(|r| r.attribute("date").map(str::to_string));
    let submodule_name_atom = ctx.intern(&submodule_name);

    let target = match ctx.get_submodule(submodule_name_atom, revision.as_deref()) {
        Some(id) => {
            if ctx.submodule(id).belongs_to != ctx.module(owning_module).name {
                return Err(Error::new(ErrorKind::Evalid, position, format!("submodule '{submodule_name}' does not belong to this module")));
            }
            id
        }
        None => load_submodule_from_search_path(ctx, owning_module, &submodule_name, revision.as_deref(), position)?,
    };

    Ok(Include { submodule: target, revision })
}

fn build_identity_into<E: Element>(ctx: &mut Context, owner: Owner, el: &E) -> Result<(), Error> {
    let header = crate::common_stmt::parse_common(ctx, el)?;
    let mut identity = Identity::new(header.name);
    identity.description = header.description;
    identity.reference = header.reference;
    identity.status = header.status;
    ctx.identities_mut(owner).push(identity);
    Ok(())
}

/// Link each identity's `base` (if declared) after every identity in
/// `owner` has been constructed, so same-module forward references work.
/// An identity B based on A is appended to A's `derived` list, and
/// transitively to every ancestor of A's, per the specification's
/// Concurrency/Data-flow notes on identity back-references.
fn link_identity_bases<E: Element>(ctx: &mut Context, owner: Owner, identity_els: &[E]) -> Result<(), Error> {
    for (index, el) in identity_els.iter().enumerate() {
        let Some(base_el) = el.child("base") else { continue };
        let position = Position::new(base_el.line());
        let base_name = base_el
            .attribute("name")
            .ok_or_else(|| Error::new(ErrorKind::MissArg, position, "'base' missing required 'name' attribute"))?;
        let scope = Scope::top_level(owner);
        let base_ref = resolve_identity(ctx, scope, base_name, position)?;
        let this_ref = IdentityRef { owner, identity: yin_schema::IdentityId(index as u32) };

        ctx.identity_mut(this_ref).base = Some(base_ref);

        let mut cursor = Some(base_ref);
        let mut hops = 0usize;
        while let Some(ancestor) = cursor {
            hops += 1;
            if hops > yin_common::limits::MAX_SCOPE_WALK_ITERATIONS {
                break;
            }
            ctx.identity_mut(ancestor).derived.push(this_ref);
            cursor = ctx.identity(ancestor).base;
        }
    }
    Ok(())
}

fn load_root<E: Element>(ctx: &mut Context, el: &E, kind: RootKind) -> Result<Owner, Error> {
    let position = Position::new(el.line());
    let expected_tag = match kind {
        RootKind::Module => "module",
        RootKind::Submodule(_) => "submodule",
    };
    if el.name() != expected_tag {
        return Err(Error::new(ErrorKind::Evalid, position, format!("expected '{expected_tag}' root element, found '{}'", el.name())));
    }
    let raw_name = el
        .attribute("name")
        .ok_or_else(|| Error::new(ErrorKind::MissArg, position, format!("'{expected_tag}' missing required 'name' attribute")))?;
    let name = ctx.intern(raw_name);

    let owner = match kind {
        RootKind::Module => Owner::Module(ctx.reserve_module(Module::placeholder(name))),
        RootKind::Submodule(_) => Owner::Submodule(ctx.reserve_submodule(Submodule::placeholder(name))),
    };

    let mut namespace: Option<String> = None;
    let mut prefix_raw: Option<String> = None;
    let mut belongs_to_raw: Option<String> = None;
    let mut yang_version: Option<String> = None;
    let mut organization: Option<String> = None;
    let mut contact: Option<String> = None;
    let mut description: Option<String> = None;
    let mut reference: Option<String> = None;

    let mut import_els: Vec<E> = Vec::new();
    let mut include_els: Vec<E> = Vec::new();
    let mut revision_els: Vec<E> = Vec::new();
    let mut typedef_els: Vec<E> = Vec::new();
    let mut identity_els: Vec<E> = Vec::new();
    let mut data_def_els: Vec<E> = Vec::new();

    for child in el.children() {
        if !child.is_yin_element() {
            continue;
        }
        let child_position = Position::new(child.line());
        match child.name() {
            "namespace" if matches!(kind, RootKind::Module) => {
                if namespace.is_some() {
                    return Err(Error::new(ErrorKind::TooMany, child_position, "duplicate 'namespace'"));
                }
                namespace = Some(
                    child
                        .attribute("uri")
                        .ok_or_else(|| Error::new(ErrorKind::MissArg, child_position, "'namespace' missing required 'uri' attribute"))?
                        .to_string(),
                );
            }
            "prefix" if matches!(kind, RootKind::Module) => {
                if prefix_raw.is_some() {
                    return Err(Error::new(ErrorKind::TooMany, child_position, "duplicate 'prefix'"));
                }
                prefix_raw = Some(
                    child
                        .attribute("value")
                        .ok_or_else(|| Error::new(ErrorKind::MissArg, child_position, "'prefix' missing required 'value' attribute"))?
                        .to_string(),
                );
            }
            "belongs-to" if matches!(kind, RootKind::Submodule(_)) => {
                if belongs_to_raw.is_some() {
                    return Err(Error::new(ErrorKind::TooMany, child_position, "duplicate 'belongs-to'"));
                }
                belongs_to_raw = Some(
                    child
                        .attribute("module")
                        .ok_or_else(|| Error::new(ErrorKind::MissArg, child_position, "'belongs-to' missing required 'module' attribute"))?
                        .to_string(),
                );
                let prefix_el = child
                    .child("prefix")
                    .ok_or_else(|| Error::new(ErrorKind::MissStmt, child_position, "'belongs-to' missing required 'prefix' substatement"))?;
                prefix_raw = Some(
                    prefix_el
                        .attribute("value")
                        .ok_or_else(|| Error::new(ErrorKind::MissArg, Position::new(prefix_el.line()), "'prefix' missing required 'value' attribute"))?
                        .to_string(),
                );
            }
            "yang-version" => {
                if yang_version.is_some() {
                    return Err(Error::new(ErrorKind::TooMany, child_position, "duplicate 'yang-version'"));
                }
                yang_version = child.attribute("value").map(str::to_string);
            }
            "organization" => {
                if organization.is_some() {
                    return Err(Error::new(ErrorKind::TooMany, child_position, "duplicate 'organization'"));
                }
                organization = child.text_child();
            }
            "contact" => {
                if contact.is_some() {
                    return Err(Error::new(ErrorKind::TooMany, child_position, "duplicate 'contact'"));
                }
                contact = child.text_child();
            }
            "description" => {
                if description.is_some() {
                    return Err(Error::new(ErrorKind::TooMany, child_position, "duplicate 'description'"));
                }
                description = child.text_child();
            }
            "reference" => {
                if reference.is_some() {
                    return Err(Error::new(ErrorKind::TooMany, child_position, "duplicate 'reference'"));
                }
                reference = child.text_child();
            }
            "import" => import_els.push(child),
            "include" => include_els.push(child),
            "revision" => revision_els.push(child),
            "typedef" => typedef_els.push(child),
            "identity" => identity_els.push(child),
            name if is_data_definition(name) => data_def_els.push(child),
            _ => {}
        }
    }

    match kind {
        RootKind::Module => {
            let namespace = namespace
                .filter(|s| !s.is_empty())
                .ok_or_else(|| Error::new(ErrorKind::MissArg, position, "'module' missing required non-empty 'namespace'"))?;
            let prefix_str = prefix_raw
                .filter(|s| !s.is_empty())
                .ok_or_else(|| Error::new(ErrorKind::MissArg, position, "'module' missing required non-empty 'prefix'"))?;
            let prefix = ctx.intern(&prefix_str);
            let Owner::Module(module_id) = owner else { unreachable!() };
            let module = ctx.module_mut(module_id);
            module.namespace = namespace;
            module.prefix = prefix;
        }
        RootKind::Submodule(owning_module) => {
            let belongs_to_name =
                belongs_to_raw.ok_or_else(|| Error::new(ErrorKind::MissStmt, position, "'submodule' missing required 'belongs-to'"))?;
            let belongs_to_atom = ctx.intern(&belongs_to_name);
            if belongs_to_atom != ctx.module(owning_module).name {
                return Err(Error::new(ErrorKind::Evalid, position, format!("submodule's belongs-to '{belongs_to_name}' does not match the including module")));
            }
            let prefix_str =
                prefix_raw.ok_or_else(|| Error::new(ErrorKind::MissStmt, position, "'belongs-to' missing required 'prefix' substatement"))?;
            let prefix = ctx.intern(&prefix_str);
            let Owner::Submodule(submodule_id) = owner else { unreachable!() };
            let submodule = ctx.submodule_mut(submodule_id);
            submodule.belongs_to = belongs_to_atom;
            submodule.prefix = prefix;
        }
    }

    set_common_header(ctx, owner, yang_version, organization, contact, description, reference);

    for rev_el in &revision_els {
        let revision = build_revision(rev_el)?;
        push_revision(ctx, owner, revision);
    }

    for imp_el in &import_els {
        let import = resolve_import(ctx, imp_el)?;
        push_import(ctx, owner, import);
    }

    let owning_module_for_includes = match owner {
        Owner::Module(m) => Some(m),
        Owner::Submodule(_) => None,
    };
    for inc_el in &include_els {
        match owning_module_for_includes {
            Some(owning_module) => {
                let include = resolve_include(ctx, owning_module, inc_el)?;
                push_include(ctx, owner, include);
            }
            None => {
                return Err(Error::new(ErrorKind::InStmt, Position::new(inc_el.line()), "'include' is not valid inside a submodule in this core"));
            }
        }
    }

    for identity_el in &identity_els {
        build_identity_into(ctx, owner, identity_el)?;
    }
    link_identity_bases(ctx, owner, &identity_els)?;

    let scope = Scope::top_level(owner);
    for td_el in &typedef_els {
        let typedef = build_typedef(ctx, scope, td_el)?;
        ctx.owner_typedefs_mut(owner).push(typedef);
    }

    for data_el in &data_def_els {
        build_data_definition(ctx, owner, scope, None, data_el)?;
    }

    Ok(owner)
}

/// Load a `module` element, registering it in `ctx` on success.
pub fn load_module<E: Element>(ctx: &mut Context, el: &E) -> Result<ModuleId, Error> {
    let position = Position::new(el.line());
    let owner = load_root(ctx, el, RootKind::Module)?;
    let Owner::Module(module_id) = owner else { unreachable!() };
    ctx.finalize_module(module_id, position)
}

/// Load a `submodule` element belonging to `owning_module`, registering it
/// in `ctx` on success. The submodule's own `belongs-to` is validated
/// against `owning_module`'s name (`Evalid` on mismatch).
pub fn load_submodule<E: Element>(ctx: &mut Context, owning_module: ModuleId, el: &E) -> Result<SubmoduleId, Error> {
    let position = Position::new(el.line());
    let owner = load_root(ctx, el, RootKind::Submodule(owning_module))?;
    let Owner::Submodule(submodule_id) = owner else { unreachable!() };
    ctx.finalize_submodule(submodule_id, position)
}
