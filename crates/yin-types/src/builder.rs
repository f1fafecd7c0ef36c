//! The `type` sub-language builder (§4.2).

use yin_common::{Atom, Error, ErrorKind, Position};
use yin_resolver::{resolve_identity, resolve_type_name, split_prefix, Scope, TypeLookup};
use yin_schema::{BitItem, BuiltIn, Context, Derivation, EnumItem, Status, Type, TypePayload};
use yin_xml::Element;

/// Build a [`Type`] from a `type` element, resolving its name and
/// recursively building any nested member types (`union`).
pub fn build_type<E: Element>(ctx: &mut Context, scope: Scope, el: &E) -> Result<Type, Error> {
    let _span = tracing::trace_span!("build_type").entered();
    let position = Position::new(el.line());
    let name = el
        .attribute("name")
        .ok_or_else(|| Error::new(ErrorKind::MissArg, position, "'type' missing required 'name' attribute"))?;
    let (prefix, _local) = split_prefix(name);

    let lookup = resolve_type_name(ctx, scope, name, position)?;
    let (base, der) = match lookup {
        TypeLookup::BuiltIn(base) => (base, Derivation::BuiltIn),
        TypeLookup::Typedef(handle) => (ctx.typedef(handle).type_.base, Derivation::Typedef(handle)),
    };

    let payload = match base {
        BuiltIn::Enumeration => build_enum_payload(ctx, &der, el, position)?,
        BuiltIn::Bits => build_bits_payload(ctx, &der, el, position)?,
        BuiltIn::Identityref => build_identityref_payload(ctx, scope, el, position)?,
        BuiltIn::Leafref => build_leafref_payload(el, position)?,
        BuiltIn::Union => build_union_payload(ctx, scope, el, position)?,
        other => {
            reject_unknown_substatements(el, other)?;
            TypePayload::None
        }
    };

    Ok(Type { base, der, prefix: prefix.map(str::to_string), payload })
}

/// The substatement names §4.2 structurally acknowledges without building a
/// full payload for (range/length/pattern/fraction-digits/require-instance
/// grammars are explicitly out of scope). Anything else under one of these
/// built-ins is an `InStmt` error.
fn allowed_substatements(base: BuiltIn) -> &'static [&'static str] {
    match base {
        BuiltIn::Int8
        | BuiltIn::Int16
        | BuiltIn::Int32
        | BuiltIn::Int64
        | BuiltIn::Uint8
        | BuiltIn::Uint16
        | BuiltIn::Uint32
        | BuiltIn::Uint64 => &["range"],
        BuiltIn::Decimal64 => &["range", "fraction-digits"],
        BuiltIn::String => &["length", "pattern"],
        BuiltIn::Binary => &["length"],
        BuiltIn::InstanceIdentifier => &["require-instance"],
        BuiltIn::Boolean | BuiltIn::Empty => &[],
        BuiltIn::Enumeration | BuiltIn::Bits | BuiltIn::Identityref | BuiltIn::Leafref | BuiltIn::Union => &[],
    }
}

fn reject_unknown_substatements<E: Element>(el: &E, base: BuiltIn) -> Result<(), Error> {
    let allowed = allowed_substatements(base);
    for child in el.children() {
        if !allowed.contains(&child.name()) {
            return Err(Error::new(
                ErrorKind::InStmt,
                Position::new(child.line()),
                format!("unexpected substatement '{}' under this type", child.name()),
            ));
        }
    }
    Ok(())
}

struct AssignedOrdinal {
    name: Atom,
    value: i64,
    status: Status,
}

/// Extract a `(name, explicit-value, status, line)` tuple from an `enum` or
/// `bit` child, reading the explicit value from `value_stmt`'s `value`
/// attribute (`"value"` for enums, `"position"` for bits).
fn extract_ordinal<E: Element>(el: &E, value_stmt: &str) -> Result<(String, Option<i64>, Status, u32), Error> {
    let position = Position::new(el.line());
    let name = el
        .attribute("name")
        .ok_or_else(|| Error::new(ErrorKind::MissArg, position, format!("'{}' missing required 'name' attribute", el.name())))?
        .to_string();

    let explicit = match el.child(value_stmt) {
        Some(value_el) => {
            let value_position = Position::new(value_el.line());
            let raw = value_el
                .attribute("value")
                .ok_or_else(|| Error::new(ErrorKind::MissArg, value_position, format!("'{value_stmt}' missing required 'value' attribute")))?;
            let parsed = raw
                .parse::<i64>()
                .map_err(|_| Error::new(ErrorKind::InArg, value_position, format!("'{raw}' is not a valid integer")))?;
            Some(parsed)
        }
        None => None,
    };

    let status = match el.child("status") {
        Some(status_el) => {
            let status_position = Position::new(status_el.line());
            let raw = status_el
                .attribute("value")
                .ok_or_else(|| Error::new(ErrorKind::MissArg, status_position, "'status' missing required 'value' attribute"))?;
            Status::parse(raw).ok_or_else(|| Error::new(ErrorKind::InArg, status_position, format!("'{raw}' is not a valid status")))?
        }
        None => Status::Current,
    };

    Ok((name, explicit, status, position.line()))
}

/// Shared enum/bit ordinal assignment (§4.2): explicit values must be
/// in-range and unique; omitted values auto-increment from the
/// highest-seen-so-far + 1, starting at 0. Names must be non-empty,
/// whitespace-free, and pairwise unique.
fn assign_ordinals(ctx: &mut Context, raw: Vec<(String, Option<i64>, Status, u32)>, min: i64, max: i64) -> Result<Vec<AssignedOrdinal>, Error> {
    let mut assigned: Vec<AssignedOrdinal> = Vec::with_capacity(raw.len());
    let mut last_value: Option<i64> = None;

    for (name, explicit, status, line) in raw {
        let position = Position::new(line);
        if name.is_empty() || name.trim() != name {
            return Err(Error::new(ErrorKind::EnumWhitespace, position, format!("'{name}' has leading or trailing whitespace")));
        }
        if assigned.iter().any(|a| ctx.resolve(a.name) == name) {
            return Err(Error::new(ErrorKind::EnumDupName, position, format!("duplicate name '{name}'")));
        }

        let value = match explicit {
            Some(v) => {
                if v < min || v > max {
                    return Err(Error::new(ErrorKind::InArg, position, format!("value {v} is out of range")));
                }
                v
            }
            None => last_value.map_or(0, |v| v + 1),
        };
        if assigned.iter().any(|a| a.value == value) {
            return Err(Error::new(ErrorKind::EnumDupVal, position, format!("duplicate value {value}")));
        }

        last_value = Some(value);
        let interned = ctx.intern(&name);
        assigned.push(AssignedOrdinal { name: interned, value, status });
    }

    Ok(assigned)
}

/// If `der` is a typedef handle whose resolved type already carries
/// `enum`/`bit` items, a leaf that merely names that typedef inherits them
/// without repeating any locally (the common "enumeration typedef" pattern).
fn inherited_payload(ctx: &Context, der: &Derivation) -> Option<TypePayload> {
    match der {
        Derivation::Typedef(handle) => match &ctx.typedef(*handle).type_.payload {
            payload @ (TypePayload::Enumeration(_) | TypePayload::Bits(_)) => Some(payload.clone()),
            _ => None,
        },
        Derivation::BuiltIn => None,
    }
}

fn build_enum_payload<E: Element>(ctx: &mut Context, der: &Derivation, el: &E, position: Position) -> Result<TypePayload, Error> {
    let children = el.children_named("enum");
    if children.is_empty() {
        if let Some(inherited) = inherited_payload(ctx, der) {
            return Ok(inherited);
        }
        return Err(Error::new(ErrorKind::MissStmt, position, "enumeration type requires at least one 'enum' substatement"));
    }
    let raw = children.iter().map(|c| extract_ordinal(c, "value")).collect::<Result<Vec<_>, _>>()?;
    let assigned = assign_ordinals(ctx, raw, i32::MIN as i64, i32::MAX as i64)?;
    Ok(TypePayload::Enumeration(
        assigned.into_iter().map(|a| EnumItem { name: a.name, value: a.value, status: a.status }).collect(),
    ))
}

fn build_bits_payload<E: Element>(ctx: &mut Context, der: &Derivation, el: &E, position: Position) -> Result<TypePayload, Error> {
    let children = el.children_named("bit");
    if children.is_empty() {
        if let Some(inherited) = inherited_payload(ctx, der) {
            return Ok(inherited);
        }
        return Err(Error::new(ErrorKind::MissStmt, position, "bits type requires at least one 'bit' substatement"));
    }
    let raw = children.iter().map(|c| extract_ordinal(c, "position")).collect::<Result<Vec<_>, _>>()?;
    let assigned = assign_ordinals(ctx, raw, 0, u32::MAX as i64)?;
    Ok(TypePayload::Bits(
        assigned.into_iter().map(|a| BitItem { name: a.name, position: a.value as u32, status: a.status }).collect(),
    ))
}

fn build_identityref_payload<E: Element>(ctx: &mut Context, scope: Scope, el: &E, position: Position) -> Result<TypePayload, Error> {
    let base_el = el
        .child("base")
        .ok_or_else(|| Error::new(ErrorKind::MissStmt, position, "identityref type requires a 'base' substatement"))?;
    let base_position = Position::new(base_el.line());
    let base_name = base_el
        .attribute("name")
        .ok_or_else(|| Error::new(ErrorKind::MissArg, base_position, "'base' missing required 'name' attribute"))?;
    let identity = resolve_identity(ctx, scope, base_name, base_position)?;
    Ok(TypePayload::Identityref(identity))
}

fn build_leafref_payload<E: Element>(el: &E, position: Position) -> Result<TypePayload, Error> {
    let path_el = el.child("path").ok_or_else(|| Error::new(ErrorKind::MissStmt, position, "leafref type requires a 'path' substatement"))?;
    let path_position = Position::new(path_el.line());
    let path = path_el
        .attribute("value")
        .ok_or_else(|| Error::new(ErrorKind::MissArg, path_position, "'path' missing required 'value' attribute"))?
        .to_string();

    let require_instance = match el.child("require-instance") {
        Some(ri) => {
            let ri_position = Position::new(ri.line());
            let raw = ri
                .attribute("value")
                .ok_or_else(|| Error::new(ErrorKind::MissArg, ri_position, "'require-instance' missing required 'value' attribute"))?;
            match raw {
                "true" => true,
                "false" => false,
                _ => return Err(Error::new(ErrorKind::InArg, ri_position, format!("'{raw}' is not a valid require-instance value"))),
            }
        }
        None => true,
    };

    Ok(TypePayload::Leafref { path, require_instance })
}

fn build_union_payload<E: Element>(ctx: &mut Context, scope: Scope, el: &E, position: Position) -> Result<TypePayload, Error> {
    let members = el.children_named("type");
    if members.is_empty() {
        return Err(Error::new(ErrorKind::MissStmt, position, "union type requires at least one member 'type' substatement"));
    }
    let mut built = Vec::with_capacity(members.len());
    for member in &members {
        built.push(build_type(ctx, scope, member)?);
    }
    Ok(TypePayload::Union(built))
}

#[cfg(test)]
mod tests {
    use super::*;
    use yin_common::diagnostics::CollectingSink;
    use yin_schema::{Module, NodeArena, Owner};

    fn new_ctx() -> Context {
        Context::new(Box::new(CollectingSink::new()))
    }

    fn bare_module(ctx: &mut Context) -> yin_schema::ModuleId {
        let name = ctx.intern("m");
        let prefix = ctx.intern("m");
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

    #[test]
    fn builtin_numeric_type_has_no_payload() {
        let mut ctx = new_ctx();
        let m = bare_module(&mut ctx);
        let scope = Scope::top_level(Owner::Module(m));
        let doc = yin_xml::parse(r#"<type name="uint32" xmlns="urn:ietf:params:xml:ns:yang:yin:1"/>"#).unwrap();
        let t = build_type(&mut ctx, scope, &doc.root()).unwrap();
        assert_eq!(t.base, BuiltIn::Uint32);
        assert!(matches!(t.payload, TypePayload::None));
    }

    #[test]
    fn enum_auto_increment_detects_collision() {
        let mut ctx = new_ctx();
        let m = bare_module(&mut ctx);
        let scope = Scope::top_level(Owner::Module(m));
        let xml = r#"
            <type name="enumeration" xmlns="urn:ietf:params:xml:ns:yang:yin:1">
              <enum name="a"/>
              <enum name="b"><value value="5"/></enum>
              <enum name="c"/>
              <enum name="d"><value value="5"/></enum>
            </type>"#;
        let doc = yin_xml::parse(xml).unwrap();
        let err = build_type(&mut ctx, scope, &doc.root()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::EnumDupVal);
    }

    #[test]
    fn enum_success_assigns_expected_values() {
        let mut ctx = new_ctx();
        let m = bare_module(&mut ctx);
        let scope = Scope::top_level(Owner::Module(m));
        let xml = r#"
            <type name="enumeration" xmlns="urn:ietf:params:xml:ns:yang:yin:1">
              <enum name="a"/>
              <enum name="b"><value value="5"/></enum>
              <enum name="c"/>
            </type>"#;
        let doc = yin_xml::parse(xml).unwrap();
        let t = build_type(&mut ctx, scope, &doc.root()).unwrap();
        match t.payload {
            TypePayload::Enumeration(items) => {
                let values: Vec<i64> = items.iter().map(|i| i.value).collect();
                assert_eq!(values, vec![0, 5, 6]);
            }
            _ => panic!("expected enumeration payload"),
        }
    }

    #[test]
    fn bits_auto_increment_detects_collision() {
        let mut ctx = new_ctx();
        let m = bare_module(&mut ctx);
        let scope = Scope::top_level(Owner::Module(m));
        let xml = r#"
            <type name="bits" xmlns="urn:ietf:params:xml:ns:yang:yin:1">
              <bit name="a"/>
              <bit name="b"/>
              <bit name="c"><position value="0"/></bit>
            </type>"#;
        let doc = yin_xml::parse(xml).unwrap();
        let err = build_type(&mut ctx, scope, &doc.root()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::EnumDupVal);
    }

    #[test]
    fn union_builds_each_member_independently() {
        let mut ctx = new_ctx();
        let m = bare_module(&mut ctx);
        let scope = Scope::top_level(Owner::Module(m));
        let xml = r#"
            <type name="union" xmlns="urn:ietf:params:xml:ns:yang:yin:1">
              <type name="int32"/>
              <type name="string"/>
            </type>"#;
        let doc = yin_xml::parse(xml).unwrap();
        let t = build_type(&mut ctx, scope, &doc.root()).unwrap();
        match t.payload {
            TypePayload::Union(members) => {
                assert_eq!(members.len(), 2);
                assert_eq!(members[0].base, BuiltIn::Int32);
                assert_eq!(members[1].base, BuiltIn::String);
            }
            _ => panic!("expected union payload"),
        }
    }

    #[test]
    fn enumeration_typedef_with_no_local_enums_is_missing_substatement() {
        let mut ctx = new_ctx();
        let m = bare_module(&mut ctx);
        let scope = Scope::top_level(Owner::Module(m));
        let xml = r#"<type name="enumeration" xmlns="urn:ietf:params:xml:ns:yang:yin:1"/>"#;
        let doc = yin_xml::parse(xml).unwrap();
        let err = build_type(&mut ctx, scope, &doc.root()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissStmt);
    }

    #[test]
    fn leaf_naming_an_enumeration_typedef_inherits_its_enums() {
        use yin_schema::Typedef;

        let mut ctx = new_ctx();
        let m = bare_module(&mut ctx);
        let scope = Scope::top_level(Owner::Module(m));

        let enum_xml = r#"
            <type name="enumeration" xmlns="urn:ietf:params:xml:ns:yang:yin:1">
              <enum name="red"/>
              <enum name="green"/>
            </type>"#;
        let doc = yin_xml::parse(enum_xml).unwrap();
        let enum_type = build_type(&mut ctx, scope, &doc.root()).unwrap();

        let typedef_name = ctx.intern("color");
        let typedef = Typedef {
            name: typedef_name,
            type_: enum_type,
            units: None,
            default: None,
            description: None,
            reference: None,
            status: yin_schema::Status::Current,
        };
        ctx.owner_typedefs_mut(Owner::Module(m)).push(typedef);

        let leaf_xml = r#"<type name="color" xmlns="urn:ietf:params:xml:ns:yang:yin:1"/>"#;
        let doc = yin_xml::parse(leaf_xml).unwrap();
        let t = build_type(&mut ctx, scope, &doc.root()).unwrap();
        match t.payload {
            TypePayload::Enumeration(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(ctx.resolve(items[0].name), "red");
            }
            _ => panic!("expected inherited enumeration payload"),
        }
    }

    #[test]
    fn unknown_substatement_under_string_is_rejected() {
        let mut ctx = new_ctx();
        let m = bare_module(&mut ctx);
        let scope = Scope::top_level(Owner::Module(m));
        let xml = r#"
            <type name="string" xmlns="urn:ietf:params:xml:ns:yang:yin:1">
              <range value="0..10"/>
            </type>"#;
        let doc = yin_xml::parse(xml).unwrap();
        let err = build_type(&mut ctx, scope, &doc.root()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InStmt);
    }
}
