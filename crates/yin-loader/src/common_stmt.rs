//! Common statement parsing (§4.3): the `name`/`description`/`reference`/
//! `status`/`config` header shared by every schema statement.

use yin_common::{Atom, Error, ErrorKind, Position};
use yin_schema::{Config, Status};
use yin_xml::Element;

/// The generic header fields extracted from any statement. `config` is
/// `None` when the statement left it unset, signalling inheritance from
/// the enclosing node (or read-write at the top level); see §3's
/// invariant on config inheritance.
pub(crate) struct CommonHeader {
    pub name: Atom,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub status: Status,
    pub config: Option<Config>,
}

pub(crate) fn parse_common<E: Element>(ctx: &mut yin_schema::Context, el: &E) -> Result<CommonHeader, Error> {
    let position = Position::new(el.line());
    let raw_name = el
        .attribute("name")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::new(ErrorKind::MissArg, position, format!("'{}' missing required 'name' attribute", el.name())))?;
    let name = ctx.intern(raw_name);

    let mut description: Option<String> = None;
    let mut reference: Option<String> = None;
    let mut status: Option<Status> = None;
    let mut config: Option<Config> = None;

    for child in el.children() {
        let child_position = Position::new(child.line());
        match child.name() {
            "description" => {
                if description.is_some() {
                    return Err(Error::new(ErrorKind::TooMany, child_position, "duplicate 'description'"));
                }
                description = Some(child.text_child().unwrap_or_default());
            }
            "reference" => {
                if reference.is_some() {
                    return Err(Error::new(ErrorKind::TooMany, child_position, "duplicate 'reference'"));
                }
                reference = Some(child.text_child().unwrap_or_default());
            }
            "status" => {
                if status.is_some() {
                    return Err(Error::new(ErrorKind::TooMany, child_position, "duplicate 'status'"));
                }
                let raw = child
                    .attribute("value")
                    .ok_or_else(|| Error::new(ErrorKind::MissArg, child_position, "'status' missing required 'value' attribute"))?;
                status = Some(Status::parse(raw).ok_or_else(|| Error::new(ErrorKind::InArg, child_position, format!("'{raw}' is not a valid status")))?);
            }
            "config" => {
                if config.is_some() {
                    return Err(Error::new(ErrorKind::TooMany, child_position, "duplicate 'config'"));
                }
                let raw = child
                    .attribute("value")
                    .ok_or_else(|| Error::new(ErrorKind::MissArg, child_position, "'config' missing required 'value' attribute"))?;
                config =
                    Some(Config::parse(raw).ok_or_else(|| Error::new(ErrorKind::InArg, child_position, format!("'{raw}' is not a valid config value")))?);
            }
            _ => {}
        }
    }

    Ok(CommonHeader { name, description, reference, status: status.unwrap_or(Status::Current), config })
}
