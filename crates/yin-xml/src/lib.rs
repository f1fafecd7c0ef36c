//! The YIN element tree: the core's only XML collaborator.
//!
//! XML tokenization and tree building are explicitly out of scope for the
//! schema compiler core (see the specification, §1) — the core is written
//! against the narrow [`Element`] trait only. This crate supplies the one
//! concrete implementation the workspace uses to actually run: a thin
//! adapter over [`roxmltree`], a real, maintained XML tree crate (the same
//! one used by XML-schema-adjacent tooling elsewhere in the ecosystem).
//!
//! Nothing outside this crate may depend on `roxmltree` directly.

mod element;
mod roxml;

pub use element::{Element, YIN_NAMESPACE};
pub use roxml::{parse, ParseError, XmlDocument, XmlNode};
