//! The error taxonomy and diagnostic sink.
//!
//! Every fallible operation in the core returns `Result<T, Error>`. `Error`
//! always carries the [`Position`] of the XML element that triggered it, so
//! callers never have to reconstruct "where did this come from" after the
//! fact.

use crate::position::Position;
use std::fmt;

/// The stable taxonomy of error kinds a load can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required attribute absent.
    MissArg,
    /// Required child statement absent.
    MissStmt,
    /// Singleton statement appearing more than once.
    TooMany,
    /// Unknown or contextually invalid statement.
    InStmt,
    /// Invalid attribute value (including unresolved references).
    InArg,
    /// Prefix not bound in the current scope.
    InPrefix,
    /// Duplicate enum/bit name among siblings.
    EnumDupName,
    /// Duplicate enum/bit value among siblings.
    EnumDupVal,
    /// Enum/bit name has leading or trailing whitespace.
    EnumWhitespace,
    /// A declared list key does not resolve to any child leaf.
    KeyMiss,
    /// The same key name is repeated in a list's `key` statement.
    KeyDup,
    /// A key name resolves to a child that is not a leaf.
    KeyNotLeaf,
    /// A key leaf has the built-in `empty` type.
    KeyType,
    /// A key leaf's `config` does not match its list's `config`.
    KeyConfig,
    /// Generic structural error: missing required root attributes, failed
    /// import/include, duplicate module, belongs-to mismatch.
    Evalid,
    /// Allocation failure or programming invariant violation.
    Efatal,
}

impl ErrorKind {
    /// A short machine-stable tag, used in diagnostic output.
    pub const fn tag(self) -> &'static str {
        match self {
            ErrorKind::MissArg => "MISSARG",
            ErrorKind::MissStmt => "MISSSTMT2",
            ErrorKind::TooMany => "TOOMANY",
            ErrorKind::InStmt => "INSTMT",
            ErrorKind::InArg => "INARG",
            ErrorKind::InPrefix => "INPREFIX",
            ErrorKind::EnumDupName => "ENUM_DUPNAME",
            ErrorKind::EnumDupVal => "ENUM_DUPVAL",
            ErrorKind::EnumWhitespace => "ENUM_WS",
            ErrorKind::KeyMiss => "KEY_MISS",
            ErrorKind::KeyDup => "KEY_DUP",
            ErrorKind::KeyNotLeaf => "KEY_NLEAF",
            ErrorKind::KeyType => "KEY_TYPE",
            ErrorKind::KeyConfig => "KEY_CONFIG",
            ErrorKind::Evalid => "EVALID",
            ErrorKind::Efatal => "EFATAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A diagnostic raised during a load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub position: Position,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, position: Position, message: impl Into<String>) -> Self {
        Error {
            kind,
            position,
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.kind, self.position, self.message)
    }
}

impl std::error::Error for Error {}

/// A pluggable sink for diagnostics emitted during a load.
///
/// The core always emits a diagnostic at its point of detection, before the
/// triggering `Result::Err` unwinds (see the specification's error handling
/// design); the sink decides what happens to it.
pub trait DiagnosticSink {
    fn report(&mut self, error: &Error);
}

/// The default sink: collects every diagnostic into a `Vec` for later
/// inspection (e.g. by a caller that wants to display all errors from a
/// failed load, not just the first).
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Vec<Error>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, error: &Error) {
        self.diagnostics.push(error.clone());
    }
}

/// A sink that forwards every diagnostic to the `tracing` facade at `warn`
/// level, for callers that want the core's diagnostics folded into their
/// regular log stream instead of collected separately.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, error: &Error) {
        tracing::warn!(kind = error.kind.tag(), position = %error.position, "{}", error.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_accumulates() {
        let mut sink = CollectingSink::new();
        sink.report(&Error::new(ErrorKind::MissArg, Position::new(3), "missing `name`"));
        sink.report(&Error::new(ErrorKind::TooMany, Position::new(5), "duplicate `prefix`"));
        assert_eq!(sink.diagnostics().len(), 2);
        assert_eq!(sink.diagnostics()[0].kind, ErrorKind::MissArg);
    }

    #[test]
    fn error_display_includes_kind_and_line() {
        let err = Error::new(ErrorKind::InPrefix, Position::new(42), "unbound prefix `a`");
        let rendered = err.to_string();
        assert!(rendered.contains("INPREFIX"));
        assert!(rendered.contains("42"));
    }
}
