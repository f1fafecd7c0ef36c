//! Source position tracking.
//!
//! Unlike a full byte-range span, YIN diagnostics only ever need to point at
//! the source line of the offending XML element (the granularity the
//! original tooling reports at), so `Position` is a single line number rather
//! than a `[start, end)` byte range.

use serde::{Deserialize, Serialize};

/// A 1-based source line number, or [`Position::UNKNOWN`] when the
/// originating element carries no line information (e.g. synthesized during
/// a test).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position(u32);

impl Position {
    pub const UNKNOWN: Position = Position(0);

    #[inline]
    pub const fn new(line: u32) -> Self {
        Position(line)
    }

    #[inline]
    pub const fn line(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_known(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_known() {
            write!(f, "line {}", self.0)
        } else {
            write!(f, "<unknown>")
        }
    }
}
