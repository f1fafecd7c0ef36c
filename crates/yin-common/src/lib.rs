//! Common types shared across the YANG schema compiler core.
//!
//! This crate provides the foundations every other crate in the workspace builds on:
//! - String interning (`Atom`, `Interner`)
//! - Source position tracking (`Position`)
//! - The diagnostic taxonomy and error type (`ErrorKind`, `Error`)
//! - Compiler-wide limits (`limits`)

pub mod diagnostics;
pub mod interner;
pub mod limits;
pub mod position;

pub use diagnostics::{Error, ErrorKind};
pub use interner::{Atom, Interner};
pub use position::Position;
