//! String interning for schema names.
//!
//! Every identifier that enters the schema (module names, prefixes, statement
//! names, typedef/identity/grouping names, ...) is interned exactly once. The
//! `Atom` returned by [`Interner::intern`] is a small `Copy` handle; comparing
//! two `Atom`s is comparing two `u32`s, which stands in for the original
//! implementation's pointer-equality-after-interning invariant.

use rustc_hash::FxHashMap;

/// An interned string handle.
///
/// `Atom` is cheap to copy and compare; it carries no lifetime because the
/// backing string lives in the owning [`Interner`] for as long as the
/// `Interner` itself is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(u32);

impl Atom {
    /// A placeholder atom used before a name has been interned.
    pub const NONE: Atom = Atom(u32::MAX);
}

/// An append-only string interner.
///
/// Interning is idempotent: interning the same string twice returns the same
/// `Atom`. The interner never shrinks or removes entries for the lifetime of
/// the owning [`crate::Error`]-producing load, matching the append-only
/// string pool described for the context.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Atom>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s`, returning its `Atom`. Repeated calls with an
    /// equal string return the same `Atom`.
    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.lookup.get(s) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, atom);
        atom
    }

    /// Resolve an `Atom` back to its string. Panics if `atom` was not
    /// produced by this interner — an internal invariant violation, not a
    /// recoverable error.
    pub fn resolve(&self, atom: Atom) -> &str {
        &self.strings[atom.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let mut interner = Interner::new();
        let a = interner.intern("container");
        let b = interner.intern("container");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_strings_get_distinct_atoms() {
        let mut interner = Interner::new();
        let a = interner.intern("leaf");
        let b = interner.intern("leaf-list");
        assert_ne!(a, b);
    }

    #[test]
    fn resolve_round_trips() {
        let mut interner = Interner::new();
        let atom = interner.intern("grouping");
        assert_eq!(interner.resolve(atom), "grouping");
    }
}
