//! The `type` sub-language builder (§4.2): enum/bits ordinal assignment,
//! identityref, leafref, union, and structural acknowledgement of the
//! remaining built-ins.

mod builder;

pub use builder::build_type;
