//! Compiler-wide limits and thresholds.

/// Maximum number of hops allowed when walking a typedef's `der` chain to
/// its built-in base, per the cycle-detection testable property in the
/// specification.
pub const MAX_TYPEDEF_CHAIN: usize = 128;

/// Maximum number of iterations allowed while walking lexical ancestors
/// during grouping/typedef scope search, as a defensive bound against a
/// malformed (cyclic) parent chain.
pub const MAX_SCOPE_WALK_ITERATIONS: usize = 10_000;
