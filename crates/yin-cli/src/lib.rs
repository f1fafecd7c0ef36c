//! The `yinc` driver: argument parsing and the load-and-report loop.
//!
//! Contains no YANG semantics of its own; it is a thin shell over
//! `yin_loader::load_module`.

pub mod args;
pub mod driver;
