//! The module loader: common-statement parsing, the three-pass node
//! builders, and the top-level three-pass module/submodule driver.

mod common_stmt;
mod module_loader;
mod node_builder;

pub use module_loader::{load_module, load_submodule};
