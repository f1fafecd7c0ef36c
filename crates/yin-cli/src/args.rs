use std::path::PathBuf;

use clap::Parser;

/// CLI arguments for the `yinc` binary.
#[derive(Parser, Debug)]
#[command(name = "yinc", version, about = "Load YIN modules and report their schema")]
pub struct CliArgs {
    /// YIN files to load.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Add a directory to the module search path (repeatable).
    #[arg(short = 'I', long = "search-dir", value_name = "DIR")]
    pub search_dirs: Vec<PathBuf>,

    /// Enable verbose logging (equivalent to RUST_LOG=yin=debug).
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
