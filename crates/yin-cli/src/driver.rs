use std::path::Path;

use anyhow::{Context as _, Result};
use colored::Colorize;
use yin_common::diagnostics::CollectingSink;
use yin_schema::Context;

use crate::args::CliArgs;

/// Load every file named on the command line, each into its own
/// [`Context`] sharing the configured search path, and print a summary
/// (success) or the collected diagnostics (failure) for each.
///
/// Returns the number of files that failed to load, so `main` can turn it
/// into a process exit code.
pub fn run(args: &CliArgs) -> Result<usize> {
    let mut failures = 0;
    for file in &args.files {
        if !load_one(file, &args.search_dirs)? {
            failures += 1;
        }
    }
    Ok(failures)
}

/// Load a single file into a fresh `Context`, printing either its schema
/// summary or its diagnostics. Returns `true` on success.
fn load_one(file: &Path, search_dirs: &[std::path::PathBuf]) -> Result<bool> {
    let xml =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let doc = match yin_xml::parse(&xml) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("{} {}: {err}", "error:".red().bold(), file.display());
            return Ok(false);
        }
    };

    let mut ctx = Context::with_search_dirs(Box::new(CollectingSink::new()), search_dirs.to_vec());
    let result = yin_loader::load_module(&mut ctx, &doc.root());

    match result {
        Ok(module_id) => {
            let module = ctx.module(module_id);
            let name = ctx.resolve(module.name).to_string();
            let prefix = ctx.resolve(module.prefix).to_string();
            println!(
                "{} {name} ({}) prefix={prefix} children={}",
                "ok:".green().bold(),
                module.namespace,
                module.top_level.len(),
            );
            Ok(true)
        }
        Err(err) => {
            eprintln!("{} {}:", "error:".red().bold(), file.display());
            eprintln!("  {err}");
            Ok(false)
        }
    }
}
