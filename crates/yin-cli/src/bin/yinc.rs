use anyhow::Result;
use clap::Parser;
use yin_cli::args::CliArgs;
use yin_cli::driver;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let filter = if args.verbose {
        "yin=debug,yinc=debug"
    } else {
        "yin=warn,yinc=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();

    let failures = driver::run(&args)?;
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
