#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use tsreveal_cli::args::CliArgs;
use tsreveal_cli::config::Settings;
use tsreveal_cli::{driver, watch};

fn main() -> Result<()> {
    // Only installs a subscriber when TSREVEAL_LOG or RUST_LOG is set.
    tsreveal_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let settings = Settings::from_args(&args)?;

    if settings.watch {
        return watch::run(&settings);
    }

    let color = settings.pretty || std::io::stderr().is_terminal();
    let output = driver::run(&settings, color)?;
    driver::write_output(settings.out.as_deref(), &output.text)?;
    if !output.diagnostics.is_empty() {
        eprintln!("{}", output.diagnostics);
    }
    Ok(())
}
