use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// CLI arguments for the tsreveal binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsreveal",
    version,
    about = "Print TypeScript type aliases with their types fully expanded"
)]
pub struct CliArgs {
    /// TypeScript file whose type aliases are revealed.
    pub file: PathBuf,

    /// Keep running and re-render whenever the file changes.
    #[arg(short = 'w', long)]
    pub watch: bool,

    /// Write the rendered document to this file instead of stdout.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Leave nested alias references as names instead of expanding them.
    #[arg(long)]
    pub shallow: bool,

    /// Print `[{ "name", "text" }]` JSON instead of formatted declarations.
    #[arg(long)]
    pub json: bool,

    /// Quiet period after the last change before re-rendering (watch mode).
    #[arg(long = "debounce-ms", value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Line width of the formatted output.
    #[arg(long = "print-width", value_name = "COLUMNS")]
    pub print_width: Option<usize>,

    /// How the derived document is named (watch mode).
    #[arg(long, value_enum, ignore_case = true)]
    pub naming: Option<Naming>,

    /// Path to a tsreveal.json config file.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Do not load the bundled lib.d.ts.
    #[arg(long = "no-lib", alias = "noLib")]
    pub no_lib: bool,

    /// Color diagnostics and indent JSON.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Naming {
    /// `a.ts` is revealed as `ts-reveal-types:a.d.ts`.
    SwapExtension,
    /// Every file is revealed into the same document.
    Fixed,
}
