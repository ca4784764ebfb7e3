//! One-shot mode: resolve a file once and print the result.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info_span};

use tsreveal_checker::{ResolveOutput, resolve_type_aliases};
use tsreveal_session::RevealError;

use crate::config::Settings;
use crate::reporter::Reporter;

/// Result of a one-shot run.
#[derive(Debug)]
pub struct RunOutput {
    /// Rendered declarations, or JSON with `--json`.
    pub text: String,
    /// Rendered parse diagnostics, empty when the file parsed cleanly.
    pub diagnostics: String,
}

pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Name the file is compiled under.
pub fn compile_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Resolve `settings.file` and produce the text to print.
pub fn run(settings: &Settings, color: bool) -> Result<RunOutput> {
    let _span = info_span!("run", file = %settings.file.display()).entered();
    let source = read_source(&settings.file)?;
    let file_name = compile_name(&settings.file);
    let output = resolve_type_aliases(&file_name, &source, &settings.resolve_options())
        .map_err(RevealError::from)?;

    let text = if settings.json {
        render_json(&output, settings.pretty)?
    } else {
        tsreveal_fmt::render(&output.texts(), &settings.format_options()).map_err(RevealError::from)?
    };
    debug!(aliases = output.aliases.len(), "resolved");
    let diagnostics = Reporter::new(color, &source).render(&output.diagnostics);
    Ok(RunOutput { text, diagnostics })
}

pub fn render_json(output: &ResolveOutput, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(&output.aliases)
    } else {
        serde_json::to_string(&output.aliases)
    };
    let mut json = json.context("failed to serialize resolved aliases")?;
    json.push('\n');
    Ok(json)
}

/// Write `text` to `out`, or to stdout when no path is given.
pub fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("failed to write to stdout")?;
            stdout.flush().context("failed to flush stdout")
        }
    }
}
