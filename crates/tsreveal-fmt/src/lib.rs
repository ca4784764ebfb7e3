//! Deterministic formatter for TypeScript type declarations.
//!
//! Text is parsed with `tsreveal-parser`, converted into a layout [`Doc`]
//! and printed at a fixed width:
//! - `doc` - layout document and builders
//! - `emit` - syntax tree to document conversion
//! - `printer` - width-aware document printer
//!
//! The output only depends on the input text and [`FormatOptions`].

use std::fmt;

use tracing::{debug, trace_span};
use tsreveal_common::LineMap;
use tsreveal_common::limits::{DEFAULT_PRINT_WIDTH, DEFAULT_TAB_WIDTH};
use tsreveal_parser::parse_source_file;

pub mod doc;
mod emit;
pub mod printer;

pub use doc::Doc;
pub use printer::DocPrinter;

/// File name the formatter parses its input under.
const FORMAT_FILE_NAME: &str = "format.ts";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    /// Line width the printer tries to stay within.
    pub print_width: usize,
    /// Spaces per indentation level.
    pub tab_width: usize,
    /// Terminate statements and members with `;`.
    pub semi: bool,
    /// Prefer `'` over `"` for string literals.
    pub single_quote: bool,
    /// Add a trailing comma to lists that break over several lines.
    pub trailing_comma: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            print_width: DEFAULT_PRINT_WIDTH,
            tab_width: DEFAULT_TAB_WIDTH,
            semi: true,
            single_quote: false,
            trailing_comma: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// The input does not parse. Positions are 1-based.
    Syntax {
        line: u32,
        column: u32,
        message: String,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Syntax {
                line,
                column,
                message,
            } => write!(f, "{message} ({line}:{column})"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Format `text`, refusing input with syntax errors.
pub fn format_text(text: &str, options: &FormatOptions) -> Result<String, FormatError> {
    let _span = trace_span!("format_text", len = text.len()).entered();
    let source = parse_source_file(FORMAT_FILE_NAME, text);
    if let Some(diagnostic) = source.diagnostics.first() {
        let position = LineMap::build(text).offset_to_position(diagnostic.start, text);
        return Err(FormatError::Syntax {
            line: position.line + 1,
            column: position.character + 1,
            message: diagnostic.message_text.clone(),
        });
    }

    let doc = emit::DocEmitter::new(&source, options).emit_file();
    let printed = DocPrinter::new(options.print_width, options.tab_width).print(&doc);
    let trimmed = printed.trim();
    debug!(statements = source.statements.len(), "formatted");
    if trimmed.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!("{trimmed}\n"))
    }
}

/// Join alias declarations with a blank line between each and format the
/// result.
pub fn render<S: AsRef<str>>(aliases: &[S], options: &FormatOptions) -> Result<String, FormatError> {
    let joined = aliases
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n\n");
    format_text(&joined, options)
}

#[cfg(test)]
#[path = "tests/emit_tests.rs"]
mod emit_tests;
