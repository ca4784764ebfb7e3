//! Tolerant parser for the declaration subset of TypeScript.
//!
//! This crate provides the front end of the resolution pipeline:
//! - `scanner` - token definitions and the up-front tokenizer
//! - `ast` - declaration and type-node syntax tree
//! - `ParserState` - recursive-descent parser that never fails, reporting
//!   problems as diagnostics instead

use std::sync::Arc;

pub mod ast;
pub mod parser;
pub mod scanner;

pub use ast::SourceFile;
pub use parser::ParserState;
pub use scanner::SyntaxKind;

/// Parse `text` into a syntax tree tagged with `file_name`.
pub fn parse_source_file(file_name: impl Into<String>, text: impl Into<Arc<str>>) -> SourceFile {
    ParserState::new(file_name.into(), text.into()).parse_source_file()
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod scanner_tests;
