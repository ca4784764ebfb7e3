//! Common types and utilities shared by the tsreveal crates.
//!
//! This crate provides foundational types used across the workspace:
//! - Source spans (`TextRange`)
//! - Position/line-map types for line/column source locations
//! - Diagnostics produced by the tolerant parser
//! - Comment ranges collected as trivia
//! - Centralized limits and defaults

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::TextRange;

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Diagnostics - parse problems reported without aborting
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Comment ranges collected by the scanner
pub mod comments;
pub use comments::CommentRange;

// Centralized limits and thresholds
pub mod limits;

#[cfg(test)]
#[path = "tests/position_tests.rs"]
mod position_tests;
