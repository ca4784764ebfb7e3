//! Recursive-descent parser over a pre-scanned token list.
//!
//! The parser is split the same way the grammar is: statement-level parsing
//! lives in `state_statements`, the type grammar in `state_types`.

use std::sync::Arc;

use tracing::trace;
use tsreveal_common::diagnostics::{diagnostic_codes, format_message};
use tsreveal_common::{CommentRange, Diagnostic, TextRange};

use crate::ast::{Identifier, SourceFile};
use crate::scanner::{self, SyntaxKind, Token};

mod state_statements;
mod state_types;

#[cfg(test)]
#[path = "../tests/parser_tests.rs"]
mod parser_tests;

pub struct ParserState {
    file_name: String,
    text: Arc<str>,
    tokens: Vec<Token>,
    pos: usize,
    comments: Vec<CommentRange>,
    diagnostics: Vec<Diagnostic>,
    depth: u32,
    /// Set while parsing the `extends` clause of a conditional type, where a
    /// nested conditional would be ambiguous.
    in_conditional_extends: bool,
}

impl ParserState {
    pub fn new(file_name: String, text: Arc<str>) -> Self {
        let scanned = scanner::scan(&file_name, &text);
        ParserState {
            file_name,
            text,
            tokens: scanned.tokens,
            pos: 0,
            comments: scanned.comments,
            diagnostics: scanned.diagnostics,
            depth: 0,
            in_conditional_extends: false,
        }
    }

    /// Parse the whole file. Never fails; see `SourceFile::diagnostics`.
    pub fn parse_source_file(mut self) -> SourceFile {
        let statements = self.parse_statements(false);
        trace!(
            file = %self.file_name,
            statements = statements.len(),
            diagnostics = self.diagnostics.len(),
            "parsed source file"
        );
        self.diagnostics.sort_by_key(|d| d.start);
        SourceFile {
            file_name: self.file_name,
            text: self.text,
            statements,
            comments: self.comments,
            diagnostics: self.diagnostics,
        }
    }

    // =========================================================================
    // Token access
    // =========================================================================

    fn token(&self) -> &Token {
        self.peek_token(0)
    }

    fn peek_token(&self, n: usize) -> &Token {
        // The token list always ends with EndOfFileToken.
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    fn kind(&self) -> SyntaxKind {
        self.token().kind
    }

    fn peek_kind(&self, n: usize) -> SyntaxKind {
        self.peek_token(n).kind
    }

    fn next_token(&mut self) {
        if self.kind() != SyntaxKind::EndOfFileToken {
            self.pos += 1;
        }
    }

    fn token_start(&self) -> u32 {
        self.token().range.start
    }

    /// End of the most recently consumed token.
    fn prev_end(&self) -> u32 {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].range.end
        }
    }

    fn range_from(&self, start: u32) -> TextRange {
        TextRange::new(start, self.prev_end().max(start))
    }

    fn token_text(&self) -> &str {
        self.token().range.slice(&self.text)
    }

    fn has_line_break_before(&self) -> bool {
        self.token().has_preceding_line_break
    }

    // =========================================================================
    // Expectation helpers
    // =========================================================================

    fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.kind() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn parse_expected(&mut self, kind: SyntaxKind, text: &str) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        self.error_at_current(
            &format_message("'{0}' expected.", &[text]),
            diagnostic_codes::TOKEN_EXPECTED,
        );
        false
    }

    fn error_at_current(&mut self, message: &str, code: u32) {
        let range = self.token().range;
        // Only one diagnostic per position; cascades are noise.
        if self.diagnostics.last().is_some_and(|d| d.start == range.start) {
            return;
        }
        self.diagnostics.push(Diagnostic::error(
            self.file_name.as_str(),
            range.start,
            range.len(),
            message,
            code,
        ));
    }

    fn parse_identifier(&mut self) -> Identifier {
        let token = *self.token();
        if token.kind.is_identifier() {
            self.next_token();
            return Identifier {
                text: token.range.slice(&self.text).to_string(),
                range: token.range,
            };
        }
        self.error_at_current("Identifier expected.", diagnostic_codes::IDENTIFIER_EXPECTED);
        Identifier {
            text: String::new(),
            range: TextRange::empty(token.range.start),
        }
    }

    fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.kind(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.has_line_break_before()
    }

    fn parse_semicolon(&mut self) {
        if self.parse_optional(SyntaxKind::SemicolonToken) || self.can_parse_semicolon() {
            return;
        }
        self.parse_expected(SyntaxKind::SemicolonToken, ";");
    }

    /// Consume a bracketed region starting at the current open token and
    /// return its source text. Used for computed names and binding patterns.
    fn skip_balanced(&mut self) -> String {
        let start = self.token_start();
        let mut depth = 0usize;
        loop {
            match self.kind() {
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken => depth = depth.saturating_sub(1),
                SyntaxKind::EndOfFileToken => break,
                _ => {}
            }
            self.next_token();
            if depth == 0 {
                break;
            }
        }
        self.range_from(start).slice(&self.text).to_string()
    }
}
