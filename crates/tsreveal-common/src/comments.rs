//! Comments are kept out of the AST. The scanner records their spans as
//! trivia so the renderer can carry them into its output.

use serde::{Deserialize, Serialize};

/// Span of one `//` or `/* */` comment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRange {
    pub pos: u32,
    pub end: u32,
    /// `/* */` rather than `//`.
    pub is_multi_line: bool,
    /// A line break follows the comment before any other token.
    pub has_trailing_new_line: bool,
}

impl CommentRange {
    pub fn new(pos: u32, end: u32, is_multi_line: bool, has_trailing_new_line: bool) -> Self {
        CommentRange {
            pos,
            end,
            is_multi_line,
            has_trailing_new_line,
        }
    }

    /// Text of the comment, delimiters included. Empty when the span does
    /// not fit `source`.
    pub fn get_text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.pos as usize..self.end as usize).unwrap_or("")
    }
}

/// Comments starting inside `[start, end)`. `comments` must be sorted by
/// position, as the scanner produces them.
pub fn comments_in_range(comments: &[CommentRange], start: u32, end: u32) -> &[CommentRange] {
    let lo = comments.partition_point(|c| c.pos < start);
    let hi = comments.partition_point(|c| c.pos < end);
    &comments[lo..hi.max(lo)]
}
