//! Layout documents.
//!
//! The emitter turns syntax into a tree of [`Doc`] nodes instead of strings.
//! The printer then decides, group by group, whether the content fits on
//! the current line or has to break.
//!
//! # Doc Structure
//!
//! - `Text` is printed as is.
//! - `Line` is a space when its group is flat and a newline when it breaks;
//!   `SoftLine` is the same but prints nothing when flat.
//! - `HardLine` always breaks, and forces every enclosing group to break.
//! - `Group` is the unit of the fit decision.

/// A layout document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Doc {
    Nil,
    Text(String),
    Concat(Vec<Doc>),
    /// Content whose lines break together.
    Group(Box<Doc>),
    /// Content indented by one level after each line break.
    Indent(Box<Doc>),
    /// Content indented by a fixed number of spaces after each line break.
    Align(usize, Box<Doc>),
    Line,
    SoftLine,
    HardLine,
    /// Chooses content by the mode of the enclosing group.
    IfBreak { broken: Box<Doc>, flat: Box<Doc> },
}

impl Doc {
    /// Whether printing this document always produces a line break.
    pub fn has_hard_line(&self) -> bool {
        match self {
            Doc::HardLine => true,
            Doc::Concat(docs) => docs.iter().any(Doc::has_hard_line),
            Doc::Group(doc) | Doc::Indent(doc) | Doc::Align(_, doc) => doc.has_hard_line(),
            Doc::IfBreak { broken, .. } => broken.has_hard_line(),
            Doc::Nil | Doc::Text(_) | Doc::Line | Doc::SoftLine => false,
        }
    }
}

impl From<&str> for Doc {
    fn from(text: &str) -> Self {
        text.to_string().into()
    }
}

impl From<String> for Doc {
    fn from(text: String) -> Self {
        if text.is_empty() {
            Doc::Nil
        } else {
            Doc::Text(text)
        }
    }
}

// =============================================================================
// Builders
// =============================================================================

pub fn text(text: impl Into<String>) -> Doc {
    Doc::from(text.into())
}

pub fn concat(docs: impl IntoIterator<Item = Doc>) -> Doc {
    let docs: Vec<Doc> = docs.into_iter().filter(|d| *d != Doc::Nil).collect();
    match docs.len() {
        0 => Doc::Nil,
        1 => docs.into_iter().next().unwrap_or(Doc::Nil),
        _ => Doc::Concat(docs),
    }
}

pub fn group(doc: Doc) -> Doc {
    Doc::Group(Box::new(doc))
}

pub fn indent(doc: Doc) -> Doc {
    Doc::Indent(Box::new(doc))
}

pub fn align(width: usize, doc: Doc) -> Doc {
    Doc::Align(width, Box::new(doc))
}

pub fn if_break(broken: Doc, flat: Doc) -> Doc {
    Doc::IfBreak {
        broken: Box::new(broken),
        flat: Box::new(flat),
    }
}

/// `docs` with `separator` between each pair.
pub fn join(separator: Doc, docs: impl IntoIterator<Item = Doc>) -> Doc {
    let mut parts = Vec::new();
    for (i, doc) in docs.into_iter().enumerate() {
        if i > 0 {
            parts.push(separator.clone());
        }
        parts.push(doc);
    }
    concat(parts)
}
