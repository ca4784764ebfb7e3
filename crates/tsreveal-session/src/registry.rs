//! Open reveal sessions.
//!
//! A session pairs one source document with one derived document and holds
//! the most recently rendered content. The pairing is a bijection: opening a
//! session for a key that already belongs to another session closes that
//! session first.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::bimap::BiMap;
use crate::uri::DocumentUri;

/// A closed or evicted session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub source: DocumentUri,
    pub derived: DocumentUri,
    pub content: String,
    /// Edit generation the content was rendered from.
    pub generation: u64,
}

#[derive(Clone, Debug, Default)]
struct Rendered {
    content: String,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    /// source <-> derived
    pairs: BiMap<DocumentUri, DocumentUri>,
    /// Keyed by source.
    rendered: FxHashMap<DocumentUri, Rendered>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or replace) the session for `source`. Sessions that shared
    /// either key are closed and returned.
    pub fn open(&mut self, source: DocumentUri, derived: DocumentUri, content: String) -> Vec<Session> {
        trace!(%source, %derived, "registry open");
        let evicted = self.pairs.insert(source.clone(), derived);
        let closed = evicted
            .into_iter()
            .map(|(source, derived)| {
                let rendered = self.rendered.remove(&source).unwrap_or_default();
                Session {
                    source,
                    derived,
                    content: rendered.content,
                    generation: rendered.generation,
                }
            })
            .collect();
        self.rendered.insert(
            source,
            Rendered {
                content,
                generation: 0,
            },
        );
        closed
    }

    /// Derived key and content of the session for `source`.
    pub fn lookup_by_source(&self, source: &DocumentUri) -> Option<(&DocumentUri, &str)> {
        let derived = self.pairs.get_by_left(source)?;
        let rendered = self.rendered.get(source)?;
        Some((derived, rendered.content.as_str()))
    }

    /// Source key and content of the session showing `derived`.
    pub fn lookup_by_derived(&self, derived: &DocumentUri) -> Option<(&DocumentUri, &str)> {
        let source = self.pairs.get_by_right(derived)?;
        let rendered = self.rendered.get(source)?;
        Some((source, rendered.content.as_str()))
    }

    pub fn contains_source(&self, source: &DocumentUri) -> bool {
        self.pairs.contains_left(source)
    }

    pub fn contains_derived(&self, derived: &DocumentUri) -> bool {
        self.pairs.contains_right(derived)
    }

    /// Generation of the stored content for `source`.
    pub fn generation(&self, source: &DocumentUri) -> Option<u64> {
        self.rendered.get(source).map(|r| r.generation)
    }

    /// Close the session for `source`. Closing twice is a no-op.
    pub fn close_by_source(&mut self, source: &DocumentUri) -> Option<Session> {
        let (source, derived) = self.pairs.remove_by_left(source)?;
        Some(self.finish_close(source, derived))
    }

    /// Close the session showing `derived`. Closing twice is a no-op.
    pub fn close_by_derived(&mut self, derived: &DocumentUri) -> Option<Session> {
        let (source, derived) = self.pairs.remove_by_right(derived)?;
        Some(self.finish_close(source, derived))
    }

    fn finish_close(&mut self, source: DocumentUri, derived: DocumentUri) -> Session {
        trace!(%source, %derived, "registry close");
        let rendered = self.rendered.remove(&source).unwrap_or_default();
        Session {
            source,
            derived,
            content: rendered.content,
            generation: rendered.generation,
        }
    }

    /// Store `content` rendered from edit `generation`. Content from a
    /// generation older than what is stored is dropped. Returns whether the
    /// content was stored.
    pub fn update_content(&mut self, source: &DocumentUri, generation: u64, content: String) -> bool {
        let Some(rendered) = self.rendered.get_mut(source) else {
            return false;
        };
        if generation < rendered.generation {
            trace!(%source, generation, stored = rendered.generation, "stale content dropped");
            return false;
        }
        rendered.content = content;
        rendered.generation = generation;
        true
    }

    /// Source keys, sorted.
    pub fn sources(&self) -> Vec<DocumentUri> {
        let mut sources: Vec<_> = self.pairs.iter().map(|(source, _)| source.clone()).collect();
        sources.sort();
        sources
    }

    /// `(source, derived)` pairs, sorted by source.
    pub fn pairs(&self) -> Vec<(DocumentUri, DocumentUri)> {
        let mut pairs: Vec<_> = self
            .pairs
            .iter()
            .map(|(source, derived)| (source.clone(), derived.clone()))
            .collect();
        pairs.sort();
        pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod registry_tests;
