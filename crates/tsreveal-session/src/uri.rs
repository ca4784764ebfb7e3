//! Document keys.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Scheme of derived documents.
pub const REVEAL_SCHEME: &str = "ts-reveal-types";

/// Stable identity of a document: `scheme:path?query`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentUri {
    pub scheme: String,
    pub path: String,
    pub query: Option<String>,
}

impl DocumentUri {
    pub fn new(scheme: impl Into<String>, path: impl Into<String>) -> Self {
        DocumentUri {
            scheme: scheme.into(),
            path: path.into(),
            query: None,
        }
    }

    /// `file:` key of a path on disk.
    pub fn file(path: &Path) -> Self {
        DocumentUri::new("file", path.to_string_lossy().replace('\\', "/"))
    }

    /// Parse the textual form produced by `Display`. Returns `None` without
    /// a scheme.
    pub fn parse(text: &str) -> Option<Self> {
        let (scheme, rest) = text.split_once(':')?;
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) {
            return None;
        }
        let rest = rest.strip_prefix("//").unwrap_or(rest);
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (rest, None),
        };
        Some(DocumentUri {
            scheme: scheme.to_string(),
            path: path.to_string(),
            query,
        })
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.starts_with('/') {
            write!(f, "{}://{}", self.scheme, self.path)?;
        } else {
            write!(f, "{}:{}", self.scheme, self.path)?;
        }
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

/// How a derived document key is chosen for a source key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DerivedNaming {
    /// Every source shares one derived document, so at most one session can
    /// be open at a time.
    Fixed(DocumentUri),
    /// Same path under [`REVEAL_SCHEME`] with `.d` inserted before the file
    /// extension (`a.ts` becomes `a.d.ts`). The source scheme and query are
    /// kept in the query so the mapping can be reversed.
    #[default]
    SwapExtension,
}

impl DerivedNaming {
    pub fn derived_of(&self, source: &DocumentUri) -> DocumentUri {
        match self {
            DerivedNaming::Fixed(uri) => uri.clone(),
            DerivedNaming::SwapExtension => {
                let (dir, name) = split_file_name(&source.path);
                let name = match name.rsplit_once('.') {
                    Some((stem, ext)) if !stem.is_empty() => format!("{stem}.d.{ext}"),
                    _ => format!("{name}.d"),
                };
                let query = match &source.query {
                    Some(query) => format!("{}&{query}", source.scheme),
                    None => source.scheme.clone(),
                };
                DocumentUri {
                    scheme: REVEAL_SCHEME.to_string(),
                    path: format!("{dir}{name}"),
                    query: Some(query),
                }
            }
        }
    }

    /// Source key a derived key was produced from. `Fixed` keys cannot be
    /// reversed; use the registry for those.
    pub fn source_of(&self, derived: &DocumentUri) -> Option<DocumentUri> {
        match self {
            DerivedNaming::Fixed(_) => None,
            DerivedNaming::SwapExtension => {
                if derived.scheme != REVEAL_SCHEME {
                    return None;
                }
                let recorded = derived.query.as_deref()?;
                let (scheme, query) = match recorded.split_once('&') {
                    Some((scheme, query)) => (scheme, Some(query.to_string())),
                    None => (recorded, None),
                };
                let (dir, name) = split_file_name(&derived.path);
                let name = match name.rsplit_once('.') {
                    Some((stem, ext)) if stem.ends_with(".d") => {
                        format!("{}.{ext}", &stem[..stem.len() - 2])
                    }
                    _ => name.strip_suffix(".d")?.to_string(),
                };
                Some(DocumentUri {
                    scheme: scheme.to_string(),
                    path: format!("{dir}{name}"),
                    query,
                })
            }
        }
    }
}

/// `("dir/", "name")` split at the last `/`.
fn split_file_name(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(slash) => path.split_at(slash + 1),
        None => ("", path),
    }
}

#[cfg(test)]
#[path = "tests/uri_tests.rs"]
mod uri_tests;
