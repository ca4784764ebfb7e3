//! The editor side of the coordinator.

use tsreveal_checker::{CompilerHost, DefaultHost};

use crate::subscription::{Feed, Subscription};
use crate::uri::DocumentUri;

/// Snapshot of an editable document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceDocument {
    pub uri: DocumentUri,
    /// Name the document is compiled under.
    pub file_name: String,
    /// Full current text.
    pub text: String,
}

/// What the coordinator needs from the editor hosting it.
///
/// The host owns documents and views. The coordinator only reads document
/// snapshots and asks the host to show or refresh derived documents.
pub trait EditorHost {
    /// Document of the focused view, if it is an editable document.
    fn active_document(&self) -> Option<SourceDocument>;

    /// Latest snapshot of an open document.
    fn document(&self, uri: &DocumentUri) -> Option<SourceDocument>;

    fn show_warning(&mut self, message: &str);

    fn show_error(&mut self, message: &str);

    /// Open `derived` in a view beside the active one, keeping focus on the
    /// source.
    fn show_beside(&mut self, derived: &DocumentUri);

    /// Content of `derived` changed; the host pulls it again through
    /// `Coordinator::provide_content`.
    fn content_changed(&mut self, derived: &DocumentUri);

    /// Start delivering `feed`. `None` when the host has no such feed.
    fn subscribe(&mut self, feed: Feed) -> Option<Box<dyn Subscription>>;

    /// Where resolution loads library files from.
    fn compiler_host(&self) -> &dyn CompilerHost {
        &DefaultHost
    }
}
