//! Lifecycle coordinator.
//!
//! Reacts to the reveal command and the three host feeds:
//!
//! - reveal on a document without a session resolves, renders and registers
//!   it, activates every feed and shows the derived document
//! - source edits are debounced per document and re-rendered from the text
//!   the host holds when the quiet period ends
//! - switching to a view without a session pauses the source-edit feed
//! - closing either side of a session closes the session, and closing the
//!   last one deactivates every feed
//!
//! The coordinator performs no IO of its own. Timers are deadlines checked
//! by [`Coordinator::poll`].

use std::fmt;
use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info_span, trace, warn};
use tsreveal_checker::{CompilerHost, DefaultHost, HostError, ResolveOptions, resolve_with_host};
use tsreveal_common::limits::DEFAULT_DEBOUNCE_MS;
use tsreveal_fmt::{FormatError, FormatOptions};

use crate::debounce::Debouncer;
use crate::host::{EditorHost, SourceDocument};
use crate::registry::SessionRegistry;
use crate::subscription::{Feed, SubscriptionManager};
use crate::uri::{DerivedNaming, DocumentUri};

#[derive(Debug)]
pub enum RevealError {
    /// The renderer rejected the resolved text.
    Format(FormatError),
    /// A file other than the revealed one could not be loaded.
    Host(HostError),
}

impl fmt::Display for RevealError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevealError::Format(err) => write!(f, "Cannot format resolved types: {err}"),
            RevealError::Host(err) => write!(f, "Cannot resolve types: {err}"),
        }
    }
}

impl std::error::Error for RevealError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RevealError::Format(err) => Some(err),
            RevealError::Host(err) => Some(err),
        }
    }
}

impl From<FormatError> for RevealError {
    fn from(err: FormatError) -> Self {
        RevealError::Format(err)
    }
}

impl From<HostError> for RevealError {
    fn from(err: HostError) -> Self {
        RevealError::Host(err)
    }
}

#[derive(Clone, Debug)]
pub struct CoordinatorOptions {
    /// Quiet period after the last edit before re-rendering.
    pub debounce: Duration,
    pub naming: DerivedNaming,
    pub resolve: ResolveOptions,
    pub format: FormatOptions,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        CoordinatorOptions {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            naming: DerivedNaming::default(),
            resolve: ResolveOptions::default(),
            format: FormatOptions {
                semi: false,
                ..FormatOptions::default()
            },
        }
    }
}

/// What a reveal command did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// A session was created and its derived document shown.
    Opened(DocumentUri),
    /// The document already had a session; nothing changed.
    AlreadyOpen(DocumentUri),
    /// No editable document is active.
    NoActiveDocument,
}

/// Resolve and render every alias of one document.
pub fn render_document(
    file_name: &str,
    text: &str,
    resolve: &ResolveOptions,
    format: &FormatOptions,
) -> Result<String, RevealError> {
    render_document_with(DefaultHost, file_name, text, resolve, format)
}

/// Like [`render_document`], loading library files through `compiler`.
pub fn render_document_with<C: CompilerHost>(
    compiler: C,
    file_name: &str,
    text: &str,
    resolve: &ResolveOptions,
    format: &FormatOptions,
) -> Result<String, RevealError> {
    let output = resolve_with_host(compiler, file_name, text, resolve)?;
    if !output.diagnostics.is_empty() {
        warn!(
            file = file_name,
            count = output.diagnostics.len(),
            "rendering best-effort output for a file with syntax errors"
        );
    }
    Ok(tsreveal_fmt::render(&output.texts(), format)?)
}

pub struct Coordinator<H: EditorHost> {
    host: H,
    options: CoordinatorOptions,
    registry: SessionRegistry,
    subscriptions: SubscriptionManager,
    debouncer: Debouncer<DocumentUri>,
    /// Edit generation per source, bumped on every scheduled edit.
    generations: FxHashMap<DocumentUri, u64>,
    passes: usize,
}

impl<H: EditorHost> Coordinator<H> {
    pub fn new(host: H, options: CoordinatorOptions) -> Self {
        let debouncer = Debouncer::new(options.debounce);
        Coordinator {
            host,
            options,
            registry: SessionRegistry::new(),
            subscriptions: SubscriptionManager::new(),
            debouncer,
            generations: FxHashMap::default(),
            passes: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn is_active(&self, feed: Feed) -> bool {
        self.subscriptions.is_active(feed)
    }

    /// Resolution passes run so far, the initial render of each reveal
    /// included.
    pub fn pass_count(&self) -> usize {
        self.passes
    }

    /// Earliest moment [`Coordinator::poll`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    /// Content of a derived document, for the host to display.
    pub fn provide_content(&self, derived: &DocumentUri) -> Option<&str> {
        self.registry.lookup_by_derived(derived).map(|(_, content)| content)
    }

    /// Reveal resolved types for the active document.
    ///
    /// A render failure is reported to the host and returned; no session is
    /// created in that case.
    pub fn reveal(&mut self) -> Result<RevealOutcome, RevealError> {
        let Some(document) = self.host.active_document() else {
            self.host.show_warning("No active document to reveal types for.");
            return Ok(RevealOutcome::NoActiveDocument);
        };
        let _span = info_span!("reveal", source = %document.uri).entered();
        if let Some((derived, _)) = self.registry.lookup_by_source(&document.uri) {
            debug!("session already open");
            return Ok(RevealOutcome::AlreadyOpen(derived.clone()));
        }

        let content = self.render(&document)?;
        let derived = self.options.naming.derived_of(&document.uri);
        for evicted in self.registry.open(document.uri.clone(), derived.clone(), content) {
            debug!(source = %evicted.source, "session replaced");
            self.debouncer.cancel(&evicted.source);
            self.generations.remove(&evicted.source);
        }
        self.subscriptions.activate_all(&mut self.host);
        self.host.show_beside(&derived);
        debug!(%derived, "session opened");
        Ok(RevealOutcome::Opened(derived))
    }

    /// A document's text changed. Ignored unless the source-edit feed is
    /// active and the document has a session.
    pub fn on_text_changed(&mut self, uri: &DocumentUri, now: Instant) {
        if !self.subscriptions.is_active(Feed::SourceEdit) {
            trace!(%uri, "edit ignored, source-edit feed inactive");
            return;
        }
        if !self.registry.contains_source(uri) {
            return;
        }
        *self.generations.entry(uri.clone()).or_insert(0) += 1;
        self.debouncer.schedule(uri.clone(), now);
    }

    /// The focused view changed to `active`, or to no document.
    pub fn on_active_view_changed(&mut self, active: Option<&DocumentUri>) {
        if !self.subscriptions.is_active(Feed::ActiveView) {
            return;
        }
        let tracked = active.is_some_and(|uri| {
            self.registry.contains_source(uri) || self.registry.contains_derived(uri)
        });
        if tracked {
            self.subscriptions.activate(Feed::SourceEdit, &mut self.host);
        } else {
            self.subscriptions.deactivate(Feed::SourceEdit);
        }
    }

    /// The set of open documents changed. Sessions missing either side are
    /// closed.
    pub fn on_open_views_changed(&mut self, open: &[DocumentUri]) {
        if !self.subscriptions.is_active(Feed::TabClose) {
            return;
        }
        let open: FxHashSet<&DocumentUri> = open.iter().collect();
        for (source, derived) in self.registry.pairs() {
            if open.contains(&source) && open.contains(&derived) {
                continue;
            }
            if let Some(session) = self.registry.close_by_source(&source) {
                self.debouncer.cancel(&session.source);
                self.generations.remove(&session.source);
                debug!(source = %session.source, derived = %session.derived, "session closed");
            }
        }
        if self.registry.is_empty() {
            self.debouncer.clear();
            self.subscriptions.deactivate_all();
        }
    }

    /// Run every debounced pass that is due at `now`. Returns how many ran.
    ///
    /// A failed pass is reported to the host and leaves that session's
    /// content unchanged; the remaining passes still run. The first host
    /// error is returned once every due pass has run.
    pub fn poll(&mut self, now: Instant) -> Result<usize, RevealError> {
        let mut ran = 0;
        let mut failure = None;
        for source in self.debouncer.take_due(now) {
            let Some((derived, _)) = self.registry.lookup_by_source(&source) else {
                trace!(%source, "no session for debounced edit");
                continue;
            };
            let derived = derived.clone();
            let Some(document) = self.host.document(&source) else {
                trace!(%source, "document no longer available");
                continue;
            };
            let generation = self.generations.get(&source).copied().unwrap_or(0);
            let _span = info_span!("refresh", %source, generation).entered();
            ran += 1;
            let content = match self.render(&document) {
                Ok(content) => content,
                Err(err) => {
                    warn!(%err, "keeping previous content");
                    if matches!(err, RevealError::Host(_)) {
                        failure.get_or_insert(err);
                    }
                    continue;
                }
            };
            if self.registry.update_content(&source, generation, content) {
                self.host.content_changed(&derived);
            }
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(ran),
        }
    }

    /// One resolution pass. Failures are shown to the user before they are
    /// returned.
    fn render(&mut self, document: &SourceDocument) -> Result<String, RevealError> {
        self.passes += 1;
        render_document_with(
            self.host.compiler_host(),
            &document.file_name,
            &document.text,
            &self.options.resolve,
            &self.options.format,
        )
        .inspect_err(|err| self.host.show_error(&err.to_string()))
    }
}
