//! Watch mode.
//!
//! The watched file plays the part of an editor document: file writes are
//! source edits and removing the file closes its tab. A [`TerminalHost`]
//! feeds these into a [`Coordinator`], and every refreshed derived document
//! is written out again.

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::cell::Cell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc::{RecvTimeoutError, channel};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use tsreveal_session::{
    Coordinator, DocumentUri, EditorHost, Feed, RevealOutcome, SourceDocument, Subscription,
};

use crate::config::Settings;
use crate::driver::{compile_name, write_output};

/// Longest wait for filesystem events while no edit is pending.
const IDLE_WAIT: Duration = Duration::from_millis(500);

/// Editor host backed by one file on disk.
pub struct TerminalHost {
    path: PathBuf,
    uri: DocumentUri,
    /// Set while the matching feed is subscribed.
    source_edit: Rc<Cell<bool>>,
    tab_close: Rc<Cell<bool>>,
    /// Derived documents whose content changed since the last drain.
    changed: Vec<DocumentUri>,
    messages: Vec<String>,
}

impl TerminalHost {
    pub fn new(path: &Path) -> Self {
        TerminalHost {
            path: path.to_path_buf(),
            uri: DocumentUri::file(path),
            source_edit: Rc::new(Cell::new(false)),
            tab_close: Rc::new(Cell::new(false)),
            changed: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn uri(&self) -> &DocumentUri {
        &self.uri
    }

    pub fn is_subscribed(&self, feed: Feed) -> bool {
        match feed {
            Feed::SourceEdit => self.source_edit.get(),
            Feed::TabClose => self.tab_close.get(),
            Feed::ActiveView => false,
        }
    }

    /// Derived documents to write out again.
    pub fn take_changed(&mut self) -> Vec<DocumentUri> {
        std::mem::take(&mut self.changed)
    }

    /// Warnings and errors shown since the last drain.
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    fn read(&self) -> Option<SourceDocument> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        Some(SourceDocument {
            uri: self.uri.clone(),
            file_name: compile_name(&self.path),
            text,
        })
    }
}

/// Clears its feed flag when disposed.
struct FlagSubscription(Rc<Cell<bool>>);

impl Subscription for FlagSubscription {
    fn dispose(self: Box<Self>) {
        self.0.set(false);
    }
}

impl EditorHost for TerminalHost {
    fn active_document(&self) -> Option<SourceDocument> {
        self.read()
    }

    fn document(&self, uri: &DocumentUri) -> Option<SourceDocument> {
        if *uri == self.uri { self.read() } else { None }
    }

    fn show_warning(&mut self, message: &str) {
        self.messages.push(format!("warning: {message}"));
    }

    fn show_error(&mut self, message: &str) {
        self.messages.push(format!("error: {message}"));
    }

    fn show_beside(&mut self, derived: &DocumentUri) {
        self.changed.push(derived.clone());
    }

    fn content_changed(&mut self, derived: &DocumentUri) {
        if !self.changed.contains(derived) {
            self.changed.push(derived.clone());
        }
    }

    fn subscribe(&mut self, feed: Feed) -> Option<Box<dyn Subscription>> {
        // A terminal has a single view, so there is no focus to follow.
        let flag = match feed {
            Feed::SourceEdit => &self.source_edit,
            Feed::TabClose => &self.tab_close,
            Feed::ActiveView => return None,
        };
        flag.set(true);
        Some(Box::new(FlagSubscription(Rc::clone(flag))))
    }
}

/// A watch session over one file, independent of where events come from.
pub struct WatchSession {
    coordinator: Coordinator<TerminalHost>,
    path: PathBuf,
}

impl WatchSession {
    /// Reveal `settings.file`. Its first rendering is ready in
    /// [`WatchSession::take_output`].
    pub fn start(settings: &Settings) -> Result<WatchSession> {
        let host = TerminalHost::new(&settings.file);
        let mut coordinator = Coordinator::new(host, settings.coordinator_options());
        match coordinator.reveal()? {
            RevealOutcome::Opened(derived) => debug!(%derived, "watching"),
            RevealOutcome::AlreadyOpen(_) => {}
            RevealOutcome::NoActiveDocument => {
                anyhow::bail!("failed to read {}", settings.file.display())
            }
        }
        Ok(WatchSession {
            coordinator,
            path: settings.file.clone(),
        })
    }

    pub fn coordinator(&self) -> &Coordinator<TerminalHost> {
        &self.coordinator
    }

    /// Feed one filesystem event into the coordinator.
    pub fn on_event(&mut self, event: &Event, now: Instant) {
        if !event.paths.iter().any(|p| same_file(p, &self.path)) {
            return;
        }
        let uri = self.coordinator.host().uri().clone();
        match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) if self.path.is_file() => {
                self.coordinator.on_text_changed(&uri, now);
            }
            EventKind::Remove(_) | EventKind::Modify(_) if !self.path.exists() => {
                info!(path = %self.path.display(), "watched file removed");
                self.coordinator.on_open_views_changed(&[]);
            }
            _ => {}
        }
    }

    /// Run due passes.
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        self.coordinator.poll(now)?;
        Ok(())
    }

    /// Content of every derived document refreshed since the last call.
    pub fn take_output(&mut self) -> Vec<String> {
        let changed = self.coordinator.host_mut().take_changed();
        changed
            .iter()
            .filter_map(|derived| self.coordinator.provide_content(derived))
            .map(str::to_string)
            .collect()
    }

    pub fn take_messages(&mut self) -> Vec<String> {
        self.coordinator.host_mut().take_messages()
    }

    /// How long the event loop may block.
    pub fn wait_time(&self, now: Instant) -> Duration {
        match self.coordinator.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(IDLE_WAIT),
            None => IDLE_WAIT,
        }
    }

    /// The session closed and every feed was released.
    pub fn is_finished(&self) -> bool {
        self.coordinator.registry().is_empty()
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        // A removed file no longer canonicalizes; compare names instead.
        _ => a.file_name() == b.file_name() && a.file_name().is_some(),
    }
}

/// Watch `settings.file` until it is removed.
pub fn run(settings: &Settings) -> Result<()> {
    let mut session = WatchSession::start(settings)?;
    flush(&mut session, settings)?;

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        },
        notify::Config::default(),
    )
    .context("failed to create file watcher")?;
    let dir = match settings.file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", dir.display()))?;
    info!(path = %settings.file.display(), "watching for changes");

    while !session.is_finished() {
        match rx.recv_timeout(session.wait_time(Instant::now())) {
            Ok(Ok(event)) => session.on_event(&event, Instant::now()),
            Ok(Err(err)) => warn!(%err, "file watcher error"),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        session.tick(Instant::now())?;
        flush(&mut session, settings)?;
    }
    Ok(())
}

fn flush(session: &mut WatchSession, settings: &Settings) -> Result<()> {
    let mut stderr = std::io::stderr().lock();
    for message in session.take_messages() {
        writeln!(stderr, "{message}").context("failed to write to stderr")?;
    }
    for content in session.take_output() {
        write_output(settings.out.as_deref(), &content)?;
    }
    Ok(())
}
