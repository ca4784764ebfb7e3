//! Coordinator behaviour against a recording editor host.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tsreveal_checker::{CompilerHost, DefaultHost, HostError};
use tsreveal_parser::SourceFile;
use tsreveal_session::{
    Coordinator, CoordinatorOptions, DerivedNaming, DocumentUri, EditorHost, Feed, REVEAL_SCHEME,
    RevealError, RevealOutcome, SourceDocument, Subscription,
};

const SHAPES: &str = "type Point = { x: number; y: number }\ntype Named = Point & { name: string }";

const SHAPES_RENDERED: &str =
    "type Point = {\n  x: number\n  y: number\n}\n\ntype Named = {\n  x: number\n  y: number\n  name: string\n}\n";

/// Editor double: documents and focus are set by the test, every call the
/// coordinator makes is appended to `log`.
#[derive(Default)]
struct RecordingHost {
    documents: BTreeMap<DocumentUri, SourceDocument>,
    active: Option<DocumentUri>,
    unsupported: Vec<Feed>,
    /// Resolve against a library file that cannot be loaded.
    lib_missing: bool,
    log: Rc<RefCell<Vec<String>>>,
}

/// Compiler host whose only library file is missing.
struct MissingLib;

impl CompilerHost for MissingLib {
    fn get_source_file(&self, file_name: &str) -> Result<Arc<SourceFile>, HostError> {
        Err(HostError::NotFound {
            file_name: file_name.to_string(),
        })
    }

    fn default_lib_file_names(&self) -> Vec<String> {
        vec!["missing.d.ts".to_string()]
    }
}

struct RecordingSubscription {
    feed: Feed,
    log: Rc<RefCell<Vec<String>>>,
}

impl Subscription for RecordingSubscription {
    fn dispose(self: Box<Self>) {
        self.log.borrow_mut().push(format!("dispose {}", self.feed));
    }
}

impl RecordingHost {
    fn open(&mut self, path: &str, text: &str) -> DocumentUri {
        let uri = DocumentUri::new("file", path);
        self.documents.insert(
            uri.clone(),
            SourceDocument {
                uri: uri.clone(),
                file_name: path.to_string(),
                text: text.to_string(),
            },
        );
        self.active = Some(uri.clone());
        uri
    }

    fn edit(&mut self, uri: &DocumentUri, text: &str) {
        if let Some(doc) = self.documents.get_mut(uri) {
            doc.text = text.to_string();
        }
    }

    fn events(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.log.borrow().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

impl EditorHost for RecordingHost {
    fn active_document(&self) -> Option<SourceDocument> {
        self.active.as_ref().and_then(|uri| self.documents.get(uri)).cloned()
    }

    fn document(&self, uri: &DocumentUri) -> Option<SourceDocument> {
        self.documents.get(uri).cloned()
    }

    fn show_warning(&mut self, message: &str) {
        self.log.borrow_mut().push(format!("warning {message}"));
    }

    fn show_error(&mut self, message: &str) {
        self.log.borrow_mut().push(format!("error {message}"));
    }

    fn show_beside(&mut self, derived: &DocumentUri) {
        self.log.borrow_mut().push(format!("show {derived}"));
    }

    fn content_changed(&mut self, derived: &DocumentUri) {
        self.log.borrow_mut().push(format!("changed {derived}"));
    }

    fn subscribe(&mut self, feed: Feed) -> Option<Box<dyn Subscription>> {
        if self.unsupported.contains(&feed) {
            return None;
        }
        self.log.borrow_mut().push(format!("subscribe {feed}"));
        Some(Box::new(RecordingSubscription {
            feed,
            log: Rc::clone(&self.log),
        }))
    }

    fn compiler_host(&self) -> &dyn CompilerHost {
        if self.lib_missing { &MissingLib } else { &DefaultHost }
    }
}

fn coordinator() -> Coordinator<RecordingHost> {
    Coordinator::new(RecordingHost::default(), CoordinatorOptions::default())
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Open `path` with `text` and reveal it.
fn reveal(coordinator: &mut Coordinator<RecordingHost>, path: &str, text: &str) -> (DocumentUri, DocumentUri) {
    let source = coordinator.host_mut().open(path, text);
    match coordinator.reveal().expect("reveal succeeds") {
        RevealOutcome::Opened(derived) => (source, derived),
        other => panic!("expected a new session, got {other:?}"),
    }
}

#[test]
fn test_reveal_opens_session_and_shows_derived_document() {
    let mut coordinator = coordinator();
    let (source, derived) = reveal(&mut coordinator, "/src/shapes.ts", SHAPES);

    assert_eq!(derived.to_string(), "ts-reveal-types:///src/shapes.d.ts?file");
    assert_eq!(coordinator.provide_content(&derived), Some(SHAPES_RENDERED));
    assert_eq!(coordinator.registry().lookup_by_derived(&derived).map(|(s, _)| s), Some(&source));
    assert_eq!(
        coordinator.host().events(),
        vec![
            "subscribe source-edit",
            "subscribe active-view",
            "subscribe tab-close",
            "show ts-reveal-types:///src/shapes.d.ts?file",
        ]
    );
    assert_eq!(coordinator.pass_count(), 1);
}

#[test]
fn test_reveal_twice_keeps_one_session() {
    let mut coordinator = coordinator();
    let (_, derived) = reveal(&mut coordinator, "/src/shapes.ts", SHAPES);

    assert_eq!(coordinator.reveal().unwrap(), RevealOutcome::AlreadyOpen(derived));
    assert_eq!(coordinator.registry().len(), 1);
    assert_eq!(coordinator.host().count("show "), 1);
    assert_eq!(coordinator.host().count("subscribe "), 3);
    assert_eq!(coordinator.pass_count(), 1);
}

#[test]
fn test_reveal_without_active_document_warns() {
    let mut coordinator = coordinator();

    assert_eq!(coordinator.reveal().unwrap(), RevealOutcome::NoActiveDocument);
    assert_eq!(coordinator.host().count("warning "), 1);
    assert!(coordinator.registry().is_empty());
    assert!(Feed::ALL.iter().all(|f| !coordinator.is_active(*f)));
}

#[test]
fn test_file_without_aliases_renders_empty_document() {
    let mut coordinator = coordinator();
    let (_, derived) = reveal(&mut coordinator, "/src/values.ts", "const x = 1;\ninterface I { a: 1 }");

    assert_eq!(coordinator.provide_content(&derived), Some(""));
}

#[test]
fn test_alias_of_alias_is_expanded() {
    let mut coordinator = coordinator();
    let (_, derived) = reveal(&mut coordinator, "/src/a.ts", "type B = { b: string }\ntype A = B");

    assert_eq!(
        coordinator.provide_content(&derived),
        Some("type B = {\n  b: string\n}\n\ntype A = {\n  b: string\n}\n")
    );
}

#[test]
fn test_syntax_errors_do_not_prevent_rendering() {
    let mut coordinator = coordinator();
    let (_, derived) = reveal(&mut coordinator, "/src/broken.ts", "type A = { a: 1 }\ntype B = ;");

    let content = coordinator.provide_content(&derived).unwrap();
    assert!(content.starts_with("type A = {\n  a: 1\n}\n"));
    assert_eq!(coordinator.host().count("error "), 0);
}

#[test]
fn test_rejected_reveal_opens_no_session() {
    let mut coordinator = coordinator();
    coordinator.host_mut().open("/src/b.ts", "type B<");

    let err = coordinator.reveal().expect_err("formatter rejects the resolved text");
    assert!(matches!(err, RevealError::Format(_)));
    assert!(err.to_string().starts_with("Cannot format resolved types: "));
    assert_eq!(coordinator.host().count("error Cannot format resolved types: "), 1);
    assert!(coordinator.registry().is_empty());
    assert_eq!(coordinator.host().count("subscribe "), 0);
    assert_eq!(coordinator.host().count("show "), 0);
    assert_eq!(coordinator.pass_count(), 1);
}

#[test]
fn test_rejected_refresh_keeps_previous_content() {
    let mut coordinator = coordinator();
    let (source, derived) = reveal(&mut coordinator, "/src/a.ts", "type A = 1");
    let start = Instant::now();

    coordinator.host_mut().edit(&source, "type A<");
    coordinator.on_text_changed(&source, start);
    assert_eq!(coordinator.poll(start + ms(1000)).unwrap(), 1);

    assert_eq!(coordinator.provide_content(&derived), Some("type A = 1\n"));
    assert_eq!(coordinator.host().count("error Cannot format resolved types: "), 1);
    assert_eq!(coordinator.host().count("changed "), 0);
    assert_eq!(coordinator.registry().len(), 1);

    // The session survives and picks up the next good edit.
    coordinator.host_mut().edit(&source, "type A = 2");
    coordinator.on_text_changed(&source, start + ms(1100));
    assert_eq!(coordinator.poll(start + ms(2100)).unwrap(), 1);
    assert_eq!(coordinator.provide_content(&derived), Some("type A = 2\n"));
}

#[test]
fn test_host_error_does_not_drop_other_due_passes() {
    let mut coordinator = coordinator();
    let (a, derived_a) = reveal(&mut coordinator, "/src/a.ts", "type A = 1");
    let (b, derived_b) = reveal(&mut coordinator, "/src/b.ts", "type B = 1");
    let start = Instant::now();

    coordinator.host_mut().lib_missing = true;
    coordinator.host_mut().edit(&a, "type A = 2");
    coordinator.host_mut().edit(&b, "type B = 2");
    coordinator.on_text_changed(&a, start);
    coordinator.on_text_changed(&b, start);

    let err = coordinator.poll(start + ms(1000)).expect_err("library cannot be loaded");
    assert!(matches!(err, RevealError::Host(HostError::NotFound { .. })));
    assert_eq!(coordinator.pass_count(), 4);
    assert_eq!(coordinator.host().count("error Cannot resolve types: "), 2);
    assert_eq!(coordinator.provide_content(&derived_a), Some("type A = 1\n"));
    assert_eq!(coordinator.provide_content(&derived_b), Some("type B = 1\n"));
    assert_eq!(coordinator.next_deadline(), None);
}

#[test]
fn test_deeply_nested_alias_does_not_fail_the_document() {
    let mut source = String::from("type L0 = { a: 1 }\n");
    for i in 1..=120 {
        source.push_str(&format!("type L{i} = {{ a: L{} }}\n", i - 1));
    }
    source.push_str("type Normal = { b: string }\n");

    let mut coordinator = coordinator();
    let (_, derived) = reveal(&mut coordinator, "/src/deep.ts", &source);
    let content = coordinator.provide_content(&derived).unwrap();
    assert!(content.ends_with("type Normal = {\n  b: string\n}\n"));
    assert_eq!(coordinator.host().count("error "), 0);
}

#[test]
fn test_edits_are_debounced_into_one_pass_with_final_text() {
    let mut coordinator = coordinator();
    let (source, derived) = reveal(&mut coordinator, "/src/a.ts", "type A = 1");
    let start = Instant::now();

    for i in 0..5u64 {
        let text = format!("type A = {i}");
        coordinator.host_mut().edit(&source, &text);
        coordinator.on_text_changed(&source, start + ms(i * 100));
        assert_eq!(coordinator.poll(start + ms(i * 100)).unwrap(), 0);
    }
    coordinator.host_mut().edit(&source, "type A = \"final\"");

    assert_eq!(coordinator.next_deadline(), Some(start + ms(1400)));
    assert_eq!(coordinator.poll(start + ms(1399)).unwrap(), 0);
    assert_eq!(coordinator.poll(start + ms(1400)).unwrap(), 1);
    assert_eq!(coordinator.poll(start + ms(5000)).unwrap(), 0);

    assert_eq!(coordinator.provide_content(&derived), Some("type A = \"final\"\n"));
    assert_eq!(coordinator.host().count("changed "), 1);
    assert_eq!(coordinator.pass_count(), 2);
}

#[test]
fn test_debounce_is_per_document() {
    let mut coordinator = coordinator();
    let (a, derived_a) = reveal(&mut coordinator, "/src/a.ts", "type A = 1");
    let (b, derived_b) = reveal(&mut coordinator, "/src/b.ts", "type B = 1");
    let start = Instant::now();

    coordinator.host_mut().edit(&a, "type A = 2");
    coordinator.on_text_changed(&a, start);
    coordinator.host_mut().edit(&b, "type B = 2");
    coordinator.on_text_changed(&b, start + ms(600));

    assert_eq!(coordinator.poll(start + ms(1000)).unwrap(), 1);
    assert_eq!(coordinator.provide_content(&derived_a), Some("type A = 2\n"));
    assert_eq!(coordinator.provide_content(&derived_b), Some("type B = 1\n"));
    assert_eq!(coordinator.poll(start + ms(1600)).unwrap(), 1);
    assert_eq!(coordinator.provide_content(&derived_b), Some("type B = 2\n"));
}

#[test]
fn test_active_view_pauses_and_resumes_source_edits() {
    let mut coordinator = coordinator();
    let (source, derived) = reveal(&mut coordinator, "/src/a.ts", "type A = 1");
    let other = coordinator.host_mut().open("/src/other.ts", "type O = 1");
    let start = Instant::now();

    coordinator.on_active_view_changed(Some(&other));
    assert!(!coordinator.is_active(Feed::SourceEdit));
    assert!(coordinator.is_active(Feed::ActiveView));

    coordinator.on_text_changed(&source, start);
    assert_eq!(coordinator.next_deadline(), None);

    // Focusing the derived document counts as focusing its session.
    coordinator.on_active_view_changed(Some(&derived));
    assert!(coordinator.is_active(Feed::SourceEdit));
    coordinator.on_active_view_changed(None);
    assert!(!coordinator.is_active(Feed::SourceEdit));
    coordinator.on_active_view_changed(Some(&source));
    assert!(coordinator.is_active(Feed::SourceEdit));

    assert_eq!(coordinator.host().count("subscribe source-edit"), 3);
    assert_eq!(coordinator.host().count("dispose source-edit"), 2);
}

#[test]
fn test_closing_last_session_deactivates_every_feed() {
    let mut coordinator = coordinator();
    let (source, derived) = reveal(&mut coordinator, "/src/a.ts", "type A = 1");
    let start = Instant::now();

    coordinator.on_open_views_changed(&[source.clone(), derived.clone()]);
    assert_eq!(coordinator.registry().len(), 1);

    coordinator.on_open_views_changed(&[source.clone()]);
    assert!(coordinator.registry().is_empty());
    assert_eq!(coordinator.provide_content(&derived), None);
    assert!(Feed::ALL.iter().all(|f| !coordinator.is_active(*f)));
    assert_eq!(coordinator.host().count("dispose "), 3);

    coordinator.on_text_changed(&source, start);
    assert_eq!(coordinator.poll(start + ms(2000)).unwrap(), 0);
    assert_eq!(coordinator.pass_count(), 1);
}

#[test]
fn test_closing_one_source_keeps_other_sessions() {
    let mut coordinator = coordinator();
    let (a, derived_a) = reveal(&mut coordinator, "/src/a.ts", "type A = 1");
    let (b, derived_b) = reveal(&mut coordinator, "/src/b.ts", "type B = 1");
    let start = Instant::now();

    coordinator.on_text_changed(&a, start);
    coordinator.on_open_views_changed(&[b.clone(), derived_a.clone(), derived_b.clone()]);

    assert_eq!(coordinator.registry().sources(), vec![b]);
    assert!(Feed::ALL.iter().all(|f| coordinator.is_active(*f)));
    // The pending edit of the closed session is dropped.
    assert_eq!(coordinator.next_deadline(), None);
}

#[test]
fn test_edits_to_documents_without_session_are_not_scheduled() {
    let mut coordinator = coordinator();
    reveal(&mut coordinator, "/src/a.ts", "type A = 1");
    let other = coordinator.host_mut().open("/src/other.ts", "type O = 1");

    coordinator.on_text_changed(&other, Instant::now());
    assert_eq!(coordinator.next_deadline(), None);
    assert_eq!(coordinator.registry().len(), 1);
}

#[test]
fn test_events_from_inactive_feeds_are_ignored() {
    let mut coordinator = coordinator();
    let uri = coordinator.host_mut().open("/src/a.ts", "type A = 1");

    coordinator.on_text_changed(&uri, Instant::now());
    coordinator.on_open_views_changed(&[]);
    coordinator.on_active_view_changed(Some(&uri));

    assert_eq!(coordinator.next_deadline(), None);
    assert!(coordinator.host().events().is_empty());
}

#[test]
fn test_unsupported_feed_still_activates() {
    let host = RecordingHost {
        unsupported: vec![Feed::TabClose],
        ..RecordingHost::default()
    };
    let mut coordinator = Coordinator::new(host, CoordinatorOptions::default());
    let (source, _) = reveal(&mut coordinator, "/src/a.ts", "type A = 1");

    assert!(coordinator.is_active(Feed::TabClose));
    coordinator.on_open_views_changed(&[source]);
    assert!(coordinator.registry().is_empty());
    assert_eq!(coordinator.host().count("dispose "), 2);
}

#[test]
fn test_fixed_naming_replaces_previous_session() {
    let fixed = DocumentUri::new(REVEAL_SCHEME, "revealed.d.ts");
    let options = CoordinatorOptions {
        naming: DerivedNaming::Fixed(fixed.clone()),
        ..CoordinatorOptions::default()
    };
    let mut coordinator = Coordinator::new(RecordingHost::default(), options);
    let (_, first) = reveal(&mut coordinator, "/src/a.ts", "type A = 1");
    let (b, second) = reveal(&mut coordinator, "/src/b.ts", "type B = 2");

    assert_eq!(first, fixed);
    assert_eq!(second, fixed);
    assert_eq!(coordinator.registry().sources(), vec![b]);
    assert_eq!(coordinator.provide_content(&fixed), Some("type B = 2\n"));
}

#[test]
fn test_content_for_unknown_derived_document_is_none() {
    let coordinator = coordinator();
    let derived = DerivedNaming::SwapExtension.derived_of(&DocumentUri::new("file", "/x.ts"));
    assert_eq!(coordinator.provide_content(&derived), None);
}
