use super::config::Settings;
use super::watch::WatchSession;
use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tsreveal_session::Feed;

use super::args::Naming;

fn settings(file: &Path) -> Settings {
    Settings {
        file: file.to_path_buf(),
        out: None,
        watch: true,
        json: false,
        pretty: false,
        debounce: Duration::from_millis(1000),
        print_width: 80,
        expand_nested_aliases: true,
        naming: Naming::SwapExtension,
        include_lib: false,
    }
}

fn write(path: &PathBuf, text: &str) {
    std::fs::write(path, text).expect("write source");
}

fn modified(path: &Path) -> Event {
    Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content))).add_path(path.to_path_buf())
}

#[test]
fn test_start_renders_initial_content() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = dir.path().join("types.ts");
    write(&file, "type A = { a: string }");

    let mut session = WatchSession::start(&settings(&file)).expect("session starts");
    assert_eq!(session.take_output(), vec!["type A = {\n  a: string\n}\n".to_string()]);
    assert!(session.take_output().is_empty());
    assert!(!session.is_finished());

    let host = session.coordinator().host();
    assert!(host.is_subscribed(Feed::SourceEdit));
    assert!(host.is_subscribed(Feed::TabClose));
}

#[test]
fn test_start_fails_for_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    assert!(WatchSession::start(&settings(&dir.path().join("missing.ts"))).is_err());
}

#[test]
fn test_edit_is_rendered_after_debounce() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = dir.path().join("types.ts");
    write(&file, "type A = string");
    let mut session = WatchSession::start(&settings(&file)).expect("session starts");
    session.take_output();

    let t0 = Instant::now();
    write(&file, "type A = number");
    session.on_event(&modified(&file), t0);
    write(&file, "type A = boolean");
    session.on_event(&modified(&file), t0 + Duration::from_millis(300));

    session.tick(t0 + Duration::from_millis(1200)).expect("tick");
    assert!(session.take_output().is_empty());
    assert!(session.wait_time(t0 + Duration::from_millis(1200)) <= Duration::from_millis(100));

    session.tick(t0 + Duration::from_millis(1300)).expect("tick");
    assert_eq!(session.take_output(), vec!["type A = boolean\n".to_string()]);
    assert_eq!(session.coordinator().pass_count(), 2);
}

#[test]
fn test_events_for_other_files_are_ignored() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = dir.path().join("types.ts");
    let other = dir.path().join("other.ts");
    write(&file, "type A = string");
    write(&other, "type B = string");
    let mut session = WatchSession::start(&settings(&file)).expect("session starts");
    session.take_output();

    let t0 = Instant::now();
    session.on_event(&modified(&other), t0);
    assert_eq!(session.coordinator().next_deadline(), None);
    assert_eq!(session.wait_time(t0), Duration::from_millis(500));
}

#[test]
fn test_recreated_file_counts_as_edit() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = dir.path().join("types.ts");
    write(&file, "type A = string");
    let mut session = WatchSession::start(&settings(&file)).expect("session starts");
    session.take_output();

    let t0 = Instant::now();
    write(&file, "type A = 1");
    session.on_event(&Event::new(EventKind::Create(CreateKind::File)).add_path(file.clone()), t0);
    session.tick(t0 + Duration::from_millis(1000)).expect("tick");
    assert_eq!(session.take_output(), vec!["type A = 1\n".to_string()]);
}

#[test]
fn test_removing_file_ends_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = dir.path().join("types.ts");
    write(&file, "type A = string");
    let mut session = WatchSession::start(&settings(&file)).expect("session starts");
    session.take_output();

    std::fs::remove_file(&file).expect("remove source");
    session.on_event(&Event::new(EventKind::Remove(RemoveKind::File)).add_path(file.clone()), Instant::now());

    assert!(session.is_finished());
    let host = session.coordinator().host();
    assert!(!host.is_subscribed(Feed::SourceEdit));
    assert!(!host.is_subscribed(Feed::TabClose));
}

#[test]
fn test_syntax_error_still_renders() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = dir.path().join("types.ts");
    write(&file, "type A = string");
    let mut session = WatchSession::start(&settings(&file)).expect("session starts");
    session.take_output();

    let t0 = Instant::now();
    write(&file, "type A = ;\ntype B = string");
    session.on_event(&modified(&file), t0);
    session.tick(t0 + Duration::from_millis(1000)).expect("tick");
    let output = session.take_output();
    assert_eq!(output.len(), 1);
    assert!(output[0].ends_with("type B = string\n"));
    assert!(session.take_messages().is_empty());
}
