use super::*;

fn file(path: &str) -> DocumentUri {
    DocumentUri::new("file", path)
}

#[test]
fn test_display_and_parse() {
    let uri = file("/work/app/types.ts");
    assert_eq!(uri.to_string(), "file:///work/app/types.ts");
    assert_eq!(DocumentUri::parse("file:///work/app/types.ts"), Some(uri));

    let untitled = DocumentUri::parse("untitled:Untitled-1?x=1").unwrap();
    assert_eq!(untitled.scheme, "untitled");
    assert_eq!(untitled.path, "Untitled-1");
    assert_eq!(untitled.query.as_deref(), Some("x=1"));
    assert_eq!(untitled.to_string(), "untitled:Untitled-1?x=1");

    assert_eq!(DocumentUri::parse("no scheme here"), None);
    assert_eq!(DocumentUri::parse(":empty"), None);
}

#[test]
fn test_file_name() {
    assert_eq!(file("/a/b/c.ts").file_name(), "c.ts");
    assert_eq!(file("c.ts").file_name(), "c.ts");
}

#[test]
fn test_swap_extension_inserts_declaration_suffix() {
    let naming = DerivedNaming::SwapExtension;
    let derived = naming.derived_of(&file("/src/model.ts"));
    assert_eq!(derived.scheme, REVEAL_SCHEME);
    assert_eq!(derived.path, "/src/model.d.ts");
    assert_eq!(derived.query.as_deref(), Some("file"));
    assert_eq!(derived.to_string(), "ts-reveal-types:///src/model.d.ts?file");
}

#[test]
fn test_swap_extension_is_reversible() {
    let naming = DerivedNaming::SwapExtension;
    let mut with_query = DocumentUri::new("git", "/repo/x.tsx");
    with_query.query = Some("ref=HEAD".to_string());
    let sources = [
        file("/src/model.ts"),
        file("/src/model.d.ts"),
        file("/src/Makefile"),
        file("/src/.env"),
        file("/src/x.d"),
        file("relative.ts"),
        with_query,
    ];
    for source in sources {
        let derived = naming.derived_of(&source);
        assert_ne!(derived, source);
        assert_eq!(naming.source_of(&derived), Some(source));
    }
}

#[test]
fn test_swap_extension_rejects_foreign_keys() {
    let naming = DerivedNaming::SwapExtension;
    assert_eq!(naming.source_of(&file("/src/model.d.ts")), None);
    let no_query = DocumentUri::new(REVEAL_SCHEME, "/src/model.d.ts");
    assert_eq!(naming.source_of(&no_query), None);
}

#[test]
fn test_fixed_naming() {
    let fixed = DocumentUri::new(REVEAL_SCHEME, "revealed.d.ts");
    let naming = DerivedNaming::Fixed(fixed.clone());
    assert_eq!(naming.derived_of(&file("/a.ts")), fixed);
    assert_eq!(naming.derived_of(&file("/b.ts")), fixed);
    assert_eq!(naming.source_of(&fixed), None);
}

#[test]
fn test_serializes_as_parts() {
    let derived = DerivedNaming::SwapExtension.derived_of(&file("/a/types.ts"));
    let json = serde_json::to_value(&derived).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "scheme": REVEAL_SCHEME, "path": "/a/types.d.ts", "query": "file" })
    );
    let back: DocumentUri = serde_json::from_value(json).unwrap();
    assert_eq!(back, derived);
}
