//! End-to-end alias resolution over in-memory files.

use std::sync::Arc;

use tsreveal_checker::{
    CompilerHost, HostError, ResolveOptions, TypeFormatFlags, resolve_type_aliases,
    resolve_with_host,
};
use tsreveal_parser::SourceFile;

fn resolve(text: &str) -> Vec<String> {
    let output = resolve_type_aliases("input.ts", text, &ResolveOptions::default())
        .expect("in-memory file always resolves");
    output.texts().into_iter().map(str::to_string).collect()
}

#[test]
fn test_point_and_named() {
    let texts = resolve("type Point = { x: number; y: number }\ntype Named = Point & { name: string }");
    assert_eq!(
        texts,
        vec![
            "type Point = { x: number; y: number; }",
            "type Named = { x: number; y: number; name: string; }",
        ]
    );
}

#[test]
fn test_zero_aliases() {
    let output = resolve_type_aliases(
        "input.ts",
        "const x = 1;\ninterface I { a: string }",
        &ResolveOptions::default(),
    )
    .expect("resolves");
    assert!(output.aliases.is_empty());
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_file_name_need_not_exist_on_disk() {
    let output = resolve_type_aliases(
        "/definitely/not/on/disk/input.ts",
        "type A = string;",
        &ResolveOptions::default(),
    )
    .expect("target name is served from memory");
    assert_eq!(output.texts(), vec!["type A = string"]);
}

#[test]
fn test_prefix_is_kept_as_written() {
    let texts = resolve(
        "export type Box<T extends object = {}> = { value: T };\n\
         declare type Spaced   =   1;\n\
         type C = /* inline */ string;",
    );
    assert_eq!(
        texts,
        vec![
            "export type Box<T extends object = {}> = { value: T; }",
            "declare type Spaced   =   1",
            "type C = /* inline */ string",
        ]
    );
}

#[test]
fn test_namespace_members_resolve_but_are_not_emitted() {
    let texts = resolve(
        "type First = 1;\nnamespace NS {\n    export type Inner = { a: string };\n}\n\
         type Inner = 2;\ntype Last = NS.Inner;",
    );
    assert_eq!(
        texts,
        vec!["type First = 1", "type Inner = 2", "type Last = { a: string; }"]
    );
}

#[test]
fn test_recursive_generic_alias_expands_only_when_applied() {
    let texts = resolve(
        "type Deep<T, N extends any[] = []> = N['length'] extends 3 ? T : Deep<T[], [...N, 1]>\n\
         type Y = Deep<1>",
    );
    assert_eq!(
        texts,
        vec![
            "type Deep<T, N extends any[] = []> = N[\"length\"] extends 3 ? T : Deep<T[], [...N, 1]>",
            "type Y = 1[][][]",
        ]
    );
}

#[test]
fn test_mutually_circular_aliases_resolve_to_any() {
    let texts = resolve("type A = B\ntype B = A");
    assert_eq!(texts, vec!["type A = any", "type B = any"]);
}

#[test]
fn test_class_and_enum_references_keep_their_names() {
    let output = resolve_type_aliases(
        "input.ts",
        "class Foo { x = 1 }\ntype X = Foo\nenum Color { Red, Green }\ntype Ce = Color",
        &ResolveOptions::default(),
    )
    .expect("resolves");
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.texts(), vec!["type X = Foo", "type Ce = Color"]);
}

/// `L0` through `L{depth}`, each wrapping the previous one, then `Normal`.
fn nested_chain(depth: usize) -> String {
    let mut source = String::from("type L0 = { a: 1 }\n");
    for i in 1..=depth {
        source.push_str(&format!("type L{i} = {{ a: L{} }}\n", i - 1));
    }
    source.push_str("type Normal = { b: string }\n");
    source
}

#[test]
fn test_deeply_expanded_alias_still_parses_back() {
    let texts = resolve(&nested_chain(120));
    assert_eq!(texts.len(), 122);
    assert_eq!(texts[121], "type Normal = { b: string; }");
    assert!(texts[120].contains("{ a: any; }"));

    let reparsed = tsreveal_parser::parse_source_file("out.ts", texts.join("\n\n"));
    assert!(reparsed.diagnostics.is_empty(), "{:?}", reparsed.diagnostics);
}

#[test]
fn test_syntax_errors_do_not_abort() {
    let output = resolve_type_aliases(
        "input.ts",
        "type A = ;\ntype B = { b: string };",
        &ResolveOptions::default(),
    )
    .expect("resolves");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, 1110);
    assert_eq!(output.aliases.len(), 2);
    assert!(output.aliases[0].text.ends_with("any"));
    assert_eq!(output.aliases[1].text, "type B = { b: string; }");
}

#[test]
fn test_without_lib_utility_types_are_unknown() {
    let options = ResolveOptions {
        include_lib: false,
        ..ResolveOptions::default()
    };
    let output = resolve_type_aliases("input.ts", "type P = Partial<{ a: 1 }>;", &options)
        .expect("resolves");
    assert_eq!(output.texts(), vec!["type P = any"]);
}

#[test]
fn test_shallow_flags_keep_alias_names() {
    let options = ResolveOptions {
        flags: TypeFormatFlags::IN_TYPE_ALIAS | TypeFormatFlags::NO_TRUNCATION,
        ..ResolveOptions::default()
    };
    let output = resolve_type_aliases(
        "input.ts",
        "type Id = { id: number };\ntype Row = { key: Id; rows: Id[] };",
        &options,
    )
    .expect("resolves");
    assert_eq!(output.texts()[1], "type Row = { key: Id; rows: Id[]; }");
}

#[test]
fn test_aliases_serialize_as_name_and_text() {
    let output = resolve_type_aliases("input.ts", "type A = 1;", &ResolveOptions::default())
        .expect("resolves");
    let json = serde_json::to_string(&output.aliases).expect("serializable");
    assert_eq!(json, r#"[{"name":"A","text":"type A = 1"}]"#);
}

/// Host whose only library file cannot be found.
struct BrokenLibHost;

impl CompilerHost for BrokenLibHost {
    fn get_source_file(&self, file_name: &str) -> Result<Arc<SourceFile>, HostError> {
        Err(HostError::NotFound {
            file_name: file_name.to_string(),
        })
    }

    fn default_lib_file_names(&self) -> Vec<String> {
        vec!["missing.d.ts".to_string()]
    }
}

#[test]
fn test_inner_host_errors_propagate() {
    let err = resolve_with_host(BrokenLibHost, "input.ts", "type A = 1;", &ResolveOptions::default())
        .expect_err("library load fails");
    assert_eq!(
        err,
        HostError::NotFound {
            file_name: "missing.d.ts".to_string()
        }
    );
}
