//! Rendering of resolved alias declarations.

use tsreveal_fmt::{FormatError, FormatOptions, format_text, render};

fn options() -> FormatOptions {
    FormatOptions {
        semi: false,
        ..FormatOptions::default()
    }
}

#[test]
fn test_render_expands_objects_with_blank_line_between_aliases() {
    let aliases = [
        "type Point = { x: number; y: number; }",
        "type Named = { x: number; y: number; name: string; }",
    ];
    assert_eq!(
        render(&aliases, &options()).unwrap(),
        "type Point = {\n  x: number\n  y: number\n}\n\ntype Named = {\n  x: number\n  y: number\n  name: string\n}\n"
    );
}

#[test]
fn test_render_of_nothing_is_empty() {
    let aliases: [&str; 0] = [];
    assert_eq!(render(&aliases, &options()).unwrap(), "");
    assert_eq!(format_text("  \n\n", &options()).unwrap(), "");
}

#[test]
fn test_short_union_stays_on_one_line() {
    assert_eq!(
        format_text("type U = string | number | null", &options()).unwrap(),
        "type U = string | number | null\n"
    );
}

#[test]
fn test_long_union_breaks_with_leading_bars() {
    let source = r#"type Long = "alpha" | "beta" | "gamma" | "delta" | "epsilon" | "zeta" | "eta" | "theta""#;
    assert_eq!(
        format_text(source, &options()).unwrap(),
        "type Long =\n  | \"alpha\"\n  | \"beta\"\n  | \"gamma\"\n  | \"delta\"\n  | \"epsilon\"\n  | \"zeta\"\n  | \"eta\"\n  | \"theta\"\n"
    );
}

#[test]
fn test_union_of_objects_aligns_members() {
    assert_eq!(
        format_text("type R = { ok: true; value: string; } | { ok: false; }", &options()).unwrap(),
        "type R =\n  | {\n      ok: true\n      value: string\n    }\n  | {\n      ok: false\n    }\n"
    );
}

#[test]
fn test_nested_property_union_breaks_under_its_key() {
    let source = "type O = { status: \"pending-approval\" | \"approved-by-reviewer\" | \"rejected-by-reviewer\" | \"withdrawn\"; }";
    assert_eq!(
        format_text(source, &options()).unwrap(),
        "type O = {\n  status:\n    | \"pending-approval\"\n    | \"approved-by-reviewer\"\n    | \"rejected-by-reviewer\"\n    | \"withdrawn\"\n}\n"
    );
}

#[test]
fn test_long_parameter_list_breaks_with_trailing_comma() {
    let source = "type F = (firstArgument: string, secondArgument: number, thirdArgument: boolean) => void";
    assert_eq!(
        format_text(source, &options()).unwrap(),
        "type F = (\n  firstArgument: string,\n  secondArgument: number,\n  thirdArgument: boolean,\n) => void\n"
    );
}

#[test]
fn test_generic_prefix_and_modifiers_survive() {
    assert_eq!(
        format_text("export   type Box<T extends object = {}> = { value: T; }", &options()).unwrap(),
        "export type Box<T extends object = {}> = {\n  value: T\n}\n"
    );
}

#[test]
fn test_mapped_and_conditional_types() {
    assert_eq!(
        format_text("type M<T> = { readonly [K in keyof T]?: T[K] }", &options()).unwrap(),
        "type M<T> = { readonly [K in keyof T]?: T[K] }\n"
    );
    assert_eq!(
        format_text("type C<T> = T extends string ? \"s\" : never", &options()).unwrap(),
        "type C<T> = T extends string ? \"s\" : never\n"
    );
}

#[test]
fn test_comments_are_preserved() {
    let source = "// leading\ntype A = /* inline */ string // trailing\n\n/** doc */\ntype B = number";
    assert_eq!(
        format_text(source, &options()).unwrap(),
        "// leading\ntype A = /* inline */ string // trailing\n\n/** doc */\ntype B = number\n"
    );
}

#[test]
fn test_comment_inside_object_moves_before_alias() {
    let source = "type A = {\n  // the id\n  id: number\n}";
    assert_eq!(
        format_text(source, &options()).unwrap(),
        "// the id\ntype A = {\n  id: number\n}\n"
    );
}

#[test]
fn test_syntax_error_reports_position() {
    let err = format_text("type A = { a: number;\ntype B = >", &options()).unwrap_err();
    let FormatError::Syntax { line, column, .. } = &err;
    assert_eq!(*line, 2);
    assert!(*column >= 1);
    assert!(err.to_string().contains("(2:"));
}

#[test]
fn test_formatting_is_idempotent() {
    let source = "type A = { a: string | null; b: [x: number, y?: string]; c: Array<{ d: 1 }> }";
    let once = format_text(source, &options()).unwrap();
    assert_eq!(format_text(&once, &options()).unwrap(), once);
}
