use super::*;
use crate::doc::{align, concat, group, if_break, indent, join, text};

fn print(doc: &Doc, width: usize) -> String {
    DocPrinter::new(width, 2).print(doc)
}

fn list(items: &[&str]) -> Doc {
    group(concat([
        text("["),
        indent(concat([
            Doc::SoftLine,
            join(concat([text(","), Doc::Line]), items.iter().map(|i| text(*i))),
            if_break(text(","), Doc::Nil),
        ])),
        Doc::SoftLine,
        text("]"),
    ]))
}

#[test]
fn test_group_stays_flat_when_it_fits() {
    assert_eq!(print(&list(&["a", "b", "c"]), 80), "[a, b, c]");
}

#[test]
fn test_group_breaks_when_too_wide() {
    assert_eq!(
        print(&list(&["alpha", "beta"]), 10),
        "[\n  alpha,\n  beta,\n]"
    );
}

#[test]
fn test_exact_width_fits() {
    // "[a, b]" is six columns.
    assert_eq!(print(&list(&["a", "b"]), 6), "[a, b]");
    assert_eq!(print(&list(&["a", "b"]), 5), "[\n  a,\n  b,\n]");
}

#[test]
fn test_hard_line_breaks_enclosing_group() {
    let doc = group(concat([text("{"), indent(concat([Doc::HardLine, text("x")])), Doc::Line, text("}")]));
    assert_eq!(print(&doc, 80), "{\n  x\n}");
}

#[test]
fn test_nested_group_can_stay_flat_inside_broken_parent() {
    let doc = group(concat([
        text("outer("),
        indent(concat([Doc::SoftLine, list(&["a", "b"]), text(","), Doc::Line, text("tail_argument")])),
        Doc::SoftLine,
        text(")"),
    ]));
    assert_eq!(print(&doc, 20), "outer(\n  [a, b],\n  tail_argument\n)");
}

#[test]
fn test_fit_includes_content_after_group() {
    let doc = concat([group(concat([text("aaa"), Doc::Line, text("bbb")])), text("xxxx")]);
    assert_eq!(print(&doc, 11), "aaa bbbxxxx");
    assert_eq!(print(&doc, 10), "aaa\nbbbxxxx");
}

#[test]
fn test_trailing_spaces_are_trimmed_before_newline() {
    let doc = concat([text("a "), Doc::HardLine, text("b")]);
    assert_eq!(print(&doc, 80), "a\nb");
}

#[test]
fn test_align_adds_fixed_indentation() {
    let doc = concat([text("| "), align(2, concat([text("x"), Doc::HardLine, text("y")]))]);
    assert_eq!(print(&doc, 80), "| x\n  y");
}

#[test]
fn test_multiline_text_resets_column() {
    let doc = concat([
        text("/* one\n   xy */"),
        group(concat([text(" a"), Doc::Line, text("b")])),
    ]);
    // The group starts at column 8, so "a b" needs width 12.
    assert_eq!(print(&doc, 12), "/* one\n   xy */ a b");
    assert_eq!(print(&doc, 11), "/* one\n   xy */ a\nb");
}

#[test]
fn test_nil_and_empty_text_print_nothing() {
    assert_eq!(concat([Doc::Nil, text("")]), Doc::Nil);
    assert_eq!(print(&Doc::Nil, 80), "");
}
