use super::reporter::Reporter;
use tsreveal_common::Diagnostic;

const SOURCE: &str = "type A = number\ntype B = ;";

fn type_expected() -> Diagnostic {
    Diagnostic::error("test.ts", 25, 1, "Type expected.", 1110)
}

#[test]
fn test_formats_position_code_and_snippet() {
    let reporter = Reporter::new(false, SOURCE);
    assert_eq!(
        reporter.format_diagnostic(&type_expected()),
        "test.ts:2:10 - error TSR1110: Type expected.\n    2   type B = ;\n                 ~"
    );
}

#[test]
fn test_render_separates_diagnostics_with_newline() {
    let reporter = Reporter::new(false, SOURCE);
    let first = Diagnostic::error("test.ts", 0, 4, "First.", 1128);
    let rendered = reporter.render(&[first, type_expected()]);
    assert!(rendered.starts_with("test.ts:1:1 - error TSR1128: First.\n    1   type A = number\n        ~~~~\n"));
    assert!(rendered.ends_with("error TSR1110: Type expected.\n    2   type B = ;\n                 ~"));
}

#[test]
fn test_no_diagnostics_renders_nothing() {
    assert_eq!(Reporter::new(false, SOURCE).render(&[]), "");
}

#[test]
fn test_missing_file_name() {
    let diagnostic = Diagnostic::error("", 0, 0, "Oops.", 1003);
    let rendered = Reporter::new(false, SOURCE).format_diagnostic(&diagnostic);
    assert!(rendered.starts_with("<unknown>:1:1 - error TSR1003: Oops."));
}

#[test]
fn test_color_wraps_category() {
    colored::control::set_override(true);
    let rendered = Reporter::new(true, SOURCE).format_diagnostic(&type_expected());
    colored::control::unset_override();
    assert!(rendered.contains("\u{1b}["));
    assert!(rendered.contains("Type expected."));
}
