use super::*;

fn fmt(source: &str) -> String {
    format_text(source, &FormatOptions::default()).expect("source parses")
}

fn fmt_with(source: &str, options: FormatOptions) -> String {
    format_text(source, &options).expect("source parses")
}

#[test]
fn test_strings_prefer_double_quotes() {
    assert_eq!(fmt("type A = 'x'"), "type A = \"x\";\n");
    assert_eq!(fmt("type A = 'say \"hi\"'"), "type A = 'say \"hi\"';\n");
    assert_eq!(fmt(r#"type A = "tab\there""#), "type A = \"tab\\there\";\n");
}

#[test]
fn test_single_quote_option() {
    let options = FormatOptions {
        single_quote: true,
        ..FormatOptions::default()
    };
    assert_eq!(fmt_with("type A = \"x\" | \"it's\"", options), "type A = 'x' | \"it's\";\n");
}

#[test]
fn test_numbers_keep_their_spelling() {
    assert_eq!(fmt("type N = 0x10 | 1_000 | 10n"), "type N = 0x10 | 1_000 | 10n;\n");
}

#[test]
fn test_property_names_quoted_only_when_needed() {
    assert_eq!(
        fmt("type O = { 'plain': 1; 'needs-quotes': 2; 3: 3 }"),
        "type O = {\n  plain: 1;\n  \"needs-quotes\": 2;\n  3: 3;\n};\n"
    );
}

#[test]
fn test_empty_object_and_tuple() {
    assert_eq!(fmt("type E = {  }"), "type E = {};\n");
    assert_eq!(fmt("type T = [ ]"), "type T = [];\n");
}

#[test]
fn test_members_without_semicolons() {
    let options = FormatOptions {
        semi: false,
        ..FormatOptions::default()
    };
    assert_eq!(
        fmt_with("type A = { a: 1; b?: string, readonly c: () => void }", options),
        "type A = {\n  a: 1\n  b?: string\n  readonly c: () => void\n}\n"
    );
}

#[test]
fn test_signatures_and_index_members() {
    assert_eq!(
        fmt("type S = { (x: number): string; new (): S; m?<T>(a: T): T; [k: string]: unknown }"),
        "type S = {\n  (x: number): string;\n  new (): S;\n  m?<T>(a: T): T;\n  [k: string]: unknown;\n};\n"
    );
}

#[test]
fn test_function_and_constructor_types() {
    assert_eq!(
        fmt("type F = <T,>(a?: T, ...rest: T[]) => void"),
        "type F = <T>(a?: T, ...rest: T[]) => void;\n"
    );
    assert_eq!(fmt("type C = abstract new () => object"), "type C = abstract new () => object;\n");
}

#[test]
fn test_type_operators_and_queries() {
    assert_eq!(
        fmt("type K = keyof   T | readonly string[] | typeof x | T [ 'a' ]"),
        "type K = keyof T | readonly string[] | typeof x | T[\"a\"];\n"
    );
}

#[test]
fn test_module_blocks_are_indented() {
    assert_eq!(
        fmt("declare namespace A.B { type X = 1\n\n\n type Y = 2 }"),
        "declare namespace A.B {\n  type X = 1;\n\n  type Y = 2;\n}\n"
    );
    assert_eq!(fmt("declare module 'm' {}"), "declare module \"m\" {}\n");
}

#[test]
fn test_other_statements_are_kept_verbatim() {
    assert_eq!(fmt("const x  = 1;\ntype A = 1"), "const x  = 1;\ntype A = 1;\n");
}
