//! Tests for type printing: parentheses, quoting and literal escapes.

use super::*;
use crate::host::{DefaultHost, VirtualHost};
use crate::program::{Program, ProgramOptions};

fn print(source: &str, alias: &str) -> String {
    let host = VirtualHost::new(DefaultHost, "test.ts", source);
    let program = Program::new(&["test.ts"], &host, ProgramOptions::default())
        .expect("virtual file and default lib always load");
    let mut checker = program.type_checker();
    let file = host.source_file();
    let decl = file
        .type_aliases()
        .into_iter()
        .find(|d| d.name.text == alias)
        .unwrap_or_else(|| panic!("alias {alias} not declared"));
    let ty = checker.type_of_alias_rhs(decl);
    checker.type_to_string(ty, TypeFormatFlags::default())
}

#[test]
fn test_array_element_parentheses() {
    assert_eq!(print("type A = (string | number)[];", "A"), "(string | number)[]");
    assert_eq!(print("type F = (() => void)[];", "F"), "(() => void)[]");
    assert_eq!(print("type K<T> = (keyof T)[];", "K"), "(keyof T)[]");
    assert_eq!(print("type R = readonly string[][];", "R"), "readonly string[][]");
}

#[test]
fn test_union_of_functions_is_parenthesized() {
    assert_eq!(
        print("type U = ((a: string) => void) | null;", "U"),
        "((a: string) => void) | null"
    );
}

#[test]
fn test_intersection_inside_union_needs_no_parentheses() {
    assert_eq!(
        print("type I<T, U> = (T | U) & { a: 1 };", "I"),
        "T & { a: 1; } | U & { a: 1; }"
    );
}

#[test]
fn test_literals() {
    assert_eq!(print(r#"type S = "a\"b\n";"#, "S"), r#""a\"b\n""#);
    assert_eq!(print("type N = 1.50 | -2 | 1e21;", "N"), "1.5 | -2 | 1e+21");
    assert_eq!(print("type B = 10n;", "B"), "10n");
    assert_eq!(print("type T = true;", "T"), "true");
}

#[test]
fn test_property_names() {
    assert_eq!(
        print(r#"type O = { "my-key": 1; 'ok': 2; 3: 3; $x: 4 };"#, "O"),
        r#"{ "my-key": 1; ok: 2; 3: 3; $x: 4; }"#
    );
}

#[test]
fn test_empty_object_and_index_signature() {
    assert_eq!(print("type E = {};", "E"), "{}");
    assert_eq!(
        print("type D = { readonly [key: string]: number };", "D"),
        "{ readonly [key: string]: number; }"
    );
}

#[test]
fn test_tuples() {
    assert_eq!(
        print("type T = [first: string, second?: number, ...rest: boolean[]];", "T"),
        "[first: string, second?: number, ...rest: boolean[]]"
    );
    assert_eq!(
        print("type U = readonly [string, (number | null)?];", "U"),
        "readonly [string, (number | null)?]"
    );
}

#[test]
fn test_deferred_generic_forms() {
    let source = "type M<T> = { readonly [K in keyof T]?: T[K] };\n\
                  type C<T> = T extends string ? (x: T) => void : never;";
    assert_eq!(print(source, "M"), "{ readonly [K in keyof T]?: T[K]; }");
    assert_eq!(print(source, "C"), "T extends string ? (x: T) => void : never");
}

#[test]
fn test_write_string_literal_escapes_controls() {
    let mut out = String::new();
    write_string_literal(&mut out, "tab\there\u{1}\\");
    assert_eq!(out, r#""tab\there\u0001\\""#);
}

#[test]
fn test_is_identifier_name() {
    assert!(is_identifier_name("name"));
    assert!(is_identifier_name("_private"));
    assert!(is_identifier_name("$0"));
    assert!(!is_identifier_name(""));
    assert!(!is_identifier_name("0abc"));
    assert!(!is_identifier_name("with-dash"));
    assert!(!is_identifier_name("has space"));
}
