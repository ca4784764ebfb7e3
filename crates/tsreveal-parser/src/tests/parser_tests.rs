//! Tests for the type grammar and statement skipping.

use crate::ast::{
    KeywordType, LiteralType, MappedModifier, ModifierFlags, PropertyNameKind, StatementKind,
    TypeMemberKind, TypeNode, TypeNodeKind, TypeOperator,
};
use crate::parse_source_file;

fn alias_type(source: &str) -> TypeNode {
    let file = parse_source_file("test.ts", source);
    assert!(
        file.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        file.diagnostics
    );
    let aliases = file.type_aliases();
    assert_eq!(aliases.len(), 1, "expected exactly one alias");
    aliases[0].ty.clone()
}

#[test]
fn test_union_with_leading_bar() {
    let ty = alias_type("type A =\n  | 'a'\n  | 'b';");
    let TypeNodeKind::Union(types) = ty.kind else {
        panic!("expected union, got {:?}", ty.kind);
    };
    assert_eq!(types.len(), 2);
    assert_eq!(
        types[0].kind,
        TypeNodeKind::Literal(LiteralType::String("a".to_string()))
    );
}

#[test]
fn test_intersection_binds_tighter_than_union() {
    let ty = alias_type("type A = B & C | D;");
    let TypeNodeKind::Union(types) = ty.kind else {
        panic!("expected union");
    };
    assert!(matches!(types[0].kind, TypeNodeKind::Intersection(_)));
}

#[test]
fn test_function_type() {
    let ty = alias_type("type F = <T>(a: T, b?: string, ...rest: number[]) => void;");
    let TypeNodeKind::Function(function) = ty.kind else {
        panic!("expected function type");
    };
    assert!(!function.is_constructor);
    let signature = &function.signature;
    assert_eq!(signature.type_parameters.len(), 1);
    assert_eq!(signature.parameters.len(), 3);
    assert!(signature.parameters[1].optional);
    assert!(signature.parameters[2].rest);
    assert!(matches!(
        signature.return_type.as_ref().map(|t| &t.kind),
        Some(TypeNodeKind::Keyword(KeywordType::Void))
    ));
}

#[test]
fn test_parenthesized_type_is_not_function() {
    let ty = alias_type("type A = (string | number)[];");
    let TypeNodeKind::Array(element) = ty.kind else {
        panic!("expected array type");
    };
    assert!(matches!(element.kind, TypeNodeKind::Parenthesized(_)));
}

#[test]
fn test_constructor_type() {
    let ty = alias_type("type C = abstract new () => object;");
    let TypeNodeKind::Function(function) = ty.kind else {
        panic!("expected constructor type");
    };
    assert!(function.is_constructor);
}

#[test]
fn test_conditional_type_with_infer() {
    let ty = alias_type("type E<T> = T extends Array<infer U> ? U : never;");
    let TypeNodeKind::Conditional(conditional) = ty.kind else {
        panic!("expected conditional type");
    };
    let TypeNodeKind::Reference { type_arguments, .. } = &conditional.extends_type.kind else {
        panic!("expected reference in extends clause");
    };
    assert!(matches!(type_arguments[0].kind, TypeNodeKind::Infer(_)));
    assert!(matches!(
        conditional.false_type.kind,
        TypeNodeKind::Keyword(KeywordType::Never)
    ));
}

#[test]
fn test_nested_conditional_in_false_branch() {
    let ty = alias_type("type N<T> = T extends string ? 1 : T extends number ? 2 : 3;");
    let TypeNodeKind::Conditional(outer) = ty.kind else {
        panic!("expected conditional type");
    };
    assert!(matches!(outer.false_type.kind, TypeNodeKind::Conditional(_)));
}

#[test]
fn test_mapped_type_modifiers() {
    let ty = alias_type("type M<T> = { -readonly [K in keyof T as `get_${K}`]+?: T[K] };");
    let TypeNodeKind::Mapped(mapped) = ty.kind else {
        panic!("expected mapped type");
    };
    assert_eq!(mapped.readonly, Some(MappedModifier::Remove));
    assert_eq!(mapped.optional, Some(MappedModifier::Add));
    assert_eq!(mapped.type_parameter.text, "K");
    assert!(mapped.name_type.is_some());
    assert!(matches!(
        mapped.constraint.kind,
        TypeNodeKind::TypeOperator {
            operator: TypeOperator::Keyof,
            ..
        }
    ));
    assert!(matches!(
        mapped.ty.as_ref().map(|t| &t.kind),
        Some(TypeNodeKind::IndexedAccess { .. })
    ));
}

#[test]
fn test_object_literal_members() {
    let ty = alias_type(
        "type O = {\n  readonly a: string\n  'b-c'?: number;\n  1: boolean,\n  m(x: number): void\n  (): string\n  new (): O\n  [key: string]: unknown\n  get g(): string\n  [Symbol.iterator](): void\n};",
    );
    let TypeNodeKind::TypeLiteral(members) = ty.kind else {
        panic!("expected type literal");
    };
    assert_eq!(members.len(), 9);
    assert!(matches!(
        &members[0].kind,
        TypeMemberKind::Property { readonly: true, .. }
    ));
    let TypeMemberKind::Property { name, optional, .. } = &members[1].kind else {
        panic!("expected property");
    };
    assert_eq!(name.kind, PropertyNameKind::String);
    assert_eq!(name.text, "b-c");
    assert!(optional);
    assert!(matches!(&members[3].kind, TypeMemberKind::Method { .. }));
    assert!(matches!(&members[4].kind, TypeMemberKind::Call(_)));
    assert!(matches!(&members[5].kind, TypeMemberKind::Construct(_)));
    assert!(matches!(&members[6].kind, TypeMemberKind::Index { .. }));
    assert!(matches!(&members[7].kind, TypeMemberKind::Property { .. }));
    let TypeMemberKind::Method { name, .. } = &members[8].kind else {
        panic!("expected computed method");
    };
    assert_eq!(name.kind, PropertyNameKind::Computed);
    assert_eq!(name.text, "[Symbol.iterator]");
}

#[test]
fn test_readonly_as_property_name() {
    let ty = alias_type("type O = { readonly: boolean; readonly?: string };");
    let TypeNodeKind::TypeLiteral(members) = ty.kind else {
        panic!("expected type literal");
    };
    let TypeMemberKind::Property { name, readonly, .. } = &members[0].kind else {
        panic!("expected property");
    };
    assert_eq!(name.text, "readonly");
    assert!(!readonly);
}

#[test]
fn test_tuple_elements() {
    let ty = alias_type("type T = [a: string, b?: number, ...rest: boolean[]];");
    let TypeNodeKind::Tuple(elements) = ty.kind else {
        panic!("expected tuple");
    };
    assert_eq!(elements[0].name.as_deref(), Some("a"));
    assert!(elements[1].optional);
    assert!(elements[2].rest);
}

#[test]
fn test_unnamed_optional_tuple_element() {
    let ty = alias_type("type T = [string, number?];");
    let TypeNodeKind::Tuple(elements) = ty.kind else {
        panic!("expected tuple");
    };
    assert!(!elements[0].optional);
    assert!(elements[1].optional);
}

#[test]
fn test_negative_number_literal() {
    let ty = alias_type("type N = -1;");
    assert_eq!(ty.kind, TypeNodeKind::Literal(LiteralType::Number(-1.0)));
}

#[test]
fn test_indexed_access_does_not_cross_line_break() {
    let file = parse_source_file("test.ts", "type A = B\n[1, 2].forEach(f);");
    let aliases = file.type_aliases();
    assert!(matches!(aliases[0].ty.kind, TypeNodeKind::Reference { .. }));
}

#[test]
fn test_type_predicate() {
    let ty = alias_type("type G = (x: unknown) => x is string;");
    let TypeNodeKind::Function(function) = ty.kind else {
        panic!("expected function");
    };
    assert!(matches!(
        function.signature.return_type.as_ref().map(|t| &t.kind),
        Some(TypeNodeKind::Predicate { asserts: false, .. })
    ));
}

#[test]
fn test_missing_type_reports_type_expected() {
    let file = parse_source_file("test.ts", "type A = ;");
    assert_eq!(file.diagnostics.len(), 1);
    assert_eq!(file.diagnostics[0].code, 1110);
    assert_eq!(file.type_aliases()[0].ty.kind, TypeNodeKind::Missing);
}

#[test]
fn test_missing_equals_reports_token_expected() {
    let file = parse_source_file("test.ts", "type A string;");
    assert!(file.diagnostics.iter().any(|d| d.code == 1005));
}

#[test]
fn test_value_statements_are_skipped() {
    let source = r#"
import { x } from "./x";
const value = { type: 1, interface: 2 };
function f() {
    type Local = string;
    return value;
}
class C { m(): void {} }
export type Kept = number;
"#;
    let file = parse_source_file("test.ts", source);
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);
    let names: Vec<&str> = file
        .type_aliases()
        .iter()
        .map(|a| a.name.text.as_str())
        .collect();
    assert_eq!(names, vec!["Kept"]);
}

#[test]
fn test_namespace_aliases_stay_inside_their_block() {
    let file = parse_source_file(
        "test.ts",
        "namespace NS.Inner { export type A = string }\ntype B = NS.Inner.A;",
    );
    assert!(file.diagnostics.is_empty());
    let names: Vec<&str> = file.type_aliases().iter().map(|a| a.name.text.as_str()).collect();
    assert_eq!(names, vec!["B"]);
    let StatementKind::Module(module) = &file.statements[0].kind else {
        panic!("expected namespace");
    };
    assert_eq!(module.name.len(), 2);
}

#[test]
fn test_class_and_enum_keep_their_names() {
    let source = "export abstract class Box<T> extends Base<{ a: 1 }> implements I {\n    \
                  value!: T;\n    get(): T { return this.value; }\n}\n\
                  const enum Color { Red, Green = \"g\", 'Blue' = f(1, 2) }\n\
                  type After = Color;";
    let file = parse_source_file("test.ts", source);
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);
    assert_eq!(file.statements.len(), 3);

    let StatementKind::Class(class) = &file.statements[0].kind else {
        panic!("expected class");
    };
    assert_eq!(class.name.text, "Box");
    assert_eq!(class.type_parameters.len(), 1);
    assert!(class.modifiers.contains(ModifierFlags::EXPORT | ModifierFlags::ABSTRACT));

    let StatementKind::Enum(decl) = &file.statements[1].kind else {
        panic!("expected enum");
    };
    assert!(decl.modifiers.contains(ModifierFlags::CONST));
    let members: Vec<&str> = decl.members.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(members, vec!["Red", "Green", "Blue"]);
    assert_eq!(file.type_aliases().len(), 1);
}

#[test]
fn test_interface_heritage() {
    let file = parse_source_file(
        "test.ts",
        "interface A<T = string> extends B<T>, C { x: T }",
    );
    assert!(file.diagnostics.is_empty());
    let StatementKind::Interface(interface) = &file.statements[0].kind else {
        panic!("expected interface");
    };
    assert_eq!(interface.heritage.len(), 2);
    assert!(interface.type_parameters[0].default.is_some());
    assert_eq!(interface.members.len(), 1);
}

#[test]
fn test_type_as_identifier_is_not_alias() {
    let file = parse_source_file("test.ts", "let type = 1;\ntype\nx = 2;");
    assert!(file.type_aliases().is_empty());
}

#[test]
fn test_deep_nesting_is_bounded() {
    let source = format!("type A = {}string{};", "(".repeat(300), ")".repeat(300));
    let file = parse_source_file("test.ts", source);
    assert!(file.diagnostics.iter().any(|d| d.code == 1110));
}
