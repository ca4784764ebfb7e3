//! Tests for structural assignability.

use super::*;
use crate::host::{DefaultHost, VirtualHost};
use crate::program::{Program, ProgramOptions};

fn empty_program() -> Program {
    let host = VirtualHost::new(DefaultHost, "test.ts", "");
    Program::new(&["test.ts"], &host, ProgramOptions::default()).expect("empty program loads")
}

fn prop(name: &str, ty: TypeId, optional: bool) -> PropertyInfo {
    PropertyInfo {
        name: name.to_string(),
        key_kind: PropertyKeyKind::Named,
        ty,
        optional,
        readonly: false,
        is_method: false,
    }
}

fn object(checker: &mut TypeChecker<'_>, props: Vec<PropertyInfo>) -> TypeId {
    checker.interner.object(ObjectShape {
        properties: props,
        ..ObjectShape::default()
    })
}

#[test]
fn test_literals_and_primitives() {
    let program = empty_program();
    let mut checker = program.type_checker();
    let hello = checker.interner.literal_string("hello");
    let one = checker.interner.literal_number(1.0);

    assert!(checker.is_assignable(hello, TypeId::STRING));
    assert!(!checker.is_assignable(TypeId::STRING, hello));
    assert!(!checker.is_assignable(one, TypeId::STRING));
    assert!(checker.is_assignable(TypeId::TRUE, TypeId::BOOLEAN));
    assert!(checker.is_assignable(TypeId::BOOLEAN, TypeId::BOOLEAN));
}

#[test]
fn test_top_and_bottom_types() {
    let program = empty_program();
    let mut checker = program.type_checker();

    assert!(checker.is_assignable(TypeId::NEVER, TypeId::STRING));
    assert!(checker.is_assignable(TypeId::STRING, TypeId::UNKNOWN));
    assert!(checker.is_assignable(TypeId::ANY, TypeId::NUMBER));
    assert!(!checker.is_assignable(TypeId::ANY, TypeId::NEVER));
    assert!(!checker.is_assignable(TypeId::UNKNOWN, TypeId::STRING));
}

#[test]
fn test_strict_null_checks() {
    let program = empty_program();
    let mut checker = program.type_checker();
    let empty = TypeId::EMPTY_OBJECT;

    assert!(!checker.is_assignable(TypeId::NULL, TypeId::STRING));
    assert!(!checker.is_assignable(TypeId::UNDEFINED, empty));
    assert!(checker.is_assignable(TypeId::UNDEFINED, TypeId::VOID));
    assert!(checker.is_assignable(TypeId::NUMBER, empty));
}

#[test]
fn test_unions() {
    let program = empty_program();
    let mut checker = program.type_checker();
    let a = checker.interner.literal_string("a");
    let b = checker.interner.literal_string("b");
    let ab = checker.interner.union(vec![a, b]);
    let a_or_null = checker.interner.union(vec![a, TypeId::NULL]);

    assert!(checker.is_assignable(a, ab));
    assert!(checker.is_assignable(ab, TypeId::STRING));
    assert!(!checker.is_assignable(a_or_null, TypeId::STRING));
    assert!(!checker.is_assignable(TypeId::STRING, ab));
}

#[test]
fn test_object_properties() {
    let program = empty_program();
    let mut checker = program.type_checker();
    let wide = object(
        &mut checker,
        vec![prop("a", TypeId::STRING, false), prop("b", TypeId::NUMBER, false)],
    );
    let narrow = object(&mut checker, vec![prop("a", TypeId::STRING, false)]);
    let optional_b = object(
        &mut checker,
        vec![prop("a", TypeId::STRING, false), prop("b", TypeId::NUMBER, true)],
    );

    assert!(checker.is_assignable(wide, narrow));
    assert!(!checker.is_assignable(narrow, wide));
    assert!(checker.is_assignable(narrow, optional_b));
    assert!(!checker.is_assignable(optional_b, wide));
    assert!(checker.is_assignable(wide, TypeId::OBJECT));
    assert!(!checker.is_assignable(TypeId::STRING, TypeId::OBJECT));
}

#[test]
fn test_arrays_and_tuples() {
    let program = empty_program();
    let mut checker = program.type_checker();
    let strings = checker.interner.array(TypeId::STRING, false);
    let readonly_strings = checker.interner.array(TypeId::STRING, true);
    let pair = checker.interner.tuple(
        vec![
            TupleElementInfo {
                name: None,
                ty: TypeId::STRING,
                optional: false,
                rest: false,
            },
            TupleElementInfo {
                name: None,
                ty: TypeId::STRING,
                optional: false,
                rest: false,
            },
        ],
        false,
    );
    let length_only = object(&mut checker, vec![prop("length", TypeId::NUMBER, false)]);

    assert!(checker.is_assignable(strings, readonly_strings));
    assert!(!checker.is_assignable(readonly_strings, strings));
    assert!(checker.is_assignable(pair, strings));
    assert!(!checker.is_assignable(strings, pair));
    assert!(checker.is_assignable(strings, length_only));
}

#[test]
fn test_function_signatures() {
    let program = empty_program();
    let mut checker = program.type_checker();
    let param = |name: &str, ty: TypeId| ParamInfo {
        name: name.to_string(),
        ty,
        optional: false,
        rest: false,
    };
    let takes_string = checker.interner.function(
        SignatureInfo {
            type_params: Vec::new(),
            params: vec![param("s", TypeId::STRING)],
            return_type: TypeId::NUMBER,
        },
        false,
    );
    let takes_two = checker.interner.function(
        SignatureInfo {
            type_params: Vec::new(),
            params: vec![param("s", TypeId::STRING), param("n", TypeId::NUMBER)],
            return_type: TypeId::VOID,
        },
        false,
    );
    let returns_void = checker.interner.function(
        SignatureInfo {
            type_params: Vec::new(),
            params: vec![param("s", TypeId::STRING), param("n", TypeId::NUMBER)],
            return_type: TypeId::VOID,
        },
        false,
    );

    // Fewer parameters are fine; a void return accepts any result.
    assert!(checker.is_assignable(takes_string, returns_void));
    assert!(!checker.is_assignable(takes_two, takes_string));
    assert!(!checker.is_assignable(takes_string, TypeId::STRING));
}

#[test]
fn test_recursive_structures_terminate() {
    let source = "type A = { next: A | null; v: string };\ntype B = { next: B | null; v: string };";
    let host = VirtualHost::new(DefaultHost, "test.ts", source);
    let program = Program::new(&["test.ts"], &host, ProgramOptions::default()).expect("program");
    let mut checker = program.type_checker();
    let file = host.source_file();
    let aliases = file.type_aliases();
    let a = checker.type_of_alias_rhs(aliases[0]);
    let b = checker.type_of_alias_rhs(aliases[1]);

    assert!(checker.is_type_assignable_to(a, b));
}
