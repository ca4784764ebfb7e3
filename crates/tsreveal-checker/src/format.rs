//! Type printing.
//!
//! Produces single-line TypeScript type syntax in the style of the
//! TypeScript compiler's `typeToString`: object members end in `; `, unions
//! are joined with ` | `, and string literals use double quotes. The output
//! always parses back as a type: nesting past [`MAX_PRINT_DEPTH`] prints as
//! `any`.

use std::fmt::Write;

use bitflags::bitflags;
use tsreveal_common::limits::{DEFAULT_TRUNCATION_LENGTH, MAX_PRINT_DEPTH};
use tsreveal_parser::scanner::format_js_number;

use crate::checker::TypeChecker;
use crate::types::*;

bitflags! {
    /// Flags controlling [`TypeChecker::type_to_string`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeFormatFlags: u32 {
        /// The type is the right-hand side of an alias: never print the
        /// outermost type by that alias's name.
        const IN_TYPE_ALIAS = 1 << 0;
        /// Expand types that came from other aliases instead of printing
        /// the alias name.
        const EXPAND_NESTED_ALIASES = 1 << 1;
        /// Never shorten long output with `...`.
        const NO_TRUNCATION = 1 << 2;
    }
}

impl Default for TypeFormatFlags {
    fn default() -> Self {
        TypeFormatFlags::all()
    }
}

/// Where a type appears, for deciding on parentheses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    Top,
    ArrayElement,
    UnionMember,
    IntersectionMember,
    TypeOperand,
    IndexedObject,
    CheckType,
    OptionalElement,
}

pub(crate) struct TypePrinter<'a, 'p> {
    checker: &'a TypeChecker<'p>,
    flags: TypeFormatFlags,
    out: String,
    depth: u32,
}

impl<'a, 'p> TypePrinter<'a, 'p> {
    pub(crate) fn new(checker: &'a TypeChecker<'p>, flags: TypeFormatFlags) -> Self {
        TypePrinter {
            checker,
            flags,
            out: String::new(),
            depth: 0,
        }
    }

    pub(crate) fn print(mut self, ty: TypeId) -> String {
        self.write_type(ty, Position::Top, true);
        if !self.flags.contains(TypeFormatFlags::NO_TRUNCATION)
            && self.out.len() > DEFAULT_TRUNCATION_LENGTH
        {
            let mut cut = DEFAULT_TRUNCATION_LENGTH - 3;
            while !self.out.is_char_boundary(cut) {
                cut -= 1;
            }
            self.out.truncate(cut);
            self.out.push_str("...");
        }
        self.out
    }

    fn data(&self, ty: TypeId) -> &'a TypeData {
        self.checker.interner.lookup(ty)
    }

    fn write_type(&mut self, ty: TypeId, position: Position, top: bool) {
        if self.depth >= MAX_PRINT_DEPTH {
            self.out.push_str("any");
            return;
        }
        self.depth += 1;
        self.write_type_at_depth(ty, position, top);
        self.depth -= 1;
    }

    fn write_type_at_depth(&mut self, ty: TypeId, position: Position, top: bool) {
        if !self.flags.contains(TypeFormatFlags::EXPAND_NESTED_ALIASES)
            && !(top && self.flags.contains(TypeFormatFlags::IN_TYPE_ALIAS))
            && let Some(origin) = self.checker.alias_origin(ty)
        {
            let name = &self.checker.program().definitions().get(origin.def).name;
            self.out.push_str(name);
            let args = self.checker.interner.type_list(origin.args);
            self.write_type_arguments(&args);
            return;
        }

        let needs_parens = self.needs_parens(ty, position);
        if needs_parens {
            self.out.push('(');
        }
        self.write_type_inner(ty);
        if needs_parens {
            self.out.push(')');
        }
    }

    fn needs_parens(&self, ty: TypeId, position: Position) -> bool {
        let data = self.data(ty);
        let is_function = matches!(data, TypeData::Object(shape) if shape.as_function().is_some());
        let is_conditional = matches!(data, TypeData::Conditional(_));
        let is_union = matches!(data, TypeData::Union(_));
        let is_intersection = matches!(data, TypeData::Intersection(_));
        let is_operator = matches!(data, TypeData::KeyOf(_))
            || matches!(data, TypeData::Array { readonly: true, .. } | TypeData::Tuple { readonly: true, .. });
        match position {
            Position::Top => false,
            Position::ArrayElement | Position::IndexedObject => {
                is_function || is_conditional || is_union || is_intersection || is_operator
            }
            Position::TypeOperand => is_function || is_conditional || is_union || is_intersection,
            Position::UnionMember => is_function || is_conditional,
            Position::IntersectionMember => is_function || is_conditional || is_union,
            Position::CheckType => is_function || is_conditional,
            Position::OptionalElement => is_function || is_conditional || is_union,
        }
    }

    fn write_type_inner(&mut self, ty: TypeId) {
        match self.data(ty) {
            TypeData::Intrinsic(kind) => self.out.push_str(kind.as_str()),
            TypeData::Literal(value) => write_literal(&mut self.out, value),
            TypeData::ThisType => self.out.push_str("this"),
            TypeData::Object(shape) => self.write_object(shape),
            TypeData::Array { element, readonly } => {
                if *readonly {
                    self.out.push_str("readonly ");
                }
                self.write_type(*element, Position::ArrayElement, false);
                self.out.push_str("[]");
            }
            TypeData::Tuple { elements, readonly } => {
                if *readonly {
                    self.out.push_str("readonly ");
                }
                self.write_tuple(elements);
            }
            TypeData::Union(members) => self.write_joined(members, " | ", Position::UnionMember),
            TypeData::Intersection(members) => {
                self.write_joined(members, " & ", Position::IntersectionMember)
            }
            TypeData::TypeParameter(info) => self.out.push_str(&info.name),
            TypeData::Reference { def, args } => {
                let name = &self.checker.program().definitions().get(*def).name;
                self.out.push_str(name);
                let args = self.checker.interner.type_list(*args);
                self.write_type_arguments(&args);
            }
            TypeData::KeyOf(operand) => {
                self.out.push_str("keyof ");
                self.write_type(*operand, Position::TypeOperand, false);
            }
            TypeData::IndexedAccess { object, index } => {
                self.write_type(*object, Position::IndexedObject, false);
                self.out.push('[');
                self.write_type(*index, Position::Top, false);
                self.out.push(']');
            }
            TypeData::Mapped(mapped) => self.write_mapped(mapped),
            TypeData::Conditional(conditional) => {
                self.write_type(conditional.check_type, Position::CheckType, false);
                self.out.push_str(" extends ");
                self.write_type(conditional.extends_type, Position::CheckType, false);
                self.out.push_str(" ? ");
                self.write_type(conditional.true_type, Position::Top, false);
                self.out.push_str(" : ");
                self.write_type(conditional.false_type, Position::Top, false);
            }
        }
    }

    fn write_joined(&mut self, members: &[TypeId], separator: &str, position: Position) {
        for (i, &member) in members.iter().enumerate() {
            if i > 0 {
                self.out.push_str(separator);
            }
            self.write_type(member, position, false);
        }
    }

    fn write_type_arguments(&mut self, args: &[TypeId]) {
        if args.is_empty() {
            return;
        }
        self.out.push('<');
        for (i, &arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.write_type(arg, Position::Top, false);
        }
        self.out.push('>');
    }

    fn write_tuple(&mut self, elements: &[TupleElementInfo]) {
        self.out.push('[');
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            if element.rest {
                self.out.push_str("...");
            }
            match &element.name {
                Some(name) => {
                    self.out.push_str(name);
                    if element.optional {
                        self.out.push('?');
                    }
                    self.out.push_str(": ");
                    self.write_type(element.ty, Position::Top, false);
                }
                None if element.optional => {
                    self.write_type(element.ty, Position::OptionalElement, false);
                    self.out.push('?');
                }
                None => self.write_type(element.ty, Position::Top, false),
            }
        }
        self.out.push(']');
    }

    fn write_object(&mut self, shape: &ObjectShape) {
        if let Some((signature, is_constructor)) = shape.as_function() {
            if is_constructor {
                self.out.push_str("new ");
            }
            self.write_signature(signature, " => ");
            return;
        }
        if shape.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push_str("{ ");
        for signature in &shape.call_signatures {
            self.write_signature(signature, ": ");
            self.out.push_str("; ");
        }
        for signature in &shape.construct_signatures {
            self.out.push_str("new ");
            self.write_signature(signature, ": ");
            self.out.push_str("; ");
        }
        for index in &shape.index_signatures {
            if index.readonly {
                self.out.push_str("readonly ");
            }
            let _ = write!(self.out, "[{}: ", index.parameter_name);
            self.write_type(index.key_type, Position::Top, false);
            self.out.push_str("]: ");
            self.write_type(index.value_type, Position::Top, false);
            self.out.push_str("; ");
        }
        for prop in &shape.properties {
            self.write_property(prop);
        }
        self.out.push('}');
    }

    fn write_property(&mut self, prop: &PropertyInfo) {
        if prop.is_method
            && let TypeData::Object(method) = self.data(prop.ty)
            && method.properties.is_empty()
            && !method.call_signatures.is_empty()
        {
            for signature in &method.call_signatures {
                self.write_property_name(prop);
                if prop.optional {
                    self.out.push('?');
                }
                self.write_signature(signature, ": ");
                self.out.push_str("; ");
            }
            return;
        }
        if prop.readonly {
            self.out.push_str("readonly ");
        }
        self.write_property_name(prop);
        if prop.optional {
            self.out.push('?');
        }
        self.out.push_str(": ");
        self.write_type(prop.ty, Position::Top, false);
        self.out.push_str("; ");
    }

    fn write_property_name(&mut self, prop: &PropertyInfo) {
        match prop.key_kind {
            PropertyKeyKind::Numeric | PropertyKeyKind::Computed => self.out.push_str(&prop.name),
            PropertyKeyKind::Named if is_identifier_name(&prop.name) => self.out.push_str(&prop.name),
            PropertyKeyKind::Named => write_string_literal(&mut self.out, &prop.name),
        }
    }

    /// `<T>(a: T, b?: string) => R` or, with `": "`, a signature member.
    fn write_signature(&mut self, signature: &SignatureInfo, arrow: &str) {
        if !signature.type_params.is_empty() {
            self.out.push('<');
            for (i, param) in signature.type_params.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(", ");
                }
                self.write_type_param(param);
            }
            self.out.push('>');
        }
        self.out.push('(');
        for (i, param) in signature.params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            if param.rest {
                self.out.push_str("...");
            }
            self.out.push_str(&param.name);
            if param.optional {
                self.out.push('?');
            }
            self.out.push_str(": ");
            self.write_type(param.ty, Position::Top, false);
        }
        self.out.push(')');
        self.out.push_str(arrow);
        self.write_type(signature.return_type, Position::Top, false);
    }

    fn write_type_param(&mut self, param: &TypeParamInfo) {
        self.out.push_str(&param.name);
        if let Some(constraint) = param.constraint {
            self.out.push_str(" extends ");
            self.write_type(constraint, Position::Top, false);
        }
        if let Some(default) = param.default {
            self.out.push_str(" = ");
            self.write_type(default, Position::Top, false);
        }
    }

    fn write_mapped(&mut self, mapped: &MappedInfo) {
        self.out.push_str("{ ");
        match mapped.readonly {
            Some(MappedModifier::Add) => self.out.push_str("readonly "),
            Some(MappedModifier::Remove) => self.out.push_str("-readonly "),
            None => {}
        }
        let _ = write!(self.out, "[{} in ", mapped.type_param.name);
        self.write_type(mapped.constraint, Position::Top, false);
        if let Some(name_type) = mapped.name_type {
            self.out.push_str(" as ");
            self.write_type(name_type, Position::Top, false);
        }
        self.out.push(']');
        match mapped.optional {
            Some(MappedModifier::Add) => self.out.push('?'),
            Some(MappedModifier::Remove) => self.out.push_str("-?"),
            None => {}
        }
        self.out.push_str(": ");
        self.write_type(mapped.template, Position::Top, false);
        self.out.push_str("; }");
    }
}

fn write_literal(out: &mut String, value: &LiteralValue) {
    match value {
        LiteralValue::String(text) => write_string_literal(out, text),
        LiteralValue::Number(bits) => out.push_str(&format_js_number(f64::from_bits(*bits))),
        LiteralValue::BigInt(text) => {
            out.push_str(text);
            out.push('n');
        }
        LiteralValue::Boolean(value) => out.push_str(if *value { "true" } else { "false" }),
    }
}

/// Double-quoted string literal with JSON-style escapes.
pub(crate) fn write_string_literal(out: &mut String, text: &str) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Whether `name` can be written without quotes as a property name.
pub(crate) fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod format_tests;
