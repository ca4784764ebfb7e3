//! Structural assignability, as needed to pick conditional type branches.
//!
//! Relations are checked under strict null checks. Parameters compare
//! bivariantly, like method parameters. A pair of types already under
//! comparison is assumed related, which makes recursive types terminate.

use tracing::trace;

use crate::checker::TypeChecker;
use crate::def::DefKind;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::*;

struct Relation<'c, 'p> {
    checker: &'c mut TypeChecker<'p>,
    guard: RecursionGuard<(TypeId, TypeId)>,
}

impl TypeChecker<'_> {
    pub(crate) fn is_assignable(&mut self, source: TypeId, target: TypeId) -> bool {
        let mut relation = Relation {
            checker: self,
            guard: RecursionGuard::with_profile(RecursionProfile::Assignability),
        };
        relation.is_related(source, target)
    }
}

impl Relation<'_, '_> {
    fn lookup(&self, ty: TypeId) -> TypeData {
        self.checker.interner.lookup(ty).clone()
    }

    fn is_related(&mut self, source: TypeId, target: TypeId) -> bool {
        if source == target {
            return true;
        }
        match target {
            TypeId::ANY | TypeId::UNKNOWN | TypeId::ERROR => return true,
            _ => {}
        }
        match source {
            TypeId::NEVER => return true,
            TypeId::ANY | TypeId::ERROR => return target != TypeId::NEVER,
            _ => {}
        }

        let key = (source, target);
        match self.guard.enter(key) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => return true,
            exceeded => {
                trace!(?exceeded, "assignability limit reached");
                return true;
            }
        }
        let result = self.is_structurally_related(source, target);
        self.guard.leave(key);
        result
    }

    fn is_structurally_related(&mut self, source: TypeId, target: TypeId) -> bool {
        let source_data = self.lookup(source);
        let target_data = self.lookup(target);

        if let TypeData::Union(members) = &source_data {
            return members.iter().all(|&m| self.is_related(m, target));
        }
        if let TypeData::Union(members) = &target_data {
            if source == TypeId::BOOLEAN {
                return self.is_related(TypeId::TRUE, target) && self.is_related(TypeId::FALSE, target);
            }
            return members.iter().any(|&m| self.is_related(source, m));
        }
        if let TypeData::Intersection(members) = &target_data {
            return members.iter().all(|&m| self.is_related(source, m));
        }
        if let TypeData::Intersection(members) = &source_data {
            return members.iter().any(|&m| self.is_related(m, target));
        }

        match (&source_data, &target_data) {
            (TypeData::TypeParameter(info), _) => {
                let constraint = info.constraint.unwrap_or(TypeId::UNKNOWN);
                return constraint != source && self.is_related(constraint, target);
            }
            (TypeData::Reference { def: sd, args: sa }, TypeData::Reference { def: td, args: ta })
                if sd == td =>
            {
                let sources = self.checker.interner.type_list(*sa);
                let targets = self.checker.interner.type_list(*ta);
                return sources
                    .iter()
                    .zip(targets.iter())
                    .all(|(&s, &t)| self.is_related(s, t));
            }
            (TypeData::Reference { def: sd, .. }, TypeData::Reference { def: td, .. })
                if matches!(
                    self.checker.program().definitions().get(*sd).kind,
                    DefKind::EnumMember { parent } if parent == *td
                ) =>
            {
                return true;
            }
            (TypeData::Reference { def, args }, _) => {
                return match self.checker.expand_reference(*def, *args) {
                    Some(expanded) => self.is_related(expanded, target),
                    None => false,
                };
            }
            (_, TypeData::Reference { def, args }) => {
                return match self.checker.expand_reference(*def, *args) {
                    Some(expanded) => self.is_related(source, expanded),
                    None => false,
                };
            }
            _ => {}
        }

        match target {
            TypeId::VOID => return source == TypeId::UNDEFINED,
            TypeId::OBJECT => {
                return matches!(
                    source_data,
                    TypeData::Object(_) | TypeData::Array { .. } | TypeData::Tuple { .. } | TypeData::Mapped(_)
                ) || source == TypeId::OBJECT;
            }
            TypeId::EMPTY_OBJECT => {
                return !matches!(source, TypeId::NULL | TypeId::UNDEFINED | TypeId::VOID | TypeId::UNKNOWN);
            }
            _ => {}
        }

        match (source_data, target_data) {
            (TypeData::Literal(value), TypeData::Intrinsic(_)) => value.primitive() == target,
            (TypeData::Array { element: s, readonly: sr }, TypeData::Array { element: t, readonly: tr }) => {
                (!sr || tr) && self.is_related(s, t)
            }
            (TypeData::Tuple { elements, readonly: sr }, TypeData::Array { element: t, readonly: tr }) => {
                (!sr || tr)
                    && elements.iter().all(|e| {
                        let s = if e.rest {
                            self.checker.rest_element_type(e.ty)
                        } else {
                            e.ty
                        };
                        self.is_related(s, t)
                    })
            }
            (TypeData::Tuple { elements: se, readonly: sr }, TypeData::Tuple { elements: te, readonly: tr }) => {
                (!sr || tr) && self.is_tuple_related(&se, &te)
            }
            (TypeData::Object(s), TypeData::Object(t)) => self.is_shape_related(&s, &t),
            (TypeData::Array { element, .. }, TypeData::Object(t)) => {
                let s = self.array_shape(element, TypeId::NUMBER);
                self.is_shape_related(&s, &t)
            }
            (TypeData::Tuple { elements, .. }, TypeData::Object(t)) => {
                let members = elements.iter().map(|e| e.ty).collect();
                let element = self.checker.interner.union(members);
                let length = self.checker.interner.literal_number(elements.len() as f64);
                let s = self.array_shape(element, length);
                self.is_shape_related(&s, &t)
            }
            (TypeData::Literal(LiteralValue::String(_)) | TypeData::Intrinsic(IntrinsicKind::String), TypeData::Object(t)) => {
                let s = self.array_shape(TypeId::STRING, TypeId::NUMBER);
                self.is_shape_related(&s, &t)
            }
            (_, TypeData::Object(t)) if self.checker.interner.is_primitive_like(source) => {
                // Primitives only match objects that require nothing.
                t.properties.iter().all(|p| p.optional) && t.call_signatures.is_empty() && t.construct_signatures.is_empty()
                    && !matches!(source, TypeId::NULL | TypeId::UNDEFINED | TypeId::VOID)
            }
            (
                TypeData::Conditional(s),
                TypeData::Conditional(t),
            ) => {
                s.check_type == t.check_type
                    && s.extends_type == t.extends_type
                    && self.is_related(s.true_type, t.true_type)
                    && self.is_related(s.false_type, t.false_type)
            }
            (TypeData::Conditional(s), _) => {
                self.is_related(s.true_type, target) && self.is_related(s.false_type, target)
            }
            (TypeData::KeyOf(_), _) => {
                let keys = self.checker.property_key_type();
                self.is_related(keys, target)
            }
            _ => false,
        }
    }

    /// Members an array-like value exposes to structural comparison.
    fn array_shape(&mut self, element: TypeId, length: TypeId) -> ObjectShape {
        ObjectShape {
            properties: vec![PropertyInfo {
                name: "length".to_string(),
                key_kind: PropertyKeyKind::Named,
                ty: length,
                optional: false,
                readonly: false,
                is_method: false,
            }],
            index_signatures: vec![IndexInfo {
                parameter_name: "n".to_string(),
                key_type: TypeId::NUMBER,
                value_type: element,
                readonly: false,
            }],
            ..ObjectShape::default()
        }
    }

    fn is_tuple_related(&mut self, source: &[TupleElementInfo], target: &[TupleElementInfo]) -> bool {
        let target_rest = target.iter().position(|e| e.rest);
        let fixed = target_rest.unwrap_or(target.len());
        for (i, t) in target.iter().take(fixed).enumerate() {
            match source.get(i) {
                Some(s) if s.rest => return false,
                Some(s) => {
                    if s.optional && !t.optional {
                        return false;
                    }
                    if !self.is_related(s.ty, t.ty) {
                        return false;
                    }
                }
                None if t.optional => {}
                None => return false,
            }
        }
        match target_rest {
            Some(index) => {
                let rest = target[index].ty;
                let rest_element = self.checker.rest_element_type(rest);
                source.iter().skip(fixed).all(|s| {
                    if s.rest {
                        self.is_related(s.ty, rest)
                    } else {
                        self.is_related(s.ty, rest_element)
                    }
                })
            }
            None => source.len() <= target.len() && !source.iter().any(|s| s.rest),
        }
    }

    fn is_shape_related(&mut self, source: &ObjectShape, target: &ObjectShape) -> bool {
        for prop in &target.properties {
            match source.property(&prop.name) {
                Some(sp) => {
                    if sp.optional && !prop.optional {
                        return false;
                    }
                    let target_ty = if prop.optional {
                        self.checker.interner.union2(prop.ty, TypeId::UNDEFINED)
                    } else {
                        prop.ty
                    };
                    if !self.is_related(sp.ty, target_ty) {
                        return false;
                    }
                }
                None if prop.optional => {}
                None => {
                    let from_index = source
                        .index_signatures
                        .iter()
                        .find(|i| i.key_type == TypeId::STRING)
                        .map(|i| i.value_type);
                    match from_index {
                        Some(value) if self.is_related(value, prop.ty) => {}
                        _ => return false,
                    }
                }
            }
        }
        for index in &target.index_signatures {
            let matching = source
                .index_signatures
                .iter()
                .find(|i| i.key_type == index.key_type || i.key_type == TypeId::STRING)
                .map(|i| i.value_type);
            let ok = match matching {
                Some(value) => self.is_related(value, index.value_type),
                None => source
                    .properties
                    .iter()
                    .filter(|p| index.key_type == TypeId::STRING || p.key_kind == PropertyKeyKind::Numeric)
                    .all(|p| self.is_related(p.ty, index.value_type)),
            };
            if !ok {
                return false;
            }
        }
        for signature in &target.call_signatures {
            if !source.call_signatures.iter().any(|s| self.is_signature_related(s, signature)) {
                return false;
            }
        }
        for signature in &target.construct_signatures {
            if !source
                .construct_signatures
                .iter()
                .any(|s| self.is_signature_related(s, signature))
            {
                return false;
            }
        }
        true
    }

    fn is_signature_related(&mut self, source: &SignatureInfo, target: &SignatureInfo) -> bool {
        let source_params = self.flatten_params(&source.params);
        let target_params = self.flatten_params(&target.params);
        let target_rest = target_params.last().filter(|p| p.rest).map(|p| p.ty);

        for (i, sp) in source_params.iter().enumerate() {
            let target_ty = match target_params.get(i) {
                Some(tp) if tp.rest => self.checker.rest_element_type(tp.ty),
                Some(tp) => tp.ty,
                None => match target_rest {
                    Some(rest) => self.checker.rest_element_type(rest),
                    None if sp.optional || sp.rest => continue,
                    None => return false,
                },
            };
            let source_ty = if sp.rest {
                self.checker.rest_element_type(sp.ty)
            } else {
                sp.ty
            };
            if !self.is_related(target_ty, source_ty) && !self.is_related(source_ty, target_ty) {
                return false;
            }
        }
        target.return_type == TypeId::VOID || self.is_related(source.return_type, target.return_type)
    }

    /// Parameters with a tuple-typed rest parameter spread out.
    fn flatten_params(&mut self, params: &[ParamInfo]) -> Vec<ParamInfo> {
        let mut out = Vec::with_capacity(params.len());
        for param in params {
            if param.rest
                && let TypeData::Tuple { elements, .. } = self.lookup(param.ty)
            {
                out.extend(elements.into_iter().enumerate().map(|(i, e)| ParamInfo {
                    name: e.name.unwrap_or_else(|| format!("arg{i}")),
                    ty: e.ty,
                    optional: e.optional,
                    rest: e.rest,
                }));
                continue;
            }
            out.push(param.clone());
        }
        out
    }
}

#[cfg(test)]
#[path = "tests/relate_tests.rs"]
mod relate_tests;
