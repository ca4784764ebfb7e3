//! `T[K]`

use tracing::debug;

use crate::checker::TypeChecker;
use crate::types::*;

impl TypeChecker<'_> {
    pub(crate) fn evaluate_indexed_access(&mut self, object: TypeId, index: TypeId) -> TypeId {
        if self.interner.contains_type_parameters(index) || self.is_generic_object(object) {
            return self.interner.indexed_access(object, index);
        }
        if let TypeData::Union(members) = self.interner.lookup(index).clone() {
            let results = members
                .iter()
                .map(|&m| self.evaluate_indexed_access(object, m))
                .collect();
            return self.interner.union(results);
        }
        if let TypeData::Union(members) = self.interner.lookup(object).clone() {
            let results = members
                .iter()
                .map(|&m| self.evaluate_indexed_access(m, index))
                .collect();
            return self.interner.union(results);
        }

        match object {
            TypeId::ANY => return TypeId::ANY,
            TypeId::ERROR => return TypeId::ERROR,
            TypeId::NEVER => return TypeId::NEVER,
            _ => {}
        }
        let result = match self.interner.lookup(object).clone() {
            TypeData::Object(shape) => self.index_shape(&shape, index),
            TypeData::Array { element, .. } => match self.numeric_index(index) {
                Some(_) => Some(element),
                None if index == TypeId::NUMBER => Some(element),
                None if self.is_string_literal(index, "length") => Some(TypeId::NUMBER),
                None => None,
            },
            TypeData::Tuple { elements, .. } => self.index_tuple(&elements, index),
            TypeData::Intersection(members) => {
                let found: Vec<TypeId> = members
                    .iter()
                    .filter_map(|&m| {
                        let r = self.evaluate_indexed_access(m, index);
                        (r != TypeId::ERROR).then_some(r)
                    })
                    .collect();
                (!found.is_empty()).then(|| self.interner.intersection(found))
            }
            TypeData::Reference { def, args } => self
                .expand_reference(def, args)
                .map(|expanded| self.evaluate_indexed_access(expanded, index)),
            TypeData::Literal(LiteralValue::String(_)) | TypeData::Intrinsic(IntrinsicKind::String) => {
                if index == TypeId::NUMBER || self.numeric_index(index).is_some() {
                    Some(TypeId::STRING)
                } else if self.is_string_literal(index, "length") {
                    Some(TypeId::NUMBER)
                } else {
                    None
                }
            }
            _ => None,
        };
        result.unwrap_or_else(|| {
            debug!(?object, ?index, "index type does not apply to object type");
            TypeId::ERROR
        })
    }

    fn is_generic_object(&self, object: TypeId) -> bool {
        matches!(
            self.interner.lookup(object),
            TypeData::TypeParameter(_)
                | TypeData::ThisType
                | TypeData::KeyOf(_)
                | TypeData::IndexedAccess { .. }
                | TypeData::Mapped(_)
                | TypeData::Conditional(_)
        )
    }

    fn index_shape(&mut self, shape: &ObjectShape, index: TypeId) -> Option<TypeId> {
        let key = match self.interner.lookup(index) {
            TypeData::Literal(LiteralValue::String(name)) => Some(name.clone()),
            TypeData::Literal(value @ LiteralValue::Number(_)) => value
                .as_number()
                .map(tsreveal_parser::scanner::format_js_number),
            _ => None,
        };
        if let Some(key) = key {
            if let Some(prop) = shape.property(&key) {
                let (ty, optional) = (prop.ty, prop.optional);
                return Some(if optional {
                    self.interner.union2(ty, TypeId::UNDEFINED)
                } else {
                    ty
                });
            }
            let numeric = key.parse::<f64>().is_ok();
            return self
                .index_signature(shape, TypeId::NUMBER)
                .filter(|_| numeric)
                .or_else(|| self.index_signature(shape, TypeId::STRING));
        }
        match index {
            TypeId::STRING => self.index_signature(shape, TypeId::STRING),
            TypeId::NUMBER => self
                .index_signature(shape, TypeId::NUMBER)
                .or_else(|| self.index_signature(shape, TypeId::STRING)),
            TypeId::SYMBOL => self.index_signature(shape, TypeId::SYMBOL),
            _ => None,
        }
    }

    fn index_signature(&self, shape: &ObjectShape, key_type: TypeId) -> Option<TypeId> {
        shape
            .index_signatures
            .iter()
            .find(|i| i.key_type == key_type)
            .map(|i| i.value_type)
    }

    fn index_tuple(&mut self, elements: &[TupleElementInfo], index: TypeId) -> Option<TypeId> {
        if let Some(position) = self.numeric_index(index) {
            return match elements.get(position) {
                Some(element) if element.rest => Some(self.rest_element_type(element.ty)),
                Some(element) if element.optional => {
                    Some(self.interner.union2(element.ty, TypeId::UNDEFINED))
                }
                Some(element) => Some(element.ty),
                None => elements
                    .last()
                    .filter(|e| e.rest)
                    .map(|e| e.ty)
                    .map(|ty| self.rest_element_type(ty)),
            };
        }
        if index == TypeId::NUMBER {
            let members = elements
                .iter()
                .map(|e| {
                    if e.rest {
                        self.rest_element_type(e.ty)
                    } else {
                        e.ty
                    }
                })
                .collect();
            return Some(self.interner.union(members));
        }
        if self.is_string_literal(index, "length") {
            let fixed = elements.iter().all(|e| !e.rest && !e.optional);
            return Some(if fixed {
                self.interner.literal_number(elements.len() as f64)
            } else {
                TypeId::NUMBER
            });
        }
        None
    }

    /// Element type of a `...rest` tuple member.
    pub(crate) fn rest_element_type(&self, rest: TypeId) -> TypeId {
        match self.interner.lookup(rest) {
            TypeData::Array { element, .. } => *element,
            _ => rest,
        }
    }

    /// Position named by a numeric literal or a numeric string literal.
    pub(crate) fn numeric_index(&self, index: TypeId) -> Option<usize> {
        let value = match self.interner.lookup(index) {
            TypeData::Literal(LiteralValue::Number(bits)) => f64::from_bits(*bits),
            TypeData::Literal(LiteralValue::String(text)) => text.parse::<f64>().ok()?,
            _ => return None,
        };
        (value >= 0.0 && value.fract() == 0.0).then_some(value as usize)
    }

    fn is_string_literal(&self, ty: TypeId, text: &str) -> bool {
        matches!(self.interner.lookup(ty), TypeData::Literal(LiteralValue::String(s)) if s == text)
    }
}
