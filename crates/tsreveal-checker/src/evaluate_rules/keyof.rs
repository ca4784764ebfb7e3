//! `keyof T`

use crate::checker::TypeChecker;
use crate::types::*;

impl TypeChecker<'_> {
    pub(crate) fn evaluate_keyof(&mut self, operand: TypeId) -> TypeId {
        match operand {
            TypeId::ANY | TypeId::ERROR | TypeId::NEVER => return self.property_key_type(),
            TypeId::UNKNOWN => return TypeId::NEVER,
            _ => {}
        }
        match self.interner.lookup(operand).clone() {
            TypeData::Object(shape) => self.keys_of_shape(&shape),
            TypeData::Array { .. } => self.string_keys(),
            TypeData::Tuple { elements, .. } => {
                let mut keys: Vec<TypeId> = elements
                    .iter()
                    .take_while(|e| !e.rest)
                    .enumerate()
                    .map(|(i, _)| self.interner.literal_string(i.to_string()))
                    .collect();
                keys.push(TypeId::NUMBER);
                keys.push(self.interner.literal_string("length"));
                self.interner.union(keys)
            }
            // Only keys present in every member.
            TypeData::Union(members) => {
                let keys = members.iter().map(|&m| self.evaluate_keyof(m)).collect();
                self.interner.intersection(keys)
            }
            TypeData::Intersection(members) => {
                let keys = members.iter().map(|&m| self.evaluate_keyof(m)).collect();
                self.interner.union(keys)
            }
            TypeData::Reference { def, args } => match self.expand_reference(def, args) {
                Some(expanded) => self.evaluate_keyof(expanded),
                None => self.interner.keyof(operand),
            },
            // `keyof { [P in K]: X }` is `K` unless keys are remapped.
            TypeData::Mapped(mapped) if mapped.name_type.is_none() => mapped.constraint,
            TypeData::TypeParameter(_)
            | TypeData::ThisType
            | TypeData::KeyOf(_)
            | TypeData::IndexedAccess { .. }
            | TypeData::Mapped(_)
            | TypeData::Conditional(_) => self.interner.keyof(operand),
            // Strings index by position and expose `length`; other
            // primitives contribute no keys the checker models.
            TypeData::Literal(LiteralValue::String(_)) => self.string_keys(),
            TypeData::Intrinsic(_) if operand == TypeId::STRING => self.string_keys(),
            TypeData::Literal(_) | TypeData::Intrinsic(_) => TypeId::NEVER,
        }
    }

    /// `number | "length"`, the keys of strings and arrays.
    fn string_keys(&mut self) -> TypeId {
        let length = self.interner.literal_string("length");
        self.interner.union(vec![TypeId::NUMBER, length])
    }

    /// `string | number | symbol`
    pub(crate) fn property_key_type(&mut self) -> TypeId {
        self.interner
            .union(vec![TypeId::STRING, TypeId::NUMBER, TypeId::SYMBOL])
    }

    fn keys_of_shape(&mut self, shape: &ObjectShape) -> TypeId {
        let mut keys = Vec::with_capacity(shape.properties.len() + shape.index_signatures.len());
        for index in &shape.index_signatures {
            match index.key_type {
                TypeId::STRING => {
                    keys.push(TypeId::STRING);
                    keys.push(TypeId::NUMBER);
                }
                key => keys.push(key),
            }
        }
        for prop in &shape.properties {
            match prop.key_kind {
                PropertyKeyKind::Named => keys.push(self.interner.literal_string(prop.name.clone())),
                PropertyKeyKind::Numeric => match prop.name.parse::<f64>() {
                    Ok(value) => keys.push(self.interner.literal_number(value)),
                    Err(_) => keys.push(self.interner.literal_string(prop.name.clone())),
                },
                PropertyKeyKind::Computed => keys.push(TypeId::SYMBOL),
            }
        }
        self.interner.union(keys)
    }
}
