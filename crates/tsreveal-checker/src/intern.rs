//! Type interning and normalizing constructors.
//!
//! Structurally identical types share one [`TypeId`]. Unions and
//! intersections are normalized on construction so that every later stage
//! (relations, printing) sees canonical forms.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tsreveal_common::limits::MAX_DISTRIBUTION_MEMBERS;

use crate::def::DefId;
use crate::types::*;

#[derive(Debug)]
pub struct TypeInterner {
    types: Vec<TypeData>,
    map: FxHashMap<TypeData, TypeId>,
    lists: Vec<Arc<[TypeId]>>,
    list_map: FxHashMap<Arc<[TypeId]>, TypeListId>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        let mut interner = TypeInterner {
            types: Vec::new(),
            map: FxHashMap::default(),
            lists: Vec::new(),
            list_map: FxHashMap::default(),
        };
        let predefined = [
            TypeData::Intrinsic(IntrinsicKind::Any),
            TypeData::Intrinsic(IntrinsicKind::Unknown),
            TypeData::Intrinsic(IntrinsicKind::Never),
            TypeData::Intrinsic(IntrinsicKind::Void),
            TypeData::Intrinsic(IntrinsicKind::Undefined),
            TypeData::Intrinsic(IntrinsicKind::Null),
            TypeData::Intrinsic(IntrinsicKind::Boolean),
            TypeData::Intrinsic(IntrinsicKind::Number),
            TypeData::Intrinsic(IntrinsicKind::String),
            TypeData::Intrinsic(IntrinsicKind::BigInt),
            TypeData::Intrinsic(IntrinsicKind::Symbol),
            TypeData::Intrinsic(IntrinsicKind::Object),
            TypeData::Intrinsic(IntrinsicKind::Error),
            TypeData::Literal(LiteralValue::Boolean(true)),
            TypeData::Literal(LiteralValue::Boolean(false)),
            TypeData::ThisType,
            TypeData::Object(ObjectShape::default()),
        ];
        for data in predefined {
            interner.intern(data);
        }
        debug_assert_eq!(interner.types.len() as u32, TypeId::FIRST_DYNAMIC);
        interner.intern_list(&[]);
        interner
    }

    pub fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(&id) = self.map.get(&data) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(data.clone());
        self.map.insert(data, id);
        id
    }

    pub fn lookup(&self, id: TypeId) -> &TypeData {
        &self.types[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn intern_list(&mut self, types: &[TypeId]) -> TypeListId {
        if let Some(&id) = self.list_map.get(types) {
            return id;
        }
        let id = TypeListId(self.lists.len() as u32);
        let list: Arc<[TypeId]> = Arc::from(types);
        self.lists.push(Arc::clone(&list));
        self.list_map.insert(list, id);
        id
    }

    pub fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        Arc::clone(&self.lists[id.0 as usize])
    }

    // =========================================================================
    // Simple constructors
    // =========================================================================

    pub fn literal(&mut self, value: LiteralValue) -> TypeId {
        match value {
            LiteralValue::Boolean(true) => TypeId::TRUE,
            LiteralValue::Boolean(false) => TypeId::FALSE,
            value => self.intern(TypeData::Literal(value)),
        }
    }

    pub fn literal_string(&mut self, value: impl Into<String>) -> TypeId {
        self.literal(LiteralValue::String(value.into()))
    }

    pub fn literal_number(&mut self, value: f64) -> TypeId {
        self.literal(LiteralValue::number(value))
    }

    pub fn object(&mut self, shape: ObjectShape) -> TypeId {
        self.intern(TypeData::Object(shape))
    }

    pub fn array(&mut self, element: TypeId, readonly: bool) -> TypeId {
        self.intern(TypeData::Array { element, readonly })
    }

    pub fn tuple(&mut self, elements: Vec<TupleElementInfo>, readonly: bool) -> TypeId {
        self.intern(TypeData::Tuple { elements, readonly })
    }

    pub fn type_param(&mut self, info: TypeParamInfo) -> TypeId {
        self.intern(TypeData::TypeParameter(info))
    }

    pub fn reference(&mut self, def: DefId, args: &[TypeId]) -> TypeId {
        let args = self.intern_list(args);
        self.intern(TypeData::Reference { def, args })
    }

    pub fn keyof(&mut self, operand: TypeId) -> TypeId {
        self.intern(TypeData::KeyOf(operand))
    }

    pub fn indexed_access(&mut self, object: TypeId, index: TypeId) -> TypeId {
        self.intern(TypeData::IndexedAccess { object, index })
    }

    pub fn mapped(&mut self, info: MappedInfo) -> TypeId {
        self.intern(TypeData::Mapped(Box::new(info)))
    }

    pub fn conditional(&mut self, info: ConditionalInfo) -> TypeId {
        self.intern(TypeData::Conditional(Box::new(info)))
    }

    /// Callable object type with a single call (or construct) signature.
    pub fn function(&mut self, signature: SignatureInfo, is_constructor: bool) -> TypeId {
        let mut shape = ObjectShape::default();
        if is_constructor {
            shape.construct_signatures.push(signature);
        } else {
            shape.call_signatures.push(signature);
        }
        self.object(shape)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn union_members(&self, id: TypeId) -> Vec<TypeId> {
        match self.lookup(id) {
            TypeData::Union(members) => members.clone(),
            _ => vec![id],
        }
    }

    pub fn is_primitive_like(&self, id: TypeId) -> bool {
        matches!(
            id,
            TypeId::STRING
                | TypeId::NUMBER
                | TypeId::BOOLEAN
                | TypeId::BIGINT
                | TypeId::SYMBOL
                | TypeId::NULL
                | TypeId::UNDEFINED
                | TypeId::VOID
        ) || matches!(self.lookup(id), TypeData::Literal(_))
    }

    /// Whether `id` mentions a type parameter anywhere, i.e. still depends
    /// on an instantiation that has not happened.
    pub fn contains_type_parameters(&self, id: TypeId) -> bool {
        self.contains_type_parameters_except(id, &[])
    }

    /// Like [`contains_type_parameters`](Self::contains_type_parameters), but
    /// the parameters in `bound` do not count.
    pub fn contains_type_parameters_except(&self, id: TypeId, bound: &[TypeId]) -> bool {
        let mut seen = FxHashSet::default();
        self.contains_type_parameters_inner(id, bound, &mut seen)
    }

    fn contains_type_parameters_inner(
        &self,
        id: TypeId,
        bound: &[TypeId],
        seen: &mut FxHashSet<TypeId>,
    ) -> bool {
        if id.0 < TypeId::FIRST_DYNAMIC || !seen.insert(id) {
            return false;
        }
        let mut check = |ty: TypeId| self.contains_type_parameters_inner(ty, bound, seen);
        match self.lookup(id) {
            TypeData::TypeParameter(_) => !bound.contains(&id),
            TypeData::ThisType => true,
            TypeData::KeyOf(_)
            | TypeData::IndexedAccess { .. }
            | TypeData::Mapped(_)
            | TypeData::Conditional(_) => true,
            TypeData::Intrinsic(_) | TypeData::Literal(_) => false,
            TypeData::Array { element, .. } => check(*element),
            TypeData::Tuple { elements, .. } => elements.iter().any(|e| check(e.ty)),
            TypeData::Union(members) | TypeData::Intersection(members) => {
                members.iter().any(|&m| check(m))
            }
            TypeData::Reference { args, .. } => {
                self.lists[args.0 as usize].iter().any(|&a| check(a))
            }
            TypeData::Object(shape) => {
                // Signature-local type parameters are bound, not free, but
                // telling them apart is not worth it for deferral decisions.
                shape.properties.iter().any(|p| check(p.ty))
                    || shape
                        .index_signatures
                        .iter()
                        .any(|i| check(i.key_type) || check(i.value_type))
                    || shape
                        .call_signatures
                        .iter()
                        .chain(&shape.construct_signatures)
                        .any(|s| {
                            s.type_params.is_empty()
                                && (check(s.return_type) || s.params.iter().any(|p| check(p.ty)))
                        })
            }
        }
    }

    // =========================================================================
    // Unions
    // =========================================================================

    /// Normalized union.
    ///
    /// Nested unions are flattened and duplicates removed. `never` members
    /// disappear, `any` and `unknown` absorb everything, and literals are
    /// dropped when their primitive is present. `true | false` becomes
    /// `boolean`. Otherwise members keep their source order, except that
    /// `null` and `undefined` always come last.
    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::with_capacity(members.len());
        let mut seen = FxHashSet::default();
        for member in members {
            match self.lookup(member) {
                TypeData::Union(inner) => {
                    for &m in inner {
                        if seen.insert(m) {
                            flat.push(m);
                        }
                    }
                }
                _ => {
                    if seen.insert(member) {
                        flat.push(member);
                    }
                }
            }
        }

        if seen.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        if seen.contains(&TypeId::ERROR) {
            return TypeId::ERROR;
        }
        if seen.contains(&TypeId::UNKNOWN) {
            return TypeId::UNKNOWN;
        }
        flat.retain(|&m| m != TypeId::NEVER);

        // Literals fold into a primitive that is present.
        flat.retain(|&m| match self.lookup(m) {
            TypeData::Literal(value) => !seen.contains(&value.primitive()),
            _ => true,
        });

        if seen.contains(&TypeId::TRUE) && seen.contains(&TypeId::FALSE) {
            if let Some(pos) = flat
                .iter()
                .position(|&m| m == TypeId::TRUE || m == TypeId::FALSE)
            {
                flat[pos] = TypeId::BOOLEAN;
            }
            flat.retain(|&m| m != TypeId::TRUE && m != TypeId::FALSE);
        }

        let has_null = flat.contains(&TypeId::NULL);
        let has_undefined = flat.contains(&TypeId::UNDEFINED);
        flat.retain(|&m| m != TypeId::NULL && m != TypeId::UNDEFINED);
        if has_null {
            flat.push(TypeId::NULL);
        }
        if has_undefined {
            flat.push(TypeId::UNDEFINED);
        }

        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => self.intern(TypeData::Union(flat)),
        }
    }

    pub fn union2(&mut self, a: TypeId, b: TypeId) -> TypeId {
        self.union(vec![a, b])
    }

    /// `ty` without `undefined` members.
    pub fn remove_undefined(&mut self, ty: TypeId) -> TypeId {
        match self.lookup(ty) {
            TypeData::Union(members) if members.contains(&TypeId::UNDEFINED) => {
                let members: Vec<TypeId> = members
                    .iter()
                    .copied()
                    .filter(|&m| m != TypeId::UNDEFINED)
                    .collect();
                self.union(members)
            }
            _ if ty == TypeId::UNDEFINED => TypeId::NEVER,
            _ => ty,
        }
    }

    // =========================================================================
    // Intersections
    // =========================================================================

    /// Normalized intersection.
    ///
    /// Distributes over union members, reduces conflicting primitives and
    /// literals to `never`, and merges all object members into a single
    /// object type whose properties keep first-seen order.
    pub fn intersection(&mut self, members: Vec<TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::with_capacity(members.len());
        for member in members {
            match self.lookup(member) {
                TypeData::Intersection(inner) => {
                    for &m in inner {
                        if !flat.contains(&m) {
                            flat.push(m);
                        }
                    }
                }
                _ => {
                    if !flat.contains(&member) {
                        flat.push(member);
                    }
                }
            }
        }

        if flat.contains(&TypeId::NEVER) {
            return TypeId::NEVER;
        }
        if flat.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        if flat.contains(&TypeId::ERROR) {
            return TypeId::ERROR;
        }
        flat.retain(|&m| m != TypeId::UNKNOWN);
        match flat.len() {
            0 => return TypeId::UNKNOWN,
            1 => return flat[0],
            _ => {}
        }

        if let Some(distributed) = self.distribute_intersection(&flat) {
            return distributed;
        }

        let Some(flat) = self.reduce_primitives(flat) else {
            return TypeId::NEVER;
        };

        let flat = self.merge_objects(flat);
        match flat.len() {
            0 => TypeId::UNKNOWN,
            1 => flat[0],
            _ => self.intern(TypeData::Intersection(flat)),
        }
    }

    pub fn intersection2(&mut self, a: TypeId, b: TypeId) -> TypeId {
        self.intersection(vec![a, b])
    }

    /// `(A | B) & C` becomes `(A & C) | (B & C)`.
    fn distribute_intersection(&mut self, members: &[TypeId]) -> Option<TypeId> {
        let unions: Vec<Vec<TypeId>> = members.iter().map(|&m| self.union_members(m)).collect();
        if unions.iter().all(|u| u.len() == 1) {
            return None;
        }
        let total = unions
            .iter()
            .try_fold(1usize, |acc, u| acc.checked_mul(u.len()))
            .unwrap_or(usize::MAX);
        if total > MAX_DISTRIBUTION_MEMBERS {
            return Some(self.intern(TypeData::Intersection(members.to_vec())));
        }

        let mut combinations: Vec<Vec<TypeId>> = vec![Vec::new()];
        for choices in &unions {
            let mut next = Vec::with_capacity(combinations.len() * choices.len());
            for combination in &combinations {
                for &choice in choices {
                    let mut extended = combination.clone();
                    extended.push(choice);
                    next.push(extended);
                }
            }
            combinations = next;
        }
        let results: Vec<TypeId> = combinations
            .into_iter()
            .map(|combination| self.intersection(combination))
            .collect();
        Some(self.union(results))
    }

    /// Collapse primitive and literal members. Returns `None` when they
    /// cannot overlap, which makes the whole intersection `never`.
    fn reduce_primitives(&self, members: Vec<TypeId>) -> Option<Vec<TypeId>> {
        let mut unit: Option<TypeId> = None;
        let mut out = Vec::with_capacity(members.len());
        for member in members {
            if !self.is_primitive_like(member) && member != TypeId::OBJECT {
                out.push(member);
                continue;
            }
            match unit {
                None => {
                    unit = Some(member);
                    out.push(member);
                }
                Some(existing) => {
                    let narrowed = self.narrower_primitive(existing, member)?;
                    if narrowed != existing {
                        let pos = out.iter().position(|&m| m == existing)?;
                        out[pos] = narrowed;
                        unit = Some(narrowed);
                    }
                }
            }
        }
        // `null` and `undefined` have no members to share with an object.
        if matches!(unit, Some(TypeId::NULL | TypeId::UNDEFINED | TypeId::VOID))
            && out.iter().any(|&m| {
                matches!(
                    self.lookup(m),
                    TypeData::Object(_) | TypeData::Array { .. } | TypeData::Tuple { .. }
                )
            })
        {
            return None;
        }
        Some(out)
    }

    fn narrower_primitive(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        if a == b {
            return Some(a);
        }
        let primitive_of = |id: TypeId| match self.lookup(id) {
            TypeData::Literal(value) => Some(value.primitive()),
            _ => None,
        };
        match (primitive_of(a), primitive_of(b)) {
            (Some(pa), None) if pa == b => Some(a),
            (None, Some(pb)) if pb == a => Some(b),
            _ => None,
        }
    }

    /// Merge every object member into the position of the first one.
    fn merge_objects(&mut self, members: Vec<TypeId>) -> Vec<TypeId> {
        let object_count = members
            .iter()
            .filter(|&&m| matches!(self.lookup(m), TypeData::Object(_)))
            .count();
        if object_count < 2 {
            return members;
        }

        let mut properties: IndexMap<String, PropertyInfo> = IndexMap::new();
        let mut merged = ObjectShape::default();
        let mut out = Vec::with_capacity(members.len());
        let mut slot = None;
        for member in members {
            let TypeData::Object(shape) = self.lookup(member).clone() else {
                out.push(member);
                continue;
            };
            if slot.is_none() {
                slot = Some(out.len());
                out.push(member);
            }
            for prop in shape.properties {
                match properties.get_mut(&prop.name) {
                    Some(existing) => {
                        existing.ty = self.intersection2(existing.ty, prop.ty);
                        existing.optional &= prop.optional;
                        existing.readonly &= prop.readonly;
                        existing.is_method &= prop.is_method;
                    }
                    None => {
                        properties.insert(prop.name.clone(), prop);
                    }
                }
            }
            for index in shape.index_signatures {
                match merged
                    .index_signatures
                    .iter()
                    .position(|i| i.key_type == index.key_type)
                {
                    Some(pos) => {
                        let existing = merged.index_signatures[pos].value_type;
                        merged.index_signatures[pos].value_type =
                            self.intersection2(existing, index.value_type);
                    }
                    None => merged.index_signatures.push(index),
                }
            }
            merged.call_signatures.extend(shape.call_signatures);
            merged.construct_signatures.extend(shape.construct_signatures);
        }
        merged.properties = properties.into_values().collect();
        if let Some(slot) = slot {
            out[slot] = self.object(merged);
        }
        out
    }
}

#[cfg(test)]
#[path = "tests/intern_tests.rs"]
mod intern_tests;
