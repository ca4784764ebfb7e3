//! `{ [P in K as N]: X }`
//!
//! A mapped type over `keyof S` is homomorphic: it iterates the members of
//! `S` and copies their `readonly` and `?` modifiers unless the mapped type
//! overrides them. Arrays and tuples map to arrays and tuples.

use indexmap::IndexMap;
use tsreveal_parser::ast::{self, MappedTypeNode, TypeNode, TypeNodeKind};
use tsreveal_parser::scanner::format_js_number;

use crate::checker::{TypeChecker, TypeEnv};
use crate::def::ScopeId;
use crate::types::*;

/// Where a key being mapped came from.
enum MappedKey {
    Property { name: String, kind: PropertyKeyKind, key_type: TypeId },
    Index { key_type: TypeId },
}

impl TypeChecker<'_> {
    pub(crate) fn evaluate_mapped(&mut self, node: &MappedTypeNode, scope: ScopeId, env: &TypeEnv) -> TypeId {
        let keyof_operand = keyof_operand(&node.constraint);
        let mut homomorphic_source = keyof_operand.map(|operand| self.type_from_node(operand, scope, env));

        if let Some(source) = homomorphic_source {
            match self.interner.lookup(source).clone() {
                // Homomorphic mapped types distribute over a union source.
                TypeData::Union(members) => {
                    if let Some(param) = keyof_operand.and_then(naked_reference)
                        && env.get(param).is_some()
                    {
                        let results = members
                            .iter()
                            .map(|&m| self.evaluate_mapped(node, scope, &env.with(param, m)))
                            .collect();
                        return self.interner.union(results);
                    }
                }
                TypeData::Reference { def, args } => {
                    if let Some(expanded) = self.expand_reference(def, args) {
                        homomorphic_source = Some(expanded);
                    }
                }
                _ => {}
            }
        }
        let constraint = match homomorphic_source {
            Some(source) => self.evaluate_keyof(source),
            None => self.type_from_node(&node.constraint, scope, env),
        };
        // `[P in K]` with `K extends keyof S` still copies modifiers from `S`.
        let modifiers_source = homomorphic_source
            .or_else(|| naked_reference(&node.constraint).and_then(|name| env.modifiers_source(name)));

        if self.interner.contains_type_parameters(constraint) {
            return self.deferred_mapped(node, constraint, scope, env);
        }

        if let Some(source) = homomorphic_source {
            match self.interner.lookup(source).clone() {
                TypeData::Array { readonly, .. } => {
                    let ty = self.mapped_template(node, TypeId::NUMBER, scope, env);
                    let ty = self.apply_optional_modifier(node, ty, false);
                    let readonly = apply_modifier(node.readonly.map(convert), readonly);
                    return self.interner.array(ty, readonly);
                }
                TypeData::Tuple { elements, readonly } => {
                    let mapped = elements
                        .iter()
                        .enumerate()
                        .map(|(i, element)| {
                            let key = if element.rest {
                                TypeId::NUMBER
                            } else {
                                self.interner.literal_string(i.to_string())
                            };
                            let ty = self.mapped_template(node, key, scope, env);
                            let ty = match node.optional {
                                Some(ast::MappedModifier::Remove) => self.interner.remove_undefined(ty),
                                _ => ty,
                            };
                            let ty = if element.rest { self.interner.array(ty, false) } else { ty };
                            TupleElementInfo {
                                name: element.name.clone(),
                                ty,
                                optional: !element.rest
                                    && apply_modifier(node.optional.map(convert), element.optional),
                                rest: element.rest,
                            }
                        })
                        .collect();
                    let readonly = apply_modifier(node.readonly.map(convert), readonly);
                    return self.interner.tuple(mapped, readonly);
                }
                TypeData::Intrinsic(IntrinsicKind::Any) | TypeData::Intrinsic(IntrinsicKind::Error) => {}
                _ if self.interner.is_primitive_like(source) => return source,
                _ => {}
            }
        }

        let keys = self.mapped_keys(homomorphic_source, constraint);
        let source_shape = match modifiers_source.map(|s| self.interner.lookup(s).clone()) {
            Some(TypeData::Object(shape)) => Some(shape),
            _ => None,
        };

        let mut properties: IndexMap<String, PropertyInfo> = IndexMap::new();
        let mut shape = ObjectShape::default();
        for key in keys {
            match key {
                MappedKey::Property { name, kind, key_type } => {
                    let source_prop = source_shape.as_ref().and_then(|s| s.property(&name)).cloned();
                    let names = match &node.name_type {
                        Some(name_type) => self.remapped_keys(node, name_type, key_type, scope, env),
                        None => vec![MappedKey::Property { name, kind, key_type }],
                    };
                    let ty = self.mapped_template(node, key_type, scope, env);
                    let source_optional = source_prop.as_ref().is_some_and(|p| p.optional);
                    let optional = apply_modifier(node.optional.map(convert), source_optional);
                    let readonly = apply_modifier(
                        node.readonly.map(convert),
                        source_prop.as_ref().is_some_and(|p| p.readonly),
                    );
                    let ty = self.apply_optional_modifier(node, ty, source_optional);
                    for remapped in names {
                        match remapped {
                            MappedKey::Property { name, kind, .. } => {
                                properties.entry(name.clone()).or_insert(PropertyInfo {
                                    name,
                                    key_kind: kind,
                                    ty,
                                    optional,
                                    readonly,
                                    is_method: false,
                                });
                            }
                            MappedKey::Index { key_type } => {
                                self.push_mapped_index(&mut shape, key_type, ty, node);
                            }
                        }
                    }
                }
                MappedKey::Index { key_type } => {
                    let ty = self.mapped_template(node, key_type, scope, env);
                    let ty = self.apply_optional_modifier(node, ty, false);
                    self.push_mapped_index(&mut shape, key_type, ty, node);
                }
            }
        }
        shape.properties = properties.into_values().collect();
        self.interner.object(shape)
    }

    fn deferred_mapped(
        &mut self,
        node: &MappedTypeNode,
        constraint: TypeId,
        scope: ScopeId,
        env: &TypeEnv,
    ) -> TypeId {
        let param = self.interner.type_param(TypeParamInfo {
            name: node.type_parameter.text.clone(),
            constraint: Some(constraint),
            default: None,
        });
        let inner = env.with(node.type_parameter.text.clone(), param);
        let name_type = node
            .name_type
            .as_ref()
            .map(|n| self.type_from_node(n, scope, &inner));
        let template = match &node.ty {
            Some(ty) => self.type_from_node(ty, scope, &inner),
            None => TypeId::ANY,
        };
        self.interner.mapped(MappedInfo {
            type_param: TypeParamInfo {
                name: node.type_parameter.text.clone(),
                constraint: Some(constraint),
                default: None,
            },
            constraint,
            name_type,
            template,
            readonly: node.readonly.map(convert),
            optional: node.optional.map(convert),
        })
    }

    /// Keys to iterate: the members of a homomorphic source, or the members
    /// of the constraint.
    fn mapped_keys(&mut self, source: Option<TypeId>, constraint: TypeId) -> Vec<MappedKey> {
        if let Some(source) = source
            && let TypeData::Object(shape) = self.interner.lookup(source).clone()
        {
            let mut keys = Vec::new();
            for prop in &shape.properties {
                let key_type = match prop.key_kind {
                    PropertyKeyKind::Numeric => match prop.name.parse::<f64>() {
                        Ok(value) => self.interner.literal_number(value),
                        Err(_) => self.interner.literal_string(prop.name.clone()),
                    },
                    PropertyKeyKind::Named => self.interner.literal_string(prop.name.clone()),
                    PropertyKeyKind::Computed => TypeId::SYMBOL,
                };
                keys.push(MappedKey::Property {
                    name: prop.name.clone(),
                    kind: prop.key_kind,
                    key_type,
                });
            }
            keys.extend(shape.index_signatures.iter().map(|i| MappedKey::Index {
                key_type: i.key_type,
            }));
            return keys;
        }
        if let Some(TypeId::ANY | TypeId::ERROR) = source {
            return vec![MappedKey::Index {
                key_type: TypeId::STRING,
            }];
        }
        self.interner
            .union_members(constraint)
            .into_iter()
            .filter_map(|key| self.key_from_type(key))
            .collect()
    }

    fn key_from_type(&self, key: TypeId) -> Option<MappedKey> {
        match self.interner.lookup(key) {
            TypeData::Literal(LiteralValue::String(name)) => Some(MappedKey::Property {
                name: name.clone(),
                kind: PropertyKeyKind::Named,
                key_type: key,
            }),
            TypeData::Literal(value @ LiteralValue::Number(_)) => {
                value.as_number().map(|n| MappedKey::Property {
                    name: format_js_number(n),
                    kind: PropertyKeyKind::Numeric,
                    key_type: key,
                })
            }
            _ => match key {
                TypeId::STRING | TypeId::NUMBER | TypeId::SYMBOL => {
                    Some(MappedKey::Index { key_type: key })
                }
                TypeId::ANY => Some(MappedKey::Index {
                    key_type: TypeId::STRING,
                }),
                _ => None,
            },
        }
    }

    /// Keys produced by an `as` clause for one source key.
    fn remapped_keys(
        &mut self,
        node: &MappedTypeNode,
        name_type: &TypeNode,
        key_type: TypeId,
        scope: ScopeId,
        env: &TypeEnv,
    ) -> Vec<MappedKey> {
        let inner = env.with(node.type_parameter.text.clone(), key_type);
        let remapped = self.type_from_node(name_type, scope, &inner);
        self.interner
            .union_members(remapped)
            .into_iter()
            .filter_map(|key| self.key_from_type(key))
            .collect()
    }

    fn mapped_template(&mut self, node: &MappedTypeNode, key: TypeId, scope: ScopeId, env: &TypeEnv) -> TypeId {
        let inner = env.with(node.type_parameter.text.clone(), key);
        match &node.ty {
            Some(ty) => self.type_from_node(ty, scope, &inner),
            None => TypeId::ANY,
        }
    }

    /// Optional members read as `T | undefined`; `-?` strips it again.
    fn apply_optional_modifier(&mut self, node: &MappedTypeNode, ty: TypeId, source_optional: bool) -> TypeId {
        match node.optional {
            Some(ast::MappedModifier::Add) => self.interner.union2(ty, TypeId::UNDEFINED),
            Some(ast::MappedModifier::Remove) if source_optional => self.interner.remove_undefined(ty),
            _ => ty,
        }
    }

    fn push_mapped_index(&mut self, shape: &mut ObjectShape, key_type: TypeId, value_type: TypeId, node: &MappedTypeNode) {
        if let Some(existing) = shape.index_signatures.iter_mut().find(|i| i.key_type == key_type) {
            existing.value_type = self.interner.union2(existing.value_type, value_type);
            return;
        }
        shape.index_signatures.push(IndexInfo {
            parameter_name: "x".to_string(),
            key_type,
            value_type,
            readonly: matches!(node.readonly, Some(ast::MappedModifier::Add)),
        });
    }
}

/// `T` in a constraint written as `keyof T`.
fn keyof_operand(constraint: &TypeNode) -> Option<&TypeNode> {
    match &constraint.kind {
        TypeNodeKind::TypeOperator {
            operator: ast::TypeOperator::Keyof,
            ty,
        } => Some(ty),
        TypeNodeKind::Parenthesized(inner) => keyof_operand(inner),
        _ => None,
    }
}

/// Name of a plain single-segment reference such as `T`.
fn naked_reference(node: &TypeNode) -> Option<&str> {
    match &node.kind {
        TypeNodeKind::Reference { name, type_arguments }
            if name.segments.len() == 1 && type_arguments.is_empty() =>
        {
            Some(name.simple_name())
        }
        TypeNodeKind::Parenthesized(inner) => naked_reference(inner),
        _ => None,
    }
}

fn convert(modifier: ast::MappedModifier) -> MappedModifier {
    match modifier {
        ast::MappedModifier::Add => MappedModifier::Add,
        ast::MappedModifier::Remove => MappedModifier::Remove,
    }
}

fn apply_modifier(modifier: Option<MappedModifier>, inherited: bool) -> bool {
    match modifier {
        Some(MappedModifier::Add) => true,
        Some(MappedModifier::Remove) => false,
        None => inherited,
    }
}
