//! Syntax node to type evaluation.

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::warn;
use tsreveal_parser::ast::{
    EntityName, KeywordType, LiteralType, PropertyName, PropertyNameKind, Signature, TupleElement,
    TypeMember, TypeMemberKind, TypeNode, TypeNodeKind, TypeOperator,
};
use tsreveal_parser::scanner::format_js_number;

use crate::checker::{TypeChecker, TypeEnv};
use crate::def::ScopeId;
use crate::types::*;

impl TypeChecker<'_> {
    /// Evaluate a type node with the bindings in `env`.
    pub(crate) fn type_from_node(&mut self, node: &TypeNode, scope: ScopeId, env: &TypeEnv) -> TypeId {
        match &node.kind {
            TypeNodeKind::Keyword(keyword) => keyword_type(*keyword),
            TypeNodeKind::Literal(literal) => match literal {
                LiteralType::String(value) => self.interner.literal_string(value.clone()),
                LiteralType::Number(value) => self.interner.literal_number(*value),
                LiteralType::BigInt(value) => self.interner.literal(LiteralValue::BigInt(value.clone())),
                LiteralType::Boolean(true) => TypeId::TRUE,
                LiteralType::Boolean(false) => TypeId::FALSE,
            },
            TypeNodeKind::TemplateLiteral { cooked } => match cooked {
                Some(text) => self.interner.literal_string(text.clone()),
                None => TypeId::STRING,
            },
            TypeNodeKind::This => TypeId::THIS,
            TypeNodeKind::Reference {
                name,
                type_arguments,
            } => self.type_from_reference(name, type_arguments, scope, env),
            TypeNodeKind::TypeLiteral(members) => {
                let mut shape = ObjectShape::default();
                self.add_members(&mut shape, members, scope, env);
                self.interner.object(shape)
            }
            TypeNodeKind::Array(element) => {
                let element = self.type_from_node(element, scope, env);
                self.interner.array(element, false)
            }
            TypeNodeKind::Tuple(elements) => {
                let elements = self.tuple_elements(elements, scope, env);
                self.interner.tuple(elements, false)
            }
            TypeNodeKind::Union(types) => {
                let members = types.iter().map(|t| self.type_from_node(t, scope, env)).collect();
                self.interner.union(members)
            }
            TypeNodeKind::Intersection(types) => {
                let members = types.iter().map(|t| self.type_from_node(t, scope, env)).collect();
                self.interner.intersection(members)
            }
            TypeNodeKind::Function(function) => {
                let signature = self.signature_from_node(&function.signature, scope, env);
                self.interner.function(signature, function.is_constructor)
            }
            TypeNodeKind::Parenthesized(inner) => self.type_from_node(inner, scope, env),
            TypeNodeKind::TypeOperator { operator, ty } => match operator {
                TypeOperator::Keyof => {
                    let operand = self.type_from_node(ty, scope, env);
                    self.evaluate_keyof(operand)
                }
                TypeOperator::Readonly => {
                    let operand = self.type_from_node(ty, scope, env);
                    match self.interner.lookup(operand).clone() {
                        TypeData::Array { element, .. } => self.interner.array(element, true),
                        TypeData::Tuple { elements, .. } => self.interner.tuple(elements, true),
                        _ => operand,
                    }
                }
                TypeOperator::Unique => TypeId::SYMBOL,
            },
            TypeNodeKind::IndexedAccess { object, index } => {
                let object = self.type_from_node(object, scope, env);
                let index = self.type_from_node(index, scope, env);
                self.evaluate_indexed_access(object, index)
            }
            TypeNodeKind::Mapped(mapped) => self.evaluate_mapped(mapped, scope, env),
            TypeNodeKind::Conditional(conditional) => self.evaluate_conditional(conditional, scope, env),
            // Bound by the enclosing conditional; a stray `infer` is an error.
            TypeNodeKind::Infer(param) => env.get(&param.name.text).unwrap_or(TypeId::ERROR),
            TypeNodeKind::Predicate { asserts: true, .. } => TypeId::VOID,
            TypeNodeKind::Predicate { asserts: false, .. } => TypeId::BOOLEAN,
            TypeNodeKind::TypeQuery(_) | TypeNodeKind::Import | TypeNodeKind::Missing => TypeId::ERROR,
        }
    }

    fn type_from_reference(
        &mut self,
        name: &EntityName,
        type_arguments: &[TypeNode],
        scope: ScopeId,
        env: &TypeEnv,
    ) -> TypeId {
        if name.segments.len() == 1
            && let Some(bound) = env.get(name.simple_name())
        {
            return bound;
        }
        let segments: SmallVec<[&str; 2]> = name.segments.iter().map(|s| s.text.as_str()).collect();
        let program = self.program();
        let Some(def) = program.definitions().resolve_qualified(scope, &segments) else {
            warn!(name = %name.text(), "cannot resolve type reference");
            return TypeId::ERROR;
        };
        let args = type_arguments
            .iter()
            .map(|arg| self.type_from_node(arg, scope, env))
            .collect();
        self.instantiate_def(def, args)
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Append object members to `shape`. The first declaration of a property
    /// wins; repeated method declarations become overloads.
    pub(crate) fn add_members(
        &mut self,
        shape: &mut ObjectShape,
        members: &[TypeMember],
        scope: ScopeId,
        env: &TypeEnv,
    ) {
        let mut properties: IndexMap<String, PropertyInfo> = shape
            .properties
            .drain(..)
            .map(|p| (p.name.clone(), p))
            .collect();
        for member in members {
            match &member.kind {
                TypeMemberKind::Property {
                    name,
                    optional,
                    readonly,
                    ty,
                } => {
                    let ty = match ty {
                        Some(ty) => self.type_from_node(ty, scope, env),
                        None => TypeId::ANY,
                    };
                    // Optional properties read as possibly `undefined`.
                    let ty = if *optional {
                        self.interner.union2(ty, TypeId::UNDEFINED)
                    } else {
                        ty
                    };
                    let (key, key_kind) = property_key(name);
                    properties.entry(key.clone()).or_insert(PropertyInfo {
                        name: key,
                        key_kind,
                        ty,
                        optional: *optional,
                        readonly: *readonly,
                        is_method: false,
                    });
                }
                TypeMemberKind::Method {
                    name,
                    optional,
                    signature,
                } => {
                    let signature = self.signature_from_node(signature, scope, env);
                    let (key, key_kind) = property_key(name);
                    match properties.get_mut(&key) {
                        Some(existing) if existing.is_method => {
                            let mut overloads = match self.interner.lookup(existing.ty) {
                                TypeData::Object(shape) => shape.clone(),
                                _ => ObjectShape::default(),
                            };
                            overloads.call_signatures.push(signature);
                            existing.ty = self.interner.object(overloads);
                        }
                        Some(_) => {}
                        None => {
                            let ty = self.interner.function(signature, false);
                            properties.insert(
                                key.clone(),
                                PropertyInfo {
                                    name: key,
                                    key_kind,
                                    ty,
                                    optional: *optional,
                                    readonly: false,
                                    is_method: true,
                                },
                            );
                        }
                    }
                }
                TypeMemberKind::Call(signature) => {
                    let signature = self.signature_from_node(signature, scope, env);
                    shape.call_signatures.push(signature);
                }
                TypeMemberKind::Construct(signature) => {
                    let signature = self.signature_from_node(signature, scope, env);
                    shape.construct_signatures.push(signature);
                }
                TypeMemberKind::Index {
                    readonly,
                    parameter,
                    key_type,
                    ty,
                } => {
                    let key_type = self.type_from_node(key_type, scope, env);
                    let value_type = match ty {
                        Some(ty) => self.type_from_node(ty, scope, env),
                        None => TypeId::ANY,
                    };
                    for key in self.interner.union_members(key_type) {
                        if shape.index_signatures.iter().any(|i| i.key_type == key) {
                            continue;
                        }
                        shape.index_signatures.push(IndexInfo {
                            parameter_name: parameter.text.clone(),
                            key_type: key,
                            value_type,
                            readonly: *readonly,
                        });
                    }
                }
            }
        }
        shape.properties = properties.into_values().collect();
    }

    pub(crate) fn signature_from_node(
        &mut self,
        signature: &Signature,
        scope: ScopeId,
        env: &TypeEnv,
    ) -> SignatureInfo {
        let env = self.bind_type_parameters(&signature.type_parameters, scope, env);
        let type_params = self.type_param_infos(&env, &signature.type_parameters);
        let params = signature
            .parameters
            .iter()
            .map(|param| {
                let ty = match &param.ty {
                    Some(ty) => self.type_from_node(ty, scope, &env),
                    None if param.rest => self.interner.array(TypeId::ANY, false),
                    None => TypeId::ANY,
                };
                ParamInfo {
                    name: param.name.clone(),
                    ty,
                    optional: param.optional,
                    rest: param.rest,
                }
            })
            .collect();
        let return_type = match &signature.return_type {
            Some(ty) => self.type_from_node(ty, scope, &env),
            None => TypeId::ANY,
        };
        SignatureInfo {
            type_params,
            params,
            return_type,
        }
    }

    /// Tuple elements; a rest element of tuple type is spread in place.
    fn tuple_elements(
        &mut self,
        elements: &[TupleElement],
        scope: ScopeId,
        env: &TypeEnv,
    ) -> Vec<TupleElementInfo> {
        let mut out = Vec::with_capacity(elements.len());
        for element in elements {
            let ty = self.type_from_node(&element.ty, scope, env);
            if element.rest
                && let TypeData::Tuple { elements: spread, .. } = self.interner.lookup(ty)
            {
                out.extend(spread.iter().cloned());
                continue;
            }
            out.push(TupleElementInfo {
                name: element.name.clone(),
                ty,
                optional: element.optional,
                rest: element.rest,
            });
        }
        out
    }
}

pub(crate) fn keyword_type(keyword: KeywordType) -> TypeId {
    match keyword {
        KeywordType::Any => TypeId::ANY,
        KeywordType::Unknown => TypeId::UNKNOWN,
        KeywordType::Never => TypeId::NEVER,
        KeywordType::Void => TypeId::VOID,
        KeywordType::Undefined => TypeId::UNDEFINED,
        KeywordType::Null => TypeId::NULL,
        KeywordType::Boolean => TypeId::BOOLEAN,
        KeywordType::Number => TypeId::NUMBER,
        KeywordType::String => TypeId::STRING,
        KeywordType::BigInt => TypeId::BIGINT,
        KeywordType::Symbol => TypeId::SYMBOL,
        KeywordType::Object => TypeId::OBJECT,
    }
}

fn property_key(name: &PropertyName) -> (String, PropertyKeyKind) {
    match name.kind {
        PropertyNameKind::Identifier | PropertyNameKind::String => {
            (name.text.clone(), PropertyKeyKind::Named)
        }
        PropertyNameKind::Number => match name.text.parse::<f64>() {
            Ok(value) => (format_js_number(value), PropertyKeyKind::Numeric),
            Err(_) => (name.text.clone(), PropertyKeyKind::Numeric),
        },
        PropertyNameKind::Computed => (name.text.clone(), PropertyKeyKind::Computed),
    }
}
