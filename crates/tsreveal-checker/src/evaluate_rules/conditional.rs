//! `C extends E ? T : F`

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tsreveal_parser::ast::{ConditionalTypeNode, TupleElement, TypeMember, TypeMemberKind, TypeNode, TypeNodeKind};

use crate::checker::{TypeChecker, TypeEnv};
use crate::def::ScopeId;
use crate::types::*;

impl TypeChecker<'_> {
    pub(crate) fn evaluate_conditional(
        &mut self,
        node: &ConditionalTypeNode,
        scope: ScopeId,
        env: &TypeEnv,
    ) -> TypeId {
        let check = self.type_from_node(&node.check_type, scope, env);

        // A naked type parameter in check position distributes over unions.
        if let Some(param) = naked_type_parameter(&node.check_type, env) {
            if check == TypeId::NEVER {
                return TypeId::NEVER;
            }
            let members = match self.interner.lookup(check) {
                TypeData::Union(members) => members.clone(),
                _ if check == TypeId::BOOLEAN => vec![TypeId::FALSE, TypeId::TRUE],
                _ => Vec::new(),
            };
            if !members.is_empty() {
                let results = members
                    .iter()
                    .map(|&member| {
                        let inner = env.with(param, member);
                        self.resolve_conditional(node, scope, &inner, member)
                    })
                    .collect();
                return self.interner.union(results);
            }
        }
        self.resolve_conditional(node, scope, env, check)
    }

    fn resolve_conditional(
        &mut self,
        node: &ConditionalTypeNode,
        scope: ScopeId,
        env: &TypeEnv,
        check: TypeId,
    ) -> TypeId {
        let mut infer_names: SmallVec<[&str; 2]> = SmallVec::new();
        collect_infer_names(&node.extends_type, &mut infer_names);

        let mut extends_env = env.clone();
        let mut placeholders: SmallVec<[TypeId; 2]> = SmallVec::new();
        for &name in &infer_names {
            let placeholder = self.interner.type_param(TypeParamInfo {
                name: name.to_string(),
                constraint: None,
                default: None,
            });
            extends_env.bind(name, placeholder);
            placeholders.push(placeholder);
        }
        let extends = self.type_from_node(&node.extends_type, scope, &extends_env);

        if self.interner.contains_type_parameters(check)
            || self
                .interner
                .contains_type_parameters_except(extends, &placeholders)
        {
            let true_type = self.type_from_node(&node.true_type, scope, &extends_env);
            let false_type = self.type_from_node(&node.false_type, scope, env);
            return self.interner.conditional(ConditionalInfo {
                check_type: check,
                extends_type: extends,
                true_type,
                false_type,
            });
        }

        let mut true_env = env.clone();
        let extends = if infer_names.is_empty() {
            extends
        } else {
            let mut inferences: FxHashMap<TypeId, Vec<TypeId>> =
                placeholders.iter().map(|&p| (p, Vec::new())).collect();
            self.infer_from_types(check, extends, &mut inferences, 0);
            for (&name, placeholder) in infer_names.iter().zip(&placeholders) {
                let candidates = inferences.remove(placeholder).unwrap_or_default();
                let inferred = if candidates.is_empty() {
                    TypeId::UNKNOWN
                } else {
                    self.interner.union(candidates)
                };
                true_env.bind(name, inferred);
            }
            self.type_from_node(&node.extends_type, scope, &true_env)
        };

        if matches!(check, TypeId::ANY | TypeId::ERROR)
            && !matches!(extends, TypeId::ANY | TypeId::UNKNOWN)
        {
            let true_type = self.type_from_node(&node.true_type, scope, &true_env);
            let false_type = self.type_from_node(&node.false_type, scope, env);
            return self.interner.union2(true_type, false_type);
        }

        if self.is_assignable(check, extends) {
            self.type_from_node(&node.true_type, scope, &true_env)
        } else {
            self.type_from_node(&node.false_type, scope, env)
        }
    }
}

/// `T` when the check type is written as a bare type parameter.
fn naked_type_parameter<'n>(check: &'n TypeNode, env: &TypeEnv) -> Option<&'n str> {
    match &check.kind {
        TypeNodeKind::Reference {
            name,
            type_arguments,
        } if name.segments.len() == 1 && type_arguments.is_empty() => {
            let name = name.simple_name();
            env.get(name).map(|_| name)
        }
        _ => None,
    }
}

/// Names declared by `infer X` in an extends clause, outside nested
/// conditional types which own their own `infer` declarations.
fn collect_infer_names<'n>(node: &'n TypeNode, out: &mut SmallVec<[&'n str; 2]>) {
    match &node.kind {
        TypeNodeKind::Infer(param) => {
            if !out.contains(&param.name.text.as_str()) {
                out.push(&param.name.text);
            }
        }
        TypeNodeKind::Reference { type_arguments, .. } => {
            type_arguments.iter().for_each(|t| collect_infer_names(t, out));
        }
        TypeNodeKind::TypeLiteral(members) => collect_from_members(members, out),
        TypeNodeKind::Array(inner) | TypeNodeKind::Parenthesized(inner) => collect_infer_names(inner, out),
        TypeNodeKind::Tuple(elements) => elements
            .iter()
            .for_each(|TupleElement { ty, .. }| collect_infer_names(ty, out)),
        TypeNodeKind::Union(types) | TypeNodeKind::Intersection(types) => {
            types.iter().for_each(|t| collect_infer_names(t, out));
        }
        TypeNodeKind::Function(function) => {
            for param in &function.signature.parameters {
                if let Some(ty) = &param.ty {
                    collect_infer_names(ty, out);
                }
            }
            if let Some(ret) = &function.signature.return_type {
                collect_infer_names(ret, out);
            }
        }
        TypeNodeKind::TypeOperator { ty, .. } => collect_infer_names(ty, out),
        TypeNodeKind::IndexedAccess { object, index } => {
            collect_infer_names(object, out);
            collect_infer_names(index, out);
        }
        TypeNodeKind::Mapped(mapped) => {
            if let Some(ty) = &mapped.ty {
                collect_infer_names(ty, out);
            }
        }
        _ => {}
    }
}

fn collect_from_members<'n>(members: &'n [TypeMember], out: &mut SmallVec<[&'n str; 2]>) {
    for member in members {
        match &member.kind {
            TypeMemberKind::Property { ty: Some(ty), .. } | TypeMemberKind::Index { ty: Some(ty), .. } => {
                collect_infer_names(ty, out);
            }
            TypeMemberKind::Method { signature, .. }
            | TypeMemberKind::Call(signature)
            | TypeMemberKind::Construct(signature) => {
                for param in &signature.parameters {
                    if let Some(ty) = &param.ty {
                        collect_infer_names(ty, out);
                    }
                }
                if let Some(ret) = &signature.return_type {
                    collect_infer_names(ret, out);
                }
            }
            _ => {}
        }
    }
}
