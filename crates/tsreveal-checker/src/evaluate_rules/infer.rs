//! Inference of `infer X` placeholders from a structural match.

use rustc_hash::FxHashMap;

use crate::checker::TypeChecker;
use crate::format::is_identifier_name;
use crate::types::*;

/// Nesting past which inference stops looking deeper.
const MAX_INFERENCE_DEPTH: u32 = 32;

impl TypeChecker<'_> {
    /// Walk `source` and `target` in parallel, recording every source type
    /// found where `target` has a placeholder from `inferences`.
    pub(crate) fn infer_from_types(
        &mut self,
        source: TypeId,
        target: TypeId,
        inferences: &mut FxHashMap<TypeId, Vec<TypeId>>,
        depth: u32,
    ) {
        if depth > MAX_INFERENCE_DEPTH {
            return;
        }
        if let Some(candidates) = inferences.get_mut(&target) {
            if !candidates.contains(&source) {
                candidates.push(source);
            }
            return;
        }
        let depth = depth + 1;
        let source_data = self.interner.lookup(source).clone();
        let target_data = self.interner.lookup(target).clone();
        match (source_data, target_data) {
            (TypeData::Union(sources), _) => {
                for s in sources {
                    self.infer_from_types(s, target, inferences, depth);
                }
            }
            (_, TypeData::Union(targets)) | (_, TypeData::Intersection(targets)) => {
                for t in targets {
                    self.infer_from_types(source, t, inferences, depth);
                }
            }
            (TypeData::Array { element: s, .. }, TypeData::Array { element: t, .. }) => {
                self.infer_from_types(s, t, inferences, depth);
            }
            (TypeData::Tuple { elements, .. }, TypeData::Array { element: t, .. }) => {
                for element in elements {
                    let s = if element.rest {
                        self.rest_element_type(element.ty)
                    } else {
                        element.ty
                    };
                    self.infer_from_types(s, t, inferences, depth);
                }
            }
            (TypeData::Tuple { elements: sources, .. }, TypeData::Tuple { elements: targets, .. }) => {
                self.infer_from_tuple(&sources, &targets, inferences, depth);
            }
            (TypeData::Object(s), TypeData::Object(t)) => {
                for prop in &t.properties {
                    if let Some(sp) = s.property(&prop.name) {
                        self.infer_from_types(sp.ty, prop.ty, inferences, depth);
                    }
                }
                for index in &t.index_signatures {
                    if let Some(si) = s.index_signatures.iter().find(|i| i.key_type == index.key_type) {
                        self.infer_from_types(si.value_type, index.value_type, inferences, depth);
                    }
                }
                if let (Some(ss), Some(ts)) = (s.call_signatures.last(), t.call_signatures.first()) {
                    self.infer_from_signature(ss, ts, inferences, depth);
                }
                if let (Some(ss), Some(ts)) = (s.construct_signatures.last(), t.construct_signatures.first()) {
                    self.infer_from_signature(ss, ts, inferences, depth);
                }
            }
            (
                TypeData::Reference { def: sd, args: sa },
                TypeData::Reference { def: td, args: ta },
            ) if sd == td => {
                let sources = self.interner.type_list(sa);
                let targets = self.interner.type_list(ta);
                for (&s, &t) in sources.iter().zip(targets.iter()) {
                    self.infer_from_types(s, t, inferences, depth);
                }
            }
            (TypeData::Reference { def, args }, TypeData::Object(_)) => {
                if let Some(expanded) = self.expand_reference(def, args) {
                    self.infer_from_types(expanded, target, inferences, depth);
                }
            }
            _ => {}
        }
    }

    fn infer_from_tuple(
        &mut self,
        sources: &[TupleElementInfo],
        targets: &[TupleElementInfo],
        inferences: &mut FxHashMap<TypeId, Vec<TypeId>>,
        depth: u32,
    ) {
        for (i, target) in targets.iter().enumerate() {
            if target.rest {
                // `[...infer R]` collects the remaining source elements.
                let rest = sources.get(i..).unwrap_or_default().to_vec();
                let rest = self.interner.tuple(rest, false);
                self.infer_from_types(rest, target.ty, inferences, depth);
                return;
            }
            if let Some(source) = sources.get(i) {
                self.infer_from_types(source.ty, target.ty, inferences, depth);
            }
        }
    }

    fn infer_from_signature(
        &mut self,
        source: &SignatureInfo,
        target: &SignatureInfo,
        inferences: &mut FxHashMap<TypeId, Vec<TypeId>>,
        depth: u32,
    ) {
        for (i, param) in target.params.iter().enumerate() {
            if param.rest {
                let rest = self.parameters_tuple(source.params.get(i..).unwrap_or_default());
                self.infer_from_types(rest, param.ty, inferences, depth);
                break;
            }
            if let Some(sp) = source.params.get(i) {
                self.infer_from_types(sp.ty, param.ty, inferences, depth);
            }
        }
        self.infer_from_types(source.return_type, target.return_type, inferences, depth);
    }

    /// Parameter list as a labeled tuple, e.g. `[a: string, b?: number]`.
    fn parameters_tuple(&mut self, params: &[ParamInfo]) -> TypeId {
        let elements = params
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let ty = if p.optional && !p.rest {
                    self.interner.union2(p.ty, TypeId::UNDEFINED)
                } else {
                    p.ty
                };
                TupleElementInfo {
                    // Destructured parameters have no usable label.
                    name: Some(if is_identifier_name(&p.name) {
                        p.name.clone()
                    } else {
                        format!("__{i}")
                    }),
                    ty,
                    optional: p.optional,
                    rest: p.rest,
                }
            })
            .collect();
        self.interner.tuple(elements, false)
    }
}
