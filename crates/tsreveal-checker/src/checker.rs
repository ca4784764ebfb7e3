//! The type checker: alias expansion state and public queries.
//!
//! Types are computed by evaluating syntax nodes against a [`TypeEnv`] that
//! binds type parameter names. Applying an alias or interface evaluates its
//! declaration again with the arguments bound, so a fully concrete alias
//! always expands to a fully concrete structure. Only genuinely generic
//! constructs stay deferred.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};
use tsreveal_parser::ast::{InterfaceDeclaration, TypeAliasDeclaration, TypeNodeKind, TypeParameter};

use crate::def::{DefId, DefKind, ScopeId};
use crate::format::{TypeFormatFlags, TypePrinter};
use crate::intern::TypeInterner;
use crate::program::Program;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::*;

/// One alias or interface application: the definition plus its arguments.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExpansionKey {
    pub def: DefId,
    pub args: TypeListId,
}

#[derive(Clone, Debug)]
struct Binding {
    name: String,
    ty: TypeId,
    /// For a parameter declared as `K extends keyof T`, the type `T`. A
    /// mapped type over `K` copies property modifiers from it.
    modifiers_source: Option<TypeId>,
}

/// Type parameter bindings visible while evaluating a node.
#[derive(Clone, Debug, Default)]
pub struct TypeEnv {
    bindings: SmallVec<[Binding; 4]>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<TypeId> {
        self.binding(name).map(|b| b.ty)
    }

    pub(crate) fn modifiers_source(&self, name: &str) -> Option<TypeId> {
        self.binding(name).and_then(|b| b.modifiers_source)
    }

    fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().rev().find(|b| b.name == name)
    }

    pub fn bind(&mut self, name: impl Into<String>, ty: TypeId) {
        self.bindings.push(Binding {
            name: name.into(),
            ty,
            modifiers_source: None,
        });
    }

    pub fn with(&self, name: impl Into<String>, ty: TypeId) -> TypeEnv {
        let mut env = self.clone();
        env.bind(name, ty);
        env
    }
}

pub struct TypeChecker<'p> {
    program: &'p Program,
    pub(crate) interner: TypeInterner,
    expansion_guard: RecursionGuard<ExpansionKey>,
    expansion_cache: FxHashMap<ExpansionKey, TypeId>,
    /// Bumped whenever an expansion is cut short by a cycle or a limit.
    /// Results computed while it changed depend on the expansion stack and
    /// are not cached.
    cut_count: u32,
    /// First alias application that produced a type, for printing
    /// without `EXPAND_NESTED_ALIASES`.
    alias_origins: FxHashMap<TypeId, ExpansionKey>,
}

impl<'p> TypeChecker<'p> {
    pub fn new(program: &'p Program) -> Self {
        TypeChecker {
            program,
            interner: TypeInterner::new(),
            expansion_guard: RecursionGuard::with_profile(RecursionProfile::TypeExpansion),
            expansion_cache: FxHashMap::default(),
            cut_count: 0,
            alias_origins: FxHashMap::default(),
        }
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub fn interner(&self) -> &TypeInterner {
        &self.interner
    }

    /// Type of the right-hand side of a type alias declaration.
    ///
    /// The alias's own type parameters stay as type parameters, so a generic
    /// alias resolves to its generic structure.
    pub fn type_of_alias_rhs(&mut self, decl: &Arc<TypeAliasDeclaration>) -> TypeId {
        self.expansion_guard.reset();
        let defs = self.program.definitions();
        let Some(def) = defs.alias_def(decl) else {
            debug!(alias = %decl.name.text, "alias is not part of the program");
            return self.type_from_node(&decl.ty, ScopeId::GLOBAL, &TypeEnv::new());
        };
        let definition = defs.get(def);
        let env = self.bind_type_parameters(&decl.type_parameters, definition.scope, &TypeEnv::new());
        let args: Vec<TypeId> = decl
            .type_parameters
            .iter()
            .filter_map(|p| env.get(&p.name.text))
            .collect();
        self.instantiate_def(def, args)
    }

    pub fn type_to_string(&self, ty: TypeId, flags: TypeFormatFlags) -> String {
        TypePrinter::new(self, flags).print(ty)
    }

    pub(crate) fn alias_origin(&self, ty: TypeId) -> Option<ExpansionKey> {
        self.alias_origins.get(&ty).copied()
    }

    // =========================================================================
    // Type parameters
    // =========================================================================

    /// Bind declared type parameters as type parameter types.
    pub(crate) fn bind_type_parameters(
        &mut self,
        params: &[TypeParameter],
        scope: ScopeId,
        env: &TypeEnv,
    ) -> TypeEnv {
        let mut env = env.clone();
        for param in params {
            let constraint = param
                .constraint
                .as_ref()
                .map(|c| self.type_from_node(c, scope, &env));
            let default = param
                .default
                .as_ref()
                .map(|d| self.type_from_node(d, scope, &env));
            let ty = self.interner.type_param(TypeParamInfo {
                name: param.name.text.clone(),
                constraint,
                default,
            });
            env.bind(param.name.text.clone(), ty);
        }
        env
    }

    pub(crate) fn type_param_infos(&self, env: &TypeEnv, params: &[TypeParameter]) -> Vec<TypeParamInfo> {
        params
            .iter()
            .filter_map(|p| match env.get(&p.name.text).map(|t| self.interner.lookup(t)) {
                Some(TypeData::TypeParameter(info)) => Some(info.clone()),
                _ => None,
            })
            .collect()
    }

    // =========================================================================
    // Alias and interface application
    // =========================================================================

    /// Apply a definition to type arguments and return its structure.
    pub(crate) fn instantiate_def(&mut self, def: DefId, args: Vec<TypeId>) -> TypeId {
        let program = self.program;
        let definition = program.definitions().get(def);
        let params = definition.type_parameters();
        let env = self.bind_arguments(params, definition.scope, args);
        let args: Vec<TypeId> = params.iter().filter_map(|p| env.get(&p.name.text)).collect();

        if definition.kind.is_opaque() {
            return self.interner.reference(def, &args);
        }
        if definition.is_lib && matches!(definition.kind, DefKind::Interface(_)) {
            return match (definition.name.as_str(), args.first()) {
                ("Array", Some(&element)) => self.interner.array(element, false),
                ("ReadonlyArray", Some(&element)) => self.interner.array(element, true),
                _ => self.interner.reference(def, &args),
            };
        }

        let key = ExpansionKey {
            def,
            args: self.interner.intern_list(&args),
        };
        if let Some(&cached) = self.expansion_cache.get(&key) {
            return cached;
        }
        match self.expansion_guard.enter(key) {
            RecursionResult::Entered => {}
            denied => {
                trace!(name = %definition.name, ?denied, "expansion cut");
                self.cut_count += 1;
                return self.interner.reference(def, &args);
            }
        }
        // A generic application of a definition that is already expanding
        // only grows its arguments, e.g. the deferred branch of a recursive
        // conditional alias.
        let generic = args.iter().any(|&a| self.interner.contains_type_parameters(a));
        if generic && self.expansion_guard.any_visiting(|k| k.def == def && *k != key) {
            trace!(name = %definition.name, "generic self-application kept by name");
            self.expansion_guard.leave(key);
            self.cut_count += 1;
            return self.interner.reference(def, &args);
        }

        let cuts_before = self.cut_count;
        let result = match &definition.kind {
            DefKind::TypeAlias(alias) => {
                if definition.is_lib && is_intrinsic_marker(alias) {
                    let operand = args.first().copied().unwrap_or(TypeId::ERROR);
                    if self.interner.contains_type_parameters(operand) {
                        self.interner.reference(def, &args)
                    } else {
                        self.evaluate_string_mapping(&definition.name, operand)
                    }
                } else {
                    let ty = self.type_from_node(&alias.ty, definition.scope, &env);
                    self.break_alias_cycle(&definition.name, ty)
                }
            }
            DefKind::Interface(decls) => self.interface_type(decls, definition.scope, &env),
            DefKind::Class(_) | DefKind::Enum(_) | DefKind::EnumMember { .. } => {
                self.interner.reference(def, &args)
            }
        };
        self.expansion_guard.leave(key);

        if self.cut_count == cuts_before {
            self.expansion_cache.insert(key, result);
        }
        if matches!(definition.kind, DefKind::TypeAlias(_)) && self.is_nameable(result) {
            self.alias_origins.entry(result).or_insert(key);
        }
        result
    }

    /// An alias body that evaluates to a cut alias still on the current path
    /// is circular, and circular aliases are `any`.
    fn break_alias_cycle(&self, name: &str, ty: TypeId) -> TypeId {
        let TypeData::Reference { def, args } = self.interner.lookup(ty) else {
            return ty;
        };
        let target = self.program.definitions().get(*def);
        let key = ExpansionKey {
            def: *def,
            args: *args,
        };
        if matches!(target.kind, DefKind::TypeAlias(_)) && self.expansion_guard.is_visiting(&key) {
            debug!(alias = name, "alias circularly references itself");
            return TypeId::ERROR;
        }
        ty
    }

    /// Structure behind a `Reference`, including opaque library interfaces.
    pub(crate) fn expand_reference(&mut self, def: DefId, args: TypeListId) -> Option<TypeId> {
        let program = self.program;
        let definition = program.definitions().get(def);
        let args = self.interner.type_list(args).to_vec();
        match &definition.kind {
            DefKind::Interface(decls) => {
                let key = ExpansionKey {
                    def,
                    args: self.interner.intern_list(&args),
                };
                if !self.expansion_guard.enter(key).is_entered() {
                    return None;
                }
                let env = self.bind_arguments(definition.type_parameters(), definition.scope, args);
                let result = self.interface_type(decls, definition.scope, &env);
                self.expansion_guard.leave(key);
                Some(result)
            }
            DefKind::TypeAlias(_) => {
                let result = self.instantiate_def(def, args);
                match self.interner.lookup(result) {
                    TypeData::Reference { def: d, .. } if *d == def => None,
                    _ => Some(result),
                }
            }
            DefKind::Class(_) | DefKind::Enum(_) | DefKind::EnumMember { .. } => None,
        }
    }

    /// Bind arguments to parameters, filling missing ones from defaults.
    fn bind_arguments(&mut self, params: &[TypeParameter], scope: ScopeId, args: Vec<TypeId>) -> TypeEnv {
        let mut env = TypeEnv::new();
        for (i, param) in params.iter().enumerate() {
            let ty = match args.get(i) {
                Some(&arg) => arg,
                None => match &param.default {
                    Some(default) => self.type_from_node(default, scope, &env),
                    None => TypeId::ERROR,
                },
            };
            let modifiers_source = param.constraint.as_ref().and_then(|c| match &c.kind {
                TypeNodeKind::TypeOperator {
                    operator: tsreveal_parser::ast::TypeOperator::Keyof,
                    ty,
                } => match &ty.kind {
                    TypeNodeKind::Reference { name, type_arguments }
                        if name.segments.len() == 1 && type_arguments.is_empty() =>
                    {
                        env.get(name.simple_name())
                    }
                    _ => None,
                },
                _ => None,
            });
            env.bindings.push(Binding {
                name: param.name.text.clone(),
                ty,
                modifiers_source,
            });
        }
        env
    }

    /// Merged members of all declarations plus inherited members.
    fn interface_type(
        &mut self,
        decls: &[Arc<InterfaceDeclaration>],
        scope: ScopeId,
        env: &TypeEnv,
    ) -> TypeId {
        let mut shape = ObjectShape::default();
        let mut bases = Vec::new();
        for decl in decls {
            self.add_members(&mut shape, &decl.members, scope, env);
            for heritage in &decl.heritage {
                bases.push(self.type_from_node(heritage, scope, env));
            }
        }
        for base in bases {
            let base = match self.interner.lookup(base).clone() {
                TypeData::Reference { def, args } => match self.expand_reference(def, args) {
                    Some(expanded) => expanded,
                    None => continue,
                },
                _ => base,
            };
            let TypeData::Object(base_shape) = self.interner.lookup(base).clone() else {
                continue;
            };
            for prop in base_shape.properties {
                if shape.property(&prop.name).is_none() {
                    shape.properties.push(prop);
                }
            }
            for index in base_shape.index_signatures {
                if !shape
                    .index_signatures
                    .iter()
                    .any(|i| i.key_type == index.key_type)
                {
                    shape.index_signatures.push(index);
                }
            }
            if shape.call_signatures.is_empty() {
                shape.call_signatures = base_shape.call_signatures;
            }
            if shape.construct_signatures.is_empty() {
                shape.construct_signatures = base_shape.construct_signatures;
            }
        }
        self.interner.object(shape)
    }

    /// Types worth naming when printing without nested alias expansion.
    fn is_nameable(&self, ty: TypeId) -> bool {
        matches!(
            self.interner.lookup(ty),
            TypeData::Object(_)
                | TypeData::Union(_)
                | TypeData::Intersection(_)
                | TypeData::Tuple { .. }
                | TypeData::Mapped(_)
                | TypeData::Conditional(_)
        ) && ty != TypeId::EMPTY_OBJECT
    }

    // =========================================================================
    // Relations
    // =========================================================================

    pub fn is_type_assignable_to(&mut self, source: TypeId, target: TypeId) -> bool {
        self.is_assignable(source, target)
    }
}

/// `type Uppercase<S extends string> = intrinsic;`
fn is_intrinsic_marker(alias: &TypeAliasDeclaration) -> bool {
    matches!(
        &alias.ty.kind,
        TypeNodeKind::Reference { name, type_arguments }
            if type_arguments.is_empty() && name.text() == "intrinsic"
    )
}

#[cfg(test)]
#[path = "tests/checker_tests.rs"]
mod checker_tests;
