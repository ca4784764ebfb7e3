//! Type definitions and the scopes they are declared in.
//!
//! The binder walks every file of a [`Program`](crate::Program) once and
//! records each type alias, interface, class and enum as a [`Definition`].
//! Interfaces with the same name in the same scope merge into one definition;
//! namespaces with the same name share one scope. An enum also opens a
//! namespace holding its members.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;
use tsreveal_parser::ast::{
    ClassDeclaration, EnumDeclaration, InterfaceDeclaration, ModuleDeclaration, Statement,
    StatementKind, TypeAliasDeclaration, TypeParameter,
};

/// Definition identifier, an index into [`Definitions`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

/// Scope identifier. Scope 0 is the global scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);
}

#[derive(Clone, Debug)]
pub enum DefKind {
    /// `type Foo<T> = ...`; always expanded.
    TypeAlias(Arc<TypeAliasDeclaration>),
    /// `interface Foo<T> { ... }`, all merged declarations in order.
    Interface(Vec<Arc<InterfaceDeclaration>>),
    /// `class Foo<T>`; printed by name, never expanded.
    Class(Arc<ClassDeclaration>),
    /// `enum Color`; printed by name.
    Enum(Arc<EnumDeclaration>),
    /// `Color.Red`, named with its enum as qualifier.
    EnumMember { parent: DefId },
}

impl DefKind {
    /// Only the name of these is ever shown.
    pub fn is_opaque(&self) -> bool {
        matches!(
            self,
            DefKind::Class(_) | DefKind::Enum(_) | DefKind::EnumMember { .. }
        )
    }
}

#[derive(Clone, Debug)]
pub struct Definition {
    pub name: String,
    pub kind: DefKind,
    /// Scope the declaration's own names resolve in.
    pub scope: ScopeId,
    /// Declared in a default library file rather than the user's file.
    pub is_lib: bool,
}

impl Definition {
    /// Type parameters of the first declaration.
    pub fn type_parameters(&self) -> &[TypeParameter] {
        match &self.kind {
            DefKind::TypeAlias(alias) => &alias.type_parameters,
            DefKind::Interface(decls) => decls
                .iter()
                .map(|d| d.type_parameters.as_slice())
                .find(|params| !params.is_empty())
                .unwrap_or(&[]),
            DefKind::Class(class) => &class.type_parameters,
            DefKind::Enum(_) | DefKind::EnumMember { .. } => &[],
        }
    }
}

#[derive(Debug, Default)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub types: FxHashMap<String, DefId>,
    pub namespaces: FxHashMap<String, ScopeId>,
}

/// All definitions and scopes of a program.
#[derive(Debug)]
pub struct Definitions {
    defs: Vec<Definition>,
    scopes: Vec<Scope>,
    /// Type alias declaration (by address) to its definition.
    alias_defs: FxHashMap<usize, DefId>,
}

impl Default for Definitions {
    fn default() -> Self {
        Definitions {
            defs: Vec::new(),
            scopes: vec![Scope::default()],
            alias_defs: FxHashMap::default(),
        }
    }
}

impl Definitions {
    pub fn get(&self, id: DefId) -> &Definition {
        &self.defs[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    /// Definition created for a specific alias declaration, even when a
    /// duplicate name shadowed it in its scope.
    pub fn alias_def(&self, decl: &Arc<TypeAliasDeclaration>) -> Option<DefId> {
        self.alias_defs.get(&(Arc::as_ptr(decl) as usize)).copied()
    }

    /// Look up a type name from `scope` outwards.
    pub fn resolve_type(&self, scope: ScopeId, name: &str) -> Option<DefId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(&def) = scope.types.get(name) {
                return Some(def);
            }
            current = scope.parent;
        }
        None
    }

    /// Look up a namespace name from `scope` outwards.
    pub fn resolve_namespace(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(&ns) = scope.namespaces.get(name) {
                return Some(ns);
            }
            current = scope.parent;
        }
        None
    }

    /// Resolve a possibly qualified name such as `NS.Inner.Foo`.
    pub fn resolve_qualified(&self, scope: ScopeId, segments: &[&str]) -> Option<DefId> {
        let (last, qualifiers) = segments.split_last()?;
        let Some((first, rest)) = qualifiers.split_first() else {
            return self.resolve_type(scope, last);
        };
        let mut ns = self.resolve_namespace(scope, first)?;
        for segment in rest {
            ns = *self.scope(ns).namespaces.get(*segment)?;
        }
        self.scope(ns).types.get(*last).copied()
    }

    fn new_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        id
    }

    /// Bind one file's statements into `scope`.
    pub(crate) fn bind_statements(&mut self, statements: &[Statement], scope: ScopeId, is_lib: bool) {
        for statement in statements {
            match &statement.kind {
                StatementKind::TypeAlias(alias) => self.bind_alias(alias, scope, is_lib),
                StatementKind::Interface(interface) => {
                    self.bind_interface(interface, scope, is_lib)
                }
                StatementKind::Module(module) => self.bind_module(module, scope, is_lib),
                StatementKind::Class(class) => self.bind_class(class, scope, is_lib),
                StatementKind::Enum(decl) => self.bind_enum(decl, scope, is_lib),
                StatementKind::Other => {}
            }
        }
    }

    fn push_def(&mut self, def: Definition) -> DefId {
        let id = DefId(self.defs.len() as u32);
        trace!(name = %def.name, id = id.0, is_lib = def.is_lib, "bind definition");
        self.defs.push(def);
        id
    }

    fn bind_alias(&mut self, alias: &Arc<TypeAliasDeclaration>, scope: ScopeId, is_lib: bool) {
        let id = self.push_def(Definition {
            name: alias.name.text.clone(),
            kind: DefKind::TypeAlias(Arc::clone(alias)),
            scope,
            is_lib,
        });
        self.alias_defs.insert(Arc::as_ptr(alias) as usize, id);
        // First declaration wins; duplicates are still resolvable by address.
        self.scopes[scope.0 as usize]
            .types
            .entry(alias.name.text.clone())
            .or_insert(id);
    }

    fn bind_interface(
        &mut self,
        interface: &Arc<InterfaceDeclaration>,
        scope: ScopeId,
        is_lib: bool,
    ) {
        let name = &interface.name.text;
        if let Some(&existing) = self.scopes[scope.0 as usize].types.get(name)
            && let DefKind::Interface(decls) = &mut self.defs[existing.0 as usize].kind
        {
            decls.push(Arc::clone(interface));
            return;
        }
        let id = self.push_def(Definition {
            name: name.clone(),
            kind: DefKind::Interface(vec![Arc::clone(interface)]),
            scope,
            is_lib,
        });
        self.scopes[scope.0 as usize]
            .types
            .entry(name.clone())
            .or_insert(id);
    }

    fn bind_class(&mut self, class: &Arc<ClassDeclaration>, scope: ScopeId, is_lib: bool) {
        let id = self.push_def(Definition {
            name: class.name.text.clone(),
            kind: DefKind::Class(Arc::clone(class)),
            scope,
            is_lib,
        });
        self.bind_value_type(&class.name.text, id, scope);
    }

    fn bind_enum(&mut self, decl: &Arc<EnumDeclaration>, scope: ScopeId, is_lib: bool) {
        let name = &decl.name.text;
        let id = self.push_def(Definition {
            name: name.clone(),
            kind: DefKind::Enum(Arc::clone(decl)),
            scope,
            is_lib,
        });
        self.bind_value_type(name, id, scope);

        let members = self.namespace_scope(scope, name);
        for member in &decl.members {
            let member_id = self.push_def(Definition {
                name: format!("{name}.{}", member.text),
                kind: DefKind::EnumMember { parent: id },
                scope,
                is_lib,
            });
            self.scopes[members.0 as usize]
                .types
                .entry(member.text.clone())
                .or_insert(member_id);
        }
    }

    /// A class or enum takes over the name from a merged interface, since
    /// the merged type is shown by name.
    fn bind_value_type(&mut self, name: &str, id: DefId, scope: ScopeId) {
        let defs = &self.defs;
        let types = &mut self.scopes[scope.0 as usize].types;
        match types.get(name) {
            Some(existing) if !matches!(defs[existing.0 as usize].kind, DefKind::Interface(_)) => {}
            _ => {
                types.insert(name.to_string(), id);
            }
        }
    }

    /// Scope of namespace `name` inside `parent`, created on first use.
    fn namespace_scope(&mut self, parent: ScopeId, name: &str) -> ScopeId {
        if let Some(&ns) = self.scopes[parent.0 as usize].namespaces.get(name) {
            return ns;
        }
        let ns = self.new_scope(parent);
        self.scopes[parent.0 as usize]
            .namespaces
            .insert(name.to_string(), ns);
        ns
    }

    fn bind_module(&mut self, module: &ModuleDeclaration, scope: ScopeId, is_lib: bool) {
        // `declare global { }` augments the global scope directly.
        if module.name.len() == 1 && module.name[0].text == "global" {
            self.bind_statements(&module.body, ScopeId::GLOBAL, is_lib);
            return;
        }
        let mut target = scope;
        for segment in &module.name {
            target = self.namespace_scope(target, &segment.text);
        }
        self.bind_statements(&module.body, target, is_lib);
    }

    /// Scope for a user file, nested under the global scope so that its
    /// declarations shadow library ones.
    pub(crate) fn new_file_scope(&mut self) -> ScopeId {
        self.new_scope(ScopeId::GLOBAL)
    }
}
