//! A set of parsed files bound into one set of definitions.

use std::sync::Arc;

use tracing::{debug, info_span};
use tsreveal_parser::SourceFile;

use crate::checker::TypeChecker;
use crate::def::{Definitions, ScopeId};
use crate::host::{CompilerHost, HostError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramOptions {
    /// Load the host's default library files ahead of the root files.
    pub include_lib: bool,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        ProgramOptions { include_lib: true }
    }
}

pub struct Program {
    files: Vec<Arc<SourceFile>>,
    /// Scope each file binds into, parallel to `files`.
    file_scopes: Vec<ScopeId>,
    definitions: Definitions,
}

impl Program {
    /// Load `root_names` (and the default library) through `host`.
    ///
    /// Library files bind into the global scope; each root file gets its own
    /// scope nested inside it.
    pub fn new<H: CompilerHost>(
        root_names: &[&str],
        host: &H,
        options: ProgramOptions,
    ) -> Result<Program, HostError> {
        let _span = info_span!("program", roots = root_names.len()).entered();
        let mut files = Vec::new();
        let mut file_scopes = Vec::new();
        let mut definitions = Definitions::default();

        if options.include_lib {
            for lib_name in host.default_lib_file_names() {
                let lib = host.get_source_file(&lib_name)?;
                definitions.bind_statements(&lib.statements, ScopeId::GLOBAL, true);
                files.push(lib);
                file_scopes.push(ScopeId::GLOBAL);
            }
        }
        for &root in root_names {
            let file = host.get_source_file(root)?;
            let scope = definitions.new_file_scope();
            definitions.bind_statements(&file.statements, scope, false);
            files.push(file);
            file_scopes.push(scope);
        }
        debug!(files = files.len(), definitions = definitions.len(), "program bound");
        Ok(Program {
            files,
            file_scopes,
            definitions,
        })
    }

    pub fn source_files(&self) -> &[Arc<SourceFile>] {
        &self.files
    }

    pub fn source_file(&self, file_name: &str) -> Option<&Arc<SourceFile>> {
        self.files.iter().find(|f| f.file_name == file_name)
    }

    /// Scope the declarations of `file_name` were bound into.
    pub fn file_scope(&self, file_name: &str) -> Option<ScopeId> {
        self.files
            .iter()
            .position(|f| f.file_name == file_name)
            .map(|i| self.file_scopes[i])
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    pub fn type_checker(&self) -> TypeChecker<'_> {
        TypeChecker::new(self)
    }
}
