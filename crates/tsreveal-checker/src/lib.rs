//! Type-level checker for the TypeScript declaration subset.
//!
//! This crate turns parsed files into fully expanded types:
//! - `host` - where source files come from, including the in-memory
//!   `VirtualHost`
//! - `program` / `def` - loading files and binding their type declarations
//! - `checker` - alias and interface expansion over an interned type graph
//! - `format` - printing types back as TypeScript syntax
//! - `resolve` - the one-call pipeline from text to resolved alias strings

pub mod checker;
pub mod def;
mod evaluate;
mod evaluate_rules;
pub mod format;
pub mod host;
pub mod intern;
pub mod program;
pub mod recursion;
mod relate;
pub mod resolve;
pub mod types;

pub use checker::{TypeChecker, TypeEnv};
pub use def::{DefId, Definitions, ScopeId};
pub use format::TypeFormatFlags;
pub use host::{CompilerHost, DEFAULT_LIB_FILE_NAME, DefaultHost, HostError, VirtualHost};
pub use intern::TypeInterner;
pub use program::{Program, ProgramOptions};
pub use resolve::{ResolveOptions, ResolveOutput, ResolvedAlias, resolve_type_aliases, resolve_with_host};
pub use types::{TypeData, TypeId};
