//! Alias resolution for one in-memory file.
//!
//! Parses the text through a [`VirtualHost`], binds it into a [`Program`]
//! and prints every type alias declared at file scope or directly inside a
//! file-scope namespace with its right-hand side replaced by the expanded
//! type.

use serde::Serialize;
use tracing::{debug, info_span, warn};
use tsreveal_common::{Diagnostic, TextRange};

use crate::format::TypeFormatFlags;
use crate::host::{CompilerHost, DefaultHost, HostError, VirtualHost};
use crate::program::{Program, ProgramOptions};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveOptions {
    pub flags: TypeFormatFlags,
    /// Make the default library available to the file.
    pub include_lib: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            flags: TypeFormatFlags::IN_TYPE_ALIAS
                | TypeFormatFlags::EXPAND_NESTED_ALIASES
                | TypeFormatFlags::NO_TRUNCATION,
            include_lib: true,
        }
    }
}

/// One alias declaration with its right-hand side expanded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedAlias {
    pub name: String,
    /// Declaration text up to the right-hand side as written, followed by
    /// the printed type, e.g. `export type A<T> = { a: T; }`.
    pub text: String,
}

#[derive(Clone, Debug, Default)]
pub struct ResolveOutput {
    /// In declaration order.
    pub aliases: Vec<ResolvedAlias>,
    /// Parse problems of the resolved file. Resolution continues past them.
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolveOutput {
    /// Alias texts, ready to be rendered.
    pub fn texts(&self) -> Vec<&str> {
        self.aliases.iter().map(|a| a.text.as_str()).collect()
    }
}

/// Resolve the aliases of `text`, served as `file_name` on top of the
/// default host.
pub fn resolve_type_aliases(
    file_name: &str,
    text: &str,
    options: &ResolveOptions,
) -> Result<ResolveOutput, HostError> {
    resolve_with_host(DefaultHost, file_name, text, options)
}

/// Like [`resolve_type_aliases`] with a caller-supplied inner host.
pub fn resolve_with_host<H: CompilerHost>(
    inner: H,
    file_name: &str,
    text: &str,
    options: &ResolveOptions,
) -> Result<ResolveOutput, HostError> {
    let _span = info_span!("resolve", file = file_name, len = text.len()).entered();
    let host = VirtualHost::new(inner, file_name, text);
    let program = Program::new(
        &[file_name],
        &host,
        ProgramOptions {
            include_lib: options.include_lib,
        },
    )?;
    let source = host.source_file();
    if source.has_errors() {
        warn!(count = source.diagnostics.len(), "resolving file with syntax errors");
    }

    let mut checker = program.type_checker();
    let aliases = source
        .type_aliases()
        .into_iter()
        .map(|decl| {
            let prefix_range = TextRange::new(decl.range.start, decl.ty.range.start);
            let prefix = source.text_of(prefix_range);
            let ty = checker.type_of_alias_rhs(decl);
            let printed = checker.type_to_string(ty, options.flags);
            debug!(alias = %decl.name.text, "resolved alias");
            ResolvedAlias {
                name: decl.name.text.clone(),
                text: format!("{prefix}{printed}"),
            }
        })
        .collect();

    Ok(ResolveOutput {
        aliases,
        diagnostics: source.diagnostics.clone(),
    })
}
