//! Compiler hosts: where a [`Program`](crate::Program) gets its files from.
//!
//! [`DefaultHost`] reads from disk and serves the embedded default library.
//! [`VirtualHost`] wraps any host and answers exactly one file name from an
//! in-memory text, delegating every other name unchanged.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;
use tsreveal_parser::{SourceFile, parse_source_file};

/// Name the embedded default library is served under.
pub const DEFAULT_LIB_FILE_NAME: &str = "lib.d.ts";

const DEFAULT_LIB_TEXT: &str = include_str!("../lib/lib.d.ts");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// No file with this name exists.
    NotFound { file_name: String },
    /// The file exists but could not be read.
    Io { file_name: String, message: String },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::NotFound { file_name } => write!(f, "File '{file_name}' not found."),
            HostError::Io { file_name, message } => {
                write!(f, "Cannot read file '{file_name}': {message}.")
            }
        }
    }
}

impl std::error::Error for HostError {}

/// Supplies parsed source files by name.
pub trait CompilerHost {
    fn get_source_file(&self, file_name: &str) -> Result<Arc<SourceFile>, HostError>;

    /// Library files loaded ahead of the root files.
    fn default_lib_file_names(&self) -> Vec<String> {
        vec![DEFAULT_LIB_FILE_NAME.to_string()]
    }
}

impl<H: CompilerHost + ?Sized> CompilerHost for &H {
    fn get_source_file(&self, file_name: &str) -> Result<Arc<SourceFile>, HostError> {
        (**self).get_source_file(file_name)
    }

    fn default_lib_file_names(&self) -> Vec<String> {
        (**self).default_lib_file_names()
    }
}

/// Host backed by the file system and the embedded default library.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHost;

/// The default library never changes, so it is parsed once per process.
fn default_lib() -> Arc<SourceFile> {
    static LIB: OnceLock<Arc<SourceFile>> = OnceLock::new();
    Arc::clone(LIB.get_or_init(|| {
        Arc::new(parse_source_file(DEFAULT_LIB_FILE_NAME, DEFAULT_LIB_TEXT))
    }))
}

impl CompilerHost for DefaultHost {
    fn get_source_file(&self, file_name: &str) -> Result<Arc<SourceFile>, HostError> {
        if file_name == DEFAULT_LIB_FILE_NAME {
            return Ok(default_lib());
        }
        debug!(file = file_name, "reading source file from disk");
        match std::fs::read_to_string(file_name) {
            Ok(text) => Ok(Arc::new(parse_source_file(file_name, text))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(HostError::NotFound {
                file_name: file_name.to_string(),
            }),
            Err(err) => Err(HostError::Io {
                file_name: file_name.to_string(),
                message: err.to_string(),
            }),
        }
    }
}

/// Serves `file_name` from memory and defers everything else to `inner`.
pub struct VirtualHost<H> {
    inner: H,
    file_name: String,
    source: Arc<SourceFile>,
}

impl<H: CompilerHost> VirtualHost<H> {
    /// Parse `text` under `file_name`; the file need not exist on disk.
    pub fn new(inner: H, file_name: impl Into<String>, text: &str) -> Self {
        let file_name = file_name.into();
        let source = Arc::new(parse_source_file(file_name.clone(), text));
        VirtualHost {
            inner,
            file_name,
            source,
        }
    }

    /// The in-memory file this host serves.
    pub fn source_file(&self) -> &Arc<SourceFile> {
        &self.source
    }
}

impl<H: CompilerHost> CompilerHost for VirtualHost<H> {
    fn get_source_file(&self, file_name: &str) -> Result<Arc<SourceFile>, HostError> {
        if file_name == self.file_name {
            Ok(Arc::clone(&self.source))
        } else {
            self.inner.get_source_file(file_name)
        }
    }

    fn default_lib_file_names(&self) -> Vec<String> {
        self.inner.default_lib_file_names()
    }
}

#[cfg(test)]
#[path = "tests/host_tests.rs"]
mod host_tests;
