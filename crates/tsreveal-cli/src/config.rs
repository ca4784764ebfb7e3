//! `tsreveal.json` and the settings merged from it and the command line.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tsreveal_checker::{ResolveOptions, TypeFormatFlags};
use tsreveal_common::limits::{DEFAULT_DEBOUNCE_MS, DEFAULT_PRINT_WIDTH};
use tsreveal_fmt::FormatOptions;
use tsreveal_session::{CoordinatorOptions, DerivedNaming, DocumentUri, REVEAL_SCHEME};

use crate::args::{CliArgs, Naming};

/// Config file looked up next to the revealed file.
pub const CONFIG_FILE_NAME: &str = "tsreveal.json";

/// Derived document used by `Naming::Fixed`.
pub const FIXED_DERIVED_PATH: &str = "revealed.d.ts";

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RevealConfig {
    #[serde(default)]
    pub debounce_ms: Option<u64>,
    #[serde(default)]
    pub print_width: Option<usize>,
    #[serde(default)]
    pub expand_nested_aliases: Option<bool>,
    #[serde(default)]
    pub naming: Option<Naming>,
    #[serde(default)]
    pub no_lib: Option<bool>,
}

pub fn parse_config(source: &str) -> Result<RevealConfig> {
    let config = serde_json::from_str(source).context("failed to parse tsreveal.json")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<RevealConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("invalid config: {}", path.display()))
}

/// The explicit `--config` file, else `tsreveal.json` beside `file` when
/// present.
pub fn find_config(explicit: Option<&Path>, file: &Path) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("config file not found: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }
    let dir = file.parent().unwrap_or_else(|| Path::new("."));
    let candidate = dir.join(CONFIG_FILE_NAME);
    Ok(candidate.is_file().then_some(candidate))
}

/// Everything a run needs, after flags override config values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub file: PathBuf,
    pub out: Option<PathBuf>,
    pub watch: bool,
    pub json: bool,
    pub pretty: bool,
    pub debounce: Duration,
    pub print_width: usize,
    pub expand_nested_aliases: bool,
    pub naming: Naming,
    pub include_lib: bool,
}

impl Settings {
    pub fn from_args(args: &CliArgs) -> Result<Settings> {
        let config = match find_config(args.config.as_deref(), &args.file)? {
            Some(path) => load_config(&path)?,
            None => RevealConfig::default(),
        };
        Ok(Settings::merge(args, &config))
    }

    pub fn merge(args: &CliArgs, config: &RevealConfig) -> Settings {
        let expand_nested_aliases = if args.shallow {
            false
        } else {
            config.expand_nested_aliases.unwrap_or(true)
        };
        Settings {
            file: args.file.clone(),
            out: args.out.clone(),
            watch: args.watch,
            json: args.json,
            pretty: args.pretty,
            debounce: Duration::from_millis(
                args.debounce_ms
                    .or(config.debounce_ms)
                    .unwrap_or(DEFAULT_DEBOUNCE_MS),
            ),
            print_width: args
                .print_width
                .or(config.print_width)
                .unwrap_or(DEFAULT_PRINT_WIDTH),
            expand_nested_aliases,
            naming: args.naming.or(config.naming).unwrap_or(Naming::SwapExtension),
            include_lib: !(args.no_lib || config.no_lib.unwrap_or(false)),
        }
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        let mut flags = TypeFormatFlags::IN_TYPE_ALIAS | TypeFormatFlags::NO_TRUNCATION;
        if self.expand_nested_aliases {
            flags |= TypeFormatFlags::EXPAND_NESTED_ALIASES;
        }
        ResolveOptions {
            flags,
            include_lib: self.include_lib,
        }
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            print_width: self.print_width,
            semi: false,
            ..FormatOptions::default()
        }
    }

    pub fn coordinator_options(&self) -> CoordinatorOptions {
        let naming = match self.naming {
            Naming::SwapExtension => DerivedNaming::SwapExtension,
            Naming::Fixed => DerivedNaming::Fixed(DocumentUri::new(REVEAL_SCHEME, FIXED_DERIVED_PATH)),
        };
        CoordinatorOptions {
            debounce: self.debounce,
            naming,
            resolve: self.resolve_options(),
            format: self.format_options(),
        }
    }
}
