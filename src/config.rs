//! Configuration file support for bom-trace.
//!
//! Provides YAML-based configuration through `bom-trace.config.yml` files,
//! including data structures, file loading, validation, and the merge with
//! command-line overrides.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::application::dto::{OutputFormat, ResolverSettings};
use crate::bom_structure::policies::QuantityMode;
use crate::cli::Args;
use crate::shared::error::BomError;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "bom-trace.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub database: Option<PathBuf>,
    pub format: Option<String>,
    pub chunk_size: Option<usize>,
    pub max_workers: Option<usize>,
    pub query_timeout_ms: Option<u64>,
    pub deadline_ms: Option<u64>,
    pub max_depth: Option<usize>,
    pub quantity_mode: Option<QuantityMode>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Everything a command needs once the config file and the flags are merged
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub database: PathBuf,
    pub format: OutputFormat,
    pub settings: ResolverSettings,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config, path);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    let positive = [
        ("chunk_size", config.chunk_size.map(|v| v as u64)),
        ("max_workers", config.max_workers.map(|v| v as u64)),
        ("query_timeout_ms", config.query_timeout_ms),
        ("deadline_ms", config.deadline_ms),
        ("max_depth", config.max_depth.map(|v| v as u64)),
    ];
    for (field, value) in positive {
        if value == Some(0) {
            bail!(
                "Invalid config: {} must be greater than 0.\n\n\
                 💡 Hint: Remove the field to use the default value.",
                field
            );
        }
    }

    if let Some(ref format) = config.format {
        if let Err(e) = format.parse::<OutputFormat>() {
            bail!("Invalid config: {}", e);
        }
    }

    if let Some(ref database) = config.database {
        if database.as_os_str().is_empty() {
            bail!("Invalid config: database must not be empty.");
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile, path: &Path) {
    for key in config.unknown_fields.keys() {
        tracing::warn!(
            target: "bom_trace::config",
            field = key.as_str(),
            path = %path.display(),
            "Unknown config field will be ignored"
        );
    }
}

/// Merges command-line flags over the config file and defaults
///
/// # Errors
/// - `BomError::Validation` when no database is given anywhere
/// - `BomError::Validation` when a merged setting is out of range
pub fn merge_with_args(args: &Args, config: Option<ConfigFile>) -> Result<RunOptions> {
    let config = config.unwrap_or_default();
    let defaults = ResolverSettings::default();

    let database = args
        .database
        .clone()
        .or(config.database)
        .ok_or_else(|| BomError::Validation {
            message: format!(
                "No relation database given.\n\n💡 Hint: Pass --database PATH or set `database` in {}",
                CONFIG_FILENAME
            ),
        })?;

    let format = match (args.format, config.format.as_deref()) {
        (Some(format), _) => format,
        (None, Some(raw)) => raw
            .parse::<OutputFormat>()
            .map_err(|message| BomError::Validation { message })?,
        (None, None) => OutputFormat::default(),
    };

    let settings = ResolverSettings {
        chunk_size: args
            .chunk_size
            .or(config.chunk_size)
            .unwrap_or(defaults.chunk_size),
        max_workers: args
            .max_workers
            .or(config.max_workers)
            .unwrap_or(defaults.max_workers),
        query_timeout: args
            .query_timeout_ms
            .or(config.query_timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or(defaults.query_timeout),
        deadline: args
            .deadline_ms
            .or(config.deadline_ms)
            .map(Duration::from_millis),
        max_depth: args
            .max_depth
            .or(config.max_depth)
            .unwrap_or(defaults.max_depth),
        quantity_mode: args
            .quantity_mode
            .or(config.quantity_mode)
            .unwrap_or(defaults.quantity_mode),
    };
    settings.validate()?;

    Ok(RunOptions {
        database,
        format,
        settings,
    })
}
