//! Configuration loading and discovery for `atlas.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::PackerConfig;
use crate::discovery::TextureKind;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for when no config path is given
pub const CONFIG_FILE_NAME: &str = "atlas.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse atlas.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Replace the configured pack roots (when non-empty)
    pub packs: Vec<PathBuf>,
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override cell size
    pub cell_size: Option<u32>,
    /// Override atlas size
    pub size: Option<u32>,
    /// Also pack `textures/item`
    pub include_items: bool,
    /// Extra identifiers to exclude
    pub exclude: Vec<String>,
}

/// Find atlas.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for atlas.toml
/// 2. Check XDG_CONFIG_HOME/blockatlas/atlas.toml (or ~/.config/blockatlas/atlas.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find atlas.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("blockatlas").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find atlas.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load and validate configuration from an atlas.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the
/// default configuration.
pub fn load_config(path: Option<&Path>) -> Result<PackerConfig, ConfigError> {
    let config = read_config(path)?;
    check_config(&config)?;
    Ok(config)
}

/// Parse configuration the same way as `load_config`, without validating it.
///
/// Used when CLI overrides are merged in before validation.
pub fn read_config(path: Option<&Path>) -> Result<PackerConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            let contents = fs::read_to_string(&p)?;
            Ok(toml::from_str(&contents)?)
        }
        None => Ok(default_config()),
    }
}

/// Turn validation findings into a `ConfigError::Validation`.
pub fn check_config(config: &PackerConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Default configuration used when no atlas.toml is found.
pub fn default_config() -> PackerConfig {
    PackerConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. Exclusions are
/// appended rather than replaced.
pub fn merge_cli_overrides(config: &mut PackerConfig, overrides: &CliOverrides) {
    if !overrides.packs.is_empty() {
        config.project.packs = overrides.packs.clone();
    }

    if let Some(ref out) = overrides.out {
        config.project.out = out.clone();
    }

    if let Some(cell_size) = overrides.cell_size {
        config.atlas.cell_size = cell_size;
    }

    if let Some(size) = overrides.size {
        config.atlas.size = size;
    }

    if overrides.include_items && !config.atlas.kinds.contains(&TextureKind::Item) {
        config.atlas.kinds.push(TextureKind::Item);
    }

    for id in &overrides.exclude {
        if !config.atlas.exclude.contains(id) {
            config.atlas.exclude.push(id.clone());
        }
    }
}

/// Get the project root directory from a config file path.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
