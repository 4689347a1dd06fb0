//! Configuration module for blockatlas
//!
//! Provides types and parsing for `atlas.toml` packing configuration.

pub mod loader;
pub mod schema;

pub use loader::{
    check_config, default_config, find_config, load_config, merge_cli_overrides, project_root,
    read_config, resolve_path, CliOverrides, ConfigError, CONFIG_FILE_NAME,
};
pub use schema::*;
