//! Configuration schema types for `atlas.toml`
//!
//! Defines the structure and validation rules for atlas packing configuration.

use crate::atlas::{GridError, GridLayout};
use crate::discovery::TextureKind;
use crate::identifier::{IdentifierError, TextureId};
use crate::recolor::{RecolorError, RecolorTable};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// Resampling filter used when a texture has to be rescaled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Nearest-neighbor (pixel-perfect)
    #[default]
    Point,
    /// Bilinear interpolation
    Bilinear,
}

impl FilterMode {
    pub fn filter_type(&self) -> FilterType {
        match self {
            FilterMode::Point => FilterType::Nearest,
            FilterMode::Bilinear => FilterType::Triangle,
        }
    }
}

/// Project section: where packs are read from and artifacts written to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Resource pack roots, highest priority first
    #[serde(default = "default_packs")]
    pub packs: Vec<PathBuf>,
    /// Output directory for the atlas image and index
    #[serde(default = "default_out")]
    pub out: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { packs: default_packs(), out: default_out() }
    }
}

fn default_packs() -> Vec<PathBuf> {
    vec![PathBuf::from("resourcepacks/vanilla")]
}

fn default_out() -> PathBuf {
    PathBuf::from("build")
}

/// Atlas geometry and output naming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasSettings {
    /// Side length of one cell in pixels
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
    /// Side length of the atlas in pixels
    #[serde(default = "default_atlas_size")]
    pub size: u32,
    /// Texture folders to pack, in slot order
    #[serde(default = "default_kinds")]
    pub kinds: Vec<TextureKind>,
    /// Atlas image file name
    #[serde(default = "default_image_name")]
    pub image: String,
    /// Index JSON file name
    #[serde(default = "default_index_name")]
    pub index: String,
    /// Rescale filter
    #[serde(default)]
    pub filter: FilterMode,
    /// Identifiers that are never packed
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Start from the built-in vanilla recolor table
    #[serde(default = "default_true")]
    pub builtin_recolors: bool,
}

impl Default for AtlasSettings {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            size: default_atlas_size(),
            kinds: default_kinds(),
            image: default_image_name(),
            index: default_index_name(),
            filter: FilterMode::default(),
            exclude: Vec::new(),
            builtin_recolors: true,
        }
    }
}

fn default_cell_size() -> u32 {
    16
}

fn default_atlas_size() -> u32 {
    512
}

fn default_kinds() -> Vec<TextureKind> {
    vec![TextureKind::Block]
}

fn default_image_name() -> String {
    "block_atlas.png".to_string()
}

fn default_index_name() -> String {
    "block_atlas_dict.json".to_string()
}

fn default_true() -> bool {
    true
}

/// Complete atlas.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Input and output locations
    #[serde(default)]
    pub project: ProjectConfig,
    /// Atlas settings
    #[serde(default)]
    pub atlas: AtlasSettings,
    /// Extra recolor tints, identifier -> color string
    #[serde(default)]
    pub recolor: BTreeMap<String, String>,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "atlas.cell_size")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "atlas.toml: '{}' {}", self.field, self.message)
    }
}

impl PackerConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message });
        };

        if self.project.packs.is_empty() {
            push("project.packs", "must list at least one resource pack".to_string());
        }

        if let Err(e) = self.layout() {
            let field = match e {
                GridError::NotDivisible { .. } => "atlas.size",
                _ => "atlas.cell_size",
            };
            push(field, e.to_string());
        }

        if self.atlas.kinds.is_empty() {
            push("atlas.kinds", "must contain at least one texture kind".to_string());
        }
        if self.atlas.image.trim().is_empty() {
            push("atlas.image", "must be a non-empty file name".to_string());
        }
        if self.atlas.index.trim().is_empty() {
            push("atlas.index", "must be a non-empty file name".to_string());
        }
        if !self.atlas.image.trim().is_empty() && self.atlas.image == self.atlas.index {
            push("atlas.index", "must differ from atlas.image".to_string());
        }

        for raw in &self.atlas.exclude {
            if let Err(e) = raw.parse::<TextureId>() {
                push("atlas.exclude", e.to_string());
            }
        }

        if let Err(e) = self.recolor_table() {
            push("recolor", e.to_string());
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Grid geometry for the configured sizes
    pub fn layout(&self) -> Result<GridLayout, GridError> {
        GridLayout::new(self.atlas.size, self.atlas.cell_size)
    }

    /// Parsed exclusion set
    pub fn exclusions(&self) -> Result<HashSet<TextureId>, IdentifierError> {
        self.atlas.exclude.iter().map(|raw| raw.parse()).collect()
    }

    /// Recolor table: built-ins (unless disabled) overlaid with `[recolor]`
    pub fn recolor_table(&self) -> Result<RecolorTable, RecolorError> {
        RecolorTable::from_entries(&self.recolor, self.atlas.builtin_recolors)
    }
}
