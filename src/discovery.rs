//! Texture discovery across layered resource-pack roots.
//!
//! A pack root either holds namespace folders directly or is a full resource
//! pack with an `assets/` folder (and usually a `pack.mcmeta`). Textures are
//! found at `<namespace>/textures/<kind>/**/*.png`.

use crate::identifier::{IdentifierError, TextureId};
use glob::{glob_with, MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Texture category, the folder right below `textures/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureKind {
    /// `textures/block`
    Block,
    /// `textures/item`
    Item,
}

impl TextureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextureKind::Block => "block",
            TextureKind::Item => "item",
        }
    }
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error during texture discovery
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Pack root does not exist or is not a directory
    #[error("resource pack not found: {}", .0.display())]
    PackNotFound(PathBuf),
    /// Directory listing failed
    #[error("failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Invalid glob pattern built from a pack path
    #[error("invalid glob pattern '{0}': {1}")]
    InvalidPattern(String, glob::PatternError),
    /// A texture file name could not be turned into an identifier
    #[error("cannot derive identifier for {}: {source}", path.display())]
    Identifier {
        path: PathBuf,
        #[source]
        source: IdentifierError,
    },
}

/// One texture file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSource {
    pub id: TextureId,
    pub kind: TextureKind,
    pub path: PathBuf,
    /// Position of the pack root this texture came from
    pub pack: usize,
}

/// A scanned pack root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackRoot {
    /// Path as given
    pub path: PathBuf,
    /// Directory holding the namespace folders
    pub assets_dir: PathBuf,
    /// `pack.description` from `pack.mcmeta`, if present
    pub description: Option<String>,
}

/// A non-fatal problem found while scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryWarning {
    /// Pack root or directory the warning concerns
    pub subject: PathBuf,
    pub message: String,
}

/// Everything found by [`discover`]
#[derive(Debug, Default)]
pub struct Discovery {
    /// Textures in slot order
    pub textures: Vec<TextureSource>,
    /// Textures hidden by an earlier pack root providing the same identifier
    pub overridden: Vec<TextureSource>,
    /// Scanned pack roots, in priority order
    pub packs: Vec<PackRoot>,
    /// Non-fatal problems (unreadable `pack.mcmeta`, non-UTF-8 names, ...)
    pub warnings: Vec<DiscoveryWarning>,
}

/// Discover textures of the given kinds in every pack root.
///
/// Roots are scanned in order and the first root providing an identifier
/// wins. Within a root, namespaces are visited alphabetically, kinds in the
/// order given, and files sorted by path, so slot order is reproducible.
pub fn discover(roots: &[PathBuf], kinds: &[TextureKind]) -> Result<Discovery, DiscoveryError> {
    let mut discovery = Discovery::default();
    let mut seen: HashSet<TextureId> = HashSet::new();

    for (pack_idx, root) in roots.iter().enumerate() {
        if !root.is_dir() {
            return Err(DiscoveryError::PackNotFound(root.clone()));
        }

        let assets_dir = assets_dir_for(root);
        let description = match read_pack_description(root) {
            Ok(description) => description,
            Err(message) => {
                discovery.warnings.push(DiscoveryWarning { subject: root.clone(), message });
                None
            }
        };

        for namespace in list_namespaces(&assets_dir, &mut discovery.warnings)? {
            for kind in kinds {
                let kind_dir = assets_dir.join(&namespace).join("textures").join(kind.as_str());
                if !kind_dir.is_dir() {
                    continue;
                }

                let textures_dir = assets_dir.join(&namespace).join("textures");
                for path in find_png_files(&kind_dir)? {
                    let relative = path.strip_prefix(&textures_dir).unwrap_or(&path);
                    let id = TextureId::from_relative_path(&namespace, relative).map_err(
                        |source| DiscoveryError::Identifier { path: path.clone(), source },
                    )?;

                    let source = TextureSource { id, kind: *kind, path, pack: pack_idx };
                    if seen.insert(source.id.clone()) {
                        discovery.textures.push(source);
                    } else {
                        discovery.overridden.push(source);
                    }
                }
            }
        }

        discovery.packs.push(PackRoot { path: root.clone(), assets_dir, description });
    }

    Ok(discovery)
}

/// Directory holding namespace folders for a pack root
pub fn assets_dir_for(root: &Path) -> PathBuf {
    let assets = root.join("assets");
    if assets.is_dir() {
        assets
    } else {
        root.to_path_buf()
    }
}

/// Sorted namespace folder names below `assets_dir`
fn list_namespaces(
    assets_dir: &Path,
    warnings: &mut Vec<DiscoveryWarning>,
) -> Result<Vec<String>, DiscoveryError> {
    let read_err = |source| DiscoveryError::ReadDir { path: assets_dir.to_path_buf(), source };

    let mut namespaces = Vec::new();
    for entry in fs::read_dir(assets_dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if !entry.path().is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => namespaces.push(name),
            Err(name) => warnings.push(DiscoveryWarning {
                subject: assets_dir.to_path_buf(),
                message: format!(
                    "skipping namespace folder with non-UTF-8 name: {}",
                    name.to_string_lossy()
                ),
            }),
        }
    }

    namespaces.sort();
    Ok(namespaces)
}

/// All `.png` files below `dir` (any depth, extension case-insensitive), sorted
fn find_png_files(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let base = Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{}/**/*.png", base);
    let options = MatchOptions { case_sensitive: false, ..MatchOptions::new() };

    let paths = glob_with(&pattern, options)
        .map_err(|e| DiscoveryError::InvalidPattern(pattern.clone(), e))?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| DiscoveryError::ReadDir {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Read `pack.description` from `<root>/pack.mcmeta`.
///
/// A missing file is `Ok(None)`; an unreadable or malformed one is reported
/// as an error message for the caller to surface as a warning.
fn read_pack_description(root: &Path) -> Result<Option<String>, String> {
    let mcmeta = root.join("pack.mcmeta");
    if !mcmeta.is_file() {
        return Ok(None);
    }

    let text = fs::read_to_string(&mcmeta)
        .map_err(|e| format!("cannot read {}: {}", mcmeta.display(), e))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| format!("malformed {}: {}", mcmeta.display(), e))?;

    Ok(value.get("pack").and_then(|pack| pack.get("description")).map(|d| match d {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }))
}
