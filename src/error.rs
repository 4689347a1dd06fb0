//! Top-level error for a pack run

use crate::atlas::GridError;
use crate::config::ConfigError;
use crate::discovery::DiscoveryError;
use crate::index::IndexError;
use crate::output::OutputError;
use std::path::PathBuf;
use thiserror::Error;

/// Any failure that aborts a pack run.
///
/// Each variant names the file or identifier involved.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A configured pack root is missing
    #[error("resource pack not found: {}", .0.display())]
    PackNotFound(PathBuf),
    /// A pack directory could not be listed
    #[error("failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Other discovery failure (unusable file names, bad pack paths)
    #[error(transparent)]
    Discovery(DiscoveryError),
    /// A texture could not be opened or decoded
    #[error("failed to decode texture {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The atlas image could not be written
    #[error("failed to write atlas image {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: OutputError,
    },
    /// Filesystem failure outside decoding and encoding
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// More textures than cells
    #[error("atlas is full ({capacity} cells), cannot place '{id}'")]
    CapacityExceeded { capacity: usize, id: String },
    /// A normalized texture did not match the cell size
    #[error("'{id}' is {width}x{height}, expected a {cell_size}x{cell_size} cell")]
    InvalidCell { id: String, width: u32, height: u32, cell_size: u32 },
    /// Atlas geometry is unusable
    #[error("invalid atlas layout: {0}")]
    InvalidLayout(GridError),
    /// The same identifier reached the grid twice
    #[error("texture '{0}' was placed twice")]
    DuplicateTexture(String),
    /// The slot index could not be written
    #[error("failed to write atlas index {}: {source}", path.display())]
    Index {
        path: PathBuf,
        #[source]
        source: IndexError,
    },
}

impl From<DiscoveryError> for AtlasError {
    fn from(e: DiscoveryError) -> Self {
        match e {
            DiscoveryError::PackNotFound(path) => AtlasError::PackNotFound(path),
            DiscoveryError::ReadDir { path, source } => AtlasError::ReadDir { path, source },
            other => AtlasError::Discovery(other),
        }
    }
}

impl From<GridError> for AtlasError {
    fn from(e: GridError) -> Self {
        match e {
            GridError::CapacityExceeded { capacity, id } => {
                AtlasError::CapacityExceeded { capacity, id }
            }
            GridError::InvalidCell { id, width, height, cell_size } => {
                AtlasError::InvalidCell { id, width, height, cell_size }
            }
            GridError::AlreadyPlaced(id) => AtlasError::DuplicateTexture(id),
            other => AtlasError::InvalidLayout(other),
        }
    }
}
