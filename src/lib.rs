//! blockatlas - Build-time texture atlas packer for resource packs
//!
//! This library provides functionality to:
//! - Discover block and item textures across layered resource-pack roots
//! - Normalize each texture to a square cell and tint grayscale textures
//! - Pack the cells into a fixed-grid atlas and write a slot index
//! - Read the slot index back and compute cell and face UVs

pub mod atlas;
pub mod cli;
pub mod color;
pub mod config;
pub mod discovery;
pub mod error;
pub mod identifier;
pub mod index;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod recolor;

pub use atlas::{Atlas, GridError, GridLayout};
pub use error::AtlasError;
pub use identifier::TextureId;
pub use index::{AtlasIndex, Rotation, UvLayout};
pub use pipeline::{PackReport, Packer};
