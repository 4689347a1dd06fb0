//! Recoloring of grayscale textures (grass, foliage, water) with a fixed tint
//!
//! Vanilla resource packs ship biome-tinted textures in grayscale. Before they
//! are baked into the atlas, listed textures are converted to luma and pushed
//! through a black → tint → white gradient, keeping their alpha channel.

use crate::color::{parse_tint, ColorError};
use crate::identifier::{IdentifierError, TextureId};
use image::{Rgb, Rgba, RgbaImage};
use std::collections::BTreeMap;
use thiserror::Error;

/// Luma value where the gradient passes through the tint color
pub const MIDPOINT: u8 = 127;

const PLAINS_GRASS: [u8; 3] = [0x91, 0xbd, 0x59];
const PLAINS_FOLIAGE: [u8; 3] = [0x77, 0xab, 0x2f];
const BIRCH_FOLIAGE: [u8; 3] = [0x80, 0xa7, 0x55];
const SPRUCE_FOLIAGE: [u8; 3] = [0x61, 0x99, 0x61];
const LILY_PAD: [u8; 3] = [0x20, 0x80, 0x30];
const WATER: [u8; 3] = [0x3f, 0x76, 0xe4];

/// Built-in tints for vanilla textures that are stored in grayscale
const BUILTIN_RECOLORS: &[(&str, [u8; 3])] = &[
    ("minecraft:block/grass_block_top", PLAINS_GRASS),
    ("minecraft:block/grass_block_side_overlay", PLAINS_GRASS),
    ("minecraft:block/short_grass", PLAINS_GRASS),
    ("minecraft:block/tall_grass_top", PLAINS_GRASS),
    ("minecraft:block/tall_grass_bottom", PLAINS_GRASS),
    ("minecraft:block/fern", PLAINS_GRASS),
    ("minecraft:block/large_fern_top", PLAINS_GRASS),
    ("minecraft:block/large_fern_bottom", PLAINS_GRASS),
    ("minecraft:block/sugar_cane", PLAINS_GRASS),
    ("minecraft:block/oak_leaves", PLAINS_FOLIAGE),
    ("minecraft:block/jungle_leaves", PLAINS_FOLIAGE),
    ("minecraft:block/acacia_leaves", PLAINS_FOLIAGE),
    ("minecraft:block/dark_oak_leaves", PLAINS_FOLIAGE),
    ("minecraft:block/mangrove_leaves", PLAINS_FOLIAGE),
    ("minecraft:block/vine", PLAINS_FOLIAGE),
    ("minecraft:block/birch_leaves", BIRCH_FOLIAGE),
    ("minecraft:block/spruce_leaves", SPRUCE_FOLIAGE),
    ("minecraft:block/lily_pad", LILY_PAD),
    ("minecraft:block/water_still", WATER),
    ("minecraft:block/water_flow", WATER),
    ("minecraft:block/water_overlay", WATER),
];

/// Errors from building a recolor table out of config entries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecolorError {
    /// Table key is not a valid texture identifier
    #[error("recolor key '{key}': {source}")]
    Identifier {
        key: String,
        #[source]
        source: IdentifierError,
    },
    /// Tint value could not be parsed
    #[error("recolor '{key}' = '{value}': {source}")]
    Color {
        key: String,
        value: String,
        #[source]
        source: ColorError,
    },
}

/// Mapping from texture identifier to the tint applied before placement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecolorTable {
    tints: BTreeMap<TextureId, Rgb<u8>>,
}

impl RecolorTable {
    /// An empty table (nothing gets recolored)
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the built-in vanilla tints
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (id, rgb) in BUILTIN_RECOLORS {
            // Built-in keys are always well-formed
            if let Ok(id) = id.parse() {
                table.insert(id, Rgb(*rgb));
            }
        }
        table
    }

    /// Build a table from config entries, optionally on top of the built-ins.
    ///
    /// Config entries override built-in tints for the same identifier.
    pub fn from_entries<'a, I>(entries: I, include_builtin: bool) -> Result<Self, RecolorError>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut table = if include_builtin { Self::builtin() } else { Self::new() };

        for (key, value) in entries {
            let id: TextureId = key
                .parse()
                .map_err(|source| RecolorError::Identifier { key: key.clone(), source })?;
            let tint = parse_tint(value).map_err(|source| RecolorError::Color {
                key: key.clone(),
                value: value.clone(),
                source,
            })?;
            table.insert(id, tint);
        }

        Ok(table)
    }

    /// Add or replace a tint
    pub fn insert(&mut self, id: TextureId, tint: Rgb<u8>) {
        self.tints.insert(id, tint);
    }

    /// Tint for an identifier, if it is listed
    pub fn get(&self, id: &TextureId) -> Option<Rgb<u8>> {
        self.tints.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.tints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TextureId, &Rgb<u8>)> {
        self.tints.iter()
    }
}

/// ITU-R 601-2 luma transform, rounded to the nearest level
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114 + 500) / 1000) as u8
}

/// Map a luma value onto the black → tint → white gradient.
pub fn colorize(level: u8, tint: Rgb<u8>) -> Rgb<u8> {
    let mut out = [0u8; 3];
    for channel in 0..3 {
        let mid = tint[channel] as f32;
        let value = if level <= MIDPOINT {
            let t = level as f32 / MIDPOINT as f32;
            mid * t
        } else {
            let t = (level - MIDPOINT) as f32 / (255 - MIDPOINT) as f32;
            mid + (255.0 - mid) * t
        };
        out[channel] = value.round().clamp(0.0, 255.0) as u8;
    }
    Rgb(out)
}

/// Recolor `image` with `tint`, keeping every alpha value unchanged.
pub fn recolor(image: &RgbaImage, tint: Rgb<u8>) -> RgbaImage {
    // Precompute the 256-entry gradient, every pixel is a lookup
    let lut: Vec<Rgb<u8>> = (0..=255u8).map(|level| colorize(level, tint)).collect();

    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let Rgb([nr, ng, nb]) = lut[luma(r, g, b) as usize];
        Rgba([nr, ng, nb, a])
    })
}
