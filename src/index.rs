//! Atlas index - the identifier → slot mapping written next to the atlas image
//!
//! The on-disk form is a flat JSON object with keys sorted and 4-space
//! indentation:
//!
//! ```json
//! {
//!     "minecraft:block/dirt": 0,
//!     "minecraft:block/stone": 1
//! }
//! ```
//!
//! The reader side mirrors what the game client does when it loads the
//! mapping: duplicate keys are rejected and slots are turned into UVs.

use crate::identifier::TextureId;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors reading or writing an atlas index
#[derive(Debug, Error)]
pub enum IndexError {
    /// File I/O error
    #[error("index I/O error: {0}")]
    Io(#[from] io::Error),
    /// Malformed JSON, duplicate keys, bad identifiers or slot values
    #[error("invalid atlas index: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identifier → slot mapping, remembering placement order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtlasIndex {
    slots: HashMap<TextureId, usize>,
    order: Vec<TextureId>,
}

impl AtlasIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` at `slot`. Returns the previous slot if `id` was present.
    pub fn insert(&mut self, id: TextureId, slot: usize) -> Option<usize> {
        let previous = self.slots.insert(id.clone(), slot);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    /// Slot of `id`, if it was packed
    pub fn slot(&self, id: &TextureId) -> Option<usize> {
        self.slots.get(id).copied()
    }

    /// Slot of `id`, falling back to slot 0 for unknown textures
    pub fn slot_or_default(&self, id: &TextureId) -> usize {
        self.slot(id).unwrap_or(0)
    }

    pub fn contains(&self, id: &TextureId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&TextureId, usize)> {
        self.order.iter().map(move |id| (id, self.slots[id]))
    }

    /// Entries keyed by the identifier string, which is the on-disk key order
    pub fn sorted_entries(&self) -> BTreeMap<String, usize> {
        self.slots.iter().map(|(id, slot)| (id.to_string(), *slot)).collect()
    }

    /// Serialize as sorted JSON with 4-space indentation (no trailing newline)
    pub fn to_json(&self) -> Result<String, IndexError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Parse an index from JSON text.
    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the index to `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), IndexError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load an index written by [`AtlasIndex::write`].
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl Serialize for AtlasIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.sorted_entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, slot) in &entries {
            map.serialize_entry(key, slot)?;
        }
        map.end()
    }
}

/// Slot values are integers; older tooling wrote them as numeric strings
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSlot {
    Number(u64),
    Text(String),
}

impl RawSlot {
    fn into_slot<E: de::Error>(self, key: &str) -> Result<usize, E> {
        let value = match self {
            RawSlot::Number(n) => n,
            RawSlot::Text(s) => s.trim().parse::<u64>().map_err(|_| {
                E::custom(format_args!("slot for '{}' is not an integer: '{}'", key, s))
            })?,
        };
        usize::try_from(value)
            .map_err(|_| E::custom(format_args!("slot for '{}' is out of range", key)))
    }
}

struct IndexVisitor;

impl<'de> Visitor<'de> for IndexVisitor {
    type Value = AtlasIndex;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of texture identifiers to slot indices")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut index = AtlasIndex::new();
        while let Some(key) = access.next_key::<String>()? {
            let raw: RawSlot = access.next_value()?;
            let slot = raw.into_slot(&key)?;
            let id: TextureId = key.parse().map_err(de::Error::custom)?;
            if index.insert(id, slot).is_some() {
                return Err(de::Error::custom(format_args!(
                    "duplicate atlas entry '{}'",
                    key
                )));
            }
        }
        Ok(index)
    }
}

impl<'de> Deserialize<'de> for AtlasIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(IndexVisitor)
    }
}

/// Rotation of a face's UV rectangle, in quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Quarter-turn count to rotation; unknown values fall back to no rotation
    pub fn from_quarter_turns(turns: u8) -> Self {
        match turns {
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            3 => Rotation::Deg270,
            _ => Rotation::Deg0,
        }
    }
}

/// UV mapping for a grid atlas with `cells_per_line` cells per side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UvLayout {
    cells_per_line: u32,
}

impl UvLayout {
    pub fn new(cells_per_line: u32) -> Self {
        Self { cells_per_line: cells_per_line.max(1) }
    }

    pub fn cells_per_line(&self) -> u32 {
        self.cells_per_line
    }

    /// Width of one cell in UV units
    pub fn cell_extent(&self) -> f32 {
        1.0 / self.cells_per_line as f32
    }

    /// Bottom-left UV corner of `slot`'s cell
    pub fn cell_uv(&self, slot: usize) -> [f32; 2] {
        let n = self.cells_per_line as usize;
        let u = (slot % n) as f32 / n as f32;
        let v = (slot / n) as f32 / n as f32;
        [u, v]
    }

    /// Corner UVs for the sub-rectangle `part = [x1, y1, x2, y2]` of a cell.
    ///
    /// `part` is in cell units (0..=1, with y measured downwards from the top
    /// of the texture). Corners come back in the order top-left, top-right,
    /// bottom-left, bottom-right of the unrotated face.
    pub fn face_uvs(&self, slot: usize, part: [f32; 4], rotation: Rotation) -> [[f32; 2]; 4] {
        let one = self.cell_extent();
        let [ou, ov] = self.cell_uv(slot);
        let [u1, v1, u2, v2] = part.map(|p| p * one);

        let corners = match rotation {
            Rotation::Deg0 => [[u1, one - v1], [u2, one - v1], [u1, one - v2], [u2, one - v2]],
            Rotation::Deg90 => [[v1, u1], [v1, u2], [v2, u1], [v2, u2]],
            Rotation::Deg180 => [[one - u1, v1], [one - u2, v1], [one - u1, v2], [one - u2, v2]],
            Rotation::Deg270 => [
                [one - v1, one - u1],
                [one - v1, one - u2],
                [one - v2, one - u1],
                [one - v2, one - u2],
            ],
        };

        corners.map(|[u, v]| [u + ou, v + ov])
    }
}
