//! Fixed-grid atlas - equal square cells filled left-to-right, bottom-to-top
//!
//! Slot `0` is the bottom-left cell. Slots advance along a line and move to
//! the line above when a line fills, which matches the UV convention used by
//! the game client (V grows upwards from the bottom of the texture).

use crate::identifier::TextureId;
use crate::index::AtlasIndex;
use image::{imageops, Rgba, RgbaImage};
use thiserror::Error;

/// Transparent color for unused cells
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Errors from building or filling an atlas grid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Cell size or atlas size is zero
    #[error("atlas size {size} and cell size {cell_size} must both be positive")]
    ZeroDimension { size: u32, cell_size: u32 },
    /// Atlas side is not a whole number of cells
    #[error("atlas size {size} is not divisible by cell size {cell_size}")]
    NotDivisible { size: u32, cell_size: u32 },
    /// Every cell is already used
    #[error("atlas is full ({capacity} cells), cannot place '{id}'")]
    CapacityExceeded { capacity: usize, id: String },
    /// Image handed to the grid is not exactly one cell
    #[error("'{id}' is {width}x{height}, expected a {cell_size}x{cell_size} cell")]
    InvalidCell { id: String, width: u32, height: u32, cell_size: u32 },
    /// Same identifier placed twice
    #[error("'{0}' is already placed in the atlas")]
    AlreadyPlaced(String),
}

/// Geometry of a square atlas split into square cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    size: u32,
    cell_size: u32,
}

impl GridLayout {
    /// Validate and build a layout.
    pub fn new(size: u32, cell_size: u32) -> Result<Self, GridError> {
        if size == 0 || cell_size == 0 {
            return Err(GridError::ZeroDimension { size, cell_size });
        }
        if size % cell_size != 0 {
            return Err(GridError::NotDivisible { size, cell_size });
        }
        Ok(Self { size, cell_size })
    }

    /// Atlas side length in pixels
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Cell side length in pixels
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Number of cells along one line
    pub fn cells_per_line(&self) -> u32 {
        self.size / self.cell_size
    }

    /// Total number of cells
    pub fn capacity(&self) -> usize {
        let n = self.cells_per_line() as usize;
        n * n
    }

    /// Pixel coordinates of the top-left corner of `slot`'s cell.
    ///
    /// Returns `None` for slots past the capacity.
    pub fn cell_origin(&self, slot: usize) -> Option<(u32, u32)> {
        if slot >= self.capacity() {
            return None;
        }
        let per_line = self.cells_per_line() as usize;
        let column = (slot % per_line) as u32;
        let line = (slot / per_line) as u32;

        let x = column * self.cell_size;
        let y = self.size - (line + 1) * self.cell_size;
        Some((x, y))
    }
}

/// An atlas image being filled one cell at a time
#[derive(Debug, Clone)]
pub struct Atlas {
    layout: GridLayout,
    image: RgbaImage,
    index: AtlasIndex,
}

impl Atlas {
    /// Create an empty, fully transparent atlas.
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            image: RgbaImage::from_pixel(layout.size(), layout.size(), TRANSPARENT),
            index: AtlasIndex::new(),
        }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Number of cells filled so far
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Slot the next placed texture will receive
    pub fn next_slot(&self) -> usize {
        self.index.len()
    }

    /// Copy a normalized cell image into the next free slot and record it.
    pub fn place(&mut self, id: &TextureId, cell: &RgbaImage) -> Result<usize, GridError> {
        let cell_size = self.layout.cell_size();
        if cell.dimensions() != (cell_size, cell_size) {
            return Err(GridError::InvalidCell {
                id: id.to_string(),
                width: cell.width(),
                height: cell.height(),
                cell_size,
            });
        }
        if self.index.slot(id).is_some() {
            return Err(GridError::AlreadyPlaced(id.to_string()));
        }

        let slot = self.next_slot();
        let (x, y) = self.layout.cell_origin(slot).ok_or_else(|| GridError::CapacityExceeded {
            capacity: self.layout.capacity(),
            id: id.to_string(),
        })?;

        imageops::replace(&mut self.image, cell, x as i64, y as i64);
        self.index.insert(id.clone(), slot);
        Ok(slot)
    }

    /// The composed image so far
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// The identifier → slot mapping so far
    pub fn index(&self) -> &AtlasIndex {
        &self.index
    }

    /// Split into the finished image and its mapping
    pub fn into_parts(self) -> (RgbaImage, AtlasIndex) {
        (self.image, self.index)
    }
}
