use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Largest cell count a grid may hold; keeps the cell buffer within `isize::MAX` bytes.
pub const MAX_CELLS: usize = isize::MAX as usize / std::mem::size_of::<TileId>();

/// Integer key identifying a paintable cell type, unique across all tile-sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl TileId {
    /// Returned by [`Grid::get`] for coordinates outside the grid.
    pub const SENTINEL: TileId = TileId(0);

    /// The raw integer key.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Row-major grid of tile IDs, `height` rows of `width` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<TileId>,
}

fn cell_count(width: usize, height: usize) -> Result<usize, MapError> {
    width
        .checked_mul(height)
        .filter(|&n| n <= MAX_CELLS)
        .ok_or(MapError::GridTooLarge { width, height })
}

impl Grid {
    /// Grid with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: TileId) -> Result<Self, MapError> {
        let len = cell_count(width, height)?;
        Ok(Grid {
            width,
            height,
            cells: vec![fill; len],
        })
    }

    /// Rebuild a grid from its flattened row-major form.
    pub fn from_flat(width: usize, height: usize, data: Vec<TileId>) -> Result<Self, MapError> {
        if width.checked_mul(height) != Some(data.len()) {
            return Err(MapError::InvalidGridSize {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Grid {
            width,
            height,
            cells: data,
        })
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells, row-major.
    #[inline]
    pub fn as_slice(&self) -> &[TileId] {
        &self.cells
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Cell at `(x, y)`, or [`TileId::SENTINEL`] outside the grid.
    pub fn get(&self, x: i64, y: i64) -> TileId {
        self.index(x, y)
            .map(|i| self.cells[i])
            .unwrap_or(TileId::SENTINEL)
    }

    /// Writes the cell and reports whether `(x, y)` was in bounds.
    pub fn set(&mut self, x: i64, y: i64, id: TileId) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = id;
                true
            }
            None => false,
        }
    }

    /// Crop or pad to `width x height`, keeping the top-left overlap.
    ///
    /// An oversized request fails without touching the grid.
    pub fn resize(&mut self, width: usize, height: usize, fill: TileId) -> Result<(), MapError> {
        let mut cells = vec![fill; cell_count(width, height)?];
        let keep_w = self.width.min(width);
        for y in 0..self.height.min(height) {
            let src = y * self.width;
            let dst = y * width;
            cells[dst..dst + keep_w].copy_from_slice(&self.cells[src..src + keep_w]);
        }
        self.width = width;
        self.height = height;
        self.cells = cells;
        Ok(())
    }

    /// Cell under a pixel position when each cell is `tile_size` pixels wide.
    pub fn cell_at(&self, world: Vec2, tile_size: u32) -> Option<(usize, usize)> {
        if tile_size == 0 || world.x < 0.0 || world.y < 0.0 {
            return None;
        }
        let ts = tile_size as f32;
        let x = (world.x / ts).floor() as i64;
        let y = (world.y / ts).floor() as i64;
        self.index(x, y).map(|_| (x as usize, y as usize))
    }

    /// Exactly `height` rows of `width` cells; rows are empty when `width` is 0.
    pub fn rows(&self) -> impl Iterator<Item = &[TileId]> {
        let w = self.width;
        (0..self.height).map(move |y| &self.cells[y * w..(y + 1) * w])
    }
}
