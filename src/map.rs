use macroquad::prelude::*;
use std::path::Path;

use crate::config::EditorConfig;
use crate::error::MapError;
use crate::grid::{Grid, TileId};
use crate::loader::json_loader::{decode_map_file, decode_map_str, encode_map, write_map_file};
use crate::tileset::{Tile, TileSets};

/// Editable tile map: grid, palettes and the current brush selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub(crate) grid: Grid,
    /// Pixel size of one cell
    pub tile_size: u32,
    pub(crate) tile_sets: TileSets,
    pub(crate) current_tileset: String,
    pub(crate) current_tile: TileId,
}

impl Map {
    /// New map with the default palettes, filled with their first tile.
    pub fn new(width: usize, height: usize, tile_size: u32) -> Result<Self, MapError> {
        Self::with_tile_sets(width, height, tile_size, TileSets::default_sets())
    }

    /// New map sized from `cfg`.
    pub fn from_config(cfg: &EditorConfig) -> Result<Self, MapError> {
        Self::new(cfg.width, cfg.height, cfg.tile_size)
    }

    /// New map over custom palettes. The brush starts on the first tile of
    /// the first non-empty set and every cell holds that tile.
    pub fn with_tile_sets(
        width: usize,
        height: usize,
        tile_size: u32,
        tile_sets: TileSets,
    ) -> Result<Self, MapError> {
        let (set, first) = default_selection(&tile_sets)?;
        Ok(Map {
            grid: Grid::new(width, height, first)?,
            tile_size,
            tile_sets,
            current_tileset: set,
            current_tile: first,
        })
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// The cell store.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The palette registry.
    #[inline]
    pub fn tile_sets(&self) -> &TileSets {
        &self.tile_sets
    }

    /// Name of the palette the brush belongs to.
    pub fn current_tileset(&self) -> &str {
        &self.current_tileset
    }

    /// Tile painted by [`Map::paint`].
    pub fn current_tile(&self) -> TileId {
        self.current_tile
    }

    /// Cell at `(x, y)`, or `TileId(0)` outside the map.
    pub fn get_tile_id(&self, x: i64, y: i64) -> TileId {
        self.grid.get(x, y)
    }

    /// Write a cell; `false` outside the map.
    pub fn set_tile_id(&mut self, x: i64, y: i64, id: TileId) -> bool {
        self.grid.set(x, y, id)
    }

    /// Resize, filling new cells with the first tile of the current set.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), MapError> {
        let fill = self
            .tile_sets
            .first_tile(&self.current_tileset)
            .map(|t| t.id)
            .unwrap_or(TileId::SENTINEL);
        self.resize_with(width, height, fill)
    }

    /// Resize with an explicit fill tile.
    pub fn resize_with(
        &mut self,
        width: usize,
        height: usize,
        fill: TileId,
    ) -> Result<(), MapError> {
        log::info!(
            "Resizing map {}x{} -> {}x{} (fill {})",
            self.width(),
            self.height(),
            width,
            height,
            fill.0
        );
        self.grid.resize(width, height, fill)
    }

    /// Palette names in registration order.
    pub fn tileset_names(&self) -> Vec<&str> {
        self.tile_sets.names().collect()
    }

    /// Tiles of one palette; empty for unknown names.
    pub fn tiles_for_set(&self, name: &str) -> &[Tile] {
        self.tile_sets.tiles(name)
    }

    /// Definition registered for `id`.
    pub fn tile_definition(&self, id: TileId) -> Option<&Tile> {
        self.tile_sets.get(id)
    }

    /// Switch palettes. Unknown and empty sets are rejected. The brush falls
    /// back to the set's first tile when the current one is not part of it.
    pub fn set_current_tileset(&mut self, name: &str) -> bool {
        let tiles = self.tile_sets.tiles(name);
        let Some(first) = tiles.first() else {
            return false;
        };
        if !tiles.iter().any(|t| t.id == self.current_tile) {
            self.current_tile = first.id;
        }
        self.current_tileset = name.to_owned();
        true
    }

    /// Select the brush; only registered ids are accepted.
    pub fn set_current_tile(&mut self, id: TileId) -> bool {
        if self.tile_sets.contains_tile(id) {
            self.current_tile = id;
            true
        } else {
            false
        }
    }

    /// Paint the current tile at `(x, y)`.
    pub fn paint(&mut self, x: i64, y: i64) -> bool {
        let placed = self.grid.set(x, y, self.current_tile);
        if placed {
            log::debug!("Placed tile {} at ({}, {})", self.current_tile.0, x, y);
        }
        placed
    }

    /// Paint the cell under a pixel position relative to the map origin.
    pub fn paint_at(&mut self, world: Vec2) -> Option<(usize, usize)> {
        let (x, y) = self.grid.cell_at(world, self.tile_size)?;
        self.paint(x as i64, y as i64);
        Some((x, y))
    }

    /// Register an external image as a new tile in the current set.
    pub fn import_tile(&mut self, name: &str, image: &str) -> Result<TileId, MapError> {
        let set = self.current_tileset.clone();
        self.tile_sets.add_tile(&set, name, None, Some(image))
    }

    /// Cut an atlas image into `cols x rows` tiles of the current set.
    pub fn import_atlas(
        &mut self,
        image: &str,
        image_w: u32,
        image_h: u32,
        cols: u32,
        rows: u32,
    ) -> Result<Vec<TileId>, MapError> {
        let set = self.current_tileset.clone();
        self.tile_sets
            .add_atlas(&set, image, image_w, image_h, cols, rows)
    }
}

impl Map {
    /// Load a map from a `.json` file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let path = path.as_ref();
        let map = decode_map_file(path)?;
        log::info!(
            "Loaded {}x{} map from {}",
            map.width(),
            map.height(),
            path.display()
        );
        Ok(map)
    }

    /// Decode a map from an in-memory document.
    pub fn load_from_str(json: &str) -> Result<Self, MapError> {
        decode_map_str(json, None)
    }

    /// Replace this map with the contents of `path`. On error the map is
    /// left untouched.
    pub fn reload_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), MapError> {
        *self = Self::load_from_file(path)?;
        Ok(())
    }

    /// Write the map as a pretty-printed JSON document.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), MapError> {
        let path = path.as_ref();
        write_map_file(self, path)?;
        log::info!(
            "Saved {}x{} map to {}",
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }

    /// The document [`Map::save_to_file`] writes.
    pub fn to_json_string(&self) -> Result<String, MapError> {
        encode_map(self)
    }
}

/// First non-empty set and its first tile.
pub(crate) fn default_selection(tile_sets: &TileSets) -> Result<(String, TileId), MapError> {
    tile_sets
        .names()
        .find_map(|name| tile_sets.first_tile(name).map(|t| (name.to_owned(), t.id)))
        .ok_or(MapError::EmptyTileSets)
}
