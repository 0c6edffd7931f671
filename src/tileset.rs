use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use macroquad::prelude::Color;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MapError;
use crate::TileId;

/// Pixel sub-rectangle of an image, used for tiles cut out of an atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRegion {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// One paintable tile definition.
///
/// A tile is normally drawn either as a flat `color` or from an external
/// `image`, but both keys are kept when present (image tiles usually carry a
/// fallback color) and a tile with neither is still a valid definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Key stored in the grid
    pub id: TileId,
    /// Palette label
    pub name: String,
    /// `"#rrggbb"` fill
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Path of an external image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Sub-rectangle of `image` for atlas tiles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<TileRegion>,
}

impl Tile {
    /// Flat-color tile.
    pub fn color(id: u32, name: &str, color: &str) -> Self {
        Tile {
            id: TileId(id),
            name: name.to_owned(),
            color: Some(color.to_owned()),
            image: None,
            region: None,
        }
    }

    /// Image path, if the tile has one.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// `"#rrggbb"` parsed for drawing.
    pub fn fill_color(&self) -> Option<Color> {
        let hex = self.color.as_deref()?.strip_prefix('#')?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Color::from_hex)
    }
}

/// Ordered `set name -> tiles` registry with a reverse `TileId` lookup.
///
/// The first set is the default palette. Order is preserved through JSON.
#[derive(Debug, Clone, Default)]
pub struct TileSets {
    sets: Vec<(String, Vec<Tile>)>,
    lookup: HashMap<TileId, (usize, usize)>,
}

impl PartialEq for TileSets {
    fn eq(&self, other: &Self) -> bool {
        self.sets == other.sets
    }
}

impl TileSets {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Palettes the editor starts with and legacy files fall back to.
    pub fn default_sets() -> Self {
        let mut sets = TileSets::new();
        sets.insert_set(
            "Field",
            vec![
                Tile::color(0, "Grass", "#64b464"),
                Tile::color(1, "Road", "#cda673"),
                Tile::color(2, "Water", "#4fa3d1"),
                Tile::color(3, "Mountain", "#8e8b7b"),
            ],
        );
        sets.insert_set(
            "Dungeon",
            vec![
                Tile::color(4, "Floor", "#b0b0b0"),
                Tile::color(5, "Wall", "#5c5c5c"),
                Tile::color(6, "Water Pit", "#1f4c68"),
                Tile::color(7, "Lava", "#d35400"),
            ],
        );
        sets
    }

    fn rebuild_lookup(&mut self) {
        self.lookup.clear();
        for (si, (_, tiles)) in self.sets.iter().enumerate() {
            for (ti, tile) in tiles.iter().enumerate() {
                self.lookup.insert(tile.id, (si, ti));
            }
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.sets.iter().position(|(n, _)| n == name)
    }

    fn push_tiles(&mut self, set: &str, tiles: Vec<Tile>) {
        match self.position(set) {
            Some(i) => self.sets[i].1.extend(tiles),
            None => self.sets.push((set.to_owned(), tiles)),
        }
        self.rebuild_lookup();
    }

    /// Add a set, or replace the tiles of an existing one in place.
    pub fn insert_set(&mut self, name: &str, tiles: Vec<Tile>) {
        match self.position(name) {
            Some(i) => self.sets[i].1 = tiles,
            None => self.sets.push((name.to_owned(), tiles)),
        }
        self.rebuild_lookup();
    }

    /// True when no set is registered.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Set names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|(n, _)| n.as_str())
    }

    /// Name of the first registered set.
    pub fn first_name(&self) -> Option<&str> {
        self.sets.first().map(|(n, _)| n.as_str())
    }

    /// Whether a set called `name` exists, even an empty one.
    pub fn contains_set(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Tiles of `name`; empty for unknown sets.
    pub fn tiles(&self, name: &str) -> &[Tile] {
        self.position(name)
            .map(|i| self.sets[i].1.as_slice())
            .unwrap_or(&[])
    }

    /// First tile of `name`.
    pub fn first_tile(&self, name: &str) -> Option<&Tile> {
        self.tiles(name).first()
    }

    /// Definition registered for `id`.
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.lookup.get(&id).map(|&(si, ti)| &self.sets[si].1[ti])
    }

    /// Whether `id` is registered in any set.
    pub fn contains_tile(&self, id: TileId) -> bool {
        self.lookup.contains_key(&id)
    }

    /// One past the largest registered id, `None` once `u32::MAX` is taken.
    pub fn next_id(&self) -> Option<TileId> {
        match self.lookup.keys().max() {
            Some(id) => id.0.checked_add(1).map(TileId),
            None => Some(TileId(0)),
        }
    }

    /// Register a tile in `set` (created if missing) with the next free id.
    pub fn add_tile(
        &mut self,
        set: &str,
        name: &str,
        color: Option<&str>,
        image: Option<&str>,
    ) -> Result<TileId, MapError> {
        let id = self.next_id().ok_or(MapError::TileIdsExhausted)?;
        self.push_tiles(
            set,
            vec![Tile {
                id,
                name: name.to_owned(),
                color: color.map(str::to_owned),
                image: image.map(str::to_owned),
                region: None,
            }],
        );
        log::info!("Registered tile {} ({}) in set '{}'", id.0, name, set);
        Ok(id)
    }

    /// Cut `image` (`image_w x image_h` pixels) into `cols x rows` tiles.
    ///
    /// Regions are registered row-major with consecutive ids and named
    /// `<file stem>_<n>`. Remainder pixels on the right/bottom edge are
    /// ignored.
    pub fn add_atlas(
        &mut self,
        set: &str,
        image: &str,
        image_w: u32,
        image_h: u32,
        cols: u32,
        rows: u32,
    ) -> Result<Vec<TileId>, MapError> {
        if cols == 0 || rows == 0 {
            return Err(MapError::InvalidAtlas(format!(
                "{cols}x{rows} divisions for {image}"
            )));
        }
        let tile_w = image_w / cols;
        let tile_h = image_h / rows;
        if tile_w == 0 || tile_h == 0 {
            return Err(MapError::InvalidAtlas(format!(
                "{image_w}x{image_h} px image cannot be cut into {cols}x{rows} tiles"
            )));
        }

        let first = self.next_id().ok_or(MapError::TileIdsExhausted)?.0;
        let count = cols.checked_mul(rows).ok_or(MapError::TileIdsExhausted)?;
        // ids first..=first + count - 1 must all fit
        first
            .checked_add(count - 1)
            .ok_or(MapError::TileIdsExhausted)?;

        let stem = Path::new(image)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("tile");

        let mut tiles = Vec::with_capacity(count as usize);
        for row in 0..rows {
            for col in 0..cols {
                let n = row * cols + col;
                tiles.push(Tile {
                    id: TileId(first + n),
                    name: format!("{stem}_{n}"),
                    color: None,
                    image: Some(image.to_owned()),
                    region: Some(TileRegion {
                        x: col * tile_w,
                        y: row * tile_h,
                        width: tile_w,
                        height: tile_h,
                    }),
                });
            }
        }
        let ids: Vec<TileId> = tiles.iter().map(|t| t.id).collect();

        self.push_tiles(set, tiles);
        log::info!(
            "Split {} into {} tiles of {}x{} px in set '{}'",
            image,
            ids.len(),
            tile_w,
            tile_h,
            set
        );
        Ok(ids)
    }
}

impl Serialize for TileSets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sets.len()))?;
        for (name, tiles) in &self.sets {
            map.serialize_entry(name, tiles)?;
        }
        map.end()
    }
}

struct TileSetsVisitor;

impl<'de> Visitor<'de> for TileSetsVisitor {
    type Value = TileSets;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping tile-set names to tile lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TileSets, A::Error> {
        let mut sets = TileSets::new();
        while let Some((name, tiles)) = access.next_entry::<String, Vec<Tile>>()? {
            match sets.position(&name) {
                Some(i) => sets.sets[i].1 = tiles,
                None => sets.sets.push((name, tiles)),
            }
        }
        sets.rebuild_lookup();
        Ok(sets)
    }
}

impl<'de> Deserialize<'de> for TileSets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<TileSets, D::Error> {
        deserializer.deserialize_map(TileSetsVisitor)
    }
}
