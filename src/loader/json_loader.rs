// src/loader/json_loader.rs
use crate::error::MapError;
use crate::grid::{Grid, TileId};
use crate::map::{default_selection, Map};
use crate::tileset::TileSets;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;

#[derive(Serialize)]
struct JsonMapOut<'a> {
    width: usize,
    height: usize,
    tile_size: u32,
    tile_sets: &'a TileSets,
    current_tileset: &'a str,
    current_tile_id: TileId,
    data: &'a [TileId],
}

#[derive(Deserialize)]
struct JsonMap {
    width: usize,
    height: usize,
    tile_size: u32,
    // legacy files predate palettes
    #[serde(default)]
    tile_sets: Option<TileSets>,
    #[serde(default)]
    current_tileset: Option<String>,
    #[serde(default)]
    current_tile_id: Option<TileId>,
    data: Vec<TileId>,
}

/// Pretty-printed document with 4-space indentation.
pub fn encode_map(map: &Map) -> Result<String, MapError> {
    let doc = JsonMapOut {
        width: map.width(),
        height: map.height(),
        tile_size: map.tile_size,
        tile_sets: map.tile_sets(),
        current_tileset: map.current_tileset(),
        current_tile_id: map.current_tile(),
        data: map.grid().as_slice(),
    };

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    doc.serialize(&mut ser)
        .map_err(|source| MapError::Json { path: None, source })?;
    Ok(String::from_utf8(buf).expect("serde_json writes UTF-8"))
}

/// Decode a document; `path` only labels errors.
pub fn decode_map_str(txt: &str, path: Option<&Path>) -> Result<Map, MapError> {
    let j: JsonMap = serde_json::from_str(txt).map_err(|source| MapError::Json {
        path: path.map(Path::to_path_buf),
        source,
    })?;

    let tile_sets = match j.tile_sets {
        Some(sets) => sets,
        None => {
            log::warn!("Map has no tile_sets; using default palettes");
            TileSets::default_sets()
        }
    };

    let grid = Grid::from_flat(j.width, j.height, j.data)?;
    let (first_set, _) = default_selection(&tile_sets)?;

    let current_tileset = match j.current_tileset {
        Some(name) if tile_sets.first_tile(&name).is_some() => name,
        Some(name) => {
            log::warn!("Unknown current_tileset '{}'; using '{}'", name, first_set);
            first_set
        }
        None => first_set,
    };

    let set_default = tile_sets
        .first_tile(&current_tileset)
        .map(|t| t.id)
        .ok_or(MapError::EmptyTileSets)?;
    let current_tile = match j.current_tile_id {
        Some(id) if tile_sets.contains_tile(id) => id,
        Some(id) => {
            log::warn!("Unknown current_tile_id {}; using {}", id.0, set_default.0);
            set_default
        }
        None => set_default,
    };

    Ok(Map {
        grid,
        tile_size: j.tile_size,
        tile_sets,
        current_tileset,
        current_tile,
    })
}

/// Decode a `.json` file.
pub fn decode_map_file(path: &Path) -> Result<Map, MapError> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::UnsupportedFormat(path.display().to_string()));
    }

    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_map_str(&txt, Some(path))
}

/// Encode and write `map` to `path`.
pub fn write_map_file(map: &Map, path: &Path) -> Result<(), MapError> {
    let txt = encode_map(map)?;
    std::fs::write(path, txt).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })
}
