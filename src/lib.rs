#![warn(missing_docs)]

//! Tile map editing model: a grid of tile IDs, tile-set palettes and a flat
//! JSON document format, plus a small controller for front-ends.

mod config;
mod editor;
mod error;
mod grid;
mod loader {
    pub mod json_loader;
}
mod map;
mod tileset;

pub use config::EditorConfig;
pub use editor::{Editor, Notice, Stroke};
pub use error::MapError;
pub use grid::{Grid, TileId};
pub use map::Map;
pub use tileset::{Tile, TileRegion, TileSets};
