use std::path::Path;

use macroquad::prelude::*;

use crate::config::EditorConfig;
use crate::error::MapError;
use crate::grid::TileId;
use crate::map::Map;

/// Message a front-end shows in a dialog after a file action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The action succeeded
    Info(String),
    /// The action failed; the map was not changed
    Error(String),
}

impl Notice {
    /// True for [`Notice::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }

    /// Text to show the user.
    pub fn message(&self) -> &str {
        match self {
            Notice::Info(m) | Notice::Error(m) => m,
        }
    }
}

/// Press/drag/release state of the paint button.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    active: bool,
}

impl Stroke {
    /// Whether the paint button is held.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Drives a [`Map`] from user actions.
#[derive(Debug)]
pub struct Editor {
    map: Map,
    stroke: Stroke,
}

impl Editor {
    /// Editor over a fresh map sized from `cfg`.
    pub fn new(cfg: &EditorConfig) -> Result<Self, MapError> {
        Ok(Self::with_map(Map::from_config(cfg)?))
    }

    /// Editor over an existing map.
    pub fn with_map(map: Map) -> Self {
        Editor {
            map,
            stroke: Stroke::default(),
        }
    }

    /// The edited map.
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Direct access for operations the controller does not wrap.
    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    /// Current paint-button state.
    pub fn stroke(&self) -> Stroke {
        self.stroke
    }

    /// Paint the current tile at a cell.
    pub fn place_tile(&mut self, x: i64, y: i64) -> bool {
        self.map.paint(x, y)
    }

    /// Select the brush tile.
    pub fn select_tile(&mut self, id: TileId) -> bool {
        let ok = self.map.set_current_tile(id);
        if ok {
            log::info!("Current tile set to ID: {}", id.0);
        }
        ok
    }

    /// Switch the palette.
    pub fn select_tileset(&mut self, name: &str) -> bool {
        self.map.set_current_tileset(name)
    }

    /// Resize, filling new cells from the current palette.
    pub fn resize_map(&mut self, width: usize, height: usize) -> Result<(), MapError> {
        self.map.resize(width, height)
    }

    /// Start a stroke and paint under the pointer.
    pub fn press(&mut self, world: Vec2) -> Option<(usize, usize)> {
        self.stroke.active = true;
        self.map.paint_at(world)
    }

    /// Paint under the pointer while a stroke is active.
    pub fn drag(&mut self, world: Vec2) -> Option<(usize, usize)> {
        if !self.stroke.active {
            return None;
        }
        self.map.paint_at(world)
    }

    /// End the stroke.
    pub fn release(&mut self) {
        self.stroke.active = false;
    }

    /// Save to `path`, reporting the outcome as a [`Notice`].
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Notice {
        match self.map.save_to_file(path) {
            Ok(()) => Notice::Info("Map saved successfully.".to_owned()),
            Err(e) => {
                log::error!("Failed to save map: {}", e);
                Notice::Error(format!("Failed to save map: {e}"))
            }
        }
    }

    /// Replace the map from `path`. A failed load keeps the current map.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Notice {
        match self.map.reload_from_file(path) {
            Ok(()) => {
                self.stroke = Stroke::default();
                Notice::Info("Map loaded successfully.".to_owned())
            }
            Err(e) => {
                log::error!("Failed to load map: {}", e);
                Notice::Error(format!("Failed to load map: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> Editor {
        Editor::new(&EditorConfig {
            width: 4,
            height: 4,
            tile_size: 10,
        })
        .unwrap()
    }

    #[test]
    fn drag_paints_only_while_pressed() {
        let mut ed = editor();
        assert!(ed.select_tile(TileId(2)));

        assert_eq!(ed.drag(vec2(5.0, 5.0)), None);
        assert_eq!(ed.map().get_tile_id(0, 0), TileId(0));

        assert_eq!(ed.press(vec2(5.0, 5.0)), Some((0, 0)));
        assert_eq!(ed.drag(vec2(15.0, 5.0)), Some((1, 0)));
        assert_eq!(ed.drag(vec2(500.0, 5.0)), None);
        assert!(ed.stroke().is_active());
        ed.release();
        assert_eq!(ed.drag(vec2(25.0, 5.0)), None);

        assert_eq!(ed.map().get_tile_id(0, 0), TileId(2));
        assert_eq!(ed.map().get_tile_id(1, 0), TileId(2));
        assert_eq!(ed.map().get_tile_id(2, 0), TileId(0));
    }

    #[test]
    fn failed_load_reports_and_keeps_map() {
        let mut ed = editor();
        ed.place_tile(1, 1);
        ed.select_tile(TileId(3));
        ed.place_tile(2, 2);
        let before = ed.map().clone();

        let notice = ed.load("/nonexistent/dir/map.json");
        assert!(notice.is_error());
        assert!(notice.message().starts_with("Failed to load map: "));
        assert_eq!(*ed.map(), before);
    }

    #[test]
    fn save_to_unwritable_path_is_an_error_notice() {
        let ed = editor();
        let notice = ed.save("/nonexistent/dir/map.json");
        assert!(notice.is_error());
        assert!(notice.message().starts_with("Failed to save map: "));
    }

    #[test]
    fn select_tileset_and_resize() {
        let mut ed = editor();
        assert!(ed.select_tileset("Dungeon"));
        assert_eq!(ed.map().current_tile(), TileId(4));
        ed.resize_map(6, 2).unwrap();
        assert_eq!((ed.map().width(), ed.map().height()), (6, 2));
        assert_eq!(ed.map().get_tile_id(5, 1), TileId(4));
        assert!(!ed.select_tileset("Missing"));
        assert!(ed.resize_map(usize::MAX, 2).is_err());
        assert_eq!((ed.map().width(), ed.map().height()), (6, 2));
    }
}
