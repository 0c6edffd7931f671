use serde::Deserialize;
use std::path::Path;

use crate::error::MapError;

/// Start-up parameters for a new map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Columns of a new map
    pub width: usize,
    /// Rows of a new map
    pub height: usize,
    /// Pixel size of one cell
    pub tile_size: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            width: 20,
            height: 15,
            tile_size: 32,
        }
    }
}

impl EditorConfig {
    /// Read a JSON config; absent fields keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let p = path.as_ref();
        let txt = std::fs::read_to_string(p).map_err(|source| MapError::Io {
            path: p.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&txt).map_err(|source| MapError::Json {
            path: Some(p.to_path_buf()),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: EditorConfig = serde_json::from_str(r#"{ "tile_size": 16 }"#).unwrap();
        assert_eq!(
            cfg,
            EditorConfig {
                width: 20,
                height: 15,
                tile_size: 16
            }
        );
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let err = EditorConfig::load_from_file("/nonexistent/editor.json").unwrap_err();
        assert!(matches!(err, MapError::Io { .. }));
    }
}
