use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for map loading, saving and tile import.
#[derive(Debug)]
pub enum MapError {
    /// File I/O error on `path`
    Io {
        /// File that could not be read or written
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
    /// JSON encode/decode error; `path` is `None` for in-memory documents
    Json {
        /// Document the error came from, if it was a file
        path: Option<PathBuf>,
        /// Underlying serde error
        source: serde_json::Error,
    },
    /// Map files must carry a `.json` extension
    UnsupportedFormat(String),
    /// `data` length does not match `width * height`
    InvalidGridSize {
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
        /// Number of cells actually present
        len: usize,
    },
    /// A map needs at least one tile-set with at least one tile
    EmptyTileSets,
    /// Atlas cut parameters produce no usable tiles
    InvalidAtlas(String),
    /// No tile id is left above the largest registered one
    TileIdsExhausted,
    /// `width * height` cells cannot be allocated
    GridTooLarge {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            MapError::Json {
                path: Some(path),
                source,
            } => write!(f, "Invalid map JSON in {}: {}", path.display(), source),
            MapError::Json { path: None, source } => write!(f, "Invalid map JSON: {}", source),
            MapError::UnsupportedFormat(path) => {
                write!(f, "Unsupported file format: {} (expected .json)", path)
            }
            MapError::InvalidGridSize { width, height, len } => write!(
                f,
                "Map data holds {} cells but {}x{} needs {}",
                len,
                width,
                height,
                width.saturating_mul(*height)
            ),
            MapError::EmptyTileSets => write!(f, "Map has no tile-sets with tiles"),
            MapError::InvalidAtlas(msg) => write!(f, "Invalid tileset split: {}", msg),
            MapError::TileIdsExhausted => write!(f, "No free tile id left (u32::MAX is taken)"),
            MapError::GridTooLarge { width, height } => {
                write!(f, "Grid of {}x{} cells is too large", width, height)
            }
        }
    }
}

impl error::Error for MapError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            MapError::Io { source, .. } => Some(source),
            MapError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_message_names_expected_count() {
        let err = MapError::InvalidGridSize {
            width: 3,
            height: 2,
            len: 5,
        };
        assert_eq!(err.to_string(), "Map data holds 5 cells but 3x2 needs 6");
    }

    #[test]
    fn io_error_exposes_source() {
        let err = MapError::Io {
            path: PathBuf::from("missing.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(error::Error::source(&err).is_some());
        assert!(err.to_string().contains("missing.json"));
    }
}
