use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Map errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong while addressing, mutating or
/// (de)serializing a nested map.
///
/// "Not found" is never an error: lookups report absence through
/// `Option` / [`GetResult::NotFound`](super::GetResult::NotFound).
#[derive(Debug, Error)]
pub enum MapError {
    /// The path argument is neither null, a string, nor a list of strings.
    #[error("invalid path type: expected null, a string or a list of strings, got {0}")]
    InvalidPathType(String),

    /// A mutating operation needs at least one segment; the root itself
    /// cannot be the target of a SET.
    #[error("missing path")]
    MissingPath,

    /// A segment is empty or whitespace-only where a node must be named.
    #[error("invalid node name in path '{0}'")]
    InvalidNodeName(String),

    /// An intermediate segment holds a leaf and force mode is off.
    #[error("node '{segment}' in path '{path}' is not a map")]
    NotAContainer { path: String, segment: String },

    /// Malformed JSON, or JSON whose top level is not an object.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML, or YAML whose top level is not a mapping.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filesystem I/O error while loading or saving a store.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file extension does not name a supported document format.
    #[error("unsupported document format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A value was found but could not be converted to the requested type.
    #[error("cannot decode value at '{path}': {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },
}

impl MapError {
    /// True for errors caused by the shape of the path argument rather than
    /// by the data it addresses.
    pub fn is_path_error(&self) -> bool {
        matches!(
            self,
            MapError::InvalidPathType(_) | MapError::MissingPath | MapError::InvalidNodeName(_)
        )
    }
}
