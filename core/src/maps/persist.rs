//! Reading and writing map documents on disk.
//!
//! The format follows the file extension (see [`Format::from_path`]).
//! Writes go to a temporary file in the target directory which is then
//! renamed over the target, so readers never see a half-written document.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::codec::Format;
use super::errors::MapError;
use super::navigate::Container;


/// Read a document. A missing file reads as an absent root.
pub fn read_document(path: &Path) -> Result<Option<Container>, MapError> {
    let format = Format::from_path(path)?;
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no document on disk");
            return Ok(None);
        }
        Err(source) => return Err(io_error(path, source)),
    };
    format.decode(&text)
}

/// Write a document atomically, creating parent directories as needed.
///
/// An absent or empty root writes an empty file.
pub fn write_document(path: &Path, root: Option<&Container>) -> Result<(), MapError> {
    let format = Format::from_path(path)?;
    let text = format.encode(root)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| io_error(&parent, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| MapError::UnsupportedFormat(path.to_path_buf()))?;
    let tmp_path = parent.join(format!(".{}.tmp", file_name));
    fs::write(&tmp_path, &text).map_err(|e| io_error(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| io_error(path, e))?;

    debug!(path = %path.display(), bytes = text.len(), "wrote document");
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> MapError {
    MapError::Io {
        path: path.to_path_buf(),
        source,
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
