//! Text encodings of a root map.
//!
//! Both directions treat "nothing" uniformly: an absent or empty root
//! encodes to `""`, and blank text or an empty top-level object decodes to
//! an absent root.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::MapError;
use super::navigate::Container;


/// Document formats a store can be read from and written to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick a format from a file extension (`json`, `yaml`, `yml`).
    pub fn from_path(path: &Path) -> Result<Format, MapError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            _ => Err(MapError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn decode(self, text: &str) -> Result<Option<Container>, MapError> {
        match self {
            Format::Json => from_json_str(text),
            Format::Yaml => from_yaml_str(text),
        }
    }

    pub fn encode(self, root: Option<&Container>) -> Result<String, MapError> {
        match self {
            Format::Json => to_json_string(root),
            Format::Yaml => to_yaml_string(root),
        }
    }
}


/// Pretty-printed JSON (two-space indent).
pub fn to_json_string(root: Option<&Container>) -> Result<String, MapError> {
    match root {
        Some(map) if !map.is_empty() => Ok(serde_json::to_string_pretty(map)?),
        _ => Ok(String::new()),
    }
}

/// Parse a JSON object. Any other top-level value is an error.
pub fn from_json_str(text: &str) -> Result<Option<Container>, MapError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let map: Container = serde_json::from_str(text)?;
    Ok(Some(map).filter(|m| !m.is_empty()))
}

pub fn to_yaml_string(root: Option<&Container>) -> Result<String, MapError> {
    match root {
        Some(map) if !map.is_empty() => Ok(serde_yaml::to_string(map)?),
        _ => Ok(String::new()),
    }
}

/// Parse a YAML mapping with string keys.
pub fn from_yaml_str(text: &str) -> Result<Option<Container>, MapError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let map: Container = serde_yaml::from_str(text)?;
    Ok(Some(map).filter(|m| !m.is_empty()))
}
