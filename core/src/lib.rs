//! Dotted-path access to nested, dynamically shaped key-value trees.
//!
//! ```
//! use pathmap_core::MapStore;
//! use serde_json::json;
//!
//! let mut store = MapStore::new();
//! store.set("server.tls.port", json!(443), false).unwrap();
//! assert!(store.has("server.tls"));
//! assert!(store.take_modified());
//! ```

pub mod maps;

pub use maps::{Container, DottedPath, GetResult, MapError, MapStore, PathSpec};
