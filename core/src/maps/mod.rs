//! Nested maps addressed by dotted paths.
//!
//! Paths like `server.tls.port` are parsed into segments, resolved against
//! a tree of `serde_json` objects, and used to read, write, test and delete
//! values at any depth. [`MapStore`] owns a tree and tracks whether it has
//! changed; the free functions in [`access`] work on a tree the caller owns.

pub mod access;
pub mod codec;
pub mod errors;
pub mod navigate;
pub mod path;
pub mod persist;
pub mod store;

pub use access::{clear, get, get_as, get_default, has, leaf_paths, set, GetResult};
pub use codec::{from_json_str, from_yaml_str, to_json_string, to_yaml_string, Format};
pub use errors::MapError;
pub use navigate::{ensure_parent, is_container, locate_parent, Container};
pub use path::{DottedPath, PathSpec};
pub use store::MapStore;
