//! Stateful map store.
//!
//! Owns one root map (or none) and a modified flag. Every path operation
//! delegates to the free functions in [`access`](super::access); the store
//! only adds ownership, the flag, and bulk import/export.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::access::{self, GetResult};
use super::codec::{self, Format};
use super::errors::MapError;
use super::navigate::Container;
use super::path::PathSpec;
use super::persist;


/// A nested map addressed by dotted paths, with dirty tracking.
///
/// `set` and `clear` return the value previously stored at the path.
/// Storing `Value::Null` stores a null; it is not a delete.
///
/// Cloning a store copies the whole tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapStore {
    inner: Option<Container>,
    modified: bool,
}

impl MapStore {
    /// Create an empty, unmodified store.
    pub fn new() -> Self {
        MapStore::default()
    }

    /// Wrap an existing map. An empty map is stored as absent.
    pub fn from_container(map: Container) -> Self {
        MapStore {
            inner: Some(map).filter(|m| !m.is_empty()),
            modified: false,
        }
    }

    /// Read a JSON or YAML file (by extension). A missing file gives an
    /// empty store. The loaded store is not marked modified.
    pub fn load(path: &Path) -> Result<Self, MapError> {
        Ok(MapStore {
            inner: persist::read_document(path)?,
            modified: false,
        })
    }

    /// Write the store to a JSON or YAML file (by extension).
    ///
    /// Does not touch the modified flag; callers decide when a save counts
    /// as a checkpoint via [`take_modified`](Self::take_modified).
    pub fn save(&self, path: &Path) -> Result<(), MapError> {
        persist::write_document(path, self.inner.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.inner.as_ref().map_or(true, Container::is_empty)
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Return the modified flag and reset it.
    pub fn take_modified(&mut self) -> bool {
        std::mem::replace(&mut self.modified, false)
    }

    /// The root map, or `None` when the store is empty.
    pub fn container(&self) -> Option<&Container> {
        self.inner.as_ref().filter(|m| !m.is_empty())
    }

    /// Give up the root map.
    pub fn into_container(self) -> Option<Container> {
        self.inner
    }

    pub fn has<'p>(&self, path: impl Into<PathSpec<'p>>) -> bool {
        access::has(self.inner.as_ref(), path)
    }

    pub fn get<'p>(&self, path: impl Into<PathSpec<'p>>) -> Result<GetResult<'_>, MapError> {
        access::get(self.inner.as_ref(), path)
    }

    pub fn get_default<'a, 'p>(
        &'a self,
        path: impl Into<PathSpec<'p>>,
        default: &'a Value,
    ) -> Result<GetResult<'a>, MapError> {
        access::get_default(self.inner.as_ref(), path, default)
    }

    /// Typed lookup; see [`access::get_as`].
    pub fn get_as<'p, T: DeserializeOwned>(
        &self,
        path: impl Into<PathSpec<'p>>,
    ) -> Result<Option<T>, MapError> {
        access::get_as(self.inner.as_ref(), path)
    }

    /// Store `value` at `path` and mark the store modified.
    pub fn set<'p>(
        &mut self,
        path: impl Into<PathSpec<'p>>,
        value: Value,
        force: bool,
    ) -> Result<Option<Value>, MapError> {
        let previous = access::set(&mut self.inner, path, value, force)?;
        self.modified = true;
        Ok(previous)
    }

    /// Remove the value at `path`. Only an actual removal marks the store
    /// modified.
    pub fn clear<'p>(&mut self, path: impl Into<PathSpec<'p>>) -> Result<Option<Value>, MapError> {
        let removed = access::clear(&mut self.inner, path)?;
        if removed.is_some() {
            self.modified = true;
        }
        Ok(removed)
    }

    /// Every leaf path in the store, sorted.
    pub fn leaf_paths(&self) -> Vec<String> {
        access::leaf_paths(self.inner.as_ref())
    }

    /// Replace the whole content with a JSON object. On error the store is
    /// left unchanged.
    pub fn import(&mut self, json: &str) -> Result<(), MapError> {
        self.import_as(Format::Json, json)
    }

    /// Replace the whole content with a YAML mapping. On error the store is
    /// left unchanged.
    pub fn import_yaml(&mut self, yaml: &str) -> Result<(), MapError> {
        self.import_as(Format::Yaml, yaml)
    }

    /// Indented JSON, or `""` when the store is empty.
    pub fn export(&self) -> Result<String, MapError> {
        codec::to_json_string(self.inner.as_ref())
    }

    /// YAML, or `""` when the store is empty.
    pub fn export_yaml(&self) -> Result<String, MapError> {
        codec::to_yaml_string(self.inner.as_ref())
    }

    /// Drop all content and the modified flag.
    pub fn reset(&mut self) -> &mut Self {
        self.inner = None;
        self.modified = false;
        debug!("store reset");
        self
    }

    fn import_as(&mut self, format: Format, text: &str) -> Result<(), MapError> {
        let map = format.decode(text)?;
        debug!(?format, keys = map.as_ref().map_or(0, Container::len), "imported document");
        self.inner = map;
        self.modified = true;
        Ok(())
    }
}

impl From<Container> for MapStore {
    fn from(map: Container) -> Self {
        MapStore::from_container(map)
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;

    fn store_of(v: Value) -> MapStore {
        match v {
            Value::Object(m) => MapStore::from_container(m),
            other => panic!("expected object fixture, got {:?}", other),
        }
    }

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("pathmap_store_tests").join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn new_store_is_empty_and_clean() {
        let store = MapStore::new();
        assert!(store.is_empty());
        assert!(!store.is_modified());
        assert!(store.container().is_none());
        assert!(!store.has(""));
    }

    #[test]
    fn from_empty_container_is_empty() {
        let store = MapStore::from_container(Container::new());
        assert!(store.is_empty());
        assert_eq!(store.into_container(), None);
    }

    #[test]
    fn set_and_get() {
        let mut store = MapStore::new();
        assert_eq!(store.set("a.b.c", json!(1), true).unwrap(), None);
        match store.get("a.b.c").unwrap() {
            GetResult::Single(v) => assert_eq!(v, &json!(1)),
            other => panic!("expected Single, got {:?}", other),
        }
        assert!(store.has("a.b"));
        assert!(store.is_modified());
    }

    #[test]
    fn set_returns_previous_value() {
        let mut store = store_of(json!({"config": {"timeout": 1000}}));
        let prev = store.set("config.timeout", json!(5000), false).unwrap();
        assert_eq!(prev, Some(json!(1000)));
    }

    #[test]
    fn set_null_is_stored_not_deleted() {
        let mut store = store_of(json!({"token": "abc"}));
        store.set("token", Value::Null, false).unwrap();
        assert!(store.has("token"));
        assert_eq!(store.get("token").unwrap().value(), Some(&Value::Null));
    }

    #[test]
    fn failed_set_does_not_mark_modified() {
        let mut store = store_of(json!({"a": 5}));
        assert!(store.set("a.b", json!(1), false).is_err());
        assert!(!store.is_modified());
        assert!(store.set("", json!(1), true).is_err());
        assert!(!store.is_modified());
    }

    #[test]
    fn force_set_over_leaf() {
        let mut store = store_of(json!({"a": 5}));
        store.set("a.b", json!(1), true).unwrap();
        assert_eq!(store.get("a.b").unwrap().value(), Some(&json!(1)));
    }

    #[test]
    fn get_default_on_store() {
        let store = store_of(json!({"retries": 3}));
        let fallback = json!(10);
        assert_eq!(
            store.get_default("retries", &fallback).unwrap().value(),
            Some(&json!(3))
        );
        assert_eq!(
            store.get_default("backoff.ms", &fallback).unwrap().value(),
            Some(&fallback)
        );
    }

    #[test]
    fn get_as_on_store() {
        let store = store_of(json!({"alerts": {"targets": ["pm", "ops"]}}));
        let targets: Option<Vec<String>> = store.get_as("alerts.targets").unwrap();
        assert_eq!(targets, Some(vec!["pm".to_string(), "ops".to_string()]));
    }

    #[test]
    fn clear_returns_removed_and_marks_modified() {
        let mut store = store_of(json!({"a": {"b": 1, "c": 2}}));
        assert_eq!(store.clear("a.b").unwrap(), Some(json!(1)));
        assert!(store.take_modified());
        assert!(!store.is_modified());
    }

    #[test]
    fn clear_missing_does_not_mark_modified() {
        let mut store = store_of(json!({"a": 1}));
        assert_eq!(store.clear("z").unwrap(), None);
        assert!(!store.is_modified());
    }

    #[test]
    fn clear_root_empties_store() {
        let mut store = store_of(json!({"a": 1, "b": 2}));
        let removed = store.clear("").unwrap();
        assert_eq!(removed, Some(json!({"a": 1, "b": 2})));
        assert!(store.is_empty());
        assert!(store.container().is_none());
        assert!(store.is_modified());
    }

    #[test]
    fn clearing_last_key_collapses_to_absent() {
        let mut store = store_of(json!({"a": {"b": 1}}));
        store.clear("a.b").unwrap();
        assert!(!store.has("a"));
        assert_eq!(store.clone().into_container(), None);
        assert_eq!(store.export().unwrap(), "");
    }

    #[test]
    fn take_modified_resets() {
        let mut store = MapStore::new();
        assert!(!store.take_modified());
        store.set("x", json!(1), false).unwrap();
        assert!(store.take_modified());
        assert!(!store.take_modified());
    }

    #[test]
    fn import_replaces_content() {
        let mut store = store_of(json!({"old": 1}));
        store.import(r#"{"new": {"k": "v"}}"#).unwrap();
        assert!(!store.has("old"));
        assert_eq!(store.get("new.k").unwrap().value(), Some(&json!("v")));
        assert!(store.is_modified());
    }

    #[test]
    fn import_failure_leaves_state() {
        let mut store = store_of(json!({"keep": true}));
        assert!(matches!(store.import("{ broken"), Err(MapError::Json(_))));
        assert!(matches!(store.import("[1, 2]"), Err(MapError::Json(_))));
        assert!(store.has("keep"));
        assert!(!store.is_modified());
    }

    #[test]
    fn import_blank_empties_store() {
        let mut store = store_of(json!({"keep": true}));
        store.import("   ").unwrap();
        assert!(store.is_empty());
        assert!(store.is_modified());
    }

    #[test]
    fn export_empty_is_empty_string() {
        assert_eq!(MapStore::new().export().unwrap(), "");
        assert_eq!(MapStore::new().export_yaml().unwrap(), "");
    }

    #[test]
    fn export_import_round_trip() {
        let source = store_of(json!({
            "server": {"host": "localhost", "port": 8080, "tls": {"enabled": false}},
            "tags": ["a", "b"],
            "owner": null,
            "ratio": 0.25
        }));
        let mut copy = MapStore::new();
        copy.import(&source.export().unwrap()).unwrap();
        for path in source.leaf_paths() {
            assert_eq!(
                copy.get(&path).unwrap().value(),
                source.get(&path).unwrap().value(),
                "mismatch at {}",
                path
            );
        }
        assert_eq!(copy.container(), source.container());
    }

    #[test]
    fn yaml_import_export() {
        let mut store = MapStore::new();
        store.import_yaml("db:\n  host: example\n  pool: 4\n").unwrap();
        let pool: Option<u32> = store.get_as("db.pool").unwrap();
        assert_eq!(pool, Some(4));
        let mut copy = MapStore::new();
        copy.import_yaml(&store.export_yaml().unwrap()).unwrap();
        assert_eq!(copy.container(), store.container());
    }

    #[test]
    fn reset_clears_everything_and_chains() {
        let mut store = MapStore::new();
        store.set("a", json!(1), false).unwrap();
        let after = store.reset();
        assert!(after.is_empty());
        assert!(!after.is_modified());
        after.set("b", json!(2), false).unwrap();
        assert!(store.has("b"));
    }

    #[test]
    fn clone_is_deep() {
        let mut store = store_of(json!({"a": {"b": 1}}));
        let snapshot = store.clone();
        store.set("a.b", json!(2), false).unwrap();
        assert_eq!(snapshot.get("a.b").unwrap().value(), Some(&json!(1)));
    }

    #[test]
    fn save_and_load() {
        let dir = test_dir("save_load");
        let file = dir.join("state.json");
        let mut store = MapStore::new();
        store.set("agent.worker1.health", json!("ok"), false).unwrap();
        store.save(&file).unwrap();

        let loaded = MapStore::load(&file).unwrap();
        assert!(!loaded.is_modified());
        assert_eq!(
            loaded.get("agent.worker1.health").unwrap().value(),
            Some(&json!("ok"))
        );
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = test_dir("load_missing");
        let store = MapStore::load(&dir.join("absent.yaml")).unwrap();
        assert!(store.is_empty());
    }
}
