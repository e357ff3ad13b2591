//! Path-addressed operations over an explicitly passed root map.
//!
//! The root is `Option<&Container>` for reads and `&mut Option<Container>`
//! for writes: an absent root and an empty root read the same, and a write
//! that empties the root leaves it absent.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::errors::MapError;
use super::navigate::{ensure_parent, lookup, Container};
use super::path::{DottedPath, PathSpec};


/// Result of a GET: the whole root, one value, or nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum GetResult<'a> {
    /// The path addressed the root map itself.
    Root(&'a Container),
    /// The path addressed a single value (possibly a nested map).
    Single(&'a Value),
    /// Nothing lives at the path.
    NotFound,
}

impl<'a> GetResult<'a> {
    pub fn is_found(&self) -> bool {
        !matches!(self, GetResult::NotFound)
    }

    /// The addressed value. `None` for the root and for misses.
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            GetResult::Single(v) => Some(*v),
            _ => None,
        }
    }

    /// Owned copy of whatever was found; the root comes back as an object.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            GetResult::Root(m) => Some(Value::Object((*m).clone())),
            GetResult::Single(v) => Some((*v).clone()),
            GetResult::NotFound => None,
        }
    }
}


/// True if something is stored at `path`.
///
/// The empty path is found whenever the root holds anything. Invalid path
/// arguments are reported as not found.
pub fn has<'p>(root: Option<&Container>, path: impl Into<PathSpec<'p>>) -> bool {
    let root = match non_empty(root) {
        Some(root) => root,
        None => return false,
    };
    match DottedPath::parse(path) {
        Ok(p) if p.is_root() => true,
        Ok(p) => lookup(root, p.segments()).is_some(),
        Err(_) => false,
    }
}

/// GET the value at `path`.
///
/// Missing values, broken parent chains and absent roots all give
/// [`GetResult::NotFound`]; only a malformed path argument is an error.
pub fn get<'a, 'p>(
    root: Option<&'a Container>,
    path: impl Into<PathSpec<'p>>,
) -> Result<GetResult<'a>, MapError> {
    let root = match non_empty(root) {
        Some(root) => root,
        None => return Ok(GetResult::NotFound),
    };
    let p = DottedPath::parse(path)?;
    if p.is_root() {
        return Ok(GetResult::Root(root));
    }
    Ok(match lookup(root, p.segments()) {
        Some(v) => GetResult::Single(v),
        None => GetResult::NotFound,
    })
}

/// GET with a fallback: wherever [`get`] would report `NotFound`, this
/// reports `Single(default)` instead.
pub fn get_default<'a, 'p>(
    root: Option<&'a Container>,
    path: impl Into<PathSpec<'p>>,
    default: &'a Value,
) -> Result<GetResult<'a>, MapError> {
    if non_empty(root).is_none() {
        return Ok(GetResult::Single(default));
    }
    Ok(match get(root, path)? {
        GetResult::NotFound => GetResult::Single(default),
        found => found,
    })
}

/// GET and deserialize into `T`.
///
/// A miss is `Ok(None)`; a value of the wrong shape is [`MapError::Decode`].
pub fn get_as<'p, T: DeserializeOwned>(
    root: Option<&Container>,
    path: impl Into<PathSpec<'p>>,
) -> Result<Option<T>, MapError> {
    let path = path.into();
    let label = DottedPath::parse(path.clone())
        .map(|p| p.to_dotted())
        .unwrap_or_default();
    match get(root, path)?.to_value() {
        Some(v) => serde_json::from_value(v)
            .map(Some)
            .map_err(|source| MapError::Decode { path: label, source }),
        None => Ok(None),
    }
}

/// SET `value` at `path`, creating missing intermediate maps.
///
/// Returns the value previously stored there, if any. An absent root is
/// created first. With `force`, leaves sitting where an intermediate map is
/// needed are replaced. On error nothing is modified and an absent root
/// stays absent.
pub fn set<'p>(
    root: &mut Option<Container>,
    path: impl Into<PathSpec<'p>>,
    value: Value,
    force: bool,
) -> Result<Option<Value>, MapError> {
    let p = DottedPath::parse(path)?;
    let leaf = match p.leaf() {
        Some(leaf) => leaf,
        None => return Err(MapError::MissingPath),
    };
    if leaf.trim().is_empty() {
        return Err(MapError::InvalidNodeName(p.to_dotted()));
    }

    let result = {
        let map = root.get_or_insert_with(Container::new);
        ensure_parent(map, p.segments(), force)
            .map(|parent| parent.insert(leaf.to_string(), value))
    };
    if root.as_ref().map_or(false, Container::is_empty) {
        *root = None;
    }

    let previous = result?;
    debug!(path = %p, replaced = previous.is_some(), "set value");
    Ok(previous)
}

/// CLEAR the value at `path`.
///
/// Returns the removed value. Clearing the empty path removes the whole
/// root and returns it as an object. Maps on the cleared path that end up
/// empty are removed from their parents, and an emptied root becomes
/// absent. Missing keys and broken parent chains are a no-op.
pub fn clear<'p>(
    root: &mut Option<Container>,
    path: impl Into<PathSpec<'p>>,
) -> Result<Option<Value>, MapError> {
    let map = match root.as_mut() {
        Some(map) => map,
        None => return Ok(None),
    };
    let p = DottedPath::parse(path)?;

    let removed = if p.is_root() {
        let whole = std::mem::take(map);
        (!whole.is_empty()).then(|| Value::Object(whole))
    } else {
        remove_collapsing(map, p.segments())
    };

    if map.is_empty() {
        *root = None;
    }
    if removed.is_some() {
        debug!(path = %p, "cleared value");
    }
    Ok(removed)
}

/// Every path whose value is not descended any further: leaves and empty
/// maps. Sorted.
pub fn leaf_paths(root: Option<&Container>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(root) = root {
        collect_leaf_paths(root, &mut Vec::new(), &mut out);
    }
    out.sort();
    out
}


// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

fn non_empty(root: Option<&Container>) -> Option<&Container> {
    root.filter(|m| !m.is_empty())
}

/// Remove the value at `segments` and prune the maps it leaves empty.
fn remove_collapsing(container: &mut Container, segments: &[String]) -> Option<Value> {
    let (first, rest) = segments.split_first()?;
    if rest.is_empty() {
        return container.remove(first);
    }
    let child = container.get_mut(first)?.as_object_mut()?;
    let removed = remove_collapsing(child, rest)?;
    if child.is_empty() {
        container.remove(first);
    }
    Some(removed)
}

fn collect_leaf_paths(map: &Container, prefix: &mut Vec<String>, out: &mut Vec<String>) {
    for (key, value) in map {
        prefix.push(key.clone());
        match value {
            Value::Object(child) if !child.is_empty() => collect_leaf_paths(child, prefix, out),
            _ => out.push(prefix.join(".")),
        }
        prefix.pop();
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
