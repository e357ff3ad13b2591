//! Tree navigation: locating, and on demand creating, the parent map of
//! the last segment of a path.

use serde_json::{Map, Value};
use tracing::{trace, warn};

use super::errors::MapError;

/// A string-keyed map whose values may themselves be maps.
pub type Container = Map<String, Value>;


/// True if `value` is a map that navigation can descend into.
///
/// Arrays are leaves: they are never descended.
pub fn is_container(value: &Value) -> bool {
    value.is_object()
}

/// Find the deepest existing map on the way to the parent of the last
/// segment.
///
/// Returns that map plus the segments that could not be resolved (up to,
/// not including, the last one). An empty remainder means the parent was
/// fully resolved. Descent stops at the first segment that is missing or
/// holds a leaf. Nothing is created.
pub fn locate_parent<'a, 'p>(
    root: &'a Container,
    segments: &'p [String],
) -> (&'a Container, &'p [String]) {
    let parent_len = segments.len().saturating_sub(1);
    let mut current = root;
    for (i, seg) in segments[..parent_len].iter().enumerate() {
        match current.get(seg) {
            Some(Value::Object(child)) => current = child,
            _ => return (current, &segments[i..parent_len]),
        }
    }
    (current, &[])
}

/// Value stored at `segments`, if the whole chain exists.
///
/// `segments` must not be empty; the root has no enclosing value.
pub fn lookup<'a>(root: &'a Container, segments: &[String]) -> Option<&'a Value> {
    let (leaf, _) = segments.split_last()?;
    let (parent, remainder) = locate_parent(root, segments);
    if !remainder.is_empty() {
        return None;
    }
    parent.get(leaf)
}

/// Resolve the parent map of the last segment, creating missing
/// intermediate maps.
///
/// Segments that must be created are trimmed; a blank name fails with
/// [`MapError::InvalidNodeName`]. A segment that already holds a leaf fails
/// with [`MapError::NotAContainer`] unless `force` is set, in which case the
/// leaf is replaced by an empty map. Existing maps are reused whatever
/// `force` says.
///
/// The whole remainder is checked before anything is created, so on error
/// `root` is left untouched.
pub fn ensure_parent<'a>(
    root: &'a mut Container,
    segments: &[String],
    force: bool,
) -> Result<&'a mut Container, MapError> {
    let parent_len = segments.len().saturating_sub(1);

    let resolved = {
        let (parent, remainder) = locate_parent(root, segments);
        check_creatable(parent, remainder, force, segments)?;
        parent_len - remainder.len()
    };

    let mut current = root;
    for seg in &segments[..resolved] {
        current = current
            .get_mut(seg)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| not_a_container(segments, seg))?;
    }

    for seg in &segments[resolved..parent_len] {
        let name = seg.trim();
        if !current.contains_key(name) {
            trace!(segment = name, "creating intermediate map");
        }
        let slot = current
            .entry(name.to_string())
            .or_insert_with(|| Value::Object(Container::new()));
        if !is_container(slot) {
            warn!(
                path = %segments.join("."),
                segment = name,
                "force: replacing leaf with map"
            );
            *slot = Value::Object(Container::new());
        }
        current = match slot {
            Value::Object(child) => child,
            _ => return Err(not_a_container(segments, name)),
        };
    }

    Ok(current)
}


// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

/// Dry run of the creation loop in [`ensure_parent`].
fn check_creatable(
    parent: &Container,
    remainder: &[String],
    force: bool,
    segments: &[String],
) -> Result<(), MapError> {
    // `None` once we are below a node that will be freshly created.
    let mut cursor = Some(parent);
    for seg in remainder {
        let name = seg.trim();
        if name.is_empty() {
            return Err(MapError::InvalidNodeName(segments.join(".")));
        }
        cursor = match cursor.and_then(|m| m.get(name)) {
            Some(Value::Object(child)) => Some(child),
            Some(_) if !force => return Err(not_a_container(segments, name)),
            _ => None,
        };
    }
    Ok(())
}

fn not_a_container(segments: &[String], segment: &str) -> MapError {
    MapError::NotAContainer {
        path: segments.join("."),
        segment: segment.to_string(),
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
