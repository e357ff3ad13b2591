//! Dotted path parser.
//!
//! Turns a path argument (`a.b.c`, a pre-split segment list, a JSON value
//! carrying either, or nothing at all) into an ordered list of segment
//! names. An empty result addresses the root map itself.

use std::fmt;

use serde_json::Value;

use super::errors::MapError;


/// A path argument before parsing.
///
/// Paths arrive in several shapes; `Json` carries a dynamically-typed
/// argument whose shape is only known at runtime and is the one variant
/// that can fail with [`MapError::InvalidPathType`].
#[derive(Debug, Clone, PartialEq)]
pub enum PathSpec<'a> {
    /// No path given. Addresses the root.
    Root,
    /// A `.`-delimited string such as `server.tls.port`.
    Dotted(&'a str),
    /// Segments already split by the caller. Dots inside them are literal.
    Segments(Vec<String>),
    /// A JSON value: null, a string, or an array of strings.
    Json(&'a Value),
}

impl<'a> From<&'a str> for PathSpec<'a> {
    fn from(s: &'a str) -> Self {
        PathSpec::Dotted(s)
    }
}

impl<'a> From<&'a String> for PathSpec<'a> {
    fn from(s: &'a String) -> Self {
        PathSpec::Dotted(s.as_str())
    }
}

impl<'a> From<Option<&'a str>> for PathSpec<'a> {
    fn from(s: Option<&'a str>) -> Self {
        match s {
            Some(s) => PathSpec::Dotted(s),
            None => PathSpec::Root,
        }
    }
}

impl From<Vec<String>> for PathSpec<'_> {
    fn from(segments: Vec<String>) -> Self {
        PathSpec::Segments(segments)
    }
}

impl<'a> From<&'a [String]> for PathSpec<'a> {
    fn from(segments: &'a [String]) -> Self {
        PathSpec::Segments(segments.to_vec())
    }
}

impl<'a> From<&'a [&'a str]> for PathSpec<'a> {
    fn from(segments: &'a [&'a str]) -> Self {
        PathSpec::Segments(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl<'a> From<&'a Value> for PathSpec<'a> {
    fn from(v: &'a Value) -> Self {
        PathSpec::Json(v)
    }
}

impl<'a> From<&'a DottedPath> for PathSpec<'a> {
    fn from(p: &'a DottedPath) -> Self {
        PathSpec::Segments(p.segments.clone())
    }
}


/// A parsed path: zero or more segment names, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DottedPath {
    segments: Vec<String>,
}

impl DottedPath {
    /// The path addressing the root map.
    pub fn root() -> Self {
        DottedPath::default()
    }

    /// Parse any accepted path shape.
    ///
    /// Dotted strings are trimmed, split on `.`, and each piece is trimmed;
    /// empty pieces (`a..b`, trailing dots) are dropped. Pre-split segment
    /// lists keep their pieces (dots inside a segment are literal) but each
    /// one is trimmed; a blank segment survives as `""` and is rejected
    /// later if a node has to be named by it.
    pub fn parse<'a>(spec: impl Into<PathSpec<'a>>) -> Result<Self, MapError> {
        match spec.into() {
            PathSpec::Root => Ok(DottedPath::root()),
            PathSpec::Dotted(s) => Ok(parse_dotted(s)),
            PathSpec::Segments(segments) => Ok(from_segments(segments)),
            PathSpec::Json(v) => parse_json(v),
        }
    }

    /// All segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True if this path addresses the root map.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final segment: the key looked up inside the parent map.
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Segments naming the chain of parent maps (everything but the leaf).
    pub fn parent(&self) -> &[String] {
        match self.segments.split_last() {
            Some((_, parent)) => parent,
            None => &[],
        }
    }

    /// Format back to a dotted string. The root formats as `""`.
    pub fn to_dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted())
    }
}


/// Short name of a JSON value's type, for error messages.
pub(crate) fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}


// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

fn parse_dotted(input: &str) -> DottedPath {
    let segments = input
        .trim()
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    DottedPath { segments }
}

fn from_segments(segments: Vec<String>) -> DottedPath {
    let segments = segments
        .into_iter()
        .map(|s| s.trim().to_string())
        .collect();
    DottedPath { segments }
}

fn parse_json(v: &Value) -> Result<DottedPath, MapError> {
    match v {
        Value::Null => Ok(DottedPath::root()),
        Value::String(s) => Ok(parse_dotted(s)),
        Value::Array(items) => {
            let mut segments = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => segments.push(s.trim().to_string()),
                    other => {
                        return Err(MapError::InvalidPathType(format!(
                            "array containing {}",
                            value_kind(other)
                        )))
                    }
                }
            }
            Ok(DottedPath { segments })
        }
        other => Err(MapError::InvalidPathType(value_kind(other).to_string())),
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
