//! Flat-path convenience layer over the updater.
//!
//! A [`Path`] plus one terminal operation compiles into the nested command
//! the updater already understands; nothing here validates anything, all
//! errors come from the updater.

use std::sync::Arc;

use crate::apply::update;
use crate::error::UpdateError;
use crate::update::{Arg, Update};
use crate::value::Value;

/// An ordered sequence of path segments.
///
/// Built from a dot-delimited string or from a list of segments:
///
/// ```
/// use json_update::Path;
///
/// assert_eq!(Path::from("a.b.c").segments(), ["a", "b", "c"]);
/// assert_eq!(Path::from(["a", "b"]).segments(), ["a", "b"]);
/// assert!(Path::from("").segments().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path(Vec<String>);

impl Path {
    pub fn new(segments: Vec<String>) -> Path {
        Path(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Path {
        if s.is_empty() {
            return Path(Vec::new());
        }
        Path(s.split('.').map(String::from).collect())
    }
}

impl From<String> for Path {
    fn from(s: String) -> Path {
        Path::from(s.as_str())
    }
}

impl From<Vec<String>> for Path {
    fn from(segments: Vec<String>) -> Path {
        Path(segments)
    }
}

impl From<&[&str]> for Path {
    fn from(segments: &[&str]) -> Path {
        Path(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(segments: [&str; N]) -> Path {
        Path(segments.iter().map(|s| s.to_string()).collect())
    }
}

/// Escape a key that would otherwise read as a reserved operation: a
/// leading `$` is doubled, anything else passes through.
///
/// ```
/// use json_update::escape_path_key;
///
/// assert_eq!(escape_path_key("a"), "a");
/// assert_eq!(escape_path_key("$set"), "$$set");
/// assert_eq!(escape_path_key("$$x"), "$$$x");
/// ```
pub fn escape_path_key(key: &str) -> String {
    if key.starts_with('$') {
        format!("${key}")
    } else {
        key.to_string()
    }
}

/// Fold a path into nested single-entry commands around `leaf`, escaping
/// each segment. An empty path is `leaf` itself.
pub fn compile_path(path: impl Into<Path>, leaf: Update) -> Update {
    path.into()
        .segments()
        .iter()
        .rev()
        .fold(leaf, |nested, segment| {
            Update::new().entry(escape_path_key(segment), Arg::Update(nested))
        })
}

/// Apply the operation named `op` (without its `$`) at `path`.
///
/// `params` is the operation's operand: a value for the data operations,
/// or [`Arg::apply`] for `apply`. An unrecognized `op` compiles to an
/// inert reserved key, which a container view ignores; a scalar at the
/// path still rejects the descent.
///
/// ```
/// use json_update::{update_path, Arg, Value};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let view = Arc::new(Value::from(json!({"a": {"b": 1}, "c": 2})));
///
/// let next = update_path(&view, "set", "a.b", json!(5)).unwrap();
/// assert_eq!(next.to_json(), json!({"a": {"b": 5}, "c": 2}));
///
/// let next = update_path(&view, "apply", "c", Arg::apply(|v| match v {
///     Some(Value::Number(n)) => Value::from(n.as_i64().unwrap() * 10),
///     other => panic!("unexpected view: {other:?}"),
/// })).unwrap();
/// assert_eq!(next.to_json(), json!({"a": {"b": 1}, "c": 20}));
/// ```
pub fn update_path(
    view: &Arc<Value>,
    op: &str,
    path: impl Into<Path>,
    params: impl Into<Arg>,
) -> Result<Arc<Value>, UpdateError> {
    let leaf = Update::new().entry(format!("${op}"), params.into());
    update(view, &compile_path(path, leaf))
}
