//! The update command grammar.
//!
//! An [`Update`] describes one recursion level: an insertion-ordered map
//! from command key to argument, the same shape as the object literals of
//! the immutability-helper grammar it implements. Keys beginning with a
//! single `$` are reserved operations (`$set`, `$merge`, `$unset`, `$push`,
//! `$unshift`, `$splice`, `$apply`); a doubled `$$` escapes a literal
//! `$`-prefixed key; every other key names a child to descend into.
//!
//! Commands are built either with the typed constructors:
//!
//! ```
//! use json_update::{update, Update, Value};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let view = Arc::new(Value::from(json!({"a": 1})));
//! let upd = Update::unset(["a"]).with("b", Update::set(json!(2)));
//! let next = update(&view, &upd).unwrap();
//! assert_eq!(next.to_json(), json!({"b": 2}));
//! ```
//!
//! or parsed from plain JSON with [`Update::from_json`] (everything except
//! `$apply`, which carries a function and has no data form).

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::UpdateError;
use crate::path::escape_path_key;
use crate::value::Value;

/// Caller-supplied function for `$apply`. Receives a shallow copy of the
/// current value (`None` when the view is absent at that position) and
/// returns the replacement.
pub type ApplyFn = Arc<dyn Fn(Option<Value>) -> Value + Send + Sync>;

/// Argument attached to one command key.
#[derive(Clone)]
pub enum Arg {
    /// Operand of a value-taking operation (`$set`, `$merge`, ...).
    Value(Arc<Value>),
    /// Nested command under a descent key.
    Update(Update),
    /// Operand of `$apply`.
    Apply(ApplyFn),
}

impl Arg {
    pub fn apply<F>(f: F) -> Arg
    where
        F: Fn(Option<Value>) -> Value + Send + Sync + 'static,
    {
        Arg::Apply(Arc::new(f))
    }

    /// The operand of `op`, which must be a plain value.
    pub(crate) fn operand(&self, op: &'static str) -> Result<&Arc<Value>, UpdateError> {
        match self {
            Arg::Value(v) => Ok(v),
            _ => Err(UpdateError::OperandNotValue(op)),
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Arg::Update(u) => f.debug_tuple("Update").field(u).finish(),
            Arg::Apply(_) => f.write_str("Apply(..)"),
        }
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Arg {
        Arg::Value(Arc::new(v))
    }
}

impl From<Arc<Value>> for Arg {
    fn from(v: Arc<Value>) -> Arg {
        Arg::Value(v)
    }
}

impl From<serde_json::Value> for Arg {
    fn from(v: serde_json::Value) -> Arg {
        Arg::Value(Arc::new(Value::from(v)))
    }
}

impl From<Update> for Arg {
    fn from(u: Update) -> Arg {
        Arg::Update(u)
    }
}

/// One level of an update descriptor.
#[derive(Debug, Clone, Default)]
pub struct Update {
    entries: IndexMap<String, Arg>,
}

impl Update {
    /// An empty command: plain descent with nothing to do. A no-op on any
    /// object or array view.
    pub fn new() -> Update {
        Update::default()
    }

    fn one(key: &str, arg: Arg) -> Update {
        let mut entries = IndexMap::with_capacity(1);
        entries.insert(key.to_string(), arg);
        Update { entries }
    }

    /// `{$set: value}` — replace the view wholesale.
    pub fn set(value: impl Into<Value>) -> Update {
        Update::one("$set", Arg::Value(Arc::new(value.into())))
    }

    /// `{$merge: object}` — shallow-merge keys into an object view.
    pub fn merge(payload: impl Into<Value>) -> Update {
        Update::one("$merge", Arg::Value(Arc::new(payload.into())))
    }

    /// `{$unset: [keys]}` — remove keys from an object view.
    pub fn unset<I, S>(keys: I) -> Update
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots = keys
            .into_iter()
            .map(|k| Some(Arc::new(Value::String(k.into()))))
            .collect();
        Update::one("$unset", Arg::Value(Arc::new(Value::Array(slots))))
    }

    /// `{$push: [elements]}` — append to an array view.
    pub fn push(elements: impl Into<Value>) -> Update {
        Update::one("$push", Arg::Value(Arc::new(elements.into())))
    }

    /// `{$unshift: [elements]}` — prepend to an array view, keeping the
    /// operand's own order.
    pub fn unshift(elements: impl Into<Value>) -> Update {
        Update::one("$unshift", Arg::Value(Arc::new(elements.into())))
    }

    /// `{$splice: [[start, delete, ...insert], ...]}` — apply splice
    /// tuples in order to one copy of an array view.
    pub fn splice(tuples: impl Into<Value>) -> Update {
        Update::one("$splice", Arg::Value(Arc::new(tuples.into())))
    }

    /// `{$apply: f}` — replace the view with `f(shallow copy of view)`.
    pub fn apply<F>(f: F) -> Update
    where
        F: Fn(Option<Value>) -> Value + Send + Sync + 'static,
    {
        Update::one("$apply", Arg::Apply(Arc::new(f)))
    }

    /// Add a descent entry for the literal child key `key`. A key that
    /// itself starts with `$` is escaped, so `with("$set", ..)` targets a
    /// member actually named `$set`.
    pub fn with(mut self, key: &str, nested: Update) -> Update {
        self.entries.insert(escape_path_key(key), Arg::Update(nested));
        self
    }

    /// Add a raw grammar entry, no escaping applied.
    pub fn entry(mut self, key: impl Into<String>, arg: impl Into<Arg>) -> Update {
        self.entries.insert(key.into(), arg.into());
        self
    }

    /// Union of two commands at the same level; entries of `other` win on
    /// key collision.
    pub fn and(mut self, other: Update) -> Update {
        for (key, arg) in other.entries {
            self.entries.insert(key, arg);
        }
        self
    }

    /// Parse a command expressed as plain JSON.
    ///
    /// Reserved single-`$` keys become operands, everything else becomes a
    /// nested descent command. `$apply` has no data form and is rejected.
    ///
    /// ```
    /// use json_update::Update;
    /// use serde_json::json;
    ///
    /// let upd = Update::from_json(json!({"$unset": "a", "b": {"$set": 2}})).unwrap();
    /// assert_eq!(upd.len(), 2);
    ///
    /// assert!(Update::from_json(json!(42)).is_err());
    /// ```
    pub fn from_json(command: serde_json::Value) -> Result<Update, UpdateError> {
        let serde_json::Value::Object(map) = command else {
            return Err(UpdateError::CommandNotObject);
        };
        let mut entries = IndexMap::with_capacity(map.len());
        for (key, value) in map {
            if key == "$apply" {
                return Err(UpdateError::ApplyNotJson);
            }
            let arg = if is_reserved(&key) {
                // Unknown reserved keys are kept; dispatch ignores them.
                Arg::Value(Arc::new(Value::from(value)))
            } else if value.is_object() {
                Arg::Update(Update::from_json(value)?)
            } else {
                // Wrong shape for a descent key; reported when the updater
                // reaches it rather than here.
                Arg::Value(Arc::new(Value::from(value)))
            };
            entries.insert(key, arg);
        }
        Ok(Update { entries })
    }

    pub fn get(&self, key: &str) -> Option<&Arg> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Arg)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A key marks a reserved operation iff it starts with exactly one `$`.
pub(crate) fn is_reserved(key: &str) -> bool {
    let bytes = key.as_bytes();
    bytes.first() == Some(&b'$') && bytes.get(1) != Some(&b'$')
}

/// Strip one `$` from an escaped `$$key`; plain keys pass through.
pub(crate) fn literal_key(key: &str) -> &str {
    if key.starts_with("$$") {
        &key[1..]
    } else {
        key
    }
}
