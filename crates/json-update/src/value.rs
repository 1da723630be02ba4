//! The value tree that updates are applied to.
//!
//! Containers hold their children behind [`Arc`], so cloning a [`Value`] is a
//! shallow copy: the container itself is duplicated while every child is
//! shared. `Arc::ptr_eq` on two results is the cheap "did this subtree
//! change?" test, and [`same`] is the scalar-aware variant of it.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Number;

/// Insertion-ordered object map.
pub type Map = IndexMap<String, Arc<Value>>;

/// One array position. `None` is a hole: the index exists in the array's
/// length but carries no value. Distinct from `Some(Value::Null)`.
pub type Slot = Option<Arc<Value>>;

/// A JSON-like value with shared children and sparse arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Slot>),
    Object(Map),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_array(&self) -> Option<&[Slot]> {
        match self {
            Value::Array(slots) => Some(slots),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up an object member by key.
    pub fn get(&self, key: &str) -> Option<&Arc<Value>> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Look up an array element by index. Holes and out-of-range indices
    /// both come back as `None`.
    pub fn at(&self, index: usize) -> Option<&Arc<Value>> {
        self.as_array().and_then(|slots| slots.get(index)).and_then(Slot::as_ref)
    }

    /// Deep conversion into a `serde_json::Value`. Array holes export as
    /// `null`, which loses the hole/null distinction.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(slots) => serde_json::Value::Array(
                slots
                    .iter()
                    .map(|slot| match slot {
                        Some(v) => v.to_json(),
                        None => serde_json::Value::Null,
                    })
                    .collect(),
            ),
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// The strict-equality analogue used for change detection.
///
/// Two values are `same` when they are the identical allocation, or when
/// both are equal scalars. Two structurally equal containers at different
/// allocations are *not* `same` — replacing a subtree with an equal copy
/// still counts as a change, exactly like replacing one object with
/// another under `===`.
///
/// ```
/// use json_update::{same, Value};
/// use std::sync::Arc;
///
/// let a = Arc::new(Value::from(1));
/// let b = Arc::new(Value::from(1));
/// assert!(same(&a, &b)); // equal scalars
///
/// let x = Arc::new(Value::from(serde_json::json!({"k": 1})));
/// let y = Arc::new(Value::from(serde_json::json!({"k": 1})));
/// assert!(same(&x, &x.clone()));
/// assert!(!same(&x, &y)); // equal but distinct containers
/// ```
pub fn same(a: &Arc<Value>, b: &Arc<Value>) -> bool {
    if Arc::ptr_eq(a, b) {
        return true;
    }
    match (a.as_ref(), b.as_ref()) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        _ => false,
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(
                items.into_iter().map(|v| Some(Arc::new(Value::from(v)))).collect(),
            ),
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter().map(|(k, v)| (k, Arc::new(Value::from(v)))).collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        v.to_json()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        match Number::from_f64(n) {
            Some(n) => Value::Number(n),
            None => Value::Null,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl PartialEq<serde_json::Value> for Value {
    fn eq(&self, other: &serde_json::Value) -> bool {
        match (self, other) {
            (Value::Null, serde_json::Value::Null) => true,
            (Value::Bool(a), serde_json::Value::Bool(b)) => a == b,
            (Value::Number(a), serde_json::Value::Number(b)) => a == b,
            (Value::String(a), serde_json::Value::String(b)) => a == b,
            (Value::Array(a), serde_json::Value::Array(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(slot, j)| match slot {
                        Some(v) => v.as_ref() == j,
                        // A hole is not a value, not even null
                        None => false,
                    })
            }
            (Value::Object(a), serde_json::Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(k).is_some_and(|j| v.as_ref() == j))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
