//! Immutable, structure-sharing updates for JSON-like values.
//!
//! # Overview
//!
//! [`update`] takes a current value (the *view*) and a declarative command
//! and returns a new value with the described change applied. The view is
//! never mutated: every changed container is a fresh shallow copy, every
//! unchanged subtree is shared with the input, and a command that changes
//! nothing returns the input allocation itself — so `Arc::ptr_eq` on input
//! and output is a complete, O(1) change test.
//!
//! Commands use the immutability-helper grammar: reserved `$`-prefixed
//! keys name operations, every other key descends into a child, and `$$`
//! escapes a literal `$`-prefixed data key.
//!
//! # Example
//!
//! ```
//! use json_update::{update, update_path, Update, Value};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let view = Arc::new(Value::from(json!({"todos": ["a", "b"], "count": 2})));
//!
//! let upd = Update::new()
//!     .with("todos", Update::push(json!(["c"])))
//!     .with("count", Update::set(json!(3)));
//! let next = update(&view, &upd).unwrap();
//! assert_eq!(next.to_json(), json!({"todos": ["a", "b", "c"], "count": 3}));
//!
//! // the same thing, one leaf at a time, through flat paths
//! let next = update_path(&view, "push", "todos", json!(["c"])).unwrap();
//! let next = update_path(&next, "set", "count", json!(3)).unwrap();
//! assert_eq!(next.to_json(), json!({"todos": ["a", "b", "c"], "count": 3}));
//!
//! // no actual change: the identical Arc comes back
//! let same = update_path(&view, "set", "count", json!(2)).unwrap();
//! assert!(Arc::ptr_eq(&view, &same));
//! ```

pub mod apply;
pub mod error;
pub mod path;
pub mod update;
pub mod value;

pub use apply::{update, update_opt};
pub use error::UpdateError;
pub use path::{compile_path, escape_path_key, update_path, Path};
pub use update::{ApplyFn, Arg, Update};
pub use value::{same, Map, Slot, Value};
