//! Flat-path updates: compilation into nested commands, escaping, and
//! error passthrough from the updater.

use std::sync::Arc;

use json_update::{update_path, Arg, Path, UpdateError, Value};
use serde_json::{json, Value as Json};

fn v(j: Json) -> Arc<Value> {
    Arc::new(Value::from(j))
}

#[test]
fn set_through_string_path() {
    let view = v(json!({"a": {"b": 1}, "c": 2}));
    let out = update_path(&view, "set", "a.b", json!(5)).unwrap();
    assert_eq!(out.to_json(), json!({"a": {"b": 5}, "c": 2}));
    assert_eq!(view.to_json(), json!({"a": {"b": 1}, "c": 2}));
}

#[test]
fn set_through_segment_list() {
    let view = v(json!({"a": {"b": 1}}));
    let out = update_path(&view, "set", ["a", "b"], json!(5)).unwrap();
    assert_eq!(out.to_json(), json!({"a": {"b": 5}}));
}

#[test]
fn path_auto_vivifies() {
    let view = v(json!({"c": 2}));
    let out = update_path(&view, "set", "a.b", json!(5)).unwrap();
    assert_eq!(out.to_json(), json!({"a": {"b": 5}, "c": 2}));
}

#[test]
fn path_into_array_index() {
    let view = v(json!({"list": [10, 20, 30]}));
    let out = update_path(&view, "set", "list.1", json!(99)).unwrap();
    assert_eq!(out.to_json(), json!({"list": [10, 99, 30]}));
}

#[test]
fn empty_path_applies_at_root() {
    let view = v(json!({"a": 1}));
    let out = update_path(&view, "merge", Path::default(), json!({"b": 2})).unwrap();
    assert_eq!(out.to_json(), json!({"a": 1, "b": 2}));
}

#[test]
fn dollar_segments_are_escaped() {
    // a data key literally named "$set" is addressed, not executed
    let view = v(json!({"a": {"$set": 1}}));
    let out = update_path(&view, "set", ["a", "$set"], json!(2)).unwrap();
    assert_eq!(out.to_json(), json!({"a": {"$set": 2}}));
}

#[test]
fn push_and_splice_through_paths() {
    let view = v(json!({"a": {"b": [1]}}));
    let out = update_path(&view, "push", "a.b", json!([2, 3])).unwrap();
    assert_eq!(out.to_json(), json!({"a": {"b": [1, 2, 3]}}));

    let out = update_path(&view, "splice", "a.b", json!([[0, 1, 7, 8]])).unwrap();
    assert_eq!(out.to_json(), json!({"a": {"b": [7, 8]}}));

    let out = update_path(&view, "unset", "a", json!("b")).unwrap();
    assert_eq!(out.to_json(), json!({"a": {}}));
}

#[test]
fn apply_through_path() {
    let view = v(json!({"a": {"n": 3}}));
    let out = update_path(
        &view,
        "apply",
        "a.n",
        Arg::apply(|val| match val {
            Some(Value::Number(n)) => Value::from(n.as_i64().unwrap() + 1),
            other => panic!("unexpected view at path: {other:?}"),
        }),
    )
    .unwrap();
    assert_eq!(out.to_json(), json!({"a": {"n": 4}}));
}

#[test]
fn unknown_operation_is_inert_on_containers() {
    let view = v(json!({"a": {"x": 1}}));
    let out = update_path(&view, "bogus", "a", json!(1)).unwrap();
    assert!(Arc::ptr_eq(&view, &out));

    let view = v(json!({"a": [1, 2]}));
    let out = update_path(&view, "bogus", "a", json!(1)).unwrap();
    assert!(Arc::ptr_eq(&view, &out));

    // a scalar target still rejects recursion, unknown key or not
    let view = v(json!({"a": 1}));
    assert_eq!(
        update_path(&view, "bogus", "a", json!(1)).unwrap_err(),
        UpdateError::ViewNotUpdatable
    );
}

#[test]
fn no_op_set_keeps_identity() {
    let view = v(json!({"a": {"b": 1}}));
    let out = update_path(&view, "set", "a.b", json!(1)).unwrap();
    assert!(Arc::ptr_eq(&view, &out));
}

#[test]
fn updater_errors_pass_through() {
    let view = v(json!({"a": 5}));
    assert_eq!(
        update_path(&view, "push", "a", json!([1])).unwrap_err(),
        UpdateError::ViewNotArray("push")
    );
    assert_eq!(
        update_path(&view, "set", "a.b", json!(1)).unwrap_err(),
        UpdateError::ViewNotUpdatable
    );
}
