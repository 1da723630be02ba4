//! Property coverage for the structural guarantees: non-mutation of the
//! input, identity on no-op commands, and wholesale replacement by `$set`.

use std::sync::Arc;

use json_update::{update, Update, Value};
use proptest::prelude::*;
use serde_json::Value as Json;

fn scalar() -> impl Strategy<Value = Json> {
    prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::Bool),
        any::<i64>().prop_map(|n| serde_json::json!(n)),
        "[a-z]{0,8}".prop_map(Json::String),
    ]
}

fn json_value() -> impl Strategy<Value = Json> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Json::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Json::Object(m.into_iter().collect())),
        ]
    })
}

/// Objects whose members are recursively built values.
fn json_object() -> impl Strategy<Value = Json> {
    prop::collection::btree_map("[a-z]{1,4}", json_value(), 0..5)
        .prop_map(|m| Json::Object(m.into_iter().collect()))
}

/// Objects whose members are scalars only, where merge no-op detection is
/// exact (container members compare by identity, not structure).
fn flat_object() -> impl Strategy<Value = Json> {
    prop::collection::btree_map("[a-z]{1,4}", scalar(), 0..6)
        .prop_map(|m| Json::Object(m.into_iter().collect()))
}

fn v(j: &Json) -> Arc<Value> {
    Arc::new(Value::from(j.clone()))
}

proptest! {
    #[test]
    fn empty_command_is_identity(j in json_object()) {
        let view = v(&j);
        let out = update(&view, &Update::new()).unwrap();
        prop_assert!(Arc::ptr_eq(&view, &out));
    }

    #[test]
    fn set_replaces_wholesale_and_never_mutates(prior in json_value(), next in json_value()) {
        let view = v(&prior);
        let out = update(&view, &Update::set(next.clone())).unwrap();
        prop_assert_eq!(out.to_json(), next);
        prop_assert_eq!(view.to_json(), prior);
    }

    #[test]
    fn set_is_idempotent(prior in json_value(), next in json_value()) {
        let upd = Update::set(next.clone());
        let once = update(&v(&prior), &upd).unwrap();
        let twice = update(&once, &upd).unwrap();
        prop_assert_eq!(once.to_json(), next.clone());
        prop_assert_eq!(twice.to_json(), next);
    }

    #[test]
    fn merge_of_existing_scalars_is_noop(j in flat_object(), seed in any::<prop::sample::Index>()) {
        let Json::Object(map) = &j else { unreachable!() };
        // merge back an arbitrary prefix of the object's own entries
        let take = if map.is_empty() { 0 } else { seed.index(map.len() + 1) };
        let payload: Json = Json::Object(map.iter().take(take).map(|(k, v)| (k.clone(), v.clone())).collect());

        let view = v(&j);
        let out = update(&view, &Update::merge(payload)).unwrap();
        prop_assert!(Arc::ptr_eq(&view, &out));
    }

    #[test]
    fn merge_of_fresh_key_changes_and_preserves_rest(j in flat_object(), val in scalar()) {
        let view = v(&j);
        let out = update(&view, &Update::merge(serde_json::json!({"zzzz_new": val.clone()}))).unwrap();

        let Json::Object(mut expected) = j.clone() else { unreachable!() };
        expected.insert("zzzz_new".to_string(), val);
        prop_assert_eq!(out.to_json(), Json::Object(expected));
        prop_assert_eq!(view.to_json(), j);
    }

    #[test]
    fn push_then_unshift_roundtrip_length(j in prop::collection::vec(scalar(), 0..6),
                                          extra in prop::collection::vec(scalar(), 0..4)) {
        let view = v(&Json::Array(j.clone()));
        let pushed = update(&view, &Update::push(Json::Array(extra.clone()))).unwrap();
        let shifted = update(&pushed, &Update::unshift(Json::Array(extra.clone()))).unwrap();
        let slots = shifted.as_array().unwrap();
        prop_assert_eq!(slots.len(), j.len() + 2 * extra.len());
        prop_assert_eq!(view.to_json(), Json::Array(j));
    }

    #[test]
    fn nested_noop_set_keeps_outer_identity(j in flat_object()) {
        let Json::Object(map) = &j else { unreachable!() };
        let view = v(&j);
        // rewrite every member to its current value, one nested $set each
        let mut upd = Update::new();
        for (key, val) in map {
            upd = upd.with(key, Update::set(val.clone()));
        }
        let out = update(&view, &upd).unwrap();
        prop_assert!(Arc::ptr_eq(&view, &out));
    }
}
