//! The recursive updater.
//!
//! One call handles one level of the command. Terminal operations are
//! checked first, in fixed precedence (`$set`, `$push`, `$unshift`,
//! `$splice`, `$apply`); the first one present consumes the whole call and
//! sibling keys are never consulted. Otherwise the combinable operations
//! (`$merge`, then `$unset`) run against a single shallow copy, and the
//! remaining keys recurse into children of that copy.
//!
//! Every structural change lands on a fresh shallow copy; the input is
//! never touched. When nothing reachable actually changed, the *original*
//! `Arc` comes back, so `Arc::ptr_eq` on input and output is a complete
//! change test for callers.

use std::sync::Arc;

use crate::error::UpdateError;
use crate::update::{is_reserved, literal_key, Arg, Update};
use crate::value::{same, Map, Slot, Value};

/// Apply `upd` to `view`, returning the new view.
///
/// ```
/// use json_update::{update, Update, Value};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let view = Arc::new(Value::from(json!({"a": {"b": 1}, "c": 2})));
///
/// let next = update(&view, &Update::new().with("a", Update::new().with("b", Update::set(json!(5))))).unwrap();
/// assert_eq!(next.to_json(), json!({"a": {"b": 5}, "c": 2}));
///
/// // writing the value already there returns the identical view
/// let noop = update(&view, &Update::new().with("a", Update::new().with("b", Update::set(json!(1))))).unwrap();
/// assert!(Arc::ptr_eq(&view, &noop));
/// ```
pub fn update(view: &Arc<Value>, upd: &Update) -> Result<Arc<Value>, UpdateError> {
    update_opt(Some(view), upd)
}

/// [`update`] with an optionally absent view. An absent view auto-vivifies
/// the same way a null view does, except that `$apply` can observe the
/// difference through its `Option` argument.
pub fn update_opt(view: Option<&Arc<Value>>, upd: &Update) -> Result<Arc<Value>, UpdateError> {
    if let Some(arg) = upd.get("$set") {
        return Ok(Arc::clone(arg.operand("set")?));
    }

    if let Some(arg) = upd.get("$push") {
        return push_like(view, arg, "push", true);
    }

    if let Some(arg) = upd.get("$unshift") {
        return push_like(view, arg, "unshift", false);
    }

    if let Some(arg) = upd.get("$splice") {
        return splice(view, arg);
    }

    if let Some(arg) = upd.get("$apply") {
        let Arg::Apply(f) = arg else {
            return Err(UpdateError::OperandNotFunction);
        };
        // Shallow copy for containers, pass-through for scalars; the
        // containers' children stay shared with the original.
        let input = view.map(|v| v.as_ref().clone());
        return Ok(Arc::new(f(input)));
    }

    // Combinable phase: absent and null views vivify to {}.
    match view.filter(|v| !v.is_null()) {
        None => descend_object(None, &Map::new(), upd),
        Some(v) => match v.as_ref() {
            Value::Object(map) => descend_object(Some(v), map, upd),
            Value::Array(slots) => {
                if upd.get("$merge").is_some() {
                    return Err(UpdateError::ViewNotObject("merge"));
                }
                if upd.get("$unset").is_some() {
                    return Err(UpdateError::ViewNotObject("unset"));
                }
                descend_array(v, slots, upd)
            }
            _ => {
                if upd.get("$merge").is_some() {
                    return Err(UpdateError::ViewNotObject("merge"));
                }
                if upd.get("$unset").is_some() {
                    return Err(UpdateError::ViewNotObject("unset"));
                }
                Err(UpdateError::ViewNotUpdatable)
            }
        },
    }
}

fn push_like(
    view: Option<&Arc<Value>>,
    arg: &Arg,
    op: &'static str,
    at_end: bool,
) -> Result<Arc<Value>, UpdateError> {
    let operand = arg.operand(op)?;
    let Value::Array(elements) = operand.as_ref() else {
        return Err(UpdateError::OperandNotArray(op));
    };

    let base = view.filter(|v| !v.is_null());
    let slots: &[Slot] = match base.map(|v| v.as_ref()) {
        Some(Value::Array(slots)) => slots,
        Some(_) => return Err(UpdateError::ViewNotArray(op)),
        None => &[],
    };

    if elements.is_empty() {
        return Ok(match base {
            Some(v) => Arc::clone(v),
            None => Arc::new(Value::Array(Vec::new())),
        });
    }

    let mut out: Vec<Slot> = Vec::with_capacity(slots.len() + elements.len());
    if at_end {
        out.extend_from_slice(slots);
        out.extend(elements.iter().cloned());
    } else {
        out.extend(elements.iter().cloned());
        out.extend_from_slice(slots);
    }
    Ok(Arc::new(Value::Array(out)))
}

fn splice(view: Option<&Arc<Value>>, arg: &Arg) -> Result<Arc<Value>, UpdateError> {
    let operand = arg.operand("splice")?;
    let Value::Array(tuples) = operand.as_ref() else {
        return Err(UpdateError::OperandNotArray("splice"));
    };

    let mut out: Vec<Slot> = match view.filter(|v| !v.is_null()).map(|v| v.as_ref()) {
        Some(Value::Array(slots)) => slots.to_vec(),
        Some(_) => return Err(UpdateError::ViewNotArray("splice")),
        None => Vec::new(),
    };

    // Tuples apply one after another to the same copy, so indices in later
    // tuples address the already-spliced array.
    for tuple in tuples {
        let Some(tuple) = tuple else {
            return Err(UpdateError::SpliceTupleNotArray);
        };
        let Value::Array(args) = tuple.as_ref() else {
            return Err(UpdateError::SpliceTupleNotArray);
        };
        splice_in_place(&mut out, args)?;
    }

    Ok(Arc::new(Value::Array(out)))
}

/// `[start, delete_count, ...insert]`, with `Array::splice` clamping: a
/// negative start counts from the end, start and delete count are clamped
/// to the array bounds, and a missing delete count deletes to the end.
fn splice_in_place(arr: &mut Vec<Slot>, args: &[Slot]) -> Result<(), UpdateError> {
    let len = arr.len() as i64;
    let start = match args.first() {
        None => 0,
        Some(slot) => splice_int(slot)?,
    };
    let start = if start < 0 {
        (len + start).max(0) as usize
    } else {
        start.min(len) as usize
    };
    let delete = match args.get(1) {
        None => arr.len() - start,
        Some(slot) => {
            let d = splice_int(slot)?;
            (d.max(0) as usize).min(arr.len() - start)
        }
    };
    let insert: Vec<Slot> = args.iter().skip(2).cloned().collect();
    arr.splice(start..start + delete, insert);
    Ok(())
}

fn splice_int(slot: &Slot) -> Result<i64, UpdateError> {
    match slot.as_deref() {
        Some(Value::Number(n)) => n.as_i64().ok_or(UpdateError::SpliceArgNotInteger),
        _ => Err(UpdateError::SpliceArgNotInteger),
    }
}

fn descend_object(
    original: Option<&Arc<Value>>,
    base: &Map,
    upd: &Update,
) -> Result<Arc<Value>, UpdateError> {
    let mut copy = base.clone();
    let mut changed = false;

    if let Some(arg) = upd.get("$merge") {
        let operand = arg.operand("merge")?;
        let Value::Object(payload) = operand.as_ref() else {
            return Err(UpdateError::MergeOperandNotObject);
        };
        // No-op iff every payload entry is already present and identical.
        let differs = payload
            .iter()
            .any(|(k, v)| !base.get(k).is_some_and(|cur| same(cur, v)));
        if differs {
            for (k, v) in payload {
                copy.insert(k.clone(), Arc::clone(v));
            }
            changed = true;
        }
    }

    if let Some(arg) = upd.get("$unset") {
        for key in unset_keys(arg)? {
            // shift_remove keeps the order of the remaining keys
            if copy.shift_remove(key).is_some() {
                changed = true;
            }
        }
    }

    for (key, arg) in upd.iter() {
        if is_reserved(key) {
            // $merge/$unset were consumed above; unknown single-$ keys
            // are inert by the grammar.
            continue;
        }
        let key = literal_key(key);
        let Arg::Update(nested) = arg else {
            return Err(UpdateError::CommandNotObject);
        };
        // Recurse on the copy so same-level $merge/$unset are visible to
        // the child, but detect change against the original.
        let child = copy.get(key).cloned();
        let result = update_opt(child.as_ref(), nested)?;
        changed |= match base.get(key) {
            Some(orig) => !same(orig, &result),
            None => true,
        };
        copy.insert(key.to_string(), result);
    }

    if changed {
        Ok(Arc::new(Value::Object(copy)))
    } else {
        Ok(match original {
            Some(v) => Arc::clone(v),
            // The view was absent or null: hand back the vivified object.
            None => Arc::new(Value::Object(copy)),
        })
    }
}

fn descend_array(
    original: &Arc<Value>,
    slots: &[Slot],
    upd: &Update,
) -> Result<Arc<Value>, UpdateError> {
    let mut copy: Vec<Slot> = slots.to_vec();
    let mut changed = false;

    for (key, arg) in upd.iter() {
        if is_reserved(key) {
            continue;
        }
        let index = parse_index(key)?;
        let Arg::Update(nested) = arg else {
            return Err(UpdateError::CommandNotObject);
        };
        let child = copy.get(index).and_then(Slot::clone);
        let result = update_opt(child.as_ref(), nested)?;
        changed |= match slots.get(index).and_then(Slot::as_ref) {
            Some(orig) => !same(orig, &result),
            // Writing into a hole or past the end is always a change.
            None => true,
        };
        if index >= copy.len() {
            // Auto-extension leaves the intermediate slots as holes.
            copy.resize(index + 1, None);
        }
        copy[index] = Some(result);
    }

    if changed {
        Ok(Arc::new(Value::Array(copy)))
    } else {
        Ok(Arc::clone(original))
    }
}

/// Valid array keys are exactly the strings that round-trip through a
/// base-10 parse: `"3"` is an index, `"03"`, `"3.0"`, `"+3"` and `"-1"`
/// are not.
fn parse_index(key: &str) -> Result<usize, UpdateError> {
    match key.parse::<usize>() {
        Ok(n) if n.to_string() == key => Ok(n),
        _ => Err(UpdateError::NonNumericArrayKey(key.to_string())),
    }
}

fn unset_keys(arg: &Arg) -> Result<Vec<&str>, UpdateError> {
    let operand = arg.operand("unset")?;
    match operand.as_ref() {
        Value::String(key) => Ok(vec![key.as_str()]),
        Value::Array(slots) => {
            let mut keys = Vec::with_capacity(slots.len());
            for slot in slots {
                match slot.as_deref() {
                    Some(Value::String(key)) => keys.push(key.as_str()),
                    _ => return Err(UpdateError::UnsetKeyNotString),
                }
            }
            Ok(keys)
        }
        _ => Err(UpdateError::UnsetKeyNotString),
    }
}
