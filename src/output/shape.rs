//! Transport shaping of a parse result.
//!
//! The result is serialized to a JSON value, every empty member is pruned
//! (null, false, 0, "", [] and {}), and each object gets an `id`. Ids are
//! assigned children-first, members in key order, starting from 0 on every
//! call.

use crate::parser::ParseResult;
use crate::utils::error::OutputError;
use serde_json::{Map, Value};

/// Shape a parse result for output
///
/// **Public** - used by the report writer and library callers
///
/// # Errors
/// * `OutputError::SerializationFailed` - The result could not be converted
pub fn shape(result: &ParseResult) -> Result<Value, OutputError> {
    let mut value = serde_json::to_value(result)?;
    reshape(&mut value);
    Ok(value)
}

/// Prune and renumber a value in place
///
/// Running it on an already shaped value changes nothing: pruning finds
/// nothing left to remove and ids come out in the same order.
pub fn reshape(value: &mut Value) {
    let mut next_id: u64 = 0;
    prune_and_number(value, &mut next_id);
}

/// **Private** - recursive step of reshape
fn prune_and_number(value: &mut Value, next_id: &mut u64) {
    match value {
        Value::Array(items) => {
            for item in items.iter_mut() {
                prune_and_number(item, next_id);
            }
        }
        Value::Object(members) => {
            prune_members(members);
            for member in members.values_mut() {
                prune_and_number(member, next_id);
            }
            members.insert("id".to_string(), Value::from(*next_id));
            *next_id += 1;
        }
        _ => {}
    }
}

fn prune_members(members: &mut Map<String, Value>) {
    let empty: Vec<String> = members
        .iter()
        .filter(|(_, member)| is_empty(member))
        .map(|(key, _)| key.clone())
        .collect();

    for key in empty {
        members.remove(&key);
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(members) => members.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_prunes_empty_members() {
        let mut value = json!({
            "a": null, "b": false, "c": 0, "d": "", "e": [], "f": {},
            "keep": "x", "count": 3, "flag": true
        });
        reshape(&mut value);

        assert_eq!(value, json!({"keep": "x", "count": 3, "flag": true, "id": 0}));
    }

    #[test]
    fn test_ids_are_post_order() {
        let mut value = json!({
            "children": [{"name": "first"}, {"name": "second", "children": [{"name": "deep"}]}]
        });
        reshape(&mut value);

        assert_eq!(value["children"][0]["id"], json!(0));
        assert_eq!(value["children"][1]["children"][0]["id"], json!(1));
        assert_eq!(value["children"][1]["id"], json!(2));
        assert_eq!(value["id"], json!(3));
    }

    #[test]
    fn test_reshape_is_idempotent() {
        let mut value = json!({"x": [{"y": 0, "z": "a"}, {"z": "b"}], "w": 1});
        reshape(&mut value);
        let once = value.clone();
        reshape(&mut value);

        assert_eq!(value, once);
    }
}
