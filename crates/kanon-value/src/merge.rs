//! Deep merge of plain objects
//!
//! The winning side's value is taken for every key it has; keys only the
//! losing side has are kept. When both sides hold a plain object under the
//! same key the merge recurses. Arrays and every other non-plain value are
//! never merged: the winning side's value is taken whole. Both inputs are
//! left untouched and a new object is returned.

use crate::collections::Object;
use crate::value::{PropertyKey, Value};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Which side wins when both define a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precedence {
    /// First argument wins
    #[default]
    Left,
    /// Second argument wins
    Right,
}

/// Merge two objects with the given precedence
#[must_use]
pub fn merge_deep(left: &Object, right: &Object, precedence: Precedence) -> Object {
    match precedence {
        Precedence::Left => merge_objects(left, right),
        Precedence::Right => merge_objects(right, left),
    }
}

/// Merge two objects, preferring values from `left`
#[must_use]
pub fn merge_deep_left(left: &Object, right: &Object) -> Object {
    merge_deep(left, right, Precedence::Left)
}

/// Merge two objects, preferring values from `right`
#[must_use]
pub fn merge_deep_right(left: &Object, right: &Object) -> Object {
    merge_deep(left, right, Precedence::Right)
}

/// Merge two values that must both be plain objects
///
/// # Errors
///
/// Returns a type mismatch if either side is not a plain object.
pub fn merge_values(left: &Value, right: &Value, precedence: Precedence) -> Result<Value> {
    let left_object = left
        .as_object()
        .ok_or_else(|| Error::type_mismatch("object", left.kind().as_str()))?;
    let right_object = right
        .as_object()
        .ok_or_else(|| Error::type_mismatch("object", right.kind().as_str()))?;

    trace!(
        left_keys = left_object.len(),
        right_keys = right_object.len(),
        ?precedence,
        "Merging objects"
    );
    Ok(Value::Object(merge_deep(left_object, right_object, precedence)))
}

fn merge_objects(winner: &Object, loser: &Object) -> Object {
    let mut merged: IndexMap<PropertyKey, Value> = loser.entries().clone();

    for (key, winning) in winner {
        let value = match (winning, merged.get(key)) {
            (Value::Object(win), Some(Value::Object(lose))) => {
                Value::Object(merge_objects(win, lose))
            }
            _ => winning.clone(),
        };
        merged.insert(key.clone(), value);
    }

    Object::from(merged)
}
