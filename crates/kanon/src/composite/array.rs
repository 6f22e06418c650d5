use super::Rebuild;
use crate::constraints::{ArraySchema, ConstraintFamily, Constrained};
use crate::schema::{Outcome, Schema, SchemaKind, mismatch};
use kanon_value::{Array, Value};

/// Accepts arrays whose every element satisfies `item`
pub fn array(item: impl Into<Schema>) -> ArraySchema {
    Constrained::wrap(
        Schema::from_kind(SchemaKind::Array(item.into())).with_family(ConstraintFamily::Array),
    )
}

pub(crate) fn validate(item: &Schema, value: &Value, message: Option<&str>) -> Outcome {
    let Value::Array(items) = value else {
        return mismatch("array", value, message);
    };

    let mut rebuild = Rebuild::new();
    for (index, element) in items.iter().enumerate() {
        match item.validate(element) {
            Outcome::Valid => rebuild.keep(element),
            Outcome::Coerced(replacement) => {
                rebuild.replace(replacement, || items.as_slice()[..index].to_vec());
            }
            Outcome::Invalid(issue) => {
                return Outcome::Invalid(issue.within(format_args!("Item {index}")));
            }
        }
    }

    match rebuild.finish() {
        Some(output) => Outcome::Coerced(Value::Array(Array::new(output))),
        None => Outcome::Valid,
    }
}
