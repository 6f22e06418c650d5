use super::Rebuild;
use crate::constraints::{ConstraintFamily, Constrained, MapSchema};
use crate::schema::{Outcome, Schema, SchemaKind, mismatch};
use kanon_value::{Value, ValueMap};

/// Accepts maps whose every key satisfies `key` and every value satisfies
/// `value`
pub fn map(key: impl Into<Schema>, value: impl Into<Schema>) -> MapSchema {
    Constrained::wrap(
        Schema::from_kind(SchemaKind::Map {
            key: key.into(),
            value: value.into(),
        })
        .with_family(ConstraintFamily::Map),
    )
}

pub(crate) fn validate(
    key_schema: &Schema,
    value_schema: &Schema,
    value: &Value,
    message: Option<&str>,
) -> Outcome {
    let Value::Map(entries) = value else {
        return mismatch("map", value, message);
    };

    let mut rebuild = Rebuild::new();
    for (index, (key, entry)) in entries.iter().enumerate() {
        let checked_key = match key_schema.validate(key) {
            Outcome::Valid => None,
            Outcome::Coerced(replacement) => Some(replacement),
            Outcome::Invalid(issue) => return Outcome::Invalid(issue.within("Key")),
        };
        let checked_value = match value_schema.validate(entry) {
            Outcome::Valid => None,
            Outcome::Coerced(replacement) => Some(replacement),
            Outcome::Invalid(issue) => {
                return Outcome::Invalid(issue.within(format_args!("Value at {key}")));
            }
        };

        if checked_key.is_none() && checked_value.is_none() {
            rebuild.keep_with(|| (key.clone(), entry.clone()));
        } else {
            let pair = (
                checked_key.unwrap_or_else(|| key.clone()),
                checked_value.unwrap_or_else(|| entry.clone()),
            );
            rebuild.replace(pair, || {
                entries
                    .iter()
                    .take(index)
                    .map(|(k, v)| (k.clone(), v.clone()))
            });
        }
    }

    match rebuild.finish() {
        Some(output) => Outcome::Coerced(Value::Map(output.into_iter().collect::<ValueMap>())),
        None => Outcome::Valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{number, string};
    use crate::wrappers::default_value;

    #[test]
    fn test_validates_keys_then_values() {
        let schema = map(string(), number());
        let ok = Value::map(vec![(Value::from("a"), Value::from(1))]);
        assert_eq!(schema.validate(&ok), Outcome::Valid);

        let bad_key = Value::map(vec![(Value::from(1), Value::from(1))]);
        assert_eq!(
            schema.validate(&bad_key).issue().unwrap().message,
            "Key: Expected string, received number"
        );

        let bad_value = Value::map(vec![(Value::from("a"), Value::from("x"))]);
        assert_eq!(
            schema.validate(&bad_value).issue().unwrap().message,
            "Value at \"a\": Expected number, received string"
        );
    }

    #[test]
    fn test_value_coercion_keeps_order() {
        let schema = map(string(), default_value(number(), 9));
        let value = Value::map(vec![
            (Value::from("a"), Value::from(1)),
            (Value::from("b"), Value::Undefined),
            (Value::from("c"), Value::from(3)),
        ]);
        let expected = Value::map(vec![
            (Value::from("a"), Value::from(1)),
            (Value::from("b"), Value::from(9)),
            (Value::from("c"), Value::from(3)),
        ]);
        assert_eq!(schema.validate(&value), Outcome::Coerced(expected));
    }

    #[test]
    fn test_rejects_objects() {
        let outcome = map(string(), number()).validate(&Value::object(Vec::<(&str, Value)>::new()));
        assert_eq!(outcome.issue().unwrap().message, "Expected map, received object");
    }
}
