use super::Rebuild;
use crate::schema::{Issue, Outcome, Schema, SchemaKind, mismatch};
use kanon_value::{Array, Value};

/// Positional item schemas with an optional rest schema
#[derive(Debug, Clone)]
pub struct TupleItems {
    items: Vec<Schema>,
    rest: Option<Schema>,
}

impl TupleItems {
    /// Positional schemas
    #[must_use]
    pub fn items(&self) -> &[Schema] {
        &self.items
    }

    /// Schema for elements past the positional ones
    #[must_use]
    pub fn rest(&self) -> Option<&Schema> {
        self.rest.as_ref()
    }
}

/// Accepts arrays of exactly `items.len()` elements, each satisfying the
/// schema at its position
pub fn tuple<I, S>(items: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    Schema::from_kind(SchemaKind::Tuple(TupleItems {
        items: items.into_iter().map(Into::into).collect(),
        rest: None,
    }))
}

/// Accepts arrays of at least `items.len()` elements; extra elements must
/// satisfy `rest`
pub fn tuple_with_rest<I, S>(items: I, rest: impl Into<Schema>) -> Schema
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    Schema::from_kind(SchemaKind::Tuple(TupleItems {
        items: items.into_iter().map(Into::into).collect(),
        rest: Some(rest.into()),
    }))
}

pub(crate) fn validate(tuple: &TupleItems, value: &Value, message: Option<&str>) -> Outcome {
    let Value::Array(elements) = value else {
        return mismatch("tuple", value, message);
    };

    let expected = tuple.items.len();
    let length_ok = match tuple.rest {
        Some(_) => elements.len() >= expected,
        None => elements.len() == expected,
    };
    if !length_ok {
        let text = match (message, &tuple.rest) {
            (Some(custom), _) => custom.to_string(),
            (None, Some(_)) => format!("Tuple must contain at least {expected} item(s)"),
            (None, None) => format!("Tuple must contain exactly {expected} item(s)"),
        };
        return Outcome::Invalid(Issue::kind_mismatch(text));
    }

    let mut rebuild = Rebuild::new();
    for (index, element) in elements.iter().enumerate() {
        let schema = match tuple.items.get(index) {
            Some(schema) => schema,
            None => match &tuple.rest {
                Some(rest) => rest,
                None => break,
            },
        };
        match schema.validate(element) {
            Outcome::Valid => rebuild.keep(element),
            Outcome::Coerced(replacement) => {
                rebuild.replace(replacement, || elements.as_slice()[..index].to_vec());
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{boolean, number, string};
    use crate::wrappers::default_value;

    fn pair() -> Schema {
        tuple([Schema::from(string()), Schema::from(number())])
    }

    #[test]
    fn test_positional_validation() {
        let value = Value::array(vec![Value::from("a"), Value::from(1)]);
        assert_eq!(pair().validate(&value), Outcome::Valid);

        let swapped = Value::array(vec![Value::from(1), Value::from("a")]);
        assert_eq!(
            pair().validate(&swapped).issue().unwrap().message,
            "Item 0: Expected string, received number"
        );
    }

    #[test]
    fn test_length_must_match_without_rest() {
        let short = Value::array(vec![Value::from("a")]);
        assert_eq!(
            pair().validate(&short).issue().unwrap().message,
            "Tuple must contain exactly 2 item(s)"
        );
        let long = Value::array(vec![Value::from("a"), Value::from(1), Value::from(2)]);
        assert!(pair().validate(&long).is_invalid());
    }

    #[test]
    fn test_rest_validates_extra_elements() {
        let schema = tuple_with_rest([string()], boolean());
        let ok = Value::array(vec![Value::from("a"), Value::from(true), Value::from(false)]);
        assert_eq!(schema.validate(&ok), Outcome::Valid);

        let bad = Value::array(vec![Value::from("a"), Value::from(true), Value::from(3)]);
        assert_eq!(
            schema.validate(&bad).issue().unwrap().message,
            "Item 2: Expected boolean, received number"
        );

        let short = Value::array(Vec::new());
        assert_eq!(
            schema.validate(&short).issue().unwrap().message,
            "Tuple must contain at least 1 item(s)"
        );
    }

    #[test]
    fn test_coercion_rebuilds_array() {
        let schema = tuple_with_rest(
            [Schema::from(string()), default_value(number(), 7)],
            default_value(boolean(), false),
        );
        let value = Value::array(vec![Value::from("a"), Value::Undefined, Value::Undefined]);
        assert_eq!(
            schema.validate(&value),
            Outcome::Coerced(Value::array(vec![
                Value::from("a"),
                Value::from(7),
                Value::from(false),
            ]))
        );

        let untouched = Value::array(vec![Value::from("a"), Value::from(1), Value::from(true)]);
        assert_eq!(schema.validate(&untouched), Outcome::Valid);
    }

    #[test]
    fn test_rejects_non_arrays() {
        assert_eq!(
            pair().validate(&Value::Null).issue().unwrap().message,
            "Expected tuple, received null"
        );
    }
}
