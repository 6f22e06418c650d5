//! Object shapes
//!
//! An object schema validates the declared keys of a plain object in shape
//! order. Keys the shape does not declare pass through untouched. An absent
//! key is validated as `undefined`, so optional fields accept absence and
//! defaults can fill it in.

use crate::constraints::{ConstraintFamily, Constrained, ObjectSchema};
use crate::primitives::enum_failure;
use crate::schema::{Issue, Outcome, Schema, SchemaKind, mismatch};
use indexmap::IndexMap;
use kanon_value::{Object, PropertyKey, Value};
use std::sync::Arc;

static UNDEFINED: Value = Value::Undefined;

/// Ordered field declarations of an object schema
#[derive(Debug, Clone, Default)]
pub struct Shape {
    fields: Arc<IndexMap<String, Schema>>,
}

impl Shape {
    /// Create an empty shape
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field; redeclaring a key replaces its schema in place
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, schema: impl Into<Schema>) -> Self {
        Arc::make_mut(&mut self.fields).insert(key.into(), schema.into());
        self
    }

    /// Number of declared fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no field is declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Schema of a declared field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Schema> {
        self.fields.get(key)
    }

    /// Check if a key is declared
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Declared keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    /// Declared fields in order
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Schema> {
        self.fields.iter()
    }

    /// Shape of an object-like schema (object, partial, required, pick, omit),
    /// looking through lazy and readonly wrappers
    #[must_use]
    pub fn of(schema: &Schema) -> Option<&Shape> {
        match schema.kind() {
            SchemaKind::Object(shape)
            | SchemaKind::Partial(shape)
            | SchemaKind::Required(shape)
            | SchemaKind::Pick(shape)
            | SchemaKind::Omit(shape) => Some(shape),
            SchemaKind::Lazy(lazy) => Shape::of(lazy.resolve()),
            SchemaKind::Readonly(inner) => Shape::of(inner),
            _ => None,
        }
    }

    pub(crate) fn map_fields(&self, update: impl Fn(&Schema) -> Schema) -> Shape {
        self.iter().map(|(key, schema)| (key.clone(), update(schema))).collect()
    }

    pub(crate) fn filter(&self, keep: impl Fn(&str) -> bool) -> Shape {
        self.iter()
            .filter(|(key, _)| keep(key))
            .map(|(key, schema)| (key.clone(), schema.clone()))
            .collect()
    }
}

impl<K, S> FromIterator<(K, S)> for Shape
where
    K: Into<String>,
    S: Into<Schema>,
{
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        Self {
            fields: Arc::new(
                iter.into_iter()
                    .map(|(key, schema)| (key.into(), schema.into()))
                    .collect(),
            ),
        }
    }
}

/// Accepts plain objects whose declared keys satisfy the shape
pub fn object(shape: Shape) -> ObjectSchema {
    Constrained::wrap(
        Schema::from_kind(SchemaKind::Object(shape)).with_family(ConstraintFamily::Object),
    )
}

/// How absent or undefined keys are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
    /// Absent keys are validated as `undefined` by the field schema
    Declared,
    /// Absent or undefined keys fail before the field schema runs
    Required,
}

pub(crate) fn validate(
    shape: &Shape,
    presence: Presence,
    value: &Value,
    message: Option<&str>,
) -> Outcome {
    let Value::Object(object) = value else {
        return mismatch("object", value, message);
    };

    let mut rebuilt: Option<IndexMap<PropertyKey, Value>> = None;
    for (key, schema) in shape.iter() {
        let property = PropertyKey::from(key.as_str());
        let current = object.get(&property);

        if presence == Presence::Required && current.is_none_or(Value::is_undefined) {
            return Outcome::Invalid(Issue::composition(format!("Property '{key}': Required")));
        }

        match schema.validate(current.unwrap_or(&UNDEFINED)) {
            Outcome::Valid => {}
            Outcome::Coerced(replacement) => {
                rebuilt
                    .get_or_insert_with(|| object.entries().clone())
                    .insert(property, replacement);
            }
            Outcome::Invalid(issue) => {
                return Outcome::Invalid(issue.within(format_args!("Property '{key}'")));
            }
        }
    }

    match rebuilt {
        Some(entries) => Outcome::Coerced(Value::Object(Object::from(entries))),
        None => Outcome::Valid,
    }
}

/// keyof: a string naming one of the shape's keys
pub(crate) fn validate_key(shape: &Shape, value: &Value, message: Option<&str>) -> Outcome {
    match value.as_str() {
        Some(key) if shape.contains_key(key) => Outcome::Valid,
        _ => enum_failure(shape.keys(), value, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{number, string};
    use crate::wrappers::{default_value, optional};

    fn person() -> ObjectSchema {
        object(Shape::new().field("name", string()).field("age", number()))
    }

    #[test]
    fn test_accepts_and_passes_unknown_keys_through() {
        let value = Value::object([
            ("name", Value::from("Ann")),
            ("age", Value::from(30)),
            ("extra", Value::from(true)),
        ]);
        assert_eq!(person().validate(&value), Outcome::Valid);
    }

    #[test]
    fn test_labels_first_failing_property() {
        let value = Value::object([("name", Value::from(1)), ("age", Value::from("x"))]);
        assert_eq!(
            person().validate(&value).issue().unwrap().message,
            "Property 'name': Expected string, received number"
        );
    }

    #[test]
    fn test_absent_key_is_undefined() {
        let value = Value::object([("name", Value::from("Ann"))]);
        assert_eq!(
            person().validate(&value).issue().unwrap().message,
            "Property 'age': Expected number, received undefined"
        );

        let relaxed = object(Shape::new().field("name", string()).field("age", optional(number())));
        assert_eq!(relaxed.validate(&value), Outcome::Valid);
    }

    #[test]
    fn test_default_inserts_absent_key() {
        let schema = object(Shape::new().field("name", string()).field("age", default_value(number(), 18)));
        let value = Value::object([("name", Value::from("Ann"))]);
        assert_eq!(
            schema.validate(&value),
            Outcome::Coerced(Value::object([("name", Value::from("Ann")), ("age", Value::from(18))]))
        );
    }

    #[test]
    fn test_rejects_non_objects() {
        assert_eq!(
            person().validate(&Value::array(Vec::new())).issue().unwrap().message,
            "Expected object, received array"
        );
    }

    #[test]
    fn test_field_redeclaration_keeps_position() {
        let shape = Shape::new().field("a", string()).field("b", string()).field("a", number());
        assert_eq!(shape.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(shape.get("a").map(Schema::tag), Some(crate::SchemaTag::Number));
    }
}
