//! Primitive schema factories
//!
//! Each primitive performs exactly one kind check. Message-less primitives
//! are process-wide singletons; attaching a message or a refinement derives
//! a fresh schema.

use crate::constraints::{
    BigIntSchema, ConstraintFamily, Constrained, DateSchema, NumberSchema, StringSchema,
};
use crate::schema::{Issue, Outcome, Schema, SchemaKind, mismatch};
use kanon_value::Value;
use std::fmt::Write as _;
use std::sync::LazyLock;

static STRING: LazyLock<Schema> =
    LazyLock::new(|| Schema::from_kind(SchemaKind::String).with_family(ConstraintFamily::String));
static NUMBER: LazyLock<Schema> =
    LazyLock::new(|| Schema::from_kind(SchemaKind::Number).with_family(ConstraintFamily::Number));
static INTEGER: LazyLock<Schema> =
    LazyLock::new(|| Schema::from_kind(SchemaKind::Integer).with_family(ConstraintFamily::Number));
static DATE: LazyLock<Schema> =
    LazyLock::new(|| Schema::from_kind(SchemaKind::Date).with_family(ConstraintFamily::Date));
static BIGINT: LazyLock<Schema> =
    LazyLock::new(|| Schema::from_kind(SchemaKind::BigInt).with_family(ConstraintFamily::BigInt));
static BOOLEAN: LazyLock<Schema> = LazyLock::new(|| Schema::from_kind(SchemaKind::Boolean));
static SYMBOL: LazyLock<Schema> = LazyLock::new(|| Schema::from_kind(SchemaKind::Symbol));
static ANY: LazyLock<Schema> = LazyLock::new(|| Schema::from_kind(SchemaKind::Any));
static UNKNOWN: LazyLock<Schema> = LazyLock::new(|| Schema::from_kind(SchemaKind::Unknown));
static NEVER: LazyLock<Schema> = LazyLock::new(|| Schema::from_kind(SchemaKind::Never));
static NULL: LazyLock<Schema> = LazyLock::new(|| Schema::from_kind(SchemaKind::Null));
static UNDEFINED: LazyLock<Schema> = LazyLock::new(|| Schema::from_kind(SchemaKind::Undefined));
static VOID: LazyLock<Schema> = LazyLock::new(|| Schema::from_kind(SchemaKind::Void));

/// Accepts strings
#[must_use]
pub fn string() -> StringSchema {
    Constrained::wrap(STRING.clone())
}

/// Accepts numbers other than NaN
#[must_use]
pub fn number() -> NumberSchema {
    Constrained::wrap(NUMBER.clone())
}

/// Accepts finite numbers without a fractional part
#[must_use]
pub fn integer() -> NumberSchema {
    Constrained::wrap(INTEGER.clone())
}

/// Accepts dates holding a valid timestamp
#[must_use]
pub fn date() -> DateSchema {
    Constrained::wrap(DATE.clone())
}

/// Accepts big integers
#[must_use]
pub fn bigint() -> BigIntSchema {
    Constrained::wrap(BIGINT.clone())
}

/// Accepts booleans
#[must_use]
pub fn boolean() -> Schema {
    BOOLEAN.clone()
}

/// Accepts symbols
#[must_use]
pub fn symbol() -> Schema {
    SYMBOL.clone()
}

/// Accepts every value
#[must_use]
pub fn any() -> Schema {
    ANY.clone()
}

/// Accepts every value
#[must_use]
pub fn unknown() -> Schema {
    UNKNOWN.clone()
}

/// Accepts no value
#[must_use]
pub fn never() -> Schema {
    NEVER.clone()
}

/// Accepts `null`
#[must_use]
pub fn null() -> Schema {
    NULL.clone()
}

/// Accepts `undefined`
#[must_use]
pub fn undefined() -> Schema {
    UNDEFINED.clone()
}

/// Accepts `undefined`
#[must_use]
pub fn void() -> Schema {
    VOID.clone()
}

/// Accepts one of a fixed list of strings
pub fn enumeration<I, S>(values: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Schema::from_kind(SchemaKind::Enum(values.into_iter().map(Into::into).collect()))
}

/// Accepts values strictly equal to `value`
pub fn literal(value: impl Into<Value>) -> Schema {
    Schema::from_kind(SchemaKind::Literal(value.into()))
}

/// Accepts any value of a named-constant table
pub fn native_enum(table: NativeEnum) -> Schema {
    Schema::from_kind(SchemaKind::NativeEnum(table))
}

/// Named constants whose values are strings or numbers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeEnum {
    entries: Vec<(String, Value)>,
}

impl NativeEnum {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string-valued constant
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((name.into(), Value::String(value.into())));
        self
    }

    /// Add a number-valued constant
    #[must_use]
    pub fn numeric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.entries.push((name.into(), Value::Number(value)));
        self
    }

    /// Constant names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Constant values in declaration order
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Check whether `value` is strictly equal to one of the constants
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.values().any(|candidate| candidate.strict_equals(value))
    }
}

pub(crate) fn check_string(value: &Value, message: Option<&str>) -> Outcome {
    match value {
        Value::String(_) => Outcome::Valid,
        _ => mismatch("string", value, message),
    }
}

pub(crate) fn check_number(value: &Value, message: Option<&str>) -> Outcome {
    match value {
        Value::Number(n) if !n.is_nan() => Outcome::Valid,
        _ => mismatch("number", value, message),
    }
}

pub(crate) fn check_integer(value: &Value, message: Option<&str>) -> Outcome {
    match value {
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 => Outcome::Valid,
        _ => mismatch("integer", value, message),
    }
}

pub(crate) fn check_boolean(value: &Value, message: Option<&str>) -> Outcome {
    match value {
        Value::Bool(_) => Outcome::Valid,
        _ => mismatch("boolean", value, message),
    }
}

pub(crate) fn check_bigint(value: &Value, message: Option<&str>) -> Outcome {
    match value {
        Value::BigInt(_) => Outcome::Valid,
        _ => mismatch("bigint", value, message),
    }
}

pub(crate) fn check_symbol(value: &Value, message: Option<&str>) -> Outcome {
    match value {
        Value::Symbol(_) => Outcome::Valid,
        _ => mismatch("symbol", value, message),
    }
}

pub(crate) fn check_date(value: &Value, message: Option<&str>) -> Outcome {
    match value {
        Value::Date(date) if date.is_valid() => Outcome::Valid,
        Value::Date(_) => Outcome::Invalid(Issue::kind_mismatch(message.unwrap_or("Invalid date"))),
        _ => mismatch("date", value, message),
    }
}

pub(crate) fn check_null(value: &Value, message: Option<&str>) -> Outcome {
    if value.is_null() {
        Outcome::Valid
    } else {
        mismatch("null", value, message)
    }
}

pub(crate) fn check_undefined(value: &Value, message: Option<&str>) -> Outcome {
    if value.is_undefined() {
        Outcome::Valid
    } else {
        mismatch("undefined", value, message)
    }
}

pub(crate) fn check_never(value: &Value, message: Option<&str>) -> Outcome {
    mismatch("never", value, message)
}

pub(crate) fn check_enum(values: &[String], value: &Value, message: Option<&str>) -> Outcome {
    let matched = value
        .as_str()
        .is_some_and(|text| values.iter().any(|candidate| candidate == text));
    if matched {
        Outcome::Valid
    } else {
        enum_failure(values.iter().map(String::as_str), value, message)
    }
}

/// Failure listing the accepted strings
pub(crate) fn enum_failure<'a>(
    candidates: impl Iterator<Item = &'a str>,
    value: &Value,
    message: Option<&str>,
) -> Outcome {
    let text = match message {
        Some(custom) => custom.to_string(),
        None => {
            let mut expected = String::new();
            for (i, candidate) in candidates.enumerate() {
                if i > 0 {
                    expected.push_str(" | ");
                }
                let _ = write!(expected, "'{candidate}'");
            }
            format!("Invalid enum value. Expected {expected}, received {value}")
        }
    };
    Outcome::Invalid(Issue::kind_mismatch(text))
}

pub(crate) fn check_literal(expected: &Value, value: &Value, message: Option<&str>) -> Outcome {
    if expected.strict_equals(value) {
        Outcome::Valid
    } else {
        let text = message.map_or_else(
            || format!("Invalid literal value, expected {expected}"),
            ToString::to_string,
        );
        Outcome::Invalid(Issue::kind_mismatch(text))
    }
}

pub(crate) fn check_native_enum(table: &NativeEnum, value: &Value, message: Option<&str>) -> Outcome {
    if table.contains(value) {
        Outcome::Valid
    } else {
        let text = message.map_or_else(
            || format!("Invalid enum value, received {value}"),
            ToString::to_string,
        );
        Outcome::Invalid(Issue::kind_mismatch(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanon_value::{Date, Symbol};

    fn message(schema: &Schema, value: &Value) -> String {
        schema.validate(value).issue().map(|i| i.message.clone()).unwrap_or_default()
    }

    #[test]
    fn test_string() {
        assert_eq!(string().validate(&Value::from("a")), Outcome::Valid);
        assert_eq!(message(&string(), &Value::from(1)), "Expected string, received number");
    }

    #[test]
    fn test_number_rejects_nan_accepts_infinity() {
        assert_eq!(message(&number(), &Value::Number(f64::NAN)), "Expected number, received nan");
        assert!(number().validate(&Value::Number(f64::INFINITY)).is_success());
    }

    #[test]
    fn test_integer() {
        assert!(integer().validate(&Value::from(4)).is_success());
        assert!(integer().validate(&Value::from(4.5)).is_invalid());
        assert!(integer().validate(&Value::Number(f64::INFINITY)).is_invalid());
        assert_eq!(message(&integer(), &Value::from("4")), "Expected integer, received string");
    }

    #[test]
    fn test_date() {
        assert!(date().validate(&Value::Date(Date::from_timestamp_millis(0))).is_success());
        assert_eq!(message(&date(), &Value::Date(Date::invalid())), "Invalid date");
        assert_eq!(message(&date(), &Value::from("2024-01-01")), "Expected date, received string");
    }

    #[test]
    fn test_singletons_are_shared() {
        assert!(boolean().ptr_eq(&boolean()));
        assert!(string().schema().ptr_eq(string().schema()));
        let custom = boolean().with_message("flag");
        assert!(!custom.ptr_eq(&boolean()));
        assert_eq!(boolean().message(), None);
    }

    #[test]
    fn test_null_undefined_void() {
        assert!(null().validate(&Value::Null).is_success());
        assert!(null().validate(&Value::Undefined).is_invalid());
        assert!(undefined().validate(&Value::Undefined).is_success());
        assert!(void().validate(&Value::Undefined).is_success());
        assert!(void().validate(&Value::Null).is_invalid());
    }

    #[test]
    fn test_any_unknown_never() {
        let symbol = Value::from(Symbol::new("s"));
        assert!(any().validate(&symbol).is_success());
        assert!(unknown().validate(&Value::Undefined).is_success());
        assert_eq!(message(&never(), &Value::Null), "Expected never, received null");
    }

    #[test]
    fn test_enumeration() {
        let schema = enumeration(["red", "green"]);
        assert!(schema.validate(&Value::from("red")).is_success());
        assert_eq!(
            message(&schema, &Value::from("blue")),
            "Invalid enum value. Expected 'red' | 'green', received \"blue\""
        );
        assert!(schema.validate(&Value::from(1)).is_invalid());
    }

    #[test]
    fn test_literal_strict_equality() {
        assert!(literal(3).validate(&Value::from(3.0)).is_success());
        assert!(literal("a").validate(&Value::from("b")).is_invalid());
        assert!(literal(f64::NAN).validate(&Value::Number(f64::NAN)).is_invalid());

        let shared = Value::array(vec![Value::from(1)]);
        assert!(literal(shared.clone()).validate(&shared).is_success());
        assert!(literal(shared).validate(&Value::array(vec![Value::from(1)])).is_invalid());
    }

    #[test]
    fn test_native_enum() {
        let table = NativeEnum::new().text("Up", "UP").numeric("Down", 1.0);
        let schema = native_enum(table);
        assert!(schema.validate(&Value::from("UP")).is_success());
        assert!(schema.validate(&Value::from(1)).is_success());
        assert!(schema.validate(&Value::from("Up")).is_invalid());
    }
}
