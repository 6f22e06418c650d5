//! serde integration
//!
//! Values serialize to a JSON-friendly projection: `undefined`, NaN and
//! invalid dates become `null`, big integers become strings, dates become
//! RFC 3339 strings, maps become arrays of `[key, value]` pairs and sets
//! become arrays. Symbol-keyed and undefined-valued object properties are
//! skipped. Deserialization accepts any self-describing format.

use crate::value::{PropertyKey, Value};
use crate::{Error, Result};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest integer a double represents exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Undefined | Value::Null | Value::Symbol(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serialize_number(*n, serializer),
            Value::BigInt(n) => serializer.serialize_str(&n.to_string()),
            Value::String(text) => serializer.serialize_str(text),
            Value::Date(date) => match date.to_rfc3339() {
                Some(text) => serializer.serialize_str(&text),
                None => serializer.serialize_unit(),
            },
            Value::Array(array) => {
                let mut seq = serializer.serialize_seq(Some(array.len()))?;
                for item in array {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(object) => {
                let mut map = serializer.serialize_map(None)?;
                for (key, value) in object {
                    if let PropertyKey::String(key) = key {
                        if !value.is_undefined() {
                            map.serialize_entry(key, value)?;
                        }
                    }
                }
                map.end()
            }
            Value::Map(entries) => {
                let mut seq = serializer.serialize_seq(Some(entries.len()))?;
                for pair in entries.iter() {
                    seq.serialize_element(&pair)?;
                }
                seq.end()
            }
            Value::Set(set) => {
                let mut seq = serializer.serialize_seq(Some(set.len()))?;
                for item in set {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn serialize_number<S>(n: f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if !n.is_finite() {
        serializer.serialize_unit()
    } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(text) => Value::String(text),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(entries) => Value::object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value))),
            ),
        }
    }
}

impl Value {
    /// Project the value onto JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer rejects the projection.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| Error::conversion("json", e.to_string()))
    }

    /// Parse JSON text into a value
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not valid JSON.
    pub fn from_json_str(text: &str) -> Result<Value> {
        serde_json::from_str(text).map_err(|e| Error::conversion("json", e.to_string()))
    }
}
