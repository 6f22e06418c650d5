use super::Rebuild;
use crate::schema::{Issue, Outcome, Schema, SchemaKind, mismatch};
use kanon_value::{Object, PropertyKey, Value};

/// Accepts plain objects whose every string key satisfies `key` and every
/// value under it satisfies `value`. Symbol-keyed entries pass through unchecked.
pub fn record(key: impl Into<Schema>, value: impl Into<Schema>) -> Schema {
    Schema::from_kind(SchemaKind::Record {
        key: key.into(),
        value: value.into(),
    })
}

pub(crate) fn validate(
    key_schema: &Schema,
    value_schema: &Schema,
    value: &Value,
    message: Option<&str>,
) -> Outcome {
    let Value::Object(object) = value else {
        return mismatch("record", value, message);
    };

    let mut rebuild = Rebuild::new();
    for (index, (key, entry)) in object.iter().enumerate() {
        if matches!(key, PropertyKey::Symbol(_)) {
            rebuild.keep_with(|| (key.clone(), entry.clone()));
            continue;
        }

        let checked_key = match key_schema.validate(&key.to_value()) {
            Outcome::Valid => None,
            Outcome::Coerced(replacement) => match PropertyKey::from_value(&replacement) {
                Some(coerced) => Some(coerced),
                None => {
                    return Outcome::Invalid(Issue::composition(format!(
                        "Key '{key}': Record keys must be strings or symbols"
                    )));
                }
            },
            Outcome::Invalid(issue) => {
                return Outcome::Invalid(issue.within(format_args!("Key '{key}'")));
            }
        };

        let checked_value = match value_schema.validate(entry) {
            Outcome::Valid => None,
            Outcome::Coerced(replacement) => Some(replacement),
            Outcome::Invalid(issue) => {
                return Outcome::Invalid(issue.within(format_args!("Property '{key}'")));
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
                object
                    .iter()
                    .take(index)
                    .map(|(k, v)| (k.clone(), v.clone()))
            });
        }
    }

    match rebuild.finish() {
        Some(entries) => Outcome::Coerced(Value::Object(entries.into_iter().collect::<Object>())),
        None => Outcome::Valid,
    }
}
