//! Parser pipeline
//!
//! `parse` turns an invalid outcome into an error; `safe_parse` wraps every
//! outcome into a [`SafeParseResult`] and never fails.

use crate::schema::{Issue, Outcome, Schema};
use crate::{Error, Result};
use kanon_value::Value;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

/// Caller-supplied parse options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Label attached to log records for this call
    pub label: Option<String>,
    /// Opaque caller data, not read by the engine
    pub extensions: serde_json::Map<String, serde_json::Value>,
}

impl ParseConfig {
    /// Config with a log label
    #[must_use]
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }
}

/// Outcome of a non-failing parse
#[derive(Debug, Clone, PartialEq)]
pub enum SafeParseResult {
    /// The input, or its coerced replacement
    Success { data: Value },
    /// The first failure message
    Failure { error: String },
}

impl SafeParseResult {
    /// Check for success
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, SafeParseResult::Success { .. })
    }

    /// The parsed data
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            SafeParseResult::Success { data } => Some(data),
            SafeParseResult::Failure { .. } => None,
        }
    }

    /// The failure message
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            SafeParseResult::Success { .. } => None,
            SafeParseResult::Failure { error } => Some(error),
        }
    }

    /// Convert to a plain result
    ///
    /// # Errors
    ///
    /// Returns the failure message for failed parses.
    pub fn into_result(self) -> std::result::Result<Value, String> {
        match self {
            SafeParseResult::Success { data } => Ok(data),
            SafeParseResult::Failure { error } => Err(error),
        }
    }
}

impl Serialize for SafeParseResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("SafeParseResult", 2)?;
        match self {
            SafeParseResult::Success { data } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            SafeParseResult::Failure { error } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

fn run(schema: &Schema, input: &Value, config: &ParseConfig) -> std::result::Result<Value, Issue> {
    match schema.validate(input) {
        Outcome::Valid => Ok(input.clone()),
        Outcome::Coerced(value) => Ok(value),
        Outcome::Invalid(issue) => {
            debug!(
                label = config.label.as_deref().unwrap_or("-"),
                schema = %schema.tag(),
                code = ?issue.code,
                message = %issue.message,
                "Parse failed"
            );
            Err(issue)
        }
    }
}

/// Validate `input`, returning the (possibly coerced) value
///
/// # Errors
///
/// Returns `Error::Invalid` with the first failure.
pub fn parse(schema: &Schema, input: &Value) -> Result<Value> {
    parse_with(schema, input, &ParseConfig::default())
}

/// Validate `input` with caller options
///
/// # Errors
///
/// Returns `Error::Invalid` with the first failure.
pub fn parse_with(schema: &Schema, input: &Value, config: &ParseConfig) -> Result<Value> {
    run(schema, input, config).map_err(Error::Invalid)
}

/// Validate `input` without failing
#[must_use]
pub fn safe_parse(schema: &Schema, input: &Value) -> SafeParseResult {
    safe_parse_with(schema, input, &ParseConfig::default())
}

/// Validate `input` with caller options without failing
#[must_use]
pub fn safe_parse_with(schema: &Schema, input: &Value, config: &ParseConfig) -> SafeParseResult {
    match run(schema, input, config) {
        Ok(data) => SafeParseResult::Success { data },
        Err(issue) => SafeParseResult::Failure {
            error: issue.message,
        },
    }
}

impl Schema {
    /// See [`parse`]
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` with the first failure.
    pub fn parse(&self, input: &Value) -> Result<Value> {
        parse(self, input)
    }

    /// See [`parse_with`]
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` with the first failure.
    pub fn parse_with(&self, input: &Value, config: &ParseConfig) -> Result<Value> {
        parse_with(self, input, config)
    }

    /// See [`safe_parse`]
    #[must_use]
    pub fn safe_parse(&self, input: &Value) -> SafeParseResult {
        safe_parse(self, input)
    }

    /// See [`safe_parse_with`]
    #[must_use]
    pub fn safe_parse_with(&self, input: &Value, config: &ParseConfig) -> SafeParseResult {
        safe_parse_with(self, input, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::set::set;
    use crate::primitives::{number, string};
    use crate::schema::IssueCode;
    use crate::wrappers::default_value;
    use serde_json::json;

    #[test]
    fn test_parse_returns_input_when_valid() {
        let input = Value::from("hello");
        assert_eq!(string().parse(&input).unwrap(), input);
    }

    #[test]
    fn test_parse_returns_coerced_value() {
        let schema = default_value(number(), 3);
        assert_eq!(schema.parse(&Value::Undefined).unwrap(), Value::from(3));
    }

    #[test]
    fn test_parse_error_carries_issue() {
        let err = number().parse(&Value::from("x")).unwrap_err();
        let issue = err.issue().unwrap();
        assert_eq!(issue.code, IssueCode::KindMismatch);
        assert_eq!(err.to_string(), "Expected number, received string");
    }

    #[test]
    fn test_safe_parse_failure() {
        let schema = set(string()).min_size(2);
        let result = schema.safe_parse(&Value::set(vec![Value::from("a")]));
        assert_eq!(
            result,
            SafeParseResult::Failure {
                error: "Set must contain at least 2 item(s)".to_string()
            }
        );
        assert_eq!(result.clone().into_result(), Err("Set must contain at least 2 item(s)".to_string()));
        assert!(result.data().is_none());
    }

    #[test]
    fn test_safe_parse_serializes_with_success_flag() {
        let ok = SafeParseResult::Success {
            data: Value::from(1),
        };
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"success": true, "data": 1}));

        let failed = SafeParseResult::Failure {
            error: "nope".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"success": false, "error": "nope"})
        );
    }

    #[test]
    fn test_parse_config_defaults_and_deserializes() {
        let config: ParseConfig = serde_json::from_value(json!({"label": "signup"})).unwrap();
        assert_eq!(config, ParseConfig::labeled("signup"));
        assert!(safe_parse_with(&Schema::from(string()), &Value::from(1), &config).error().is_some());
    }
}
