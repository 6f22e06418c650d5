//! Union and intersection

use crate::schema::{Issue, Outcome, Schema, SchemaKind, relabel};
use kanon_value::Value;

const UNION_FAILURE: &str = "Invalid input: value did not match any union member";

/// Accepts values matching any branch; the first matching branch's outcome
/// is returned
pub fn union<I, S>(branches: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    Schema::from_kind(SchemaKind::Union(branches.into_iter().map(Into::into).collect()))
}

/// Accepts values matching every branch; the input is returned unchanged
pub fn intersection<I, S>(branches: I) -> Schema
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    Schema::from_kind(SchemaKind::Intersection(
        branches.into_iter().map(Into::into).collect(),
    ))
}

impl Schema {
    /// Union of this schema and `other`
    #[must_use]
    pub fn or(&self, other: impl Into<Schema>) -> Schema {
        union([self.clone(), other.into()])
    }

    /// Intersection of this schema and `other`
    #[must_use]
    pub fn and(&self, other: impl Into<Schema>) -> Schema {
        intersection([self.clone(), other.into()])
    }
}

pub(crate) fn validate_union(branches: &[Schema], value: &Value, message: Option<&str>) -> Outcome {
    for branch in branches {
        let outcome = branch.validate(value);
        if outcome.is_success() {
            return outcome;
        }
    }
    Outcome::Invalid(Issue::composition(message.unwrap_or(UNION_FAILURE)))
}

pub(crate) fn validate_intersection(
    branches: &[Schema],
    value: &Value,
    message: Option<&str>,
) -> Outcome {
    for branch in branches {
        let outcome = branch.validate(value);
        if outcome.is_invalid() {
            return relabel(outcome, message);
        }
    }
    Outcome::Valid
}
