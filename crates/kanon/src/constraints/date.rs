use super::{Constrained, DateRules};
use crate::schema::Refinement;
use kanon_value::{Date, Value};

fn date_bound<P>(name: &'static str, limit: &Date, accepts: P, relation: &str) -> Refinement
where
    P: Fn(i64, i64) -> bool + Send + Sync + 'static,
{
    let limit_millis = limit.timestamp_millis();
    let message = format!("Date must be {relation} {limit}");
    Refinement::new(name, move |value| {
        let Value::Date(date) = value else {
            return Ok(());
        };
        match (date.timestamp_millis(), limit_millis) {
            (Some(actual), Some(limit)) if accepts(actual, limit) => Ok(()),
            _ => Err(message.clone()),
        }
    })
}

impl Constrained<DateRules> {
    /// Not earlier than `min`
    #[must_use]
    pub fn min(&self, min: impl Into<Date>) -> Self {
        self.push(date_bound(
            "min",
            &min.into(),
            |actual, limit| actual >= limit,
            "greater than or equal to",
        ))
    }

    /// Not later than `max`
    #[must_use]
    pub fn max(&self, max: impl Into<Date>) -> Self {
        self.push(date_bound(
            "max",
            &max.into(),
            |actual, limit| actual <= limit,
            "less than or equal to",
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::primitives::date;
    use kanon_value::{Date, Value};

    #[test]
    fn test_min_max_inclusive() {
        let schema = date()
            .min(Date::from_timestamp_millis(1_000))
            .max(Date::from_timestamp_millis(2_000));
        let at = |millis| Value::Date(Date::from_timestamp_millis(millis));

        assert!(schema.validate(&at(999)).is_invalid());
        assert!(schema.validate(&at(1_000)).is_success());
        assert!(schema.validate(&at(2_000)).is_success());
        assert!(schema.validate(&at(2_001)).is_invalid());
    }

    #[test]
    fn test_message_names_the_limit() {
        let schema = date().min(Date::parse("2024-01-01T00:00:00Z"));
        let outcome = schema.validate(&Value::Date(Date::parse("2023-12-31T00:00:00Z")));
        assert_eq!(
            outcome.issue().unwrap().message,
            format!("Date must be greater than or equal to {}", Date::parse("2024-01-01T00:00:00Z"))
        );
    }

    #[test]
    fn test_invalid_limit_rejects_everything() {
        let schema = date().max(Date::invalid());
        assert!(schema.validate(&Value::Date(Date::from_timestamp_millis(0))).is_invalid());
    }
}
