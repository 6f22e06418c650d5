use super::{BigIntRules, Constrained};
use crate::schema::Refinement;
use kanon_value::Value;

fn bigint_bound<P>(name: &'static str, accepts: P, message: String) -> Refinement
where
    P: Fn(i128) -> bool + Send + Sync + 'static,
{
    Refinement::new(name, move |value| match value {
        Value::BigInt(n) if !accepts(*n) => Err(message.clone()),
        _ => Ok(()),
    })
}

impl Constrained<BigIntRules> {
    /// Greater than or equal to `min`
    #[must_use]
    pub fn min(&self, min: i128) -> Self {
        self.push(bigint_bound(
            "min",
            move |n| n >= min,
            format!("BigInt must be greater than or equal to {min}"),
        ))
    }

    /// Less than or equal to `max`
    #[must_use]
    pub fn max(&self, max: i128) -> Self {
        self.push(bigint_bound(
            "max",
            move |n| n <= max,
            format!("BigInt must be less than or equal to {max}"),
        ))
    }

    /// Greater than zero
    #[must_use]
    pub fn positive(&self) -> Self {
        self.push(bigint_bound("positive", |n| n > 0, "BigInt must be greater than 0".to_string()))
    }

    /// Less than zero
    #[must_use]
    pub fn negative(&self) -> Self {
        self.push(bigint_bound("negative", |n| n < 0, "BigInt must be less than 0".to_string()))
    }

    /// Zero or more
    #[must_use]
    pub fn nonnegative(&self) -> Self {
        self.push(bigint_bound(
            "nonnegative",
            |n| n >= 0,
            "BigInt must be greater than or equal to 0".to_string(),
        ))
    }

    /// Zero or less
    #[must_use]
    pub fn nonpositive(&self) -> Self {
        self.push(bigint_bound(
            "nonpositive",
            |n| n <= 0,
            "BigInt must be less than or equal to 0".to_string(),
        ))
    }

    /// An integral multiple of `step`; a zero step accepts nothing
    #[must_use]
    pub fn multiple_of(&self, step: i128) -> Self {
        self.push(bigint_bound(
            "multiple_of",
            move |n| step != 0 && n % step == 0,
            format!("BigInt must be a multiple of {step}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::primitives::bigint;
    use kanon_value::Value;

    #[test]
    fn test_bounds() {
        let schema = bigint().min(-2).max(2);
        assert!(schema.validate(&Value::BigInt(-2)).is_success());
        assert!(schema.validate(&Value::BigInt(3)).is_invalid());
        assert_eq!(
            schema.validate(&Value::BigInt(-3)).issue().unwrap().message,
            "BigInt must be greater than or equal to -2"
        );
    }

    #[test]
    fn test_sign_and_multiple() {
        assert!(bigint().positive().validate(&Value::BigInt(0)).is_invalid());
        assert!(bigint().nonnegative().validate(&Value::BigInt(0)).is_success());
        assert!(bigint().negative().validate(&Value::BigInt(-1)).is_success());
        assert!(bigint().nonpositive().validate(&Value::BigInt(1)).is_invalid());
        assert!(bigint().multiple_of(4).validate(&Value::BigInt(12)).is_success());
        assert!(bigint().multiple_of(4).validate(&Value::BigInt(10)).is_invalid());
        assert!(bigint().multiple_of(0).validate(&Value::BigInt(0)).is_invalid());
    }

    #[test]
    fn test_rejects_numbers_by_kind() {
        let outcome = bigint().min(0).validate(&Value::from(5));
        assert_eq!(outcome.issue().unwrap().message, "Expected bigint, received number");
    }
}
