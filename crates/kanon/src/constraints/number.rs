use super::{Constrained, NumberRules};
use crate::schema::Refinement;
use kanon_value::Value;

fn number_rule<F>(name: &'static str, check: F) -> Refinement
where
    F: Fn(f64) -> Result<(), String> + Send + Sync + 'static,
{
    Refinement::new(name, move |value| match value {
        Value::Number(n) => check(*n),
        _ => Ok(()),
    })
}

fn bound<P>(name: &'static str, accepts: P, message: String) -> Refinement
where
    P: Fn(f64) -> bool + Send + Sync + 'static,
{
    number_rule(name, move |n| if accepts(n) { Ok(()) } else { Err(message.clone()) })
}

/// Tolerant divisibility test so that decimal steps such as 0.1 work.
fn is_multiple(value: f64, step: f64) -> bool {
    if step == 0.0 || !value.is_finite() {
        return false;
    }
    let ratio = value / step;
    (ratio - ratio.round()).abs() <= 1e-9 * ratio.abs().max(1.0)
}

impl Constrained<NumberRules> {
    /// Greater than or equal to `min`
    #[must_use]
    pub fn min(&self, min: f64) -> Self {
        self.push(bound(
            "min",
            move |n| n >= min,
            format!("Number must be greater than or equal to {min}"),
        ))
    }

    /// Less than or equal to `max`
    #[must_use]
    pub fn max(&self, max: f64) -> Self {
        self.push(bound(
            "max",
            move |n| n <= max,
            format!("Number must be less than or equal to {max}"),
        ))
    }

    /// Strictly greater than `min`
    #[must_use]
    pub fn gt(&self, min: f64) -> Self {
        self.push(bound("gt", move |n| n > min, format!("Number must be greater than {min}")))
    }

    /// Strictly less than `max`
    #[must_use]
    pub fn lt(&self, max: f64) -> Self {
        self.push(bound("lt", move |n| n < max, format!("Number must be less than {max}")))
    }

    /// Greater than zero
    #[must_use]
    pub fn positive(&self) -> Self {
        self.push(bound("positive", |n| n > 0.0, "Number must be greater than 0".to_string()))
    }

    /// Less than zero
    #[must_use]
    pub fn negative(&self) -> Self {
        self.push(bound("negative", |n| n < 0.0, "Number must be less than 0".to_string()))
    }

    /// Zero or more
    #[must_use]
    pub fn nonnegative(&self) -> Self {
        self.push(bound(
            "nonnegative",
            |n| n >= 0.0,
            "Number must be greater than or equal to 0".to_string(),
        ))
    }

    /// Zero or less
    #[must_use]
    pub fn nonpositive(&self) -> Self {
        self.push(bound(
            "nonpositive",
            |n| n <= 0.0,
            "Number must be less than or equal to 0".to_string(),
        ))
    }

    /// No fractional part
    #[must_use]
    pub fn int(&self) -> Self {
        self.push(bound(
            "int",
            |n| n.is_finite() && n.fract() == 0.0,
            "Expected integer, received float".to_string(),
        ))
    }

    /// Not infinite
    #[must_use]
    pub fn finite(&self) -> Self {
        self.push(bound("finite", f64::is_finite, "Number must be finite".to_string()))
    }

    /// An integral multiple of `step`
    #[must_use]
    pub fn multiple_of(&self, step: f64) -> Self {
        self.push(bound(
            "multiple_of",
            move |n| is_multiple(n, step),
            format!("Number must be a multiple of {step}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::primitives::{integer, number};
    use kanon_value::Value;

    fn fails(schema: &crate::NumberSchema, n: f64) -> Option<String> {
        schema.validate(&Value::from(n)).issue().map(|issue| issue.message.clone())
    }

    #[test]
    fn test_inclusive_bounds() {
        let schema = number().min(5.0).max(10.0);
        assert_eq!(
            fails(&schema, 4.0).as_deref(),
            Some("Number must be greater than or equal to 5")
        );
        assert!(fails(&schema, 5.0).is_none());
        assert!(fails(&schema, 10.0).is_none());
        assert_eq!(
            fails(&schema, 10.5).as_deref(),
            Some("Number must be less than or equal to 10")
        );
    }

    #[test]
    fn test_exclusive_bounds() {
        assert!(fails(&number().gt(1.0), 1.0).is_some());
        assert!(fails(&number().gt(1.0), 1.5).is_none());
        assert!(fails(&number().lt(1.0), 1.0).is_some());
    }

    #[test]
    fn test_sign_rules() {
        assert!(fails(&number().positive(), 0.0).is_some());
        assert!(fails(&number().nonnegative(), 0.0).is_none());
        assert!(fails(&number().negative(), 0.0).is_some());
        assert!(fails(&number().nonpositive(), 0.0).is_none());
    }

    #[test]
    fn test_int_and_finite() {
        assert!(fails(&number().int(), 2.5).is_some());
        assert!(fails(&number().int(), 2.0).is_none());
        assert!(fails(&number().finite(), f64::INFINITY).is_some());
    }

    #[test]
    fn test_multiple_of_handles_decimal_steps() {
        assert!(fails(&number().multiple_of(0.1), 0.3).is_none());
        assert!(fails(&number().multiple_of(3.0), 9.0).is_none());
        assert_eq!(
            fails(&number().multiple_of(3.0), 10.0).as_deref(),
            Some("Number must be a multiple of 3")
        );
    }

    #[test]
    fn test_integer_schema_accepts_number_rules() {
        let schema = integer().min(0.0);
        assert!(fails(&schema, 3.0).is_none());
        assert!(fails(&schema, -1.0).is_some());
        assert_eq!(fails(&schema, 0.5).as_deref(), Some("Expected integer, received number"));
    }
}
