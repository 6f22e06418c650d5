use super::{ArrayRules, Constrained};
use crate::schema::Refinement;
use kanon_value::{Array, Value};
use std::collections::HashSet;

fn array_rule<F>(name: &'static str, check: F) -> Refinement
where
    F: Fn(&Array) -> Result<(), String> + Send + Sync + 'static,
{
    Refinement::new(name, move |value| match value {
        Value::Array(items) => check(items),
        _ => Ok(()),
    })
}

impl Constrained<ArrayRules> {
    /// At least `min` items
    #[must_use]
    pub fn min_length(&self, min: usize) -> Self {
        self.push(array_rule("min_length", move |items| {
            if items.len() >= min {
                Ok(())
            } else {
                Err(format!("Array must contain at least {min} item(s)"))
            }
        }))
    }

    /// At most `max` items
    #[must_use]
    pub fn max_length(&self, max: usize) -> Self {
        self.push(array_rule("max_length", move |items| {
            if items.len() <= max {
                Ok(())
            } else {
                Err(format!("Array must contain at most {max} item(s)"))
            }
        }))
    }

    /// Exactly `len` items
    #[must_use]
    pub fn length(&self, len: usize) -> Self {
        self.push(array_rule("length", move |items| {
            if items.len() == len {
                Ok(())
            } else {
                Err(format!("Array must contain exactly {len} item(s)"))
            }
        }))
    }

    /// At least one item
    #[must_use]
    pub fn nonempty(&self) -> Self {
        self.push(array_rule("nonempty", |items| {
            if items.is_empty() {
                Err("Array must contain at least 1 item(s)".to_string())
            } else {
                Ok(())
            }
        }))
    }

    /// No two items share a SameValueZero identity
    #[must_use]
    pub fn unique(&self) -> Self {
        self.push(array_rule("unique", |items| {
            let mut seen = HashSet::with_capacity(items.len());
            if items.iter().all(|item| seen.insert(item.identity_key())) {
                Ok(())
            } else {
                Err("Array items must be unique".to_string())
            }
        }))
    }
}
