//! Size rules shared by sets and maps

use super::{Constrained, MapRules, SetRules};
use crate::schema::Refinement;
use kanon_value::Value;

fn size_rule<F>(name: &'static str, check: F) -> Refinement
where
    F: Fn(usize) -> Result<(), String> + Send + Sync + 'static,
{
    Refinement::new(name, move |value| match value {
        Value::Set(set) => check(set.len()),
        Value::Map(map) => check(map.len()),
        _ => Ok(()),
    })
}

macro_rules! size_rules {
    ($rules:ty, $label:literal) => {
        impl Constrained<$rules> {
            /// At least `min` entries
            #[must_use]
            pub fn min_size(&self, min: usize) -> Self {
                self.push(size_rule("min_size", move |len| {
                    if len >= min {
                        Ok(())
                    } else {
                        Err(format!(concat!($label, " must contain at least {} item(s)"), min))
                    }
                }))
            }

            /// At most `max` entries
            #[must_use]
            pub fn max_size(&self, max: usize) -> Self {
                self.push(size_rule("max_size", move |len| {
                    if len <= max {
                        Ok(())
                    } else {
                        Err(format!(concat!($label, " must contain at most {} item(s)"), max))
                    }
                }))
            }

            /// Exactly `size` entries
            #[must_use]
            pub fn size(&self, size: usize) -> Self {
                self.push(size_rule("size", move |len| {
                    if len == size {
                        Ok(())
                    } else {
                        Err(format!(concat!($label, " must contain exactly {} item(s)"), size))
                    }
                }))
            }

            /// At least one entry
            #[must_use]
            pub fn nonempty(&self) -> Self {
                self.push(size_rule("nonempty", |len| {
                    if len == 0 {
                        Err(concat!($label, " must contain at least 1 item(s)").to_string())
                    } else {
                        Ok(())
                    }
                }))
            }
        }
    };
}

size_rules!(SetRules, "Set");
size_rules!(MapRules, "Map");
