use super::{Constrained, ObjectRules};
use crate::composite::object::Shape;
use crate::schema::Refinement;
use kanon_value::{Object, PropertyKey, Value};

fn object_rule<F>(name: &'static str, check: F) -> Refinement
where
    F: Fn(&Object) -> Result<(), String> + Send + Sync + 'static,
{
    Refinement::new(name, move |value| match value {
        Value::Object(object) => check(object),
        _ => Ok(()),
    })
}

impl Constrained<ObjectRules> {
    /// Reject string keys the shape does not declare
    #[must_use]
    pub fn strict(&self) -> Self {
        let shape = Shape::of(self.schema()).cloned().unwrap_or_default();
        self.push(object_rule("strict", move |object| {
            let unknown: Vec<String> = object
                .keys()
                .filter_map(PropertyKey::as_str)
                .filter(|key| !shape.contains_key(key))
                .map(|key| format!("'{key}'"))
                .collect();
            if unknown.is_empty() {
                Ok(())
            } else {
                Err(format!("Unrecognized key(s) in object: {}", unknown.join(", ")))
            }
        }))
    }

    /// At least `min` own properties
    #[must_use]
    pub fn min_keys(&self, min: usize) -> Self {
        self.push(object_rule("min_keys", move |object| {
            if object.len() >= min {
                Ok(())
            } else {
                Err(format!("Object must contain at least {min} key(s)"))
            }
        }))
    }

    /// At most `max` own properties
    #[must_use]
    pub fn max_keys(&self, max: usize) -> Self {
        self.push(object_rule("max_keys", move |object| {
            if object.len() <= max {
                Ok(())
            } else {
                Err(format!("Object must contain at most {max} key(s)"))
            }
        }))
    }
}
