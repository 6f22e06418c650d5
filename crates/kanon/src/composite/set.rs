use super::Rebuild;
use crate::constraints::{ConstraintFamily, Constrained, SetSchema};
use crate::schema::{Outcome, Schema, SchemaKind, mismatch};
use kanon_value::{Value, ValueSet};

/// Accepts sets whose every member satisfies `item`
pub fn set(item: impl Into<Schema>) -> SetSchema {
    Constrained::wrap(Schema::from_kind(SchemaKind::Set(item.into())).with_family(ConstraintFamily::Set))
}

pub(crate) fn validate(item: &Schema, value: &Value, message: Option<&str>) -> Outcome {
    let Value::Set(members) = value else {
        return mismatch("set", value, message);
    };

    let mut rebuild = Rebuild::new();
    for (index, member) in members.iter().enumerate() {
        match item.validate(member) {
            Outcome::Valid => rebuild.keep(member),
            Outcome::Coerced(replacement) => {
                rebuild.replace(replacement, || members.iter().take(index).cloned());
            }
            Outcome::Invalid(issue) => return Outcome::Invalid(issue.within("Item")),
        }
    }

    match rebuild.finish() {
        Some(output) => Outcome::Coerced(Value::Set(output.into_iter().collect::<ValueSet>())),
        None => Outcome::Valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{number, string};
    use crate::wrappers::default_value;

    #[test]
    fn test_valid_members_need_no_allocation() {
        let value = Value::set(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(set(string()).validate(&value), Outcome::Valid);
    }

    #[test]
    fn test_failure_is_labeled_item() {
        let value = Value::set(vec![Value::from("a"), Value::from(2)]);
        assert_eq!(
            set(string()).validate(&value).issue().unwrap().message,
            "Item: Expected string, received number"
        );
    }

    #[test]
    fn test_middle_coercion_keeps_order() {
        let value = Value::set(vec![Value::from(1), Value::Undefined, Value::from(3)]);
        let outcome = set(default_value(number(), 2)).validate(&value);
        let Outcome::Coerced(Value::Set(output)) = outcome else {
            panic!("expected a coerced set");
        };
        let members: Vec<&Value> = output.iter().collect();
        assert_eq!(members, vec![&Value::from(1), &Value::from(2), &Value::from(3)]);
    }

    #[test]
    fn test_rejects_arrays() {
        let outcome = set(string()).validate(&Value::array(Vec::new()));
        assert_eq!(outcome.issue().unwrap().message, "Expected set, received array");
    }
}
