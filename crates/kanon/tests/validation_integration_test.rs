//! Integration tests for kanon validation
//!
//! End-to-end scenarios plus generated checks of the parser contract.

use kanon::{
    SCHEMA_GUARDS, SafeParseResult, Schema, SchemaTag, Shape, any, array, bigint, boolean, date,
    default_value, enumeration, integer, intersection, is_schema_type, keyof, lazy, literal, map,
    native_enum, never, null, nullable, nullish, number, object, omit, optional, partial, pick,
    readonly, record, required, set, string, symbol, tuple, undefined, union, unknown, void,
    NativeEnum,
};
use kanon_value::Value;
use proptest::prelude::*;

fn user_schema() -> Schema {
    object(
        Shape::new()
            .field("name", string().min_length(1))
            .field("age", optional(integer().nonnegative()))
            .field("tags", array(string()).max_length(4)),
    )
    .into_schema()
}

#[test]
fn test_set_min_size_failure_message() {
    let schema = set(string()).min_size(2);
    let result = schema.safe_parse(&Value::set(vec![Value::from("only")]));
    assert_eq!(
        result,
        SafeParseResult::Failure {
            error: "Set must contain at least 2 item(s)".to_string()
        }
    );
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!({"success": false, "error": "Set must contain at least 2 item(s)"})
    );
}

#[test]
fn test_unique_treats_nan_as_equal() {
    let schema = array(unknown()).unique();
    let result = schema.safe_parse(&Value::array(vec![Value::from(f64::NAN), Value::from(f64::NAN)]));
    assert_eq!(result.error(), Some("Array items must be unique"));
}

#[test]
fn test_set_coercion_preserves_order() {
    let schema = set(default_value(string(), "filled"));
    let input = Value::set(vec![Value::from("a"), Value::Undefined, Value::from("c")]);

    let data = schema.parse(&input).unwrap();
    let Value::Set(items) = data else {
        panic!("expected a set");
    };
    let items: Vec<&Value> = items.iter().collect();
    assert_eq!(items, vec![&Value::from("a"), &Value::from("filled"), &Value::from("c")]);
}

#[test]
fn test_nested_failure_is_labelled_by_path() {
    let input = Value::object([
        ("name", Value::from("Ann")),
        ("tags", Value::array(vec![Value::from("a"), Value::from(2)])),
    ]);
    assert_eq!(
        user_schema().safe_parse(&input).error(),
        Some("Property 'tags': Item 1: Expected string, received number")
    );
}

#[test]
fn test_custom_message_replaces_template() {
    let schema = string().min_length(3).with_message("too short");
    assert_eq!(schema.safe_parse(&Value::from("ab")).error(), Some("too short"));
    // The receiver is untouched
    let base = string().min_length(3);
    let _ = base.with_message("other");
    assert_eq!(
        base.safe_parse(&Value::from("ab")).error(),
        Some("String must contain at least 3 character(s)")
    );
}

#[test]
fn test_recursive_lazy_schema() {
    fn list() -> Schema {
        nullable(object(Shape::new().field("head", number()).field("tail", lazy(list))))
    }
    let value = Value::object([
        ("head", Value::from(1)),
        ("tail", Value::object([("head", Value::from(2)), ("tail", Value::Null)])),
    ]);
    assert!(list().safe_parse(&value).is_success());
    let bad = Value::object([("head", Value::from(1)), ("tail", Value::from("end"))]);
    assert!(!list().safe_parse(&bad).is_success());
}

#[test]
fn test_union_and_intersection() {
    let id = union([Schema::from(string().uuid()), Schema::from(integer().positive())]);
    assert!(id.safe_parse(&Value::from(7)).is_success());
    assert!(id.safe_parse(&Value::from("550e8400-e29b-41d4-a716-446655440000")).is_success());
    assert_eq!(
        id.safe_parse(&Value::from(-1)).error(),
        Some("Invalid input: value did not match any union member")
    );

    let both = intersection([Schema::from(number().min(0.0)), Schema::from(number().max(10.0))]);
    assert!(both.safe_parse(&Value::from(5)).is_success());
    assert!(!both.safe_parse(&Value::from(11)).is_success());
}

fn schema_for(tag: SchemaTag) -> Schema {
    let shape = object(Shape::new().field("a", string()).field("b", optional(number()))).into_schema();
    match tag {
        SchemaTag::String => string().into(),
        SchemaTag::Number => number().into(),
        SchemaTag::Boolean => boolean(),
        SchemaTag::Date => date().into(),
        SchemaTag::BigInt => bigint().into(),
        SchemaTag::Symbol => symbol(),
        SchemaTag::Integer => integer().into(),
        SchemaTag::Enum => enumeration(["a", "b"]),
        SchemaTag::Literal => literal("a"),
        SchemaTag::NativeEnum => native_enum(NativeEnum::new().text("A", "a")),
        SchemaTag::Any => any(),
        SchemaTag::Unknown => unknown(),
        SchemaTag::Never => never(),
        SchemaTag::Null => null(),
        SchemaTag::Undefined => undefined(),
        SchemaTag::Void => void(),
        SchemaTag::Array => array(string()).into(),
        SchemaTag::Object => shape,
        SchemaTag::Tuple => tuple([string()]),
        SchemaTag::Record => record(string(), number()),
        SchemaTag::Map => map(string(), number()).into(),
        SchemaTag::Set => set(string()).into(),
        SchemaTag::Union => union([Schema::from(string()), number().into()]),
        SchemaTag::Intersection => intersection([string(), string()]),
        SchemaTag::KeyOf => keyof(&shape).unwrap(),
        SchemaTag::Partial => partial(&shape).unwrap().into(),
        SchemaTag::Required => required(&shape).unwrap().into(),
        SchemaTag::Pick => pick(&shape, ["a"]).unwrap().into(),
        SchemaTag::Omit => omit(&shape, ["a"]).unwrap().into(),
        SchemaTag::Nullable => nullable(string()),
        SchemaTag::Nullish => nullish(string()),
        SchemaTag::Optional => optional(string()),
        SchemaTag::Default => default_value(string(), "x"),
        SchemaTag::Readonly => readonly(string()),
        SchemaTag::Lazy => lazy(|| Schema::from(string())),
    }
}

#[test]
fn test_every_factory_matches_only_its_own_guard() {
    for expected in SchemaTag::ALL {
        let schema = schema_for(expected);
        assert_eq!(schema.tag(), expected);
        for (tag, guard) in SCHEMA_GUARDS {
            assert_eq!(guard(&schema), *tag == expected, "{tag} guard on {expected} schema");
            assert_eq!(is_schema_type(&schema, *tag), *tag == expected);
        }
    }
}

fn arb_user() -> impl Strategy<Value = Value> {
    (
        "[a-z]{1,8}",
        prop::option::of(0i32..120),
        prop::collection::vec("[a-z]{0,4}", 0..=4),
    )
        .prop_map(|(name, age, tags)| {
            let mut entries = vec![
                ("name", Value::from(name)),
                ("tags", Value::array(tags.into_iter().map(Value::from))),
            ];
            if let Some(age) = age {
                entries.push(("age", Value::from(age)));
            }
            Value::object(entries)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_valid_input_round_trips(input in arb_user()) {
        let result = user_schema().safe_parse(&input);
        prop_assert_eq!(result.data(), Some(&input));
    }

    #[test]
    fn prop_parse_is_idempotent(input in arb_user()) {
        let schema = user_schema();
        let first = schema.safe_parse(&input);
        let data = first.data().cloned().unwrap_or(Value::Undefined);
        prop_assert_eq!(schema.safe_parse(&data), first);
    }

    #[test]
    fn prop_set_keeps_cardinality_and_order(items in prop::collection::vec("[a-z]{1,5}", 0..10)) {
        let input = Value::set(items.iter().map(|s| Value::from(s.as_str())));
        let Value::Set(expected) = &input else { unreachable!() };

        let data = set(string()).parse(&input).unwrap();
        let Value::Set(output) = &data else { unreachable!() };
        prop_assert_eq!(output.len(), expected.len());
        prop_assert!(output.iter().eq(expected.iter()));
    }

    #[test]
    fn prop_set_size_boundaries(n in 1usize..6) {
        let items = |count: usize| Value::set((0..count).map(|i| Value::from(i.to_string())));

        let min = set(string()).min_size(n);
        prop_assert_eq!(
            min.safe_parse(&items(n - 1)).error().map(str::to_string),
            Some(format!("Set must contain at least {n} item(s)"))
        );
        prop_assert!(min.safe_parse(&items(n)).is_success());
        prop_assert!(min.safe_parse(&items(n + 1)).is_success());

        let max = set(string()).max_size(n);
        prop_assert_eq!(
            max.safe_parse(&items(n + 1)).error().map(str::to_string),
            Some(format!("Set must contain at most {n} item(s)"))
        );
        prop_assert!(max.safe_parse(&items(n)).is_success());
    }

    #[test]
    fn prop_independent_constraints_commute(len in 0usize..9) {
        let input = Value::array((0..len).map(|_| Value::Null));
        let forward = array(unknown()).min_length(2).max_length(5);
        let backward = array(unknown()).max_length(5).min_length(2);
        prop_assert_eq!(
            forward.safe_parse(&input).is_success(),
            backward.safe_parse(&input).is_success()
        );
        prop_assert_eq!(forward.safe_parse(&input).is_success(), (2..=5).contains(&len));
    }
}
