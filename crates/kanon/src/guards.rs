//! Type guards
//!
//! Tag guards compare a schema's kind tag. Constraint guards read the
//! family marker a constraint builder leaves on the schema node, so they
//! report how a schema was built rather than only what kind it is.

use crate::composite::tuple::TupleItems;
use crate::constraints::{ConstraintFamily, ConstraintKind, Constrained};
use crate::schema::{Schema, SchemaKind, SchemaTag};

/// Check whether `schema` has the given tag
#[must_use]
pub fn is_schema_type(schema: &Schema, tag: SchemaTag) -> bool {
    schema.tag() == tag
}

macro_rules! tag_guards {
    ($($name:ident => $tag:ident,)*) => {
        $(
            #[doc = concat!("Check whether the schema is a `", stringify!($tag), "` schema")]
            #[must_use]
            pub fn $name(schema: &Schema) -> bool {
                is_schema_type(schema, SchemaTag::$tag)
            }
        )*

        /// One guard per tag, in tag declaration order
        pub const SCHEMA_GUARDS: &[(SchemaTag, fn(&Schema) -> bool)] = &[
            $((SchemaTag::$tag, $name),)*
        ];
    };
}

tag_guards! {
    is_string => String,
    is_number => Number,
    is_boolean => Boolean,
    is_date => Date,
    is_bigint => BigInt,
    is_symbol => Symbol,
    is_integer => Integer,
    is_enum => Enum,
    is_literal => Literal,
    is_native_enum => NativeEnum,
    is_any => Any,
    is_unknown => Unknown,
    is_never => Never,
    is_null => Null,
    is_undefined => Undefined,
    is_void => Void,
    is_array => Array,
    is_object => Object,
    is_tuple => Tuple,
    is_record => Record,
    is_map => Map,
    is_set => Set,
    is_union => Union,
    is_intersection => Intersection,
    is_keyof => KeyOf,
    is_partial => Partial,
    is_required => Required,
    is_pick => Pick,
    is_omit => Omit,
    is_nullable => Nullable,
    is_nullish => Nullish,
    is_optional => Optional,
    is_default => Default,
    is_readonly => Readonly,
    is_lazy => Lazy,
}

/// Check whether `schema` was produced by a constraint builder
#[must_use]
pub fn has_constraints(schema: &Schema) -> bool {
    schema.constraint_family().is_some()
}

macro_rules! constraint_guards {
    ($($name:ident => $family:ident,)*) => {
        $(
            #[doc = concat!("Check whether the schema was built by the ", stringify!($family), " constraint builder")]
            #[must_use]
            pub fn $name(schema: &Schema) -> bool {
                schema.constraint_family() == Some(ConstraintFamily::$family)
            }
        )*
    };
}

constraint_guards! {
    is_array_constraint => Array,
    is_object_constraint => Object,
    is_string_constraint => String,
    is_number_constraint => Number,
    is_date_constraint => Date,
    is_bigint_constraint => BigInt,
    is_set_constraint => Set,
    is_map_constraint => Map,
}

/// Recover the typed builder of family `K`, if `schema` was built by it
#[must_use]
pub fn as_constrained<K: ConstraintKind>(schema: &Schema) -> Option<Constrained<K>> {
    if schema.constraint_family() == Some(K::FAMILY) && K::supports(schema.tag()) {
        Some(Constrained::wrap(schema.clone()))
    } else {
        None
    }
}

/// The rest schema of a tuple, if it has one
#[must_use]
pub fn has_tuple_rest(schema: &Schema) -> Option<&Schema> {
    match schema.kind() {
        SchemaKind::Tuple(items) => TupleItems::rest(items),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::tuple::{tuple, tuple_with_rest};
    use crate::constraints::{SetRules, StringRules};
    use crate::primitives::{boolean, number, string};
    use crate::composite::set::set;
    use kanon_value::Value;

    #[test]
    fn test_guard_table_matches_tags() {
        assert_eq!(SCHEMA_GUARDS.len(), SchemaTag::ALL.len());
        for ((tag, _), expected) in SCHEMA_GUARDS.iter().zip(SchemaTag::ALL) {
            assert_eq!(*tag, expected);
        }
    }

    #[test]
    fn test_tag_guards() {
        let schema = Schema::from(string());
        assert!(is_string(&schema));
        assert!(!is_number(&schema));
        assert!(is_schema_type(&schema, SchemaTag::String));
    }

    #[test]
    fn test_constraint_guards() {
        let sized = set(string()).min_size(1);
        assert!(is_set_constraint(&sized));
        assert!(!is_array_constraint(&sized));
        assert!(has_constraints(&sized));
        assert!(!has_constraints(&boolean()));

        let recovered = as_constrained::<SetRules>(&sized).unwrap().max_size(1);
        assert!(recovered.validate(&Value::set(vec![Value::from("a"), Value::from("b")])).is_invalid());
        assert!(as_constrained::<StringRules>(&sized).is_none());
    }

    #[test]
    fn test_tuple_rest_capability() {
        assert!(has_tuple_rest(&tuple([number()])).is_none());
        let with_rest = tuple_with_rest([number()], string());
        assert_eq!(has_tuple_rest(&with_rest).map(Schema::tag), Some(SchemaTag::String));
        assert!(has_tuple_rest(&Schema::from(string())).is_none());
    }
}
