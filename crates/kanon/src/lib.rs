#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # kanon
//!
//! Declarative schema validation for untyped runtime values.
//!
//! Schemas are composed from factories (`string()`, `array(item)`,
//! `object(shape)`, ...), wrappers, transforms and chainable constraint
//! methods. Every schema is immutable: chaining returns a new schema.
//! Validation is single-pass and short-circuiting, producing either the
//! (possibly coerced) value or the first failure found.
//!
//! ```
//! use kanon::{array, object, optional, string, Shape};
//! use kanon_value::Value;
//!
//! let user = object(
//!     Shape::new()
//!         .field("name", string().min_length(1))
//!         .field("tags", optional(array(string()))),
//! );
//! let input = Value::object([("name", Value::from("Ann"))]);
//! assert!(user.safe_parse(&input).is_success());
//! ```

/// Schema handles, kinds, tags and validation outcomes.
pub mod schema;
/// Primitive factories.
pub mod primitives;
/// Arrays, objects, tuples, records, maps and sets.
pub mod composite;
/// Union and intersection.
pub mod operators;
/// keyof, partial, required, pick and omit.
pub mod transforms;
/// nullable, nullish, optional, default, readonly and lazy.
pub mod wrappers;
/// Per-kind chainable refinement builders.
pub mod constraints;
/// Tag and capability probes.
pub mod guards;
/// parse / safe_parse.
pub mod parser;
/// Declarative schema files.
pub mod descriptor;
/// Named schema registry.
pub mod registry;
/// Descriptor file loading.
pub mod loader;

pub use composite::array::array;
pub use composite::map::map;
pub use composite::object::{Shape, object};
pub use composite::record::record;
pub use composite::set::set;
pub use composite::tuple::{TupleItems, tuple, tuple_with_rest};
pub use constraints::{
    ArrayRules, ArraySchema, BigIntRules, BigIntSchema, ConstraintFamily, ConstraintKind,
    Constrained, DateRules, DateSchema, MapRules, MapSchema, NumberRules, NumberSchema,
    ObjectRules, ObjectSchema, SetRules, SetSchema, StringRules, StringSchema,
};
pub use descriptor::{Descriptor, SchemaDocument, SchemaSpec};
pub use guards::{
    SCHEMA_GUARDS, as_constrained, has_constraints, has_tuple_rest, is_array_constraint,
    is_bigint_constraint, is_date_constraint, is_map_constraint, is_number_constraint,
    is_object_constraint, is_schema_type, is_set_constraint, is_string_constraint,
};
pub use loader::{DescriptorFormat, LoaderConfig, SchemaLoader};
pub use operators::{intersection, union};
pub use parser::{ParseConfig, SafeParseResult, parse, parse_with, safe_parse, safe_parse_with};
pub use primitives::{
    NativeEnum, any, bigint, boolean, date, enumeration, integer, literal, native_enum, never,
    null, number, string, symbol, undefined, unknown, void,
};
pub use registry::SchemaRegistry;
pub use schema::{Issue, IssueCode, Outcome, Refinement, Schema, SchemaKind, SchemaTag};
pub use transforms::{keyof, omit, partial, pick, required};
pub use wrappers::{
    Fallback, LazySchema, default_value, default_with, lazy, nullable, nullish, optional,
    readonly,
};

use thiserror::Error;

/// Errors raised while building schemas, loading descriptors or parsing
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Invalid(Issue),

    #[error("{tag} schema does not support {family} constraints")]
    UnsupportedConstraint {
        family: ConstraintFamily,
        tag: SchemaTag,
    },

    #[error("Expected an object schema, got {0}")]
    NotAnObjectSchema(SchemaTag),

    #[error("Key '{0}' is not part of the object shape")]
    UnknownKey(String),

    #[error("Invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid schema descriptor: {0}")]
    Descriptor(String),

    #[error("Schema not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// The validation issue, when this error came from `parse`
    #[must_use]
    pub fn issue(&self) -> Option<&Issue> {
        match self {
            Error::Invalid(issue) => Some(issue),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
