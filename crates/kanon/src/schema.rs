//! Schema core
//!
//! A [`Schema`] is an immutable, cheaply clonable handle to a node holding
//! the kind, an optional custom message, the refinement list and the
//! constraint-family marker. The kind space is the closed [`SchemaKind`] sum
//! type; validation dispatches over it with an exhaustive `match`.

use crate::composite::object::{self, Presence, Shape};
use crate::composite::tuple::TupleItems;
use crate::composite::{array, map, record, set, tuple};
use crate::constraints::ConstraintFamily;
use crate::primitives::{self, NativeEnum};
use crate::wrappers::{self, Fallback, LazySchema};
use crate::operators;
use kanon_value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// The value failed the base representational check
    KindMismatch,
    /// The value passed the kind check but failed a refinement
    ConstraintViolation,
    /// A child element, property or branch failed
    CompositionFailure,
}

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Failure category
    pub code: IssueCode,
    /// Human-readable message
    pub message: String,
}

impl Issue {
    /// Create an issue
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a kind-mismatch issue
    pub fn kind_mismatch(message: impl Into<String>) -> Self {
        Self::new(IssueCode::KindMismatch, message)
    }

    /// Create a constraint-violation issue
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::new(IssueCode::ConstraintViolation, message)
    }

    /// Create a composition-failure issue
    pub fn composition(message: impl Into<String>) -> Self {
        Self::new(IssueCode::CompositionFailure, message)
    }

    /// Re-label a child failure with positional context
    #[must_use]
    pub fn within(self, label: impl fmt::Display) -> Self {
        Self::composition(format!("{label}: {}", self.message))
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of running a validator
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Valid, the input is returned unchanged
    Valid,
    /// Valid, with a replacement value
    Coerced(Value),
    /// Invalid
    Invalid(Issue),
}

impl Outcome {
    /// Whether the outcome is `Valid` or `Coerced`
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.is_invalid()
    }

    /// Whether the outcome is `Invalid`
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Outcome::Invalid(_))
    }

    /// The issue, for invalid outcomes
    #[must_use]
    pub fn issue(&self) -> Option<&Issue> {
        match self {
            Outcome::Invalid(issue) => Some(issue),
            _ => None,
        }
    }
}

/// Kind-mismatch outcome with the custom message or the default template
pub(crate) fn mismatch(expected: impl fmt::Display, value: &Value, message: Option<&str>) -> Outcome {
    let text = match message {
        Some(custom) => custom.to_string(),
        None => format!("Expected {expected}, received {}", value.kind()),
    };
    Outcome::Invalid(Issue::kind_mismatch(text))
}

/// Replace the message of an invalid outcome, keeping its code
pub(crate) fn relabel(outcome: Outcome, message: Option<&str>) -> Outcome {
    match (outcome, message) {
        (Outcome::Invalid(issue), Some(custom)) => Outcome::Invalid(Issue::new(issue.code, custom)),
        (outcome, _) => outcome,
    }
}

type CheckFn = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

/// One predicate layered onto a schema
#[derive(Clone)]
pub struct Refinement {
    name: &'static str,
    check: Arc<CheckFn>,
    message: Option<String>,
}

impl Refinement {
    /// Create a refinement; the check returns the templated failure message
    pub fn new<F>(name: &'static str, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            name,
            check: Arc::new(check),
            message: None,
        }
    }

    /// Replace the templated message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Rule name (e.g. `min_length`)
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Custom message, if any
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Run the check
    ///
    /// # Errors
    ///
    /// Returns the failure message (custom message first) when the check fails.
    pub fn run(&self, value: &Value) -> Result<(), String> {
        (self.check)(value).map_err(|templated| self.message.clone().unwrap_or(templated))
    }
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Discriminant of every schema kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaTag {
    String,
    Number,
    Boolean,
    Date,
    BigInt,
    Symbol,
    Integer,
    Enum,
    Literal,
    NativeEnum,
    Any,
    Unknown,
    Never,
    Null,
    Undefined,
    Void,
    Array,
    Object,
    Tuple,
    Record,
    Map,
    Set,
    Union,
    Intersection,
    KeyOf,
    Partial,
    Required,
    Pick,
    Omit,
    Nullable,
    Nullish,
    Optional,
    Default,
    Readonly,
    Lazy,
}

impl SchemaTag {
    /// Every tag, in declaration order
    pub const ALL: [SchemaTag; 35] = [
        SchemaTag::String,
        SchemaTag::Number,
        SchemaTag::Boolean,
        SchemaTag::Date,
        SchemaTag::BigInt,
        SchemaTag::Symbol,
        SchemaTag::Integer,
        SchemaTag::Enum,
        SchemaTag::Literal,
        SchemaTag::NativeEnum,
        SchemaTag::Any,
        SchemaTag::Unknown,
        SchemaTag::Never,
        SchemaTag::Null,
        SchemaTag::Undefined,
        SchemaTag::Void,
        SchemaTag::Array,
        SchemaTag::Object,
        SchemaTag::Tuple,
        SchemaTag::Record,
        SchemaTag::Map,
        SchemaTag::Set,
        SchemaTag::Union,
        SchemaTag::Intersection,
        SchemaTag::KeyOf,
        SchemaTag::Partial,
        SchemaTag::Required,
        SchemaTag::Pick,
        SchemaTag::Omit,
        SchemaTag::Nullable,
        SchemaTag::Nullish,
        SchemaTag::Optional,
        SchemaTag::Default,
        SchemaTag::Readonly,
        SchemaTag::Lazy,
    ];

    /// Tag name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaTag::String => "string",
            SchemaTag::Number => "number",
            SchemaTag::Boolean => "boolean",
            SchemaTag::Date => "date",
            SchemaTag::BigInt => "bigint",
            SchemaTag::Symbol => "symbol",
            SchemaTag::Integer => "integer",
            SchemaTag::Enum => "enum",
            SchemaTag::Literal => "literal",
            SchemaTag::NativeEnum => "nativeEnum",
            SchemaTag::Any => "any",
            SchemaTag::Unknown => "unknown",
            SchemaTag::Never => "never",
            SchemaTag::Null => "null",
            SchemaTag::Undefined => "undefined",
            SchemaTag::Void => "void",
            SchemaTag::Array => "array",
            SchemaTag::Object => "object",
            SchemaTag::Tuple => "tuple",
            SchemaTag::Record => "record",
            SchemaTag::Map => "map",
            SchemaTag::Set => "set",
            SchemaTag::Union => "union",
            SchemaTag::Intersection => "intersection",
            SchemaTag::KeyOf => "keyof",
            SchemaTag::Partial => "partial",
            SchemaTag::Required => "required",
            SchemaTag::Pick => "pick",
            SchemaTag::Omit => "omit",
            SchemaTag::Nullable => "nullable",
            SchemaTag::Nullish => "nullish",
            SchemaTag::Optional => "optional",
            SchemaTag::Default => "default",
            SchemaTag::Readonly => "readonly",
            SchemaTag::Lazy => "lazy",
        }
    }
}

impl fmt::Display for SchemaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific contents of a schema
#[derive(Debug, Clone)]
pub enum SchemaKind {
    String,
    Number,
    Boolean,
    Date,
    BigInt,
    Symbol,
    Integer,
    /// One of a fixed list of strings
    Enum(Vec<String>),
    /// Exactly this value
    Literal(Value),
    /// One of the values of a named-constant table
    NativeEnum(NativeEnum),
    Any,
    Unknown,
    Never,
    Null,
    Undefined,
    Void,
    Array(Schema),
    Object(Shape),
    Tuple(TupleItems),
    Record { key: Schema, value: Schema },
    Map { key: Schema, value: Schema },
    Set(Schema),
    Union(Vec<Schema>),
    Intersection(Vec<Schema>),
    /// Keys of an object shape
    KeyOf(Shape),
    /// Object shape with every field optional
    Partial(Shape),
    /// Object shape with every field present
    Required(Shape),
    /// Object shape restricted to some keys
    Pick(Shape),
    /// Object shape without some keys
    Omit(Shape),
    Nullable(Schema),
    Nullish(Schema),
    Optional(Schema),
    Default { inner: Schema, fallback: Fallback },
    Readonly(Schema),
    Lazy(LazySchema),
}

impl SchemaKind {
    /// Tag of this kind
    #[must_use]
    pub fn tag(&self) -> SchemaTag {
        match self {
            SchemaKind::String => SchemaTag::String,
            SchemaKind::Number => SchemaTag::Number,
            SchemaKind::Boolean => SchemaTag::Boolean,
            SchemaKind::Date => SchemaTag::Date,
            SchemaKind::BigInt => SchemaTag::BigInt,
            SchemaKind::Symbol => SchemaTag::Symbol,
            SchemaKind::Integer => SchemaTag::Integer,
            SchemaKind::Enum(_) => SchemaTag::Enum,
            SchemaKind::Literal(_) => SchemaTag::Literal,
            SchemaKind::NativeEnum(_) => SchemaTag::NativeEnum,
            SchemaKind::Any => SchemaTag::Any,
            SchemaKind::Unknown => SchemaTag::Unknown,
            SchemaKind::Never => SchemaTag::Never,
            SchemaKind::Null => SchemaTag::Null,
            SchemaKind::Undefined => SchemaTag::Undefined,
            SchemaKind::Void => SchemaTag::Void,
            SchemaKind::Array(_) => SchemaTag::Array,
            SchemaKind::Object(_) => SchemaTag::Object,
            SchemaKind::Tuple(_) => SchemaTag::Tuple,
            SchemaKind::Record { .. } => SchemaTag::Record,
            SchemaKind::Map { .. } => SchemaTag::Map,
            SchemaKind::Set(_) => SchemaTag::Set,
            SchemaKind::Union(_) => SchemaTag::Union,
            SchemaKind::Intersection(_) => SchemaTag::Intersection,
            SchemaKind::KeyOf(_) => SchemaTag::KeyOf,
            SchemaKind::Partial(_) => SchemaTag::Partial,
            SchemaKind::Required(_) => SchemaTag::Required,
            SchemaKind::Pick(_) => SchemaTag::Pick,
            SchemaKind::Omit(_) => SchemaTag::Omit,
            SchemaKind::Nullable(_) => SchemaTag::Nullable,
            SchemaKind::Nullish(_) => SchemaTag::Nullish,
            SchemaKind::Optional(_) => SchemaTag::Optional,
            SchemaKind::Default { .. } => SchemaTag::Default,
            SchemaKind::Readonly(_) => SchemaTag::Readonly,
            SchemaKind::Lazy(_) => SchemaTag::Lazy,
        }
    }
}

#[derive(Debug, Clone)]
struct SchemaNode {
    kind: SchemaKind,
    message: Option<String>,
    refinements: Vec<Refinement>,
    family: Option<ConstraintFamily>,
}

/// An immutable schema
#[derive(Clone)]
pub struct Schema {
    node: Arc<SchemaNode>,
}

impl Schema {
    /// Build a schema of the given kind with no message or refinements
    #[must_use]
    pub fn from_kind(kind: SchemaKind) -> Self {
        Self {
            node: Arc::new(SchemaNode {
                kind,
                message: None,
                refinements: Vec::new(),
                family: None,
            }),
        }
    }

    fn derive(&self, update: impl FnOnce(&mut SchemaNode)) -> Schema {
        let mut node = SchemaNode::clone(&self.node);
        update(&mut node);
        Schema {
            node: Arc::new(node),
        }
    }

    /// Kind-specific contents
    #[must_use]
    pub fn kind(&self) -> &SchemaKind {
        &self.node.kind
    }

    /// Kind tag
    #[must_use]
    pub fn tag(&self) -> SchemaTag {
        self.node.kind.tag()
    }

    /// Custom kind-mismatch message
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.node.message.as_deref()
    }

    /// Refinements in declared order
    #[must_use]
    pub fn refinements(&self) -> &[Refinement] {
        &self.node.refinements
    }

    /// Constraint family marker set by a constraint builder
    #[must_use]
    pub fn constraint_family(&self) -> Option<ConstraintFamily> {
        self.node.family
    }

    /// Whether both handles share one node
    #[must_use]
    pub fn ptr_eq(&self, other: &Schema) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// A new schema whose kind check reports `message` on failure
    #[must_use]
    pub fn with_message(&self, message: impl Into<String>) -> Schema {
        let message = message.into();
        self.derive(|node| node.message = Some(message))
    }

    /// A new schema with one more refinement
    #[must_use]
    pub fn with_refinement(&self, refinement: Refinement) -> Schema {
        self.derive(|node| node.refinements.push(refinement))
    }

    /// A new schema with a custom predicate refinement
    #[must_use]
    pub fn refine<F>(&self, predicate: F, message: impl Into<String>) -> Schema
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        self.with_refinement(Refinement::new("custom", move |value| {
            if predicate(value) {
                Ok(())
            } else {
                Err(message.clone())
            }
        }))
    }

    /// A new schema whose most recent check reports `message`: the last
    /// refinement when there is one, otherwise the kind check
    pub(crate) fn with_last_message(&self, message: impl Into<String>) -> Schema {
        let message = message.into();
        self.derive(|node| match node.refinements.pop() {
            Some(last) => node.refinements.push(last.with_message(message)),
            None => node.message = Some(message),
        })
    }

    pub(crate) fn with_family(&self, family: ConstraintFamily) -> Schema {
        self.derive(|node| node.family = Some(family))
    }

    /// Run the kind check, then every refinement in order
    #[must_use]
    pub fn validate(&self, value: &Value) -> Outcome {
        let outcome = self.check_kind(value);
        if self.node.refinements.is_empty() {
            return outcome;
        }
        if let Outcome::Invalid(_) = outcome {
            return outcome;
        }

        let checked = match &outcome {
            Outcome::Coerced(replacement) => replacement,
            _ => value,
        };
        for refinement in &self.node.refinements {
            if let Err(message) = refinement.run(checked) {
                trace!(rule = refinement.name(), schema = %self.tag(), "Refinement failed");
                return Outcome::Invalid(Issue::constraint(message));
            }
        }
        outcome
    }

    fn check_kind(&self, value: &Value) -> Outcome {
        let message = self.node.message.as_deref();
        match &self.node.kind {
            SchemaKind::String => primitives::check_string(value, message),
            SchemaKind::Number => primitives::check_number(value, message),
            SchemaKind::Boolean => primitives::check_boolean(value, message),
            SchemaKind::Date => primitives::check_date(value, message),
            SchemaKind::BigInt => primitives::check_bigint(value, message),
            SchemaKind::Symbol => primitives::check_symbol(value, message),
            SchemaKind::Integer => primitives::check_integer(value, message),
            SchemaKind::Enum(values) => primitives::check_enum(values, value, message),
            SchemaKind::Literal(expected) => primitives::check_literal(expected, value, message),
            SchemaKind::NativeEnum(table) => primitives::check_native_enum(table, value, message),
            SchemaKind::Any | SchemaKind::Unknown => Outcome::Valid,
            SchemaKind::Never => primitives::check_never(value, message),
            SchemaKind::Null => primitives::check_null(value, message),
            SchemaKind::Undefined | SchemaKind::Void => {
                primitives::check_undefined(value, message)
            }
            SchemaKind::Array(item) => array::validate(item, value, message),
            SchemaKind::Object(shape) | SchemaKind::Pick(shape) | SchemaKind::Omit(shape) => {
                object::validate(shape, Presence::Declared, value, message)
            }
            SchemaKind::Partial(shape) => object::validate(shape, Presence::Declared, value, message),
            SchemaKind::Required(shape) => object::validate(shape, Presence::Required, value, message),
            SchemaKind::Tuple(items) => tuple::validate(items, value, message),
            SchemaKind::Record { key, value: entry } => record::validate(key, entry, value, message),
            SchemaKind::Map { key, value: entry } => map::validate(key, entry, value, message),
            SchemaKind::Set(item) => set::validate(item, value, message),
            SchemaKind::Union(branches) => operators::validate_union(branches, value, message),
            SchemaKind::Intersection(branches) => {
                operators::validate_intersection(branches, value, message)
            }
            SchemaKind::KeyOf(shape) => object::validate_key(shape, value, message),
            SchemaKind::Nullable(inner) => wrappers::validate_nullable(inner, value, message),
            SchemaKind::Nullish(inner) => wrappers::validate_nullish(inner, value, message),
            SchemaKind::Optional(inner) => wrappers::validate_optional(inner, value, message),
            SchemaKind::Default { inner, fallback } => {
                wrappers::validate_default(inner, fallback, value, message)
            }
            SchemaKind::Readonly(inner) => relabel(inner.validate(value), message),
            SchemaKind::Lazy(lazy) => relabel(lazy.resolve().validate(value), message),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("tag", &self.tag())
            .field("message", &self.node.message)
            .field("refinements", &self.node.refinements)
            .field("family", &self.node.family)
            .finish()
    }
}

impl From<&Schema> for Schema {
    fn from(schema: &Schema) -> Self {
        schema.clone()
    }
}
