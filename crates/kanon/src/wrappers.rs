//! Wrapper schemas
//!
//! Wrappers widen or annotate an inner schema: nullable, nullish and
//! optional accept extra values, default substitutes a fallback for
//! `undefined`, readonly is a transparent marker and lazy defers building
//! the inner schema until first use.

use crate::primitives::never;
use crate::schema::{Outcome, Schema, SchemaKind, relabel};
use kanon_value::Value;
use std::fmt;
use std::sync::{Arc, LazyLock, OnceLock};
use tracing::debug;

/// Substitute used by a default wrapper
#[derive(Clone)]
pub enum Fallback {
    /// A fixed value
    Value(Value),
    /// A producer called on every substitution
    Producer(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl Fallback {
    /// The substitute value
    #[must_use]
    pub fn produce(&self) -> Value {
        match self {
            Fallback::Value(value) => value.clone(),
            Fallback::Producer(producer) => producer(),
        }
    }
}

impl fmt::Debug for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Fallback::Producer(_) => f.write_str("Producer"),
        }
    }
}

/// Stands in for a lookup that has not found its target yet
static UNRESOLVED: LazyLock<Schema> = LazyLock::new(never);

struct LazyCell {
    thunk: Box<dyn Fn() -> Option<Schema> + Send + Sync>,
    resolved: OnceLock<Schema>,
}

/// A schema built on first use and memoized afterwards
#[derive(Clone)]
pub struct LazySchema {
    cell: Arc<LazyCell>,
}

impl LazySchema {
    /// The inner schema, built by the thunk on the first call.
    ///
    /// A lookup that finds nothing is not memoized: it resolves to `never()`
    /// for now and is retried on the next call.
    #[must_use]
    pub fn resolve(&self) -> &Schema {
        if let Some(schema) = self.cell.resolved.get() {
            return schema;
        }
        debug!("Resolving lazy schema");
        match (self.cell.thunk)() {
            Some(schema) => self.cell.resolved.get_or_init(|| schema),
            None => &UNRESOLVED,
        }
    }

    /// Whether the inner schema has been built and memoized
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.cell.resolved.get().is_some()
    }
}

impl fmt::Debug for LazySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySchema")
            .field("resolved", &self.cell.resolved.get().map(Schema::tag))
            .finish()
    }
}

/// Accepts `null` or whatever `inner` accepts
pub fn nullable(inner: impl Into<Schema>) -> Schema {
    Schema::from_kind(SchemaKind::Nullable(inner.into()))
}

/// Accepts `null`, `undefined` or whatever `inner` accepts
pub fn nullish(inner: impl Into<Schema>) -> Schema {
    Schema::from_kind(SchemaKind::Nullish(inner.into()))
}

/// Accepts `undefined` or whatever `inner` accepts
pub fn optional(inner: impl Into<Schema>) -> Schema {
    Schema::from_kind(SchemaKind::Optional(inner.into()))
}

/// Validation-transparent readonly marker
pub fn readonly(inner: impl Into<Schema>) -> Schema {
    Schema::from_kind(SchemaKind::Readonly(inner.into()))
}

/// Replaces `undefined` with `fallback` before validating with `inner`
pub fn default_value(inner: impl Into<Schema>, fallback: impl Into<Value>) -> Schema {
    Schema::from_kind(SchemaKind::Default {
        inner: inner.into(),
        fallback: Fallback::Value(fallback.into()),
    })
}

/// Replaces `undefined` with the producer's output before validating with
/// `inner`
pub fn default_with<F>(inner: impl Into<Schema>, producer: F) -> Schema
where
    F: Fn() -> Value + Send + Sync + 'static,
{
    Schema::from_kind(SchemaKind::Default {
        inner: inner.into(),
        fallback: Fallback::Producer(Arc::new(producer)),
    })
}

/// A schema whose definition is produced by `thunk` on first use
///
/// ```
/// use kanon::{Schema, Shape, array, lazy, object, string};
/// use kanon_value::Value;
///
/// fn tree() -> Schema {
///     object(
///         Shape::new()
///             .field("name", string())
///             .field("children", array(lazy(tree))),
///     )
///     .into_schema()
/// }
///
/// let leaf = Value::object([("name", Value::from("leaf")), ("children", Value::array(vec![]))]);
/// let root = Value::object([("name", Value::from("root")), ("children", Value::array(vec![leaf]))]);
/// assert!(tree().validate(&root).is_success());
/// ```
pub fn lazy<F>(thunk: F) -> Schema
where
    F: Fn() -> Schema + Send + Sync + 'static,
{
    lookup(move || Some(thunk()))
}

/// Like [`lazy`], but the thunk may not find its schema yet
pub(crate) fn lookup<F>(thunk: F) -> Schema
where
    F: Fn() -> Option<Schema> + Send + Sync + 'static,
{
    Schema::from_kind(SchemaKind::Lazy(LazySchema {
        cell: Arc::new(LazyCell {
            thunk: Box::new(thunk),
            resolved: OnceLock::new(),
        }),
    }))
}

impl Schema {
    /// Accept `undefined` as well
    #[must_use]
    pub fn optional(&self) -> Schema {
        optional(self)
    }

    /// Accept `null` as well
    #[must_use]
    pub fn nullable(&self) -> Schema {
        nullable(self)
    }

    /// Accept `null` and `undefined` as well
    #[must_use]
    pub fn nullish(&self) -> Schema {
        nullish(self)
    }

    /// Mark as readonly
    #[must_use]
    pub fn readonly(&self) -> Schema {
        readonly(self)
    }

    /// Substitute `fallback` for `undefined`
    #[must_use]
    pub fn default_value(&self, fallback: impl Into<Value>) -> Schema {
        default_value(self, fallback)
    }
}

pub(crate) fn validate_nullable(inner: &Schema, value: &Value, message: Option<&str>) -> Outcome {
    if value.is_null() {
        Outcome::Valid
    } else {
        relabel(inner.validate(value), message)
    }
}

pub(crate) fn validate_nullish(inner: &Schema, value: &Value, message: Option<&str>) -> Outcome {
    if value.is_nullish() {
        Outcome::Valid
    } else {
        relabel(inner.validate(value), message)
    }
}

pub(crate) fn validate_optional(inner: &Schema, value: &Value, message: Option<&str>) -> Outcome {
    if value.is_undefined() {
        Outcome::Valid
    } else {
        relabel(inner.validate(value), message)
    }
}

pub(crate) fn validate_default(
    inner: &Schema,
    fallback: &Fallback,
    value: &Value,
    message: Option<&str>,
) -> Outcome {
    if !value.is_undefined() {
        return relabel(inner.validate(value), message);
    }
    let substitute = fallback.produce();
    match inner.validate(&substitute) {
        Outcome::Valid => Outcome::Coerced(substitute),
        outcome => relabel(outcome, message),
    }
}
