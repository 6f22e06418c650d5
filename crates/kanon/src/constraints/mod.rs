//! Constraint builders
//!
//! [`Constrained<K>`] is a schema augmented with the chaining methods of
//! constraint family `K`. Each chaining method appends one refinement and
//! returns a new builder; the receiver is never modified. The family is also
//! recorded on the schema node so guards can recover the builder later.

mod array;
mod bigint;
mod collection;
mod date;
mod number;
mod object;
mod string;

use crate::schema::{Refinement, Schema, SchemaTag};
use crate::{Error, Result};
use kanon_value::Value;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

/// Constraint families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    Array,
    Object,
    String,
    Number,
    Date,
    BigInt,
    Set,
    Map,
}

impl ConstraintFamily {
    /// Family name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintFamily::Array => "array",
            ConstraintFamily::Object => "object",
            ConstraintFamily::String => "string",
            ConstraintFamily::Number => "number",
            ConstraintFamily::Date => "date",
            ConstraintFamily::BigInt => "bigint",
            ConstraintFamily::Set => "set",
            ConstraintFamily::Map => "map",
        }
    }
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Marker trait for a constraint family
pub trait ConstraintKind: sealed::Sealed + 'static {
    /// Family recorded on the schema node
    const FAMILY: ConstraintFamily;

    /// Whether schemas of this tag accept this family's constraints
    fn supports(tag: SchemaTag) -> bool;
}

macro_rules! constraint_kinds {
    ($($(#[$doc:meta])* $name:ident => $family:ident: $($tag:ident)|+;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub enum $name {}

            impl sealed::Sealed for $name {}

            impl ConstraintKind for $name {
                const FAMILY: ConstraintFamily = ConstraintFamily::$family;

                fn supports(tag: SchemaTag) -> bool {
                    matches!(tag, $(SchemaTag::$tag)|+)
                }
            }
        )*
    };
}

constraint_kinds! {
    /// Array length and uniqueness rules
    ArrayRules => Array: Array;
    /// Object key rules
    ObjectRules => Object: Object | Partial | Required | Pick | Omit;
    /// String length and format rules
    StringRules => String: String;
    /// Numeric bound rules, for number and integer schemas
    NumberRules => Number: Number | Integer;
    /// Date bound rules
    DateRules => Date: Date;
    /// Big integer bound rules
    BigIntRules => BigInt: BigInt;
    /// Set size rules
    SetRules => Set: Set;
    /// Map size rules
    MapRules => Map: Map;
}

/// A schema carrying the chaining methods of family `K`
pub struct Constrained<K: ConstraintKind> {
    schema: Schema,
    kind: PhantomData<fn() -> K>,
}

pub type ArraySchema = Constrained<ArrayRules>;
pub type ObjectSchema = Constrained<ObjectRules>;
pub type StringSchema = Constrained<StringRules>;
pub type NumberSchema = Constrained<NumberRules>;
pub type DateSchema = Constrained<DateRules>;
pub type BigIntSchema = Constrained<BigIntRules>;
pub type SetSchema = Constrained<SetRules>;
pub type MapSchema = Constrained<MapRules>;

impl<K: ConstraintKind> Constrained<K> {
    /// Augment a compatible schema with this family's methods
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedConstraint` if the schema's kind does not belong
    /// to the family.
    pub fn new(base: impl Into<Schema>) -> Result<Self> {
        let base = base.into();
        if !K::supports(base.tag()) {
            return Err(Error::UnsupportedConstraint {
                family: K::FAMILY,
                tag: base.tag(),
            });
        }
        if base.constraint_family() == Some(K::FAMILY) {
            return Ok(Self::wrap(base));
        }
        Ok(Self::wrap(base.with_family(K::FAMILY)))
    }

    /// Wrap a schema already known to belong to the family
    pub(crate) fn wrap(schema: Schema) -> Self {
        Self {
            schema,
            kind: PhantomData,
        }
    }

    /// A new builder with one more refinement
    #[must_use]
    pub fn push(&self, refinement: Refinement) -> Self {
        Self::wrap(self.schema.with_refinement(refinement))
    }

    /// A new builder whose most recent refinement (or kind check, when
    /// there is no refinement) reports `message`
    #[must_use]
    pub fn with_message(&self, message: impl Into<String>) -> Self {
        Self::wrap(self.schema.with_last_message(message))
    }

    /// A new builder with a custom predicate refinement
    #[must_use]
    pub fn refine<F>(&self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::wrap(self.schema.refine(predicate, message))
    }

    /// Borrow the underlying schema
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Unwrap the underlying schema
    #[must_use]
    pub fn into_schema(self) -> Schema {
        self.schema
    }
}

impl<K: ConstraintKind> Clone for Constrained<K> {
    fn clone(&self) -> Self {
        Self::wrap(self.schema.clone())
    }
}

impl<K: ConstraintKind> fmt::Debug for Constrained<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constrained")
            .field("family", &K::FAMILY)
            .field("schema", &self.schema)
            .finish()
    }
}

impl<K: ConstraintKind> Deref for Constrained<K> {
    type Target = Schema;

    fn deref(&self) -> &Schema {
        &self.schema
    }
}

impl<K: ConstraintKind> From<Constrained<K>> for Schema {
    fn from(constrained: Constrained<K>) -> Self {
        constrained.schema
    }
}

impl<K: ConstraintKind> From<&Constrained<K>> for Schema {
    fn from(constrained: &Constrained<K>) -> Self {
        constrained.schema.clone()
    }
}
