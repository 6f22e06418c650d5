#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # kanon-value
//!
//! Untyped runtime values and deep-merge utilities.
//!
//! Schemas validate [`Value`]s: a format-neutral, dynamically typed tree that
//! can hold everything a loosely typed host hands over (undefined, null,
//! numbers, big integers, strings, symbols, dates, arrays, plain objects,
//! maps and sets). Reference values (arrays, objects, maps, sets) are
//! immutable and shared, so cloning is cheap and identity is observable.

/// Reference containers and identity keys.
pub mod collections;
/// serde integration and JSON conversion.
pub mod json;
/// Deep merge of plain objects.
pub mod merge;
/// The runtime value enum and its scalar companions.
pub mod value;

/// Insertion-ordered reference containers.
pub use collections::{Array, IdentityKey, Object, ValueMap, ValueSet};
/// Deep-merge entry points.
pub use merge::{Precedence, merge_deep, merge_deep_left, merge_deep_right, merge_values};
/// Value primitives.
pub use value::{Date, PropertyKey, Symbol, Value, ValueKind};

use thiserror::Error;

/// Errors that can occur when working with values
#[derive(Error, Debug)]
pub enum Error {
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Conversion error in {context}: {message}")]
    Conversion { context: String, message: String },
}

impl Error {
    /// Build a type-mismatch error from the expected and the observed kind.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Build a conversion error with conversion context.
    pub fn conversion(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// Crate-local result type for value operations.
pub type Result<T> = std::result::Result<T, Error>;
