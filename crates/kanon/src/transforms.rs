//! Object transforms
//!
//! Transforms read the shape of an object-like source schema and build a
//! new schema from it. The source's own refinements are not carried over.

use crate::composite::object::Shape;
use crate::constraints::{ConstraintFamily, Constrained, ObjectSchema};
use crate::schema::{Schema, SchemaKind};
use crate::wrappers::optional;
use crate::{Error, Result};
use std::collections::HashSet;

fn source_shape(source: &Schema) -> Result<&Shape> {
    Shape::of(source).ok_or(Error::NotAnObjectSchema(source.tag()))
}

fn object_like(kind: SchemaKind) -> ObjectSchema {
    Constrained::wrap(Schema::from_kind(kind).with_family(ConstraintFamily::Object))
}

fn key_set<'a, I>(shape: &Shape, keys: I) -> Result<HashSet<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .map(|key| {
            if shape.contains_key(key) {
                Ok(key.to_string())
            } else {
                Err(Error::UnknownKey(key.to_string()))
            }
        })
        .collect()
}

/// Accepts a string naming one of the source shape's keys
///
/// # Errors
///
/// Returns `NotAnObjectSchema` if `source` is not object-like.
pub fn keyof(source: &Schema) -> Result<Schema> {
    let shape = source_shape(source)?;
    Ok(Schema::from_kind(SchemaKind::KeyOf(shape.clone())))
}

/// The source shape with every field optional
///
/// # Errors
///
/// Returns `NotAnObjectSchema` if `source` is not object-like.
pub fn partial(source: &Schema) -> Result<ObjectSchema> {
    let shape = source_shape(source)?;
    let fields = shape.map_fields(|field| match field.kind() {
        SchemaKind::Optional(_) => field.clone(),
        _ => optional(field),
    });
    Ok(object_like(SchemaKind::Partial(fields)))
}

/// The source shape with every field present and not undefined
///
/// # Errors
///
/// Returns `NotAnObjectSchema` if `source` is not object-like.
pub fn required(source: &Schema) -> Result<ObjectSchema> {
    let shape = source_shape(source)?;
    let fields = shape.map_fields(|field| match field.kind() {
        SchemaKind::Optional(inner) => inner.clone(),
        _ => field.clone(),
    });
    Ok(object_like(SchemaKind::Required(fields)))
}

/// The source shape restricted to `keys`
///
/// # Errors
///
/// Returns `NotAnObjectSchema` if `source` is not object-like and
/// `UnknownKey` if a key is not declared by the shape.
pub fn pick<'a, I>(source: &Schema, keys: I) -> Result<ObjectSchema>
where
    I: IntoIterator<Item = &'a str>,
{
    let shape = source_shape(source)?;
    let keep = key_set(shape, keys)?;
    Ok(object_like(SchemaKind::Pick(shape.filter(|key| keep.contains(key)))))
}

/// The source shape without `keys`
///
/// # Errors
///
/// Returns `NotAnObjectSchema` if `source` is not object-like and
/// `UnknownKey` if a key is not declared by the shape.
pub fn omit<'a, I>(source: &Schema, keys: I) -> Result<ObjectSchema>
where
    I: IntoIterator<Item = &'a str>,
{
    let shape = source_shape(source)?;
    let drop = key_set(shape, keys)?;
    Ok(object_like(SchemaKind::Omit(shape.filter(|key| !drop.contains(key)))))
}
