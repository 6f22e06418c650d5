//! Declarative schema descriptors
//!
//! A descriptor is the serde model of a schema, so schemas can be written
//! as YAML or JSON:
//!
//! ```yaml
//! definitions:
//!   node:
//!     type: object
//!     fields:
//!       name: { type: string, min_length: 1 }
//!       children: { type: array, items: { type: ref, name: node } }
//! schema: { type: ref, name: node }
//! ```
//!
//! Every schema kind has a `type`, constraint rules are plain fields of the
//! kind, and the wrapper flags (`optional`, `nullable`, `nullish`,
//! `readonly`, `default`, `message`) may appear on any descriptor.
//! `ref` entries compile to lazy schemas resolved through a
//! [`SchemaRegistry`].

use crate::composite::object::Shape;
use crate::composite::{array, map, object, record, set, tuple};
use crate::constraints::{
    ArraySchema, BigIntSchema, DateSchema, MapSchema, NumberSchema, SetSchema, StringSchema,
};
use crate::operators::{intersection, union};
use crate::primitives::{self, NativeEnum};
use crate::registry::SchemaRegistry;
use crate::schema::Schema;
use crate::transforms;
use crate::wrappers;
use crate::{Error, Result};
use indexmap::IndexMap;
use kanon_value::{Date, Value};
use serde::{Deserialize, Serialize};

/// A file of named definitions plus an optional root schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaDocument {
    /// Named schemas, referable with `type: ref`
    pub definitions: IndexMap<String, SchemaSpec>,
    /// The schema the document describes
    pub schema: Option<SchemaSpec>,
}

/// A descriptor with its wrapper flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSpec {
    #[serde(flatten)]
    pub descriptor: Descriptor,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullish: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub readonly: bool,
    /// Substitute for `undefined`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Replaces the message of the last rule (or of the kind check)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(flag: &bool) -> bool {
    !*flag
}

impl From<Descriptor> for SchemaSpec {
    fn from(descriptor: Descriptor) -> Self {
        Self {
            descriptor,
            optional: false,
            nullable: false,
            nullish: false,
            readonly: false,
            default: None,
            message: None,
        }
    }
}

/// Built-in string formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringFormat {
    Email,
    Url,
    Uuid,
}

/// Numeric bounds shared by `number` and `integer`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub gt: Option<f64>,
    pub lt: Option<f64>,
    pub int: bool,
    pub finite: bool,
    pub multiple_of: Option<f64>,
}

/// Size rules shared by `set` and `map`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeBounds {
    pub min_size: Option<usize>,
    pub max_size: Option<usize>,
    pub size: Option<usize>,
    pub nonempty: bool,
}

/// Kind-specific part of a descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Descriptor {
    String {
        #[serde(default)]
        min_length: Option<usize>,
        #[serde(default)]
        max_length: Option<usize>,
        #[serde(default)]
        length: Option<usize>,
        #[serde(default)]
        nonempty: bool,
        #[serde(default)]
        format: Option<StringFormat>,
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        starts_with: Option<String>,
        #[serde(default)]
        ends_with: Option<String>,
        #[serde(default)]
        includes: Option<String>,
    },
    Number {
        #[serde(flatten)]
        bounds: NumberBounds,
    },
    Integer {
        #[serde(flatten)]
        bounds: NumberBounds,
    },
    Boolean,
    Date {
        /// RFC 3339 lower bound
        #[serde(default)]
        min: Option<String>,
        /// RFC 3339 upper bound
        #[serde(default)]
        max: Option<String>,
    },
    #[serde(rename = "bigint")]
    BigInt {
        #[serde(default)]
        min: Option<i64>,
        #[serde(default)]
        max: Option<i64>,
        #[serde(default)]
        multiple_of: Option<i64>,
    },
    Symbol,
    Enum {
        values: Vec<String>,
    },
    Literal {
        value: serde_json::Value,
    },
    NativeEnum {
        entries: IndexMap<String, serde_json::Value>,
    },
    Any,
    Unknown,
    Never,
    Null,
    Undefined,
    Void,
    Array {
        items: Box<SchemaSpec>,
        #[serde(default)]
        min_length: Option<usize>,
        #[serde(default)]
        max_length: Option<usize>,
        #[serde(default)]
        length: Option<usize>,
        #[serde(default)]
        nonempty: bool,
        #[serde(default)]
        unique: bool,
    },
    Object {
        #[serde(default)]
        fields: IndexMap<String, SchemaSpec>,
        #[serde(default)]
        strict: bool,
        #[serde(default)]
        min_keys: Option<usize>,
        #[serde(default)]
        max_keys: Option<usize>,
    },
    Tuple {
        items: Vec<SchemaSpec>,
        #[serde(default)]
        rest: Option<Box<SchemaSpec>>,
    },
    Record {
        /// Defaults to `string`
        #[serde(default)]
        key: Option<Box<SchemaSpec>>,
        value: Box<SchemaSpec>,
    },
    Map {
        key: Box<SchemaSpec>,
        value: Box<SchemaSpec>,
        #[serde(flatten)]
        bounds: SizeBounds,
    },
    Set {
        items: Box<SchemaSpec>,
        #[serde(flatten)]
        bounds: SizeBounds,
    },
    Union {
        branches: Vec<SchemaSpec>,
    },
    Intersection {
        branches: Vec<SchemaSpec>,
    },
    #[serde(rename = "keyof")]
    KeyOf {
        source: Box<SchemaSpec>,
    },
    Partial {
        source: Box<SchemaSpec>,
    },
    Required {
        source: Box<SchemaSpec>,
    },
    Pick {
        source: Box<SchemaSpec>,
        keys: Vec<String>,
    },
    Omit {
        source: Box<SchemaSpec>,
        keys: Vec<String>,
    },
    /// A named definition, resolved lazily
    Ref {
        name: String,
    },
}

impl SchemaSpec {
    /// Parse a JSON descriptor
    ///
    /// # Errors
    ///
    /// Returns `Json` if the text is not a valid descriptor.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a YAML descriptor
    ///
    /// # Errors
    ///
    /// Returns `Yaml` if the text is not a valid descriptor.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Names of every `ref` reachable from this descriptor
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        if let Descriptor::Ref { name } = &self.descriptor {
            names.push(name);
        }
        for child in self.descriptor.children() {
            child.collect_references(names);
        }
    }

    /// Build the schema; `ref`s resolve through `registry`
    ///
    /// # Errors
    ///
    /// Returns an error for malformed rules (bad regex, bad date bound,
    /// non-object transform source, unknown pick/omit key, unsupported
    /// native enum value).
    pub fn compile(&self, registry: &SchemaRegistry) -> Result<Schema> {
        let mut schema = self.descriptor.compile(registry)?;
        if let Some(message) = &self.message {
            schema = schema.with_last_message(message.clone());
        }
        if let Some(fallback) = &self.default {
            schema = wrappers::default_value(schema, Value::from(fallback.clone()));
        }
        if self.nullable {
            schema = wrappers::nullable(schema);
        }
        if self.nullish {
            schema = wrappers::nullish(schema);
        }
        if self.optional {
            schema = wrappers::optional(schema);
        }
        if self.readonly {
            schema = wrappers::readonly(schema);
        }
        Ok(schema)
    }
}

fn parse_date(bound: &str) -> Result<Date> {
    let date = Date::parse(bound);
    if date.is_valid() {
        Ok(date)
    } else {
        Err(Error::Descriptor(format!("Invalid date bound '{bound}'")))
    }
}

fn compile_all(specs: &[SchemaSpec], registry: &SchemaRegistry) -> Result<Vec<Schema>> {
    specs.iter().map(|spec| spec.compile(registry)).collect()
}

fn size_bounds<T>(
    mut schema: T,
    bounds: &SizeBounds,
    min: impl Fn(&T, usize) -> T,
    max: impl Fn(&T, usize) -> T,
    exact: impl Fn(&T, usize) -> T,
    nonempty: impl Fn(&T) -> T,
) -> T {
    if let Some(n) = bounds.min_size {
        schema = min(&schema, n);
    }
    if let Some(n) = bounds.max_size {
        schema = max(&schema, n);
    }
    if let Some(n) = bounds.size {
        schema = exact(&schema, n);
    }
    if bounds.nonempty {
        schema = nonempty(&schema);
    }
    schema
}

fn number_bounds(mut schema: NumberSchema, bounds: &NumberBounds) -> NumberSchema {
    if let Some(n) = bounds.min {
        schema = schema.min(n);
    }
    if let Some(n) = bounds.max {
        schema = schema.max(n);
    }
    if let Some(n) = bounds.gt {
        schema = schema.gt(n);
    }
    if let Some(n) = bounds.lt {
        schema = schema.lt(n);
    }
    if bounds.int {
        schema = schema.int();
    }
    if bounds.finite {
        schema = schema.finite();
    }
    if let Some(n) = bounds.multiple_of {
        schema = schema.multiple_of(n);
    }
    schema
}

impl Descriptor {
    /// Nested descriptors, in declaration order
    #[must_use]
    pub fn children(&self) -> Vec<&SchemaSpec> {
        match self {
            Descriptor::Array { items, .. } | Descriptor::Set { items, .. } => vec![&**items],
            Descriptor::Object { fields, .. } => fields.values().collect(),
            Descriptor::Tuple { items, rest } => items.iter().chain(rest.as_deref()).collect(),
            Descriptor::Record { key, value } => {
                key.as_deref().into_iter().chain(std::iter::once(&**value)).collect()
            }
            Descriptor::Map { key, value, .. } => vec![&**key, &**value],
            Descriptor::Union { branches } | Descriptor::Intersection { branches } => {
                branches.iter().collect()
            }
            Descriptor::KeyOf { source }
            | Descriptor::Partial { source }
            | Descriptor::Required { source }
            | Descriptor::Pick { source, .. }
            | Descriptor::Omit { source, .. } => vec![&**source],
            _ => Vec::new(),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn compile(&self, registry: &SchemaRegistry) -> Result<Schema> {
        let schema = match self {
            Descriptor::String {
                min_length,
                max_length,
                length,
                nonempty,
                format,
                pattern,
                starts_with,
                ends_with,
                includes,
            } => {
                let mut schema: StringSchema = primitives::string();
                if let Some(n) = min_length {
                    schema = schema.min_length(*n);
                }
                if let Some(n) = max_length {
                    schema = schema.max_length(*n);
                }
                if let Some(n) = length {
                    schema = schema.length(*n);
                }
                if *nonempty {
                    schema = schema.nonempty();
                }
                match format {
                    Some(StringFormat::Email) => schema = schema.email(),
                    Some(StringFormat::Url) => schema = schema.url(),
                    Some(StringFormat::Uuid) => schema = schema.uuid(),
                    None => {}
                }
                if let Some(pattern) = pattern {
                    schema = schema.regex(pattern)?;
                }
                if let Some(prefix) = starts_with {
                    schema = schema.starts_with(prefix.as_str());
                }
                if let Some(suffix) = ends_with {
                    schema = schema.ends_with(suffix.as_str());
                }
                if let Some(needle) = includes {
                    schema = schema.includes(needle.as_str());
                }
                schema.into_schema()
            }
            Descriptor::Number { bounds } => number_bounds(primitives::number(), bounds).into_schema(),
            Descriptor::Integer { bounds } => number_bounds(primitives::integer(), bounds).into_schema(),
            Descriptor::Boolean => primitives::boolean(),
            Descriptor::Date { min, max } => {
                let mut schema: DateSchema = primitives::date();
                if let Some(bound) = min {
                    schema = schema.min(parse_date(bound)?);
                }
                if let Some(bound) = max {
                    schema = schema.max(parse_date(bound)?);
                }
                schema.into_schema()
            }
            Descriptor::BigInt { min, max, multiple_of } => {
                let mut schema: BigIntSchema = primitives::bigint();
                if let Some(n) = min {
                    schema = schema.min(i128::from(*n));
                }
                if let Some(n) = max {
                    schema = schema.max(i128::from(*n));
                }
                if let Some(n) = multiple_of {
                    schema = schema.multiple_of(i128::from(*n));
                }
                schema.into_schema()
            }
            Descriptor::Symbol => primitives::symbol(),
            Descriptor::Enum { values } => primitives::enumeration(values.iter().cloned()),
            Descriptor::Literal { value } => primitives::literal(Value::from(value.clone())),
            Descriptor::NativeEnum { entries } => {
                let mut table = NativeEnum::new();
                for (name, value) in entries {
                    table = match value {
                        serde_json::Value::String(text) => table.text(name.as_str(), text.as_str()),
                        serde_json::Value::Number(n) => match n.as_f64() {
                            Some(n) => table.numeric(name.as_str(), n),
                            None => {
                                return Err(Error::Descriptor(format!(
                                    "Native enum entry '{name}' is out of range"
                                )));
                            }
                        },
                        _ => {
                            return Err(Error::Descriptor(format!(
                                "Native enum entry '{name}' must be a string or a number"
                            )));
                        }
                    };
                }
                primitives::native_enum(table)
            }
            Descriptor::Any => primitives::any(),
            Descriptor::Unknown => primitives::unknown(),
            Descriptor::Never => primitives::never(),
            Descriptor::Null => primitives::null(),
            Descriptor::Undefined => primitives::undefined(),
            Descriptor::Void => primitives::void(),
            Descriptor::Array {
                items,
                min_length,
                max_length,
                length,
                nonempty,
                unique,
            } => {
                let mut schema: ArraySchema = array::array(items.compile(registry)?);
                if let Some(n) = min_length {
                    schema = schema.min_length(*n);
                }
                if let Some(n) = max_length {
                    schema = schema.max_length(*n);
                }
                if let Some(n) = length {
                    schema = schema.length(*n);
                }
                if *nonempty {
                    schema = schema.nonempty();
                }
                if *unique {
                    schema = schema.unique();
                }
                schema.into_schema()
            }
            Descriptor::Object {
                fields,
                strict,
                min_keys,
                max_keys,
            } => {
                let mut shape = Shape::new();
                for (key, spec) in fields {
                    shape = shape.field(key.as_str(), spec.compile(registry)?);
                }
                let mut schema = object::object(shape);
                if *strict {
                    schema = schema.strict();
                }
                if let Some(n) = min_keys {
                    schema = schema.min_keys(*n);
                }
                if let Some(n) = max_keys {
                    schema = schema.max_keys(*n);
                }
                schema.into_schema()
            }
            Descriptor::Tuple { items, rest } => {
                let items = compile_all(items, registry)?;
                match rest {
                    Some(rest) => tuple::tuple_with_rest(items, rest.compile(registry)?),
                    None => tuple::tuple(items),
                }
            }
            Descriptor::Record { key, value } => {
                let key = match key {
                    Some(key) => key.compile(registry)?,
                    None => primitives::string().into_schema(),
                };
                record::record(key, value.compile(registry)?)
            }
            Descriptor::Map { key, value, bounds } => {
                let schema: MapSchema = map::map(key.compile(registry)?, value.compile(registry)?);
                size_bounds(
                    schema,
                    bounds,
                    MapSchema::min_size,
                    MapSchema::max_size,
                    MapSchema::size,
                    MapSchema::nonempty,
                )
                .into_schema()
            }
            Descriptor::Set { items, bounds } => {
                let schema: SetSchema = set::set(items.compile(registry)?);
                size_bounds(
                    schema,
                    bounds,
                    SetSchema::min_size,
                    SetSchema::max_size,
                    SetSchema::size,
                    SetSchema::nonempty,
                )
                .into_schema()
            }
            Descriptor::Union { branches } => union(compile_all(branches, registry)?),
            Descriptor::Intersection { branches } => intersection(compile_all(branches, registry)?),
            Descriptor::KeyOf { source } => transforms::keyof(&source.compile(registry)?)?,
            Descriptor::Partial { source } => {
                transforms::partial(&source.compile(registry)?)?.into_schema()
            }
            Descriptor::Required { source } => {
                transforms::required(&source.compile(registry)?)?.into_schema()
            }
            Descriptor::Pick { source, keys } => {
                transforms::pick(&source.compile(registry)?, keys.iter().map(String::as_str))?
                    .into_schema()
            }
            Descriptor::Omit { source, keys } => {
                transforms::omit(&source.compile(registry)?, keys.iter().map(String::as_str))?
                    .into_schema()
            }
            Descriptor::Ref { name } => registry.reference(name.as_str()),
        };
        Ok(schema)
    }
}
