//! Value types for untyped runtime data

use crate::collections::{Array, IdentityKey, Object, ValueMap, ValueSet};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A dynamically typed runtime value
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Undefined,

    /// Explicit null
    Null,

    /// Boolean value
    Bool(bool),

    /// Double-precision number (may be NaN or infinite)
    Number(f64),

    /// Arbitrary-size integer, bounded here to 128 bits
    BigInt(i128),

    /// String value
    String(String),

    /// Unique symbol
    Symbol(Symbol),

    /// Calendar instant, possibly invalid
    Date(Date),

    /// Ordered list of values
    Array(Array),

    /// Plain object with string and symbol keys
    Object(Object),

    /// Insertion-ordered key/value container
    Map(ValueMap),

    /// Insertion-ordered container of distinct values
    Set(ValueSet),
}

/// Kind names reported in validation messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Null,
    Boolean,
    Number,
    NaN,
    BigInt,
    String,
    Symbol,
    Date,
    Array,
    Object,
    Map,
    Set,
}

impl ValueKind {
    /// Lowercase kind name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::NaN => "nan",
            ValueKind::BigInt => "bigint",
            ValueKind::String => "string",
            ValueKind::Symbol => "symbol",
            ValueKind::Date => "date",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
            ValueKind::Map => "map",
            ValueKind::Set => "set",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// A unique symbol; two symbols are equal only if they come from the same
/// constructor call
#[derive(Debug, Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Arc<str>>,
}

impl Symbol {
    /// Create a fresh symbol with a description
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: Some(Arc::from(description.into())),
        }
    }

    /// Create a fresh symbol without a description
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: None,
        }
    }

    /// Process-unique identifier
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Optional description
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or_default())
    }
}

/// A date value. Dates built from unparseable input stay representable but
/// carry no instant, mirroring an "Invalid Date".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date {
    instant: Option<DateTime<Utc>>,
}

impl Date {
    /// Create a valid date at the given instant
    #[must_use]
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Some(instant),
        }
    }

    /// Create an invalid date
    #[must_use]
    pub fn invalid() -> Self {
        Self { instant: None }
    }

    /// Create a date from milliseconds since the Unix epoch
    #[must_use]
    pub fn from_timestamp_millis(millis: i64) -> Self {
        Self {
            instant: DateTime::<Utc>::from_timestamp_millis(millis),
        }
    }

    /// Parse an RFC 3339 timestamp; unparseable input yields an invalid date
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self {
            instant: DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc)),
        }
    }

    /// Whether the date carries a real timestamp
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.instant.is_some()
    }

    /// The instant, if valid
    #[must_use]
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }

    /// Milliseconds since the Unix epoch, if valid
    #[must_use]
    pub fn timestamp_millis(&self) -> Option<i64> {
        self.instant.map(|instant| instant.timestamp_millis())
    }

    /// RFC 3339 rendering with millisecond precision, if valid
    #[must_use]
    pub fn to_rfc3339(&self) -> Option<String> {
        self.instant
            .map(|instant| instant.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<DateTime<Utc>> for Date {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::new(instant)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Some(text) => f.write_str(&text),
            None => f.write_str("Invalid Date"),
        }
    }
}

/// Key of a plain-object property
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// String-keyed property
    String(String),
    /// Symbol-keyed property
    Symbol(Symbol),
}

impl PropertyKey {
    /// The key text for string keys
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyKey::String(key) => Some(key),
            PropertyKey::Symbol(_) => None,
        }
    }

    /// The key as a runtime value
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            PropertyKey::String(key) => Value::String(key.clone()),
            PropertyKey::Symbol(symbol) => Value::Symbol(symbol.clone()),
        }
    }

    /// Convert a runtime value back into a key; only strings and symbols qualify
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(key) => Some(PropertyKey::String(key.clone())),
            Value::Symbol(symbol) => Some(PropertyKey::Symbol(symbol.clone())),
            _ => None,
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(key: &str) -> Self {
        PropertyKey::String(key.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(key: String) -> Self {
        PropertyKey::String(key)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(symbol: Symbol) -> Self {
        PropertyKey::Symbol(symbol)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(key) => f.write_str(key),
            PropertyKey::Symbol(symbol) => symbol.fmt(f),
        }
    }
}

impl Value {
    /// Build a string value
    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }

    /// Build an array value
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }

    /// Build a plain object value from key/value pairs
    pub fn object<K: Into<PropertyKey>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Build a set value; duplicate members (by identity) keep their first position
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(items.into_iter().collect())
    }

    /// Build a map value from key/value pairs
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Map(entries.into_iter().collect())
    }

    /// Kind of this value, as reported in messages
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(n) if n.is_nan() => ValueKind::NaN,
            Value::Number(_) => ValueKind::Number,
            Value::BigInt(_) => ValueKind::BigInt,
            Value::String(_) => ValueKind::String,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::Date(_) => ValueKind::Date,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
            Value::Map(_) => ValueKind::Map,
            Value::Set(_) => ValueKind::Set,
        }
    }

    /// Check if value is undefined
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if value is null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is null or undefined
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    /// Check if value is a plain object (not an array, map, set, date or null)
    #[must_use]
    pub fn is_plain_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Borrow the string contents
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric contents
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow the array
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Borrow the plain object
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Borrow the map
    #[must_use]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the set
    #[must_use]
    pub fn as_set(&self) -> Option<&ValueSet> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Identity key under SameValueZero: NaN equals NaN, +0 equals -0,
    /// reference values compare by identity.
    #[must_use]
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::of(self)
    }

    /// SameValueZero comparison
    #[must_use]
    pub fn same_value_zero(&self, other: &Value) -> bool {
        self.identity_key() == other.identity_key()
    }

    /// Strict equality: like SameValueZero except that NaN never equals itself
    #[must_use]
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            #[allow(clippy::float_cmp)]
            (Value::Number(a), Value::Number(b)) => a == b,
            _ => self.same_value_zero(other),
        }
    }
}

/// Structural deep equality. Numbers compare with NaN equal to itself,
/// object key order is ignored, map and set entries compare in order.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            #[allow(clippy::float_cmp)]
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i128> for Value {
    fn from(value: i128) -> Self {
        Value::BigInt(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Value::Symbol(value)
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Value::Date(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Map(value)
    }
}

impl From<ValueSet> for Value {
    fn from(value: ValueSet) -> Self {
        Value::Set(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Array::new(items))
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(f, "{n}")
    }
}

fn write_joined<'a, I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator<Item = &'a Value>,
{
    for (idx, item) in items.into_iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write_number(f, *n),
            Value::BigInt(n) => write!(f, "{n}n"),
            Value::String(text) => write!(f, "{text:?}"),
            Value::Symbol(symbol) => symbol.fmt(f),
            Value::Date(date) => date.fmt(f),
            Value::Array(array) => {
                f.write_str("[")?;
                write_joined(f, array.iter())?;
                f.write_str("]")
            }
            Value::Object(object) => {
                if object.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (idx, (key, value)) in object.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str(" }")
            }
            Value::Map(map) => {
                write!(f, "Map({}) {{", map.len())?;
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {key} => {value}")?;
                }
                f.write_str(" }")
            }
            Value::Set(set) => {
                write!(f, "Set({}) {{ ", set.len())?;
                write_joined(f, set.iter())?;
                f.write_str(" }")
            }
        }
    }
}
