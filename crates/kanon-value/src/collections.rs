//! Reference containers for arrays, objects, maps and sets
//!
//! Every container is an immutable, reference-counted collection. Cloning
//! shares the allocation, so two clones keep the same identity while two
//! separately built containers never do, even when structurally equal.

use crate::value::{PropertyKey, Value};
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::sync::Arc;

/// SameValueZero identity of a value, usable as a hash key.
///
/// NaN collides with NaN, `-0` with `+0`, strings and numbers compare by
/// content and reference values by allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Undefined,
    Null,
    Bool(bool),
    Number(u64),
    BigInt(i128),
    String(String),
    Symbol(u64),
    Date(Option<i64>),
    Reference(usize),
}

impl IdentityKey {
    /// Compute the identity key of a value
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Undefined => IdentityKey::Undefined,
            Value::Null => IdentityKey::Null,
            Value::Bool(b) => IdentityKey::Bool(*b),
            Value::Number(n) => IdentityKey::Number(normalized_bits(*n)),
            Value::BigInt(n) => IdentityKey::BigInt(*n),
            Value::String(text) => IdentityKey::String(text.clone()),
            Value::Symbol(symbol) => IdentityKey::Symbol(symbol.id()),
            Value::Date(date) => IdentityKey::Date(date.timestamp_millis()),
            Value::Array(array) => IdentityKey::Reference(array.identity()),
            Value::Object(object) => IdentityKey::Reference(object.identity()),
            Value::Map(map) => IdentityKey::Reference(map.identity()),
            Value::Set(set) => IdentityKey::Reference(set.identity()),
        }
    }
}

fn normalized_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0.0_f64.to_bits()
    } else {
        n.to_bits()
    }
}

fn arc_identity<T>(arc: &Arc<T>) -> usize {
    Arc::as_ptr(arc).cast::<()>() as usize
}

/// Immutable ordered list of values
#[derive(Debug, Clone, Default)]
pub struct Array(Arc<Vec<Value>>);

impl Array {
    /// Wrap a vector
    #[must_use]
    pub fn new(items: Vec<Value>) -> Self {
        Self(Arc::new(items))
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Item at index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Borrow the items
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    /// Iterate items in index order
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Whether both handles share one allocation
    #[must_use]
    pub fn ptr_eq(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address-based identity
    #[must_use]
    pub fn identity(&self) -> usize {
        arc_identity(&self.0)
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Immutable, insertion-ordered plain object
#[derive(Debug, Clone, Default)]
pub struct Object(Arc<IndexMap<PropertyKey, Value>>);

impl Object {
    /// Create an empty object
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of own properties
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a property
    #[must_use]
    pub fn get(&self, key: &PropertyKey) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a string-keyed property
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.0.get(&PropertyKey::from(key))
    }

    /// Check if a property exists
    #[must_use]
    pub fn contains_key(&self, key: &PropertyKey) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate keys in insertion order
    pub fn keys(&self) -> indexmap::map::Keys<'_, PropertyKey, Value> {
        self.0.keys()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> indexmap::map::Iter<'_, PropertyKey, Value> {
        self.0.iter()
    }

    /// Borrow the backing map; clone it to build a modified copy
    #[must_use]
    pub fn entries(&self) -> &IndexMap<PropertyKey, Value> {
        &self.0
    }

    /// A new object equal to this one with `key` set to `value`
    #[must_use]
    pub fn with_entry(&self, key: impl Into<PropertyKey>, value: Value) -> Object {
        let mut entries = IndexMap::clone(&self.0);
        entries.insert(key.into(), value);
        Object::from(entries)
    }

    /// Whether both handles share one allocation
    #[must_use]
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address-based identity
    #[must_use]
    pub fn identity(&self) -> usize {
        arc_identity(&self.0)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl From<IndexMap<PropertyKey, Value>> for Object {
    fn from(entries: IndexMap<PropertyKey, Value>) -> Self {
        Self(Arc::new(entries))
    }
}

impl FromIterator<(PropertyKey, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (PropertyKey, Value)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<IndexMap<_, _>>())
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a PropertyKey, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, PropertyKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Immutable, insertion-ordered map keyed by SameValueZero identity
#[derive(Debug, Clone, Default)]
pub struct ValueMap(Arc<IndexMap<IdentityKey, (Value, Value)>>);

impl ValueMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value stored under a key
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.get(&key.identity_key()).map(|(_, value)| value)
    }

    /// Check if a key exists
    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.0.contains_key(&key.identity_key())
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> + '_ {
        self.0.values().map(|(key, value)| (key, value))
    }

    /// Whether both handles share one allocation
    #[must_use]
    pub fn ptr_eq(&self, other: &ValueMap) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address-based identity
    #[must_use]
    pub fn identity(&self) -> usize {
        arc_identity(&self.0)
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.len() == other.len()
                && self
                    .iter()
                    .zip(other.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && va == vb))
    }
}

/// Later entries overwrite the value of an existing key but keep its position.
impl FromIterator<(Value, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut entries: IndexMap<IdentityKey, (Value, Value)> = IndexMap::new();
        for (key, value) in iter {
            match entries.entry(key.identity_key()) {
                Entry::Occupied(mut slot) => slot.get_mut().1 = value,
                Entry::Vacant(slot) => {
                    slot.insert((key, value));
                }
            }
        }
        Self(Arc::new(entries))
    }
}

/// Immutable, insertion-ordered set keyed by SameValueZero identity
#[derive(Debug, Clone, Default)]
pub struct ValueSet(Arc<IndexMap<IdentityKey, Value>>);

impl ValueSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check membership
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains_key(&value.identity_key())
    }

    /// Iterate members in insertion order
    pub fn iter(&self) -> indexmap::map::Values<'_, IdentityKey, Value> {
        self.0.values()
    }

    /// Whether both handles share one allocation
    #[must_use]
    pub fn ptr_eq(&self, other: &ValueSet) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address-based identity
    #[must_use]
    pub fn identity(&self) -> usize {
        arc_identity(&self.0)
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b))
    }
}

/// Duplicate members keep their first position.
impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut members: IndexMap<IdentityKey, Value> = IndexMap::new();
        for value in iter {
            members.entry(value.identity_key()).or_insert(value);
        }
        Self(Arc::new(members))
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a Value;
    type IntoIter = indexmap::map::Values<'a, IdentityKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_deduplicates_nan() {
        let set: ValueSet = vec![Value::Number(f64::NAN), Value::Number(f64::NAN)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_set_keeps_distinct_objects() {
        let a = Value::object([("k", Value::from(1))]);
        let b = Value::object([("k", Value::from(1))]);
        let set: ValueSet = vec![a.clone(), b, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_set_preserves_insertion_order() {
        let set: ValueSet = vec![Value::from("c"), Value::from("a"), Value::from("c"), Value::from("b")]
            .into_iter()
            .collect();
        let members: Vec<&Value> = set.iter().collect();
        assert_eq!(members, vec![&Value::from("c"), &Value::from("a"), &Value::from("b")]);
    }

    #[test]
    fn test_map_overwrite_keeps_position() {
        let map: ValueMap = vec![
            (Value::from("a"), Value::from(1)),
            (Value::from("b"), Value::from(2)),
            (Value::from("a"), Value::from(3)),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&Value::from("a")), Some(&Value::from(3)));
        let keys: Vec<&Value> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![&Value::from("a"), &Value::from("b")]);
    }

    #[test]
    fn test_object_with_entry_does_not_mutate() {
        let original = Object::from_iter([(PropertyKey::from("a"), Value::from(1))]);
        let updated = original.with_entry("b", Value::from(2));

        assert_eq!(original.len(), 1);
        assert_eq!(updated.len(), 2);
        assert!(!original.ptr_eq(&updated));
        assert_eq!(updated.get_str("b"), Some(&Value::from(2)));
    }

    #[test]
    fn test_identity_key_zero() {
        assert_eq!(IdentityKey::of(&Value::Number(-0.0)), IdentityKey::of(&Value::Number(0.0)));
        assert_ne!(IdentityKey::of(&Value::Number(1.0)), IdentityKey::of(&Value::BigInt(1)));
    }

    #[test]
    fn test_array_clone_shares_identity() {
        let array = Array::new(vec![Value::from(1)]);
        let clone = array.clone();
        assert!(array.ptr_eq(&clone));
        assert_eq!(array.identity(), clone.identity());
        assert!(!array.ptr_eq(&Array::new(vec![Value::from(1)])));
    }
}
