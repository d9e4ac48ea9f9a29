//! Attribute-style storage for nested mappings.
//!
//! [`Storage`] is an ordered string-keyed map in which every mapping value,
//! at any depth, is itself a `Storage`. Lookups never fail: an unbound key
//! reads as `None`, which is distinct from a stored JSON `null`.
//!
//! Arrays are kept as plain JSON and are not descended into, so mappings
//! nested inside a list stay plain objects.
//!
//! ## Example
//!
//! ```
//! use dolfin_core::storage::Storage;
//! use serde_json::json;
//!
//! let storage = Storage::convert(&json!({"db": {"host": "localhost"}})).unwrap();
//!
//! assert_eq!(storage.get_path("db.host").and_then(|v| v.as_str()), Some("localhost"));
//! assert!(storage.get("missing").is_none());
//! assert!(storage.get("db").unwrap().as_storage().is_some());
//! ```

use crate::util::data::kind_of;
use dolfin_types::{bail, DolfinError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// A value held by a [`Storage`].
///
/// `Plain` never holds a JSON object at its top level; objects are always
/// represented as `Mapping`. Use the `From` conversions to build values so
/// that this holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A nested mapping
    Mapping(Storage),
    /// Any non-mapping value: scalars, null, and arrays
    Plain(JsonValue),
}

impl Value {
    /// The nested storage, if this value is a mapping.
    pub fn as_storage(&self) -> Option<&Storage> {
        match self {
            Value::Mapping(storage) => Some(storage),
            Value::Plain(_) => None,
        }
    }

    /// Mutable access to the nested storage, if this value is a mapping.
    pub fn as_storage_mut(&mut self) -> Option<&mut Storage> {
        match self {
            Value::Mapping(storage) => Some(storage),
            Value::Plain(_) => None,
        }
    }

    /// The plain JSON value, if this value is not a mapping.
    pub fn as_plain(&self) -> Option<&JsonValue> {
        match self {
            Value::Plain(value) => Some(value),
            Value::Mapping(_) => None,
        }
    }

    /// The string, if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        self.as_plain().and_then(JsonValue::as_str)
    }

    /// The integer, if this value is an integer that fits in `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_plain().and_then(JsonValue::as_i64)
    }

    /// The number as `f64`, if this value is a number.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_plain().and_then(JsonValue::as_f64)
    }

    /// The boolean, if this value is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        self.as_plain().and_then(JsonValue::as_bool)
    }

    /// Whether this value is a stored `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Plain(JsonValue::Null))
    }

    /// Export as a plain JSON value, unwrapping nested storages.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Mapping(storage) => storage.to_value(),
            Value::Plain(value) => value.clone(),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Object(map) => Value::Mapping(Storage::from_map(map)),
            other => Value::Plain(other),
        }
    }
}

impl From<Storage> for Value {
    fn from(storage: Storage) -> Self {
        Value::Mapping(storage)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Plain(JsonValue::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Plain(JsonValue::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Plain(JsonValue::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Plain(JsonValue::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Plain(JsonValue::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Plain(JsonValue::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Plain(JsonValue::from(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Plain(JsonValue::Null), Into::into)
    }
}

/// Ordered string-keyed mapping with no-fail reads.
///
/// Equality ignores insertion order; iteration and serialization follow it.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Storage {
    entries: IndexMap<String, Value>,
}

impl Storage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recursively convert a mapping into a storage tree.
    ///
    /// # Errors
    ///
    /// Returns `DolfinError::InvalidArgument` if `source` is not an object.
    pub fn convert(source: &JsonValue) -> Result<Self> {
        match source {
            JsonValue::Object(map) => Ok(Self::from_map(map.clone())),
            other => bail!(
                InvalidArgument,
                "expected a mapping to convert, got {}",
                kind_of(other)
            ),
        }
    }

    /// Build a storage from a JSON object, converting nested objects.
    pub fn from_map(map: Map<String, JsonValue>) -> Self {
        map.into_iter()
            .map(|(key, value)| (key, Value::from(value)))
            .collect()
    }

    /// Get the value bound to `key`, or `None` if unbound.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Mutable access to the value bound to `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Walk a dotted key path through nested storages.
    ///
    /// `get_path("meta.name")` is the equivalent of chained attribute access.
    /// Yields `None` if any segment is unbound or is not a mapping.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = current.as_storage()?.get(segment)?;
        }
        Some(current)
    }

    /// Bind `key` to `value`, returning the previous value if any.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove `key`. Removing an unbound key is a no-op.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Whether `key` is bound.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no keys are bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bound keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Export a plain mapping snapshot.
    ///
    /// `Storage::convert(&storage.to_value())` reconstructs an equal storage.
    pub fn to_value(&self) -> JsonValue {
        JsonValue::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl TryFrom<JsonValue> for Storage {
    type Error = DolfinError;

    fn try_from(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self::from_map(map)),
            other => Self::convert(&other),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Storage {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Storage {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl IntoIterator for Storage {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Storage(")?;
        f.debug_map().entries(self.entries.iter()).finish()?;
        f.write_str(")")
    }
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Storage({})", self.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    /// Every object reachable through mapping values must be a `Storage`.
    fn all_mappings_wrapped(storage: &Storage) -> bool {
        storage.iter().all(|(_, value)| match value {
            Value::Mapping(inner) => all_mappings_wrapped(inner),
            Value::Plain(plain) => !plain.is_object(),
        })
    }

    #[test]
    fn test_absent_key_reads_none() {
        let storage = Storage::new();
        assert!(storage.get("missing").is_none());
        assert!(storage.get_path("missing.deeper").is_none());
    }

    #[test]
    fn test_null_is_distinct_from_absent() {
        let storage = Storage::convert(&json!({"unset": null})).unwrap();
        assert!(storage.get("unset").unwrap().is_null());
        assert!(storage.get("other").is_none());
    }

    #[test]
    fn test_set_and_overwrite() {
        let mut storage = Storage::new();
        assert!(storage.set("foo", "bar").is_none());
        let previous = storage.set("foo", 42);
        assert_eq!(previous.and_then(|v| v.as_str().map(String::from)), Some("bar".to_string()));
        assert_eq!(storage.get("foo").and_then(Value::as_i64), Some(42));
    }

    #[test]
    fn test_convert_wraps_nested_mappings() {
        let source = json!({
            "name": "dolfin",
            "db": {"host": "localhost", "pool": {"size": 4}},
        });
        let storage = Storage::convert(&source).unwrap();

        let db = storage.get("db").and_then(Value::as_storage).unwrap();
        let pool = db.get("pool").and_then(Value::as_storage).unwrap();
        assert_eq!(pool.get("size").and_then(Value::as_i64), Some(4));
        assert_eq!(storage.get_path("db.pool.size").and_then(Value::as_i64), Some(4));
        assert_eq!(storage.to_value(), source);
    }

    #[test]
    fn test_convert_leaves_arrays_untouched() {
        let source = json!({"items": [{"id": 1}, {"id": 2}]});
        let storage = Storage::convert(&source).unwrap();

        let items = storage.get("items").and_then(Value::as_plain).unwrap();
        assert!(items[0].is_object());
        assert!(storage.get_path("items.0").is_none());
    }

    #[test]
    fn test_convert_rejects_non_mappings() {
        for source in [json!([1, 2]), json!("text"), json!(3), json!(null)] {
            let err = Storage::convert(&source).unwrap_err();
            assert!(matches!(err, DolfinError::InvalidArgument(_)));
        }
        assert!(Storage::try_from(json!(true)).is_err());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut storage = Storage::convert(&json!({"keep": 1})).unwrap();
        let before = storage.clone();
        assert!(storage.remove("missing").is_none());
        assert_eq!(storage, before);

        assert!(storage.remove("keep").is_some());
        assert!(storage.get("keep").is_none());
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: Storage = [("a", 1), ("b", 2)].into_iter().collect();
        let b: Storage = [("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_representation_is_tagged() {
        let storage = Storage::convert(&json!({"foo": "bar"})).unwrap();
        assert_eq!(storage.to_string(), r#"Storage({"foo":"bar"})"#);
        assert!(format!("{:?}", storage).starts_with("Storage("));
    }

    #[test]
    fn test_serde_round_trip() {
        let storage = Storage::convert(&json!({"a": {"b": [1, {"c": null}]}, "d": 1.5})).unwrap();
        let text = serde_json::to_string(&storage).unwrap();
        let restored: Storage = serde_json::from_str(&text).unwrap();
        assert_eq!(restored, storage);
        assert!(restored.get("a").unwrap().as_storage().is_some());

        let yaml = serde_yaml::to_string(&storage).unwrap();
        let restored: Storage = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(restored, storage);
    }

    fn json_tree() -> impl Strategy<Value = JsonValue> {
        let leaf = prop_oneof![
            Just(JsonValue::Null),
            any::<bool>().prop_map(JsonValue::from),
            any::<i64>().prop_map(JsonValue::from),
            "[a-z]{0,8}".prop_map(JsonValue::from),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(JsonValue::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(|m| JsonValue::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn convert_preserves_values_and_wraps_mappings(
            map in prop::collection::btree_map("[a-z]{1,6}", json_tree(), 0..6)
        ) {
            let source = JsonValue::Object(map.into_iter().collect());
            let storage = Storage::convert(&source).unwrap();
            prop_assert_eq!(storage.to_value(), source);
            prop_assert!(all_mappings_wrapped(&storage));
        }
    }
}
