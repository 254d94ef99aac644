//! Ordered table type for TOML documents.
//!
//! [`TomlTable`] wraps [`IndexMap`] so that keys iterate in insertion order,
//! which keeps serialization deterministic and lets a parsed document
//! reflect the order keys appeared in the source.
//!
//! Unlike a plain map, `insert` never overwrites: TOML rejects duplicate
//! keys, and the builder API mirrors that. Replacement is spelled
//! explicitly as `remove` followed by `insert`.
//!
//! ## Examples
//!
//! ```rust
//! use tomldoc::{TomlTable, TomlValue};
//!
//! let mut table = TomlTable::new();
//! assert!(table.insert("name", TomlValue::from("Alice")));
//! assert!(!table.insert("name", TomlValue::from("Bob")));
//! assert_eq!(table.get_str("name"), Some("Alice"));
//! ```

use crate::{TomlDateTime, TomlValue};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An insertion-ordered map of string keys to TOML values.
///
/// This is the node type behind [`TomlValue::Table`] and the root of every
/// parsed document.
///
/// # Examples
///
/// ```rust
/// use tomldoc::{TomlTable, TomlValue};
///
/// let mut table = TomlTable::new();
/// table.insert("first", TomlValue::from(1));
/// table.insert("second", TomlValue::from(2));
///
/// let keys: Vec<_> = table.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TomlTable(IndexMap<String, TomlValue>);

impl TomlTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        TomlTable(IndexMap::new())
    }

    /// Creates an empty table with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TomlTable(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning `true` on success.
    ///
    /// Returns `false` and leaves the table unchanged when the key is
    /// already present — duplicate keys are never silently overwritten.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tomldoc::{TomlTable, TomlValue};
    ///
    /// let mut table = TomlTable::new();
    /// assert!(table.insert("key", TomlValue::from(1)));
    /// assert!(!table.insert("key", TomlValue::from(2)));
    /// assert_eq!(table.get_integer("key"), Some(1));
    /// ```
    pub fn insert(&mut self, key: impl Into<String>, value: TomlValue) -> bool {
        let key = key.into();
        if self.0.contains_key(&key) {
            return false;
        }
        self.0.insert(key, value);
        true
    }

    /// Removes a key, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<TomlValue> {
        self.0.shift_remove(key)
    }

    /// Returns `true` if the table contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns a reference to the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TomlValue> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value for `key`, if present.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut TomlValue> {
        self.0.get_mut(key)
    }

    /// The integer under `key`. Absence and a non-integer value both read
    /// as `None`; typed getters are queries, never errors.
    #[must_use]
    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(TomlValue::as_integer)
    }

    /// The float under `key`, or `None`.
    #[must_use]
    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(TomlValue::as_float)
    }

    /// The string under `key`, or `None`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(TomlValue::as_str)
    }

    /// The boolean under `key`, or `None`.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(TomlValue::as_bool)
    }

    /// The date-time under `key`, or `None`.
    #[must_use]
    pub fn get_datetime(&self, key: &str) -> Option<&TomlDateTime> {
        self.get(key).and_then(TomlValue::as_datetime)
    }

    /// The array under `key`, or `None`.
    #[must_use]
    pub fn get_array(&self, key: &str) -> Option<&Vec<TomlValue>> {
        self.get(key).and_then(TomlValue::as_array)
    }

    /// The nested table under `key`, or `None`.
    #[must_use]
    pub fn get_table(&self, key: &str) -> Option<&TomlTable> {
        self.get(key).and_then(TomlValue::as_table)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, TomlValue> {
        self.0.keys()
    }

    /// Iterates over values in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, TomlValue> {
        self.0.values()
    }

    /// Iterates over key-value pairs in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, TomlValue> {
        self.0.iter()
    }

    /// Iterates over key-value pairs with mutable values.
    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, TomlValue> {
        self.0.iter_mut()
    }
}

impl<'a> IntoIterator for &'a TomlTable {
    type Item = (&'a String, &'a TomlValue);
    type IntoIter = indexmap::map::Iter<'a, String, TomlValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for TomlTable {
    type Item = (String, TomlValue);
    type IntoIter = indexmap::map::IntoIter<String, TomlValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, TomlValue)> for TomlTable {
    /// Collects pairs in order; on duplicate keys the first wins, matching
    /// `insert`'s reject semantics.
    fn from_iter<T: IntoIterator<Item = (String, TomlValue)>>(iter: T) -> Self {
        let mut table = TomlTable::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}

impl Serialize for TomlTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TomlTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> serde::de::Visitor<'de> for TableVisitor {
            type Value = TomlTable;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a map with string keys")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut table = TomlTable::new();
                while let Some((key, value)) = map.next_entry::<String, TomlValue>()? {
                    table.insert(key, value);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
