//! Dynamic value representation for TOML data.
//!
//! This module provides the [`TomlValue`] enum, the node type of the
//! document tree. Every parsed TOML document is a tree of `TomlValue`s with
//! a [`TomlTable`] at the root; every node exclusively owns its children,
//! so the tree has no sharing and no representable cycles.
//!
//! ## Core Types
//!
//! - [`TomlValue`]: any TOML value (integer, float, string, boolean,
//!   date-time, array, table)
//! - [`ValueKind`]: the variant tag, for dispatch and diagnostics
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use tomldoc::{toml, TomlValue};
//!
//! // From primitives
//! let number = TomlValue::from(42);
//! let text = TomlValue::from("hello");
//!
//! // Using the toml! macro
//! let doc = toml!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! ```
//!
//! ### Type Checking and Extraction
//!
//! The `as_*` accessors are queries, not fallible operations: a mismatched
//! tag reads as `None`, never as an error.
//!
//! ```rust
//! use tomldoc::TomlValue;
//!
//! let value = TomlValue::from(42);
//! assert!(value.is_integer());
//! assert_eq!(value.as_integer(), Some(42));
//! assert_eq!(value.as_str(), None);
//! ```

use crate::{TomlDateTime, TomlTable};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed TOML value.
///
/// A closed union over the seven TOML kinds. The variant tag is fixed at
/// construction; only a leaf's payload or a container's membership can be
/// mutated afterwards.
///
/// # Examples
///
/// ```rust
/// use tomldoc::{TomlValue, ValueKind};
///
/// let value = TomlValue::from(1.5);
/// assert_eq!(value.kind(), ValueKind::Float);
/// assert_eq!(value.as_float(), Some(1.5));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum TomlValue {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    DateTime(TomlDateTime),
    Array(Vec<TomlValue>),
    Table(TomlTable),
}

/// The variant tag of a [`TomlValue`], used for dispatch and in error
/// messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Float,
    String,
    Boolean,
    DateTime,
    Array,
    Table,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Boolean => "boolean",
            ValueKind::DateTime => "date-time",
            ValueKind::Array => "array",
            ValueKind::Table => "table",
        };
        f.write_str(name)
    }
}

impl TomlValue {
    /// The variant tag of this node.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            TomlValue::Integer(_) => ValueKind::Integer,
            TomlValue::Float(_) => ValueKind::Float,
            TomlValue::String(_) => ValueKind::String,
            TomlValue::Boolean(_) => ValueKind::Boolean,
            TomlValue::DateTime(_) => ValueKind::DateTime,
            TomlValue::Array(_) => ValueKind::Array,
            TomlValue::Table(_) => ValueKind::Table,
        }
    }

    /// Returns `true` if the value is an integer.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, TomlValue::Integer(_))
    }

    /// Returns `true` if the value is a float.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, TomlValue::Float(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, TomlValue::String(_))
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(self, TomlValue::Boolean(_))
    }

    /// Returns `true` if the value is a date-time.
    #[inline]
    #[must_use]
    pub const fn is_datetime(&self) -> bool {
        matches!(self, TomlValue::DateTime(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, TomlValue::Array(_))
    }

    /// Returns `true` if the value is a table.
    #[inline]
    #[must_use]
    pub const fn is_table(&self) -> bool {
        matches!(self, TomlValue::Table(_))
    }

    /// If the value is an integer, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            TomlValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// If the value is a float, returns it. Otherwise returns `None`.
    ///
    /// Integers do not coerce: `TomlValue::Integer(1).as_float()` is `None`.
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            TomlValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TomlValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a boolean, returns it.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TomlValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a date-time, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> Option<&TomlDateTime> {
        match self {
            TomlValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<TomlValue>> {
        match self {
            TomlValue::Array(values) => Some(values),
            _ => None,
        }
    }

    /// If the value is an array, returns a mutable reference to it.
    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<TomlValue>> {
        match self {
            TomlValue::Array(values) => Some(values),
            _ => None,
        }
    }

    /// If the value is a table, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<&TomlTable> {
        match self {
            TomlValue::Table(table) => Some(table),
            _ => None,
        }
    }

    /// If the value is a table, returns a mutable reference to it.
    #[inline]
    pub fn as_table_mut(&mut self) -> Option<&mut TomlTable> {
        match self {
            TomlValue::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// Renders the value in inline TOML syntax (`{ a = 1 }`, `[1, 2]`, `"s"`).
impl fmt::Display for TomlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::ser::to_string_value(self))
    }
}

impl From<i8> for TomlValue {
    fn from(value: i8) -> Self {
        TomlValue::Integer(i64::from(value))
    }
}

impl From<i16> for TomlValue {
    fn from(value: i16) -> Self {
        TomlValue::Integer(i64::from(value))
    }
}

impl From<i32> for TomlValue {
    fn from(value: i32) -> Self {
        TomlValue::Integer(i64::from(value))
    }
}

impl From<i64> for TomlValue {
    fn from(value: i64) -> Self {
        TomlValue::Integer(value)
    }
}

impl From<u8> for TomlValue {
    fn from(value: u8) -> Self {
        TomlValue::Integer(i64::from(value))
    }
}

impl From<u16> for TomlValue {
    fn from(value: u16) -> Self {
        TomlValue::Integer(i64::from(value))
    }
}

impl From<u32> for TomlValue {
    fn from(value: u32) -> Self {
        TomlValue::Integer(i64::from(value))
    }
}

impl From<f32> for TomlValue {
    fn from(value: f32) -> Self {
        TomlValue::Float(f64::from(value))
    }
}

impl From<f64> for TomlValue {
    fn from(value: f64) -> Self {
        TomlValue::Float(value)
    }
}

impl From<bool> for TomlValue {
    fn from(value: bool) -> Self {
        TomlValue::Boolean(value)
    }
}

impl From<String> for TomlValue {
    fn from(value: String) -> Self {
        TomlValue::String(value)
    }
}

impl From<&str> for TomlValue {
    fn from(value: &str) -> Self {
        TomlValue::String(value.to_string())
    }
}

impl From<TomlDateTime> for TomlValue {
    fn from(value: TomlDateTime) -> Self {
        TomlValue::DateTime(value)
    }
}

impl From<Vec<TomlValue>> for TomlValue {
    fn from(value: Vec<TomlValue>) -> Self {
        TomlValue::Array(value)
    }
}

impl From<TomlTable> for TomlValue {
    fn from(value: TomlTable) -> Self {
        TomlValue::Table(value)
    }
}

impl Serialize for TomlValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TomlValue::Integer(n) => serializer.serialize_i64(*n),
            TomlValue::Float(n) => serializer.serialize_f64(*n),
            TomlValue::String(s) => serializer.serialize_str(s),
            TomlValue::Boolean(b) => serializer.serialize_bool(*b),
            TomlValue::DateTime(dt) => dt.serialize(serializer),
            TomlValue::Array(values) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for element in values {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            TomlValue::Table(table) => table.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for TomlValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct TomlValueVisitor;

        impl<'de> Visitor<'de> for TomlValueVisitor {
            type Value = TomlValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any TOML-representable value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(TomlValue::Boolean(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(TomlValue::Integer(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(TomlValue::Integer)
                    .map_err(|_| E::custom(format!("integer {value} does not fit in i64")))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(TomlValue::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(TomlValue::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(TomlValue::String(value))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut values = Vec::new();
                while let Some(element) = seq.next_element()? {
                    values.push(element);
                }
                Ok(TomlValue::Array(values))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut table = TomlTable::new();
                while let Some((key, value)) = map.next_entry::<String, TomlValue>()? {
                    table.insert(key, value);
                }
                Ok(TomlValue::Table(table))
            }
        }

        deserializer.deserialize_any(TomlValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(TomlValue::from(1).kind(), ValueKind::Integer);
        assert_eq!(TomlValue::from(1.0).kind(), ValueKind::Float);
        assert_eq!(TomlValue::from("x").kind(), ValueKind::String);
        assert_eq!(TomlValue::from(true).kind(), ValueKind::Boolean);
        assert_eq!(TomlValue::Array(vec![]).kind(), ValueKind::Array);
        assert_eq!(TomlValue::Table(TomlTable::new()).kind(), ValueKind::Table);
    }

    #[test]
    fn accessors_are_queries() {
        let value = TomlValue::from(42);
        assert_eq!(value.as_integer(), Some(42));
        assert_eq!(value.as_float(), None);
        assert_eq!(value.as_str(), None);
        assert!(value.as_table().is_none());
    }

    #[test]
    fn integer_and_float_stay_distinct() {
        assert_ne!(TomlValue::from(1), TomlValue::from(1.0));
    }

    #[test]
    fn from_primitives() {
        assert_eq!(TomlValue::from(42u16), TomlValue::Integer(42));
        assert_eq!(TomlValue::from(1.5f32), TomlValue::Float(1.5));
        assert_eq!(TomlValue::from("s"), TomlValue::String("s".to_string()));
        assert_eq!(TomlValue::from(false), TomlValue::Boolean(false));
    }

    #[test]
    fn mutating_containers_in_place() {
        let mut value = TomlValue::Array(vec![TomlValue::from(1)]);
        value.as_array_mut().unwrap().push(TomlValue::from(2));
        assert_eq!(value.as_array().unwrap().len(), 2);

        let mut value = TomlValue::Table(TomlTable::new());
        value
            .as_table_mut()
            .unwrap()
            .insert("k", TomlValue::from(1));
        assert_eq!(value.as_table().unwrap().get_integer("k"), Some(1));
    }

    #[test]
    fn serde_round_trip_through_json() {
        let mut table = TomlTable::new();
        table.insert("n", TomlValue::from(1));
        table.insert("items", TomlValue::Array(vec![TomlValue::from("a")]));
        let value = TomlValue::Table(table);

        let json = serde_json::to_string(&value).unwrap();
        let back: TomlValue = serde_json::from_str(&json).unwrap();
        assert_eq!(value, back);
    }
}
