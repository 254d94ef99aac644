//! TOML serialization.
//!
//! Two layers live here. The document writer turns a [`TomlTable`] back
//! into canonical TOML text: within each table, scalar and inline entries
//! come first as `key = value` lines, then sub-tables as `[dotted.path]`
//! sections, then arrays of tables as `[[dotted.path]]` blocks. Headers
//! for tables whose members are all sub-tables are omitted, since the
//! deeper headers imply them; empty tables keep their header so they
//! survive a round trip.
//!
//! [`ValueSerializer`] is the serde half: it converts any `Serialize`
//! type into a [`TomlValue`] tree, which can then be written as text.
//! TOML has no null, so `None` and unit values are rejected rather than
//! silently dropped.

use crate::{Error, Result, TomlTable, TomlValue};
use serde::{ser, Serialize};
use std::io;

/// Serializes a table as a TOML document.
///
/// # Examples
///
/// ```
/// use tomldoc::{TomlTable, TomlValue};
///
/// let mut table = TomlTable::new();
/// table.insert("title", TomlValue::from("example"));
/// assert_eq!(tomldoc::to_string(&table), "title = \"example\"\n");
/// ```
#[must_use]
pub fn to_string(table: &TomlTable) -> String {
    let mut writer = Writer::new();
    writer.emit_table(&mut Vec::new(), table, false);
    writer.output
}

/// Serializes a single value in inline form, the way it would appear on
/// the right-hand side of `key = value`.
///
/// Tables render as inline tables here, regardless of how the document
/// writer would lay them out.
///
/// # Examples
///
/// ```
/// use tomldoc::TomlValue;
///
/// let value = TomlValue::from(vec![
///     TomlValue::from(1i64),
///     TomlValue::from(2i64),
/// ]);
/// assert_eq!(tomldoc::to_string_value(&value), "[1, 2]");
/// ```
#[must_use]
pub fn to_string_value(value: &TomlValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Serializes a table as a TOML document into an [`io::Write`].
pub fn to_writer<W: io::Write>(mut writer: W, table: &TomlTable) -> Result<()> {
    writer
        .write_all(to_string(table).as_bytes())
        .map_err(|e| Error::io(e.to_string()))
}

/// Converts any `Serialize` type into a [`TomlValue`].
///
/// # Examples
///
/// ```
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i64, y: i64 }
///
/// let value = tomldoc::to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value.as_table().unwrap().get_integer("x"), Some(1));
/// ```
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<TomlValue> {
    value.serialize(ValueSerializer)
}

struct Writer {
    output: String,
}

impl Writer {
    fn new() -> Self {
        Writer {
            output: String::with_capacity(256),
        }
    }

    /// Blank line before a header block, unless it opens the document.
    fn separate(&mut self) {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
    }

    /// Emits one table's contents. `header_written` is set for array-of-
    /// tables elements, whose `[[...]]` line the caller already wrote.
    fn emit_table(&mut self, path: &mut Vec<String>, table: &TomlTable, header_written: bool) {
        let mut entries: Vec<(&str, &TomlValue)> = Vec::new();
        let mut subtables: Vec<(&str, &TomlTable)> = Vec::new();
        let mut table_arrays: Vec<(&str, &[TomlValue])> = Vec::new();
        for (key, value) in table.iter() {
            let key = key.as_str();
            match value {
                TomlValue::Table(sub) => subtables.push((key, sub)),
                TomlValue::Array(elements)
                    if !elements.is_empty() && elements.iter().all(TomlValue::is_table) =>
                {
                    table_arrays.push((key, elements))
                }
                other => entries.push((key, other)),
            }
        }

        if !header_written && !path.is_empty() && (!entries.is_empty() || table.is_empty()) {
            self.separate();
            self.output.push('[');
            write_key_path(&mut self.output, path);
            self.output.push_str("]\n");
        }

        for (key, value) in entries {
            write_key(&mut self.output, key);
            self.output.push_str(" = ");
            write_value(&mut self.output, value);
            self.output.push('\n');
        }

        for (key, sub) in subtables {
            path.push(key.to_string());
            self.emit_table(path, sub, false);
            path.pop();
        }

        for (key, elements) in table_arrays {
            path.push(key.to_string());
            for element in elements {
                self.separate();
                self.output.push_str("[[");
                write_key_path(&mut self.output, path);
                self.output.push_str("]]\n");
                if let TomlValue::Table(sub) = element {
                    self.emit_table(path, sub, true);
                }
            }
            path.pop();
        }
    }
}

fn write_value(out: &mut String, value: &TomlValue) {
    match value {
        TomlValue::Integer(n) => out.push_str(&n.to_string()),
        TomlValue::Float(f) => write_float(out, *f),
        TomlValue::String(s) => write_quoted(out, s),
        TomlValue::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        TomlValue::DateTime(dt) => out.push_str(&dt.to_string()),
        TomlValue::Array(elements) => {
            out.push('[');
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, element);
            }
            out.push(']');
        }
        TomlValue::Table(table) => {
            if table.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{ ");
            for (i, (key, element)) in table.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_key(out, key);
                out.push_str(" = ");
                write_value(out, element);
            }
            out.push_str(" }");
        }
    }
}

/// Floats must read back as floats, so the `Debug` rendering is used: it
/// always keeps a decimal point or an exponent.
fn write_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str("nan");
    } else if f.is_infinite() {
        out.push_str(if f < 0.0 { "-inf" } else { "inf" });
    } else {
        out.push_str(&format!("{f:?}"));
    }
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

fn write_key(out: &mut String, key: &str) {
    if is_bare_key(key) {
        out.push_str(key);
    } else {
        write_quoted(out, key);
    }
}

fn write_key_path(out: &mut String, path: &[String]) {
    for (i, key) in path.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        write_key(out, key);
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{000C}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            ch if ch < '\u{20}' || ch == '\u{7F}' => {
                out.push_str(&format!("\\u{:04X}", ch as u32));
            }
            ch => out.push(ch),
        }
    }
    out.push('"');
}

/// Serde serializer whose output is a [`TomlValue`] tree.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<TomlValue>,
}

pub struct SerializeTableMap {
    table: TomlTable,
    current_key: Option<String>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = TomlValue;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeTableMap;
    type SerializeStruct = SerializeTableMap;
    type SerializeStructVariant = SerializeTableMap;

    fn serialize_bool(self, v: bool) -> Result<TomlValue> {
        Ok(TomlValue::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<TomlValue> {
        Ok(TomlValue::Integer(v as i64))
    }

    fn serialize_i16(self, v: i16) -> Result<TomlValue> {
        Ok(TomlValue::Integer(v as i64))
    }

    fn serialize_i32(self, v: i32) -> Result<TomlValue> {
        Ok(TomlValue::Integer(v as i64))
    }

    fn serialize_i64(self, v: i64) -> Result<TomlValue> {
        Ok(TomlValue::Integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<TomlValue> {
        Ok(TomlValue::Integer(v as i64))
    }

    fn serialize_u16(self, v: u16) -> Result<TomlValue> {
        Ok(TomlValue::Integer(v as i64))
    }

    fn serialize_u32(self, v: u32) -> Result<TomlValue> {
        Ok(TomlValue::Integer(v as i64))
    }

    fn serialize_u64(self, v: u64) -> Result<TomlValue> {
        i64::try_from(v)
            .map(TomlValue::Integer)
            .map_err(|_| Error::unsupported("integer out of 64-bit signed range"))
    }

    fn serialize_f32(self, v: f32) -> Result<TomlValue> {
        Ok(TomlValue::Float(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Result<TomlValue> {
        Ok(TomlValue::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<TomlValue> {
        Ok(TomlValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<TomlValue> {
        Ok(TomlValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<TomlValue> {
        let vec = v.iter().map(|&b| TomlValue::Integer(b as i64)).collect();
        Ok(TomlValue::Array(vec))
    }

    fn serialize_none(self) -> Result<TomlValue> {
        Err(Error::unsupported("TOML has no null; omit the key instead"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<TomlValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<TomlValue> {
        Err(Error::unsupported("TOML has no null; omit the key instead"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<TomlValue> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<TomlValue> {
        Ok(TomlValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<TomlValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<TomlValue>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported("newtype variants"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple(self, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeVec> {
        Err(Error::unsupported("tuple variants"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeTableMap> {
        Ok(SerializeTableMap::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeTableMap> {
        Ok(SerializeTableMap::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeTableMap> {
        Err(Error::unsupported("struct variants"))
    }
}

impl SerializeVec {
    fn new() -> Self {
        SerializeVec { vec: Vec::new() }
    }
}

impl SerializeTableMap {
    fn new() -> Self {
        SerializeTableMap {
            table: TomlTable::new(),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = TomlValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<TomlValue> {
        Ok(TomlValue::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = TomlValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<TomlValue> {
        Ok(TomlValue::Array(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = TomlValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<TomlValue> {
        Ok(TomlValue::Array(self.vec))
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = TomlValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<TomlValue> {
        Ok(TomlValue::Array(self.vec))
    }
}

impl ser::SerializeMap for SerializeTableMap {
    type Ok = TomlValue;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            TomlValue::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            _ => Err(Error::unsupported("map keys must be strings")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        if !self.table.insert(key, to_value(value)?) {
            return Err(Error::custom("duplicate map key"));
        }
        Ok(())
    }

    fn end(self) -> Result<TomlValue> {
        Ok(TomlValue::Table(self.table))
    }
}

impl ser::SerializeStruct for SerializeTableMap {
    type Ok = TomlValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if !self.table.insert(key, to_value(value)?) {
            return Err(Error::custom("duplicate struct field"));
        }
        Ok(())
    }

    fn end(self) -> Result<TomlValue> {
        Ok(TomlValue::Table(self.table))
    }
}

impl ser::SerializeStructVariant for SerializeTableMap {
    type Ok = TomlValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if !self.table.insert(key, to_value(value)?) {
            return Err(Error::custom("duplicate struct field"));
        }
        Ok(())
    }

    fn end(self) -> Result<TomlValue> {
        Ok(TomlValue::Table(self.table))
    }
}
