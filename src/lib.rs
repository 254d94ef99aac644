//! # tomldoc
//!
//! A TOML document model and text-format engine.
//!
//! ## Overview
//!
//! `tomldoc` parses TOML 1.0 documents into an ordered tree of
//! [`TomlValue`] nodes and serializes that tree back to canonical TOML
//! text. The document model is the center of the crate: tables remember
//! insertion order, keys are unique, and every value knows its kind.
//!
//! ## Key Features
//!
//! - **Ordered tables**: [`TomlTable`] preserves the order keys were
//!   first seen, so documents round-trip without reshuffling
//! - **Full datetime support**: all four TOML forms (offset date-time,
//!   local date-time, local date, local time) via [`TomlDateTime`]
//! - **Precise errors**: every error carries a line and column; semantic
//!   errors name the offending key path
//! - **Serde bridge**: convert any `Serialize` type into a [`TomlValue`]
//!   with [`to_value`]
//! - **No unsafe code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```rust
//! let doc = tomldoc::parse(r#"
//! title = "example"
//!
//! [server]
//! host = "localhost"
//! port = 8080
//! "#).unwrap();
//!
//! assert_eq!(doc.get_str("title"), Some("example"));
//! let server = doc.get_table("server").unwrap();
//! assert_eq!(server.get_integer("port"), Some(8080));
//! ```
//!
//! ## Serialization
//!
//! ```rust
//! use tomldoc::{TomlTable, TomlValue};
//!
//! let mut doc = TomlTable::new();
//! doc.insert("name", TomlValue::from("demo"));
//! let text = tomldoc::to_string(&doc);
//! assert_eq!(text, "name = \"demo\"\n");
//! ```
//!
//! ## Dynamic Values with the toml! Macro
//!
//! ```rust
//! use tomldoc::toml;
//!
//! let data = toml!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "toml"]
//! });
//! assert_eq!(data.as_table().unwrap().get_integer("age"), Some(30));
//! ```

pub mod datetime;
pub mod error;
pub mod lexer;
pub mod macros;
pub mod options;
pub mod parser;
pub mod ser;
pub mod table;
pub mod value;

pub use datetime::{Date, DateTimeForm, Time, TomlDateTime};
pub use error::{Error, Result};
pub use options::ParseOptions;
pub use parser::Parser;
pub use ser::{to_string, to_string_value, to_value, to_writer, ValueSerializer};
pub use table::TomlTable;
pub use value::{TomlValue, ValueKind};

use std::io;

/// Parses a TOML document with default options.
///
/// # Examples
///
/// ```rust
/// let doc = tomldoc::parse("answer = 42").unwrap();
/// assert_eq!(doc.get_integer("answer"), Some(42));
/// ```
///
/// # Errors
///
/// Returns the first error encountered: [`Error::Lexical`] for malformed
/// tokens, [`Error::Syntax`] for malformed statements, [`Error::Semantic`]
/// for violations such as duplicate keys. All carry a line and column.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(input: &str) -> Result<TomlTable> {
    parse_with_options(input, ParseOptions::default())
}

/// Parses a TOML document with explicit options.
///
/// # Examples
///
/// ```rust
/// use tomldoc::ParseOptions;
///
/// let options = ParseOptions::new().with_strict_arrays(true);
/// assert!(tomldoc::parse_with_options("a = [1, \"x\"]", options).is_err());
/// ```
///
/// # Errors
///
/// As [`parse`]; with strict arrays enabled, mixed-type arrays are
/// additionally rejected as [`Error::Semantic`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(input: &str, options: ParseOptions) -> Result<TomlTable> {
    Parser::new(input, options).parse()
}

/// Parses a TOML document from an I/O stream.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails (including non-UTF-8 input),
/// otherwise as [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R: io::Read>(mut reader: R) -> Result<TomlTable> {
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .map_err(|e| Error::io(e.to_string()))?;
    parse(&input)
}

/// Parses a TOML document from bytes.
///
/// # Errors
///
/// Returns [`Error::Io`] if the bytes are not valid UTF-8, otherwise as
/// [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(bytes: &[u8]) -> Result<TomlTable> {
    let input = std::str::from_utf8(bytes).map_err(|e| Error::io(e.to_string()))?;
    parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_reserialize() {
        let doc = parse("a = 1\nb = \"two\"\n\n[t]\nc = 3.0\n").unwrap();
        let text = to_string(&doc);
        let again = parse(&text).unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn from_slice_rejects_bad_utf8() {
        assert!(matches!(from_slice(b"a = \xff").unwrap_err(), Error::Io(_)));
    }

    #[test]
    fn from_reader_reads_everything() {
        let input = std::io::Cursor::new(b"a = 1\nb = 2\n".to_vec());
        let doc = from_reader(input).unwrap();
        assert_eq!(doc.len(), 2);
    }
}
