//! Error types for TOML parsing and serialization.
//!
//! Parsing failures fall into three families, matching the stage that
//! detected them:
//!
//! - **Lexical**: a malformed literal — bad escape, unterminated string,
//!   misplaced underscore in a number, unrecognized character
//! - **Syntax**: a well-formed token in the wrong place — missing `=`,
//!   unterminated array or inline table, stray punctuation
//! - **Semantic**: grammatically valid input that violates TOML's table
//!   rules — duplicate keys, re-opened tables, extending an inline table
//!
//! All three carry the line and column (1-based) where the problem was
//! detected; semantic errors additionally carry the offending key path.
//!
//! The parser stops at the first error. There is no error recovery and no
//! multi-error accumulation.
//!
//! ## Examples
//!
//! ```rust
//! use tomldoc::{parse, Error};
//!
//! let err = parse("a = 1\na = 2").unwrap_err();
//! assert!(matches!(err, Error::Semantic { .. }));
//! assert!(err.to_string().contains("duplicate key"));
//! ```

use std::fmt;
use thiserror::Error;

/// All errors the engine can produce.
///
/// `Lexical`, `Syntax`, and `Semantic` come out of [`parse`](crate::parse);
/// `Io` comes from the reader/writer convenience helpers; `Unsupported` and
/// `Custom` back the serde integration ([`to_value`](crate::to_value)).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// Malformed literal detected by the tokenizer
    #[error("lexical error at line {line}, column {col}: {msg}")]
    Lexical {
        line: usize,
        col: usize,
        msg: String,
    },

    /// Unexpected or missing token detected by the parser
    #[error("syntax error at line {line}, column {col}: {msg}")]
    Syntax {
        line: usize,
        col: usize,
        msg: String,
    },

    /// Grammar-level rule violation (duplicate key, re-opened table, ...)
    #[error("error at line {line}, column {col}: {msg} (key `{path}`)")]
    Semantic {
        line: usize,
        col: usize,
        path: String,
        msg: String,
    },

    /// IO error from the reader/writer helpers
    #[error("IO error: {0}")]
    Io(String),

    /// A Rust value with no TOML representation was passed to `to_value`
    #[error("unsupported value: {0}")]
    Unsupported(String),

    /// Custom error raised through the serde error traits
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a lexical error at the given position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tomldoc::Error;
    ///
    /// let err = Error::lexical(3, 7, "unterminated string");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn lexical(line: usize, col: usize, msg: impl Into<String>) -> Self {
        Error::Lexical {
            line,
            col,
            msg: msg.into(),
        }
    }

    /// Creates a syntax error at the given position.
    pub fn syntax(line: usize, col: usize, msg: impl Into<String>) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.into(),
        }
    }

    /// Creates a semantic error at the given position, naming the key path
    /// whose rule was violated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tomldoc::Error;
    ///
    /// let err = Error::semantic(1, 1, "server.port", "duplicate key");
    /// assert!(err.to_string().contains("server.port"));
    /// ```
    pub fn semantic(
        line: usize,
        col: usize,
        path: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Error::Semantic {
            line,
            col,
            path: path.into(),
            msg: msg.into(),
        }
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    /// Creates an unsupported-value error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Error::Unsupported(msg.into())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// The line the error was detected on, if the error carries a position.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Lexical { line, .. }
            | Error::Syntax { line, .. }
            | Error::Semantic { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The column the error was detected at, if the error carries a position.
    #[must_use]
    pub fn column(&self) -> Option<usize> {
        match self {
            Error::Lexical { col, .. } | Error::Syntax { col, .. } | Error::Semantic { col, .. } => {
                Some(*col)
            }
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
