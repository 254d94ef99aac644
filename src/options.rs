//! Configuration options for TOML parsing.
//!
//! ## Examples
//!
//! ```rust
//! use tomldoc::{parse_with_options, ParseOptions};
//!
//! // TOML 1.0 allows mixed-kind arrays; the strict profile rejects them.
//! let options = ParseOptions::new().with_strict_arrays(true);
//! assert!(parse_with_options("a = [1, \"two\"]", options).is_err());
//! ```

/// Caller-selectable parsing profile.
///
/// The default profile follows TOML 1.0. Options only ever tighten the
/// grammar; nothing here relaxes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Reject inline arrays whose elements differ in kind (the pre-1.0
    /// homogeneity rule).
    pub strict_arrays: bool,
}

impl ParseOptions {
    /// Creates the default (TOML 1.0) profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether inline arrays must be homogeneous in kind.
    #[must_use]
    pub fn with_strict_arrays(mut self, strict: bool) -> Self {
        self.strict_arrays = strict;
        self
    }
}
