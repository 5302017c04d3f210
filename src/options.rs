//! Configuration options for reading scalar JSON values.
//!
//! The defaults are strict: no comments, no trailing commas, a nesting
//! limit of 64 and name-only enumerations.
//!
//! ## Examples
//!
//! ```rust
//! use json_scalar::{deserialize_str_with_options, ReadOptions, TargetType, Value};
//!
//! let options = ReadOptions::new().with_comments(true);
//! let value = deserialize_str_with_options("/* answer */ 42", &TargetType::I32, &options)
//!     .unwrap();
//! assert_eq!(value, Value::I32(42));
//! ```

/// Default maximum nesting depth for array targets.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration options for the tokenizer and the dispatcher.
///
/// # Examples
///
/// ```rust
/// use json_scalar::ReadOptions;
///
/// // Strict defaults
/// let options = ReadOptions::new();
/// assert!(!options.allow_comments);
///
/// // Custom configuration
/// let options = ReadOptions::new()
///     .with_trailing_commas(true)
///     .with_max_depth(8)
///     .with_enum_from_number(true);
/// assert_eq!(options.max_depth, 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadOptions {
    /// Skip `//` and `/* */` comments wherever whitespace is allowed.
    pub allow_comments: bool,
    /// Accept a `,` directly before the closing `]` of an array target.
    pub allow_trailing_commas: bool,
    /// Maximum array nesting depth before the input is rejected.
    pub max_depth: usize,
    /// Accept an integral number naming an enumeration member's backing value.
    pub enum_from_number: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            allow_comments: false,
            allow_trailing_commas: false,
            max_depth: DEFAULT_MAX_DEPTH,
            enum_from_number: false,
        }
    }
}

impl ReadOptions {
    /// Creates the strict default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables comment skipping.
    ///
    /// An unterminated block comment is always a syntax error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_scalar::ReadOptions;
    ///
    /// let options = ReadOptions::new().with_comments(true);
    /// assert!(options.allow_comments);
    /// ```
    #[must_use]
    pub fn with_comments(mut self, allow: bool) -> Self {
        self.allow_comments = allow;
        self
    }

    /// Enables or disables a trailing comma before `]`.
    #[must_use]
    pub fn with_trailing_commas(mut self, allow: bool) -> Self {
        self.allow_trailing_commas = allow;
        self
    }

    /// Sets the maximum array nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Enables or disables numeric enumeration values.
    ///
    /// When disabled (the default), a number against an enumeration target
    /// fails with [`ErrorKind::UnsupportedConversion`](crate::ErrorKind::UnsupportedConversion).
    #[must_use]
    pub fn with_enum_from_number(mut self, allow: bool) -> Self {
        self.enum_from_number = allow;
        self
    }
}
