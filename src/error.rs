//! Error types for scalar deserialization.
//!
//! Every failure is reported as exactly one [`Error`], describing the first
//! cause encountered. Positional variants carry the 1-based line and column
//! of the byte that triggered the failure.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: the input is not a well-formed JSON token
//! - **Unexpected Tokens**: a valid token of the wrong kind for the target
//! - **Numeric Overflow**: a valid number outside the target's domain
//! - **Trailing Data**: content after the single consumed value
//! - **Unsupported Conversions**: the target has no conversion for the token kind
//! - **Invalid Values**: the token kind fits but its content does not parse
//!
//! Use [`Error::kind`] to branch on the category without matching payloads:
//!
//! ```rust
//! use json_scalar::{deserialize_str, ErrorKind, TargetType};
//!
//! let err = deserialize_str("256", &TargetType::U8).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::NumericOverflow);
//! assert!(err.to_string().contains("line 1, column 1"));
//! ```

use crate::target::TargetType;
use crate::token::TokenKind;
use std::fmt;
use thiserror::Error;

/// Represents every failure a deserialize call can produce.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The input does not form a well-formed JSON token.
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// A valid token whose kind the target does not accept.
    #[error("Unexpected token at line {line}, column {col}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        col: usize,
        expected: String,
        found: TokenKind,
    },

    /// A valid number outside the target's domain.
    #[error("Numeric overflow at line {line}, column {col}: {text} does not fit {target}")]
    NumericOverflow {
        line: usize,
        col: usize,
        text: String,
        target: String,
    },

    /// Non-whitespace content after the consumed value.
    #[error("Trailing data at line {line}, column {col}: expected end of input after the value")]
    TrailingData { line: usize, col: usize },

    /// The target defines no conversion for this token kind.
    #[error("Unsupported conversion at line {line}, column {col}: {found} to {target}")]
    UnsupportedConversion {
        line: usize,
        col: usize,
        found: TokenKind,
        target: String,
    },

    /// The token kind fits the target but its content does not.
    #[error("Invalid value at line {line}, column {col} for {target}: {msg}")]
    InvalidValue {
        line: usize,
        col: usize,
        target: String,
        msg: String,
    },

    /// IO error while reading the input
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

/// The category of an [`Error`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    UnexpectedTokenType,
    NumericOverflow,
    TrailingData,
    UnsupportedConversion,
    InvalidValue,
    Io,
    Custom,
}

impl Error {
    /// Creates a syntax error at the given position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_scalar::Error;
    ///
    /// let err = Error::syntax(1, 5, "unterminated string");
    /// assert!(err.to_string().contains("column 5"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates an unexpected-token error.
    pub fn unexpected_token(line: usize, col: usize, expected: &str, found: TokenKind) -> Self {
        Error::UnexpectedToken {
            line,
            col,
            expected: expected.to_string(),
            found,
        }
    }

    /// Creates a numeric overflow error for `text` against `target`.
    pub fn numeric_overflow(line: usize, col: usize, text: &str, target: &TargetType) -> Self {
        Error::NumericOverflow {
            line,
            col,
            text: text.to_string(),
            target: target.to_string(),
        }
    }

    pub fn trailing_data(line: usize, col: usize) -> Self {
        Error::TrailingData { line, col }
    }

    pub fn unsupported_conversion(
        line: usize,
        col: usize,
        found: TokenKind,
        target: &TargetType,
    ) -> Self {
        Error::UnsupportedConversion {
            line,
            col,
            found,
            target: target.to_string(),
        }
    }

    /// Creates an invalid-value error for content that does not parse as `target`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_scalar::{Error, ErrorKind, TargetType};
    ///
    /// let err = Error::invalid_value(1, 1, &TargetType::Uuid, "expected 36 characters");
    /// assert_eq!(err.kind(), ErrorKind::InvalidValue);
    /// ```
    pub fn invalid_value(line: usize, col: usize, target: &TargetType, msg: &str) -> Self {
        Error::InvalidValue {
            line,
            col,
            target: target.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::UnexpectedToken { .. } => ErrorKind::UnexpectedTokenType,
            Error::NumericOverflow { .. } => ErrorKind::NumericOverflow,
            Error::TrailingData { .. } => ErrorKind::TrailingData,
            Error::UnsupportedConversion { .. } => ErrorKind::UnsupportedConversion,
            Error::InvalidValue { .. } => ErrorKind::InvalidValue,
            Error::Io(_) => ErrorKind::Io,
            Error::Custom(_) => ErrorKind::Custom,
        }
    }

    /// Returns the 1-based `(line, column)` of the failure, if it has one.
    #[must_use]
    pub const fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Syntax { line, col, .. }
            | Error::UnexpectedToken { line, col, .. }
            | Error::NumericOverflow { line, col, .. }
            | Error::TrailingData { line, col }
            | Error::UnsupportedConversion { line, col, .. }
            | Error::InvalidValue { line, col, .. } => Some((*line, *col)),
            Error::Io(_) | Error::Custom(_) => None,
        }
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Error::syntax(1, 1, "x").kind(), ErrorKind::Syntax);
        assert_eq!(Error::trailing_data(1, 9).kind(), ErrorKind::TrailingData);
        assert_eq!(
            Error::unexpected_token(1, 1, "number", TokenKind::String).kind(),
            ErrorKind::UnexpectedTokenType
        );
        assert_eq!(
            Error::numeric_overflow(1, 1, "256", &TargetType::U8).kind(),
            ErrorKind::NumericOverflow
        );
        assert_eq!(Error::io("closed").kind(), ErrorKind::Io);
        assert_eq!(Error::custom("boom").kind(), ErrorKind::Custom);
    }

    #[test]
    fn test_display_names_target_and_token() {
        let err = Error::unsupported_conversion(2, 3, TokenKind::Number, &TargetType::I32);
        let message = err.to_string();
        assert!(message.contains("line 2, column 3"));
        assert!(message.contains("number"));
        assert!(message.contains("i32"));
    }

    #[test]
    fn test_position() {
        assert_eq!(Error::trailing_data(3, 7).position(), Some((3, 7)));
        assert_eq!(Error::custom("x").position(), None);
    }
}
