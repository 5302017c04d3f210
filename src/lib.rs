//! # json_scalar
//!
//! Strict deserialization of a single JSON value into a caller-chosen scalar
//! shape.
//!
//! ## What does it do?
//!
//! Given an input buffer and a [`TargetType`], the crate reads exactly one
//! JSON value and returns it as a [`Value`] of that shape, or fails with one
//! [`Error`]. The rules are deliberately strict:
//!
//! - **Exact token kinds**: a number never coerces to a string and a string
//!   never coerces to a number. `null` is only accepted by nullable shapes
//! - **Lossless ranges**: an integer outside its target's domain is a
//!   [`NumericOverflow`](ErrorKind::NumericOverflow), never wrapped or clamped
//! - **Correct floats**: `f32` and `f64` are rounded directly from the text;
//!   magnitudes beyond the range become signed infinity
//! - **One value only**: non-whitespace content after the value is
//!   [`TrailingData`](ErrorKind::TrailingData)
//!
//! ## Quick Start
//!
//! ```rust
//! use json_scalar::{deserialize_str, ErrorKind, TargetType, Value};
//!
//! assert_eq!(deserialize_str(" 255 ", &TargetType::U8).unwrap(), Value::U8(255));
//!
//! let err = deserialize_str("256", &TargetType::U8).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::NumericOverflow);
//!
//! let err = deserialize_str(r#""1""#, &TargetType::I32).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::UnexpectedTokenType);
//!
//! let absent = deserialize_str("null", &TargetType::I32.nullable()).unwrap();
//! assert!(absent.is_absent());
//! ```
//!
//! ### Serde
//!
//! The same rules back a serde [`Deserializer`], so plain Rust types work too:
//!
//! ```rust
//! use json_scalar::from_str;
//!
//! let ports: Vec<u16> = from_str("[80, 443]").unwrap();
//! assert_eq!(ports, vec![80, 443]);
//!
//! assert!(from_str::<Vec<u16>>("[80, 65536]").is_err());
//! ```
//!
//! Fields holding UUIDs or dates can opt in to the strict string grammar with
//! the helper modules in [`de`].
//!
//! ## Text and Bytes
//!
//! `&str` and `&[u8]` inputs produce identical results. Byte input is
//! validated as UTF-8 inside string tokens only.
//!
//! ```rust
//! use json_scalar::{deserialize_slice, deserialize_str, TargetType};
//!
//! let target = TargetType::F64;
//! assert_eq!(
//!     deserialize_str("1.5e3", &target).unwrap(),
//!     deserialize_slice(b"1.5e3", &target).unwrap()
//! );
//! ```
//!
//! ## Logging
//!
//! Conversions emit `tracing` events: one `TRACE` event per converted token
//! and one `DEBUG` event when a call fails. No subscriber is installed by
//! this crate.

pub mod calendar;
pub mod convert;
pub mod de;
pub mod error;
pub mod number;
pub mod options;
pub mod target;
pub mod token;
pub mod value;

pub use de::Deserializer;
pub use error::{Error, ErrorKind, Result};
pub use options::ReadOptions;
pub use target::{Enumeration, TargetType};
pub use value::{EnumMember, UriRef, Value};

use serde::de::{Deserialize, DeserializeOwned};
use std::io;
use tracing::debug;

/// Reads one value of shape `target` from JSON text.
///
/// # Examples
///
/// ```rust
/// use json_scalar::{deserialize_str, TargetType, Value};
///
/// let value = deserialize_str("\t-0.0\n", &TargetType::F64).unwrap();
/// assert!(value.as_f64().unwrap().is_sign_negative());
/// ```
///
/// # Errors
///
/// Returns an error if the input is not a single well-formed JSON value, the
/// token kind does not fit `target`, or the value lies outside its domain.
/// Positional errors carry line and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn deserialize_str(input: &str, target: &TargetType) -> Result<Value> {
    deserialize_str_with_options(input, target, &ReadOptions::default())
}

/// Reads one value of shape `target` from UTF-8 bytes.
///
/// # Examples
///
/// ```rust
/// use json_scalar::{deserialize_slice, TargetType, Value};
///
/// let target = TargetType::array_of(TargetType::I8.nullable());
/// let value = deserialize_slice(b"[1, null]", &target).unwrap();
/// assert_eq!(value, Value::Array(vec![Value::I8(1), Value::Absent]));
/// ```
///
/// # Errors
///
/// Same as [`deserialize_str`]; invalid UTF-8 inside a string token is a
/// syntax error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn deserialize_slice(input: &[u8], target: &TargetType) -> Result<Value> {
    deserialize_slice_with_options(input, target, &ReadOptions::default())
}

/// Reads one value of shape `target` from JSON text with custom options.
///
/// # Examples
///
/// ```rust
/// use json_scalar::{deserialize_str_with_options, ReadOptions, TargetType};
///
/// let options = ReadOptions::new().with_trailing_commas(true);
/// let target = TargetType::array_of(TargetType::U8);
/// assert!(deserialize_str_with_options("[1, 2,]", &target, &options).is_ok());
/// ```
///
/// # Errors
///
/// Same as [`deserialize_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn deserialize_str_with_options(
    input: &str,
    target: &TargetType,
    options: &ReadOptions,
) -> Result<Value> {
    convert::deserialize(input.as_bytes(), target, options)
}

/// Reads one value of shape `target` from UTF-8 bytes with custom options.
///
/// # Errors
///
/// Same as [`deserialize_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn deserialize_slice_with_options(
    input: &[u8],
    target: &TargetType,
    options: &ReadOptions,
) -> Result<Value> {
    convert::deserialize(input, target, options)
}

/// Deserialize an instance of type `T` from a string of JSON text.
///
/// # Examples
///
/// ```rust
/// use json_scalar::from_str;
///
/// let flag: bool = from_str("true").unwrap();
/// assert!(flag);
///
/// let name: &str = from_str(r#""borrowed""#).unwrap();
/// assert_eq!(name, "borrowed");
/// ```
///
/// # Errors
///
/// Returns an error if the input is not a single JSON value that fits `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<'a, T>(s: &'a str) -> Result<T>
where
    T: Deserialize<'a>,
{
    from_trait(Deserializer::from_str(s))
}

/// Deserialize an instance of type `T` from bytes of JSON text.
///
/// # Examples
///
/// ```rust
/// use json_scalar::from_slice;
///
/// let levels: Vec<Option<u8>> = from_slice(b"[1, null, 3]").unwrap();
/// assert_eq!(levels, vec![Some(1), None, Some(3)]);
/// ```
///
/// # Errors
///
/// Same as [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<'a, T>(v: &'a [u8]) -> Result<T>
where
    T: Deserialize<'a>,
{
    from_trait(Deserializer::from_slice(v))
}

/// Deserialize an instance of type `T` from an I/O stream of JSON.
///
/// # Examples
///
/// ```rust
/// use json_scalar::from_reader;
/// use std::io::Cursor;
///
/// let n: i64 = from_reader(Cursor::new(b"-9223372036854775808")).unwrap();
/// assert_eq!(n, i64::MIN);
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, or for any reason
/// [`from_slice`] would.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&buffer)
}

fn from_trait<'de, T>(mut de: Deserializer<'de>) -> Result<T>
where
    T: Deserialize<'de>,
{
    let result = T::deserialize(&mut de).and_then(|value| de.end().map(|()| value));
    if let Err(err) = &result {
        debug!(
            type_name = std::any::type_name::<T>(),
            kind = ?err.kind(),
            position = ?err.position(),
            "deserialization failed"
        );
    }
    result
}
