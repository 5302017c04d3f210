//! Values produced by a deserialize call.
//!
//! [`Value`] has one variant per [`TargetType`](crate::TargetType) shape
//! plus [`Value::Absent`] for a `null` read into a nullable shape.
//!
//! ## Extracting Values
//!
//! ```rust
//! use json_scalar::{deserialize_str, TargetType, Value};
//!
//! let value = deserialize_str("42", &TargetType::I16).unwrap();
//! assert_eq!(value.as_i64(), Some(42));
//!
//! let n: i16 = i16::try_from(value).unwrap();
//! assert_eq!(n, 42);
//! ```
//!
//! ## URI references
//!
//! ```rust
//! use json_scalar::{deserialize_str, TargetType};
//!
//! let value = deserialize_str(r#""~/path""#, &TargetType::Uri).unwrap();
//! let uri = value.as_uri().unwrap();
//! assert_eq!(uri.original(), "~/path");
//! assert!(uri.absolute().is_none());
//! ```

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;
use uuid::Uuid;

/// A converted value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// `null` read into a nullable shape.
    #[default]
    Absent,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Char(char),
    String(String),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
    Uuid(Uuid),
    Uri(UriRef),
    Enum(EnumMember),
    Array(Vec<Value>),
}

/// A URI reference that keeps its original text.
///
/// Relative references and the empty string are valid; [`UriRef::absolute`]
/// is only set when the text parses as an absolute URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UriRef {
    original: String,
    absolute: Option<Url>,
}

impl UriRef {
    #[must_use]
    pub fn new(original: String) -> Self {
        let absolute = Url::parse(&original).ok();
        UriRef { original, absolute }
    }

    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    #[must_use]
    pub fn absolute(&self) -> Option<&Url> {
        self.absolute.as_ref()
    }

    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.absolute.is_some()
    }
}

impl fmt::Display for UriRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// An enumeration member resolved from its name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

impl Value {
    /// Returns `true` for a `null` read into a nullable shape.
    #[inline]
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns any signed or unsigned integer that fits in an `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I8(v) => Some(i64::from(v)),
            Value::I16(v) => Some(i64::from(v)),
            Value::I32(v) => Some(i64::from(v)),
            Value::I64(v) => Some(v),
            Value::U8(v) => Some(i64::from(v)),
            Value::U16(v) => Some(i64::from(v)),
            Value::U32(v) => Some(i64::from(v)),
            Value::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Returns any unsigned integer, or a non-negative signed one.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::U8(v) => Some(u64::from(v)),
            Value::U16(v) => Some(u64::from(v)),
            Value::U32(v) => Some(u64::from(v)),
            Value::U64(v) => Some(v),
            _ => self.as_i64().and_then(|v| u64::try_from(v).ok()),
        }
    }

    /// Returns an `f64` for either floating-point variant.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F32(v) => Some(f64::from(v)),
            Value::F64(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_uri(&self) -> Option<&UriRef> {
        match self {
            Value::Uri(u) => Some(u),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_enum(&self) -> Option<&EnumMember> {
        match self {
            Value::Enum(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Char(c) => write!(f, "{}", c),
            Value::String(s) => write!(f, "{}", s),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Value::DateTimeOffset(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::Uuid(u) => write!(f, "{}", u.hyphenated()),
            Value::Uri(u) => write!(f, "{}", u),
            Value::Enum(m) => write!(f, "{}", m.name),
            Value::Array(items) => {
                write!(
                    f,
                    "[{}]",
                    items
                        .iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Absent => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::I8(v) => serializer.serialize_i8(*v),
            Value::I16(v) => serializer.serialize_i16(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::U8(v) => serializer.serialize_u8(*v),
            Value::U16(v) => serializer.serialize_u16(*v),
            Value::U32(v) => serializer.serialize_u32(*v),
            Value::U64(v) => serializer.serialize_u64(*v),
            Value::F32(v) => serializer.serialize_f32(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Decimal(d) => Serialize::serialize(d, serializer),
            Value::Char(c) => serializer.serialize_char(*c),
            Value::String(s) => serializer.serialize_str(s),
            Value::DateTime(dt) => dt.serialize(serializer),
            Value::DateTimeOffset(dt) => dt.serialize(serializer),
            Value::Uuid(u) => u.serialize(serializer),
            Value::Uri(u) => serializer.serialize_str(u.original()),
            Value::Enum(m) => serializer.serialize_str(&m.name),
            Value::Array(items) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

macro_rules! impl_try_from_value {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = crate::Error;

                fn try_from(value: Value) -> crate::Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(crate::Error::custom(format!(
                            "expected {}, found {:?}",
                            stringify!($ty),
                            other
                        ))),
                    }
                }
            }
        )*
    };
}

impl_try_from_value! {
    Bool => bool,
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    F32 => f32,
    F64 => f64,
    Decimal => Decimal,
    Char => char,
    String => String,
    DateTime => NaiveDateTime,
    DateTimeOffset => DateTime<FixedOffset>,
    Uuid => Uuid,
    Uri => UriRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tryfrom_matching_variant() {
        assert_eq!(i32::try_from(Value::I32(7)).unwrap(), 7);
        assert_eq!(String::try_from(Value::String("hi".into())).unwrap(), "hi");
        assert!(bool::try_from(Value::I32(1)).is_err());
        assert!(i64::try_from(Value::I32(1)).is_err());
    }

    #[test]
    fn test_integer_accessors_widen() {
        assert_eq!(Value::U8(200).as_i64(), Some(200));
        assert_eq!(Value::I8(-1).as_u64(), None);
        assert_eq!(Value::U64(u64::MAX).as_i64(), None);
        assert_eq!(Value::U64(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(Value::F32(1.5).as_f64(), Some(1.5));
    }

    #[test]
    fn test_uri_ref() {
        let empty = UriRef::new(String::new());
        assert_eq!(empty.original(), "");
        assert!(!empty.is_absolute());

        let absolute = UriRef::new("https://domain/path".to_string());
        assert_eq!(absolute.original(), "https://domain/path");
        assert_eq!(absolute.absolute().map(Url::host_str), Some(Some("domain")));
    }

    #[test]
    fn test_display_and_serialize() {
        let value = Value::Array(vec![Value::I32(1), Value::Absent, Value::Bool(true)]);
        assert_eq!(value.to_string(), "[1,null,true]");
        assert_eq!(serde_json::to_string(&value).unwrap(), "[1,null,true]");
        assert!(Value::default().is_absent());
    }

    #[test]
    fn test_serialize_decimal_as_string() {
        let value = Value::Decimal(Decimal::new(150, 2));
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"1.50\"");

        let items = Value::Array(vec![Value::Decimal(Decimal::MAX), Value::Absent]);
        assert_eq!(
            serde_json::to_string(&items).unwrap(),
            "[\"79228162514264337593543950335\",null]"
        );
    }
}
