//! Target shapes for deserialization.
//!
//! [`TargetType`] is the closed set of shapes a caller can request.
//! [`Enumeration`] describes an enumeration target: an ordered table of
//! member names and their numeric backing values, kept in an [`IndexMap`]
//! so members are reported in declaration order.
//!
//! ## Examples
//!
//! ```rust
//! use json_scalar::{Enumeration, TargetType};
//!
//! let color = Enumeration::new("Color")
//!     .member("Red", 0)
//!     .member("Green", 1);
//!
//! let target = TargetType::Enum(color).nullable();
//! assert!(target.is_nullable());
//! assert_eq!(target.to_string(), "nullable enum Color");
//! ```

use indexmap::IndexMap;
use std::fmt;

/// The shape requested from a deserialize call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    Char,
    String,
    /// Date and time without an offset.
    DateTime,
    /// Date and time with a UTC offset.
    DateTimeOffset,
    Uuid,
    Uri,
    Enum(Enumeration),
    /// The inner shape, or [`Value::Absent`](crate::Value::Absent) for `null`.
    Nullable(Box<TargetType>),
    /// A JSON array whose elements all convert to the inner shape.
    Array(Box<TargetType>),
}

impl TargetType {
    /// Wraps this shape so `null` yields an absent value.
    ///
    /// Wrapping an already nullable shape returns it unchanged.
    #[must_use]
    pub fn nullable(self) -> Self {
        match self {
            TargetType::Nullable(_) => self,
            other => TargetType::Nullable(Box::new(other)),
        }
    }

    #[must_use]
    pub fn array_of(element: TargetType) -> Self {
        TargetType::Array(Box::new(element))
    }

    #[inline]
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, TargetType::Nullable(_))
    }

    /// Returns `true` for the fixed-width integer shapes.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            TargetType::I8
                | TargetType::I16
                | TargetType::I32
                | TargetType::I64
                | TargetType::U8
                | TargetType::U16
                | TargetType::U32
                | TargetType::U64
        )
    }

    /// Returns `true` for every shape except arrays.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        match self {
            TargetType::Array(_) => false,
            TargetType::Nullable(inner) => inner.is_scalar(),
            _ => true,
        }
    }

    /// Every non-nullable scalar shape except enumerations.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_scalar::TargetType;
    ///
    /// assert!(TargetType::primitives().iter().all(TargetType::is_scalar));
    /// ```
    #[must_use]
    pub fn primitives() -> Vec<TargetType> {
        vec![
            TargetType::Bool,
            TargetType::I8,
            TargetType::I16,
            TargetType::I32,
            TargetType::I64,
            TargetType::U8,
            TargetType::U16,
            TargetType::U32,
            TargetType::U64,
            TargetType::F32,
            TargetType::F64,
            TargetType::Decimal,
            TargetType::Char,
            TargetType::String,
            TargetType::DateTime,
            TargetType::DateTimeOffset,
            TargetType::Uuid,
            TargetType::Uri,
        ]
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Bool => write!(f, "bool"),
            TargetType::I8 => write!(f, "i8"),
            TargetType::I16 => write!(f, "i16"),
            TargetType::I32 => write!(f, "i32"),
            TargetType::I64 => write!(f, "i64"),
            TargetType::U8 => write!(f, "u8"),
            TargetType::U16 => write!(f, "u16"),
            TargetType::U32 => write!(f, "u32"),
            TargetType::U64 => write!(f, "u64"),
            TargetType::F32 => write!(f, "f32"),
            TargetType::F64 => write!(f, "f64"),
            TargetType::Decimal => write!(f, "decimal"),
            TargetType::Char => write!(f, "char"),
            TargetType::String => write!(f, "string"),
            TargetType::DateTime => write!(f, "date-time"),
            TargetType::DateTimeOffset => write!(f, "date-time-offset"),
            TargetType::Uuid => write!(f, "uuid"),
            TargetType::Uri => write!(f, "uri"),
            TargetType::Enum(e) => write!(f, "enum {}", e.name()),
            TargetType::Nullable(inner) => write!(f, "nullable {}", inner),
            TargetType::Array(inner) => write!(f, "array of {}", inner),
        }
    }
}

/// An enumeration target: member names mapped to their backing values.
///
/// Member order is declaration order.
///
/// # Examples
///
/// ```rust
/// use json_scalar::Enumeration;
///
/// let level = Enumeration::from_names("Level", &["Low", "High"]);
/// assert_eq!(level.value_of("High"), Some(1));
/// assert_eq!(level.name_of(0), Some("Low"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    name: String,
    members: IndexMap<String, i64>,
}

impl Enumeration {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Enumeration {
            name: name.to_string(),
            members: IndexMap::new(),
        }
    }

    /// Builds an enumeration whose backing values are the member indices.
    #[must_use]
    pub fn from_names(name: &str, names: &[&str]) -> Self {
        names
            .iter()
            .zip(0i64..)
            .fold(Enumeration::new(name), |e, (member, value)| e.member(member, value))
    }

    /// Adds a member. A repeated name replaces the earlier value.
    #[must_use]
    pub fn member(mut self, name: &str, value: i64) -> Self {
        self.members.insert(name.to_string(), value);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a member by exact, case-sensitive name.
    #[must_use]
    pub fn value_of(&self, member: &str) -> Option<i64> {
        self.members.get(member).copied()
    }

    /// Returns the first member declared with `value`.
    #[must_use]
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, &v)| v == value)
            .map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, i64)> {
        self.members.iter().map(|(k, &v)| (k.as_str(), v))
    }
}
