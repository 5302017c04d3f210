//! Serde deserialization.
//!
//! This module provides the [`Deserializer`] that reads one strict JSON value
//! into any type implementing `Deserialize`. Every scalar `deserialize_*`
//! method routes through the same converters as
//! [`deserialize_str`](crate::deserialize_str), so range checks and token
//! rules are identical on both paths.
//!
//! Types that parse their own string content, such as `uuid::Uuid` and
//! `chrono::DateTime`, apply their own `FromStr` rules to the string token.
//! To hold them to the stricter [`TargetType::Uuid`] and calendar grammar,
//! use the [`canonical_uuid`], [`date_time`] and [`date_time_offset`]
//! modules with `#[serde(with = "...")]`:
//!
//! ```rust
//! use json_scalar::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Id(#[serde(with = "json_scalar::de::canonical_uuid")] uuid::Uuid);
//!
//! assert!(from_str::<Id>(r#""0f8fad5b-d9cb-469f-a165-70867728950e""#).is_ok());
//! assert!(from_str::<Id>(r#""{0f8fad5b-d9cb-469f-a165-70867728950e}""#).is_err());
//! ```
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use json_scalar::from_str;
//!
//! let n: u16 = from_str(" 8080 ").unwrap();
//! assert_eq!(n, 8080);
//!
//! let missing: Option<u16> = from_str("null").unwrap();
//! assert_eq!(missing, None);
//!
//! assert!(from_str::<u8>("256").is_err());
//! ```
//!
//! ## Enumerations
//!
//! Unit-variant enums are read from the variant name:
//!
//! ```rust
//! use json_scalar::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! enum Level { Low, High }
//!
//! let level: Level = from_str(r#""High""#).unwrap();
//! assert_eq!(level, Level::High);
//! assert!(from_str::<Level>("1").is_err());
//! ```

use crate::convert;
use crate::number;
use crate::options::ReadOptions;
use crate::target::{Enumeration, TargetType};
use crate::token::{Token, TokenKind, Tokenizer};
use crate::{Error, Result};
use serde::de::{self, IntoDeserializer};
use std::borrow::Cow;

/// The JSON scalar deserializer.
///
/// Created via [`Deserializer::from_str`], [`Deserializer::from_slice`] or
/// [`Deserializer::with_options`]. Call [`Deserializer::end`] after the value
/// to reject trailing data.
pub struct Deserializer<'de> {
    tokenizer: Tokenizer<'de>,
    options: ReadOptions,
    depth: usize,
}

impl<'de> Deserializer<'de> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'de str) -> Self {
        Deserializer::from_slice(input.as_bytes())
    }

    pub fn from_slice(input: &'de [u8]) -> Self {
        Deserializer::with_options(input, ReadOptions::default())
    }

    pub fn with_options(input: &'de [u8], options: ReadOptions) -> Self {
        Deserializer {
            tokenizer: Tokenizer::with_options(input, &options),
            options,
            depth: 0,
        }
    }

    /// Fails with a trailing-data error unless only whitespace remains.
    pub fn end(&mut self) -> Result<()> {
        self.tokenizer.end()
    }

    fn position(&self, token: &Token<'_>) -> (usize, usize) {
        self.tokenizer.line_col(token.span.start)
    }

    fn unexpected(&self, token: &Token<'_>, expected: &str) -> Error {
        let (line, col) = self.position(token);
        Error::unexpected_token(line, col, expected, token.kind)
    }

    /// Visits the narrowest of `i64`, `u64` or `f64` that holds the number.
    ///
    /// Integers beyond 64 bits fall back to the nearest `f64`.
    fn visit_number<V>(&self, token: &Token<'de>, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = token.text();
        if !text.contains(['.', 'e', 'E']) {
            if text.starts_with('-') {
                if let Ok(n) = number::parse_integer::<i64>(text) {
                    return visitor.visit_i64(n);
                }
            } else if let Ok(n) = number::parse_integer::<u64>(text) {
                return visitor.visit_u64(n);
            }
        }
        visitor.visit_f64(convert::to_f64(&self.tokenizer, token, &TargetType::F64)?)
    }

    fn visit_array<V>(&mut self, token: Token<'de>, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if token.kind != TokenKind::StartArray {
            return Err(self.unexpected(&token, "array"));
        }
        if self.depth >= self.options.max_depth {
            let (line, col) = self.position(&token);
            return Err(Error::syntax(
                line,
                col,
                &format!("maximum nesting depth of {} exceeded", self.options.max_depth),
            ));
        }

        self.depth += 1;
        let mut access = ArrayAccess {
            de: self,
            first: true,
            done: false,
        };
        let value = visitor.visit_seq(&mut access)?;

        if !access.done && access.de.tokenizer.next_element(access.first)? {
            let offset = access.de.tokenizer.position();
            return Err(access
                .de
                .tokenizer
                .syntax_at(offset, "array has more elements than expected"));
        }
        access.de.depth -= 1;
        Ok(value)
    }
}

macro_rules! deserialize_integer {
    ($method:ident, $visit:ident, $target:expr) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            let token = self.tokenizer.next_token()?;
            let value = convert::to_integer(&self.tokenizer, &token, &$target)?;
            visitor.$visit(value)
        }
    };
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let token = self.tokenizer.next_token()?;
        match token.kind {
            TokenKind::Null => visitor.visit_unit(),
            TokenKind::True => visitor.visit_bool(true),
            TokenKind::False => visitor.visit_bool(false),
            TokenKind::Number => self.visit_number(&token, visitor),
            TokenKind::String => match token.into_text() {
                Cow::Borrowed(s) => visitor.visit_borrowed_str(s),
                Cow::Owned(s) => visitor.visit_string(s),
            },
            TokenKind::StartArray => self.visit_array(token, visitor),
            TokenKind::StartObject => Err(self.unexpected(&token, "a scalar or array")),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let token = self.tokenizer.next_token()?;
        visitor.visit_bool(convert::to_bool(&self.tokenizer, &token, &TargetType::Bool)?)
    }

    deserialize_integer!(deserialize_i8, visit_i8, TargetType::I8);
    deserialize_integer!(deserialize_i16, visit_i16, TargetType::I16);
    deserialize_integer!(deserialize_i32, visit_i32, TargetType::I32);
    deserialize_integer!(deserialize_i64, visit_i64, TargetType::I64);
    deserialize_integer!(deserialize_u8, visit_u8, TargetType::U8);
    deserialize_integer!(deserialize_u16, visit_u16, TargetType::U16);
    deserialize_integer!(deserialize_u32, visit_u32, TargetType::U32);
    deserialize_integer!(deserialize_u64, visit_u64, TargetType::U64);

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let token = self.tokenizer.next_token()?;
        visitor.visit_f32(convert::to_f32(&self.tokenizer, &token, &TargetType::F32)?)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let token = self.tokenizer.next_token()?;
        visitor.visit_f64(convert::to_f64(&self.tokenizer, &token, &TargetType::F64)?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let token = self.tokenizer.next_token()?;
        visitor.visit_char(convert::to_char(&self.tokenizer, token, &TargetType::Char)?)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let token = self.tokenizer.next_token()?;
        match convert::to_str(&self.tokenizer, token, &TargetType::String)? {
            Cow::Borrowed(s) => visitor.visit_borrowed_str(s),
            Cow::Owned(s) => visitor.visit_string(s),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.tokenizer.skip_whitespace()?;
        if self.tokenizer.peek_byte() == Some(b'n') {
            // Still validates the full literal.
            self.tokenizer.next_token()?;
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let token = self.tokenizer.next_token()?;
        if token.kind == TokenKind::Null {
            visitor.visit_unit()
        } else {
            Err(self.unexpected(&token, "null"))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let token = self.tokenizer.next_token()?;
        self.visit_array(token, visitor)
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let token = self.tokenizer.next_token()?;
        let (line, col) = self.position(&token);
        Err(Error::UnsupportedConversion {
            line,
            col,
            found: token.kind,
            target: "map".to_string(),
        })
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let token = self.tokenizer.next_token()?;
        let (line, col) = self.position(&token);
        Err(Error::UnsupportedConversion {
            line,
            col,
            found: token.kind,
            target: format!("struct {}", name),
        })
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let token = self.tokenizer.next_token()?;
        let enumeration = Enumeration::from_names(name, variants);
        let target = TargetType::Enum(enumeration.clone());
        let member =
            convert::to_enum(&self.tokenizer, token, &target, &enumeration, &self.options)?;
        visitor.visit_enum(member.name.into_deserializer())
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }
}

struct ArrayAccess<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
    first: bool,
    done: bool,
}

impl<'de> de::SeqAccess<'de> for ArrayAccess<'_, 'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if self.done {
            return Ok(None);
        }
        if !self.de.tokenizer.next_element(self.first)? {
            self.done = true;
            return Ok(None);
        }
        self.first = false;
        seed.deserialize(&mut *self.de).map(Some)
    }
}

/// Reads a UUID in the hyphenated 8-4-4-4-12 form only.
///
/// Braced, URN and undelimited forms that `uuid::Uuid` accepts on its own are
/// rejected.
pub mod canonical_uuid {
    use serde::de::{Deserialize, Deserializer, Error, Unexpected};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<uuid::Uuid, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        crate::convert::parse_uuid(&text)
            .map_err(|msg| D::Error::invalid_value(Unexpected::Str(&text), &msg))
    }
}

/// Reads a date-time without an offset using the round-trip calendar grammar.
///
/// A written offset is normalized to UTC.
pub mod date_time {
    use chrono::NaiveDateTime;
    use serde::de::{Deserialize, Deserializer, Error, Unexpected};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        crate::calendar::parse_date_time(&text)
            .map_err(|msg| D::Error::invalid_value(Unexpected::Str(&text), &msg))
    }
}

/// Reads a date-time with an offset using the round-trip calendar grammar.
///
/// A value written without an offset is UTC.
pub mod date_time_offset {
    use chrono::{DateTime, FixedOffset};
    use serde::de::{Deserialize, Deserializer, Error, Unexpected};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        crate::calendar::parse_date_time_offset(&text)
            .map_err(|msg| D::Error::invalid_value(Unexpected::Str(&text), &msg))
    }
}
