//! The scalar dispatcher.
//!
//! [`convert`] routes one classified token and a [`TargetType`] to the
//! matching converter. [`deserialize`] wraps it with the tokenizer and the
//! trailing-data guard to form a complete single-value read.
//!
//! ## Dispatch rules
//!
//! | target | accepted token kinds |
//! |---|---|
//! | `Bool` | `true`, `false` |
//! | integers, floats, `Decimal` | number |
//! | `String`, `Char`, `DateTime`, `DateTimeOffset`, `Uuid`, `Uri` | string |
//! | `Enum` | string naming a member (numbers only with `enum_from_number`) |
//! | `Nullable(T)` | `null`, or whatever `T` accepts |
//! | `Array(T)` | `[` followed by elements `T` accepts |
//!
//! `null`, arrays and objects are rejected for every scalar shape, and a
//! number never coerces to a string (or the reverse).

use crate::calendar::{parse_date_time, parse_date_time_offset};
use crate::number::{self, NumericError};
use crate::options::ReadOptions;
use crate::target::{Enumeration, TargetType};
use crate::token::{Token, TokenKind, Tokenizer};
use crate::value::{EnumMember, UriRef, Value};
use crate::{Error, Result};
use num_bigint::BigInt;
use std::borrow::Cow;
use tracing::{debug, trace};
use uuid::Uuid;

/// Reads exactly one value of shape `target` from `input`.
///
/// Leading and trailing whitespace is skipped; anything else after the value
/// is a [`TrailingData`](crate::ErrorKind::TrailingData) error.
pub fn deserialize(input: &[u8], target: &TargetType, options: &ReadOptions) -> Result<Value> {
    let mut tokenizer = Tokenizer::with_options(input, options);
    let result = read_single(&mut tokenizer, target, options);

    if let Err(err) = &result {
        debug!(
            target_type = %target,
            kind = ?err.kind(),
            position = ?err.position(),
            "scalar deserialization failed"
        );
    }
    result
}

fn read_single(
    tokenizer: &mut Tokenizer<'_>,
    target: &TargetType,
    options: &ReadOptions,
) -> Result<Value> {
    let token = tokenizer.next_token()?;
    let value = convert(tokenizer, token, target, options)?;
    tokenizer.end()?;
    Ok(value)
}

/// Converts `token` into a value of shape `target`.
///
/// For array shapes the tokenizer is advanced past the closing `]`.
pub fn convert<'de>(
    tokenizer: &mut Tokenizer<'de>,
    token: Token<'de>,
    target: &TargetType,
    options: &ReadOptions,
) -> Result<Value> {
    convert_at_depth(tokenizer, token, target, options, 0)
}

fn convert_at_depth<'de>(
    tokenizer: &mut Tokenizer<'de>,
    token: Token<'de>,
    target: &TargetType,
    options: &ReadOptions,
    depth: usize,
) -> Result<Value> {
    trace!(
        target_type = %target,
        kind = %token.kind,
        start = token.span.start,
        end = token.span.end,
        "converting token"
    );

    match target {
        TargetType::Nullable(inner) => {
            if token.kind == TokenKind::Null {
                Ok(Value::Absent)
            } else {
                convert_at_depth(tokenizer, token, inner, options, depth)
            }
        }
        TargetType::Array(element) => read_array(tokenizer, token, element, options, depth),
        _ if matches!(
            token.kind,
            TokenKind::Null | TokenKind::StartArray | TokenKind::StartObject
        ) =>
        {
            Err(unexpected(tokenizer, &token, target))
        }
        TargetType::Bool => to_bool(tokenizer, &token, target).map(Value::Bool),
        TargetType::I8 => to_integer(tokenizer, &token, target).map(Value::I8),
        TargetType::I16 => to_integer(tokenizer, &token, target).map(Value::I16),
        TargetType::I32 => to_integer(tokenizer, &token, target).map(Value::I32),
        TargetType::I64 => to_integer(tokenizer, &token, target).map(Value::I64),
        TargetType::U8 => to_integer(tokenizer, &token, target).map(Value::U8),
        TargetType::U16 => to_integer(tokenizer, &token, target).map(Value::U16),
        TargetType::U32 => to_integer(tokenizer, &token, target).map(Value::U32),
        TargetType::U64 => to_integer(tokenizer, &token, target).map(Value::U64),
        TargetType::F32 => to_f32(tokenizer, &token, target).map(Value::F32),
        TargetType::F64 => to_f64(tokenizer, &token, target).map(Value::F64),
        TargetType::Decimal => {
            expect_number(tokenizer, &token, target)?;
            number::parse_decimal(token.text())
                .map(Value::Decimal)
                .map_err(|e| numeric_error(tokenizer, &token, target, e))
        }
        TargetType::Char => to_char(tokenizer, token, target).map(Value::Char),
        TargetType::String => {
            to_str(tokenizer, token, target).map(|s| Value::String(s.into_owned()))
        }
        TargetType::DateTime | TargetType::DateTimeOffset => to_timestamp(tokenizer, token, target),
        TargetType::Uuid => to_uuid(tokenizer, token, target).map(Value::Uuid),
        TargetType::Uri => {
            to_str(tokenizer, token, target).map(|s| Value::Uri(UriRef::new(s.into_owned())))
        }
        TargetType::Enum(enumeration) => {
            to_enum(tokenizer, token, target, enumeration, options).map(Value::Enum)
        }
    }
}

fn read_array<'de>(
    tokenizer: &mut Tokenizer<'de>,
    token: Token<'de>,
    element: &TargetType,
    options: &ReadOptions,
    depth: usize,
) -> Result<Value> {
    if token.kind != TokenKind::StartArray {
        return Err(unexpected(tokenizer, &token, &TargetType::Array(Box::new(element.clone()))));
    }
    if depth >= options.max_depth {
        return Err(tokenizer.syntax_at(
            token.span.start,
            &format!("maximum nesting depth of {} exceeded", options.max_depth),
        ));
    }

    let mut items = Vec::new();
    let mut first = true;
    while tokenizer.next_element(first)? {
        first = false;
        let item = tokenizer.next_token()?;
        items.push(convert_at_depth(tokenizer, item, element, options, depth + 1)?);
    }
    Ok(Value::Array(items))
}

fn position(tokenizer: &Tokenizer<'_>, token: &Token<'_>) -> (usize, usize) {
    tokenizer.line_col(token.span.start)
}

/// Describes the token kinds `target` accepts, for error messages.
fn expected_kinds(target: &TargetType) -> String {
    match target {
        TargetType::Bool => "true or false".to_string(),
        TargetType::Nullable(inner) => format!("{} or null", expected_kinds(inner)),
        TargetType::Array(_) => "array".to_string(),
        t if t.is_integer() => "number".to_string(),
        TargetType::F32 | TargetType::F64 | TargetType::Decimal => "number".to_string(),
        _ => "string".to_string(),
    }
}

pub(crate) fn unexpected(
    tokenizer: &Tokenizer<'_>,
    token: &Token<'_>,
    target: &TargetType,
) -> Error {
    let (line, col) = position(tokenizer, token);
    Error::unexpected_token(line, col, &expected_kinds(target), token.kind)
}

fn invalid(tokenizer: &Tokenizer<'_>, token: &Token<'_>, target: &TargetType, msg: &str) -> Error {
    let (line, col) = position(tokenizer, token);
    Error::invalid_value(line, col, target, msg)
}

fn numeric_error(
    tokenizer: &Tokenizer<'_>,
    token: &Token<'_>,
    target: &TargetType,
    err: NumericError,
) -> Error {
    let (line, col) = position(tokenizer, token);
    match err {
        NumericError::Overflow => Error::numeric_overflow(line, col, token.text(), target),
        NumericError::NotAnInteger => Error::invalid_value(
            line,
            col,
            target,
            "expected an integer without fraction or exponent",
        ),
        NumericError::Malformed => Error::syntax(line, col, "malformed number"),
    }
}

fn expect_number(tokenizer: &Tokenizer<'_>, token: &Token<'_>, target: &TargetType) -> Result<()> {
    if token.kind == TokenKind::Number {
        Ok(())
    } else {
        Err(unexpected(tokenizer, token, target))
    }
}

pub(crate) fn to_bool(
    tokenizer: &Tokenizer<'_>,
    token: &Token<'_>,
    target: &TargetType,
) -> Result<bool> {
    match token.kind {
        TokenKind::True => Ok(true),
        TokenKind::False => Ok(false),
        _ => Err(unexpected(tokenizer, token, target)),
    }
}

pub(crate) fn to_integer<T>(
    tokenizer: &Tokenizer<'_>,
    token: &Token<'_>,
    target: &TargetType,
) -> Result<T>
where
    T: TryFrom<i64> + TryFrom<BigInt>,
{
    expect_number(tokenizer, token, target)?;
    number::parse_integer(token.text()).map_err(|e| numeric_error(tokenizer, token, target, e))
}

pub(crate) fn to_f32(
    tokenizer: &Tokenizer<'_>,
    token: &Token<'_>,
    target: &TargetType,
) -> Result<f32> {
    expect_number(tokenizer, token, target)?;
    number::parse_f32(token.text()).map_err(|e| numeric_error(tokenizer, token, target, e))
}

pub(crate) fn to_f64(
    tokenizer: &Tokenizer<'_>,
    token: &Token<'_>,
    target: &TargetType,
) -> Result<f64> {
    expect_number(tokenizer, token, target)?;
    number::parse_f64(token.text()).map_err(|e| numeric_error(tokenizer, token, target, e))
}

pub(crate) fn to_str<'de>(
    tokenizer: &Tokenizer<'de>,
    token: Token<'de>,
    target: &TargetType,
) -> Result<Cow<'de, str>> {
    if token.kind == TokenKind::String {
        Ok(token.into_text())
    } else {
        Err(unexpected(tokenizer, &token, target))
    }
}

pub(crate) fn to_char(
    tokenizer: &Tokenizer<'_>,
    token: Token<'_>,
    target: &TargetType,
) -> Result<char> {
    let (line, col) = position(tokenizer, &token);
    let text = to_str(tokenizer, token, target)?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(Error::invalid_value(
            line,
            col,
            target,
            &format!("expected exactly one character, found {}", text.chars().count()),
        )),
    }
}

fn to_timestamp(tokenizer: &Tokenizer<'_>, token: Token<'_>, target: &TargetType) -> Result<Value> {
    if token.kind != TokenKind::String {
        return Err(unexpected(tokenizer, &token, target));
    }

    let value = if *target == TargetType::DateTime {
        parse_date_time(token.text()).map(Value::DateTime)
    } else {
        parse_date_time_offset(token.text()).map(Value::DateTimeOffset)
    };
    value.map_err(|msg| invalid(tokenizer, &token, target, msg))
}

fn to_uuid(tokenizer: &Tokenizer<'_>, token: Token<'_>, target: &TargetType) -> Result<Uuid> {
    if token.kind != TokenKind::String {
        return Err(unexpected(tokenizer, &token, target));
    }
    parse_uuid(token.text()).map_err(|msg| invalid(tokenizer, &token, target, msg))
}

/// Parses the hyphenated 8-4-4-4-12 form, the only one accepted.
pub(crate) fn parse_uuid(text: &str) -> std::result::Result<Uuid, &'static str> {
    let canonical = text.len() == 36
        && text.bytes().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => b == b'-',
            _ => b.is_ascii_hexdigit(),
        });
    if !canonical {
        return Err("expected the 8-4-4-4-12 hexadecimal form");
    }
    Uuid::parse_str(text).map_err(|_| "expected the 8-4-4-4-12 hexadecimal form")
}

pub(crate) fn to_enum(
    tokenizer: &Tokenizer<'_>,
    token: Token<'_>,
    target: &TargetType,
    enumeration: &Enumeration,
    options: &ReadOptions,
) -> Result<EnumMember> {
    match token.kind {
        TokenKind::String => {
            let name = token.text();
            enumeration
                .value_of(name)
                .map(|value| EnumMember {
                    name: name.to_string(),
                    value,
                })
                .ok_or_else(|| {
                    invalid(
                        tokenizer,
                        &token,
                        target,
                        &format!("unknown member '{}'", name),
                    )
                })
        }
        TokenKind::Number if options.enum_from_number => {
            let value: i64 = to_integer(tokenizer, &token, target)?;
            enumeration
                .name_of(value)
                .map(|name| EnumMember {
                    name: name.to_string(),
                    value,
                })
                .ok_or_else(|| {
                    invalid(
                        tokenizer,
                        &token,
                        target,
                        &format!("no member has the value {}", value),
                    )
                })
        }
        TokenKind::Number => {
            let (line, col) = position(tokenizer, &token);
            Err(Error::unsupported_conversion(line, col, token.kind, target))
        }
        _ => Err(unexpected(tokenizer, &token, target)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn read(input: &str, target: &TargetType) -> Result<Value> {
        deserialize(input.as_bytes(), target, &ReadOptions::default())
    }

    #[test]
    fn test_scalar_rejects_compound_and_null() {
        for target in TargetType::primitives() {
            for input in ["[]", "{}", "null"] {
                let err = read(input, &target).unwrap_err();
                assert_eq!(err.kind(), ErrorKind::UnexpectedTokenType, "{} as {}", input, target);
            }
        }
    }

    #[test]
    fn test_nullable_absent() {
        assert_eq!(read("null", &TargetType::U8.nullable()).unwrap(), Value::Absent);
        assert_eq!(read("7", &TargetType::U8.nullable()).unwrap(), Value::U8(7));
        assert_eq!(
            read("256", &TargetType::U8.nullable()).unwrap_err().kind(),
            ErrorKind::NumericOverflow
        );
    }

    #[test]
    fn test_char_length() {
        assert_eq!(read("\"x\"", &TargetType::Char).unwrap(), Value::Char('x'));
        assert_eq!(read("\"\\u00e9\"", &TargetType::Char).unwrap(), Value::Char('é'));
        assert_eq!(read("\"\"", &TargetType::Char).unwrap_err().kind(), ErrorKind::InvalidValue);
        assert_eq!(read("\"xy\"", &TargetType::Char).unwrap_err().kind(), ErrorKind::InvalidValue);
        assert_eq!(
            read("1", &TargetType::Char).unwrap_err().kind(),
            ErrorKind::UnexpectedTokenType
        );
    }

    #[test]
    fn test_uuid_forms() {
        let value = read("\"0f8fad5b-d9cb-469f-a165-70867728950e\"", &TargetType::Uuid).unwrap();
        assert_eq!(value.to_string(), "0f8fad5b-d9cb-469f-a165-70867728950e");

        for bad in [
            "\"0f8fad5bd9cb469fa16570867728950e\"",
            "\"{0f8fad5b-d9cb-469f-a165-70867728950e}\"",
            "\"0f8fad5b-d9cb-469f-a165-70867728950g\"",
        ] {
            assert_eq!(read(bad, &TargetType::Uuid).unwrap_err().kind(), ErrorKind::InvalidValue);
        }
    }

    #[test]
    fn test_enum_by_name_only() {
        let target = TargetType::Enum(Enumeration::from_names("Color", &["Red", "Green"]));
        let value = read("\"Green\"", &target).unwrap();
        assert_eq!(value.as_enum().map(|m| m.value), Some(1));

        assert_eq!(read("\"green\"", &target).unwrap_err().kind(), ErrorKind::InvalidValue);
        assert_eq!(read("1", &target).unwrap_err().kind(), ErrorKind::UnsupportedConversion);
        assert_eq!(read("true", &target).unwrap_err().kind(), ErrorKind::UnexpectedTokenType);
    }

    #[test]
    fn test_enum_from_number_opt_in() {
        let target = TargetType::Enum(Enumeration::from_names("Color", &["Red", "Green"]));
        let options = ReadOptions::new().with_enum_from_number(true);
        let value = deserialize(b"1", &target, &options).unwrap();
        assert_eq!(value.as_enum().map(|m| m.name.as_str()), Some("Green"));

        let err = deserialize(b"5", &target, &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_array_depth_limit() {
        let nested = TargetType::array_of(TargetType::array_of(TargetType::I32));
        assert!(read("[[1],[2,3]]", &nested).is_ok());

        let options = ReadOptions::new().with_max_depth(1);
        let err = deserialize(b"[[1]]", &nested, &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_array_element_errors() {
        let target = TargetType::array_of(TargetType::U8);
        assert_eq!(read("[1,256]", &target).unwrap_err().kind(), ErrorKind::NumericOverflow);
        assert_eq!(read("[1,null]", &target).unwrap_err().kind(), ErrorKind::UnexpectedTokenType);
        assert_eq!(read("[1 2]", &target).unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(read("[1", &target).unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(read("1", &target).unwrap_err().kind(), ErrorKind::UnexpectedTokenType);

        let nullable_items = TargetType::array_of(TargetType::U8.nullable());
        assert_eq!(
            read("[null, 3]", &nullable_items).unwrap(),
            Value::Array(vec![Value::Absent, Value::U8(3)])
        );
    }

    #[test]
    fn test_integer_rejects_fraction() {
        assert_eq!(read("1.5", &TargetType::I32).unwrap_err().kind(), ErrorKind::InvalidValue);
        assert_eq!(read("1.5", &TargetType::Decimal).unwrap().to_string(), "1.5");
    }
}
