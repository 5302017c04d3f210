//! Conversion behavior through the public `deserialize_*` API.
//!
//! Each test reads through both `deserialize_str` and `deserialize_slice`
//! where the input is text, since the two must agree.

use json_scalar::{
    deserialize_slice, deserialize_str, deserialize_str_with_options, Enumeration, ErrorKind,
    ReadOptions, TargetType, Value,
};
use rust_decimal::Decimal;

const F64_MIN_TEXT: &str = "-1.7976931348623157E+308";
const F64_MAX_TEXT: &str = "1.7976931348623157E+308";
const F32_MAX_TEXT: &str = "3.4028235E+38";
const DECIMAL_MAX_TEXT: &str = "79228162514264337593543950335";

fn read(input: &str, target: &TargetType) -> json_scalar::Result<Value> {
    let text = deserialize_str(input, target);
    let bytes = deserialize_slice(input.as_bytes(), target);
    match (&text, &bytes) {
        (Ok(a), Ok(b)) => assert_eq!(a, b, "{:?} as {}", input, target),
        (Err(a), Err(b)) => assert_eq!(a.kind(), b.kind(), "{:?} as {}", input, target),
        _ => panic!("text and bytes disagree for {:?} as {}", input, target),
    }
    text
}

fn fails(input: &str, target: &TargetType) -> ErrorKind {
    match read(input, target) {
        Ok(value) => panic!("{:?} as {} unexpectedly gave {:?}", input, target, value),
        Err(err) => err.kind(),
    }
}

/// Every shape that takes its value from a number token.
fn numeric_targets() -> Vec<TargetType> {
    vec![
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
    ]
}

#[test]
fn test_read_primitives() {
    assert_eq!(read("1", &TargetType::I32).unwrap(), Value::I32(1));
    assert_eq!(read("null", &TargetType::I32.nullable()).unwrap(), Value::Absent);
    assert_eq!(
        read(&i64::MAX.to_string(), &TargetType::I64).unwrap(),
        Value::I64(i64::MAX)
    );
    assert_eq!(
        read("\"Hello\"", &TargetType::String).unwrap(),
        Value::String("Hello".to_string())
    );
    assert_eq!(read("\"\"", &TargetType::String).unwrap(), Value::String(String::new()));
}

#[test]
fn test_read_primitives_with_whitespace() {
    assert_eq!(read(" 1 ", &TargetType::I32).unwrap(), Value::I32(1));
    assert_eq!(read("2\t", &TargetType::I32).unwrap(), Value::I32(2));
    assert_eq!(read("\r\nnull", &TargetType::I32.nullable()).unwrap(), Value::Absent);
    assert_eq!(
        read(&format!("\t{}", i64::MAX), &TargetType::I64).unwrap(),
        Value::I64(i64::MAX)
    );
    assert_eq!(
        read(&format!("{} \r\n", i64::MAX), &TargetType::I64).unwrap(),
        Value::I64(i64::MAX)
    );
    assert_eq!(
        read("  \"Hello\" ", &TargetType::String).unwrap(),
        Value::String("Hello".to_string())
    );
    assert_eq!(read(" \ttrue ", &TargetType::Bool).unwrap(), Value::Bool(true));
    assert_eq!(read(" false\n", &TargetType::Bool).unwrap(), Value::Bool(false));
}

#[test]
fn test_other_whitespace_is_not_trimmed() {
    // Form feed and non-breaking space are not JSON whitespace.
    assert_eq!(fails("\u{c}1", &TargetType::I32), ErrorKind::Syntax);
    assert_eq!(fails("\"a\"\u{a0}", &TargetType::String), ErrorKind::TrailingData);
}

#[test]
fn test_read_primitives_fail() {
    assert_eq!(fails("a", &TargetType::I32), ErrorKind::Syntax);
    assert_eq!(
        fails("[1,a]", &TargetType::array_of(TargetType::I32)),
        ErrorKind::Syntax
    );
    assert_eq!(fails("null", &TargetType::I32), ErrorKind::UnexpectedTokenType);
    assert_eq!(fails("\"\"", &TargetType::I32), ErrorKind::UnexpectedTokenType);
    assert_eq!(fails("", &TargetType::I32), ErrorKind::Syntax);
    assert_eq!(fails("   ", &TargetType::String), ErrorKind::Syntax);
}

#[test]
fn test_primitives_reject_array_or_object() {
    let color = TargetType::Enum(Enumeration::from_names("Color", &["Red"]));
    for target in TargetType::primitives().into_iter().chain([color]) {
        assert_eq!(fails("[]", &target), ErrorKind::UnexpectedTokenType, "{}", target);
        assert_eq!(fails("{}", &target), ErrorKind::UnexpectedTokenType, "{}", target);
        assert_eq!(
            fails("[]", &target.clone().nullable()),
            ErrorKind::UnexpectedTokenType
        );
    }
}

#[test]
fn test_extra_bytes_fail() {
    assert_eq!(
        fails("[2] {3}", &TargetType::array_of(TargetType::I32)),
        ErrorKind::TrailingData
    );
    assert_eq!(fails("\"Hello\" 42", &TargetType::String), ErrorKind::TrailingData);
    assert_eq!(fails("truex", &TargetType::Bool), ErrorKind::TrailingData);
    assert_eq!(fails("12a", &TargetType::I32), ErrorKind::Syntax);
}

#[test]
fn test_range_fail() {
    let cases: Vec<(TargetType, String, String)> = vec![
        (TargetType::U8, "-1".into(), "256".into()),
        (TargetType::I8, "-129".into(), "128".into()),
        (TargetType::I16, "-32769".into(), "32768".into()),
        (TargetType::U16, "-1".into(), "65536".into()),
        (
            TargetType::I32,
            (i64::from(i32::MIN) - 1).to_string(),
            (i64::from(i32::MAX) + 1).to_string(),
        ),
        (
            TargetType::U32,
            "-1".into(),
            (u64::from(u32::MAX) + 1).to_string(),
        ),
        (
            TargetType::I64,
            format!("{}0", i64::MIN),
            format!("{}0", i64::MAX),
        ),
        (
            TargetType::U64,
            format!("{}0", u64::MIN),
            format!("{}0", u64::MAX),
        ),
        (
            TargetType::Decimal,
            format!("-{}0", DECIMAL_MAX_TEXT),
            format!("{}0", DECIMAL_MAX_TEXT),
        ),
    ];

    for (target, below, above) in cases {
        // "00" is a leading-zero syntax error, not an overflow.
        let below_kind = if below == "00" { ErrorKind::Syntax } else { ErrorKind::NumericOverflow };
        assert_eq!(fails(&below, &target), below_kind, "{} as {}", below, target);
        assert_eq!(fails(&above, &target), ErrorKind::NumericOverflow, "{} as {}", above, target);
        assert_eq!(fails(&above, &target.clone().nullable()), ErrorKind::NumericOverflow);
    }
}

#[test]
fn test_range_pass() {
    let cases = vec![
        (TargetType::U8, u8::MAX.to_string(), Value::U8(u8::MAX)),
        (TargetType::I8, i8::MAX.to_string(), Value::I8(i8::MAX)),
        (TargetType::I8, i8::MIN.to_string(), Value::I8(i8::MIN)),
        (TargetType::I16, i16::MAX.to_string(), Value::I16(i16::MAX)),
        (TargetType::U16, u16::MAX.to_string(), Value::U16(u16::MAX)),
        (TargetType::I32, i32::MAX.to_string(), Value::I32(i32::MAX)),
        (TargetType::I32, i32::MIN.to_string(), Value::I32(i32::MIN)),
        (TargetType::U32, u32::MAX.to_string(), Value::U32(u32::MAX)),
        (TargetType::I64, i64::MAX.to_string(), Value::I64(i64::MAX)),
        (TargetType::I64, i64::MIN.to_string(), Value::I64(i64::MIN)),
        (TargetType::U64, u64::MAX.to_string(), Value::U64(u64::MAX)),
        (
            TargetType::Decimal,
            DECIMAL_MAX_TEXT.to_string(),
            Value::Decimal(Decimal::MAX),
        ),
    ];

    for (target, text, expected) in cases {
        assert_eq!(read(&text, &target).unwrap(), expected, "{} as {}", text, target);
        assert_eq!(read(&text, &target.nullable()).unwrap(), expected);
    }
}

#[test]
fn test_integer_targets_reject_fraction_and_exponent() {
    for target in [TargetType::I32, TargetType::U64, TargetType::I8] {
        assert_eq!(fails("1.0", &target), ErrorKind::InvalidValue);
        assert_eq!(fails("1e2", &target), ErrorKind::InvalidValue);
    }
}

#[test]
fn test_float_overflow_is_infinite() {
    let f32_min = read(F64_MIN_TEXT, &TargetType::F32).unwrap();
    assert_eq!(f32_min, Value::F32(f32::NEG_INFINITY));
    let f32_max = read(F64_MAX_TEXT, &TargetType::F32.nullable()).unwrap();
    assert_eq!(f32_max, Value::F32(f32::INFINITY));

    let below = format!("{}0", F64_MIN_TEXT);
    let above = format!("{}0", F64_MAX_TEXT);
    assert_eq!(read(&below, &TargetType::F64).unwrap(), Value::F64(f64::NEG_INFINITY));
    assert_eq!(read(&above, &TargetType::F64).unwrap(), Value::F64(f64::INFINITY));
}

#[test]
fn test_float_signed_zero() {
    let bits64 = |text: &str| read(text, &TargetType::F64).unwrap().as_f64().map(f64::to_bits);
    assert_eq!(bits64("0"), Some(0));
    assert_eq!(bits64("-0"), Some(0x8000_0000_0000_0000));
    assert_eq!(bits64("-0.0"), Some(0x8000_0000_0000_0000));

    let bits32 = |text: &str| match read(text, &TargetType::F32).unwrap() {
        Value::F32(v) => v.to_bits(),
        other => panic!("expected f32, got {:?}", other),
    };
    assert_eq!(bits32("0"), 0);
    assert_eq!(bits32("-0"), 0x8000_0000);
    assert_eq!(bits32("-0.0"), 0x8000_0000);
}

#[test]
fn test_float_max_round_trips() {
    assert_eq!(read(F32_MAX_TEXT, &TargetType::F32).unwrap(), Value::F32(f32::MAX));
    assert_eq!(read(F64_MAX_TEXT, &TargetType::F64).unwrap(), Value::F64(f64::MAX));
    assert_eq!(
        read(F64_MAX_TEXT, &TargetType::F64.nullable()).unwrap(),
        Value::F64(f64::MAX)
    );
}

#[test]
fn test_unexpected_string_fails() {
    let unexpected = "\"unexpected string\"";
    let color = TargetType::Enum(Enumeration::from_names("Color", &["Red", "Green"]));

    for target in numeric_targets() {
        assert_eq!(fails(unexpected, &target), ErrorKind::UnexpectedTokenType);
        assert_eq!(fails(unexpected, &target.nullable()), ErrorKind::UnexpectedTokenType);
    }
    for target in [TargetType::DateTime, TargetType::DateTimeOffset, color] {
        assert_eq!(fails(unexpected, &target), ErrorKind::InvalidValue);
        assert_eq!(fails(unexpected, &target.nullable()), ErrorKind::InvalidValue);
    }

    assert_eq!(fails("1", &TargetType::String), ErrorKind::UnexpectedTokenType);
    assert_eq!(fails("1", &TargetType::Char), ErrorKind::UnexpectedTokenType);
    assert_eq!(fails("1", &TargetType::Char.nullable()), ErrorKind::UnexpectedTokenType);
}

#[test]
fn test_no_cross_kind_coercion() {
    assert_eq!(fails("\"true\"", &TargetType::Bool), ErrorKind::UnexpectedTokenType);
    assert_eq!(fails("1", &TargetType::Bool), ErrorKind::UnexpectedTokenType);
    assert_eq!(fails("true", &TargetType::I32), ErrorKind::UnexpectedTokenType);
    assert_eq!(fails("true", &TargetType::String), ErrorKind::UnexpectedTokenType);
    assert_eq!(fails("null", &TargetType::String), ErrorKind::UnexpectedTokenType);
    assert_eq!(fails("1", &TargetType::Uuid), ErrorKind::UnexpectedTokenType);
}

#[test]
fn test_read_uri() {
    let value = read("\"https://domain/path\"", &TargetType::Uri).unwrap();
    let uri = value.as_uri().unwrap();
    assert_eq!(uri.to_string(), "https://domain/path");
    assert!(uri.is_absolute());

    let value = read("\"https:\\u002f\\u002fdomain\\u002fpath\"", &TargetType::Uri).unwrap();
    assert_eq!(value.as_uri().unwrap().original(), "https://domain/path");

    let value = read("\"~/path\"", &TargetType::Uri).unwrap();
    assert_eq!(value.as_uri().unwrap().to_string(), "~/path");
    assert!(!value.as_uri().unwrap().is_absolute());

    let value = read("\"\"", &TargetType::Uri).unwrap();
    assert_eq!(value.as_uri().unwrap().original(), "");
}

#[test]
fn test_read_dates() {
    let value = read("\"2019-01-30T12:01:02.0000000\"", &TargetType::DateTime).unwrap();
    assert_eq!(value.to_string(), "2019-01-30T12:01:02");

    let value = read("\"2019-01-30T12:01:02+01:00\"", &TargetType::DateTime).unwrap();
    assert_eq!(value.to_string(), "2019-01-30T11:01:02");

    let value = read("\"2019-01-30T12:01:02+01:00\"", &TargetType::DateTimeOffset).unwrap();
    assert_eq!(value.to_string(), "2019-01-30T12:01:02+01:00");

    let value = read("\"2019-01-30\"", &TargetType::DateTimeOffset).unwrap();
    assert_eq!(value.to_string(), "2019-01-30T00:00:00+00:00");

    assert_eq!(fails("\"2019-02-30\"", &TargetType::DateTime), ErrorKind::InvalidValue);
    assert_eq!(fails("20190130", &TargetType::DateTime), ErrorKind::UnexpectedTokenType);
}

#[test]
fn test_read_guid() {
    let text = "\"5d2b35bd-3ff5-4b3e-b6f3-1dc4b1e2a9d4\"";
    let value = read(text, &TargetType::Uuid).unwrap();
    assert_eq!(value.to_string(), "5d2b35bd-3ff5-4b3e-b6f3-1dc4b1e2a9d4");

    let upper = read("\"5D2B35BD-3FF5-4B3E-B6F3-1DC4B1E2A9D4\"", &TargetType::Uuid).unwrap();
    assert_eq!(upper, value);

    assert_eq!(fails("\"5d2b35bd\"", &TargetType::Uuid), ErrorKind::InvalidValue);
}

#[test]
fn test_read_char() {
    assert_eq!(read("\"a\"", &TargetType::Char).unwrap(), Value::Char('a'));
    assert_eq!(read("\"\\ud83d\\ude00\"", &TargetType::Char).unwrap(), Value::Char('\u{1F600}'));
    assert_eq!(fails("\"ab\"", &TargetType::Char), ErrorKind::InvalidValue);
}

#[test]
fn test_read_decimal() {
    let value = read("-12.345", &TargetType::Decimal).unwrap();
    assert_eq!(value.as_decimal(), Some(Decimal::new(-12345, 3)));
    let value = read("1.5E2", &TargetType::Decimal).unwrap();
    assert_eq!(value.as_decimal(), Some(Decimal::new(150, 0)));
}

#[test]
fn test_enum_by_name() {
    let target = TargetType::Enum(
        Enumeration::new("Access")
            .member("Read", 1)
            .member("Write", 2),
    );

    let value = read("\"Write\"", &target).unwrap();
    let member = value.as_enum().unwrap();
    assert_eq!((member.name.as_str(), member.value), ("Write", 2));

    assert_eq!(fails("\"write\"", &target), ErrorKind::InvalidValue);
    assert_eq!(fails("2", &target), ErrorKind::UnsupportedConversion);
    assert_eq!(read("null", &target.clone().nullable()).unwrap(), Value::Absent);

    let options = ReadOptions::new().with_enum_from_number(true);
    let value = deserialize_str_with_options("2", &target, &options).unwrap();
    assert_eq!(value.as_enum().map(|m| m.name.as_str()), Some("Write"));
}

#[test]
fn test_error_positions() {
    let err = deserialize_str("\n  256", &TargetType::U8).unwrap_err();
    assert_eq!(err.position(), Some((2, 3)));

    let err = deserialize_str("[1,\n 2, x]", &TargetType::array_of(TargetType::U8)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.position(), Some((2, 5)));
}

#[test]
fn test_options_are_strict_by_default() {
    let target = TargetType::array_of(TargetType::U8);
    assert_eq!(fails("[1,]", &target), ErrorKind::Syntax);
    assert_eq!(fails("1 // one", &TargetType::U8), ErrorKind::TrailingData);

    let options = ReadOptions::new().with_comments(true).with_trailing_commas(true);
    let text = "[1, /* two */ 2,] // done";
    let value = deserialize_str_with_options(text, &target, &options).unwrap();
    assert_eq!(value, Value::Array(vec![Value::U8(1), Value::U8(2)]));
}
