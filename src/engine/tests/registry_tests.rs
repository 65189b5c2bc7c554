//! Tests for the field parser registry and its built-ins

use chrono::{DateTime, TimeZone, Utc};

use crate::engine::registry::{ParseCellError, ParserRegistry};
use crate::schema::CellValue;

fn parse(registry: &ParserRegistry, key: &str, raw: &str) -> Result<CellValue, ParseCellError> {
    registry.get(key).expect("builtin parser missing")(raw)
}

#[test]
fn test_blank_input_yields_zero_values() {
    let registry = ParserRegistry::with_defaults();

    assert_eq!(parse(&registry, "String", "").unwrap(), CellValue::Str(String::new()));
    assert_eq!(parse(&registry, "i8", "").unwrap(), CellValue::I8(0));
    assert_eq!(parse(&registry, "i16", "").unwrap(), CellValue::I16(0));
    assert_eq!(parse(&registry, "i32", "").unwrap(), CellValue::I32(0));
    assert_eq!(parse(&registry, "i64", "").unwrap(), CellValue::I64(0));
    assert_eq!(parse(&registry, "f32", "").unwrap(), CellValue::F32(0.0));
    assert_eq!(parse(&registry, "f64", "").unwrap(), CellValue::F64(0.0));
    assert_eq!(parse(&registry, "bool", "").unwrap(), CellValue::Bool(false));
    assert_eq!(
        parse(&registry, "DateTime", "").unwrap(),
        CellValue::DateTime(DateTime::<Utc>::UNIX_EPOCH)
    );
    assert_eq!(parse(&registry, "unix_nano", "").unwrap(), CellValue::I64(0));
}

#[test]
fn test_integer_parsing() {
    let registry = ParserRegistry::with_defaults();

    assert_eq!(parse(&registry, "i32", "42").unwrap(), CellValue::I32(42));
    assert_eq!(parse(&registry, "i64", "-7").unwrap(), CellValue::I64(-7));
    assert_eq!(parse(&registry, "i8", "127").unwrap(), CellValue::I8(127));
}

#[test]
fn test_integer_truncates_decimal_input_toward_zero() {
    let registry = ParserRegistry::with_defaults();

    assert_eq!(parse(&registry, "i32", "30.7").unwrap(), CellValue::I32(30));
    assert_eq!(parse(&registry, "i32", "-3.9").unwrap(), CellValue::I32(-3));
    assert_eq!(parse(&registry, "i16", "99.99").unwrap(), CellValue::I16(99));
}

#[test]
fn test_integer_rejects_malformed_and_out_of_range() {
    let registry = ParserRegistry::with_defaults();

    assert!(parse(&registry, "i32", "abc").is_err());
    assert!(parse(&registry, "i8", "300").is_err());
    assert!(parse(&registry, "i8", "300.5").is_err());
    assert!(parse(&registry, "i16", "40000").is_err());
}

#[test]
fn test_float_rounds_to_two_fractional_digits() {
    let registry = ParserRegistry::with_defaults();

    assert_eq!(
        parse(&registry, "f64", "3.14159").unwrap(),
        CellValue::F64(3.14)
    );
    assert_eq!(parse(&registry, "f64", "2.5").unwrap(), CellValue::F64(2.5));
    assert_eq!(
        parse(&registry, "f64", "1.239").unwrap(),
        CellValue::F64(1.24)
    );
    assert_eq!(
        parse(&registry, "f32", "10.999").unwrap(),
        CellValue::F32(11.0)
    );
}

#[test]
fn test_float_normalizes_trailing_precision_identically() {
    let registry = ParserRegistry::with_defaults();

    // Inputs differing only beyond 2 fractional digits collapse together
    let a = parse(&registry, "f64", "1.230001").unwrap();
    let b = parse(&registry, "f64", "1.23").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_float_roundtrip_is_idempotent_at_two_digits() {
    let registry = ParserRegistry::with_defaults();

    for raw in ["10.12", "0.5", "-3.99", "42"] {
        let CellValue::F64(first) = parse(&registry, "f64", raw).unwrap() else {
            panic!("expected f64 cell");
        };
        let CellValue::F64(second) = parse(&registry, "f64", &format!("{first}")).unwrap() else {
            panic!("expected f64 cell");
        };
        assert_eq!(first, second, "roundtrip diverged for '{raw}'");
    }
}

#[test]
fn test_float_rejects_malformed_input() {
    let registry = ParserRegistry::with_defaults();

    assert!(parse(&registry, "f64", "12,5").is_err());
    assert!(parse(&registry, "f32", "tall").is_err());
}

#[test]
fn test_bool_tokens() {
    let registry = ParserRegistry::with_defaults();

    for raw in ["1", "t", "T", "true", "True", "TRUE"] {
        assert_eq!(parse(&registry, "bool", raw).unwrap(), CellValue::Bool(true));
    }
    for raw in ["0", "f", "F", "false", "False", "FALSE"] {
        assert_eq!(
            parse(&registry, "bool", raw).unwrap(),
            CellValue::Bool(false)
        );
    }
    assert!(parse(&registry, "bool", "yes").is_err());
}

#[test]
fn test_datetime_parses_common_layouts() {
    let registry = ParserRegistry::with_defaults();

    let expected = Utc.with_ymd_and_hms(2024, 3, 5, 10, 20, 30).unwrap();
    assert_eq!(
        parse(&registry, "DateTime", "2024-03-05 10:20:30").unwrap(),
        CellValue::DateTime(expected)
    );
    assert_eq!(
        parse(&registry, "DateTime", "2024-03-05T10:20:30Z").unwrap(),
        CellValue::DateTime(expected)
    );

    let midnight = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
    assert_eq!(
        parse(&registry, "DateTime", "2024-03-05").unwrap(),
        CellValue::DateTime(midnight)
    );
    assert!(parse(&registry, "DateTime", "not a date").is_err());
}

#[test]
fn test_unix_nano_offsets() {
    let registry = ParserRegistry::with_defaults();

    assert_eq!(
        parse(&registry, "unix_nano", "1970-01-01 00:00:01").unwrap(),
        CellValue::I64(1_000_000_000)
    );
    assert_eq!(
        parse(&registry, "unix_nano", "1969-12-31 23:59:59").unwrap(),
        CellValue::I64(-1_000_000_000)
    );
    assert!(parse(&registry, "unix_nano", "whenever").is_err());
}

#[test]
fn test_custom_registration_shadows_default() {
    let mut registry = ParserRegistry::with_defaults();
    registry.register("f64", |raw| {
        if raw.is_empty() {
            return Ok(CellValue::F64(0.0));
        }
        raw.parse::<f64>()
            .map(|v| CellValue::F64(v * 2.0))
            .map_err(|e| ParseCellError::new(e.to_string()))
    });

    assert_eq!(parse(&registry, "f64", "1.5").unwrap(), CellValue::F64(3.0));
}

#[test]
fn test_unknown_key_is_absent() {
    let registry = ParserRegistry::with_defaults();

    assert!(registry.get("myheight").is_none());
    assert!(!registry.contains("myheight"));
    assert!(registry.contains("unix_nano"));
}
