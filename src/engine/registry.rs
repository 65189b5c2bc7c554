//! Field parser registry
//!
//! A process-wide table of typed string→value conversions, seeded with
//! built-ins for every primitive type name and extended (or shadowed) by
//! caller registrations. The registry is immutable for the duration of a
//! mapping run.
//!
//! Universal parser policy: an empty input yields the type's zero value
//! and no error. Blankness itself is never a parse failure; required-ness
//! is enforced by the row materializer.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::layouts::parse_timestamp;
use crate::schema::CellValue;

/// A parser rejected its input
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ParseCellError {
    message: String,
}

impl ParseCellError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Conversion function from a raw cell to a typed value
pub type ParserFn = dyn Fn(&str) -> Result<CellValue, ParseCellError> + Send + Sync;

/// Registry of field parsers keyed by parser name
///
/// Default entries cover every primitive type name a [`crate::FieldSpec`]
/// can fall back to, so an undeclared parser key resolves as long as the
/// field's type is a mappable primitive.
#[derive(Clone)]
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<ParserFn>>,
}

impl ParserRegistry {
    /// Build a registry seeded with the built-in parsers
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            parsers: HashMap::new(),
        };
        registry.register("String", |raw| Ok(CellValue::Str(raw.to_string())));
        registry.register("i8", |raw| {
            parse_int(raw, i8::MIN as i64, i8::MAX as i64, CellValue::I8(0), |v| {
                CellValue::I8(v as i8)
            })
        });
        registry.register("i16", |raw| {
            parse_int(
                raw,
                i16::MIN as i64,
                i16::MAX as i64,
                CellValue::I16(0),
                |v| CellValue::I16(v as i16),
            )
        });
        registry.register("i32", |raw| {
            parse_int(
                raw,
                i32::MIN as i64,
                i32::MAX as i64,
                CellValue::I32(0),
                |v| CellValue::I32(v as i32),
            )
        });
        registry.register("i64", |raw| {
            parse_int(raw, i64::MIN, i64::MAX, CellValue::I64(0), CellValue::I64)
        });
        registry.register("f32", |raw| {
            if raw.is_empty() {
                return Ok(CellValue::F32(0.0));
            }
            parse_decimal(raw).map(|v| CellValue::F32(v as f32))
        });
        registry.register("f64", |raw| {
            if raw.is_empty() {
                return Ok(CellValue::F64(0.0));
            }
            parse_decimal(raw).map(CellValue::F64)
        });
        registry.register("bool", |raw| parse_bool(raw).map(CellValue::Bool));
        registry.register("DateTime", |raw| {
            if raw.is_empty() {
                return Ok(CellValue::DateTime(DateTime::<Utc>::UNIX_EPOCH));
            }
            parse_timestamp(raw)
                .map(CellValue::DateTime)
                .ok_or_else(|| ParseCellError::new(format!("unrecognized time format: '{raw}'")))
        });
        registry.register("unix_nano", |raw| {
            if raw.is_empty() {
                return Ok(CellValue::I64(0));
            }
            let parsed = parse_timestamp(raw)
                .ok_or_else(|| ParseCellError::new(format!("unrecognized time format: '{raw}'")))?;
            parsed
                .timestamp_nanos_opt()
                .map(CellValue::I64)
                .ok_or_else(|| {
                    ParseCellError::new(format!("'{raw}' does not fit in epoch nanoseconds"))
                })
        });
        registry
    }

    /// Register a parser under `key`, shadowing any existing entry
    pub fn register<F>(&mut self, key: impl Into<String>, parser: F)
    where
        F: Fn(&str) -> Result<CellValue, ParseCellError> + Send + Sync + 'static,
    {
        self.parsers.insert(key.into(), Arc::new(parser));
    }

    /// Look up the parser registered under `key`
    pub fn get(&self, key: &str) -> Option<&Arc<ParserFn>> {
        self.parsers.get(key)
    }

    /// Whether `key` has a registry entry
    pub fn contains(&self, key: &str) -> bool {
        self.parsers.contains_key(key)
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("ParserRegistry").field("keys", &keys).finish()
    }
}

/// Shared integer parse for the whole signed family
///
/// Input containing a decimal point is read as a decimal number and
/// truncated toward zero; anything else is base-10. Out-of-range values
/// for the target width are parse errors, not silent wraps.
fn parse_int(
    raw: &str,
    min: i64,
    max: i64,
    zero: CellValue,
    build: impl Fn(i64) -> CellValue,
) -> Result<CellValue, ParseCellError> {
    if raw.is_empty() {
        return Ok(zero);
    }
    let value = if raw.contains('.') {
        let f: f64 = raw
            .parse()
            .map_err(|e| ParseCellError::new(format!("invalid number '{raw}': {e}")))?;
        let truncated = f.trunc();
        if truncated < min as f64 || truncated > max as f64 {
            return Err(ParseCellError::new(format!("'{raw}' out of range")));
        }
        truncated as i64
    } else {
        let v: i64 = raw
            .parse()
            .map_err(|e| ParseCellError::new(format!("invalid integer '{raw}': {e}")))?;
        if v < min || v > max {
            return Err(ParseCellError::new(format!("'{raw}' out of range")));
        }
        v
    };
    Ok(build(value))
}

/// Exact-decimal float parse, normalized to 2 fractional digits
///
/// Going through `BigDecimal` keeps inputs that differ only in precision
/// beyond 2 digits normalizing to the same value, which binary float
/// arithmetic cannot guarantee.
fn parse_decimal(raw: &str) -> Result<f64, ParseCellError> {
    let decimal = BigDecimal::from_str(raw)
        .map_err(|e| ParseCellError::new(format!("invalid decimal '{raw}': {e}")))?;
    decimal
        .round(2)
        .to_f64()
        .ok_or_else(|| ParseCellError::new(format!("'{raw}' out of f64 range")))
}

/// Standard truthy/falsy token parse; blank is `false`
fn parse_bool(raw: &str) -> Result<bool, ParseCellError> {
    match raw {
        "" | "0" | "f" | "F" | "false" | "False" | "FALSE" => Ok(false),
        "1" | "t" | "T" | "true" | "True" | "TRUE" => Ok(true),
        other => Err(ParseCellError::new(format!("invalid boolean '{other}'"))),
    }
}
