use crate::{
    config::{BinderConfig, TimeFormat},
    errors::ParseError,
    shape::DeclaredType,
    value::Value,
};
use chrono::{
    format::ParseErrorKind, DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime,
    ParseResult,
};
use std::fmt;

/// Storage width of an integer field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    /// `isize` / `usize`
    Pointer,
}

impl IntWidth {
    fn signed_range(self) -> (i64, i64) {
        match self {
            IntWidth::W8 => (i8::MIN.into(), i8::MAX.into()),
            IntWidth::W16 => (i16::MIN.into(), i16::MAX.into()),
            IntWidth::W32 => (i32::MIN.into(), i32::MAX.into()),
            IntWidth::W64 => (i64::MIN, i64::MAX),
            IntWidth::Pointer => (
                i64::try_from(isize::MIN).unwrap_or(i64::MIN),
                i64::try_from(isize::MAX).unwrap_or(i64::MAX),
            ),
        }
    }

    fn unsigned_max(self) -> u64 {
        match self {
            IntWidth::W8 => u8::MAX.into(),
            IntWidth::W16 => u16::MAX.into(),
            IntWidth::W32 => u32::MAX.into(),
            IntWidth::W64 => u64::MAX,
            IntWidth::Pointer => u64::try_from(usize::MAX).unwrap_or(u64::MAX),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    F32,
    F64,
}

/// Semantic type of a bound field, selecting its coercion routine.
///
/// `Optional` wraps exactly one non-optional kind; [`Kind::resolve`] never
/// produces anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    String,
    Bool,
    Int(IntWidth),
    Uint(IntWidth),
    Float(FloatWidth),
    Time,
    Optional(Box<Kind>),
}

impl Kind {
    /// Map a declared type onto a supported kind, unwrapping at most one
    /// level of `Optional`. Returns `None` for anything unsupported.
    pub fn resolve(declared: &DeclaredType) -> Option<Kind> {
        match declared {
            DeclaredType::Optional(inner) => {
                Self::resolve_scalar(inner).map(|kind| Kind::Optional(Box::new(kind)))
            }
            other => Self::resolve_scalar(other),
        }
    }

    fn resolve_scalar(declared: &DeclaredType) -> Option<Kind> {
        let kind = match declared {
            DeclaredType::Bool => Kind::Bool,
            DeclaredType::String => Kind::String,
            DeclaredType::I8 => Kind::Int(IntWidth::W8),
            DeclaredType::I16 => Kind::Int(IntWidth::W16),
            DeclaredType::I32 => Kind::Int(IntWidth::W32),
            DeclaredType::I64 => Kind::Int(IntWidth::W64),
            DeclaredType::Isize => Kind::Int(IntWidth::Pointer),
            DeclaredType::U8 => Kind::Uint(IntWidth::W8),
            DeclaredType::U16 => Kind::Uint(IntWidth::W16),
            DeclaredType::U32 => Kind::Uint(IntWidth::W32),
            DeclaredType::U64 => Kind::Uint(IntWidth::W64),
            DeclaredType::Usize => Kind::Uint(IntWidth::Pointer),
            DeclaredType::F32 => Kind::Float(FloatWidth::F32),
            DeclaredType::F64 => Kind::Float(FloatWidth::F64),
            DeclaredType::Time => Kind::Time,
            DeclaredType::Optional(_)
            | DeclaredType::List(_)
            | DeclaredType::Map { .. }
            | DeclaredType::Record(_) => return None,
        };
        Some(kind)
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Kind::Optional(_))
    }

    /// Convert a cell's text into a value of this kind.
    ///
    /// Optional kinds coerce through their inner kind; skipping empty
    /// optional cells is the binder's job, not this function's.
    pub fn coerce(&self, cell: &str, config: &BinderConfig) -> Result<Value, ParseError> {
        match self {
            Kind::String => Ok(Value::String(cell.to_string())),
            Kind::Bool => parse_bool(cell).map(Value::Bool),
            Kind::Int(width) => {
                let value: i64 = cell.parse().map_err(|source| ParseError::Int {
                    value: cell.to_string(),
                    source,
                })?;
                let (min, max) = width.signed_range();
                if value < min || value > max {
                    return Err(self.out_of_range(cell));
                }
                Ok(Value::Int(value))
            }
            Kind::Uint(width) => {
                if cell.starts_with('+') {
                    return Err(self.malformed(cell, "sign not allowed"));
                }
                let value: u64 = cell.parse().map_err(|source| ParseError::Int {
                    value: cell.to_string(),
                    source,
                })?;
                if value > width.unsigned_max() {
                    return Err(self.out_of_range(cell));
                }
                Ok(Value::Uint(value))
            }
            Kind::Float(_) => cell
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|source| ParseError::Float {
                    value: cell.to_string(),
                    source,
                }),
            Kind::Time => {
                let time = parse_time(cell, &config.time_format)?;
                if config.time_format == TimeFormat::Rfc3339
                    && cell.as_bytes().get(10) != Some(&b'T')
                {
                    return Err(self.malformed(cell, "date and time must be separated by 'T'"));
                }
                Ok(Value::Time(time))
            }
            Kind::Optional(inner) => inner.coerce(cell, config),
        }
    }

    fn malformed(&self, cell: &str, reason: &'static str) -> ParseError {
        ParseError::Malformed {
            value: cell.to_string(),
            kind: self.to_string(),
            reason,
        }
    }

    fn out_of_range(&self, cell: &str) -> ParseError {
        ParseError::OutOfRange {
            value: cell.to_string(),
            kind: self.to_string(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::String => f.write_str("string"),
            Kind::Bool => f.write_str("bool"),
            Kind::Int(IntWidth::W8) => f.write_str("i8"),
            Kind::Int(IntWidth::W16) => f.write_str("i16"),
            Kind::Int(IntWidth::W32) => f.write_str("i32"),
            Kind::Int(IntWidth::W64) => f.write_str("i64"),
            Kind::Int(IntWidth::Pointer) => f.write_str("isize"),
            Kind::Uint(IntWidth::W8) => f.write_str("u8"),
            Kind::Uint(IntWidth::W16) => f.write_str("u16"),
            Kind::Uint(IntWidth::W32) => f.write_str("u32"),
            Kind::Uint(IntWidth::W64) => f.write_str("u64"),
            Kind::Uint(IntWidth::Pointer) => f.write_str("usize"),
            Kind::Float(FloatWidth::F32) => f.write_str("f32"),
            Kind::Float(FloatWidth::F64) => f.write_str("f64"),
            Kind::Time => f.write_str("time"),
            Kind::Optional(inner) => write!(f, "optional {inner}"),
        }
    }
}

fn parse_bool(cell: &str) -> Result<bool, ParseError> {
    match cell {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ParseError::Bool(cell.to_string())),
    }
}

fn parse_time(cell: &str, format: &TimeFormat) -> Result<DateTime<FixedOffset>, ParseError> {
    let parsed = match format {
        TimeFormat::Rfc3339 => DateTime::parse_from_rfc3339(cell),
        TimeFormat::Custom(pattern) => parse_custom_time(cell, pattern),
    };
    parsed.map_err(|source| ParseError::Time {
        value: cell.to_string(),
        format: format.to_string(),
        source,
    })
}

/// Patterns without an offset are read as UTC, and date-only patterns as
/// midnight UTC.
fn parse_custom_time(cell: &str, pattern: &str) -> ParseResult<DateTime<FixedOffset>> {
    match DateTime::parse_from_str(cell, pattern) {
        Err(err) if err.kind() == ParseErrorKind::NotEnough => {
            let naive = match NaiveDateTime::parse_from_str(cell, pattern) {
                Err(err) if err.kind() == ParseErrorKind::NotEnough => {
                    NaiveDate::parse_from_str(cell, pattern)?.and_time(NaiveTime::MIN)
                }
                other => other?,
            };
            Ok(naive.and_utc().fixed_offset())
        }
        other => other,
    }
}
