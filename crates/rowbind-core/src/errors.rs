use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

pub type CsvResult<T> = Result<T, CsvError>;

/// Construction-time failure: the record shape declares a field the binder
/// cannot handle. Callers should treat this as a programming error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("record binder does not support field {field} with type {declared}")]
    UnsupportedType { field: String, declared: String },
}

/// Raised by header reconciliation only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IncorrectHeaderError {
    #[error("Unexpected column {0:?}")]
    UnexpectedColumn(String),

    #[error("Mandatory column {0:?} is missing")]
    MissingColumn(String),
}

/// Failure to turn a cell's text into a typed value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("invalid boolean {0:?}")]
    Bool(String),

    #[error("invalid integer {value:?}: {source}")]
    Int {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid float {value:?}: {source}")]
    Float {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("value {value:?} out of range for {kind}")]
    OutOfRange { value: String, kind: String },

    #[error("invalid {kind} {value:?}: {reason}")]
    Malformed {
        value: String,
        kind: String,
        reason: &'static str,
    },

    #[error("invalid time {value:?} for format {format:?}: {source}")]
    Time {
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// A record's accessor table refused a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("expected {expected} value, got {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("value {value} does not fit in {target}")]
    Overflow { value: String, target: &'static str },

    #[error("no field at position {0}")]
    UnknownField(usize),
}

/// Raised by row decoding only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("csv record must have same column count as the bound header: expected {expected}, found {found}")]
    RowShape { expected: usize, found: usize },

    #[error("target record must be a {expected} record, got {found}")]
    ShapeMismatch { expected: String, found: String },

    #[error("column {column:?}: {source}")]
    Parse {
        column: String,
        #[source]
        source: ParseError,
    },

    #[error("column {column:?}: {source}")]
    Write {
        column: String,
        #[source]
        source: ValueError,
    },
}

impl DecodeError {
    /// Column that caused a per-field failure, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            DecodeError::Parse { column, .. } | DecodeError::Write { column, .. } => Some(column),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Incorrect header: {0}")]
    Header(#[from] IncorrectHeaderError),

    #[error("Line {line}: {source}")]
    Decode {
        line: u64,
        #[source]
        source: DecodeError,
    },
}
