use crate::errors::ValueError;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// A coerced cell, ready to be written into a record field.
///
/// Integers are carried at full width; narrowing to the field's own type
/// happens in [`FromValue`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Time(DateTime<FixedOffset>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::Time(_) => "time",
        }
    }

    /// Convert and store into `slot`. This is what record accessor tables
    /// call for each field.
    pub fn assign<T: FromValue>(self, slot: &mut T) -> Result<(), ValueError> {
        *slot = T::from_value(self)?;
        Ok(())
    }

    fn mismatch(self, expected: &'static str) -> ValueError {
        ValueError::Mismatch {
            expected,
            found: self.type_name(),
        }
    }
}

/// Field types a [`Value`] can be written into.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other.mismatch("bool")),
        }
    }
}

macro_rules! impl_from_value_int {
    ($variant:ident, $expected:literal, $($ty:ty),+) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::$variant(n) => <$ty>::try_from(n).map_err(|_| ValueError::Overflow {
                            value: n.to_string(),
                            target: stringify!($ty),
                        }),
                        other => Err(other.mismatch($expected)),
                    }
                }
            }
        )+
    };
}

impl_from_value_int!(Int, "int", i8, i16, i32, i64, isize);
impl_from_value_int!(Uint, "uint", u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(f) => Ok(f),
            other => Err(other.mismatch("float")),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl FromValue for DateTime<FixedOffset> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Time(t) => Ok(t),
            other => Err(other.mismatch("time")),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        T::from_value(value).map(Some)
    }
}
