// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The contract between nullable types and database drivers.
//!
//! A driver reads a column into a [`Value`] and hands it to [`Scan::scan`]. When binding
//! query parameters it asks for [`ToValue::to_value`] and writes the returned [`Value`]
//! to the wire. Drivers map `Value` onto their own column types; no particular driver
//! is assumed here.
//!
//! # Examples
//!
//! ```
//! use nullable::driver::{Scan, ToValue, Value};
//! use nullable::null::Int;
//!
//! let mut age = Int::default();
//! age.scan(Value::Int(42))?;
//! assert_eq!(age.to_value(), Value::Int(42));
//!
//! age.scan(Value::Null)?;
//! assert_eq!(age.to_value(), Value::Null);
//!
//! # Ok::<(), nullable::Error>(())
//! ```

use chrono::{DateTime, FixedOffset, TimeZone};

use crate::error::Boundary;
use crate::{Error, Result};

/// A value exchanged with a database driver.
///
/// The variants cover the kinds drivers natively read and write. Text columns may
/// arrive either as [`Value::Text`] or as raw [`Value::Bytes`], depending on the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating point number.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// A raw byte sequence.
    Bytes(Vec<u8>),
    /// A UTF-8 encoded string.
    Text(String),
    /// A point in time with a fixed UTC offset.
    ///
    /// Equality of two `Time` values compares the instant only, as [`DateTime`] does.
    Time(DateTime<FixedOffset>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub(crate) const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Time(_) => "time",
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Time(value.fixed_offset())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Parses the content of a [`Value::Text`] or [`Value::Bytes`] for a scan into `target`.
///
/// Other kinds fail with a type mismatch; bad content fails with a decode error.
pub(crate) fn parse_text<T, E>(target: &'static str, src: &Value, parse: impl FnOnce(&str) -> std::result::Result<T, E>) -> Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let text = match src {
        Value::Text(text) => text.as_str(),
        Value::Bytes(bytes) => std::str::from_utf8(bytes).map_err(|error| Error::decode(target, Boundary::Driver, error))?,
        other => return Err(Error::type_mismatch(target, other)),
    };

    parse(text).map_err(|error| Error::decode(target, Boundary::Driver, error))
}

/// Reads a [`Value`] produced by a database driver into `self`.
///
/// Implementations accept [`Value::Null`] as the absence of a value and fail with a
/// [type mismatch][crate::Error::is_type_mismatch] for kinds they cannot represent.
pub trait Scan {
    /// Assigns `src` to `self`.
    ///
    /// # Errors
    ///
    /// Returns an error when `src` has an unsupported kind or its content cannot be
    /// converted. The state of `self` after a failed scan is invalid (null).
    fn scan(&mut self, src: Value) -> Result<()>;
}

/// Produces the [`Value`] a database driver should store for `self`.
pub trait ToValue {
    /// Returns [`Value::Null`] for absent values, otherwise the wrapped value.
    fn to_value(&self) -> Value;
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    static_assertions::assert_impl_all!(Value: Send, Sync, Clone, PartialEq, From<i64>, From<Option<String>>);
    static_assertions::assert_obj_safe!(Scan, ToValue);

    #[test]
    fn kind_names() {
        let time = DateTime::<FixedOffset>::default();
        let cases = [
            (Value::Null, "null"),
            (Value::Int(1), "int"),
            (Value::Float(1.5), "float"),
            (Value::Bool(true), "bool"),
            (Value::Bytes(vec![1, 2]), "bytes"),
            (Value::Text("a".to_owned()), "text"),
            (Value::Time(time), "time"),
        ];

        for (value, expected) in cases {
            assert_eq!(value.kind_name(), expected);
        }
    }

    #[test]
    fn is_null() {
        assert!(Value::Null.is_null());
        assert!(!Value::Int(0).is_null());
    }

    #[test]
    fn from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(5_i64)), Value::Int(5));
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_owned()));
    }

    #[test]
    fn from_utc_time_keeps_instant() {
        let utc = DateTime::<Utc>::from_timestamp(1_356_124_881, 0).unwrap();

        let Value::Time(time) = Value::from(utc) else {
            panic!("expected a time value");
        };

        assert_eq!(time.timestamp(), 1_356_124_881);
        assert_eq!(time.offset().local_minus_utc(), 0);
    }

    #[test]
    fn parse_text_from_text_and_bytes() {
        assert_eq!(parse_text("Int", &Value::Text("12".to_owned()), str::parse::<i64>).unwrap(), 12);
        assert_eq!(parse_text("Int", &Value::Bytes(b"-7".to_vec()), str::parse::<i64>).unwrap(), -7);
    }

    #[test]
    fn parse_text_errors() {
        let error = parse_text("Int", &Value::Text("abc".to_owned()), str::parse::<i64>).unwrap_err();
        assert!(error.is_decode());
        assert!(error.to_string().starts_with("couldn't unmarshal driver value into Int"));

        let error = parse_text("Int", &Value::Bytes(vec![0xff]), str::parse::<i64>).unwrap_err();
        assert!(error.is_decode());

        let error = parse_text("Int", &Value::Bool(true), str::parse::<i64>).unwrap_err();
        assert!(error.is_type_mismatch());
        assert_eq!(error.to_string(), "unsupported type for Int: bool");
    }
}
