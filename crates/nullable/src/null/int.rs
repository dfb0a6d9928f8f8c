// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{self, Scan, ToValue, Value};
use crate::error::Boundary;
use crate::{Error, Result, parse};

const NAME: &str = "Int";

/// A nullable 64-bit signed integer.
///
/// Null encodes as JSON `null` and as empty text; text decoding also accepts `null`.
///
/// # Examples
///
/// ```
/// use nullable::null::Int;
///
/// let count: Int = "0x2A".parse()?;
/// assert_eq!(count.as_option(), Some(&42));
/// assert_eq!(count.marshal_json(), b"42");
///
/// # Ok::<(), nullable::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Int {
    /// The integer. Meaningless unless [`valid`][Self::valid] is `true`.
    pub value: i64,
    /// `true` if [`value`][Self::value] holds a value, `false` for null.
    pub valid: bool,
}

impl Int {
    /// Creates an integer from its parts, as given.
    #[must_use]
    pub const fn new(value: i64, valid: bool) -> Self {
        Self { value, valid }
    }

    /// Creates a valid integer. Zero is valid too.
    #[must_use]
    pub const fn from_value(value: i64) -> Self {
        Self::new(value, true)
    }

    /// Creates an integer that is null when `value` is `None`.
    #[must_use]
    pub fn from_option(value: Option<i64>) -> Self {
        value.map_or_else(Self::default, Self::from_value)
    }

    /// Replaces the integer and marks the value as valid.
    pub fn set_valid(&mut self, value: i64) {
        self.value = value;
        self.valid = true;
    }

    /// Returns the integer, or `0` if the value is null.
    #[must_use]
    pub fn value_or_zero(&self) -> i64 {
        if self.valid { self.value } else { 0 }
    }

    /// Returns a reference to the integer, or `None` if the value is null.
    #[must_use]
    pub fn as_option(&self) -> Option<&i64> {
        self.valid.then_some(&self.value)
    }

    /// Returns `true` if the value is null. A valid `0` is not zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        !self.valid
    }

    /// Returns `true` if both values are null, or both are valid with equal integers.
    #[must_use]
    pub fn equal(&self, other: &Self) -> bool {
        self.valid == other.valid && (!self.valid || self.value == other.value)
    }

    /// Encodes the value as a JSON number, or `null`.
    #[must_use]
    pub fn marshal_json(&self) -> Vec<u8> {
        if self.valid {
            self.value.to_string().into_bytes()
        } else {
            b"null".to_vec()
        }
    }

    /// Decodes a JSON integer or `null` into `self`.
    ///
    /// # Errors
    ///
    /// Returns a decode error wrapping the [`serde_json::Error`] when `data` is neither a
    /// 64-bit integer nor `null`. On error, `self` is left null.
    pub fn unmarshal_json(&mut self, data: &[u8]) -> Result<()> {
        let result = if data == b"null" {
            Ok(None)
        } else {
            serde_json::from_slice::<i64>(data)
                .map(Some)
                .map_err(|error| Error::decode(NAME, Boundary::Json, error))
        };

        self.store(result)
    }

    /// Encodes the value as decimal text, or empty if null.
    #[must_use]
    pub fn marshal_text(&self) -> Vec<u8> {
        if self.valid {
            self.value.to_string().into_bytes()
        } else {
            Vec::new()
        }
    }

    /// Decodes an integer from text into `self`.
    ///
    /// Empty input and `null` produce a null value. Integers may carry a sign and a radix
    /// prefix (`0x`, `0o`, `0b`, or a leading `0` for octal).
    ///
    /// # Errors
    ///
    /// Returns a decode error wrapping the [`std::num::ParseIntError`] or
    /// [`std::str::Utf8Error`]. On error, `self` is left null.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> Result<()> {
        let result = decode_text(text);
        self.store(result)
    }

    fn store(&mut self, result: Result<Option<i64>>) -> Result<()> {
        let (value, outcome) = match result {
            Ok(value) => (value, Ok(())),
            Err(error) => (None, Err(error)),
        };

        *self = Self::from_option(value);
        outcome
    }
}

fn decode_text(text: &[u8]) -> Result<Option<i64>> {
    let text = std::str::from_utf8(text).map_err(|error| Error::decode(NAME, Boundary::Text, error))?;

    if text.is_empty() || text == "null" {
        return Ok(None);
    }

    parse::int_with_prefix(text)
        .map(Some)
        .map_err(|error| Error::decode(NAME, Boundary::Text, error))
}

impl From<i64> for Int {
    fn from(value: i64) -> Self {
        Self::from_value(value)
    }
}

impl PartialEq for Int {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for Int {}

impl Display for Int {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.valid { write!(f, "{}", self.value) } else { Ok(()) }
    }
}

impl FromStr for Int {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decode_text(s.as_bytes()).map(Self::from_option)
    }
}

impl Scan for Int {
    fn scan(&mut self, src: Value) -> Result<()> {
        let result = match src {
            Value::Null => Ok(None),
            Value::Int(value) => Ok(Some(value)),
            other => driver::parse_text(NAME, &other, str::parse::<i64>).map(Some),
        };

        self.store(result)
    }
}

impl ToValue for Int {
    fn to_value(&self) -> Value {
        if self.valid { Value::Int(self.value) } else { Value::Null }
    }
}

impl Serialize for Int {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.valid {
            serializer.serialize_i64(self.value)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for Int {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_option(Option::<i64>::deserialize(deserializer)?))
    }
}
