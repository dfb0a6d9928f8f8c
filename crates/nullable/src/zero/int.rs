// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{Scan, ToValue, Value};
use crate::{Error, Result, null};

/// A 64-bit signed integer where `0` and null are the same thing.
///
/// Null encodes as `0` in JSON and text. Decoding `0`, `null` or empty text produces a
/// null value, and a null value is bound to drivers as [`Value::Null`].
///
/// # Examples
///
/// ```
/// use nullable::zero::Int;
///
/// assert!(!Int::from(0).valid);
/// assert_eq!(Int::default().marshal_json(), b"0");
/// assert_eq!(Int::from(0), Int::default());
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

    /// Creates an integer that is valid unless `value` is `0`.
    #[must_use]
    pub const fn from_value(value: i64) -> Self {
        Self::new(value, value != 0)
    }

    /// Creates an integer that is null when `value` is `None` or `Some(0)`.
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

    /// Returns `true` if the value is null or `0`.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value_or_zero() == 0
    }

    /// Returns `true` if both values are the same integer, counting null as `0`.
    #[must_use]
    pub fn equal(&self, other: &Self) -> bool {
        self.value_or_zero() == other.value_or_zero()
    }

    /// Encodes the value as a JSON number. Null encodes as `0`.
    #[must_use]
    pub fn marshal_json(&self) -> Vec<u8> {
        self.to_null().marshal_json()
    }

    /// Decodes a JSON integer or `null` into `self`. `0` and `null` produce a null value.
    ///
    /// # Errors
    ///
    /// Fails as [`null::Int::unmarshal_json`] does. On error, `self` is left null.
    pub fn unmarshal_json(&mut self, data: &[u8]) -> Result<()> {
        self.decode_with(|decoded| decoded.unmarshal_json(data))
    }

    /// Encodes the value as decimal text. Null encodes as `0`.
    #[must_use]
    pub fn marshal_text(&self) -> Vec<u8> {
        self.to_null().marshal_text()
    }

    /// Decodes an integer from text into `self`. Empty input, `null` and `0` produce a
    /// null value.
    ///
    /// # Errors
    ///
    /// Fails as [`null::Int::unmarshal_text`] does. On error, `self` is left null.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> Result<()> {
        self.decode_with(|decoded| decoded.unmarshal_text(text))
    }

    fn to_null(self) -> null::Int {
        null::Int::from_value(self.value_or_zero())
    }

    fn decode_with(&mut self, decode: impl FnOnce(&mut null::Int) -> Result<()>) -> Result<()> {
        let mut decoded = null::Int::default();
        let result = decode(&mut decoded);
        *self = decoded.into();
        result
    }
}

impl From<i64> for Int {
    fn from(value: i64) -> Self {
        Self::from_value(value)
    }
}

impl From<null::Int> for Int {
    fn from(value: null::Int) -> Self {
        Self::from_option(value.as_option().copied())
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
        write!(f, "{}", self.value_or_zero())
    }
}

impl FromStr for Int {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut value = Self::default();
        value.unmarshal_text(s.as_bytes())?;
        Ok(value)
    }
}

impl Scan for Int {
    fn scan(&mut self, src: Value) -> Result<()> {
        self.decode_with(|decoded| decoded.scan(src))
    }
}

impl ToValue for Int {
    fn to_value(&self) -> Value {
        if self.is_zero() { Value::Null } else { Value::Int(self.value) }
    }
}

impl Serialize for Int {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.value_or_zero())
    }
}

impl<'de> Deserialize<'de> for Int {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        null::Int::deserialize(deserializer).map(Self::from)
    }
}
