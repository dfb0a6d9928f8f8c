// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{Scan, ToValue, Value};
use crate::{Error, Result, null};

/// A 64-bit floating point number where `0.0` and null are the same thing.
///
/// Null encodes as `0` in JSON and text. Decoding `0`, `null` or empty text produces a
/// null value. Negative zero counts as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Float {
    /// The number. Meaningless unless [`valid`][Self::valid] is `true`.
    pub value: f64,
    /// `true` if [`value`][Self::value] holds a value, `false` for null.
    pub valid: bool,
}

impl Float {
    /// Creates a number from its parts, as given.
    #[must_use]
    pub const fn new(value: f64, valid: bool) -> Self {
        Self { value, valid }
    }

    /// Creates a number that is valid unless `value` is zero.
    #[must_use]
    pub fn from_value(value: f64) -> Self {
        Self::new(value, value != 0.0)
    }

    /// Creates a number that is null when `value` is `None` or zero.
    #[must_use]
    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or_else(Self::default, Self::from_value)
    }

    /// Replaces the number and marks the value as valid.
    pub fn set_valid(&mut self, value: f64) {
        self.value = value;
        self.valid = true;
    }

    /// Returns the number, or `0.0` if the value is null.
    #[must_use]
    pub fn value_or_zero(&self) -> f64 {
        if self.valid { self.value } else { 0.0 }
    }

    /// Returns a reference to the number, or `None` if the value is null.
    #[must_use]
    pub fn as_option(&self) -> Option<&f64> {
        self.valid.then_some(&self.value)
    }

    /// Returns `true` if the value is null or zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value_or_zero() == 0.0
    }

    /// Returns `true` if both values are the same number, counting null as `0.0`.
    #[must_use]
    #[expect(clippy::float_cmp, reason = "exact equality is the documented semantics")]
    pub fn equal(&self, other: &Self) -> bool {
        self.value_or_zero() == other.value_or_zero()
    }

    /// Encodes the value as a JSON number. Null encodes as `0`.
    ///
    /// # Errors
    ///
    /// Returns an [encode error][Error::is_encode] for NaN and the infinities.
    pub fn marshal_json(&self) -> Result<Vec<u8>> {
        if self.is_zero() {
            return Ok(b"0".to_vec());
        }

        null::Float::from_value(self.value).marshal_json()
    }

    /// Decodes a JSON number or `null` into `self`. `0` and `null` produce a null value.
    ///
    /// # Errors
    ///
    /// Fails as [`null::Float::unmarshal_json`] does. On error, `self` is left null.
    pub fn unmarshal_json(&mut self, data: &[u8]) -> Result<()> {
        self.decode_with(|decoded| decoded.unmarshal_json(data))
    }

    /// Encodes the value as text. Null encodes as `0`.
    #[must_use]
    pub fn marshal_text(&self) -> Vec<u8> {
        self.value_or_zero().to_string().into_bytes()
    }

    /// Decodes a number from text into `self`. Empty input, `null` and zero produce a
    /// null value.
    ///
    /// # Errors
    ///
    /// Fails as [`null::Float::unmarshal_text`] does. On error, `self` is left null.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> Result<()> {
        self.decode_with(|decoded| decoded.unmarshal_text(text))
    }

    fn decode_with(&mut self, decode: impl FnOnce(&mut null::Float) -> Result<()>) -> Result<()> {
        let mut decoded = null::Float::default();
        let result = decode(&mut decoded);
        *self = decoded.into();
        result
    }
}

impl From<f64> for Float {
    fn from(value: f64) -> Self {
        Self::from_value(value)
    }
}

impl From<null::Float> for Float {
    fn from(value: null::Float) -> Self {
        Self::from_option(value.as_option().copied())
    }
}

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Display for Float {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value_or_zero())
    }
}

impl FromStr for Float {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut value = Self::default();
        value.unmarshal_text(s.as_bytes())?;
        Ok(value)
    }
}

impl Scan for Float {
    fn scan(&mut self, src: Value) -> Result<()> {
        self.decode_with(|decoded| decoded.scan(src))
    }
}

impl ToValue for Float {
    fn to_value(&self) -> Value {
        if self.is_zero() { Value::Null } else { Value::Float(self.value) }
    }
}

impl Serialize for Float {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        null::Float::from_value(self.value_or_zero()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Float {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        null::Float::deserialize(deserializer).map(Self::from)
    }
}
