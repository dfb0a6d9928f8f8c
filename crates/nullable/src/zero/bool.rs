// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{Scan, ToValue, Value};
use crate::{Error, Result, null};

/// A boolean where `false` and null are the same thing.
///
/// Null encodes as `false` in JSON and text. Decoding `false`, `null` or empty text
/// produces a null value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bool {
    /// The boolean. Meaningless unless [`valid`][Self::valid] is `true`.
    pub value: bool,
    /// `true` if [`value`][Self::value] holds a value, `false` for null.
    pub valid: bool,
}

impl Bool {
    /// Creates a boolean from its parts, as given.
    #[must_use]
    pub const fn new(value: bool, valid: bool) -> Self {
        Self { value, valid }
    }

    /// Creates a boolean that is valid only when `value` is `true`.
    #[must_use]
    pub const fn from_value(value: bool) -> Self {
        Self::new(value, value)
    }

    /// Creates a boolean that is null when `value` is `None` or `Some(false)`.
    #[must_use]
    pub fn from_option(value: Option<bool>) -> Self {
        value.map_or_else(Self::default, Self::from_value)
    }

    /// Replaces the boolean and marks the value as valid.
    pub fn set_valid(&mut self, value: bool) {
        self.value = value;
        self.valid = true;
    }

    /// Returns the boolean, or `false` if the value is null.
    #[must_use]
    pub fn value_or_zero(&self) -> bool {
        self.valid && self.value
    }

    /// Returns a reference to the boolean, or `None` if the value is null.
    #[must_use]
    pub fn as_option(&self) -> Option<&bool> {
        self.valid.then_some(&self.value)
    }

    /// Returns `true` if the value is null or `false`.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        !self.value_or_zero()
    }

    /// Returns `true` if both values are the same boolean, counting null as `false`.
    #[must_use]
    pub fn equal(&self, other: &Self) -> bool {
        self.value_or_zero() == other.value_or_zero()
    }

    /// Encodes the value as JSON `true` or `false`. Null encodes as `false`.
    #[must_use]
    pub fn marshal_json(&self) -> Vec<u8> {
        self.to_null().marshal_json()
    }

    /// Decodes a JSON boolean or `null` into `self`. `false` and `null` produce a null
    /// value.
    ///
    /// # Errors
    ///
    /// Fails as [`null::Bool::unmarshal_json`] does. On error, `self` is left null.
    pub fn unmarshal_json(&mut self, data: &[u8]) -> Result<()> {
        self.decode_with(|decoded| decoded.unmarshal_json(data))
    }

    /// Encodes the value as `true` or `false`. Null encodes as `false`.
    #[must_use]
    pub fn marshal_text(&self) -> Vec<u8> {
        self.to_null().marshal_text()
    }

    /// Decodes `true` or `false` from text into `self`. Empty input, `null` and `false`
    /// produce a null value.
    ///
    /// # Errors
    ///
    /// Fails as [`null::Bool::unmarshal_text`] does. On error, `self` is left null.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> Result<()> {
        self.decode_with(|decoded| decoded.unmarshal_text(text))
    }

    fn to_null(self) -> null::Bool {
        null::Bool::from_value(self.value_or_zero())
    }

    fn decode_with(&mut self, decode: impl FnOnce(&mut null::Bool) -> Result<()>) -> Result<()> {
        let mut decoded = null::Bool::default();
        let result = decode(&mut decoded);
        *self = decoded.into();
        result
    }
}

impl From<bool> for Bool {
    fn from(value: bool) -> Self {
        Self::from_value(value)
    }
}

impl From<null::Bool> for Bool {
    fn from(value: null::Bool) -> Self {
        Self::from_option(value.as_option().copied())
    }
}

impl PartialEq for Bool {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for Bool {}

impl Display for Bool {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value_or_zero())
    }
}

impl FromStr for Bool {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut value = Self::default();
        value.unmarshal_text(s.as_bytes())?;
        Ok(value)
    }
}

impl Scan for Bool {
    fn scan(&mut self, src: Value) -> Result<()> {
        self.decode_with(|decoded| decoded.scan(src))
    }
}

impl ToValue for Bool {
    fn to_value(&self) -> Value {
        if self.is_zero() { Value::Null } else { Value::Bool(true) }
    }
}

impl Serialize for Bool {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(self.value_or_zero())
    }
}

impl<'de> Deserialize<'de> for Bool {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        null::Bool::deserialize(deserializer).map(Self::from)
    }
}
