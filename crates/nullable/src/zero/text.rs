// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{Scan, ToValue, Value};
use crate::{Result, null};

/// A string where the empty string and null are the same thing.
///
/// Null encodes as `""` in JSON and as empty text. Decoding `""` or `null` produces a
/// null value. Unlike the numeric types, the text `null` decodes as a valid string.
#[derive(Debug, Clone, Default)]
pub struct Text {
    /// The string. Meaningless unless [`valid`][Self::valid] is `true`.
    pub value: String,
    /// `true` if [`value`][Self::value] holds a value, `false` for null.
    pub valid: bool,
}

impl Text {
    /// Creates a text value from its parts, as given.
    #[must_use]
    pub fn new(value: impl Into<String>, valid: bool) -> Self {
        Self {
            value: value.into(),
            valid,
        }
    }

    /// Creates a text value that is valid unless `value` is empty.
    #[must_use]
    pub fn from_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let valid = !value.is_empty();
        Self { value, valid }
    }

    /// Creates a text value that is null when `value` is `None` or empty.
    #[must_use]
    pub fn from_option(value: Option<String>) -> Self {
        value.map_or_else(Self::default, Self::from_value)
    }

    /// Replaces the string and marks the value as valid.
    pub fn set_valid(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.valid = true;
    }

    /// Returns the string, or `""` if the value is null.
    #[must_use]
    pub fn value_or_zero(&self) -> &str {
        if self.valid { &self.value } else { "" }
    }

    /// Returns the string, or `None` if the value is null.
    #[must_use]
    pub fn as_option(&self) -> Option<&str> {
        self.valid.then_some(self.value.as_str())
    }

    /// Returns `true` if the value is null or empty.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value_or_zero().is_empty()
    }

    /// Returns `true` if both values are the same string, counting null as `""`.
    #[must_use]
    pub fn equal(&self, other: &Self) -> bool {
        self.value_or_zero() == other.value_or_zero()
    }

    /// Encodes the value as a JSON string. Null encodes as `""`.
    #[must_use]
    pub fn marshal_json(&self) -> Vec<u8> {
        serde_json::Value::from(self.value_or_zero()).to_string().into_bytes()
    }

    /// Decodes a JSON string or `null` into `self`. `""` and `null` produce a null value.
    ///
    /// # Errors
    ///
    /// Fails as [`null::Text::unmarshal_json`] does. On error, `self` is left null.
    pub fn unmarshal_json(&mut self, data: &[u8]) -> Result<()> {
        self.decode_with(|decoded| decoded.unmarshal_json(data))
    }

    /// Encodes the value as text: the string itself, or empty if null.
    #[must_use]
    pub fn marshal_text(&self) -> Vec<u8> {
        self.value_or_zero().as_bytes().to_vec()
    }

    /// Decodes text into `self`. Empty input produces a null value.
    ///
    /// # Errors
    ///
    /// Fails as [`null::Text::unmarshal_text`] does. On error, `self` is left null.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> Result<()> {
        self.decode_with(|decoded| decoded.unmarshal_text(text))
    }

    fn decode_with(&mut self, decode: impl FnOnce(&mut null::Text) -> Result<()>) -> Result<()> {
        let mut decoded = null::Text::default();
        let result = decode(&mut decoded);
        *self = decoded.into();
        result
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Self::from_value(value)
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Self::from_value(value)
    }
}

impl From<null::Text> for Text {
    fn from(value: null::Text) -> Self {
        Self::from_option(value.valid.then_some(value.value))
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for Text {}

impl Display for Text {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.value_or_zero())
    }
}

impl FromStr for Text {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_value(s))
    }
}

impl Scan for Text {
    fn scan(&mut self, src: Value) -> Result<()> {
        self.decode_with(|decoded| decoded.scan(src))
    }
}

impl ToValue for Text {
    fn to_value(&self) -> Value {
        if self.is_zero() { Value::Null } else { Value::Text(self.value.clone()) }
    }
}

impl Serialize for Text {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.value_or_zero())
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        null::Text::deserialize(deserializer).map(Self::from)
    }
}
