// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{self, Scan, ToValue, Value};
use crate::error::Boundary;
use crate::{Error, Result, parse};

const NAME: &str = "Bool";

/// A nullable boolean.
///
/// Null encodes as JSON `null` and as empty text; text decoding also accepts `null`.
/// Drivers may deliver booleans as `0`/`1` integers or as spellings such as `t` and
/// `FALSE`, all of which [`Scan`] understands.
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

    /// Creates a valid boolean. `false` is valid too.
    #[must_use]
    pub const fn from_value(value: bool) -> Self {
        Self::new(value, true)
    }

    /// Creates a boolean that is null when `value` is `None`.
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

    /// Returns `true` if the value is null.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        !self.valid
    }

    /// Returns `true` if both values are null, or both are valid with equal booleans.
    #[must_use]
    pub fn equal(&self, other: &Self) -> bool {
        self.valid == other.valid && (!self.valid || self.value == other.value)
    }

    /// Encodes the value as JSON `true`, `false` or `null`.
    #[must_use]
    pub fn marshal_json(&self) -> Vec<u8> {
        match self.as_option() {
            Some(true) => b"true".to_vec(),
            Some(false) => b"false".to_vec(),
            None => b"null".to_vec(),
        }
    }

    /// Decodes a JSON boolean or `null` into `self`.
    ///
    /// # Errors
    ///
    /// Returns a decode error wrapping the [`serde_json::Error`] for anything else. On
    /// error, `self` is left null.
    pub fn unmarshal_json(&mut self, data: &[u8]) -> Result<()> {
        let result = if data == b"null" {
            Ok(None)
        } else {
            serde_json::from_slice::<bool>(data)
                .map(Some)
                .map_err(|error| Error::decode(NAME, Boundary::Json, error))
        };

        self.store(result)
    }

    /// Encodes the value as `true` or `false`, or empty if null.
    #[must_use]
    pub fn marshal_text(&self) -> Vec<u8> {
        match self.as_option() {
            Some(value) => value.to_string().into_bytes(),
            None => Vec::new(),
        }
    }

    /// Decodes `true` or `false` from text into `self`. Empty input and `null` produce a
    /// null value.
    ///
    /// # Errors
    ///
    /// Returns a decode error wrapping the [`std::str::ParseBoolError`] or
    /// [`std::str::Utf8Error`]. On error, `self` is left null.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> Result<()> {
        let result = decode_text(text);
        self.store(result)
    }

    fn store(&mut self, result: Result<Option<bool>>) -> Result<()> {
        let (value, outcome) = match result {
            Ok(value) => (value, Ok(())),
            Err(error) => (None, Err(error)),
        };

        *self = Self::from_option(value);
        outcome
    }
}

fn decode_text(text: &[u8]) -> Result<Option<bool>> {
    let text = std::str::from_utf8(text).map_err(|error| Error::decode(NAME, Boundary::Text, error))?;

    if text.is_empty() || text == "null" {
        return Ok(None);
    }

    text.parse::<bool>()
        .map(Some)
        .map_err(|error| Error::decode(NAME, Boundary::Text, error))
}

impl From<bool> for Bool {
    fn from(value: bool) -> Self {
        Self::from_value(value)
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
        match self.as_option() {
            Some(value) => write!(f, "{value}"),
            None => Ok(()),
        }
    }
}

impl FromStr for Bool {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decode_text(s.as_bytes()).map(Self::from_option)
    }
}

impl Scan for Bool {
    fn scan(&mut self, src: Value) -> Result<()> {
        let result = match src {
            Value::Null => Ok(None),
            Value::Bool(value) => Ok(Some(value)),
            Value::Int(value) => parse::driver_bool(&value.to_string())
                .map(Some)
                .map_err(|error| Error::decode(NAME, Boundary::Driver, error)),
            other => driver::parse_text(NAME, &other, parse::driver_bool).map(Some),
        };

        self.store(result)
    }
}

impl ToValue for Bool {
    fn to_value(&self) -> Value {
        self.as_option().map_or(Value::Null, |value| Value::Bool(*value))
    }
}

impl Serialize for Bool {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.as_option() {
            Some(value) => serializer.serialize_bool(*value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Bool {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_option(Option::<bool>::deserialize(deserializer)?))
    }
}
