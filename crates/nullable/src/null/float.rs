// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{self, Scan, ToValue, Value};
use crate::error::Boundary;
use crate::{Error, Result};

const NAME: &str = "Float";

/// A nullable 64-bit floating point number.
///
/// Null encodes as JSON `null` and as empty text; text decoding also accepts `null`.
/// JSON has no spelling for NaN or the infinities, so encoding those to JSON fails.
///
/// # Examples
///
/// ```
/// use nullable::null::Float;
///
/// let ratio = Float::from(0.25);
/// assert_eq!(ratio.marshal_json()?, b"0.25");
/// assert!(Float::from(f64::NAN).marshal_json().is_err());
///
/// # Ok::<(), nullable::Error>(())
/// ```
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

    /// Creates a valid number. Zero is valid too.
    #[must_use]
    pub const fn from_value(value: f64) -> Self {
        Self::new(value, true)
    }

    /// Creates a number that is null when `value` is `None`.
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

    /// Returns `true` if the value is null.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        !self.valid
    }

    /// Returns `true` if both values are null, or both are valid with equal numbers.
    ///
    /// Numbers compare with `==`, so a valid NaN is never equal to anything.
    #[must_use]
    #[expect(clippy::float_cmp, reason = "exact equality is the documented semantics")]
    pub fn equal(&self, other: &Self) -> bool {
        self.valid == other.valid && (!self.valid || self.value == other.value)
    }

    /// Encodes the value as a JSON number, or `null`.
    ///
    /// # Errors
    ///
    /// Returns an [encode error][Error::is_encode] for NaN and the infinities.
    pub fn marshal_json(&self) -> Result<Vec<u8>> {
        if !self.valid {
            return Ok(b"null".to_vec());
        }

        serde_json::Number::from_f64(self.value)
            .map(|number| number.to_string().into_bytes())
            .ok_or_else(|| Error::encode(NAME, format!("{} is not a finite number", self.value)))
    }

    /// Decodes a JSON number or `null` into `self`.
    ///
    /// # Errors
    ///
    /// Returns a decode error wrapping the [`serde_json::Error`] when `data` is neither a
    /// number nor `null`. On error, `self` is left null.
    pub fn unmarshal_json(&mut self, data: &[u8]) -> Result<()> {
        let result = if data == b"null" {
            Ok(None)
        } else {
            serde_json::from_slice::<f64>(data)
                .map(Some)
                .map_err(|error| Error::decode(NAME, Boundary::Json, error))
        };

        self.store(result)
    }

    /// Encodes the value as text, or empty if null.
    #[must_use]
    pub fn marshal_text(&self) -> Vec<u8> {
        if self.valid {
            self.value.to_string().into_bytes()
        } else {
            Vec::new()
        }
    }

    /// Decodes a number from text into `self`. Empty input and `null` produce a null value.
    ///
    /// # Errors
    ///
    /// Returns a decode error wrapping the [`std::num::ParseFloatError`] or
    /// [`std::str::Utf8Error`]. On error, `self` is left null.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> Result<()> {
        let result = decode_text(text);
        self.store(result)
    }

    fn store(&mut self, result: Result<Option<f64>>) -> Result<()> {
        let (value, outcome) = match result {
            Ok(value) => (value, Ok(())),
            Err(error) => (None, Err(error)),
        };

        *self = Self::from_option(value);
        outcome
    }
}

fn decode_text(text: &[u8]) -> Result<Option<f64>> {
    let text = std::str::from_utf8(text).map_err(|error| Error::decode(NAME, Boundary::Text, error))?;

    if text.is_empty() || text == "null" {
        return Ok(None);
    }

    text.parse::<f64>()
        .map(Some)
        .map_err(|error| Error::decode(NAME, Boundary::Text, error))
}

impl From<f64> for Float {
    fn from(value: f64) -> Self {
        Self::from_value(value)
    }
}

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Display for Float {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.valid { write!(f, "{}", self.value) } else { Ok(()) }
    }
}

impl FromStr for Float {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decode_text(s.as_bytes()).map(Self::from_option)
    }
}

impl Scan for Float {
    fn scan(&mut self, src: Value) -> Result<()> {
        let result = match src {
            Value::Null => Ok(None),
            Value::Float(value) => Ok(Some(value)),
            Value::Int(value) => Ok(Some(int_to_float(value))),
            other => driver::parse_text(NAME, &other, str::parse::<f64>).map(Some),
        };

        self.store(result)
    }
}

#[expect(clippy::cast_precision_loss, reason = "integer columns scanned into a float round to the nearest value")]
fn int_to_float(value: i64) -> f64 {
    value as f64
}

impl ToValue for Float {
    fn to_value(&self) -> Value {
        if self.valid { Value::Float(self.value) } else { Value::Null }
    }
}

impl Serialize for Float {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if !self.valid {
            return serializer.serialize_none();
        }

        if !self.value.is_finite() {
            return Err(serde_core::ser::Error::custom(format_args!("{} is not a finite number", self.value)));
        }

        serializer.serialize_f64(self.value)
    }
}

impl<'de> Deserialize<'de> for Float {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_option(Option::<f64>::deserialize(deserializer)?))
    }
}
