// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::SecondsFormat;
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{self, Scan, ToValue, Value};
use crate::error::Boundary;
use crate::{Error, Result};

const NAME: &str = "Text";

/// A nullable string.
///
/// Null encodes as JSON `null` and as empty text. Decoding empty text produces a null
/// value, so a valid empty string survives JSON and driver round trips but not a text one.
///
/// # Examples
///
/// ```
/// use nullable::null::Text;
///
/// let mut name = Text::default();
/// name.unmarshal_json(br#""Ada""#)?;
/// assert_eq!(name.as_option(), Some("Ada"));
///
/// name.unmarshal_json(b"null")?;
/// assert_eq!(name.marshal_json(), b"null");
///
/// # Ok::<(), nullable::Error>(())
/// ```
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

    /// Creates a valid text value. An empty string is valid too.
    #[must_use]
    pub fn from_value(value: impl Into<String>) -> Self {
        Self::new(value, true)
    }

    /// Creates a text value that is null when `value` is `None`.
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

    /// Returns `true` if the value is null. A valid empty string is not zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        !self.valid
    }

    /// Returns `true` if both values are null, or both are valid with equal strings.
    #[must_use]
    pub fn equal(&self, other: &Self) -> bool {
        self.valid == other.valid && (!self.valid || self.value == other.value)
    }

    /// Encodes the value as a JSON string, or `null`.
    #[must_use]
    pub fn marshal_json(&self) -> Vec<u8> {
        if self.valid {
            serde_json::Value::from(self.value.as_str()).to_string().into_bytes()
        } else {
            b"null".to_vec()
        }
    }

    /// Decodes a JSON string or `null` into `self`.
    ///
    /// # Errors
    ///
    /// Returns a decode error wrapping the [`serde_json::Error`] when `data` is neither a
    /// JSON string nor `null`. On error, `self` is left null.
    pub fn unmarshal_json(&mut self, data: &[u8]) -> Result<()> {
        let result = if data == b"null" {
            Ok(None)
        } else {
            serde_json::from_slice::<String>(data)
                .map(Some)
                .map_err(|error| Error::decode(NAME, Boundary::Json, error))
        };

        self.store(result)
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
    /// Returns a decode error wrapping the [`std::str::Utf8Error`] when `text` is not
    /// valid UTF-8. On error, `self` is left null.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> Result<()> {
        let result = std::str::from_utf8(text)
            .map(|text| (!text.is_empty()).then(|| text.to_owned()))
            .map_err(|error| Error::decode(NAME, Boundary::Text, error));

        self.store(result)
    }

    fn store(&mut self, result: Result<Option<String>>) -> Result<()> {
        let (value, outcome) = match result {
            Ok(value) => (value, Ok(())),
            Err(error) => (None, Err(error)),
        };

        *self = Self::from_option(value);
        outcome
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
        Ok(Self::new(s, !s.is_empty()))
    }
}

impl Scan for Text {
    fn scan(&mut self, src: Value) -> Result<()> {
        let result = match src {
            Value::Null => Ok(None),
            Value::Text(text) => Ok(Some(text)),
            Value::Int(value) => Ok(Some(value.to_string())),
            Value::Float(value) => Ok(Some(value.to_string())),
            Value::Bool(value) => Ok(Some(value.to_string())),
            Value::Time(time) => Ok(Some(time.to_rfc3339_opts(SecondsFormat::AutoSi, true))),
            bytes @ Value::Bytes(_) => driver::parse_text(NAME, &bytes, |text| Ok::<_, Infallible>(text.to_owned())).map(Some),
        };

        self.store(result)
    }
}

impl ToValue for Text {
    fn to_value(&self) -> Value {
        if self.valid { Value::Text(self.value.clone()) } else { Value::Null }
    }
}

impl Serialize for Text {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.valid {
            serializer.serialize_str(&self.value)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_option(Option::<String>::deserialize(deserializer)?))
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use rstest::rstest;

    use super::*;

    static_assertions::assert_impl_all!(Text: Send, Sync, Clone, Default, Eq, Scan, ToValue, FromStr, Display);

    #[test]
    fn unmarshal_json() {
        let mut text = Text::default();

        text.unmarshal_json(br#""test""#).unwrap();
        assert_eq!(text, Text::from("test"));

        text.unmarshal_json(br#""""#).unwrap();
        assert!(text.valid);
        assert_eq!(text.value, "");

        text.unmarshal_json(b"null").unwrap();
        assert!(text.is_zero());
    }

    #[rstest]
    #[case::number(b"12345")]
    #[case::object(br#"{"String":"test","Valid":true}"#)]
    #[case::syntax(b":)")]
    fn unmarshal_json_rejects(#[case] input: &[u8]) {
        let mut text = Text::from("before");

        let error = text.unmarshal_json(input).unwrap_err();

        assert!(error.is_decode());
        assert!(!text.valid);
        assert!(text.value.is_empty());
    }

    #[test]
    fn marshal_json() {
        assert_eq!(Text::from("te\"st").marshal_json(), br#""te\"st""#);
        assert_eq!(Text::from("").marshal_json(), br#""""#);
        assert_eq!(Text::new("ignored", false).marshal_json(), b"null");
    }

    #[test]
    fn text_roundtrip() {
        let mut text = Text::default();

        text.unmarshal_text(b"test").unwrap();
        assert_eq!(text.marshal_text(), b"test");

        text.unmarshal_text(b"").unwrap();
        assert!(!text.valid);
        assert_eq!(text.marshal_text(), b"");

        // No compatibility special case for strings.
        text.unmarshal_text(b"null").unwrap();
        assert_eq!(text.as_option(), Some("null"));
    }

    #[test]
    fn unmarshal_text_not_utf8() {
        let mut text = Text::from("before");

        text.unmarshal_text(&[0xc3, 0x28]).unwrap_err();

        assert!(!text.valid);
        assert_eq!(text.value, "");
    }

    #[test]
    fn accessors() {
        let text = Text::from_option(Some("abc".to_owned()));
        assert_eq!(text.value_or_zero(), "abc");
        assert_eq!(text.as_option(), Some("abc"));

        let null = Text::from_option(None);
        assert_eq!(null.value_or_zero(), "");
        assert_eq!(null.as_option(), None);
        assert!(null.is_zero());
        assert!(!Text::from("").is_zero());
    }

    #[test]
    fn set_valid() {
        let mut text = Text::new("", false);
        text.set_valid("now");

        assert_eq!(text, Text::from("now"));
    }

    #[test]
    fn equal() {
        assert!(Text::new("a", false).equal(&Text::new("b", false)));
        assert!(Text::from("a").equal(&Text::from("a")));
        assert!(!Text::from("a").equal(&Text::from("b")));
        assert!(!Text::from("").equal(&Text::new("", false)));
    }

    #[rstest]
    #[case::text(Value::Text("abc".to_owned()), "abc")]
    #[case::bytes(Value::Bytes(b"abc".to_vec()), "abc")]
    #[case::int(Value::Int(-5), "-5")]
    #[case::float(Value::Float(1.5), "1.5")]
    #[case::bool(Value::Bool(true), "true")]
    fn scan(#[case] value: Value, #[case] expected: &str) {
        let mut text = Text::default();

        text.scan(value).unwrap();

        assert_eq!(text.as_option(), Some(expected));
        assert_eq!(text.to_value(), Value::Text(expected.to_owned()));
    }

    #[test]
    fn scan_time() {
        let mut text = Text::default();
        let time = DateTime::parse_from_rfc3339("2012-12-21T21:21:21.5+02:00").unwrap();

        text.scan(Value::Time(time)).unwrap();

        assert_eq!(text.value, "2012-12-21T21:21:21.500+02:00");
    }

    #[test]
    fn scan_null_and_bad_bytes() {
        let mut text = Text::from("abc");
        text.scan(Value::Null).unwrap();
        assert_eq!(text.to_value(), Value::Null);

        let error = text.scan(Value::Bytes(vec![0xff])).unwrap_err();
        assert!(error.is_decode());
    }

    #[test]
    fn display_and_parse() {
        let text: Text = "abc".parse().unwrap();
        assert_eq!(text.to_string(), "abc");

        let null: Text = "".parse().unwrap();
        assert!(!null.valid);
    }

    #[test]
    fn serde_json_roundtrip() {
        let json = serde_json::to_string(&Text::from("abc")).unwrap();
        assert_eq!(json, r#""abc""#);
        assert_eq!(serde_json::from_str::<Text>(&json).unwrap(), Text::from("abc"));

        assert_eq!(serde_json::to_string(&Text::default()).unwrap(), "null");
        assert!(!serde_json::from_str::<Text>("null").unwrap().valid);
    }
}
