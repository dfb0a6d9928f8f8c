// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, TimeZone};
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{Scan, ToValue, Value};
use crate::{Error, Result, null, unix};

/// A point in time where the Unix epoch and null are the same thing.
///
/// Encoding follows [`null::Timestamp`] except that null encodes as `0` seconds in JSON
/// and text. Decoding `0`, `null` or empty text produces a null value, as does scanning
/// the epoch from a driver.
///
/// # Examples
///
/// ```
/// use nullable::zero::Timestamp;
///
/// let mut stamp = Timestamp::default();
/// assert_eq!(stamp.marshal_json(), b"0");
///
/// stamp.unmarshal_json(b"1356124881")?;
/// assert!(stamp.valid);
///
/// stamp.unmarshal_json(b"0")?;
/// assert!(!stamp.valid);
///
/// # Ok::<(), nullable::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Timestamp {
    /// The instant. Meaningless unless [`valid`][Self::valid] is `true`.
    pub time: DateTime<FixedOffset>,
    /// `true` if [`time`][Self::time] holds a value, `false` for null.
    pub valid: bool,
}

impl Timestamp {
    /// Creates a timestamp from its parts, as given.
    #[must_use]
    pub const fn new(time: DateTime<FixedOffset>, valid: bool) -> Self {
        Self { time, valid }
    }

    /// Creates a timestamp that is valid unless `time` is the Unix epoch.
    #[must_use]
    pub fn from_time<Tz: TimeZone>(time: DateTime<Tz>) -> Self {
        let time = time.fixed_offset();
        Self::new(time, time != unix::zero_time())
    }

    /// Creates a timestamp that is null when `time` is `None` or the Unix epoch.
    #[must_use]
    pub fn from_option(time: Option<DateTime<FixedOffset>>) -> Self {
        time.map_or_else(Self::default, Self::from_time)
    }

    /// Replaces the instant and marks the timestamp as valid.
    pub fn set_valid<Tz: TimeZone>(&mut self, time: DateTime<Tz>) {
        self.time = time.fixed_offset();
        self.valid = true;
    }

    /// Returns the instant, or the Unix epoch if the timestamp is null.
    #[must_use]
    pub fn value_or_zero(&self) -> DateTime<FixedOffset> {
        if self.valid { self.time } else { unix::zero_time() }
    }

    /// Returns a reference to the instant, or `None` if the timestamp is null.
    #[must_use]
    pub fn as_option(&self) -> Option<&DateTime<FixedOffset>> {
        self.valid.then_some(&self.time)
    }

    /// Returns `true` if the timestamp is null or holds the Unix epoch, in any offset.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value_or_zero() == unix::zero_time()
    }

    /// Returns `true` if both timestamps denote the same instant, counting null as the
    /// Unix epoch. Offsets are ignored.
    #[must_use]
    pub fn equal(&self, other: &Self) -> bool {
        self.value_or_zero() == other.value_or_zero()
    }

    /// Returns `true` if both timestamps hold the same instant with the same offset,
    /// counting null as the Unix epoch at `+00:00`.
    #[must_use]
    pub fn exact_equal(&self, other: &Self) -> bool {
        let (this, other) = (self.value_or_zero(), other.value_or_zero());
        this == other && this.offset() == other.offset()
    }

    /// Encodes the timestamp as JSON integer seconds. Null encodes as `0`.
    #[must_use]
    pub fn marshal_json(&self) -> Vec<u8> {
        self.to_null().marshal_json()
    }

    /// Decodes JSON integer seconds or `null` into `self`. `0` and `null` produce a null
    /// timestamp.
    ///
    /// # Errors
    ///
    /// Fails as [`null::Timestamp::unmarshal_json`] does. On error, `self` is left null.
    pub fn unmarshal_json(&mut self, data: &[u8]) -> Result<()> {
        self.decode_with(|decoded| decoded.unmarshal_json(data))
    }

    /// Encodes the timestamp as integer seconds. Null encodes as `0`.
    #[must_use]
    pub fn marshal_text(&self) -> Vec<u8> {
        self.to_null().marshal_text()
    }

    /// Decodes integer seconds from text into `self`. Empty input, `null` and `0`
    /// produce a null timestamp.
    ///
    /// # Errors
    ///
    /// Fails as [`null::Timestamp::unmarshal_text`] does. On error, `self` is left null.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> Result<()> {
        self.decode_with(|decoded| decoded.unmarshal_text(text))
    }

    fn to_null(self) -> null::Timestamp {
        null::Timestamp::from_time(self.value_or_zero())
    }

    fn decode_with(&mut self, decode: impl FnOnce(&mut null::Timestamp) -> Result<()>) -> Result<()> {
        let mut decoded = null::Timestamp::default();
        let result = decode(&mut decoded);
        *self = decoded.into();
        result
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(time: DateTime<Tz>) -> Self {
        Self::from_time(time)
    }
}

impl From<null::Timestamp> for Timestamp {
    fn from(value: null::Timestamp) -> Self {
        Self::from_option(value.as_option().copied())
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for Timestamp {}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.to_null(), f)
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut stamp = Self::default();
        stamp.unmarshal_text(s.as_bytes())?;
        Ok(stamp)
    }
}

impl Scan for Timestamp {
    fn scan(&mut self, src: Value) -> Result<()> {
        self.decode_with(|decoded| decoded.scan(src))
    }
}

impl ToValue for Timestamp {
    fn to_value(&self) -> Value {
        if self.is_zero() { Value::Null } else { Value::Time(self.time) }
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_null().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        null::Timestamp::deserialize(deserializer).map(Self::from)
    }
}
