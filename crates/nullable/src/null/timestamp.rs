// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, TimeZone};
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::driver::{Scan, ToValue, Value};
use crate::error::Boundary;
use crate::{Error, Result, parse, unix};

const NAME: &str = "Timestamp";

/// A nullable point in time, encoded as whole seconds since the Unix epoch.
///
/// `Timestamp` is valid when [`valid`][Self::valid] is `true`. When it is not, the
/// [`time`][Self::time] field holds an unspecified instant that must not be interpreted.
///
/// # Wire formats
///
/// | Boundary | Valid                               | Null                |
/// |----------|-------------------------------------|---------------------|
/// | JSON     | integer seconds, e.g. `1356124881`  | `null`              |
/// | Text     | integer seconds, e.g. `1356124881`  | empty               |
/// | Driver   | [`Value::Time`]                     | [`Value::Null`]     |
///
/// Seconds are counted in UTC and fractional seconds are rounded down. The UTC offset of
/// [`time`][Self::time] does not survive JSON or text encoding: decoded instants always
/// carry a `+00:00` offset.
///
/// For compatibility with an earlier encoding, text decoding also accepts the string
/// `null` as the null value. It is never produced when encoding.
///
/// JSON objects such as `{"Time":1356124881,"Valid":true}` are rejected.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use nullable::null::Timestamp;
///
/// let time = DateTime::from_timestamp(1_356_124_881, 0).unwrap();
/// let stamp = Timestamp::from_time(time);
/// assert_eq!(stamp.marshal_json(), b"1356124881");
///
/// let mut decoded = Timestamp::default();
/// decoded.unmarshal_json(b"1356124881")?;
/// assert_eq!(decoded.time.timestamp(), 1_356_124_881);
///
/// decoded.unmarshal_json(b"null")?;
/// assert!(!decoded.valid);
///
/// # Ok::<(), nullable::Error>(())
/// ```
///
/// # Equality
///
/// [`Timestamp::equal`] (and `==`) compares absolute instants, so `06:00 +02:00` equals
/// `04:00 UTC`. [`Timestamp::exact_equal`] also requires identical offsets. Two null
/// timestamps are equal under both, whatever their `time` fields hold.
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

    /// Creates a valid timestamp. The instant and its offset are preserved.
    #[must_use]
    pub fn from_time<Tz: TimeZone>(time: DateTime<Tz>) -> Self {
        Self::new(time.fixed_offset(), true)
    }

    /// Creates a timestamp that is null when `time` is `None`.
    #[must_use]
    pub fn from_option(time: Option<DateTime<FixedOffset>>) -> Self {
        match time {
            Some(time) => Self::new(time, true),
            None => Self::new(unix::zero_time(), false),
        }
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

    /// Returns `true` if the timestamp is null.
    ///
    /// This is a null check only. A valid timestamp holding the Unix epoch, or any other
    /// zero-like instant, is not zero. Inspect [`time`][Self::time] directly for that.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        !self.valid
    }

    /// Returns `true` if both timestamps are null, or both are valid and denote the same
    /// instant. Offsets are ignored.
    #[must_use]
    pub fn equal(&self, other: &Self) -> bool {
        self.valid == other.valid && (!self.valid || self.time == other.time)
    }

    /// Returns `true` if both timestamps are null, or both are valid and hold the same
    /// instant with the same offset.
    #[must_use]
    pub fn exact_equal(&self, other: &Self) -> bool {
        self.valid == other.valid && (!self.valid || (self.time == other.time && self.time.offset() == other.time.offset()))
    }

    /// Encodes the timestamp as JSON: integer seconds, or `null`.
    #[must_use]
    pub fn marshal_json(&self) -> Vec<u8> {
        if self.valid {
            unix::to_secs(&self.time).to_string().into_bytes()
        } else {
            b"null".to_vec()
        }
    }

    /// Decodes JSON integer seconds or `null` into `self`.
    ///
    /// # Errors
    ///
    /// Returns a decode error wrapping the [`serde_json::Error`] when `data` is not a
    /// 64-bit integer or `null`, or wrapping a [`RangeError`][crate::RangeError] when the
    /// seconds cannot be represented. On error, `self` is left null.
    pub fn unmarshal_json(&mut self, data: &[u8]) -> Result<()> {
        let result = if data == b"null" {
            Ok(None)
        } else {
            serde_json::from_slice::<i64>(data)
                .map_err(|error| Error::decode(NAME, Boundary::Json, error))
                .and_then(|secs| from_secs(secs, Boundary::Json))
        };

        self.store(result)
    }

    /// Encodes the timestamp as text: integer seconds, or empty if null.
    #[must_use]
    pub fn marshal_text(&self) -> Vec<u8> {
        if self.valid {
            unix::to_secs(&self.time).to_string().into_bytes()
        } else {
            Vec::new()
        }
    }

    /// Decodes integer seconds from text into `self`.
    ///
    /// Empty input and `null` decode to a null timestamp. Integers may carry a sign and a
    /// radix prefix (`0x`, `0o`, `0b`, or a leading `0` for octal), and underscores may
    /// separate digits as in `1_356_124_881`.
    ///
    /// # Errors
    ///
    /// Returns a decode error wrapping the underlying [`std::num::ParseIntError`],
    /// [`std::str::Utf8Error`] or [`RangeError`][crate::RangeError]. On error, `self` is
    /// left null.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> Result<()> {
        let result = decode_text(text);
        self.store(result)
    }

    fn store(&mut self, result: Result<Option<DateTime<FixedOffset>>>) -> Result<()> {
        let (time, outcome) = match result {
            Ok(time) => (time, Ok(())),
            Err(error) => (None, Err(error)),
        };

        *self = Self::from_option(time);
        outcome
    }
}

fn decode_text(text: &[u8]) -> Result<Option<DateTime<FixedOffset>>> {
    let text = std::str::from_utf8(text).map_err(|error| Error::decode(NAME, Boundary::Text, error))?;

    if text.is_empty() || text == "null" {
        return Ok(None);
    }

    let secs = parse::int_with_prefix(text).map_err(|error| Error::decode(NAME, Boundary::Text, error))?;
    from_secs(secs, Boundary::Text)
}

fn from_secs(secs: i64, boundary: Boundary) -> Result<Option<DateTime<FixedOffset>>> {
    unix::from_secs(secs)
        .map(Some)
        .map_err(|error| Error::decode(NAME, boundary, error))
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(time: DateTime<Tz>) -> Self {
        Self::from_time(time)
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
        if self.valid {
            write!(f, "{}", unix::to_secs(&self.time))
        } else {
            Ok(())
        }
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decode_text(s.as_bytes()).map(Self::from_option)
    }
}

impl Scan for Timestamp {
    fn scan(&mut self, src: Value) -> Result<()> {
        let result = match src {
            Value::Null => Ok(None),
            Value::Time(time) => Ok(Some(time)),
            other => Err(Error::type_mismatch(NAME, &other)),
        };

        self.store(result)
    }
}

impl ToValue for Timestamp {
    fn to_value(&self) -> Value {
        if self.valid { Value::Time(self.time) } else { Value::Null }
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.valid {
            serializer.serialize_i64(unix::to_secs(&self.time))
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<i64>::deserialize(deserializer)? {
            Some(secs) => unix::from_secs(secs).map(Self::from_time).map_err(serde_core::de::Error::custom),
            None => Ok(Self::default()),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::error::Error as StdError;
    use std::num::ParseIntError;

    use chrono::Utc;
    use rstest::rstest;
    use serde_json::error::Category;
    use tracing_test::traced_test;

    use super::*;
    use crate::RangeError;

    const STAMP_SECS: i64 = 1_356_124_881;
    const STAMP_JSON: &[u8] = b"1356124881";

    static_assertions::assert_impl_all!(Timestamp: Send, Sync, Copy, Default, Eq, Scan, ToValue, FromStr, Display);

    fn stamp_time() -> DateTime<FixedOffset> {
        DateTime::<Utc>::from_timestamp(STAMP_SECS, 0).unwrap().fixed_offset()
    }

    // 06:00 at +02:00 and 04:00 UTC are the same instant; 05:00 UTC is not.
    fn time_1() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2020-01-01T06:00:00+02:00").unwrap()
    }

    fn time_2() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2020-01-01T04:00:00Z").unwrap()
    }

    fn time_3() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2020-01-01T05:00:00Z").unwrap()
    }

    #[track_caller]
    fn assert_stamp(stamp: &Timestamp) {
        assert!(stamp.valid, "timestamp should be valid");
        assert_eq!(stamp.time, stamp_time());
    }

    #[track_caller]
    fn assert_null(stamp: &Timestamp) {
        assert!(!stamp.valid, "timestamp should be null");
        assert!(stamp.is_zero());
    }

    #[test]
    fn unmarshal_json() {
        let mut stamp = Timestamp::default();
        stamp.unmarshal_json(STAMP_JSON).unwrap();
        assert_stamp(&stamp);
        assert_eq!(stamp.time.timestamp(), STAMP_SECS);

        stamp.unmarshal_json(b"null").unwrap();
        assert_null(&stamp);
    }

    #[rstest]
    #[case::object(br#"{"Time":1356124881,"Valid":true}"#)]
    #[case::null_object(br#"{"Time":0,"Valid":false}"#)]
    #[case::bad_object(br#"{"hello": "world"}"#)]
    #[case::string(br#""2012-12-21T21:21:21Z""#)]
    #[case::quoted_number(br#""1356124881""#)]
    #[case::float(b"1356124881.5")]
    #[case::array(b"[1356124881]")]
    #[case::bool(b"true")]
    #[case::padded_null(b" null")]
    fn unmarshal_json_rejects_wrong_shape(#[case] input: &[u8]) {
        let mut stamp = Timestamp::from_time(stamp_time());

        let error = stamp.unmarshal_json(input).unwrap_err();

        assert!(error.is_decode());
        assert_null(&stamp);
        let source = error.source().unwrap().downcast_ref::<serde_json::Error>().unwrap();
        assert_eq!(source.classify(), Category::Data);
    }

    #[test]
    fn unmarshal_json_syntax_error() {
        let mut stamp = Timestamp::from_time(stamp_time());

        let error = stamp.unmarshal_json(b":)").unwrap_err();

        assert!(error.is_decode());
        assert_null(&stamp);
        let source = error.source().unwrap().downcast_ref::<serde_json::Error>().unwrap();
        assert_eq!(source.classify(), Category::Syntax);
    }

    #[test]
    fn unmarshal_json_out_of_range() {
        let mut stamp = Timestamp::default();

        let error = stamp.unmarshal_json(i64::MAX.to_string().as_bytes()).unwrap_err();

        assert!(error.is_decode());
        assert_null(&stamp);
        let source = error.source().unwrap().downcast_ref::<RangeError>().unwrap();
        assert_eq!(source.seconds(), i64::MAX);
    }

    #[test]
    fn marshal_json() {
        let mut stamp = Timestamp::from_time(stamp_time());
        assert_eq!(stamp.marshal_json(), STAMP_JSON);

        stamp.valid = false;
        assert_eq!(stamp.marshal_json(), b"null");
    }

    #[test]
    fn marshal_json_drops_offset_and_fraction() {
        let zoned = DateTime::parse_from_rfc3339("2012-12-21T23:21:21.999+02:00").unwrap();

        assert_eq!(Timestamp::from_time(zoned).marshal_json(), STAMP_JSON);
    }

    fn whole_seconds(time: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        DateTime::<Utc>::from_timestamp(time.timestamp(), 0).unwrap().fixed_offset()
    }

    #[rstest]
    #[case::epoch(unix::zero_time())]
    #[case::stamp(stamp_time())]
    #[case::other_offset(time_1())]
    #[case::pre_epoch_fraction(DateTime::<Utc>::from_timestamp(-86_399, 250_000_000).unwrap().fixed_offset())]
    #[case::min(DateTime::<Utc>::MIN_UTC.fixed_offset())]
    #[case::max(DateTime::<Utc>::MAX_UTC.fixed_offset())]
    fn json_roundtrip(#[case] time: DateTime<FixedOffset>) {
        let original = Timestamp::from_time(time);
        let encoded = original.marshal_json();

        let mut decoded = Timestamp::default();
        decoded.unmarshal_json(&encoded).unwrap();

        assert!(decoded.equal(&Timestamp::from_time(whole_seconds(time))));
        assert_eq!(decoded.time.offset().local_minus_utc(), 0);
        assert_eq!(decoded.marshal_json(), encoded);
    }

    #[rstest]
    #[case::epoch(unix::zero_time())]
    #[case::stamp(stamp_time())]
    #[case::other_offset(time_1())]
    #[case::pre_epoch_fraction(DateTime::<Utc>::from_timestamp(-86_399, 250_000_000).unwrap().fixed_offset())]
    #[case::min(DateTime::<Utc>::MIN_UTC.fixed_offset())]
    #[case::max(DateTime::<Utc>::MAX_UTC.fixed_offset())]
    fn text_roundtrip(#[case] time: DateTime<FixedOffset>) {
        let original = Timestamp::from_time(time);
        let encoded = original.marshal_text();

        let mut decoded = Timestamp::default();
        decoded.unmarshal_text(&encoded).unwrap();

        assert!(decoded.equal(&Timestamp::from_time(whole_seconds(time))));
        assert_eq!(decoded.time.offset().local_minus_utc(), 0);
        assert_eq!(decoded.marshal_text(), encoded);
    }

    #[test]
    fn zoned_roundtrip_is_equal_not_exact() {
        let original = Timestamp::from_time(time_1());

        let mut decoded = Timestamp::default();
        decoded.unmarshal_json(&original.marshal_json()).unwrap();

        assert!(decoded.equal(&original));
        assert!(!decoded.exact_equal(&original));
    }

    #[rstest]
    #[case::empty(b"")]
    #[case::legacy_null(b"null")]
    fn unmarshal_text_null(#[case] input: &[u8]) {
        let mut stamp = Timestamp::from_time(stamp_time());

        stamp.unmarshal_text(input).unwrap();

        assert_null(&stamp);
        assert_eq!(stamp.marshal_text(), b"");
    }

    #[rstest]
    #[case::hex(b"0x50D4D2D1", STAMP_SECS)]
    #[case::octal(b"0o12065151321", STAMP_SECS)]
    #[case::negative(b"-86400", -86_400)]
    #[case::separated(b"1_356_124_881", STAMP_SECS)]
    #[case::separated_hex(b"0x50D4_D2D1", STAMP_SECS)]
    fn unmarshal_text_prefixed(#[case] input: &[u8], #[case] secs: i64) {
        let mut stamp = Timestamp::default();

        stamp.unmarshal_text(input).unwrap();

        assert!(stamp.valid);
        assert_eq!(stamp.time.timestamp(), secs);
    }

    #[test]
    fn unmarshal_text_invalid() {
        let mut stamp = Timestamp::from_time(stamp_time());

        let error = stamp.unmarshal_text(b"hello world").unwrap_err();

        assert!(error.is_decode());
        assert_null(&stamp);
        assert!(error.source().unwrap().downcast_ref::<ParseIntError>().is_some());
    }

    #[rstest]
    #[case::leading(b"_1356124881")]
    #[case::trailing(b"1356124881_")]
    #[case::doubled(b"1356__124881")]
    #[case::after_prefix_doubled(b"0x__50D4D2D1")]
    fn unmarshal_text_misplaced_underscore(#[case] input: &[u8]) {
        let mut stamp = Timestamp::from_time(stamp_time());

        let error = stamp.unmarshal_text(input).unwrap_err();

        assert!(error.is_decode());
        assert_null(&stamp);
    }

    #[test]
    fn unmarshal_text_not_utf8() {
        let mut stamp = Timestamp::default();

        let error = stamp.unmarshal_text(&[0xff, 0xfe]).unwrap_err();

        assert!(error.is_decode());
        assert!(error.source().unwrap().downcast_ref::<std::str::Utf8Error>().is_some());
    }

    #[test]
    fn display_and_parse() {
        let stamp: Timestamp = "1356124881".parse().unwrap();
        assert_stamp(&stamp);
        assert_eq!(stamp.to_string(), "1356124881");

        let null: Timestamp = "".parse().unwrap();
        assert_null(&null);
        assert_eq!(null.to_string(), "");

        "yesterday".parse::<Timestamp>().unwrap_err();
    }

    #[test]
    fn from_time() {
        assert_stamp(&Timestamp::from_time(stamp_time()));
        assert_stamp(&Timestamp::from(stamp_time()));
    }

    #[test]
    fn from_time_keeps_offset() {
        let stamp = Timestamp::from_time(time_1());

        assert_eq!(stamp.time.offset().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn from_option() {
        assert_stamp(&Timestamp::from_option(Some(stamp_time())));
        assert_null(&Timestamp::from_option(None));
    }

    #[test]
    fn set_valid() {
        let mut stamp = Timestamp::new(DateTime::default(), false);
        assert_null(&stamp);

        stamp.set_valid(stamp_time());
        assert_stamp(&stamp);
    }

    #[test]
    fn as_option() {
        let stamp = Timestamp::from_time(stamp_time());
        assert_eq!(stamp.as_option(), Some(&stamp_time()));

        let null = Timestamp::new(stamp_time(), false);
        assert_eq!(null.as_option(), None);
    }

    #[test]
    fn scan_and_value() {
        let mut stamp = Timestamp::default();
        stamp.scan(Value::Time(stamp_time())).unwrap();
        assert_stamp(&stamp);
        assert_eq!(stamp.to_value(), Value::Time(stamp_time()));

        let mut null = Timestamp::from_time(stamp_time());
        null.scan(Value::Null).unwrap();
        assert_null(&null);
        assert_eq!(null.to_value(), Value::Null);
    }

    #[rstest]
    #[case::int(Value::Int(42))]
    #[case::text(Value::Text("1356124881".to_owned()))]
    #[case::bytes(Value::Bytes(b"1356124881".to_vec()))]
    #[case::float(Value::Float(1.0))]
    fn scan_rejects_foreign_kinds(#[case] value: Value) {
        let mut stamp = Timestamp::from_time(stamp_time());

        let error = stamp.scan(value).unwrap_err();

        assert!(error.is_type_mismatch());
        assert_eq!(error.target(), "Timestamp");
        assert_null(&stamp);
    }

    #[traced_test]
    #[test]
    fn scan_mismatch_is_logged() {
        let mut stamp = Timestamp::default();

        stamp.scan(Value::Int(42)).unwrap_err();

        assert!(logs_contain("unsupported type for Timestamp: int"));
    }

    #[test]
    fn value_or_zero() {
        let stamp = Timestamp::from_time(stamp_time());
        assert_eq!(stamp.value_or_zero(), stamp.time);

        let mut null = stamp;
        null.valid = false;
        assert_eq!(null.value_or_zero(), unix::zero_time());
    }

    #[test]
    fn is_zero() {
        assert!(!Timestamp::from_time(stamp_time()).is_zero());
        assert!(!Timestamp::from_time(unix::zero_time()).is_zero());
        assert!(Timestamp::from_option(None).is_zero());
    }

    #[rstest]
    #[case::both_null(Timestamp::new(time_1(), false), Timestamp::new(time_2(), false), true)]
    #[case::both_null_different(Timestamp::new(time_1(), false), Timestamp::new(time_3(), false), true)]
    #[case::same_instant(Timestamp::new(time_1(), true), Timestamp::new(time_2(), true), true)]
    #[case::identical(Timestamp::new(time_1(), true), Timestamp::new(time_1(), true), true)]
    #[case::valid_and_null(Timestamp::new(time_1(), true), Timestamp::new(time_2(), false), false)]
    #[case::null_and_valid(Timestamp::new(time_1(), false), Timestamp::new(time_2(), true), false)]
    #[case::different_instant(Timestamp::new(time_1(), true), Timestamp::new(time_3(), true), false)]
    fn equal(#[case] a: Timestamp, #[case] b: Timestamp, #[case] expected: bool) {
        assert_eq!(a.equal(&b), expected);
        assert_eq!(a == b, expected);
    }

    #[rstest]
    #[case::both_null(Timestamp::new(time_1(), false), Timestamp::new(time_1(), false), true)]
    #[case::both_null_different(Timestamp::new(time_1(), false), Timestamp::new(time_2(), false), true)]
    #[case::identical(Timestamp::new(time_1(), true), Timestamp::new(time_1(), true), true)]
    #[case::valid_and_null(Timestamp::new(time_1(), true), Timestamp::new(time_1(), false), false)]
    #[case::null_and_valid(Timestamp::new(time_1(), false), Timestamp::new(time_1(), true), false)]
    #[case::same_instant_other_offset(Timestamp::new(time_1(), true), Timestamp::new(time_2(), true), false)]
    #[case::different_instant(Timestamp::new(time_1(), true), Timestamp::new(time_3(), true), false)]
    fn exact_equal(#[case] a: Timestamp, #[case] b: Timestamp, #[case] expected: bool) {
        assert_eq!(a.exact_equal(&b), expected);
    }

    #[test]
    fn serde_json_roundtrip() {
        let stamp = Timestamp::from_time(stamp_time());
        let json = serde_json::to_string(&stamp).unwrap();
        assert_eq!(json, "1356124881");

        let decoded: Timestamp = serde_json::from_str(&json).unwrap();
        assert_stamp(&decoded);

        let null: Timestamp = serde_json::from_str("null").unwrap();
        assert_null(&null);
        assert_eq!(serde_json::to_string(&null).unwrap(), "null");
    }

    #[test]
    fn serde_json_rejects_object() {
        serde_json::from_str::<Timestamp>(r#"{"Time":1356124881,"Valid":true}"#).unwrap_err();
    }

    #[test]
    fn serde_json_out_of_range() {
        let error = serde_json::from_str::<Timestamp>("9223372036854775807").unwrap_err();

        assert!(error.to_string().contains("outside the representable range"));
    }
}
