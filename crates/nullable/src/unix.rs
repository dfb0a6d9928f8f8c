// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Conversion between instants and whole seconds since the Unix epoch.
//!
//! The seconds are always counted in UTC. Fractional seconds are rounded down, so
//! half a second before the epoch is `-1`. Decoded instants carry a `+00:00` offset.

use chrono::{DateTime, FixedOffset, Utc};

use crate::RangeError;

/// The instant used for absent timestamps: the Unix epoch at `+00:00`.
pub(crate) fn zero_time() -> DateTime<FixedOffset> {
    DateTime::default()
}

pub(crate) fn to_secs(time: &DateTime<FixedOffset>) -> i64 {
    time.timestamp()
}

pub(crate) fn from_secs(secs: i64) -> Result<DateTime<FixedOffset>, RangeError> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|time| time.fixed_offset())
        .ok_or(RangeError::new(secs))
}
