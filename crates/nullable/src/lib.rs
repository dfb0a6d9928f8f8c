// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Nullable scalar and timestamp types that round-trip through database drivers, JSON
//! and text.
//!
//! A native `i64` or `String` cannot tell "no value" apart from `0` or `""` when it
//! crosses into a nullable database column or an optional JSON field. The types in this
//! crate pair a value with a `valid` flag and encode the absent case explicitly at every
//! boundary.
//!
//! # Quick Start
//!
//! ```
//! use chrono::DateTime;
//! use nullable::driver::{Scan, ToValue, Value};
//! use nullable::null::Timestamp;
//!
//! // A driver hands over a column value.
//! let mut created = Timestamp::default();
//! created.scan(Value::from(DateTime::from_timestamp(1_356_124_881, 0).unwrap()))?;
//!
//! // The same value goes out to an API as Unix seconds.
//! assert_eq!(created.marshal_json(), b"1356124881");
//!
//! // A NULL column stays null all the way through.
//! created.scan(Value::Null)?;
//! assert_eq!(created.marshal_json(), b"null");
//! assert_eq!(created.to_value(), Value::Null);
//!
//! # Ok::<(), nullable::Error>(())
//! ```
//!
//! # Families
//!
//! Two families with the same shape are provided, so each schema can pick the behavior
//! it needs:
//!
//! - [`null`] - null is distinct from the zero value. A valid `0` encodes as `0` and a
//!   null encodes as JSON `null`.
//! - [`zero`] - null and the zero value are the same thing. Zero values construct and
//!   decode as null, and null encodes as the zero value.
//!
//! Each family has [`Text`][null::Text], [`Int`][null::Int], [`Float`][null::Float],
//! [`Bool`][null::Bool] and [`Timestamp`][null::Timestamp].
//!
//! # Boundaries
//!
//! - **Database** - [`driver::Scan`] reads a [`driver::Value`] and [`driver::ToValue`]
//!   produces one. Concrete drivers map `Value` onto their own column types.
//! - **JSON** - `marshal_json` / `unmarshal_json` on raw bytes, plus `serde`
//!   `Serialize` / `Deserialize` so the types work as fields of derived structs.
//!   Values are always bare JSON scalars, never objects.
//! - **Text** - `marshal_text` / `unmarshal_text`, mirrored by `Display` / `FromStr`.
//!
//! Timestamps cross the JSON and text boundaries as whole seconds since the Unix
//! epoch.
//!
//! # Errors
//!
//! All fallible operations return [`Error`], which tells a driver value of the wrong
//! kind apart from content that failed to decode. The underlying cause is available
//! through [`std::error::Error::source`].
//!
//! # Features
//!
//! - `logs` - emits a `tracing` event at `DEBUG` level for every error produced.

pub mod driver;
mod error;
pub mod null;
mod parse;
mod unix;
pub mod zero;

pub use error::{Error, RangeError, Result};
