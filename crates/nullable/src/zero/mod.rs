// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Nullable types where null and the zero value are the same thing.
//!
//! Constructing or decoding `0`, `""`, `false` or the Unix epoch produces a null value,
//! and null encodes as that zero value rather than as JSON `null`. Drivers still see
//! [`Value::Null`][crate::driver::Value::Null] for zero values, so an empty column
//! stays `NULL` in the database.
//!
//! Use the [`null`][crate::null] family when a zero value must remain distinguishable
//! from null. Values convert from their `null` counterparts with [`From`].
//!
//! # Examples
//!
//! ```
//! use nullable::zero::Text;
//!
//! let empty = Text::from("");
//! assert!(!empty.valid);
//! assert_eq!(empty.marshal_json(), br#""""#);
//! assert_eq!(empty, Text::default());
//! ```

mod bool;
mod float;
mod int;
mod text;
mod timestamp;

pub use self::bool::Bool;
pub use float::Float;
pub use int::Int;
pub use text::Text;
pub use timestamp::Timestamp;
