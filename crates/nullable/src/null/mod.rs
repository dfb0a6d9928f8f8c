// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Nullable types where null is distinct from the zero value.
//!
//! A valid `0`, `""`, `false` or Unix epoch is a real value here: it encodes as itself
//! and scans back as valid. Null encodes as JSON `null`, as empty text and as
//! [`Value::Null`][crate::driver::Value::Null].
//!
//! Use the [`zero`][crate::zero] family instead when the schema treats zero values and
//! null as the same thing.
//!
//! # Examples
//!
//! ```
//! use nullable::null::Int;
//!
//! let zero = Int::from(0);
//! let null = Int::default();
//!
//! assert_eq!(zero.marshal_json(), b"0");
//! assert_eq!(null.marshal_json(), b"null");
//! assert_ne!(zero, null);
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
