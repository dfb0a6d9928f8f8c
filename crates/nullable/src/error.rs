// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

use crate::driver::Value;

/// The result for fallible operations that use the [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error produced when a nullable value cannot cross a boundary.
///
/// Three kinds of failure exist:
///
/// * **Type mismatch** - a database scan received a [`Value`] kind that the target
///   type does not accept. See [`Error::is_type_mismatch`].
/// * **Decode** - JSON, text or driver input did not parse into the target type. The
///   underlying parse failure is available through [`std::error::Error::source`] and
///   can be downcast, for example to [`serde_json::Error`] or [`std::num::ParseIntError`].
///   See [`Error::is_decode`].
/// * **Encode** - a value has no JSON representation, such as a NaN float.
///   See [`Error::is_encode`].
///
/// # Examples
///
/// ```
/// use std::error::Error as _;
/// use nullable::null::Timestamp;
///
/// let mut stamp = Timestamp::default();
/// let error = stamp.unmarshal_text(b"hello world").unwrap_err();
///
/// assert!(error.is_decode());
/// assert!(error.source().unwrap().downcast_ref::<std::num::ParseIntError>().is_some());
/// assert!(!stamp.valid);
/// ```
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(ErrorKind);

#[derive(Debug, thiserror::Error)]
enum ErrorKind {
    #[error("unsupported type for {target}: {found}")]
    TypeMismatch { target: &'static str, found: &'static str },

    #[error("couldn't unmarshal {boundary} into {target}: {source}")]
    Decode {
        target: &'static str,
        boundary: Boundary,
        source: Cause,
    },

    #[error("couldn't marshal {target} to JSON: {message}")]
    Encode {
        target: &'static str,
        message: Cow<'static, str>,
    },
}

impl ErrorKind {
    #[cfg(any(feature = "logs", test))]
    const fn label(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::Decode { .. } => "decode",
            Self::Encode { .. } => "encode",
        }
    }
}

/// The boundary a decode failure happened at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    Json,
    Text,
    Driver,
}

impl Display for Boundary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "JSON",
            Self::Text => "text",
            Self::Driver => "driver value",
        })
    }
}

impl Error {
    fn from_kind(kind: ErrorKind) -> Self {
        let error = Self(kind);

        #[cfg(any(feature = "logs", test))]
        error.emit();

        error
    }

    pub(crate) fn type_mismatch(target: &'static str, found: &Value) -> Self {
        Self::from_kind(ErrorKind::TypeMismatch {
            target,
            found: found.kind_name(),
        })
    }

    pub(crate) fn decode(target: &'static str, boundary: Boundary, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::from_kind(ErrorKind::Decode {
            target,
            boundary,
            source: Box::new(source),
        })
    }

    pub(crate) fn encode(target: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_kind(ErrorKind::Encode {
            target,
            message: message.into(),
        })
    }

    /// Returns `true` if a database scan received a value kind the target type does not accept.
    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.0, ErrorKind::TypeMismatch { .. })
    }

    /// Returns `true` if JSON, text or driver input could not be decoded.
    ///
    /// The underlying parse failure is available through [`std::error::Error::source`].
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self.0, ErrorKind::Decode { .. })
    }

    /// Returns `true` if a value could not be encoded to JSON.
    #[must_use]
    pub fn is_encode(&self) -> bool {
        matches!(self.0, ErrorKind::Encode { .. })
    }

    /// Returns the name of the nullable type that produced this error, for example `"Timestamp"`.
    #[must_use]
    pub fn target(&self) -> &'static str {
        match &self.0 {
            ErrorKind::TypeMismatch { target, .. } | ErrorKind::Decode { target, .. } | ErrorKind::Encode { target, .. } => *target,
        }
    }

    #[cfg(any(feature = "logs", test))]
    fn emit(&self) {
        tracing::event!(
            name: "nullable.error",
            tracing::Level::DEBUG,
            nullable.target = self.target(),
            nullable.kind = self.0.label(),
            error.message = %self,
        );
    }
}

/// A number of seconds since the Unix epoch that cannot be represented as an instant.
///
/// Returned as the [`source`][std::error::Error::source] of a decode [`Error`] when JSON
/// or text input holds a valid 64-bit integer that lies outside the range supported by
/// [`chrono::DateTime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{seconds} seconds since the Unix epoch is outside the representable range")]
pub struct RangeError {
    seconds: i64,
}

impl RangeError {
    pub(crate) const fn new(seconds: i64) -> Self {
        Self { seconds }
    }

    /// Returns the out-of-range number of seconds.
    #[must_use]
    pub fn seconds(&self) -> i64 {
        self.seconds
    }
}
