use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;

/// Alpaca representation of an ASCOM error code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ASCOMErrorCode(i32);

/// The starting value for driver-specific error numbers.
const DRIVER_BASE: i32 = 0x500;
/// The maximum value for error numbers.
const MAX: i32 = 0xFFF;

impl ASCOMErrorCode {
    /// Wrap a raw error number as received from the server.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Get the driver-specific error code.
    ///
    /// Returns `Ok` with `0`-based driver error code if this is a driver error.
    /// Returns `Err` with raw error code if not a driver error.
    pub const fn as_driver_error(self) -> std::result::Result<i32, i32> {
        if self.0 >= DRIVER_BASE && self.0 <= MAX {
            Ok(self.0 - DRIVER_BASE)
        } else {
            Err(self.0)
        }
    }

    /// Get the raw error code.
    pub const fn raw(self) -> i32 {
        self.0
    }
}

/// Structured error reported by the remote device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("ASCOM error {code}: {message}")]
pub struct ASCOMError {
    /// Error number.
    #[serde(rename = "ErrorNumber", default)]
    pub code: ASCOMErrorCode,
    /// Error message.
    #[serde(rename = "ErrorMessage", default)]
    pub message: Cow<'static, str>,
}

impl ASCOMError {
    /// Create a new `ASCOMError` from given error code and a message.
    pub fn new(code: ASCOMErrorCode, message: impl std::fmt::Display) -> Self {
        Self {
            code,
            message: message.to_string().into(),
        }
    }
}

macro_rules! ascom_error_codes {
    ($(#[doc = $doc:literal] $name:ident = $value:literal,)*) => {
        impl ASCOMErrorCode {
            $(
                #[doc = $doc]
                pub const $name: Self = Self($value);
            )*
        }

        impl std::fmt::Debug for ASCOMErrorCode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match *self {
                    $(
                        Self::$name => f.write_str(stringify!($name)),
                    )*
                    _ => match self.as_driver_error() {
                        Ok(driver_code) => write!(f, "DRIVER_ERROR[{driver_code}]"),
                        Err(raw_code) => write!(f, "{raw_code:#X}"),
                    },
                }
            }
        }

        impl std::fmt::Display for ASCOMErrorCode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Debug::fmt(self, f)
            }
        }
    };
}

ascom_error_codes! {
    #[doc = "Success"]
    OK = 0,
    #[doc = "The requested action is not implemented in this driver"]
    ACTION_NOT_IMPLEMENTED = 0x40C,
    #[doc = "The requested operation can not be undertaken at this time"]
    INVALID_OPERATION = 0x40B,
    #[doc = "Invalid value"]
    INVALID_VALUE = 0x401,
    #[doc = "The attempted operation is invalid because the mount is currently in a Parked state"]
    INVALID_WHILE_PARKED = 0x408,
    #[doc = "The attempted operation is invalid because the mount is currently in a Slaved state"]
    INVALID_WHILE_SLAVED = 0x409,
    #[doc = "The communications channel is not connected"]
    NOT_CONNECTED = 0x407,
    #[doc = "Property or method not implemented"]
    NOT_IMPLEMENTED = 0x400,
    #[doc = "A value has not been set"]
    VALUE_NOT_SET = 0x402,
}

/// Kind of a request-level transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TransportErrorKind {
    /// The active timeout tier expired before the round trip completed.
    #[display("timeout")]
    Timeout,
    /// The connection was refused, reset or dropped.
    #[display("network")]
    Network,
}

/// Errors surfaced by the remote proxy.
///
/// Every failure is reported with full detail; nothing here is retried or
/// recovered from internally.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration, unreachable endpoint or rejected credentials.
    #[error("Couldn't connect to the remote server: {0}")]
    Connection(String),

    /// Request-level network failure or timeout.
    #[error("Transport {kind} error: {source}")]
    Transport {
        /// Whether this was a timeout or a network failure.
        kind: TransportErrorKind,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The response didn't have the expected type or shape.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The remote device reported an operational failure.
    #[error(transparent)]
    Remote(#[from] ASCOMError),

    /// The request was issued on a session that has already been closed.
    #[error("Session is closed")]
    SessionClosed,

    /// Local adapter state doesn't permit the operation.
    #[error("Invalid operation: {0}")]
    InvalidOperation(Cow<'static, str>),

    /// Reading or writing the persisted profile failed.
    #[error("Profile store failure: {0}")]
    Profile(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn transport(source: reqwest::Error) -> Self {
        Self::Transport {
            kind: if source.is_timeout() {
                TransportErrorKind::Timeout
            } else {
                TransportErrorKind::Network
            },
            source,
        }
    }

    pub(crate) fn profile(report: eyre::Report) -> Self {
        Self::Profile(report.into())
    }

    /// Error code reported by the remote device, if this is a remote error.
    pub const fn remote_code(&self) -> Option<ASCOMErrorCode> {
        match self {
            Self::Remote(err) => Some(err.code),
            _ => None,
        }
    }

    /// Whether this is a transport failure of the given kind.
    pub fn is_transport(&self, expected: TransportErrorKind) -> bool {
        matches!(self, Self::Transport { kind, .. } if *kind == expected)
    }
}

/// Result type for remote proxy operations.
pub type Result<T = ()> = std::result::Result<T, Error>;

/// Extracts the success type out of [`Result`] in declarative macros.
pub(crate) trait ResultOk {
    type Ok;
}

impl<T> ResultOk for Result<T> {
    type Ok = T;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_formatting() {
        assert_eq!(ASCOMErrorCode::NOT_CONNECTED.to_string(), "NOT_CONNECTED");
        assert_eq!(ASCOMErrorCode::new(0x502).to_string(), "DRIVER_ERROR[2]");
        assert_eq!(ASCOMErrorCode::new(0x4FE).to_string(), "0x4FE");
    }

    #[test]
    fn driver_error_range() {
        assert_eq!(ASCOMErrorCode::new(0x500).as_driver_error(), Ok(0));
        assert_eq!(ASCOMErrorCode::new(0xFFF).as_driver_error(), Ok(0xAFF));
        assert_eq!(ASCOMErrorCode::NOT_IMPLEMENTED.as_driver_error(), Err(0x400));
    }

    #[test]
    fn error_deserializes_with_defaults() -> eyre::Result<()> {
        let err = serde_json::from_str::<ASCOMError>(r#"{"ErrorNumber":1025}"#)?;
        assert_eq!(err.code, ASCOMErrorCode::INVALID_VALUE);
        assert_eq!(err.message, "");

        let ok = serde_json::from_str::<ASCOMError>(r#"{"Value":true}"#)?;
        assert_eq!(ok.code, ASCOMErrorCode::OK);
        Ok(())
    }

    #[test]
    fn remote_code_is_inspectable() {
        let err = Error::from(ASCOMError::new(ASCOMErrorCode::new(1025), "not connected"));
        assert_eq!(err.remote_code(), Some(ASCOMErrorCode::new(1025)));
        assert_eq!(Error::SessionClosed.remote_code(), None);
    }
}
