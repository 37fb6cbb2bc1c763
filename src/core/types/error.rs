//! Error types for debug-bridge operations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Main error type for bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Connection error: {reason}")]
    Connection {
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("No response within {} ms", .timeout.as_millis())]
    TransportTimeout { timeout: Duration },

    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },

    #[error("Invalid address spec: {0}")]
    InvalidAddressSpec(String),

    #[error("Not connected to the debug bridge")]
    NotConnected,

    #[error("Invalid value type: {0}")]
    InvalidValueType(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Coarse classification of a [`BridgeError`], cheap to copy into events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Connection,
    Timeout,
    MalformedResponse,
    InvalidAddressSpec,
    NotConnected,
    InvalidValueType,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Connection => "ConnectionError",
            ErrorKind::Timeout => "TimeoutError",
            ErrorKind::MalformedResponse => "MalformedResponse",
            ErrorKind::InvalidAddressSpec => "InvalidAddressSpec",
            ErrorKind::NotConnected => "Invalid",
            ErrorKind::InvalidValueType => "InvalidValueType",
            ErrorKind::Io => "IOError",
        };
        f.write_str(name)
    }
}

impl BridgeError {
    /// Creates a connection error without an underlying I/O cause
    pub fn connection(reason: impl Into<String>) -> Self {
        BridgeError::Connection {
            reason: reason.into(),
            source: None,
        }
    }

    /// Creates a connection error caused by an I/O failure
    pub fn connection_io(reason: impl Into<String>, source: std::io::Error) -> Self {
        BridgeError::Connection {
            reason: reason.into(),
            source: Some(source),
        }
    }

    /// Creates a receive timeout error
    pub fn timeout(timeout: Duration) -> Self {
        BridgeError::TransportTimeout { timeout }
    }

    /// Creates a malformed response error
    pub fn malformed(reason: impl Into<String>) -> Self {
        BridgeError::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Creates an invalid address spec error
    pub fn invalid_spec(reason: impl Into<String>) -> Self {
        BridgeError::InvalidAddressSpec(reason.into())
    }

    /// Returns the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::Connection { .. } => ErrorKind::Connection,
            BridgeError::TransportTimeout { .. } => ErrorKind::Timeout,
            BridgeError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            BridgeError::InvalidAddressSpec(_) => ErrorKind::InvalidAddressSpec,
            BridgeError::NotConnected => ErrorKind::NotConnected,
            BridgeError::InvalidValueType(_) => ErrorKind::InvalidValueType,
            BridgeError::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether the stream can no longer be trusted after this error.
    ///
    /// A timed-out or garbled frame leaves the byte stream at an unknown
    /// position, so the only safe recovery is a full reconnect.
    pub fn is_connection_fatal(&self) -> bool {
        matches!(
            self,
            BridgeError::Connection { .. }
                | BridgeError::TransportTimeout { .. }
                | BridgeError::MalformedResponse { .. }
                | BridgeError::Io(_)
        )
    }
}
