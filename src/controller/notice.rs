//! One-line operator messages for errors

use crate::core::types::{BridgeError, ErrorKind};
use serde::Serialize;
use std::fmt;

/// A short title and message suitable for an error dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorNotice {
    pub title: String,
    pub message: String,
}

impl OperatorNotice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        OperatorNotice {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn for_kind(kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::Timeout => "Connection timed out.",
            ErrorKind::MalformedResponse => "Connection lost while reading from switch.",
            ErrorKind::Connection | ErrorKind::Io => "Could not communicate with switch.",
            ErrorKind::NotConnected => "Not connected to switch.",
            ErrorKind::InvalidAddressSpec => "Invalid pointer or address.",
            ErrorKind::InvalidValueType => "Unsupported value type.",
        };
        OperatorNotice::new(kind.to_string(), message)
    }

    pub fn from_error(error: &BridgeError) -> Self {
        Self::for_kind(error.kind())
    }
}

impl From<&BridgeError> for OperatorNotice {
    fn from(error: &BridgeError) -> Self {
        OperatorNotice::from_error(error)
    }
}

impl fmt::Display for OperatorNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_notice() {
        let notice = OperatorNotice::from_error(&BridgeError::timeout(Duration::from_secs(1)));
        assert_eq!(notice.to_string(), "TimeoutError: Connection timed out.");
    }

    #[test]
    fn test_not_connected_notice() {
        let notice = OperatorNotice::from(&BridgeError::NotConnected);
        assert_eq!(notice.title, "Invalid");
        assert_eq!(notice.message, "Not connected to switch.");
    }

    #[test]
    fn test_every_kind_has_single_line() {
        for kind in [
            ErrorKind::Connection,
            ErrorKind::Timeout,
            ErrorKind::MalformedResponse,
            ErrorKind::InvalidAddressSpec,
            ErrorKind::NotConnected,
            ErrorKind::InvalidValueType,
            ErrorKind::Io,
        ] {
            let notice = OperatorNotice::for_kind(kind);
            assert!(!notice.message.is_empty());
            assert!(!notice.to_string().contains('\n'));
        }
    }
}
