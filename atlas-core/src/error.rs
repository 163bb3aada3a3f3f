//! Error types for ATLAS client operations

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Shown when the backend fails without a usable `message`.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong while contacting the ATLAS server.";

/// What went wrong at the transport boundary.
///
/// The UI shows only [`ErrorInfo::message`], but the kind is kept so logs and
/// tests can tell the failure modes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    /// Host unreachable, connection reset, timeout.
    Network,
    /// Non-2xx status.
    Http { status: u16 },
    /// Success or error body could not be decoded.
    Decode,
    /// The client refused to send the request.
    InvalidRequest,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Network => f.write_str("network"),
            ErrorKind::Http { status } => write!(f, "http {}", status),
            ErrorKind::Decode => f.write_str("decode"),
            ErrorKind::InvalidRequest => f.write_str("invalid request"),
        }
    }
}

/// Normalized failure surfaced to the view-state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorInfo {
    /// Build an error, substituting [`GENERIC_ERROR_MESSAGE`] for blank text.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self { kind, message }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Http { status }, message)
    }

    /// HTTP failure whose body carried no usable message.
    pub fn http_generic(status: u16) -> Self {
        Self::new(ErrorKind::Http { status }, GENERIC_ERROR_MESSAGE)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Http { status } => Some(status),
            _ => None,
        }
    }
}

impl From<ValidationError> for ErrorInfo {
    fn from(err: ValidationError) -> Self {
        ErrorInfo::invalid_request(err.to_string())
    }
}

/// Request validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Field {field} must not be blank")]
    BlankField { field: String },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_message_falls_back_to_generic() {
        let err = ErrorInfo::http(502, "   ");
        assert_eq!(err.message, GENERIC_ERROR_MESSAGE);
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_display_is_message_only() {
        let err = ErrorInfo::http(500, "boom");
        assert_eq!(format!("{}", err), "boom");
        assert_eq!(format!("{}", err.kind), "http 500");
    }

    #[test]
    fn test_validation_error_maps_to_invalid_request() {
        let err: ErrorInfo = ValidationError::BlankField {
            field: "topic".to_string(),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::InvalidRequest);
        assert!(err.message.contains("topic"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_kind_serializes_tagged() {
        let json = serde_json::to_value(ErrorKind::Http { status: 404 }).unwrap();
        assert_eq!(json["kind"], "http");
        assert_eq!(json["status"], 404);
    }
}
