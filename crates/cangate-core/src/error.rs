//! Shared error type across canGate crates.

use thiserror::Error;

/// Stable error codes (logs, tests, ops output).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid input / malformed frame or config.
    BadRequest,
    /// Payload exceeds the bus maximum.
    PayloadTooLarge,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Transport has no more producers.
    TransportClosed,
    /// Transport send/recv failure.
    Transport,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and test assertions.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::TransportClosed => "TRANSPORT_CLOSED",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CanGateError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum CanGateError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("transport closed")]
    TransportClosed,
    #[error("transport: {0}")]
    Transport(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl CanGateError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            CanGateError::BadRequest(_) => ErrorCode::BadRequest,
            CanGateError::PayloadTooLarge => ErrorCode::PayloadTooLarge,
            CanGateError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            CanGateError::TransportClosed => ErrorCode::TransportClosed,
            CanGateError::Transport(_) => ErrorCode::Transport,
            CanGateError::Internal(_) => ErrorCode::Internal,
        }
    }
}
