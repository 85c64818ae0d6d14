//! Received bus frame.

use std::time::Instant;

use bytes::Bytes;

use crate::error::{CanGateError, Result};

/// Largest identifier in the extended (29-bit) range.
pub const MAX_EXTENDED_ID: u32 = 0x1FFF_FFFF;

/// Largest standard (11-bit) identifier.
pub const MAX_STANDARD_ID: u32 = 0x7FF;

/// CAN FD payload ceiling.
pub const MAX_PAYLOAD_LEN: usize = 64;

/// A single frame as seen by the gateway.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Arbitration identifier.
    pub id: u32,
    /// Data bytes (zero-copy).
    pub payload: Bytes,
    /// Monotonic arrival time.
    pub timestamp: Instant,
}

impl Frame {
    /// Build a frame stamped with the current time.
    pub fn new(id: u32, payload: impl Into<Bytes>) -> Result<Self> {
        Self::at(id, payload, Instant::now())
    }

    /// Build a frame with an explicit arrival time.
    pub fn at(id: u32, payload: impl Into<Bytes>, timestamp: Instant) -> Result<Self> {
        if id > MAX_EXTENDED_ID {
            return Err(CanGateError::BadRequest(format!(
                "identifier 0x{id:X} exceeds 29-bit range"
            )));
        }
        let payload = payload.into();
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(CanGateError::PayloadTooLarge);
        }
        Ok(Self {
            id,
            payload,
            timestamp,
        })
    }

    /// True when the identifier needs the 29-bit extended format.
    pub fn is_extended(&self) -> bool {
        self.id > MAX_STANDARD_ID
    }

    /// Replace the arrival time (used by sources when a frame is received).
    pub fn restamp(mut self, timestamp: Instant) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_identifier_beyond_29_bits() {
        let err = Frame::new(MAX_EXTENDED_ID + 1, vec![0u8; 8]).unwrap_err();
        assert_eq!(err.code().as_str(), "BAD_REQUEST");
    }

    #[test]
    fn rejects_oversized_payload() {
        let err = Frame::new(0x200, vec![0u8; MAX_PAYLOAD_LEN + 1]).unwrap_err();
        assert_eq!(err.code().as_str(), "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn accepts_empty_and_full_payloads() {
        assert!(Frame::new(0x200, Vec::new()).is_ok());
        assert!(Frame::new(MAX_EXTENDED_ID, vec![0u8; MAX_PAYLOAD_LEN]).is_ok());
    }

    #[test]
    fn extended_flag_follows_identifier() {
        assert!(!Frame::new(0x200, Vec::new()).unwrap().is_extended());
        assert!(Frame::new(0x999, Vec::new()).unwrap().is_extended());
    }
}
