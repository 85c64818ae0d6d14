//! Critical telemetry payload (panic-free).
//!
//! Protected frame layout:
//! - bytes[0..2]: rpm, u16 little-endian
//! - byte[2]: coolant temperature
//! - byte[3]: fuel level
//! - byte[4]: authentication tag over bytes[0..4]
//! - bytes[5..8]: padding, never authenticated

use bytes::{Buf, BufMut};

use crate::auth::Authenticator;
use crate::error::{CanGateError, Result};

/// Encoded size of [`CriticalPayload`].
pub const BASE_LEN: usize = 4;

/// Offset of the authentication tag.
pub const TAG_OFFSET: usize = BASE_LEN;

/// Smallest payload that can carry base + tag.
pub const MIN_PROTECTED_LEN: usize = BASE_LEN + 1;

/// Length of the frame a conforming sender emits (base + tag + padding).
pub const PROTECTED_FRAME_LEN: usize = 8;

/// Decoded critical telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriticalPayload {
    pub rpm: u16,
    pub coolant_temp: u8,
    pub fuel_level: u8,
}

impl CriticalPayload {
    pub fn new(rpm: u16, coolant_temp: u8, fuel_level: u8) -> Self {
        Self {
            rpm,
            coolant_temp,
            fuel_level,
        }
    }

    /// Serialize to the fixed 4-byte layout.
    pub fn encode(&self) -> [u8; BASE_LEN] {
        let mut out = [0u8; BASE_LEN];
        let mut buf = &mut out[..];
        buf.put_u16_le(self.rpm);
        buf.put_u8(self.coolant_temp);
        buf.put_u8(self.fuel_level);
        out
    }

    /// Decode from the first 4 bytes of `raw`. Trailing bytes are ignored.
    pub fn decode(mut raw: &[u8]) -> Result<Self> {
        if raw.remaining() < BASE_LEN {
            return Err(CanGateError::BadRequest(format!(
                "critical payload needs {BASE_LEN} bytes, got {}",
                raw.remaining()
            )));
        }

        let rpm = raw.get_u16_le();
        let coolant_temp = raw.get_u8();
        let fuel_level = raw.get_u8();

        Ok(Self {
            rpm,
            coolant_temp,
            fuel_level,
        })
    }

    /// Build the 8-byte protected frame: base, tag, zero padding.
    pub fn to_protected_frame(&self, auth: &dyn Authenticator) -> [u8; PROTECTED_FRAME_LEN] {
        let base = self.encode();
        let mut out = [0u8; PROTECTED_FRAME_LEN];
        let mut buf = &mut out[..];
        buf.put_slice(&base);
        buf.put_u8(auth.tag(&base));
        out
    }
}

/// Split a protected payload into its base bytes and received tag.
///
/// Returns `None` when the payload is shorter than [`MIN_PROTECTED_LEN`].
pub fn split_protected(raw: &[u8]) -> Option<(&[u8], u8)> {
    if raw.len() < MIN_PROTECTED_LEN {
        return None;
    }
    let tag = *raw.get(TAG_OFFSET)?;
    raw.get(..BASE_LEN).map(|base| (base, tag))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::XorChecksum;

    #[test]
    fn encode_is_little_endian() {
        let p = CriticalPayload::new(2500, 90, 70);
        assert_eq!(p.encode(), [0xC4, 0x09, 90, 70]);
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        let p = CriticalPayload::decode(&[0x70, 0x17, 40, 5, 0xAA, 0, 0, 0]).unwrap();
        assert_eq!(p, CriticalPayload::new(6000, 40, 5));
    }

    #[test]
    fn decode_rejects_short_input() {
        let err = CriticalPayload::decode(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.code().as_str(), "BAD_REQUEST");
    }

    #[test]
    fn protected_frame_carries_tag_and_zero_padding() {
        let auth = XorChecksum::new(0x5A);
        let p = CriticalPayload::new(2500, 90, 70);
        let frame = p.to_protected_frame(&auth);

        assert_eq!(&frame[..4], &p.encode());
        assert_eq!(frame[4], auth.tag(&p.encode()));
        assert_eq!(&frame[5..], &[0, 0, 0]);
    }

    #[test]
    fn split_needs_five_bytes() {
        assert!(split_protected(&[1, 2, 3, 4]).is_none());
        let (base, tag) = split_protected(&[1, 2, 3, 4, 9]).unwrap();
        assert_eq!(base, &[1, 2, 3, 4]);
        assert_eq!(tag, 9);
    }
}
