//! Bus protocol modules (frames + protected telemetry payload).
//!
//! - `frame`: identifier/payload bounds for a received bus frame.
//! - `payload`: the fixed 4-byte critical telemetry layout and the 8-byte
//!   protected frame format that carries it.
//!
//! Parsers are panic-free: short or oversized input is reported as
//! `CanGateError` rather than indexing raw buffers.

pub mod frame;
pub mod payload;
