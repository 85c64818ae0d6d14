//! Admission policy (per-identifier rate windows + payload authentication).
//!
//! Compiles configuration into an [`AdmissionEngine`] that the receive loop
//! calls synchronously for every frame.

pub mod engine;
pub mod rate;

pub use engine::{Action, AdmissionEngine, Reason, Verdict};
pub use rate::{RateCheck, RateTracker};
