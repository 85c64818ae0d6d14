//! Bus traffic simulation for the demo binary and scenario tests.
//!
//! - Legitimate ECU: a few correctly tagged frames at a slow interval.
//! - Attacker: spoofs the protected identifier with an inverted tag at a
//!   much higher rate.

pub mod senders;

pub use senders::{attacker_sender, legit_sender, SenderReport, SimPlan};
