//! canGate core: bus-agnostic frame primitives, payload authentication, and
//! the shared error surface.
//!
//! This crate defines the wire-level contracts shared by the gateway, the
//! traffic simulator, and test tooling. It carries no runtime or transport
//! dependencies so it can be reused on the sender side as well.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed frames surface as `CanGateError`/`Result` so a hostile bus
//! cannot crash the process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod auth;
pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{CanGateError, Result};
