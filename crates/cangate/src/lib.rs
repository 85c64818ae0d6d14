//! Top-level facade crate for canGate.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use cangate_core::*;
}

pub mod gateway {
    pub use cangate_gateway::*;
}
