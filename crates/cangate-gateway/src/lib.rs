//! canGate gateway library entry.
//!
//! Wires configuration, the admission policy (rate windows + payload
//! authentication), the bus transport loop, metrics, and the demo traffic
//! simulator. Consumed by the binary (`main.rs`) and integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
pub mod sim;
pub mod transport;
