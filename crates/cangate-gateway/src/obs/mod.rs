//! Lightweight in-process metrics.
//!
//! Counters and histograms are stored as atomics, rendered by the `/metrics`
//! handler, and read back directly by tests to assert which admission
//! checks actually ran.

pub mod metrics;

pub use metrics::GatewayMetrics;
