//! Transport layer (frame source/sink + receive loop).
//!
//! `bus` holds the collaborator traits and the in-process channel bus;
//! `gateway` drives the admission engine from a source into a sink;
//! `signal` turns ctrl-c into a supervisor exit condition.

pub mod bus;
pub mod gateway;
pub mod signal;

pub use bus::{BusSender, ChannelSink, ChannelSource, FrameSink, FrameSource};
pub use gateway::{Gateway, RunStats};
pub use signal::wait_for_interrupt;
