//! Receive loop.
//!
//! One frame at a time: receive (bounded timeout), evaluate synchronously,
//! forward or drop. The shutdown signal is checked between frames and raced
//! against the receive. The source is closed on every exit path.

use std::time::Duration;

use tokio::sync::{oneshot, watch};

use cangate_core::error::CanGateError;

use crate::policy::AdmissionEngine;

use super::bus::{FrameSink, FrameSource};

/// Counters for one `run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub received: u64,
    pub forwarded: u64,
    pub blocked: u64,
    pub send_failures: u64,
}

pub struct Gateway<S, K> {
    engine: AdmissionEngine,
    source: S,
    sink: K,
    recv_timeout: Duration,
}

impl<S: FrameSource, K: FrameSink> Gateway<S, K> {
    pub fn new(engine: AdmissionEngine, source: S, sink: K, recv_timeout: Duration) -> Self {
        Self {
            engine,
            source,
            sink,
            recv_timeout,
        }
    }

    /// Run until shutdown is signalled or the transport closes.
    ///
    /// `ready` fires once the loop is about to receive.
    pub async fn run(
        mut self,
        ready: Option<oneshot::Sender<()>>,
        mut shutdown: watch::Receiver<bool>,
    ) -> RunStats {
        tracing::info!(
            protected_id = %format_args!("0x{:X}", self.engine.protected_id()),
            "gateway listening"
        );
        if let Some(ready) = ready {
            let _ = ready.send(());
        }

        let stats = self.pump(&mut shutdown).await;

        self.source.close();
        self.engine.metrics().set_draining();
        tracing::info!(
            received = stats.received,
            forwarded = stats.forwarded,
            blocked = stats.blocked,
            send_failures = stats.send_failures,
            "gateway shut down cleanly"
        );
        stats
    }

    async fn pump(&mut self, shutdown: &mut watch::Receiver<bool>) -> RunStats {
        let mut stats = RunStats::default();

        loop {
            if *shutdown.borrow() {
                break;
            }

            let received = tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    // Supervisor gone counts as shutdown.
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }

                r = self.source.recv(self.recv_timeout) => r,
            };

            let frame = match received {
                Ok(Some(frame)) => frame,
                Ok(None) => continue,
                Err(CanGateError::TransportClosed) => {
                    tracing::info!("transport closed");
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "receive failed");
                    continue;
                }
            };

            stats.received += 1;
            let verdict = self.engine.evaluate(&frame);
            if !verdict.is_forward() {
                stats.blocked += 1;
                continue;
            }

            stats.forwarded += 1;
            let id = frame.id;
            if let Err(e) = self.sink.send(frame).await {
                stats.send_failures += 1;
                self.engine.metrics().forward_errors.inc(&[("code", e.code().as_str())]);
                tracing::warn!(id = %format_args!("0x{id:X}"), error = %e, "forward failed");
            }
        }

        stats
    }
}
