//! Interrupt handling for the supervisor.

use std::future::Future;
use std::io;

/// Resolve when `signal` reports an interrupt.
///
/// If the handler cannot be installed this never resolves, so the caller
/// keeps running until its other exit condition (the deadline).
pub async fn wait_for_interrupt<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("ctrl-c received"),
        Err(e) => {
            tracing::warn!(error = %e, "ctrl-c handler unavailable, waiting for deadline");
            std::future::pending::<()>().await
        }
    }
}
