use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use cangate_core::error::{CanGateError, Result};
use cangate_core::protocol::frame::Frame;

/// Inbound side of a bus.
#[async_trait]
pub trait FrameSource: Send {
    /// Wait up to `timeout` for the next frame. `Ok(None)` means nothing
    /// arrived; `Err(TransportClosed)` means nothing ever will.
    async fn recv(&mut self, timeout: Duration) -> Result<Option<Frame>>;

    /// Release the underlying transport. Called exactly once by the loop.
    fn close(&mut self);
}

/// Outbound side of a bus. Must not wait on a slow consumer.
#[async_trait]
pub trait FrameSink: Send {
    async fn send(&mut self, frame: Frame) -> Result<()>;
}

/// Create a bounded in-process bus: cloneable producer handle + source.
pub fn channel(capacity: usize) -> (BusSender, ChannelSource) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (BusSender { tx }, ChannelSource { rx })
}

/// Producer handle onto a channel bus.
#[derive(Debug, Clone)]
pub struct BusSender {
    tx: mpsc::Sender<Frame>,
}

impl BusSender {
    /// Enqueue a frame, waiting for capacity (backpressure lands on producers).
    pub async fn send(&self, frame: Frame) -> Result<()> {
        self.tx
            .send(frame)
            .await
            .map_err(|_| CanGateError::TransportClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving end of a channel bus. Stamps arrival time on receipt.
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<Frame>,
}

#[async_trait]
impl FrameSource for ChannelSource {
    async fn recv(&mut self, timeout: Duration) -> Result<Option<Frame>> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Err(_elapsed) => Ok(None),
            Ok(None) => Err(CanGateError::TransportClosed),
            Ok(Some(frame)) => Ok(Some(frame.restamp(Instant::now()))),
        }
    }

    fn close(&mut self) {
        self.rx.close();
    }
}

/// Forwarding side backed by a bounded channel; full means dropped.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<Frame>,
}

impl ChannelSink {
    /// Create a sink and the receiver a downstream consumer drains.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl FrameSink for ChannelSink {
    async fn send(&mut self, frame: Frame) -> Result<()> {
        self.tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => CanGateError::Transport("downstream queue full".into()),
            TrySendError::Closed(_) => CanGateError::TransportClosed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recv_timeout_is_not_an_error() {
        let (_tx, mut src) = channel(4);
        let got = src.recv(Duration::from_millis(10)).await.unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn recv_reports_closed_when_producers_gone() {
        let (tx, mut src) = channel(4);
        drop(tx);
        let err = src.recv(Duration::from_millis(10)).await.unwrap_err();
        assert_eq!(err.code().as_str(), "TRANSPORT_CLOSED");
    }

    #[tokio::test]
    async fn close_rejects_further_sends() {
        let (tx, mut src) = channel(4);
        src.close();
        assert!(tx.is_closed());
        let err = tx.send(Frame::new(0x100, vec![1]).unwrap()).await.unwrap_err();
        assert_eq!(err.code().as_str(), "TRANSPORT_CLOSED");
    }

    #[tokio::test]
    async fn sink_drops_when_full() {
        let (mut sink, _rx) = ChannelSink::new(1);
        sink.send(Frame::new(0x100, vec![1]).unwrap()).await.unwrap();
        let err = sink.send(Frame::new(0x100, vec![2]).unwrap()).await.unwrap_err();
        assert_eq!(err.code().as_str(), "TRANSPORT");
    }
}
