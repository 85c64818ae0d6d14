use std::time::Duration;

use tokio::time::Instant;

use cangate_core::auth::{Authenticator, XorChecksum};
use cangate_core::error::Result;
use cangate_core::protocol::frame::Frame;
use cangate_core::protocol::payload::{CriticalPayload, PROTECTED_FRAME_LEN};

use crate::config::GatewayConfig;
use crate::transport::BusSender;

/// Timing and identity shared by both simulated senders.
#[derive(Debug, Clone)]
pub struct SimPlan {
    pub protected_id: u32,
    pub secret: u8,
    pub legit_frames: u32,
    pub legit_interval: Duration,
    pub attack_duration: Duration,
    pub attack_interval: Duration,
}

impl SimPlan {
    pub fn from_config(cfg: &GatewayConfig) -> Self {
        Self {
            protected_id: cfg.gateway.protected_id,
            secret: cfg.auth.secret,
            legit_frames: cfg.sim.legit_frames,
            legit_interval: Duration::from_millis(cfg.sim.legit_interval_ms),
            attack_duration: Duration::from_millis(cfg.sim.attack_duration_ms),
            attack_interval: Duration::from_millis(cfg.sim.attack_interval_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SenderReport {
    pub sent: u32,
}

/// Legitimate ECU: correctly tagged telemetry, rpm rising by 100 per frame.
pub async fn legit_sender(bus: BusSender, plan: SimPlan) -> Result<SenderReport> {
    let auth = XorChecksum::new(plan.secret);
    let mut report = SenderReport::default();

    for i in 0..plan.legit_frames {
        let rpm = 2500u16.saturating_add((i as u16).saturating_mul(100));
        let payload = CriticalPayload::new(rpm, 90, 70).to_protected_frame(&auth);

        bus.send(Frame::new(plan.protected_id, payload.to_vec())?).await?;
        report.sent += 1;
        tracing::info!(
            target: "sim::legit",
            id = %format_args!("0x{:X}", plan.protected_id),
            data = %hex::encode_upper(payload),
            "sent"
        );

        tokio::time::sleep(plan.legit_interval).await;
    }

    Ok(report)
}

/// Spoofed frame as the attacker emits it: implausible values, inverted tag.
pub fn spoofed_payload(secret: u8) -> [u8; PROTECTED_FRAME_LEN] {
    let auth = XorChecksum::new(secret);
    let base = CriticalPayload::new(6000, 40, 5).encode();

    let mut out = [0u8; PROTECTED_FRAME_LEN];
    out[..base.len()].copy_from_slice(&base);
    out[base.len()] = auth.tag(&base) ^ 0xFF;
    out
}

/// Attacker: floods the protected identifier for `attack_duration`.
pub async fn attacker_sender(bus: BusSender, plan: SimPlan) -> Result<SenderReport> {
    let payload = spoofed_payload(plan.secret);
    let mut report = SenderReport::default();
    let until = Instant::now() + plan.attack_duration;

    while Instant::now() < until {
        bus.send(Frame::new(plan.protected_id, payload.to_vec())?).await?;
        report.sent += 1;
        tracing::info!(
            target: "sim::attack",
            id = %format_args!("0x{:X}", plan.protected_id),
            data = %hex::encode_upper(payload),
            "sent spoofed"
        );

        tokio::time::sleep(plan.attack_interval).await;
    }

    Ok(report)
}
