use std::sync::Arc;
use std::time::Instant;

use cangate_core::auth::{Authenticator, XorChecksum};
use cangate_core::protocol::frame::Frame;
use cangate_core::protocol::payload::{split_protected, CriticalPayload};

use crate::config::GatewayConfig;
use crate::obs::GatewayMetrics;

use super::rate::RateTracker;

/// What happens to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Forward,
    Block,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Forward => "forward",
            Action::Block => "block",
        }
    }
}

/// Why the action was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Identifier is not protected; no checks ran.
    NonCritical,
    /// Within rate and tag matched.
    Authenticated,
    /// Too many arrivals inside the window.
    RateExceeded { window_count: usize },
    /// Payload cannot carry base + tag.
    PayloadTooShort { len: usize },
    /// Tag mismatch.
    AuthenticationFailed { received: u8, expected: u8 },
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Reason::NonCritical => "non_critical",
            Reason::Authenticated => "authenticated",
            Reason::RateExceeded { .. } => "rate_exceeded",
            Reason::PayloadTooShort { .. } => "payload_too_short",
            Reason::AuthenticationFailed { .. } => "bad_mac",
        }
    }
}

/// Terminal decision for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub action: Action,
    pub reason: Reason,
    /// Decoded telemetry for authenticated frames.
    pub telemetry: Option<CriticalPayload>,
}

impl Verdict {
    fn forward(reason: Reason) -> Self {
        Self { action: Action::Forward, reason, telemetry: None }
    }

    fn block(reason: Reason) -> Self {
        Self { action: Action::Block, reason, telemetry: None }
    }

    pub fn is_forward(&self) -> bool {
        self.action == Action::Forward
    }
}

/// Per-frame admission: identifier filter, rate window, length, tag.
///
/// Construct once at startup. State across frames lives only in the owned
/// [`RateTracker`].
pub struct AdmissionEngine {
    protected_id: u32,
    auth: Arc<dyn Authenticator>,
    rate: RateTracker,
    metrics: Arc<GatewayMetrics>,
}

impl AdmissionEngine {
    pub fn new(
        protected_id: u32,
        auth: Arc<dyn Authenticator>,
        rate: RateTracker,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self { protected_id, auth, rate, metrics }
    }

    pub fn from_config(cfg: &GatewayConfig, metrics: Arc<GatewayMetrics>) -> Self {
        let auth = Arc::new(XorChecksum::new(cfg.auth.secret));
        let rate = RateTracker::new(cfg.rate_limit.window(), cfg.rate_limit.max_per_window);
        Self::new(cfg.gateway.protected_id, auth, rate, metrics)
    }

    pub fn protected_id(&self) -> u32 {
        self.protected_id
    }

    pub fn rate_tracker(&self) -> &RateTracker {
        &self.rate
    }

    pub fn metrics(&self) -> &Arc<GatewayMetrics> {
        &self.metrics
    }

    /// Decide the fate of `frame`, using its timestamp as the current time.
    pub fn evaluate(&self, frame: &Frame) -> Verdict {
        let started = Instant::now();
        self.metrics.frames_received.inc(&[]);
        tracing::debug!(
            id = %format_args!("0x{:X}", frame.id),
            len = frame.payload.len(),
            data = %hex::encode_upper(&frame.payload),
            "rx"
        );

        let verdict = self.decide(frame);

        self.metrics.verdicts.inc(&[
            ("action", verdict.action.as_str()),
            ("reason", verdict.reason.as_str()),
        ]);
        self.metrics.admission_duration.observe(&[], started.elapsed());
        log_verdict(frame.id, &verdict);

        verdict
    }

    fn decide(&self, frame: &Frame) -> Verdict {
        if frame.id != self.protected_id {
            return Verdict::forward(Reason::NonCritical);
        }

        // Rate runs first and always records, so floods never reach the tag check.
        self.metrics.rate_checks.inc(&[]);
        let rate = self.rate.check_and_record(frame.id, frame.timestamp);
        if !rate.allowed {
            return Verdict::block(Reason::RateExceeded { window_count: rate.window_count });
        }

        let Some((base, received)) = split_protected(&frame.payload) else {
            return Verdict::block(Reason::PayloadTooShort { len: frame.payload.len() });
        };

        self.metrics.auth_checks.inc(&[]);
        if !self.auth.verify(base, received) {
            return Verdict::block(Reason::AuthenticationFailed {
                received,
                expected: self.auth.tag(base),
            });
        }

        match CriticalPayload::decode(base) {
            Ok(p) => Verdict {
                action: Action::Forward,
                reason: Reason::Authenticated,
                telemetry: Some(p),
            },
            // split_protected guarantees 4 base bytes.
            Err(_) => Verdict::block(Reason::PayloadTooShort { len: frame.payload.len() }),
        }
    }
}

fn log_verdict(id: u32, v: &Verdict) {
    match (v.action, v.reason) {
        (Action::Forward, Reason::NonCritical) => {
            tracing::debug!(id = %format_args!("0x{id:X}"), "forwarded (non-critical id)");
        }
        (Action::Forward, _) => match v.telemetry {
            Some(p) => tracing::info!(
                id = %format_args!("0x{id:X}"),
                rpm = p.rpm,
                coolant_temp = p.coolant_temp,
                fuel_level = p.fuel_level,
                "forwarded (authenticated)"
            ),
            None => tracing::info!(id = %format_args!("0x{id:X}"), "forwarded"),
        },
        (Action::Block, Reason::RateExceeded { window_count }) => {
            tracing::warn!(id = %format_args!("0x{id:X}"), window_count, "blocked (rate limit exceeded)");
        }
        (Action::Block, Reason::PayloadTooShort { len }) => {
            tracing::warn!(id = %format_args!("0x{id:X}"), len, "blocked (payload too short for tag)");
        }
        (Action::Block, Reason::AuthenticationFailed { received, expected }) => {
            tracing::warn!(
                id = %format_args!("0x{id:X}"),
                received = %format_args!("0x{received:02X}"),
                expected = %format_args!("0x{expected:02X}"),
                "blocked (bad mac)"
            );
        }
        (Action::Block, reason) => {
            tracing::warn!(id = %format_args!("0x{id:X}"), reason = reason.as_str(), "blocked");
        }
    }
}
