use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use cangate_core::error::{CanGateError, Result};
use cangate_core::protocol::frame::MAX_EXTENDED_ID;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub auth: AuthSection,

    #[serde(default)]
    pub rate_limit: RateLimitSection,

    #[serde(default)]
    pub ops: OpsSection,

    #[serde(default)]
    pub sim: SimSection,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            auth: AuthSection::default(),
            rate_limit: RateLimitSection::default(),
            ops: OpsSection::default(),
            sim: SimSection::default(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(CanGateError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.rate_limit.validate()?;
        self.ops.validate()?;
        self.sim.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    /// Identifier carrying authenticated critical telemetry.
    #[serde(default = "default_protected_id")]
    pub protected_id: u32,

    #[serde(default = "default_recv_timeout_ms")]
    pub recv_timeout_ms: u64,

    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Demo deadline; 0 runs until ctrl-c.
    #[serde(default = "default_run_seconds")]
    pub run_seconds: u64,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            protected_id: default_protected_id(),
            recv_timeout_ms: default_recv_timeout_ms(),
            channel_capacity: default_channel_capacity(),
            run_seconds: default_run_seconds(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if self.protected_id > MAX_EXTENDED_ID {
            return Err(CanGateError::BadRequest(
                "gateway.protected_id must fit the 29-bit identifier range".into(),
            ));
        }
        if !(10..=60000).contains(&self.recv_timeout_ms) {
            return Err(CanGateError::BadRequest(
                "gateway.recv_timeout_ms must be between 10 and 60000".into(),
            ));
        }
        if !(1..=65536).contains(&self.channel_capacity) {
            return Err(CanGateError::BadRequest(
                "gateway.channel_capacity must be between 1 and 65536".into(),
            ));
        }
        Ok(())
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }

    pub fn deadline(&self) -> Option<Duration> {
        (self.run_seconds > 0).then(|| Duration::from_secs(self.run_seconds))
    }
}

fn default_protected_id() -> u32 {
    0x200
}
fn default_recv_timeout_ms() -> u64 {
    1000
}
fn default_channel_capacity() -> usize {
    256
}
fn default_run_seconds() -> u64 {
    8
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    /// Shared secret byte seeding the checksum.
    #[serde(default = "default_secret")]
    pub secret: u8,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            secret: default_secret(),
        }
    }
}

fn default_secret() -> u8 {
    0x5A
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitSection {
    #[serde(default = "default_window_seconds")]
    pub window_seconds: f64,

    #[serde(default = "default_max_per_window")]
    pub max_per_window: u32,
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            window_seconds: default_window_seconds(),
            max_per_window: default_max_per_window(),
        }
    }
}

impl RateLimitSection {
    pub fn validate(&self) -> Result<()> {
        if !self.window_seconds.is_finite() || self.window_seconds <= 0.0 || self.window_seconds > 3600.0 {
            return Err(CanGateError::BadRequest(
                "rate_limit.window_seconds must be greater than 0 and at most 3600".into(),
            ));
        }
        if self.max_per_window == 0 {
            return Err(CanGateError::BadRequest(
                "rate_limit.max_per_window must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs_f64(self.window_seconds)
    }
}

fn default_window_seconds() -> f64 {
    1.0
}
fn default_max_per_window() -> u32 {
    5
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OpsSection {
    /// `/healthz`, `/readyz`, `/metrics` listener; disabled when absent.
    #[serde(default)]
    pub listen: Option<String>,
}

impl OpsSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<Option<SocketAddr>> {
        match &self.listen {
            None => Ok(None),
            Some(s) => s.parse().map(Some).map_err(|_| {
                CanGateError::BadRequest(format!("ops.listen must be a valid SocketAddr: {s}"))
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimSection {
    #[serde(default = "default_sim_enabled")]
    pub enabled: bool,

    #[serde(default = "default_legit_frames")]
    pub legit_frames: u32,

    #[serde(default = "default_legit_interval_ms")]
    pub legit_interval_ms: u64,

    #[serde(default = "default_attack_duration_ms")]
    pub attack_duration_ms: u64,

    #[serde(default = "default_attack_interval_ms")]
    pub attack_interval_ms: u64,
}

impl Default for SimSection {
    fn default() -> Self {
        Self {
            enabled: default_sim_enabled(),
            legit_frames: default_legit_frames(),
            legit_interval_ms: default_legit_interval_ms(),
            attack_duration_ms: default_attack_duration_ms(),
            attack_interval_ms: default_attack_interval_ms(),
        }
    }
}

impl SimSection {
    pub fn validate(&self) -> Result<()> {
        if self.legit_interval_ms == 0 || self.attack_interval_ms == 0 {
            return Err(CanGateError::BadRequest(
                "sim intervals must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn default_sim_enabled() -> bool {
    true
}
fn default_legit_frames() -> u32 {
    3
}
fn default_legit_interval_ms() -> u64 {
    500
}
fn default_attack_duration_ms() -> u64 {
    2000
}
fn default_attack_interval_ms() -> u64 {
    50
}
