//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use cangate_core::error::{CanGateError, Result};

pub use schema::{AuthSection, GatewayConfig, GatewaySection, OpsSection, RateLimitSection, SimSection};

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| CanGateError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| CanGateError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
