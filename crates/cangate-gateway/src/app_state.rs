//! Shared application state for the canGate gateway.
//!
//! Holds the validated configuration and the metrics registry; the ops
//! router and the supervisor both read from it.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::obs::GatewayMetrics;
use crate::policy::AdmissionEngine;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<GatewayMetrics>,
}

struct AppStateInner {
    cfg: GatewayConfig,
}

impl AppState {
    pub fn new(cfg: GatewayConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg }),
            metrics: Arc::new(GatewayMetrics::default()),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    /// Fresh engine sharing this state's metrics. Rate windows start empty.
    pub fn build_engine(&self) -> AdmissionEngine {
        AdmissionEngine::from_config(self.cfg(), self.metrics())
    }
}
