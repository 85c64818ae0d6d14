//! canGate demo gateway.
//!
//! - In-process bus with a legitimate ECU and a spoofing attacker
//! - Admission per frame: identifier filter, rate window, tag check
//! - Runs until the configured deadline or ctrl-c
//! - Optional `/healthz`, `/readyz`, `/metrics` listener

use std::path::Path;
use std::process::ExitCode;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing_subscriber::{fmt, EnvFilter};

use cangate_core::error::{CanGateError, Result};
use cangate_gateway::config::{self, GatewayConfig};
use cangate_gateway::sim::{attacker_sender, legit_sender, SenderReport, SimPlan};
use cangate_gateway::transport::{bus, wait_for_interrupt, ChannelSink, Gateway};
use cangate_gateway::{app_state::AppState, router};

const DEFAULT_CONFIG_PATH: &str = "cangate.yaml";

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, code = e.code().as_str(), "gateway failed");
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> Result<GatewayConfig> {
    if let Some(path) = std::env::args().nth(1) {
        return config::load_from_file(&path);
    }
    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        return config::load_from_file(DEFAULT_CONFIG_PATH);
    }
    tracing::info!("no config file, using defaults");
    Ok(GatewayConfig::default())
}

async fn run() -> Result<()> {
    let cfg = load_config()?;
    let ops_addr = cfg.ops.listen_addr()?;
    let state = AppState::new(cfg);
    let gw = &state.cfg().gateway;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ---- ops listener
    if let Some(addr) = ops_addr {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| CanGateError::Internal(format!("ops bind failed: {e}")))?;
        let app = router::build_router(state.clone());
        let mut rx = shutdown_rx.clone();
        tracing::info!(%addr, "ops endpoints listening");
        tokio::spawn(async move {
            let stop = async move {
                let _ = rx.wait_for(|stop| *stop).await;
            };
            if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(stop).await {
                tracing::warn!(error = %e, "ops server failed");
            }
        });
    }

    // ---- bus + gateway
    let (bus_tx, source) = bus::channel(gw.channel_capacity);
    let (sink, mut downstream) = ChannelSink::new(gw.channel_capacity);

    let consumer = tokio::spawn(async move {
        let mut delivered = 0u64;
        while let Some(frame) = downstream.recv().await {
            delivered += 1;
            tracing::debug!(id = %format_args!("0x{:X}", frame.id), len = frame.payload.len(), "delivered downstream");
        }
        delivered
    });

    let gateway = Gateway::new(state.build_engine(), source, sink, gw.recv_timeout());
    let (ready_tx, ready_rx) = oneshot::channel();
    let gw_task = tokio::spawn(gateway.run(Some(ready_tx), shutdown_rx));

    ready_rx
        .await
        .map_err(|_| CanGateError::Internal("gateway exited before ready".into()))?;

    // ---- simulated senders
    let mut senders: Vec<(&'static str, JoinHandle<Result<SenderReport>>)> = Vec::new();
    if state.cfg().sim.enabled {
        let plan = SimPlan::from_config(state.cfg());
        senders.push(("legit", tokio::spawn(legit_sender(bus_tx.clone(), plan.clone()))));
        senders.push(("attacker", tokio::spawn(attacker_sender(bus_tx.clone(), plan))));
    }

    // ---- deadline / ctrl-c
    let deadline = gw.deadline();
    tokio::select! {
        _ = async {
            match deadline {
                Some(d) => tokio::time::sleep(d).await,
                None => std::future::pending::<()>().await,
            }
        } => tracing::info!("deadline reached"),
        _ = wait_for_interrupt(tokio::signal::ctrl_c()) => {}
    }

    state.metrics().set_draining();
    let _ = shutdown_tx.send(true);

    for (name, handle) in senders {
        if !handle.is_finished() {
            handle.abort();
        }
        match handle.await {
            Ok(Ok(report)) => tracing::info!(sender = name, sent = report.sent, "sender finished"),
            Ok(Err(e)) => tracing::warn!(sender = name, error = %e, "sender stopped"),
            Err(e) if e.is_cancelled() => tracing::info!(sender = name, "sender cancelled"),
            Err(e) => tracing::warn!(sender = name, error = %e, "sender panicked"),
        }
    }
    drop(bus_tx);

    let stats = gw_task
        .await
        .map_err(|e| CanGateError::Internal(format!("gateway task failed: {e}")))?;
    let delivered = consumer
        .await
        .map_err(|e| CanGateError::Internal(format!("consumer task failed: {e}")))?;

    tracing::info!(
        received = stats.received,
        forwarded = stats.forwarded,
        blocked = stats.blocked,
        delivered,
        "demo complete"
    );
    Ok(())
}
