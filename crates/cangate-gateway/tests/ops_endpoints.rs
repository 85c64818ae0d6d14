#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::extract::State;
use axum::http::{header, StatusCode};

use cangate_core::protocol::frame::Frame;
use cangate_gateway::app_state::AppState;
use cangate_gateway::config::GatewayConfig;
use cangate_gateway::{ops, router};

#[tokio::test]
async fn healthz_is_ok() {
    assert_eq!(ops::healthz().await.status(), StatusCode::OK);
}

#[tokio::test]
async fn readyz_flips_to_unavailable_when_draining() {
    let state = AppState::new(GatewayConfig::default());

    let before = ops::readyz(State(state.clone())).await;
    assert_eq!(before.status(), StatusCode::OK);

    state.metrics().set_draining();

    let after = ops::readyz(State(state.clone())).await;
    assert_eq!(after.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn metrics_served_as_prometheus_text() {
    let state = AppState::new(GatewayConfig::default());
    state.build_engine().evaluate(&Frame::new(0x123, vec![1, 2]).unwrap());

    let resp = ops::metrics(State(state.clone())).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let ct = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
    assert!(ct.starts_with("text/plain; version=0.0.4"), "content-type={ct}");

    let text = state.metrics().render();
    assert!(text.contains("cangate_verdicts_total{action=\"forward\",reason=\"non_critical\"} 1"));
}

#[test]
fn router_builds_with_state() {
    let _router = router::build_router(AppState::new(GatewayConfig::default()));
}
