#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use cangate_core::auth::{Authenticator, XorChecksum};
use cangate_core::protocol::frame::Frame;
use cangate_core::protocol::payload::CriticalPayload;
use cangate_gateway::config::GatewayConfig;
use cangate_gateway::obs::GatewayMetrics;
use cangate_gateway::policy::{Action, AdmissionEngine, Reason, RateTracker};

const PROTECTED: u32 = 0x200;
const SECRET: u8 = 0x5A;

fn engine() -> (AdmissionEngine, Arc<GatewayMetrics>) {
    let metrics = Arc::new(GatewayMetrics::default());
    let engine = AdmissionEngine::from_config(&GatewayConfig::default(), Arc::clone(&metrics));
    (engine, metrics)
}

fn legit(rpm: u16, temp: u8, fuel: u8) -> Vec<u8> {
    CriticalPayload::new(rpm, temp, fuel)
        .to_protected_frame(&XorChecksum::new(SECRET))
        .to_vec()
}

fn spoofed() -> Vec<u8> {
    let base = CriticalPayload::new(6000, 40, 5).encode();
    let tag = XorChecksum::new(SECRET).tag(&base) ^ 0xFF;
    let mut out = base.to_vec();
    out.extend_from_slice(&[tag, 0, 0, 0]);
    out
}

#[test]
fn authenticated_frame_forwarded_with_telemetry() {
    let (engine, metrics) = engine();
    let frame = Frame::new(PROTECTED, legit(2500, 90, 70)).unwrap();

    let v = engine.evaluate(&frame);
    assert_eq!(v.action, Action::Forward);
    assert_eq!(v.reason, Reason::Authenticated);
    assert_eq!(v.telemetry, Some(CriticalPayload::new(2500, 90, 70)));
    assert_eq!(metrics.auth_checks.get(&[]), 1);
    assert_eq!(metrics.verdicts.get(&[("action", "forward"), ("reason", "authenticated")]), 1);
}

#[test]
fn inverted_tag_blocked_as_bad_mac() {
    let (engine, _metrics) = engine();
    let frame = Frame::new(PROTECTED, spoofed()).unwrap();

    let v = engine.evaluate(&frame);
    assert_eq!(v.action, Action::Block);
    assert_eq!(
        v.reason,
        Reason::AuthenticationFailed { received: 0xEF, expected: 0x10 }
    );
    assert!(v.telemetry.is_none());
}

#[test]
fn short_payload_blocked_without_auth() {
    let (engine, metrics) = engine();
    let frame = Frame::new(PROTECTED, vec![0xC4, 0x09, 90, 70]).unwrap();

    let v = engine.evaluate(&frame);
    assert_eq!(v.action, Action::Block);
    assert_eq!(v.reason, Reason::PayloadTooShort { len: 4 });
    assert_eq!(metrics.rate_checks.get(&[]), 1);
    assert_eq!(metrics.auth_checks.get(&[]), 0);
}

#[test]
fn empty_payload_blocked_as_short() {
    let (engine, _metrics) = engine();
    let v = engine.evaluate(&Frame::new(PROTECTED, Vec::new()).unwrap());
    assert_eq!(v.reason, Reason::PayloadTooShort { len: 0 });
}

#[test]
fn non_critical_forwarded_without_checks() {
    let (engine, metrics) = engine();
    let frame = Frame::new(0x999, vec![0xFF; 12]).unwrap();

    let v = engine.evaluate(&frame);
    assert_eq!(v.action, Action::Forward);
    assert_eq!(v.reason, Reason::NonCritical);
    assert_eq!(metrics.rate_checks.get(&[]), 0);
    assert_eq!(metrics.auth_checks.get(&[]), 0);
    assert!(engine.rate_tracker().tracked_identifiers().is_empty());
}

#[test]
fn burst_of_six_blocks_the_sixth_then_recovers() {
    let (engine, metrics) = engine();
    let t0 = Instant::now();

    let reasons: Vec<Reason> = (0..6u64)
        .map(|i| {
            let f = Frame::at(PROTECTED, legit(2500, 90, 70), t0 + Duration::from_millis(i * 20)).unwrap();
            engine.evaluate(&f).reason
        })
        .collect();

    assert_eq!(&reasons[..5], &[Reason::Authenticated; 5]);
    assert_eq!(reasons[5], Reason::RateExceeded { window_count: 6 });

    // The blocked frame never reached the tag check.
    assert_eq!(metrics.auth_checks.get(&[]), 5);
    assert_eq!(metrics.rate_checks.get(&[]), 6);

    let later = Frame::at(PROTECTED, legit(2600, 90, 70), t0 + Duration::from_millis(1100)).unwrap();
    let v = engine.evaluate(&later);
    assert_eq!(v.reason, Reason::Authenticated);
    assert_eq!(metrics.admission_duration.count(&[]), 7);
}

#[test]
fn flood_on_shared_identifier_starves_legit_frames() {
    let (engine, _metrics) = engine();
    let t0 = Instant::now();

    // Attacker at 50ms for one second; legit frames every 500ms.
    let mut legit_reasons = Vec::new();
    for i in 0..20u64 {
        let at = t0 + Duration::from_millis(i * 50);
        engine.evaluate(&Frame::at(PROTECTED, spoofed(), at).unwrap());
        if i % 10 == 0 {
            let f = Frame::at(PROTECTED, legit(2500, 90, 70), at).unwrap();
            legit_reasons.push(engine.evaluate(&f).reason);
        }
    }

    // The first legit frame fits the window; the second arrives while the
    // flood keeps the single window for this identifier full.
    assert_eq!(legit_reasons[0], Reason::Authenticated);
    assert!(matches!(legit_reasons[1], Reason::RateExceeded { .. }));
}

#[test]
fn rate_accounting_runs_before_length_and_tag() {
    let (engine, _metrics) = engine();
    let t0 = Instant::now();

    // Short and spoofed frames still fill the window.
    for i in 0..5u64 {
        let payload = if i % 2 == 0 { vec![1, 2] } else { spoofed() };
        let f = Frame::at(PROTECTED, payload, t0 + Duration::from_millis(i)).unwrap();
        assert_eq!(engine.evaluate(&f).action, Action::Block);
    }

    let good = Frame::at(PROTECTED, legit(2500, 90, 70), t0 + Duration::from_millis(10)).unwrap();
    let v = engine.evaluate(&good);
    assert_eq!(v.reason, Reason::RateExceeded { window_count: 6 });
}

#[test]
fn padding_is_not_authenticated() {
    let (engine, _metrics) = engine();
    let mut payload = legit(2500, 90, 70);
    payload[5..8].copy_from_slice(&[0xDE, 0xAD, 0xBE]);

    let v = engine.evaluate(&Frame::new(PROTECTED, payload).unwrap());
    assert_eq!(v.reason, Reason::Authenticated);
}

#[test]
fn engines_do_not_share_rate_state() {
    let (a, _) = engine();
    let (b, _) = engine();
    let t0 = Instant::now();

    for i in 0..6u64 {
        let f = Frame::at(PROTECTED, legit(2500, 90, 70), t0 + Duration::from_millis(i)).unwrap();
        a.evaluate(&f);
    }
    let f = Frame::at(PROTECTED, legit(2500, 90, 70), t0 + Duration::from_millis(7)).unwrap();
    assert_eq!(b.evaluate(&f).reason, Reason::Authenticated);
}

struct RejectAll;

impl Authenticator for RejectAll {
    fn tag(&self, _base: &[u8]) -> u8 {
        0
    }

    fn verify(&self, _base: &[u8], _candidate: u8) -> bool {
        false
    }
}

#[test]
fn authenticator_is_pluggable() {
    let metrics = Arc::new(GatewayMetrics::default());
    let rate = RateTracker::new(Duration::from_secs(1), 5);
    let engine = AdmissionEngine::new(PROTECTED, Arc::new(RejectAll), rate, metrics);

    let v = engine.evaluate(&Frame::new(PROTECTED, legit(2500, 90, 70)).unwrap());
    assert_eq!(v.reason, Reason::AuthenticationFailed { received: 0x8B, expected: 0 });
}
