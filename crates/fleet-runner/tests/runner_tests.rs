use std::path::{Path, PathBuf};

use fleet_core::{ExpirationDecision, WorkerId, WorkerState};
use fleet_registry::WorkerRegistry;
use fleet_runner::{load_fleet, CompatibilityMode, Config, Expirer};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/fleets").join(name)
}

fn expirer(name: &str, cfg: &Config) -> (Expirer, i64) {
    let fleet = load_fleet(&fixture(name)).unwrap();
    let now = fleet.clock();
    (Expirer::new(Box::new(fleet.into_registry().unwrap()), cfg), now)
}

fn ids(v: &[WorkerId]) -> Vec<&str> {
    v.iter().map(|i| i.as_str()).collect()
}

#[test]
fn sweep_three_compatible_keeps_most_recent() {
    let (ex, now) = expirer("three-compatible.yaml", &Config::default());
    let report = ex.run_once(now, true).unwrap();
    assert_eq!(report.evaluated, 3);
    assert_eq!(report.kept, 1);
    assert_eq!(ids(&report.expired), vec!["A", "B"]);
}

#[test]
fn sweep_mixed_fleet() {
    let (ex, now) = expirer("mixed.yaml", &Config::default());
    let report = ex.run_once(now, true).unwrap();
    assert_eq!(ids(&report.expired), vec!["A"]);
    assert_eq!(report.kept, 3);
}

#[test]
fn keys_mode_widens_groups() {
    let mut cfg = Config::default();
    cfg.compatibility.mode = CompatibilityMode::Keys;
    cfg.compatibility.keys = vec!["flags".into()];
    let (ex, now) = expirer("mixed.yaml", &cfg);
    let report = ex.run_once(now, true).unwrap();
    assert_eq!(ids(&report.expired), vec!["A", "B"]);
}

#[test]
fn dry_run_leaves_registry_untouched() {
    let (ex, now) = expirer("three-compatible.yaml", &Config::default());
    ex.run_once(now, true).unwrap();
    let snap = ex.registry.snapshot(now).unwrap();
    assert!(snap.workers.iter().all(|w| w.state == WorkerState::Idle));
}

#[test]
fn applied_sweep_marks_stopping_and_settles() {
    let (ex, now) = expirer("three-compatible.yaml", &Config::default());
    ex.run_once(now, false).unwrap();

    let snap = ex.registry.snapshot(now).unwrap();
    let stopping: Vec<_> = snap.workers.iter().filter(|w| w.state == WorkerState::Stopping).map(|w| w.id.as_str()).collect();
    assert_eq!(stopping, vec!["A", "B"]);

    // the survivor is now alone in its group
    let again = ex.run_once(now, false).unwrap();
    assert!(again.expired.is_empty());
}

#[test]
fn short_idle_is_spared_until_timeout() {
    let mut cfg = Config::default();
    cfg.expiration.idle_compatible_timeout_ms = 58_500;
    let (ex, now) = expirer("three-compatible.yaml", &cfg);
    // A idle 59s, B idle 58s
    let report = ex.run_once(now, true).unwrap();
    assert_eq!(ids(&report.expired), vec!["A"]);
}

#[test]
fn evaluate_single_target() {
    let (ex, now) = expirer("mixed.yaml", &Config::default());
    assert_eq!(ex.evaluate(now, &WorkerId::from_str("A")).unwrap(), ExpirationDecision::GracefulExpire);
    assert_eq!(ex.evaluate(now, &WorkerId::from_str("D")).unwrap(), ExpirationDecision::DoNotExpire);
    assert!(ex.evaluate(now, &WorkerId::from_str("nope")).is_err());
}

#[test]
fn worker_that_went_busy_is_not_expired() {
    let (ex, now) = expirer("three-compatible.yaml", &Config::default());
    ex.registry.mark_busy(&WorkerId::from_str("A")).unwrap();
    let report = ex.run_once(now, true).unwrap();
    assert_eq!(ids(&report.expired), vec!["B"]);
}
