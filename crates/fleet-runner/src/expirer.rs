use anyhow::{Context, Result};
use fleet_core::{DuplicateIdleExpiration, ExpirationDecision, TimestampMs, Verdict, WorkerId};
use fleet_registry::WorkerRegistry;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Config, FleetPredicate};

/// Drives the duplicate-idle policy against a registry: one snapshot per pass, one
/// decision per worker, and a stop request for every worker told to expire.
pub struct Expirer {
    pub registry: Box<dyn WorkerRegistry>,
    policy: DuplicateIdleExpiration<FleetPredicate>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SweepReport {
    pub now_ms: TimestampMs,
    pub dry_run: bool,
    pub evaluated: usize,
    pub kept: usize,
    pub expired: Vec<WorkerId>,
    pub verdicts: Vec<Verdict>,
}

impl Expirer {
    pub fn new(registry: Box<dyn WorkerRegistry>, cfg: &Config) -> Self {
        let policy = DuplicateIdleExpiration::new(cfg.idle_compatible_timeout(), cfg.predicate());
        Self { registry, policy }
    }

    pub fn evaluate(&self, now_ms: TimestampMs, target: &WorkerId) -> Result<ExpirationDecision> {
        let snap = self.registry.snapshot(now_ms)?;
        let decision = self.policy.evaluate(&snap, target)?;
        debug!(worker = %target, ?decision, "evaluated worker");
        Ok(decision)
    }

    /// Evaluate every worker against a single snapshot. Unless `dry_run`, workers that
    /// should expire are marked stopping in the registry after all decisions are made.
    pub fn run_once(&self, now_ms: TimestampMs, dry_run: bool) -> Result<SweepReport> {
        let snap = self.registry.snapshot(now_ms).context("load registry snapshot")?;
        let verdicts = self.policy.sweep(&snap);

        let mut expired = Vec::new();
        for v in &verdicts {
            match v.decision {
                ExpirationDecision::GracefulExpire => {
                    info!(worker = %v.id, dry_run, "expiring redundant idle worker");
                    expired.push(v.id.clone());
                }
                ExpirationDecision::DoNotExpire => debug!(worker = %v.id, "keeping worker"),
            }
        }

        if !dry_run {
            for id in &expired {
                self.registry.mark_stopping(id).with_context(|| format!("mark {id} stopping"))?;
            }
        }

        Ok(SweepReport {
            now_ms,
            dry_run,
            evaluated: verdicts.len(),
            kept: verdicts.len() - expired.len(),
            expired,
            verdicts,
        })
    }
}
