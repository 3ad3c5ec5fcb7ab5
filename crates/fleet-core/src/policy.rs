use std::cmp::Ordering;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    CompatibilityPredicate, ExpirationDecision, IdleDurationSource, PolicyError, RegistrySnapshot, SinceLastIdle,
    WorkerId, WorkerRecord,
};

/// Expires idle workers that duplicate another idle, compatible worker.
///
/// For a target worker the policy:
/// - keeps it if it is not Idle
/// - collects every Idle worker compatible with it (the target included)
/// - keeps it if that group has a single member
/// - keeps the group's survivor (see [`survivor_order`])
/// - expires any other member once it has been idle for at least `timeout`
///
/// Pure: reads the snapshot it is handed and nothing else.
#[derive(Clone, Debug)]
pub struct DuplicateIdleExpiration<P, I = SinceLastIdle> {
    timeout: Duration,
    predicate: P,
    idle: I,
}

/// One row of a sweep.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub id: WorkerId,
    pub decision: ExpirationDecision,
}

/// Total order used to pick the survivor: most recent `last_idle_ms` wins, and on a
/// timestamp tie the greater id (byte-wise) wins.
pub fn survivor_order(a: &WorkerRecord, b: &WorkerRecord) -> Ordering {
    a.last_idle_ms.cmp(&b.last_idle_ms).then_with(|| a.id.cmp(&b.id))
}

impl<P: CompatibilityPredicate> DuplicateIdleExpiration<P> {
    pub fn new(timeout: Duration, predicate: P) -> Self {
        Self { timeout, predicate, idle: SinceLastIdle }
    }
}

impl<P, I> DuplicateIdleExpiration<P, I>
where
    P: CompatibilityPredicate,
    I: IdleDurationSource,
{
    pub fn with_idle_source<J: IdleDurationSource>(self, idle: J) -> DuplicateIdleExpiration<P, J> {
        DuplicateIdleExpiration { timeout: self.timeout, predicate: self.predicate, idle }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn evaluate(&self, snapshot: &RegistrySnapshot, target: &WorkerId) -> Result<ExpirationDecision, PolicyError> {
        let record = locate(snapshot, target)?;
        Ok(self.decide(snapshot, record))
    }

    /// Idle workers interchangeable with `target`, in snapshot order. Empty when the
    /// target itself is not idle.
    pub fn compatible_idle_set<'a>(
        &self,
        snapshot: &'a RegistrySnapshot,
        target: &WorkerId,
    ) -> Result<Vec<&'a WorkerRecord>, PolicyError> {
        let record = locate(snapshot, target)?;
        if !record.is_idle() {
            return Ok(vec![]);
        }
        Ok(self.group_of(snapshot, record))
    }

    /// The member of `target`'s compatible-idle set that is never expired.
    pub fn survivor<'a>(
        &self,
        snapshot: &'a RegistrySnapshot,
        target: &WorkerId,
    ) -> Result<Option<&'a WorkerRecord>, PolicyError> {
        let group = self.compatible_idle_set(snapshot, target)?;
        Ok(group.into_iter().max_by(|a, b| survivor_order(a, b)))
    }

    /// Evaluates every worker in the snapshot independently.
    pub fn sweep(&self, snapshot: &RegistrySnapshot) -> Vec<Verdict> {
        snapshot
            .workers
            .iter()
            .map(|w| Verdict { id: w.id.clone(), decision: self.decide(snapshot, w) })
            .collect()
    }

    fn decide(&self, snapshot: &RegistrySnapshot, target: &WorkerRecord) -> ExpirationDecision {
        if !target.is_idle() {
            return ExpirationDecision::DoNotExpire;
        }

        let group = self.group_of(snapshot, target);
        if group.len() < 2 {
            return ExpirationDecision::DoNotExpire;
        }

        match group.into_iter().max_by(|a, b| survivor_order(a, b)) {
            Some(survivor) if survivor.id != target.id => {}
            _ => return ExpirationDecision::DoNotExpire,
        }

        if self.idle.idle_duration_of(target, snapshot.now_ms) >= self.timeout {
            ExpirationDecision::GracefulExpire
        } else {
            ExpirationDecision::DoNotExpire
        }
    }

    fn group_of<'a>(&self, snapshot: &'a RegistrySnapshot, target: &WorkerRecord) -> Vec<&'a WorkerRecord> {
        // target is a member by identity, whatever the predicate says about itself
        snapshot
            .idle()
            .filter(|w| w.id == target.id || self.predicate.is_compatible(&target.context, &w.context))
            .collect()
    }
}

fn locate<'a>(snapshot: &'a RegistrySnapshot, target: &WorkerId) -> Result<&'a WorkerRecord, PolicyError> {
    snapshot.find(target).ok_or_else(|| PolicyError::TargetNotInSnapshot { id: target.clone() })
}
