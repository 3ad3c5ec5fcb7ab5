use serde::{Deserialize, Serialize};

use crate::{types::*, WorkerId};

/// Read-only view of the worker registry at one instant.
/// The registry is responsible for producing a consistent copy; the policy only reads it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub now_ms: TimestampMs,
    pub workers: Vec<WorkerRecord>,
}

impl RegistrySnapshot {
    pub fn new(now_ms: TimestampMs, workers: Vec<WorkerRecord>) -> Self {
        Self { now_ms, workers }
    }

    pub fn find(&self, id: &WorkerId) -> Option<&WorkerRecord> {
        self.workers.iter().find(|w| &w.id == id)
    }

    pub fn idle(&self) -> impl Iterator<Item = &WorkerRecord> {
        self.workers.iter().filter(|w| w.is_idle())
    }
}
