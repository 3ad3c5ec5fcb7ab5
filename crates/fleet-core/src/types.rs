use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ids::*, model::*};

/// Monotonic milliseconds. The registry decides the epoch; the policy only subtracts.
pub type TimestampMs = i64;

/// Environment and parameters a worker was started under. Opaque to the expiration
/// policy: it is only ever handed to a compatibility predicate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextFingerprint(pub BTreeMap<String, String>);

impl ContextFingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub id: WorkerId,
    pub state: WorkerState,
    #[serde(default)]
    pub context: ContextFingerprint,
    /// Last transition into Idle. Stale while the worker is Busy.
    pub last_idle_ms: TimestampMs,
}

impl WorkerRecord {
    pub fn idle(id: WorkerId, context: ContextFingerprint, last_idle_ms: TimestampMs) -> Self {
        Self { id, state: WorkerState::Idle, context, last_idle_ms }
    }

    pub fn busy(id: WorkerId, context: ContextFingerprint, last_idle_ms: TimestampMs) -> Self {
        Self { id, state: WorkerState::Busy, context, last_idle_ms }
    }

    pub fn is_idle(&self) -> bool {
        self.state == WorkerState::Idle
    }
}
