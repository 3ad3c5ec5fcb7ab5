use fleet_core::{RegistrySnapshot, TimestampMs, WorkerId, WorkerRecord};

/// Source of truth for the live worker set.
///
/// The expiration policy only ever sees `snapshot`; the mutators exist for whoever
/// tracks worker lifecycle (and for the sweep driver, which marks expired workers
/// as stopping).
pub trait WorkerRegistry: Send + Sync {
    /// Consistent copy of every record, stamped with `now_ms`.
    fn snapshot(&self, now_ms: TimestampMs) -> anyhow::Result<RegistrySnapshot>;

    fn register(&self, record: WorkerRecord) -> anyhow::Result<()>;

    fn mark_busy(&self, id: &WorkerId) -> anyhow::Result<()>;
    /// Rejects `at_ms` earlier than the worker's previous idle transition.
    fn mark_idle(&self, id: &WorkerId, at_ms: TimestampMs) -> anyhow::Result<()>;
    fn mark_stopping(&self, id: &WorkerId) -> anyhow::Result<()>;

    fn remove(&self, id: &WorkerId) -> anyhow::Result<()>;
}
