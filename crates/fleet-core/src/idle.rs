use std::time::Duration;

use crate::{TimestampMs, WorkerRecord};

/// How long a worker has been continuously idle as of `now_ms`.
pub trait IdleDurationSource: Send + Sync {
    fn idle_duration_of(&self, worker: &WorkerRecord, now_ms: TimestampMs) -> Duration;
}

impl<F> IdleDurationSource for F
where
    F: Fn(&WorkerRecord, TimestampMs) -> Duration + Send + Sync,
{
    fn idle_duration_of(&self, worker: &WorkerRecord, now_ms: TimestampMs) -> Duration {
        self(worker, now_ms)
    }
}

/// Measures from the record's `last_idle_ms`. A clock that reads earlier than the
/// last idle transition yields zero rather than a negative span.
#[derive(Clone, Copy, Debug, Default)]
pub struct SinceLastIdle;

impl IdleDurationSource for SinceLastIdle {
    fn idle_duration_of(&self, worker: &WorkerRecord, now_ms: TimestampMs) -> Duration {
        let elapsed = now_ms.saturating_sub(worker.last_idle_ms).max(0);
        Duration::from_millis(elapsed as u64)
    }
}
