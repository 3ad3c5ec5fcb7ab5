use fleet_core::{TimestampMs, WorkerId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("worker {0} is already registered")]
    AlreadyRegistered(WorkerId),

    #[error("unknown worker {0}")]
    UnknownWorker(WorkerId),

    #[error("worker {id} went idle at {at_ms} but was last idle at {last_idle_ms}")]
    NonMonotonicIdle { id: WorkerId, at_ms: TimestampMs, last_idle_ms: TimestampMs },

    #[error("registry lock poisoned")]
    Poisoned,
}
