use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    Busy,
    Idle,
    /// Stopping, stopped, or any state in which the worker accepts no new work.
    Stopping,
}

/// Outcome of evaluating one worker. Carries no reason or payload; the caller decides
/// how to deliver a graceful stop.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationDecision {
    DoNotExpire,
    GracefulExpire,
}

impl ExpirationDecision {
    pub fn is_expire(&self) -> bool {
        matches!(self, ExpirationDecision::GracefulExpire)
    }
}
