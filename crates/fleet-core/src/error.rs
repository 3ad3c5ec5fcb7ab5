use thiserror::Error;

use crate::WorkerId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// The caller asked about a worker the snapshot does not contain. This is a
    /// contract violation, never a "do not expire".
    #[error("worker {id} is not in the registry snapshot")]
    TargetNotInSnapshot { id: WorkerId },
}
