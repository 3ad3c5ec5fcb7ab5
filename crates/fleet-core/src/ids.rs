use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registry-assigned worker identity.
///
/// Ordering is byte-wise lexicographic over the underlying string. The expiration
/// policy relies on this as its tie-break, so it must stay a total order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub String);

impl WorkerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn from_str(s: impl Into<String>) -> Self {
        Self(s.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WorkerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_bytewise() {
        assert!(WorkerId::from_str("a") < WorkerId::from_str("b"));
        assert!(WorkerId::from_str("B") < WorkerId::from_str("a"));
        assert!(WorkerId::from_str("worker-10") < WorkerId::from_str("worker-9"));
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(WorkerId::new(), WorkerId::new());
    }
}
