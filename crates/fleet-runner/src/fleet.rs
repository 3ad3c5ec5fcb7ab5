use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use fleet_core::{ContextFingerprint, RegistrySnapshot, TimestampMs, WorkerRecord};
use fleet_registry::InMemoryRegistry;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::util::now_ms;

/// A registry snapshot written down as YAML.
///
/// ```yaml
/// now_ms: 60000
/// workers:
///   - id: a
///     state: idle
///     last_idle_ms: 1000
///     context: { toolchain: "17" }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FleetFile {
    /// Pinned clock; the wall clock is used when absent.
    #[serde(default)]
    pub now_ms: Option<TimestampMs>,
    #[serde(default)]
    pub workers: Vec<WorkerRecord>,
}

impl FleetFile {
    pub fn clock(&self) -> TimestampMs {
        self.now_ms.unwrap_or_else(now_ms)
    }

    pub fn into_registry(self) -> Result<InMemoryRegistry> {
        InMemoryRegistry::from_records(self.workers).context("build registry from fleet file")
    }
}

pub fn load_fleet(path: &Path) -> Result<FleetFile> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read fleet file: {}", path.display()))?;
    let fleet: FleetFile = serde_yaml::from_str(&s).with_context(|| format!("parse fleet file: {}", path.display()))?;
    Ok(fleet)
}

/// Hex SHA-256 of the fingerprint's JSON encoding. Attribute order is canonical because
/// the fingerprint is an ordered map.
pub fn context_digest(context: &ContextFingerprint) -> Result<String> {
    let bytes = serde_json::to_vec(context).context("encode context fingerprint")?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Workers bucketed by identical context, keyed by digest. Display aid only: the
/// expiration policy groups by its predicate, which may be looser than equality.
pub fn group_by_context(snapshot: &RegistrySnapshot) -> Result<BTreeMap<String, Vec<&WorkerRecord>>> {
    let mut groups: BTreeMap<String, Vec<&WorkerRecord>> = BTreeMap::new();
    for w in &snapshot.workers {
        groups.entry(context_digest(&w.context)?).or_default().push(w);
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::WorkerState;

    const FLEET: &str = r#"
now_ms: 60000
workers:
  - id: a
    state: idle
    last_idle_ms: 1000
    context: { toolchain: "17" }
  - id: b
    state: busy
    last_idle_ms: 2000
    context: { toolchain: "17" }
  - id: c
    state: stopping
    last_idle_ms: 3000
"#;

    #[test]
    fn parses_fleet_yaml() {
        let fleet: FleetFile = serde_yaml::from_str(FLEET).unwrap();
        assert_eq!(fleet.clock(), 60_000);
        assert_eq!(fleet.workers.len(), 3);
        assert_eq!(fleet.workers[1].state, WorkerState::Busy);
        assert_eq!(fleet.workers[0].context.get("toolchain"), Some("17"));
        assert!(fleet.workers[2].context.0.is_empty());
    }

    #[test]
    fn digest_ignores_insertion_order() {
        let x = ContextFingerprint::new().with("a", "1").with("b", "2");
        let y = ContextFingerprint::new().with("b", "2").with("a", "1");
        assert_eq!(context_digest(&x).unwrap(), context_digest(&y).unwrap());
        assert_eq!(context_digest(&x).unwrap().len(), 64);
        assert_ne!(context_digest(&x).unwrap(), context_digest(&ContextFingerprint::new()).unwrap());
    }

    #[test]
    fn groups_by_identical_context() {
        let fleet: FleetFile = serde_yaml::from_str(FLEET).unwrap();
        let snap = RegistrySnapshot::new(fleet.clock(), fleet.workers);
        let groups = group_by_context(&snap).unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups.values().any(|g| g.len() == 2));
    }
}
