use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use fleet_core::{RegistrySnapshot, TimestampMs, WorkerId, WorkerRecord, WorkerState};

use crate::error::RegistryError;
use crate::traits::WorkerRegistry;

/// In-memory registry. Not durable and not shared across processes; used by the
/// fixture loader and in tests.
#[derive(Default)]
pub struct InMemoryRegistry {
    inner: Mutex<BTreeMap<WorkerId, WorkerRecord>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = WorkerRecord>) -> anyhow::Result<Self> {
        let registry = Self::new();
        for record in records {
            registry.register(record)?;
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<WorkerId, WorkerRecord>>, RegistryError> {
        self.inner.lock().map_err(|_| RegistryError::Poisoned)
    }

    fn update(&self, id: &WorkerId, f: impl FnOnce(&mut WorkerRecord) -> Result<(), RegistryError>) -> anyhow::Result<()> {
        let mut inner = self.lock()?;
        let record = inner.get_mut(id).ok_or_else(|| RegistryError::UnknownWorker(id.clone()))?;
        f(record)?;
        Ok(())
    }
}

impl WorkerRegistry for InMemoryRegistry {
    fn snapshot(&self, now_ms: TimestampMs) -> anyhow::Result<RegistrySnapshot> {
        let inner = self.lock()?;
        Ok(RegistrySnapshot { now_ms, workers: inner.values().cloned().collect() })
    }

    fn register(&self, record: WorkerRecord) -> anyhow::Result<()> {
        let mut inner = self.lock()?;
        if inner.contains_key(&record.id) {
            return Err(RegistryError::AlreadyRegistered(record.id).into());
        }
        inner.insert(record.id.clone(), record);
        Ok(())
    }

    fn mark_busy(&self, id: &WorkerId) -> anyhow::Result<()> {
        self.update(id, |r| {
            r.state = WorkerState::Busy;
            Ok(())
        })
    }

    fn mark_idle(&self, id: &WorkerId, at_ms: TimestampMs) -> anyhow::Result<()> {
        self.update(id, |r| {
            if at_ms < r.last_idle_ms {
                return Err(RegistryError::NonMonotonicIdle { id: r.id.clone(), at_ms, last_idle_ms: r.last_idle_ms });
            }
            r.state = WorkerState::Idle;
            r.last_idle_ms = at_ms;
            Ok(())
        })
    }

    fn mark_stopping(&self, id: &WorkerId) -> anyhow::Result<()> {
        self.update(id, |r| {
            r.state = WorkerState::Stopping;
            Ok(())
        })
    }

    fn remove(&self, id: &WorkerId) -> anyhow::Result<()> {
        let mut inner = self.lock()?;
        inner.remove(id).ok_or_else(|| RegistryError::UnknownWorker(id.clone()))?;
        Ok(())
    }
}
