use apex_score::profiles::{ApplicantProfile, ProfileStore, RepositoryError, StoredProfile};
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) dashboard: Option<PathBuf>,
}

#[derive(Default)]
struct StoreInner {
    records: HashMap<String, StoredProfile>,
    /// Identifiers in insertion order, which is also `number` order.
    order: VecDeque<String>,
    last_number: u64,
}

/// Process-local profile cache. With a capacity set, the oldest entry is
/// evicted once the cache grows past it.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileStore {
    inner: Arc<Mutex<StoreInner>>,
    capacity: Option<usize>,
}

impl InMemoryProfileStore {
    pub(crate) fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            inner: Arc::default(),
            capacity: capacity.filter(|limit| *limit > 0),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreInner>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Unavailable("profile store mutex poisoned".to_string()))
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn get(&self, identifier: &str) -> Result<Option<StoredProfile>, RepositoryError> {
        Ok(self.lock()?.records.get(identifier).cloned())
    }

    fn get_by_number(&self, number: u64) -> Result<Option<StoredProfile>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .records
            .values()
            .find(|stored| stored.number == number)
            .cloned())
    }

    fn put_if_absent(&self, profile: ApplicantProfile) -> Result<StoredProfile, RepositoryError> {
        let mut guard = self.lock()?;
        if let Some(existing) = guard.records.get(&profile.identifier) {
            return Ok(existing.clone());
        }

        guard.last_number += 1;
        let stored = StoredProfile {
            number: guard.last_number,
            generated_at: Utc::now(),
            profile,
        };
        let identifier = stored.profile.identifier.clone();
        guard.records.insert(identifier.clone(), stored.clone());
        guard.order.push_back(identifier);

        if let Some(capacity) = self.capacity {
            while guard.records.len() > capacity {
                let Some(oldest) = guard.order.pop_front() else {
                    break;
                };
                guard.records.remove(&oldest);
                debug!(identifier = %oldest, capacity, "evicted cached applicant profile");
            }
        }

        Ok(stored)
    }

    fn values(&self) -> Result<Vec<StoredProfile>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .order
            .iter()
            .filter_map(|identifier| guard.records.get(identifier).cloned())
            .collect())
    }

    fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.records.len())
    }
}
