use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::profiles::domain::ApplicantProfile;
use crate::profiles::repository::{ProfileStore, RepositoryError, StoredProfile};
use crate::profiles::{
    applicant_router, ApplicantService, IdentifierPolicy, ProfileGenerator, RiskScorer,
    ScoringVariant, ServiceOptions,
};

#[derive(Default)]
pub(super) struct MemoryStore {
    records: Mutex<(HashMap<String, StoredProfile>, u64)>,
}

impl ProfileStore for MemoryStore {
    fn get(&self, identifier: &str) -> Result<Option<StoredProfile>, RepositoryError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.0.get(identifier).cloned())
    }

    fn get_by_number(&self, number: u64) -> Result<Option<StoredProfile>, RepositoryError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.0.values().find(|stored| stored.number == number).cloned())
    }

    fn put_if_absent(&self, profile: ApplicantProfile) -> Result<StoredProfile, RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if let Some(existing) = guard.0.get(&profile.identifier) {
            return Ok(existing.clone());
        }
        guard.1 += 1;
        let stored = StoredProfile {
            number: guard.1,
            generated_at: Utc::now(),
            profile,
        };
        guard
            .0
            .insert(stored.profile.identifier.clone(), stored.clone());
        Ok(stored)
    }

    fn values(&self) -> Result<Vec<StoredProfile>, RepositoryError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        let mut values: Vec<StoredProfile> = guard.0.values().cloned().collect();
        values.sort_by_key(|stored| stored.number);
        Ok(values)
    }

    fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.records.lock().expect("store mutex poisoned").0.len())
    }
}

pub(super) struct UnavailableStore;

impl ProfileStore for UnavailableStore {
    fn get(&self, _identifier: &str) -> Result<Option<StoredProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn get_by_number(&self, _number: u64) -> Result<Option<StoredProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn put_if_absent(&self, _profile: ApplicantProfile) -> Result<StoredProfile, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn values(&self) -> Result<Vec<StoredProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn len(&self) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) fn generator() -> ProfileGenerator {
    let policy = IdentifierPolicy::new(["email.com", "gmail.com"]).expect("policy builds");
    let scorer = RiskScorer::new(ScoringVariant::Behavioral).expect("scorer builds");
    ProfileGenerator::new(policy, scorer).expect("generator builds")
}

pub(super) fn build_service_with(
    options: ServiceOptions,
) -> (ApplicantService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = ApplicantService::new(generator(), store.clone(), options);
    (service, store)
}

pub(super) fn build_service() -> (ApplicantService<MemoryStore>, Arc<MemoryStore>) {
    build_service_with(ServiceOptions::default())
}

pub(super) fn router_with_service(service: ApplicantService<MemoryStore>) -> axum::Router {
    applicant_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
