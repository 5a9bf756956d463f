use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::domain::{ApplicantProfile, RiskLevel};

/// Store record wrapping an immutable profile with store-assigned metadata.
///
/// `number` and `generated_at` are not part of the deterministic profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredProfile {
    pub number: u64,
    pub generated_at: DateTime<Utc>,
    pub profile: ApplicantProfile,
}

impl StoredProfile {
    pub fn summary(&self) -> ProfileSummary {
        let profile = &self.profile;
        ProfileSummary {
            number: self.number,
            id: profile.id,
            identifier: profile.identifier.clone(),
            name: profile.name.clone(),
            location: profile.location.display(),
            occupation: profile.occupation.clone(),
            apex_score: profile.apex_score,
            risk_level: profile.risk_level,
            outstanding_debt: profile.tfd.formatted_debt(),
        }
    }
}

/// Compact listing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub number: u64,
    pub id: Uuid,
    pub identifier: String,
    pub name: String,
    pub location: String,
    pub occupation: String,
    pub apex_score: u8,
    pub risk_level: RiskLevel,
    pub outstanding_debt: String,
}

/// Key-value store for generated profiles, keyed by normalized identifier.
pub trait ProfileStore: Send + Sync {
    fn get(&self, identifier: &str) -> Result<Option<StoredProfile>, RepositoryError>;
    fn get_by_number(&self, number: u64) -> Result<Option<StoredProfile>, RepositoryError>;
    /// Stores the profile unless its identifier is already present and returns
    /// the record held by the store afterwards.
    fn put_if_absent(&self, profile: ApplicantProfile) -> Result<StoredProfile, RepositoryError>;
    /// All records ordered by `number`.
    fn values(&self) -> Result<Vec<StoredProfile>, RepositoryError>;
    fn len(&self) -> Result<usize, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}
