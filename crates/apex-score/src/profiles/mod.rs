//! Synthetic applicant profiles: seeded generation, ApexScore scoring, action
//! recommendations, and the service/router pair exposing them.

pub mod domain;
pub mod generator;
pub mod identifier;
pub mod recommendation;
pub(crate) mod reference;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod seed;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantProfile, BehavioralIndicators, Coordinates, DeviceMetadata, FinancialHistory,
    LoanRecord, LoanStatus, Location, NetworkMetadata, RiskLevel,
};
pub use generator::{GenerationError, GeneratorConfigError, ProfileGenerator, GENERATOR_VERSION};
pub use identifier::{IdentifierError, IdentifierKind, IdentifierPolicy, IdentifierPolicyError};
pub use recommendation::{
    recommend, ActionPriority, ActionRecommendation, ActionType, DEFAULT_RISK_THRESHOLD,
};
pub use repository::{ProfileStore, ProfileSummary, RepositoryError, StoredProfile};
pub use router::applicant_router;
pub use scoring::{
    BlendWeights, BsiBreakdown, BsiWeights, FinancialPenalties, RiskScorer, ScoreOutcome,
    ScoringConfigError, ScoringError, ScoringVariant,
};
pub use seed::{derive_seed, Seed};
pub use service::{
    filler_identifier, ApplicantService, FillPolicy, HighRiskEntry, PortfolioStats,
    ProfileServiceError, ServiceOptions, MODEL_VERSION,
};

use crate::config::ProfileSettings;
use std::sync::Arc;

/// Startup failures in the scoring and generation tables.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Scoring(#[from] ScoringConfigError),
    #[error(transparent)]
    Generator(#[from] GeneratorConfigError),
    #[error(transparent)]
    Identifier(#[from] IdentifierPolicyError),
}

/// Wires a validated generator and the injected store into a service.
pub fn build_service<S>(
    store: Arc<S>,
    settings: &ProfileSettings,
) -> Result<ApplicantService<S>, ConfigurationError>
where
    S: ProfileStore + 'static,
{
    let policy = IdentifierPolicy::new(&settings.allowed_domains)?;
    let scorer = RiskScorer::new(settings.variant)?;
    let generator = ProfileGenerator::new(policy, scorer)?;
    Ok(ApplicantService::new(generator, store, settings.options))
}
