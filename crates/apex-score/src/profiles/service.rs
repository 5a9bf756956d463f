use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{BehavioralIndicators, FinancialHistory, RiskLevel};
use super::generator::ProfileGenerator;
use super::identifier::IdentifierError;
use super::recommendation::{recommend, ActionPriority, ActionRecommendation};
use super::repository::{ProfileStore, ProfileSummary, RepositoryError, StoredProfile};
use super::scoring::{BsiBreakdown, ScoreOutcome, ScoringError, ScoringVariant};
use super::seed::derive_seed;

/// Version tag reported alongside computed scores.
pub const MODEL_VERSION: &str = "1.0";

/// Controls auto-generation of filler profiles when listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillPolicy {
    pub enabled: bool,
    /// Upper bound on profiles created by a single list call.
    pub max_synthetic: usize,
}

impl Default for FillPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            max_synthetic: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    pub fill: FillPolicy,
    pub max_list_limit: usize,
    /// Create `applicant-{n}` on a numeric lookup miss instead of failing.
    pub numeric_creation: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            fill: FillPolicy::default(),
            max_list_limit: 100,
            numeric_creation: false,
        }
    }
}

/// Service composing the generator, scorer and injected profile store.
pub struct ApplicantService<S> {
    generator: Arc<ProfileGenerator>,
    store: Arc<S>,
    options: ServiceOptions,
}

impl<S> ApplicantService<S>
where
    S: ProfileStore + 'static,
{
    pub fn new(generator: ProfileGenerator, store: Arc<S>, options: ServiceOptions) -> Self {
        Self {
            generator: Arc::new(generator),
            store,
            options,
        }
    }

    pub fn generator(&self) -> &ProfileGenerator {
        &self.generator
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    /// Return the cached profile for an identifier, generating it on first use.
    pub fn get_or_create(&self, raw: &str) -> Result<StoredProfile, ProfileServiceError> {
        let identifier = self.generator.identify(raw).map_err(|err| {
            warn!(error = %err, "rejected applicant identifier");
            err
        })?;

        if let Some(stored) = self.store.get(&identifier)? {
            return Ok(stored);
        }

        let profile = self
            .generator
            .synthesize(&identifier, derive_seed(&identifier))?;
        debug!(
            identifier = %profile.identifier,
            apex_score = profile.apex_score,
            risk_level = profile.risk_level.label(),
            "generated applicant profile"
        );

        Ok(self.store.put_if_absent(profile)?)
    }

    /// Lookup by store sequence number.
    pub fn get_by_number(&self, number: u64) -> Result<StoredProfile, ProfileServiceError> {
        if let Some(stored) = self.store.get_by_number(number)? {
            return Ok(stored);
        }

        if self.options.numeric_creation {
            return self.get_or_create(&format!("applicant-{number}"));
        }

        Err(ProfileServiceError::NotFound {
            key: number.to_string(),
        })
    }

    /// Resolves a path key: all-digit keys are store numbers, anything else an identifier.
    pub fn lookup(&self, key: &str) -> Result<StoredProfile, ProfileServiceError> {
        let trimmed = key.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit()) {
            return match trimmed.parse::<u64>() {
                Ok(number) => self.get_by_number(number),
                // Too large to be a store number, so nothing can match it.
                Err(_) => Err(ProfileServiceError::NotFound {
                    key: trimmed.to_string(),
                }),
            };
        }
        self.get_or_create(key)
    }

    /// Lists up to `limit` summaries ordered by store number, topping the store
    /// up with filler profiles first when the fill policy allows it.
    pub fn list(
        &self,
        limit: usize,
        risk_filter: Option<RiskLevel>,
    ) -> Result<Vec<ProfileSummary>, ProfileServiceError> {
        let limit = limit.min(self.options.max_list_limit);
        if self.options.fill.enabled {
            self.fill_to(limit)?;
        }

        Ok(self
            .store
            .values()?
            .iter()
            .filter(|stored| risk_filter.map_or(true, |level| stored.profile.risk_level == level))
            .take(limit)
            .map(StoredProfile::summary)
            .collect())
    }

    fn fill_to(&self, limit: usize) -> Result<(), ProfileServiceError> {
        let mut missing = limit
            .saturating_sub(self.store.len()?)
            .min(self.options.fill.max_synthetic);
        if missing > 0 {
            debug!(missing, "generating filler applicant profiles");
        }

        let mut index = 1u64;
        while missing > 0 {
            let identifier = filler_identifier(index);
            if self.store.get(&identifier)?.is_none() {
                self.get_or_create(&identifier)?;
                missing -= 1;
            }
            index += 1;
        }
        Ok(())
    }

    /// Pure scoring, independent of the store.
    pub fn score(
        &self,
        bsi: &BehavioralIndicators,
        financial: Option<&FinancialHistory>,
        variant: Option<ScoringVariant>,
    ) -> Result<ScoreOutcome, ProfileServiceError> {
        let scorer = self.generator.scorer();
        let variant = variant.unwrap_or_else(|| scorer.variant());
        Ok(scorer.score_as(variant, bsi, financial)?)
    }

    pub fn breakdown(&self, key: &str) -> Result<(StoredProfile, BsiBreakdown), ProfileServiceError> {
        let stored = self.lookup(key)?;
        let breakdown = self.generator.scorer().breakdown(&stored.profile.bsi);
        Ok((stored, breakdown))
    }

    pub fn recommendation(&self, stored: &StoredProfile) -> ActionRecommendation {
        recommend(stored.profile.apex_score, &stored.profile.bsi)
    }

    /// Cached profiles scoring below `threshold`, lowest score first.
    pub fn high_risk(&self, threshold: u8) -> Result<Vec<HighRiskEntry>, ProfileServiceError> {
        let mut entries: Vec<HighRiskEntry> = self
            .store
            .values()?
            .into_iter()
            .filter(|stored| stored.profile.apex_score < threshold)
            .map(|stored| {
                let has_default = stored.profile.has_default();
                HighRiskEntry {
                    summary: stored.summary(),
                    has_default,
                    urgency: if has_default {
                        ActionPriority::Critical
                    } else {
                        ActionPriority::High
                    },
                }
            })
            .collect();

        entries.sort_by_key(|entry| (entry.summary.apex_score, entry.summary.number));
        Ok(entries)
    }

    /// Recommendation for an applicant with a defaulted loan, if any.
    pub fn default_action(
        &self,
        key: &str,
    ) -> Result<(StoredProfile, Option<ActionRecommendation>), ProfileServiceError> {
        let stored = self.lookup(key)?;
        let action = stored
            .profile
            .has_default()
            .then(|| self.recommendation(&stored));
        Ok((stored, action))
    }

    /// Fold over the current store contents.
    pub fn stats(&self) -> Result<PortfolioStats, ProfileServiceError> {
        let values = self.store.values()?;
        let mut risk_distribution: BTreeMap<&'static str, usize> = RiskLevel::ALL
            .iter()
            .map(|level| (level.label(), 0))
            .collect();
        let mut active_defaults = 0;
        let mut score_total = 0u64;

        for stored in &values {
            *risk_distribution
                .entry(stored.profile.risk_level.label())
                .or_insert(0) += 1;
            if stored.profile.has_default() {
                active_defaults += 1;
            }
            score_total += u64::from(stored.profile.apex_score);
        }

        let total = values.len();
        let high = risk_distribution
            .get(RiskLevel::High.label())
            .copied()
            .unwrap_or(0);
        let (high_pct, average_score) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                high as f64 / total as f64 * 100.0,
                score_total as f64 / total as f64,
            )
        };

        Ok(PortfolioStats {
            total_applicants: total,
            risk_distribution,
            active_defaults,
            average_score: (average_score * 10.0).round() / 10.0,
            high_risk_percentage: format!("{high_pct:.1}%"),
        })
    }
}

pub fn filler_identifier(index: u64) -> String {
    format!("filler-applicant-{index}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighRiskEntry {
    #[serde(flatten)]
    pub summary: ProfileSummary,
    pub has_default: bool,
    pub urgency: ActionPriority,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioStats {
    pub total_applicants: usize,
    pub risk_distribution: BTreeMap<&'static str, usize>,
    pub active_defaults: usize,
    pub average_score: f64,
    pub high_risk_percentage: String,
}

/// Error raised by the applicant service.
#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error(transparent)]
    InvalidIdentifier(#[from] IdentifierError),
    #[error("applicant {key} not found")]
    NotFound { key: String },
    #[error(transparent)]
    InvalidIndicators(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
