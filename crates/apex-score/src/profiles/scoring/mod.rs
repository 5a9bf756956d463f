mod breakdown;
mod financial;
mod weights;

pub use breakdown::{bsi_breakdown, BsiBreakdown, BsiContribution};
pub use financial::FinancialPenalties;
pub use weights::{BlendWeights, BsiWeights, WEIGHT_TOLERANCE};

use super::domain::{BehavioralIndicators, FinancialHistory, RiskLevel};
use financial::financial_component;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named scoring formulas. Each variant is a separate contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringVariant {
    /// Weighted sum of the five behavioral indicators.
    #[default]
    Behavioral,
    /// Behavioral score blended with repayment behavior and debt load.
    Blended,
}

impl ScoringVariant {
    pub fn label(&self) -> &'static str {
        match self {
            ScoringVariant::Behavioral => "behavioral",
            ScoringVariant::Blended => "blended",
        }
    }
}

impl fmt::Display for ScoringVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScoringVariant {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "behavioral" | "bsi" | "v1" => Ok(Self::Behavioral),
            "blended" | "v2" => Ok(Self::Blended),
            other => Err(format!("unknown scoring variant '{other}'")),
        }
    }
}

/// Output of a scoring pass; the level is always derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreOutcome {
    pub apex_score: u8,
    pub risk_level: RiskLevel,
    pub variant: ScoringVariant,
}

impl ScoreOutcome {
    fn from_raw(raw: f64, variant: ScoringVariant) -> Self {
        let apex_score = raw.round().clamp(0.0, 100.0) as u8;
        Self {
            apex_score,
            risk_level: RiskLevel::from_score(apex_score),
            variant,
        }
    }
}

/// Pure scorer holding validated weight tables.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskScorer {
    variant: ScoringVariant,
    weights: BsiWeights,
    blend: BlendWeights,
    penalties: FinancialPenalties,
}

impl RiskScorer {
    pub fn new(variant: ScoringVariant) -> Result<Self, ScoringConfigError> {
        Self::with_tables(
            variant,
            BsiWeights::STANDARD,
            BlendWeights::STANDARD,
            FinancialPenalties::STANDARD,
        )
    }

    pub fn with_tables(
        variant: ScoringVariant,
        weights: BsiWeights,
        blend: BlendWeights,
        penalties: FinancialPenalties,
    ) -> Result<Self, ScoringConfigError> {
        weights.validate()?;
        blend.validate()?;
        Ok(Self {
            variant,
            weights,
            blend,
            penalties,
        })
    }

    pub fn variant(&self) -> ScoringVariant {
        self.variant
    }

    pub fn weights(&self) -> &BsiWeights {
        &self.weights
    }

    /// Scores with the configured variant.
    pub fn score(
        &self,
        bsi: &BehavioralIndicators,
        financial: Option<&FinancialHistory>,
    ) -> Result<ScoreOutcome, ScoringError> {
        self.score_as(self.variant, bsi, financial)
    }

    /// Scores with an explicit variant. The blended variant falls back to the
    /// behavioral formula when no financial history is supplied.
    pub fn score_as(
        &self,
        variant: ScoringVariant,
        bsi: &BehavioralIndicators,
        financial: Option<&FinancialHistory>,
    ) -> Result<ScoreOutcome, ScoringError> {
        if let Some((field, value)) = bsi.out_of_range() {
            return Err(ScoringError::IndicatorOutOfRange { field, value });
        }

        let behavioral = self.weights.raw(bsi);
        let outcome = match (variant, financial) {
            (ScoringVariant::Blended, Some(history)) => {
                let raw = self.blend.behavioral * behavioral
                    + self.blend.financial * financial_component(history, &self.penalties);
                ScoreOutcome::from_raw(raw, ScoringVariant::Blended)
            }
            _ => ScoreOutcome::from_raw(behavioral, ScoringVariant::Behavioral),
        };

        Ok(outcome)
    }

    pub fn breakdown(&self, bsi: &BehavioralIndicators) -> BsiBreakdown {
        bsi_breakdown(bsi, &self.weights)
    }
}

/// Invalid weight tables. Fatal at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("{table} weights sum to {sum}, expected 1.0")]
    WeightsDoNotSumToOne { table: &'static str, sum: f64 },
    #[error("{table} weight {weight} must be finite and non-negative")]
    InvalidWeight { table: &'static str, weight: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("{field} must be between 0 and 100 (got {value})")]
    IndicatorOutOfRange { field: &'static str, value: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::domain::{LoanRecord, LoanStatus};
    use chrono::NaiveDate;

    fn bsi(values: [u8; 5]) -> BehavioralIndicators {
        BehavioralIndicators {
            location_consistency: values[0],
            ip_vs_address: values[1],
            device_stability: values[2],
            sim_changes: values[3],
            travel_frequency: values[4],
        }
    }

    fn scorer() -> RiskScorer {
        RiskScorer::new(ScoringVariant::Behavioral).expect("standard tables are valid")
    }

    #[test]
    fn stable_applicant_scores_low_risk() {
        let outcome = scorer()
            .score(&bsi([92, 88, 90, 95, 25]), None)
            .expect("valid indicators");
        assert_eq!(outcome.apex_score, 89);
        assert_eq!(outcome.risk_level, RiskLevel::Low);
    }

    #[test]
    fn unstable_applicant_scores_high_risk() {
        let outcome = scorer()
            .score(&bsi([42, 38, 45, 35, 78]), None)
            .expect("valid indicators");
        assert_eq!(outcome.apex_score, 38);
        assert_eq!(outcome.risk_level, RiskLevel::High);
    }

    #[test]
    fn score_is_bounded_at_the_extremes() {
        let best = scorer().score(&bsi([100, 100, 100, 100, 0]), None).unwrap();
        let worst = scorer().score(&bsi([0, 0, 0, 0, 100]), None).unwrap();
        assert_eq!(best.apex_score, 100);
        assert_eq!(worst.apex_score, 0);
    }

    #[test]
    fn score_and_level_agree_across_a_sweep() {
        let scorer = scorer();
        for base in (0..=100u8).step_by(5) {
            for travel in (0..=100u8).step_by(10) {
                let outcome = scorer
                    .score(&bsi([base, base, base, base, travel]), None)
                    .unwrap();
                assert!(outcome.apex_score <= 100);
                assert_eq!(outcome.risk_level, RiskLevel::from_score(outcome.apex_score));
            }
        }
    }

    #[test]
    fn out_of_range_indicator_is_rejected() {
        let error = scorer()
            .score(&bsi([92, 88, 90, 95, 125]), None)
            .expect_err("travel out of range");
        assert_eq!(
            error,
            ScoringError::IndicatorOutOfRange {
                field: "travel_frequency",
                value: 125
            }
        );
    }

    #[test]
    fn blended_variant_mixes_in_repayment_behavior() {
        let loans = vec![LoanRecord {
            institution: "GCB Bank".to_string(),
            amount: 20_000,
            purpose: "Vehicle purchase".to_string(),
            disbursed_on: NaiveDate::from_ymd_opt(2022, 1, 10).expect("valid date"),
            status: LoanStatus::Default,
            days_overdue: Some(120),
        }];
        let history = FinancialHistory::from_loans("GHS", loans);
        let scorer = RiskScorer::new(ScoringVariant::Blended).unwrap();

        // behavioral 88.7 * 0.6 = 53.22; financial max(0 - 25 - 20, 0) * 0.4 = 0
        let outcome = scorer
            .score(&bsi([92, 88, 90, 95, 25]), Some(&history))
            .unwrap();
        assert_eq!(outcome.variant, ScoringVariant::Blended);
        assert_eq!(outcome.apex_score, 53);
        assert_eq!(outcome.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn blended_variant_without_history_falls_back_to_behavioral() {
        let scorer = RiskScorer::new(ScoringVariant::Blended).unwrap();
        let outcome = scorer.score(&bsi([92, 88, 90, 95, 25]), None).unwrap();
        assert_eq!(outcome.variant, ScoringVariant::Behavioral);
        assert_eq!(outcome.apex_score, 89);
    }

    #[test]
    fn construction_rejects_bad_weights() {
        let result = RiskScorer::with_tables(
            ScoringVariant::Behavioral,
            BsiWeights {
                sim_changes: 0.0,
                ..BsiWeights::STANDARD
            },
            BlendWeights::STANDARD,
            FinancialPenalties::STANDARD,
        );
        assert!(matches!(
            result,
            Err(ScoringConfigError::WeightsDoNotSumToOne { .. })
        ));
    }

    #[test]
    fn variant_parses_aliases() {
        assert_eq!("BSI".parse::<ScoringVariant>(), Ok(ScoringVariant::Behavioral));
        assert_eq!("blended".parse::<ScoringVariant>(), Ok(ScoringVariant::Blended));
        assert!("linear".parse::<ScoringVariant>().is_err());
    }
}
