use serde::{Deserialize, Serialize};

use super::super::domain::BehavioralIndicators;
use super::ScoringConfigError;

/// Allowed drift when checking that a weight table sums to one.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Linear weights applied to the behavioral indicators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BsiWeights {
    pub location_consistency: f64,
    pub ip_vs_address: f64,
    pub device_stability: f64,
    pub sim_changes: f64,
    /// Applied to `100 - travel_frequency`.
    pub travel_frequency: f64,
}

impl BsiWeights {
    pub const STANDARD: BsiWeights = BsiWeights {
        location_consistency: 0.30,
        ip_vs_address: 0.20,
        device_stability: 0.20,
        sim_changes: 0.15,
        travel_frequency: 0.15,
    };

    fn as_array(&self) -> [f64; 5] {
        [
            self.location_consistency,
            self.ip_vs_address,
            self.device_stability,
            self.sim_changes,
            self.travel_frequency,
        ]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        check_table("bsi", &self.as_array())
    }

    /// Weighted behavioral score before rounding, in [0, 100] for valid input.
    pub fn raw(&self, bsi: &BehavioralIndicators) -> f64 {
        self.location_consistency * f64::from(bsi.location_consistency)
            + self.ip_vs_address * f64::from(bsi.ip_vs_address)
            + self.device_stability * f64::from(bsi.device_stability)
            + self.sim_changes * f64::from(bsi.sim_changes)
            + self.travel_frequency * f64::from(100 - bsi.travel_frequency.min(100))
    }
}

impl Default for BsiWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Split between the behavioral and financial components of the blended score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub behavioral: f64,
    pub financial: f64,
}

impl BlendWeights {
    pub const STANDARD: BlendWeights = BlendWeights {
        behavioral: 0.6,
        financial: 0.4,
    };

    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        check_table("blend", &[self.behavioral, self.financial])
    }
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

fn check_table(table: &'static str, weights: &[f64]) -> Result<(), ScoringConfigError> {
    if let Some(weight) = weights
        .iter()
        .copied()
        .find(|weight| !weight.is_finite() || *weight < 0.0)
    {
        return Err(ScoringConfigError::InvalidWeight { table, weight });
    }

    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ScoringConfigError::WeightsDoNotSumToOne { table, sum });
    }

    Ok(())
}
