use serde::Serialize;

use super::super::domain::BehavioralIndicators;
use super::weights::BsiWeights;

/// Per-indicator contribution to the behavioral score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BsiContribution {
    pub code: &'static str,
    pub label: &'static str,
    /// Indicator value as weighted; travel frequency is reported inverted.
    pub score: u8,
    pub weight: f64,
    /// Rounded to one decimal place for display.
    pub contribution: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BsiBreakdown {
    pub components: Vec<BsiContribution>,
    pub raw_total: f64,
}

pub fn bsi_breakdown(bsi: &BehavioralIndicators, weights: &BsiWeights) -> BsiBreakdown {
    let rows = [
        (
            "BSI-1",
            "Location Consistency",
            bsi.location_consistency,
            weights.location_consistency,
            "Consistency of city/region over time",
        ),
        (
            "BSI-2",
            "IP vs Declared Address",
            bsi.ip_vs_address,
            weights.ip_vs_address,
            "Device IP region matches declared address",
        ),
        (
            "BSI-3",
            "Device Stability",
            bsi.device_stability,
            weights.device_stability,
            "Frequency of primary device changes",
        ),
        (
            "BSI-4",
            "SIM Changes",
            bsi.sim_changes,
            weights.sim_changes,
            "SIM card turnover frequency",
        ),
        (
            "BSI-5",
            "Travel Frequency",
            100 - bsi.travel_frequency.min(100),
            weights.travel_frequency,
            "Travel outside home region (lower is better)",
        ),
    ];

    let components = rows
        .into_iter()
        .map(|(code, label, score, weight, description)| BsiContribution {
            code,
            label,
            score,
            weight,
            contribution: (f64::from(score) * weight * 10.0).round() / 10.0,
            description,
        })
        .collect();

    BsiBreakdown {
        components,
        raw_total: weights.raw(bsi),
    }
}
