use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Three-tier banding of an ApexScore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const LOW_RISK_FLOOR: u8 = 75;
    pub const MEDIUM_RISK_FLOOR: u8 = 50;

    pub fn from_score(score: u8) -> Self {
        if score >= Self::LOW_RISK_FLOOR {
            RiskLevel::Low
        } else if score >= Self::MEDIUM_RISK_FLOOR {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    pub const ALL: [RiskLevel; 3] = [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low];
}

/// Behavioral stability indicators, each bounded to [0, 100].
///
/// Higher values read as more stable, except `travel_frequency` where a higher
/// value means more movement and therefore more risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BehavioralIndicators {
    pub location_consistency: u8,
    pub ip_vs_address: u8,
    pub device_stability: u8,
    pub sim_changes: u8,
    pub travel_frequency: u8,
}

impl BehavioralIndicators {
    pub const MAX: u8 = 100;

    /// Returns the first indicator outside [0, 100], if any.
    pub fn out_of_range(&self) -> Option<(&'static str, u8)> {
        [
            ("location_consistency", self.location_consistency),
            ("ip_vs_address", self.ip_vs_address),
            ("device_stability", self.device_stability),
            ("sim_changes", self.sim_changes),
            ("travel_frequency", self.travel_frequency),
        ]
        .into_iter()
        .find(|(_, value)| *value > Self::MAX)
    }
}

/// Repayment status of a single loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanStatus {
    OnTime,
    Late,
    Default,
    Active,
    Restructured,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 5] = [
        LoanStatus::OnTime,
        LoanStatus::Late,
        LoanStatus::Default,
        LoanStatus::Active,
        LoanStatus::Restructured,
    ];

    /// Whether the loan has reached a final repayment outcome.
    pub fn is_settled(&self) -> bool {
        !matches!(self, LoanStatus::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanRecord {
    pub institution: String,
    pub amount: u64,
    pub purpose: String,
    pub disbursed_on: NaiveDate,
    pub status: LoanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_overdue: Option<u16>,
}

/// Traditional financial data: loan history plus the derived outstanding debt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FinancialHistory {
    pub currency: String,
    pub outstanding_debt: u64,
    pub loan_history: Vec<LoanRecord>,
}

impl FinancialHistory {
    /// Percentage of a restructured loan still counted as outstanding.
    pub const RESTRUCTURED_OUTSTANDING_PCT: u64 = 60;

    pub fn from_loans(currency: impl Into<String>, loan_history: Vec<LoanRecord>) -> Self {
        let outstanding_debt = outstanding_debt(&loan_history);
        Self {
            currency: currency.into(),
            outstanding_debt,
            loan_history,
        }
    }

    pub fn has_default(&self) -> bool {
        self.loan_history
            .iter()
            .any(|loan| loan.status == LoanStatus::Default)
    }

    pub fn count(&self, status: LoanStatus) -> usize {
        self.loan_history
            .iter()
            .filter(|loan| loan.status == status)
            .count()
    }

    pub fn total_borrowed(&self) -> u64 {
        self.loan_history.iter().map(|loan| loan.amount).sum()
    }

    pub fn formatted_debt(&self) -> String {
        format!("{} {}", self.currency, group_thousands(self.outstanding_debt))
    }
}

fn outstanding_debt(loans: &[LoanRecord]) -> u64 {
    loans
        .iter()
        .map(|loan| match loan.status {
            LoanStatus::Active | LoanStatus::Default => loan.amount,
            LoanStatus::Restructured => {
                loan.amount * FinancialHistory::RESTRUCTURED_OUTSTANDING_PCT / 100
            }
            LoanStatus::OnTime | LoanStatus::Late => 0,
        })
        .sum()
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    pub country_code: String,
    pub region: String,
    pub city: String,
    pub address: String,
    pub coordinates: Coordinates,
}

impl Location {
    pub fn display(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMetadata {
    pub model: String,
    pub os_version: String,
    pub fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkMetadata {
    pub ip_address: String,
    pub isp: String,
}

/// Synthetic applicant record. Every field is a function of the identifier and
/// the generator version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub id: Uuid,
    pub identifier: String,
    pub generator_version: String,
    pub name: String,
    pub occupation: String,
    pub phone: String,
    pub location: Location,
    pub bsi: BehavioralIndicators,
    pub tfd: FinancialHistory,
    pub device: DeviceMetadata,
    pub network: NetworkMetadata,
    pub apex_score: u8,
    pub risk_level: RiskLevel,
}

impl ApplicantProfile {
    pub fn has_default(&self) -> bool {
        self.tfd.has_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(amount: u64, status: LoanStatus) -> LoanRecord {
        LoanRecord {
            institution: "Access Bank".to_string(),
            amount,
            purpose: "Working capital".to_string(),
            disbursed_on: NaiveDate::from_ymd_opt(2023, 6, 1).expect("valid date"),
            status,
            days_overdue: None,
        }
    }

    #[test]
    fn risk_level_bands_are_inclusive_at_floors() {
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(75), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(74), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(50), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(49), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::High);
    }

    #[test]
    fn risk_level_never_improves_as_score_drops() {
        let mut previous = RiskLevel::from_score(100);
        for score in (0..=100u8).rev() {
            let level = RiskLevel::from_score(score);
            assert!(level >= previous, "score {score} moved to a lower tier");
            previous = level;
        }
    }

    #[test]
    fn outstanding_debt_counts_active_default_and_part_of_restructured() {
        let history = FinancialHistory::from_loans(
            "NGN",
            vec![
                loan(100_000, LoanStatus::Active),
                loan(50_000, LoanStatus::Default),
                loan(200_000, LoanStatus::Restructured),
                loan(999_000, LoanStatus::OnTime),
                loan(10_000, LoanStatus::Late),
            ],
        );

        assert_eq!(history.outstanding_debt, 100_000 + 50_000 + 120_000);
        assert!(history.has_default());
        assert_eq!(history.formatted_debt(), "NGN 270,000");
    }

    #[test]
    fn loan_status_serializes_in_kebab_case() {
        let encoded = serde_json::to_string(&LoanStatus::OnTime).expect("serializes");
        assert_eq!(encoded, "\"on-time\"");
    }

    #[test]
    fn out_of_range_reports_first_offending_indicator() {
        let bsi = BehavioralIndicators {
            location_consistency: 90,
            ip_vs_address: 101,
            device_stability: 90,
            sim_changes: 200,
            travel_frequency: 10,
        };
        assert_eq!(bsi.out_of_range(), Some(("ip_vs_address", 101)));
    }
}
