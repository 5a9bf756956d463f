use serde::{Deserialize, Serialize};

use super::super::domain::{FinancialHistory, LoanStatus};

/// Fixed penalty table for the financial half of the blended score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialPenalties {
    /// Component value when no loan has settled yet.
    pub thin_file_baseline: f64,
    pub per_default: f64,
    pub per_late: f64,
    pub per_restructured: f64,
    /// `(ratio floor, penalty)` pairs on outstanding / borrowed, highest floor first.
    pub debt_tiers: [(f64, f64); 3],
}

impl FinancialPenalties {
    pub const STANDARD: FinancialPenalties = FinancialPenalties {
        thin_file_baseline: 70.0,
        per_default: 25.0,
        per_late: 5.0,
        per_restructured: 10.0,
        debt_tiers: [(0.75, 20.0), (0.50, 10.0), (0.25, 5.0)],
    };

    fn debt_penalty(&self, ratio: f64) -> f64 {
        self.debt_tiers
            .iter()
            .find(|(floor, _)| ratio > *floor)
            .map(|(_, penalty)| *penalty)
            .unwrap_or(0.0)
    }
}

impl Default for FinancialPenalties {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Repayment-behavior component in [0, 100].
pub(crate) fn financial_component(history: &FinancialHistory, penalties: &FinancialPenalties) -> f64 {
    let settled = history
        .loan_history
        .iter()
        .filter(|loan| loan.status.is_settled())
        .count();
    let on_time = history.count(LoanStatus::OnTime);

    let base = if settled == 0 {
        penalties.thin_file_baseline
    } else {
        100.0 * on_time as f64 / settled as f64
    };

    let borrowed = history.total_borrowed();
    let debt_ratio = if borrowed == 0 {
        0.0
    } else {
        history.outstanding_debt as f64 / borrowed as f64
    };

    let component = base
        - penalties.per_default * history.count(LoanStatus::Default) as f64
        - penalties.per_late * history.count(LoanStatus::Late) as f64
        - penalties.per_restructured * history.count(LoanStatus::Restructured) as f64
        - penalties.debt_penalty(debt_ratio);

    component.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::domain::LoanRecord;
    use chrono::NaiveDate;

    fn history(statuses: &[LoanStatus]) -> FinancialHistory {
        let loans = statuses
            .iter()
            .map(|status| LoanRecord {
                institution: "Equity Bank".to_string(),
                amount: 10_000,
                purpose: "Inventory purchase".to_string(),
                disbursed_on: NaiveDate::from_ymd_opt(2022, 3, 14).expect("valid date"),
                status: *status,
                days_overdue: None,
            })
            .collect();
        FinancialHistory::from_loans("KES", loans)
    }

    #[test]
    fn empty_history_uses_thin_file_baseline() {
        let component = financial_component(&history(&[]), &FinancialPenalties::STANDARD);
        assert!((component - 70.0).abs() < 1e-9);
    }

    #[test]
    fn clean_history_scores_full_marks() {
        let component = financial_component(
            &history(&[LoanStatus::OnTime, LoanStatus::OnTime]),
            &FinancialPenalties::STANDARD,
        );
        assert!((component - 100.0).abs() < 1e-9);
    }

    #[test]
    fn defaults_and_debt_tier_stack() {
        // 1 on-time of 2 settled = 50, minus 25 for the default; outstanding 20k
        // of 30k borrowed (0.67) costs another 10.
        let component = financial_component(
            &history(&[LoanStatus::OnTime, LoanStatus::Default, LoanStatus::Active]),
            &FinancialPenalties::STANDARD,
        );
        assert!((component - 15.0).abs() < 1e-9);
    }

    #[test]
    fn component_never_goes_negative() {
        let component = financial_component(
            &history(&[LoanStatus::Default, LoanStatus::Default, LoanStatus::Default]),
            &FinancialPenalties::STANDARD,
        );
        assert_eq!(component, 0.0);
    }
}
