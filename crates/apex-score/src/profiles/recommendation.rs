use serde::Serialize;

use super::domain::BehavioralIndicators;

/// Scores below this are treated as high risk for default.
pub const DEFAULT_RISK_THRESHOLD: u8 = 40;
const STABLE_SIGNAL_FLOOR: u8 = 70;
const APPROVAL_FLOOR: u8 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    ContactViaRegisteredChannels,
    LegalEscalation,
    EnhancedMonitoring,
    StandardApproval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// Next-best-action guidance for a loan officer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRecommendation {
    pub action_type: ActionType,
    pub priority: ActionPriority,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    pub next_steps: Vec<String>,
}

fn steps(items: &[&str]) -> Vec<String> {
    items.iter().map(|step| step.to_string()).collect()
}

pub fn recommend(score: u8, bsi: &BehavioralIndicators) -> ActionRecommendation {
    if score < DEFAULT_RISK_THRESHOLD {
        if bsi.location_consistency > STABLE_SIGNAL_FLOOR
            && bsi.device_stability > STABLE_SIGNAL_FLOOR
        {
            return ActionRecommendation {
                action_type: ActionType::ContactViaRegisteredChannels,
                priority: ActionPriority::High,
                recommendation: "Stable location and device suggest the applicant is reachable. \
                                 Use registered communication channels first."
                    .to_string(),
                rationale: Some(format!(
                    "Location Consistency: {}/100, Device Stability: {}/100",
                    bsi.location_consistency, bsi.device_stability
                )),
                next_steps: steps(&[
                    "Send registered mail to declared address",
                    "Contact via primary phone number",
                    "Email to registered email address",
                    "Schedule in-person visit if no response within 7 days",
                ]),
            };
        }

        return ActionRecommendation {
            action_type: ActionType::LegalEscalation,
            priority: ActionPriority::Critical,
            recommendation: "Frequent SIM or travel changes suggest the applicant will be hard \
                             to locate. Escalate to legal recovery."
                .to_string(),
            rationale: Some(format!(
                "Location Consistency: {}/100, SIM Stability: {}/100",
                bsi.location_consistency, bsi.sim_changes
            )),
            next_steps: steps(&[
                "Initiate legal proceedings",
                "Engage debt collection agency",
                "File with credit bureau",
                "Consider asset recovery if applicable",
            ]),
        };
    }

    if score < APPROVAL_FLOOR {
        return ActionRecommendation {
            action_type: ActionType::EnhancedMonitoring,
            priority: ActionPriority::Medium,
            recommendation: "Medium risk. Approve with enhanced monitoring and periodic check-ins."
                .to_string(),
            rationale: None,
            next_steps: steps(&[
                "Schedule monthly payment reviews",
                "Limit loan amount to 75% of requested",
                "Require additional collateral",
            ]),
        };
    }

    ActionRecommendation {
        action_type: ActionType::StandardApproval,
        priority: ActionPriority::Low,
        recommendation: "Low risk. Proceed with standard loan approval and monitoring.".to_string(),
        rationale: None,
        next_steps: steps(&[
            "Standard approval process",
            "Quarterly payment reviews",
            "Standard terms and conditions",
        ]),
    }
}
