use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::domain::{ApplicantProfile, BehavioralIndicators, FinancialHistory, RiskLevel};
use super::recommendation::{ActionRecommendation, DEFAULT_RISK_THRESHOLD};
use super::repository::{ProfileStore, ProfileSummary};
use super::scoring::{BsiContribution, ScoringVariant};
use super::service::{ApplicantService, ProfileServiceError, MODEL_VERSION};

const DEFAULT_LIST_LIMIT: usize = 10;

/// Router builder exposing the applicant lookup and scoring endpoints.
pub fn applicant_router<S>(service: Arc<ApplicantService<S>>) -> Router
where
    S: ProfileStore + 'static,
{
    Router::new()
        .route("/api/applicants", get(list_handler::<S>))
        .route("/api/applicant/:key", get(detail_handler::<S>))
        .route(
            "/api/applicant/:key/bsi-breakdown",
            get(breakdown_handler::<S>),
        )
        .route("/api/calculate-score", post(calculate_score_handler::<S>))
        .route("/api/high-risk", get(high_risk_handler::<S>))
        .route("/api/default-actions/:key", get(default_action_handler::<S>))
        .route("/api/stats", get(stats_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    pub(crate) limit: Option<usize>,
    pub(crate) risk_level: Option<RiskLevel>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListResponse {
    pub(crate) total: usize,
    pub(crate) applicants: Vec<ProfileSummary>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApplicantDetailView {
    pub(crate) number: u64,
    #[serde(flatten)]
    pub(crate) profile: ApplicantProfile,
    pub(crate) has_default: bool,
    pub(crate) action_recommendation: ActionRecommendation,
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) calculation_timestamp: DateTime<Utc>,
    pub(crate) model_version: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct BreakdownResponse {
    pub(crate) applicant_id: Uuid,
    pub(crate) number: u64,
    pub(crate) applicant_name: String,
    pub(crate) apex_score: u8,
    pub(crate) bsi_breakdown: Vec<BsiContribution>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CalculateScoreRequest {
    #[serde(flatten)]
    pub(crate) bsi: BehavioralIndicators,
    #[serde(default)]
    pub(crate) financial: Option<FinancialHistory>,
    #[serde(default)]
    pub(crate) variant: Option<ScoringVariant>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CalculateScoreResponse {
    pub(crate) apex_score: u8,
    pub(crate) risk_level: RiskLevel,
    pub(crate) variant: ScoringVariant,
    pub(crate) model_version: &'static str,
    pub(crate) timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HighRiskQuery {
    pub(crate) threshold: Option<u8>,
}

pub(crate) fn service_error_response(error: ProfileServiceError) -> Response {
    let status = match &error {
        ProfileServiceError::InvalidIdentifier(_) | ProfileServiceError::InvalidIndicators(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ProfileServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ProfileServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<ApplicantService<S>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    S: ProfileStore + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    match service.list(limit, query.risk_level) {
        Ok(applicants) => {
            let body = ListResponse {
                total: applicants.len(),
                applicants,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn detail_handler<S>(
    State(service): State<Arc<ApplicantService<S>>>,
    Path(key): Path<String>,
) -> Response
where
    S: ProfileStore + 'static,
{
    match service.lookup(&key) {
        Ok(stored) => {
            let action_recommendation = service.recommendation(&stored);
            let view = ApplicantDetailView {
                number: stored.number,
                has_default: stored.profile.has_default(),
                profile: stored.profile,
                action_recommendation,
                generated_at: stored.generated_at,
                calculation_timestamp: Utc::now(),
                model_version: MODEL_VERSION,
            };
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn breakdown_handler<S>(
    State(service): State<Arc<ApplicantService<S>>>,
    Path(key): Path<String>,
) -> Response
where
    S: ProfileStore + 'static,
{
    match service.breakdown(&key) {
        Ok((stored, breakdown)) => {
            let body = BreakdownResponse {
                applicant_id: stored.profile.id,
                number: stored.number,
                applicant_name: stored.profile.name,
                apex_score: stored.profile.apex_score,
                bsi_breakdown: breakdown.components,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn calculate_score_handler<S>(
    State(service): State<Arc<ApplicantService<S>>>,
    Json(request): Json<CalculateScoreRequest>,
) -> Response
where
    S: ProfileStore + 'static,
{
    match service.score(&request.bsi, request.financial.as_ref(), request.variant) {
        Ok(outcome) => {
            let body = CalculateScoreResponse {
                apex_score: outcome.apex_score,
                risk_level: outcome.risk_level,
                variant: outcome.variant,
                model_version: MODEL_VERSION,
                timestamp: Utc::now(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn high_risk_handler<S>(
    State(service): State<Arc<ApplicantService<S>>>,
    Query(query): Query<HighRiskQuery>,
) -> Response
where
    S: ProfileStore + 'static,
{
    let threshold = query.threshold.unwrap_or(DEFAULT_RISK_THRESHOLD);
    match service.high_risk(threshold) {
        Ok(applicants) => {
            let payload = json!({
                "threshold": threshold,
                "high_risk_count": applicants.len(),
                "applicants": applicants,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn default_action_handler<S>(
    State(service): State<Arc<ApplicantService<S>>>,
    Path(key): Path<String>,
) -> Response
where
    S: ProfileStore + 'static,
{
    match service.default_action(&key) {
        Ok((stored, None)) => {
            let payload = json!({
                "applicant_id": stored.profile.id,
                "number": stored.number,
                "has_default": false,
                "message": "No default detected for this applicant",
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Ok((stored, Some(action))) => {
            let payload = json!({
                "applicant_id": stored.profile.id,
                "number": stored.number,
                "applicant_name": stored.profile.name,
                "apex_score": stored.profile.apex_score,
                "has_default": true,
                "action": action,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn stats_handler<S>(State(service): State<Arc<ApplicantService<S>>>) -> Response
where
    S: ProfileStore + 'static,
{
    match service.stats() {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => service_error_response(error),
    }
}
