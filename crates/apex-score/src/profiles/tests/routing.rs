use super::common::*;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::profiles::router::{detail_handler, list_handler, ListQuery};
use crate::profiles::{ApplicantService, ServiceOptions};

#[tokio::test]
async fn detail_handler_returns_profile_with_recommendation() {
    let (service, _) = build_service();
    let service = Arc::new(service);

    let response = detail_handler::<MemoryStore>(
        State(service),
        Path("chidi.okonkwo@email.com".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["identifier"], json!("chidi.okonkwo@email.com"));
    assert_eq!(payload["number"], json!(1));
    assert!(payload["action_recommendation"]["action_type"].is_string());
    assert!(payload["calculation_timestamp"].is_string());
    assert_eq!(payload["model_version"], json!("1.0"));
}

#[tokio::test]
async fn detail_handler_maps_invalid_identifier_to_unprocessable() {
    let (service, _) = build_service();
    let response = detail_handler::<MemoryStore>(
        State(Arc::new(service)),
        Path("someone@unknown.example".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("unknown.example"));
}

#[tokio::test]
async fn detail_handler_maps_missing_number_to_not_found() {
    let (service, _) = build_service();
    let response =
        detail_handler::<MemoryStore>(State(Arc::new(service)), Path("404".to_string())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_numeric_key_is_not_found() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/applicant/99999999999999999999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_handler_uses_default_limit() {
    let (service, _) = build_service();
    let response =
        list_handler::<MemoryStore>(State(Arc::new(service)), Query(ListQuery::default())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], json!(10));
    assert_eq!(payload["applicants"].as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn list_route_filters_by_risk_level() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/applicants?limit=25&risk_level=Low")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let applicants = payload["applicants"].as_array().expect("array");
    assert!(applicants
        .iter()
        .all(|applicant| applicant["risk_level"] == json!("Low")));
}

#[tokio::test]
async fn calculate_score_route_scores_flat_indicators() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let body = json!({
        "location_consistency": 42,
        "ip_vs_address": 38,
        "device_stability": 45,
        "sim_changes": 35,
        "travel_frequency": 78
    });
    let response = router
        .oneshot(
            Request::post("/api/calculate-score")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["apex_score"], json!(38));
    assert_eq!(payload["risk_level"], json!("High"));
    assert_eq!(payload["variant"], json!("behavioral"));
}

#[tokio::test]
async fn calculate_score_route_rejects_out_of_range_values() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let body = json!({
        "location_consistency": 101,
        "ip_vs_address": 38,
        "device_stability": 45,
        "sim_changes": 35,
        "travel_frequency": 78
    });
    let response = router
        .oneshot(
            Request::post("/api/calculate-score")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn breakdown_route_lists_five_indicators() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/applicant/amina.hassan@email.com/bsi-breakdown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let rows = payload["bsi_breakdown"].as_array().expect("rows");
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[4]["code"], json!("BSI-5"));
}

#[tokio::test]
async fn stats_route_reports_distribution() {
    let (service, _) = build_service();
    service.list(6, None).expect("seeded");
    let router = router_with_service(service);

    let response = router
        .oneshot(Request::get("/api/stats").body(Body::empty()).unwrap())
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total_applicants"], json!(6));
    let distribution: u64 = payload["risk_distribution"]
        .as_object()
        .expect("distribution map")
        .values()
        .filter_map(Value::as_u64)
        .sum();
    assert_eq!(distribution, 6);
}

#[tokio::test]
async fn high_risk_route_defaults_threshold() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(Request::get("/api/high-risk").body(Body::empty()).unwrap())
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["threshold"], json!(40));
    assert_eq!(payload["high_risk_count"], json!(0));
}

#[tokio::test]
async fn default_actions_route_reports_missing_default() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    let stored = service
        .list(30, None)
        .expect("listing")
        .into_iter()
        .map(|summary| service.get_or_create(&summary.identifier).expect("cached"))
        .find(|stored| !stored.profile.has_default());
    let Some(stored) = stored else {
        return;
    };

    let router = crate::profiles::applicant_router(service);
    let response = router
        .oneshot(
            Request::get(format!("/api/default-actions/{}", stored.number))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["has_default"], json!(false));
}

#[tokio::test]
async fn repository_failures_surface_as_internal_errors() {
    let service = Arc::new(ApplicantService::new(
        generator(),
        Arc::new(UnavailableStore),
        ServiceOptions::default(),
    ));

    let response =
        list_handler::<UnavailableStore>(State(service), Query(ListQuery::default())).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
