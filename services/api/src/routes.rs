use crate::infra::AppState;
use apex_score::profiles::{
    applicant_router, ApplicantService, ProfileStore, GENERATOR_VERSION, MODEL_VERSION,
};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

const ENDPOINTS: [&str; 7] = [
    "GET /api/applicants?limit=&risk_level=",
    "GET /api/applicant/:key",
    "GET /api/applicant/:key/bsi-breakdown",
    "POST /api/calculate-score",
    "GET /api/high-risk?threshold=",
    "GET /api/default-actions/:key",
    "GET /api/stats",
];

pub(crate) fn with_ops_routes<S>(service: Arc<ApplicantService<S>>) -> axum::Router
where
    S: ProfileStore + 'static,
{
    applicant_router(service)
        .route("/", axum::routing::get(index_endpoint))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

/// Serves the configured dashboard file, or a JSON service index when none is
/// configured or it cannot be read.
pub(crate) async fn index_endpoint(Extension(state): Extension<AppState>) -> Response {
    if let Some(path) = &state.dashboard {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let content_type = mime_guess::from_path(path)
                    .first_or_octet_stream()
                    .to_string();
                return (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], bytes)
                    .into_response();
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "dashboard unavailable, serving index");
            }
        }
    }

    Json(json!({
        "service": "ApexScore API",
        "version": env!("CARGO_PKG_VERSION"),
        "model_version": MODEL_VERSION,
        "generator_version": GENERATOR_VERSION,
        "endpoints": ENDPOINTS,
    }))
    .into_response()
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryProfileStore;
    use apex_score::config::ProfileSettings;
    use apex_score::profiles::build_service;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn state(ready: bool, dashboard: Option<PathBuf>) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
            dashboard,
        }
    }

    fn app(state: AppState) -> axum::Router {
        let store = Arc::new(InMemoryProfileStore::default());
        let service = build_service(store, &ProfileSettings::default()).expect("service");
        with_ops_routes(Arc::new(service)).layer(Extension(state))
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .expect("body")
            .to_vec()
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let state = state(false, None);
        let flag = state.readiness.clone();
        let router = app(state);

        let response = router
            .clone()
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        flag.store(true, Ordering::Release);
        let response = router
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn index_lists_endpoints_without_dashboard() {
        let response = app(state(true, None))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let payload: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).expect("json");
        assert_eq!(payload["generator_version"], json!(GENERATOR_VERSION));
        assert_eq!(payload["endpoints"].as_array().map(Vec::len), Some(7));
    }

    #[tokio::test]
    async fn index_serves_dashboard_file_with_guessed_type() {
        let path = std::env::temp_dir().join(format!("apex-dashboard-{}.html", std::process::id()));
        std::fs::write(&path, "<h1>ApexScore</h1>").expect("write dashboard");

        let response = app(state(true, Some(path.clone())))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
            "text/html"
        );
        assert_eq!(body_bytes(response).await, b"<h1>ApexScore</h1>".to_vec());

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn missing_dashboard_falls_back_to_index() {
        let response = app(state(true, Some(PathBuf::from("/nonexistent/apex/index.html"))))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let payload: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).expect("json");
        assert_eq!(payload["service"], json!("ApexScore API"));
    }

    #[tokio::test]
    async fn applicant_routes_are_mounted() {
        let response = app(state(true, None))
            .oneshot(
                Request::get("/api/applicants?limit=3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
