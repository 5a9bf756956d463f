use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryProfileStore};
use crate::routes::with_ops_routes;
use apex_score::config::AppConfig;
use apex_score::error::AppError;
use apex_score::profiles::build_service;
use apex_score::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        dashboard: config.server.dashboard_path.clone(),
    };

    let store = Arc::new(InMemoryProfileStore::with_capacity(config.store.capacity));
    let service = Arc::new(build_service(store, &config.profiles)?);
    info!(
        variant = %service.generator().scorer().variant(),
        domains = ?service.generator().policy().allowed_domains(),
        "applicant service configured"
    );

    for identifier in &config.profiles.seed_identifiers {
        match service.get_or_create(identifier) {
            Ok(stored) => info!(
                number = stored.number,
                name = %stored.profile.name,
                apex_score = stored.profile.apex_score,
                risk_level = stored.profile.risk_level.label(),
                "seeded demo applicant"
            ),
            Err(err) => warn!(%identifier, error = %err, "skipping demo applicant"),
        }
    }

    let app = with_ops_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "apex score api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
