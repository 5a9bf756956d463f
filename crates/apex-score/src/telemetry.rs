use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter { value: String, source: ParseError },
    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = build_filter(rust_log.as_deref(), config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(config.log_targets)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

/// An unparsable `RUST_LOG` falls back to the configured level.
fn build_filter(
    rust_log: Option<&str>,
    config: &TelemetryConfig,
) -> Result<EnvFilter, TelemetryError> {
    if let Some(filter) = rust_log.and_then(|value| EnvFilter::try_new(value).ok()) {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::EnvFilter {
        value: config.log_level.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(log_level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: log_level.to_string(),
            log_targets: false,
        }
    }

    #[test]
    fn invalid_filter_is_reported_with_its_value() {
        match build_filter(None, &config("apex_score=loud")) {
            Err(TelemetryError::EnvFilter { value, .. }) => assert_eq!(value, "apex_score=loud"),
            other => panic!("expected filter error, got {other:?}"),
        }
    }

    #[test]
    fn rust_log_overrides_configured_level() {
        let filter = build_filter(Some("apex_score=trace"), &config("apex_score=loud"))
            .expect("RUST_LOG filter parses");
        assert!(filter.to_string().contains("apex_score=trace"));
    }

    #[test]
    fn unparsable_rust_log_falls_back_to_config() {
        let filter = build_filter(Some("apex_score=loud"), &config("warn"))
            .expect("configured level parses");
        assert!(filter.to_string().contains("warn"));
    }
}
