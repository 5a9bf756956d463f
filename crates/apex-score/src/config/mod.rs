use crate::profiles::{FillPolicy, ScoringVariant, ServiceOptions};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Email domains accepted when no allow-list is configured.
pub const DEFAULT_ALLOWED_DOMAINS: [&str; 4] = ["email.com", "gmail.com", "yahoo.com", "outlook.com"];

/// Demo applicants generated at startup when no seed list is configured.
pub const DEFAULT_SEED_IDENTIFIERS: [&str; 3] = [
    "chidi.okonkwo@email.com",
    "amina.hassan@email.com",
    "kwame.b@email.com",
];

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub profiles: ProfileSettings,
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        let dashboard_path = env::var("APEX_DASHBOARD_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_targets = env_flag("APP_LOG_TARGETS")?.unwrap_or(false);

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                dashboard_path,
            },
            telemetry: TelemetryConfig {
                log_level,
                log_targets,
            },
            profiles: ProfileSettings::from_env()?,
            store: StoreConfig {
                capacity: env_number("APEX_CACHE_CAPACITY")?,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Static dashboard served at `/` when present.
    pub dashboard_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// Include the event target (module path) in log lines.
    pub log_targets: bool,
}

/// Generation, scoring and listing behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSettings {
    pub allowed_domains: Vec<String>,
    pub variant: ScoringVariant,
    pub options: ServiceOptions,
    pub seed_identifiers: Vec<String>,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            allowed_domains: DEFAULT_ALLOWED_DOMAINS.iter().map(|d| d.to_string()).collect(),
            variant: ScoringVariant::default(),
            options: ServiceOptions::default(),
            seed_identifiers: DEFAULT_SEED_IDENTIFIERS
                .iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

impl ProfileSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let allowed_domains =
            env_list("APEX_ALLOWED_DOMAINS").unwrap_or(defaults.allowed_domains);
        let variant = match env::var("APEX_SCORING_VARIANT") {
            Ok(value) => value
                .parse::<ScoringVariant>()
                .map_err(|_| ConfigError::InvalidVariant { value })?,
            Err(_) => defaults.variant,
        };

        let options = ServiceOptions {
            fill: FillPolicy {
                enabled: env_flag("APEX_FILL_ENABLED")?.unwrap_or(defaults.options.fill.enabled),
                max_synthetic: env_number("APEX_FILL_MAX")?
                    .unwrap_or(defaults.options.fill.max_synthetic),
            },
            max_list_limit: env_number("APEX_LIST_LIMIT_MAX")?
                .unwrap_or(defaults.options.max_list_limit),
            numeric_creation: env_flag("APEX_NUMERIC_CREATION")?
                .unwrap_or(defaults.options.numeric_creation),
        };

        let seed_identifiers =
            env_list("APEX_SEED_IDENTIFIERS").unwrap_or(defaults.seed_identifiers);

        Ok(Self {
            allowed_domains,
            variant,
            options,
            seed_identifiers,
        })
    }
}

/// Profile store sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreConfig {
    /// Maximum cached profiles; unbounded when `None`.
    pub capacity: Option<usize>,
}

/// Comma separated list; an empty or absent variable yields `None`. A value of
/// `-` yields an explicit empty list.
fn env_list(var: &str) -> Option<Vec<String>> {
    let raw = env::var(var).ok()?;
    if raw.trim() == "-" {
        return Some(Vec::new());
    }
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

fn env_flag(var: &'static str) -> Result<Option<bool>, ConfigError> {
    let Ok(raw) = env::var(var) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidBoolean { var, value: raw }),
    }
}

fn env_number<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    let Ok(raw) = env::var(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { var, value: raw })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { var: &'static str, value: String },
    InvalidBoolean { var: &'static str, value: String },
    InvalidVariant { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { var, value } => {
                write!(f, "{var} must be a non-negative integer (got '{value}')")
            }
            ConfigError::InvalidBoolean { var, value } => {
                write!(f, "{var} must be true or false (got '{value}')")
            }
            ConfigError::InvalidVariant { value } => write!(
                f,
                "APEX_SCORING_VARIANT must be 'behavioral' or 'blended' (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidBoolean { .. }
            | ConfigError::InvalidVariant { .. } => None,
        }
    }
}
