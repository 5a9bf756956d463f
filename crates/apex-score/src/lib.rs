pub mod config;
pub mod error;
pub mod profiles;
pub mod telemetry;
