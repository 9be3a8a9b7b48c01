use std::env;
use std::fmt;

pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";

/// Distinguishes runtime behavior for different stages of the client.
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

/// Top-level configuration for the console client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub service: ServiceConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = env::var("PREDICTION_SERVICE_URL")
            .unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string());
        let service = ServiceConfig::new(base_url)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            environment,
            service,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Location of the external Prediction Service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base_url: String,
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into().trim().to_string();
        let scheme_ok = base_url.starts_with("http://") || base_url.starts_with("https://");
        let has_host = base_url
            .split_once("://")
            .map_or(false, |(_, rest)| !rest.trim_matches('/').is_empty());

        if !scheme_ok || !has_host {
            return Err(ConfigError::InvalidServiceUrl { value: base_url });
        }
        Ok(Self { base_url })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidServiceUrl { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidServiceUrl { value } => write!(
                f,
                "PREDICTION_SERVICE_URL must be an http(s) URL with a host, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
