use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use url::Url;

use crate::admission::ValidationConfig;

const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 10;
const DEFAULT_COUNTRY_ID: u64 = 1;

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
    pub catalog: CatalogConfig,
    pub validation: ValidationConfig,
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

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogConfig::from_env()?,
            validation: validation_from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Remote catalog API settings. Without a base URL only built-in lists are served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub base_url: Option<Url>,
    pub timeout_secs: u64,
    /// Country whose states are listed by `/states/country/{id}`.
    pub country_id: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_CATALOG_TIMEOUT_SECS,
            country_id: DEFAULT_COUNTRY_ID,
        }
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = match env::var("CATALOG_API_BASE_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidCatalogUrl { source })?,
            ),
            _ => None,
        };

        let timeout_secs = match env::var("CATALOG_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidCatalogTimeout)?,
            Err(_) => DEFAULT_CATALOG_TIMEOUT_SECS,
        };

        let country_id = match env::var("CATALOG_COUNTRY_ID") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidCountryId)?,
            Err(_) => DEFAULT_COUNTRY_ID,
        };

        Ok(Self {
            base_url,
            timeout_secs,
            country_id,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn validation_from_env() -> Result<ValidationConfig, ConfigError> {
    let mut validation = ValidationConfig::default();
    if let Ok(raw) = env::var("ADMISSION_MIN_AGE") {
        validation.minimum_age = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidMinimumAge)?;
    }
    Ok(validation)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCatalogUrl { source: url::ParseError },
    InvalidCatalogTimeout,
    InvalidCountryId,
    InvalidMinimumAge,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCatalogUrl { .. } => {
                write!(f, "CATALOG_API_BASE_URL must be an absolute URL")
            }
            ConfigError::InvalidCatalogTimeout => {
                write!(f, "CATALOG_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::InvalidCountryId => write!(f, "CATALOG_COUNTRY_ID must be a valid u64"),
            ConfigError::InvalidMinimumAge => write!(f, "ADMISSION_MIN_AGE must be a valid u32"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidCatalogUrl { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidCatalogTimeout
            | ConfigError::InvalidCountryId
            | ConfigError::InvalidMinimumAge => None,
        }
    }
}
