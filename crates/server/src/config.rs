//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `WARDROBE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `GOOGLE_VISION_API_KEY` - Cloud Vision API key
//!
//! ## Optional
//! - `WARDROBE_HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 5000)
//! - `APP_ENV` - Environment name, used for startup logging (default: development)
//! - `VISION_ENDPOINT` - Vision API base URL (default: <https://vision.googleapis.com>)
//! - `VISION_MAX_RESULTS` - Maximum labels requested per image (default: 10)
//! - `VISION_TIMEOUT_SECS` - Vision request timeout (default: 30)
//! - `PLACEHOLDER_IMAGE_BASE` - Base URL for synthesized image URLs
//!   (default: <https://placehold.co/300x400>)
//! - `MAX_UPLOAD_BYTES` - Upload request body limit (default: 10 MiB)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag (defaults to `APP_ENV`)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com";
const DEFAULT_PLACEHOLDER_IMAGE_BASE: &str = "https://placehold.co/300x400";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Wardrobe server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Environment name (development, production, ...)
    pub environment: String,
    /// Cloud Vision configuration
    pub vision: VisionConfig,
    /// Base URL for placeholder image URLs
    pub placeholder_image_base: Url,
    /// Maximum accepted upload body size in bytes
    pub max_upload_bytes: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Cloud Vision API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct VisionConfig {
    /// API base URL
    pub endpoint: Url,
    /// API key passed as the `key` query parameter
    pub api_key: SecretString,
    /// Maximum number of labels requested per image
    pub max_results: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[REDACTED]")
            .field("max_results", &self.max_results)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("WARDROBE_DATABASE_URL")?;
        let host = parse_env("WARDROBE_HOST", "0.0.0.0")?;
        let port = parse_env("PORT", "5000")?;
        let environment = get_env_or_default("APP_ENV", "development");
        let vision = VisionConfig::from_env()?;
        let placeholder_image_base =
            parse_url("PLACEHOLDER_IMAGE_BASE", DEFAULT_PLACEHOLDER_IMAGE_BASE)?;
        let max_upload_bytes =
            parse_env("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment =
            get_optional_env("SENTRY_ENVIRONMENT").or_else(|| Some(environment.clone()));

        Ok(Self {
            database_url,
            host,
            port,
            environment,
            vision,
            placeholder_image_base,
            max_upload_bytes,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl VisionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let endpoint = parse_url("VISION_ENDPOINT", DEFAULT_VISION_ENDPOINT)?;
        let api_key = get_validated_secret("GOOGLE_VISION_API_KEY")?;
        let max_results = parse_env("VISION_MAX_RESULTS", "10")?;
        let timeout_secs: u64 = parse_env("VISION_TIMEOUT_SECS", "30")?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "VISION_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            endpoint,
            api_key,
            max_results,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an absolute http(s) URL from the environment.
fn parse_url(key: &str, default: &str) -> Result<Url, ConfigError> {
    let url: Url = parse_env(key, default)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Validate that a secret is present and not an obvious placeholder.
fn validate_secret(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.trim().is_empty() {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "must not be empty".to_string(),
        ));
    }

    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret(&value, key)?;
    Ok(SecretString::from(value))
}

/// Expose the database URL host for startup logging without credentials.
#[must_use]
pub fn database_host(database_url: &SecretString) -> Option<String> {
    Url::parse(database_url.expose_secret())
        .ok()
        .and_then(|u| u.host_str().map(ToOwned::to_owned))
}
