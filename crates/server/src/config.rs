//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string (not needed when `ORDER_STORE=memory`)
//! - `GEOCODING_API_KEY` - Geocoding provider API key
//!
//! ## Optional
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8080)
//! - `ORDER_STORE` - `postgres` or `memory` (default: postgres)
//! - `RUN_MIGRATIONS` - Apply database migrations on startup (default: false)
//! - `GEOCODING_BASE_URL` - Geocoding endpoint (default: Google Geocoding API)
//! - `GEOCODE_CONCURRENCY` - Max in-flight geocoding calls per request (default: 4)
//! - `STATIC_DIR` - Directory served under `/static` (default: static)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Google Geocoding API JSON endpoint.
pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

const DEFAULT_GEOCODE_CONCURRENCY: &str = "4";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Known placeholder values, compared against the whole key (case-insensitive)
const PLACEHOLDER_VALUES: &[&str] = &[
    "your-api-key",
    "your-api-key-here",
    "your_api_key",
    "your_api_key_here",
    "api-key",
    "api_key",
    "apikey",
    "changeme",
    "change-me",
    "replace-me",
    "placeholder",
    "example",
    "todo",
    "fixme",
    "xxx",
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

/// Which order store backend to run against.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// `PostgreSQL` document table.
    Postgres {
        /// Connection URL (contains password)
        database_url: SecretString,
        /// Apply pending migrations before serving
        run_migrations: bool,
    },
    /// Process-local store, lost on restart.
    Memory,
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Order store backend
    pub store: StoreConfig,
    /// Geocoding provider configuration
    pub geocoding: GeocodingConfig,
    /// Directory holding static assets
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Geocoding provider configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeocodingConfig {
    /// Provider API key
    pub api_key: SecretString,
    /// Provider JSON endpoint
    pub base_url: Url,
    /// Max concurrent geocoding calls within one request
    pub concurrency: NonZeroUsize,
}

impl std::fmt::Debug for GeocodingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

/// Source of configuration values, keyed by variable name.
trait Vars {
    fn get(&self, key: &str) -> Option<String>;
}

struct ProcessEnv;

impl Vars for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[cfg(test)]
impl Vars for HashMap<&str, &str> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).map(|v| (*v).to_string())
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::load(&ProcessEnv)
    }

    fn load(vars: &impl Vars) -> Result<Self, ConfigError> {
        let host = parse_var(vars, "HOST", "0.0.0.0")?;
        let port = parse_var(vars, "PORT", "8080")?;
        let store = StoreConfig::load(vars)?;
        let geocoding = GeocodingConfig::load(vars)?;
        let static_dir = PathBuf::from(get_or_default(vars, "STATIC_DIR", "static"));
        let sentry_dsn = vars.get("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            store,
            geocoding,
            static_dir,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StoreConfig {
    fn load(vars: &impl Vars) -> Result<Self, ConfigError> {
        match get_or_default(vars, "ORDER_STORE", "postgres").as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" => Ok(Self::Postgres {
                database_url: SecretString::from(get_required(vars, "DATABASE_URL")?),
                run_migrations: parse_var(vars, "RUN_MIGRATIONS", "false")?,
            }),
            other => Err(ConfigError::InvalidEnvVar(
                "ORDER_STORE".to_string(),
                format!("expected 'postgres' or 'memory', got '{other}'"),
            )),
        }
    }
}

impl GeocodingConfig {
    /// Load only the geocoding settings from environment variables.
    ///
    /// Used by tools that talk to the provider without running the server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API key is missing or fails validation,
    /// or if the endpoint or concurrency values do not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(&ProcessEnv)
    }

    fn load(vars: &impl Vars) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: get_validated_secret(vars, "GEOCODING_API_KEY")?,
            base_url: parse_var(vars, "GEOCODING_BASE_URL", DEFAULT_GEOCODING_BASE_URL)?,
            concurrency: parse_var(vars, "GEOCODE_CONCURRENCY", DEFAULT_GEOCODE_CONCURRENCY)?,
        })
    }
}

/// Read `DATABASE_URL` from the environment.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if it is unset.
pub fn database_url_from_env() -> Result<SecretString, ConfigError> {
    let _ = dotenvy::dotenv();
    get_required(&ProcessEnv, "DATABASE_URL").map(SecretString::from)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required variable.
fn get_required(vars: &impl Vars, key: &str) -> Result<String, ConfigError> {
    vars.get(key)
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a variable with a default value.
fn get_or_default(vars: &impl Vars, key: &str, default: &str) -> String {
    vars.get(key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable (or its default) into `T`.
fn parse_var<T>(vars: &impl Vars, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_or_default(vars, key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let trimmed = secret.trim();

    if PLACEHOLDER_VALUES
        .iter()
        .any(|placeholder| trimmed.eq_ignore_ascii_case(placeholder))
    {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "appears to be a placeholder value".to_string(),
        ));
    }

    // Real API keys are long random strings
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the provider."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret.
fn get_validated_secret(vars: &impl Vars, key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required(vars, key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
