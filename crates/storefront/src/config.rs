//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the storefront boots with defaults.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: http://localhost:3000)
//! - `STOREFRONT_CATALOG_PATH` - JSON product list replacing the bundled catalog
//! - `CHAT_WEBHOOK_URL` - Support chat webhook; chat answers with a fallback when unset
//! - `CHAT_TIMEOUT_SECS` - Webhook request timeout (default: 30)
//! - `CHECKOUT_DELAY_MS` - Simulated order processing time (default: 1500)
//! - `UNDER_CONSTRUCTION_PATHS` - Comma-separated path prefixes redirected to
//!   the placeholder page (default: /account,/stores,/gift-cards)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_UNDER_CONSTRUCTION: &str = "/account,/stores,/gift-cards";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Optional catalog file overriding the bundled one
    pub catalog_path: Option<PathBuf>,
    /// Support chat webhook configuration
    pub chat: ChatConfig,
    /// Delay before a simulated checkout succeeds
    pub checkout_delay: Duration,
    /// Path prefixes redirected to the under-construction page
    pub under_construction: Vec<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Support chat webhook configuration.
///
/// Implements `Debug` manually because webhook URLs often embed a token.
#[derive(Clone)]
pub struct ChatConfig {
    /// Webhook endpoint, `None` disables the outbound call
    pub webhook_url: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field(
                "webhook_url",
                &self.webhook_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            catalog_path: None,
            chat: ChatConfig::default(),
            checkout_delay: Duration::from_millis(1500),
            under_construction: parse_path_list(DEFAULT_UNDER_CONSTRUCTION),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let catalog_path = get_optional_env("STOREFRONT_CATALOG_PATH").map(PathBuf::from);
        let chat = ChatConfig::from_env()?;
        let checkout_delay = Duration::from_millis(parse_env("CHECKOUT_DELAY_MS", "1500")?);
        let under_construction = parse_path_list(&get_env_or_default(
            "UNDER_CONSTRUCTION_PATHS",
            DEFAULT_UNDER_CONSTRUCTION,
        ));

        Ok(Self {
            host,
            port,
            base_url,
            catalog_path,
            chat,
            checkout_delay,
            under_construction,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ChatConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let webhook_url = match get_optional_env("CHAT_WEBHOOK_URL") {
            Some(raw) => {
                validate_webhook_url(&raw, "CHAT_WEBHOOK_URL")?;
                Some(SecretString::from(raw))
            }
            None => None,
        };
        let timeout = Duration::from_secs(parse_env("CHAT_TIMEOUT_SECS", "30")?);

        Ok(Self {
            webhook_url,
            timeout,
        })
    }

    /// The webhook URL, if configured.
    #[must_use]
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_ref().map(|url| url.expose_secret())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Webhooks must be absolute http(s) URLs.
fn validate_webhook_url(raw: &str, var_name: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(())
}

/// Split a comma-separated list of path prefixes, normalising each to start
/// with `/` and have no trailing slash.
fn parse_path_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            let trimmed = p.trim_end_matches('/');
            if trimmed.starts_with('/') {
                trimmed.to_string()
            } else {
                format!("/{trimmed}")
            }
        })
        .filter(|p| p != "/")
        .collect()
}
