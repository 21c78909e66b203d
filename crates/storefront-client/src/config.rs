//! API endpoint configuration.

use std::fmt::Write as _;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Base URL used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Placeholder shipped in sample configs. Treated as "not configured".
pub const PLACEHOLDER_BASE_URL: &str = "https://your-domain.com/api";

/// Request timeout used when nothing is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Environment variable holding the base URL.
pub const ENV_API_URL: &str = "STOREFRONT_API_URL";

/// Environment variable holding the timeout in milliseconds.
pub const ENV_API_TIMEOUT_MS: &str = "STOREFRONT_API_TIMEOUT_MS";

/// Errors from [`ApiConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API base URL is not configured")]
    NotConfigured,

    #[error("Invalid API base URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),

    #[error("Timeout must be greater than zero")]
    ZeroTimeout,
}

/// Where requests go and how long they may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL prepended to relative request paths.
    pub base_url: String,
    /// Per-request timeout, covering connect, headers and body.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Create a config with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `STOREFRONT_API_URL` and `STOREFRONT_API_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// A blank URL falls back to the default. An unparsable timeout is
    /// logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_API_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.timeout = Duration::from_millis(ms),
                _ => warn!(value = %raw, "Ignoring invalid {}", ENV_API_TIMEOUT_MS),
            }
        }

        config
    }

    /// False when the base URL is blank or still the placeholder.
    pub fn is_configured(&self) -> bool {
        let url = self.base_url.trim();
        !url.is_empty() && url != PLACEHOLDER_BASE_URL
    }

    /// Check that the base URL parses as http(s) and the timeout is usable.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if !self.is_configured() {
            return Err(ConfigError::NotConfigured);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        let url = Url::parse(self.base_url.trim()).map_err(|e| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Resolve a request path against the base URL.
    ///
    /// Absolute `http://` / `https://` paths are used as-is.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.base_url.trim().trim_end_matches('/');
        if path.starts_with('/') || path.is_empty() {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Human-readable configuration summary for error messages and
    /// `config show`.
    pub fn diagnostics(&self) -> String {
        let configured = self.is_configured();
        let mut out = String::from("API Configuration:\n");
        let _ = writeln!(out, "- Base URL: {}", self.base_url);
        let _ = writeln!(
            out,
            "- Configured: {}",
            if configured { "Yes" } else { "No (using placeholder)" }
        );
        let _ = write!(out, "- Timeout: {}ms", self.timeout.as_millis());

        if !configured {
            out.push_str("\n\nWARNING: API URL not configured!\n\n");
            out.push_str("To fix:\n");
            let _ = writeln!(
                out,
                "1. Set {}=http://YOUR_HOST:PORT in the environment, or",
                ENV_API_URL
            );
            out.push_str("2. Add base_url under [api] in storefront.toml\n");
            out.push_str("3. When the API runs on another machine, use its IP address rather than localhost");
        }

        out
    }
}
