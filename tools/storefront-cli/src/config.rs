//! CLI configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_client::config::{ENV_API_TIMEOUT_MS, ENV_API_URL};
use storefront_client::ApiConfig;
use storefront_commerce::{Currency, Money};

/// Overrides `store.tenant_slug`.
pub const ENV_TENANT_SLUG: &str = "STOREFRONT_TENANT";

/// Config file names searched for, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend connection.
    #[serde(default)]
    pub api: ApiSection,

    /// Store settings.
    #[serde(default)]
    pub store: StoreSection,

    /// Credential storage.
    #[serde(default)]
    pub auth: AuthSection,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Apply environment overrides from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_blank(ENV_API_URL) {
            self.api.base_url = Some(url);
        }
        if let Some(ms) = non_blank(ENV_API_TIMEOUT_MS).and_then(|v| v.trim().parse().ok()) {
            self.api.timeout_ms = Some(ms);
        }
        if let Some(slug) = non_blank(ENV_TENANT_SLUG) {
            self.store.tenant_slug = Some(slug);
        }
    }

    /// Client configuration derived from the `[api]` section.
    pub fn api_config(&self) -> ApiConfig {
        let mut config = match &self.api.base_url {
            Some(url) => ApiConfig::new(url.clone()),
            None => ApiConfig::default(),
        };
        if let Some(ms) = self.api.timeout_ms.filter(|ms| *ms > 0) {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        config
    }

    pub fn currency(&self) -> Currency {
        Currency::from_code(&self.store.currency).unwrap_or_default()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Backend connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    /// Backend base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    /// Tenant the storefront belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_slug: Option<String>,

    /// Display currency code.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Estimated tax rate, percent of subtotal.
    #[serde(default = "default_tax_rate")]
    pub tax_rate_percent: f64,

    /// Flat fee for delivered orders.
    #[serde(default = "default_delivery_fee")]
    pub delivery_fee: Money,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_tax_rate() -> f64 {
    storefront_api::checkout::DEFAULT_TAX_RATE_PERCENT
}

fn default_delivery_fee() -> Money {
    storefront_api::checkout::DEFAULT_DELIVERY_FEE
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            tenant_slug: None,
            currency: default_currency(),
            tax_rate_percent: default_tax_rate(),
            delivery_fee: default_delivery_fee(),
        }
    }
}

/// Credential storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSection {
    /// Session file; defaults to `.storefront/session.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_file: Option<String>,
}

/// Generate a default storefront.toml config file.
pub fn generate_default_config(tenant: &str) -> String {
    format!(
        r#"# Storefront CLI configuration

[api]
base_url = "http://localhost:3000"
timeout_ms = 30000

[store]
tenant_slug = "{tenant}"
currency = "USD"
tax_rate_percent = 10.0
delivery_fee = 5.0

[auth]
# token_file = ".storefront/session.json"
"#,
        tenant = tenant
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_generated_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config("acme")).unwrap();

        assert_eq!(config.store.tenant_slug.as_deref(), Some("acme"));
        assert_eq!(config.store.delivery_fee, Money::from_cents(500));
        assert_eq!(config.api_config().timeout, Duration::from_millis(30_000));
        assert_eq!(config.currency(), Currency::USD);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();

        assert_eq!(config.store.tax_rate_percent, 10.0);
        assert_eq!(config.api_config().base_url, "http://localhost:3000");
        assert!(config.auth.token_file.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: CliConfig =
            toml::from_str("[api]\nbase_url = \"https://file.test\"\n").unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "https://env.test"),
            (ENV_API_TIMEOUT_MS, "1500"),
            (ENV_TENANT_SLUG, "  "),
        ]
        .into_iter()
        .collect();

        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        let api = config.api_config();
        assert_eq!(api.base_url, "https://env.test");
        assert_eq!(api.timeout, Duration::from_millis(1500));
        assert!(config.store.tenant_slug.is_none());
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.json");
        std::fs::write(&path, r#"{"store": {"tenant_slug": "acme", "currency": "eur"}}"#).unwrap();

        let config = CliConfig::load(&path).unwrap();

        assert_eq!(config.currency(), Currency::EUR);
        assert_eq!(config.store.tax_rate_percent, 10.0);
    }
}
