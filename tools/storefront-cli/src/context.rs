//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use storefront_api::AppState;
use storefront_client::{ApiClient, FileTokenStore};
use storefront_commerce::cart::Cart;
use storefront_commerce::Currency;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Directory holding the cart and session, relative to the working directory.
const STATE_DIR: &str = ".storefront";

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration, environment overrides applied.
    pub config: CliConfig,
    /// File the config came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                (CliConfig::load(&path)?, Some(path))
            }
            None => match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory for local state, created on demand.
    pub fn state_dir(&self) -> Result<PathBuf> {
        let dir = self.cwd.join(STATE_DIR);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        Ok(dir)
    }

    pub fn cart_path(&self) -> PathBuf {
        self.cwd.join(STATE_DIR).join("cart.json")
    }

    pub fn session_path(&self) -> PathBuf {
        match &self.config.auth.token_file {
            Some(path) => resolve(&self.cwd, path),
            None => self.cwd.join(STATE_DIR).join("session.json"),
        }
    }

    pub fn currency(&self) -> Currency {
        self.config.currency()
    }

    /// Tenant slug, required by the auth endpoints.
    pub fn tenant_slug(&self) -> Result<String> {
        match &self.config.store.tenant_slug {
            Some(slug) => Ok(slug.clone()),
            None => bail!(
                "No tenant configured. Set store.tenant_slug in storefront.toml or {}.",
                crate::config::ENV_TENANT_SLUG
            ),
        }
    }

    /// API client over `reqwest` with the file-backed session store.
    pub fn client(&self) -> Result<ApiClient> {
        let tokens = Arc::new(FileTokenStore::new(self.session_path()));
        Ok(ApiClient::with_token_store(self.config.api_config(), tokens)?)
    }

    /// Client, saved cart, and restored session.
    pub async fn app_state(&self) -> Result<AppState> {
        let state = AppState::with_cart(self.client()?, self.load_cart()?);
        state.initialize().await;
        Ok(state)
    }

    /// The saved cart, or an empty one.
    pub fn load_cart(&self) -> Result<Cart> {
        let path = self.cart_path();
        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Cart file is corrupt: {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Cart::new()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    pub fn save_cart(&self, cart: &Cart) -> Result<()> {
        self.state_dir()?;
        let path = self.cart_path();
        let content = serde_json::to_string_pretty(cart)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}

/// Resolve a path relative to the working directory.
fn resolve(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
