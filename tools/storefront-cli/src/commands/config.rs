//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use serde_json::json;
use storefront_client::ConfigError;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_FILE_NAMES};
use crate::context::Context;
use crate::output::money;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { tenant, force } => init_config(tenant, force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let api = ctx.config.api_config();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "configFile": ctx.config_path.as_ref().map(|p| p.display().to_string()),
            "config": ctx.config,
            "sessionFile": ctx.session_path().display().to_string(),
        }));
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    ctx.output.info("[api]");
    ctx.output.kv("base_url", &api.base_url);
    ctx.output.kv("timeout_ms", &api.timeout.as_millis().to_string());

    ctx.output.info("[store]");
    ctx.output.kv(
        "tenant_slug",
        ctx.config.store.tenant_slug.as_deref().unwrap_or("(not set)"),
    );
    ctx.output.kv("currency", ctx.currency().code());
    ctx.output
        .kv("tax_rate_percent", &ctx.config.store.tax_rate_percent.to_string());
    ctx.output.kv(
        "delivery_fee",
        &money(ctx.config.store.delivery_fee, ctx.currency()),
    );

    ctx.output.info("[auth]");
    ctx.output
        .kv("token_file", &ctx.session_path().display().to_string());

    if ctx.output.is_verbose() {
        println!();
        println!("{}", api.diagnostics());
    }

    Ok(())
}

fn init_config(tenant: Option<String>, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    // Default the tenant to the directory name
    let tenant = tenant.unwrap_or_else(|| {
        ctx.cwd
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("my-store")
            .to_string()
    });

    fs::write(&config_path, generate_default_config(&tenant))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check(ctx);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Collect (errors, warnings) for the loaded configuration.
fn check(ctx: &Context) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let store = &ctx.config.store;

    match ctx.config.api_config().validate() {
        Ok(_) => {}
        Err(ConfigError::NotConfigured) => {
            warnings.push("api.base_url is blank or the placeholder URL".to_string())
        }
        Err(e) => errors.push(format!("api: {}", e)),
    }

    if store.tenant_slug.as_deref().map_or(true, |s| s.trim().is_empty()) {
        warnings.push("store.tenant_slug is not set; sign-in will fail".to_string());
    }

    if storefront_commerce::Currency::from_code(&store.currency).is_none() {
        warnings.push(format!(
            "store.currency '{}' is not supported, using USD",
            store.currency
        ));
    }

    if !(0.0..=100.0).contains(&store.tax_rate_percent) {
        errors.push("store.tax_rate_percent must be 0-100".to_string());
    }

    if store.delivery_fee.is_negative() {
        errors.push("store.delivery_fee must not be negative".to_string());
    }

    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use crate::output::Output;
    use storefront_commerce::Money;

    fn context(config: CliConfig) -> Context {
        Context {
            config,
            config_path: None,
            output: Output::new(false, true),
            cwd: std::env::temp_dir(),
        }
    }

    #[test]
    fn test_generated_config_is_valid() {
        let config: CliConfig = toml::from_str(&generate_default_config("acme")).unwrap();
        let (errors, warnings) = check(&context(config));
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_bad_values_are_errors() {
        let mut config = CliConfig::default();
        config.api.base_url = Some("ftp://shop.test".into());
        config.store.tax_rate_percent = 150.0;
        config.store.delivery_fee = Money::from_cents(-1);

        let (errors, warnings) = check(&context(config));

        assert_eq!(errors.len(), 3);
        assert!(warnings.iter().any(|w| w.contains("tenant_slug")));
    }

    #[test]
    fn test_placeholder_url_warns() {
        let mut config = CliConfig::default();
        config.api.base_url = Some(storefront_client::PLACEHOLDER_BASE_URL.into());
        config.store.tenant_slug = Some("acme".into());

        let (errors, warnings) = check(&context(config));

        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 1);
    }
}
