//! Configuration commands for managing storefront settings.
//!
//! - `config show`: Display current configuration
//! - `config get`: Read one value
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{Config, ENV_API_URL, ENV_TOKEN, mask_sensitive_value};
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;

    let api_base_url = config.api_base_url();
    let token_configured = config.api_token().is_some();
    let url_from_env = std::env::var(ENV_API_URL).is_ok_and(|v| !v.is_empty());
    let token_from_env = std::env::var(ENV_TOKEN).is_ok_and(|v| !v.is_empty());

    let json_output = json!({
        "api_base_url": api_base_url,
        "per_page": config.per_page,
        "locale": config.locale.to_string(),
        "auth": {
            "token": config.auth.token.as_deref().map(mask_sensitive_value),
            "token_configured": token_configured,
        },
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    match &api_base_url {
        Some(url) => {
            let source = if url_from_env {
                format!(" (from {ENV_API_URL})").dimmed().to_string()
            } else {
                String::new()
            };
            text_output.push_str(&format!("{}: {url}{source}\n", "api_base_url".cyan()));
        }
        None => text_output.push_str(&format!(
            "{}: {}\n",
            "api_base_url".cyan(),
            "not configured".dimmed()
        )),
    }
    text_output.push_str(&format!("{}: {}\n", "per_page".cyan(), config.per_page));
    text_output.push_str(&format!("{}: {}\n", "locale".cyan(), config.locale));

    text_output.push('\n');
    text_output.push_str(&format!("{}:\n", "auth".cyan()));
    let token_status = match (&config.auth.token, token_from_env) {
        (_, true) => format!("configured (from {ENV_TOKEN})").green().to_string(),
        (Some(token), false) => mask_sensitive_value(token),
        (None, false) => "not configured".dimmed().to_string(),
    };
    text_output.push_str(&format!("  token: {token_status}\n"));

    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Get a single configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let value = config.get_value(key)?;

    let text = match &value {
        Some(v) => v.clone(),
        None => "not set".dimmed().to_string(),
    };

    CommandOutput::new(json!({
        "key": key,
        "value": value,
    }))
    .with_text(text)
    .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set_value(key, value)?;
    config.save()?;

    let shown = config.get_value(key)?.unwrap_or_default();
    tracing::debug!(key, "config value updated");

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), shown))
    .print(output)
}
