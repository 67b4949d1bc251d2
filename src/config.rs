//! Top-level application configuration.
//!
//! Configuration is stored in `.storefront/config.yaml` and includes:
//! - The marketplace API base URL
//! - Default page size for list views
//! - The preferred display locale
//! - An optional bearer token for authenticated endpoints

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorefrontError};
use crate::query::DEFAULT_PER_PAGE;
use crate::types::{Locale, storefront_root};

pub const ENV_API_URL: &str = "STOREFRONT_API_URL";
pub const ENV_TOKEN: &str = "STOREFRONT_TOKEN";

/// Keys accepted by `config get` and `config set`.
pub const CONFIG_KEYS: &[&str] = &["api_base_url", "per_page", "locale", "auth.token"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the marketplace API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// Items requested per page (default: 10)
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Preferred display locale
    #[serde(default)]
    pub locale: Locale,

    /// Authentication
    #[serde(default, skip_serializing_if = "AuthConfig::is_empty")]
    pub auth: AuthConfig,
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            per_page: default_per_page(),
            locale: Locale::default(),
            auth: AuthConfig::default(),
        }
    }
}

/// Authentication configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthConfig {
    pub fn is_empty(&self) -> bool {
        self.token.is_none()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        storefront_root().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            StorefrontError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorefrontError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            StorefrontError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // Owner read/write only, the file may hold a token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&path, permissions)?;
        }

        Ok(())
    }

    /// API base URL from environment variable or config
    pub fn api_base_url(&self) -> Option<String> {
        if let Ok(url) = env::var(ENV_API_URL)
            && !url.is_empty()
        {
            return Some(url);
        }
        self.api_base_url.clone()
    }

    /// API token from environment variable or config
    pub fn api_token(&self) -> Option<SecretString> {
        if let Ok(token) = env::var(ENV_TOKEN)
            && !token.is_empty()
        {
            return Some(SecretString::from(token));
        }
        self.auth.token.clone().map(SecretString::from)
    }

    /// Read a config key as it should be displayed. Tokens are masked.
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        match key {
            "api_base_url" => Ok(self.api_base_url.clone()),
            "per_page" => Ok(Some(self.per_page.to_string())),
            "locale" => Ok(Some(self.locale.to_string())),
            "auth.token" => Ok(self.auth.token.as_deref().map(mask_sensitive_value)),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a config key from its string form.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_base_url" => {
                url::Url::parse(value)
                    .map_err(|e| StorefrontError::InvalidUrl(value.to_string(), e.to_string()))?;
                self.api_base_url = Some(value.to_string());
            }
            "per_page" => {
                let per_page = value
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| {
                        StorefrontError::Config(format!(
                            "per_page must be a positive integer, got '{value}'"
                        ))
                    })?;
                self.per_page = per_page;
            }
            "locale" => self.locale = value.parse()?,
            "auth.token" => {
                self.auth.token = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> StorefrontError {
    StorefrontError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}

/// Mask a secret for display, keeping the first and last two characters.
pub fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}
