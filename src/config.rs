//! Configuration loading and management.
//!
//! Loads configuration from embedded config.toml (or the file named by
//! `SITEFOLLOW_CONFIG`) with environment variable overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::secure::SecureString;

/// Embedded configuration file content.
const CONFIG_TOML: &str = include_str!("../config.toml");

/// Environment variable naming an alternative configuration file.
const CONFIG_PATH_VAR: &str = "SITEFOLLOW_CONFIG";

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub oauth: OAuthConfig,
    pub api: ApiConfig,
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub token: TokenConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthConfig {
    pub tenant: String,
    pub client_id: String,
    pub client_secret: SecureString,
    pub authority: String,
    pub scope: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub graph_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub site_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    pub expiry_warning_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Load configuration from config.toml with environment variable overrides.
    pub fn load() -> Result<Self> {
        let mut config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {}", path))?;
                Self::parse(&content).with_context(|| format!("Failed to parse {}", path))?
            }
            Err(_) => Self::parse(CONFIG_TOML).context("Failed to parse embedded config.toml")?,
        };

        config.apply_overrides(|key| env::var(key).ok());

        // Validate required fields
        config.validate()?;

        Ok(config)
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(tenant) = lookup("AZURE_TENANT_ID") {
            self.oauth.tenant = tenant;
        }

        if let Some(client_id) = lookup("AZURE_CLIENT_ID") {
            self.oauth.client_id = client_id;
        }

        if let Some(secret) = lookup("AZURE_CLIENT_SECRET") {
            self.oauth.client_secret = SecureString::from(secret);
        }

        if let Some(site_id) = lookup("SHAREPOINT_SITE_ID") {
            self.site.site_id = site_id;
        }

        if let Some(base_url) = lookup("GRAPH_BASE_URL") {
            self.api.graph_base_url = base_url;
        }

        if let Some(log_level) = lookup("RUST_LOG") {
            self.logging.level = log_level;
        }
    }

    /// Validate that required configuration is present.
    fn validate(&self) -> Result<()> {
        if is_unset(&self.oauth.tenant, "YOUR_TENANT_ID") {
            anyhow::bail!(
                "Azure AD tenant not configured. Set AZURE_TENANT_ID environment variable \
                 or update config.toml"
            );
        }

        if is_unset(&self.oauth.client_id, "YOUR_APPLICATION_ID") {
            anyhow::bail!(
                "Azure AD client_id not configured. Set AZURE_CLIENT_ID environment variable \
                 or update config.toml"
            );
        }

        if is_unset(self.oauth.client_secret.as_str(), "YOUR_APPLICATION_SECRET") {
            anyhow::bail!(
                "Azure AD client_secret not configured. Set AZURE_CLIENT_SECRET environment \
                 variable or update config.toml"
            );
        }

        if is_unset(&self.site.site_id, "YOUR_SITE_ID") {
            anyhow::bail!(
                "SharePoint site not configured. Set SHAREPOINT_SITE_ID environment variable \
                 or update config.toml"
            );
        }

        Ok(())
    }

    /// Get the token URL for Azure AD.
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.oauth.authority.trim_end_matches('/'),
            self.oauth.tenant
        )
    }

    /// Get the users listing URL.
    pub fn users_url(&self) -> String {
        format!("{}/users", self.graph_base_url())
    }

    /// Get the followed-sites add URL for a user.
    pub fn follow_url(&self, user_id: &str) -> String {
        format!("{}/users/{}/followedSites/add", self.graph_base_url(), user_id)
    }

    fn graph_base_url(&self) -> &str {
        self.api.graph_base_url.trim_end_matches('/')
    }
}

fn is_unset(value: &str, placeholder: &str) -> bool {
    value.trim().is_empty() || value == placeholder
}
