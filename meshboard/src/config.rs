//! Configuration loading for the dashboard.
//!
//! Loads configuration from a TOML file and/or environment variables using
//! figment.
//!
//! # Configuration Sources (in order of priority, lowest to highest)
//!
//! 1. Default values (from `#[serde(default)]` attributes)
//! 2. TOML config file (if provided)
//! 3. Environment variables (prefix: `MESHBOARD_`, nested with `__`)
//!
//! # Environment Variable Naming
//!
//! - `MESHBOARD_API__URL` → `api.url`
//! - `MESHBOARD_API__KEY` → `api.key`
//! - `MESHBOARD_SESSION__SECRET` → `session.secret`
//! - `MESHBOARD_MODE` → `mode`
//! - `MESHBOARD_HTTP__LISTEN_ADDR` → `http.listen_addr`
//! - `MESHBOARD_AUTH__BACKEND` → `auth.backend`
//!
//! Startup fails fast when a required value is missing or malformed; the
//! process never serves traffic on a partial configuration.

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Minimum length of the session cookie secret, in bytes.
///
/// The cookie key is derived from this secret; short secrets would weaken
/// every session issued by the process.
pub const MIN_SESSION_SECRET_LEN: usize = 64;

/// Deployment mode flag. Controls the `Secure` attribute on the session
/// cookie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    #[default]
    Development,
    Production,
}

impl DeploymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentMode::Development => "development",
            DeploymentMode::Production => "production",
        }
    }
}

/// Which credential backend validates dashboard logins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthBackend {
    /// Local SQLite account store with Argon2 password hashes.
    #[default]
    Database,
    /// Delegate to the coordination API: the submitted password is treated
    /// as an API key and verified with one authenticated probe request.
    ApiKey,
}

impl AuthBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthBackend::Database => "database",
            AuthBackend::ApiKey => "api_key",
        }
    }
}

/// Coordination API connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the coordination service (the `api/v1` prefix is
    /// appended by the client).
    pub url: String,

    /// Static bearer token authenticating this dashboard to the service.
    pub key: String,
}

/// Session cookie settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Secret the cookie signing/encryption key is derived from.
    pub secret: String,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Address to listen on
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

/// SQLite database configuration for the local account store.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    /// If not specified, defaults to `meshboard.db` in the data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Authentication strategy configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub backend: AuthBackend,

    /// Database settings (only used when backend is `database`).
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Main configuration for the dashboard.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Coordination API connection
    pub api: ApiConfig,

    /// Session cookie secret
    pub session: SessionConfig,

    /// HTTP server settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Login credential backend
    #[serde(default)]
    pub auth: AuthConfig,

    /// Deployment mode flag
    #[serde(default)]
    pub mode: DeploymentMode,
}

impl Config {
    /// Load configuration from TOML file and environment variables.
    ///
    /// Configuration sources are merged in order (later sources override
    /// earlier): TOML config file (if it exists), then environment
    /// variables with the `MESHBOARD_` prefix.
    pub fn load(path: &Path) -> Result<Self> {
        let mut figment = Figment::new();

        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("MESHBOARD_").split("__"));

        let config: Config = figment.extract().with_context(|| {
            format!("Failed to load config from {} and environment", path.display())
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would fail at first use.
    fn validate(&self) -> Result<()> {
        Url::parse(&self.api.url)
            .with_context(|| format!("api.url is not a valid URL: {}", self.api.url))?;

        if self.session.secret.len() < MIN_SESSION_SECRET_LEN {
            bail!(
                "session.secret must be at least {MIN_SESSION_SECRET_LEN} bytes (got {})",
                self.session.secret.len()
            );
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.mode == DeploymentMode::Production
    }

    /// Get the default config file path
    /// - macOS: ~/Library/Application Support/meshboard/config.toml
    /// - Linux: ~/.config/meshboard/config.toml
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meshboard")
            .join("config.toml")
    }

    /// Get the default data directory (for the account database and logs)
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meshboard")
    }
}

/// Create a default configuration template
pub fn default_config_template() -> String {
    let data_dir = Config::default_data_dir();
    let data_dir_str = data_dir.display();

    format!(
        r#"# Meshboard Configuration
# Data directory: {data_dir_str}

[api]
url = "https://coordinator.example.com"
key = "replace-with-a-coordination-api-key"

[session]
# At least 64 bytes; sessions are invalidated when this changes.
secret = "replace-with-a-long-random-secret-at-least-sixty-four-bytes-long!!"

[http]
listen_addr = "0.0.0.0:3000"

# Set to "production" to mark session cookies Secure.
mode = "development"

[auth]
# "database": local accounts (see `meshboard account create`)
# "api_key": log in with an email plus a coordination API key as password
backend = "database"

[auth.database]
# path = "{data_dir_str}/meshboard.db"  # Optional, defaults to data_dir/meshboard.db
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::Toml as TomlProvider;

    const SECRET: &str =
        "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    /// Helper to parse TOML config strings in tests
    fn parse_config(toml_str: &str) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(TomlProvider::string(toml_str))
            .extract()
            .context("extract")?;
        config.validate()?;
        Ok(config)
    }

    fn minimal(secret: &str) -> String {
        format!(
            r#"
[api]
url = "https://coordinator.example.com"
key = "k"

[session]
secret = "{secret}"
"#
        )
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_config(&minimal(SECRET)).unwrap();
        assert_eq!(config.api.url, "https://coordinator.example.com");
        assert_eq!(config.http.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.mode, DeploymentMode::Development);
        assert_eq!(config.auth.backend, AuthBackend::Database);
        assert!(!config.is_production());
    }

    #[test]
    fn test_missing_api_key_fails() {
        let toml = format!(
            r#"
[api]
url = "https://coordinator.example.com"

[session]
secret = "{SECRET}"
"#
        );
        assert!(parse_config(&toml).is_err());
    }

    #[test]
    fn test_short_session_secret_fails() {
        assert!(parse_config(&minimal("too-short")).is_err());
    }

    #[test]
    fn test_invalid_api_url_fails() {
        let toml = format!(
            r#"
[api]
url = "not a url"
key = "k"

[session]
secret = "{SECRET}"
"#
        );
        assert!(parse_config(&toml).is_err());
    }

    #[test]
    fn test_production_mode_and_api_key_backend() {
        let toml = format!(
            r#"
mode = "production"

[api]
url = "https://coordinator.example.com"
key = "k"

[session]
secret = "{SECRET}"

[auth]
backend = "api_key"
"#
        );
        let config = parse_config(&toml).unwrap();
        assert!(config.is_production());
        assert_eq!(config.auth.backend, AuthBackend::ApiKey);
    }
}
