//! Application configuration module
//!
//! `AppConfig` carries every tunable the client and the edge server read: the API
//! base URL, the route table the session guard works from, the cookie lifetime and
//! where durable credentials live. It can be produced by the builder or parsed from
//! TOML; both paths run the same validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::guard::RouteTable;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Default credential cookie lifetime in days
pub const DEFAULT_COOKIE_TTL_DAYS: i64 = 7;

/// Longest accepted credential cookie lifetime in days
pub const MAX_COOKIE_TTL_DAYS: i64 = 3650;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL every API path is joined onto
    pub api_base_url: String,
    /// Route classes and redirect targets for the session guard
    pub routes: RouteTable,
    /// Lifetime of the credential cookies
    pub cookie_ttl_days: i64,
    /// Directory for durable credential storage (platform data dir when unset)
    pub storage_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            routes: RouteTable::default(),
            cookie_ttl_days: DEFAULT_COOKIE_TTL_DAYS,
            storage_dir: None,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse a TOML document and validate the result
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use filedesk::shared::AppConfig;
    ///
    /// let config = AppConfig::from_toml_str(r#"
    ///     api_base_url = "https://files.example.com/api"
    ///     cookie_ttl_days = 14
    ///
    ///     [routes]
    ///     login_path = "/signin"
    /// "#).unwrap();
    /// assert_eq!(config.routes.login_path, "/signin");
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.api_base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.api_base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                self.api_base_url
            )));
        }

        if self.cookie_ttl_days <= 0 {
            return Err(ConfigError::invalid("cookie_ttl_days", "must be positive"));
        }
        if self.cookie_ttl_days > MAX_COOKIE_TTL_DAYS {
            return Err(ConfigError::invalid(
                "cookie_ttl_days",
                format!("must be at most {}", MAX_COOKIE_TTL_DAYS),
            ));
        }

        for (field, value) in [
            ("routes.login_path", &self.routes.login_path),
            ("routes.landing_path", &self.routes.landing_path),
        ] {
            if value.is_empty() {
                return Err(ConfigError::MissingValue(field));
            }
            if !value.starts_with('/') {
                return Err(ConfigError::invalid(field, "must start with '/'"));
            }
        }

        Ok(())
    }

    /// Join an API path onto the base URL
    pub fn api_url(&self, path: &str) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    api_base_url: Option<String>,
    login_path: Option<String>,
    landing_path: Option<String>,
    protected_routes: Option<Vec<String>>,
    auth_routes: Option<Vec<String>>,
    bypass_prefixes: Option<Vec<String>>,
    cookie_ttl_days: Option<i64>,
    storage_dir: Option<PathBuf>,
}

impl AppConfigBuilder {
    /// Set the API base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set the login entry point
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    /// Set the authenticated landing page
    pub fn landing_path(mut self, path: impl Into<String>) -> Self {
        self.landing_path = Some(path.into());
        self
    }

    /// Replace the protected route prefixes
    pub fn protected_routes(mut self, prefixes: Vec<String>) -> Self {
        self.protected_routes = Some(prefixes);
        self
    }

    /// Replace the auth-only route prefixes
    pub fn auth_routes(mut self, prefixes: Vec<String>) -> Self {
        self.auth_routes = Some(prefixes);
        self
    }

    /// Replace the prefixes the edge guard never inspects
    pub fn bypass_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.bypass_prefixes = Some(prefixes);
        self
    }

    /// Set the credential cookie lifetime
    pub fn cookie_ttl_days(mut self, days: i64) -> Self {
        self.cookie_ttl_days = Some(days);
        self
    }

    /// Set the durable storage directory
    pub fn storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let mut routes = defaults.routes;
        if let Some(path) = self.login_path {
            routes.login_path = path;
        }
        if let Some(path) = self.landing_path {
            routes.landing_path = path;
        }
        if let Some(prefixes) = self.protected_routes {
            routes.protected = prefixes;
        }
        if let Some(prefixes) = self.auth_routes {
            routes.auth_only = prefixes;
        }
        if let Some(prefixes) = self.bypass_prefixes {
            routes.bypass = prefixes;
        }

        let config = AppConfig {
            api_base_url: self.api_base_url.unwrap_or(defaults.api_base_url),
            routes,
            cookie_ttl_days: self.cookie_ttl_days.unwrap_or(defaults.cookie_ttl_days),
            storage_dir: self.storage_dir,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}
