use std::path::PathBuf;

use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError, MAX_COOKIE_TTL_DAYS};
use crate::shared::guard::RouteTable;

/// Env var holding the API base URL
pub const API_URL_ENV: &str = "CLIENT_API_URL";

/// Env var holding the durable credential directory
pub const STORAGE_DIR_ENV: &str = "CLIENT_STORAGE_DIR";

/// Env var pointing at an optional TOML configuration file
pub const CONFIG_FILE_ENV: &str = "FILEDESK_CONFIG";

const CREDENTIALS_FILE: &str = "credentials.json";

/// Client configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
        }
    }
}

impl Config {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the environment
    ///
    /// Starts from `FILEDESK_CONFIG` when set, otherwise from the defaults, then
    /// applies `CLIENT_API_URL` and `CLIENT_STORAGE_DIR` on top.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut app = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.is_empty() => AppConfig::from_file(path)?,
            _ => AppConfig::default(),
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                app.api_base_url = url;
            }
        }
        if let Ok(dir) = std::env::var(STORAGE_DIR_ENV) {
            if !dir.is_empty() {
                app.storage_dir = Some(PathBuf::from(dir));
            }
        }

        app.validate()?;
        Ok(Self { app })
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
        })
    }

    pub fn from_app(app: AppConfig) -> Result<Self, ConfigError> {
        app.validate()?;
        Ok(Self { app })
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        self.app.api_url(path)
    }

    pub fn api_base_url(&self) -> &str {
        &self.app.api_base_url
    }

    pub fn routes(&self) -> &RouteTable {
        &self.app.routes
    }

    pub fn login_path(&self) -> &str {
        &self.app.routes.login_path
    }

    pub fn cookie_ttl(&self) -> time::Duration {
        time::Duration::days(self.app.cookie_ttl_days.clamp(1, MAX_COOKIE_TTL_DAYS))
    }

    /// Directory holding durable credentials
    pub fn storage_dir(&self) -> PathBuf {
        self.app.storage_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("filedesk")
        })
    }

    /// File holding durable credentials
    pub fn storage_path(&self) -> PathBuf {
        self.storage_dir().join(CREDENTIALS_FILE)
    }
}
