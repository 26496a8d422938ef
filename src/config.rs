//! Application configuration loaded from environment variables.

use serde::Deserialize;
use strum::{Display, EnumString};

/// Secret key used when `SECRET_KEY` is not set.
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-key-change-in-production";

/// Secret key the production profile uses when `SECRET_KEY` is not set.
pub const DEMO_SECRET_KEY: &str = "demo-secret-key-change-in-production";

/// Secret key forced by the testing profile.
pub const TEST_SECRET_KEY: &str = "test-secret-key";

/// Fallback commit id when `GITHUB_SHA` is unset.
pub const FALLBACK_COMMIT_SHA: &str = "local-dev";

/// Fallback build number when `GITHUB_RUN_NUMBER` is unset.
pub const FALLBACK_BUILD_NUMBER: &str = "0";

/// Fallback branch when `GITHUB_REF_NAME` is unset.
pub const FALLBACK_BRANCH: &str = "main";

/// Deployment profile selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Default)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    /// Local development: debug on, verbose logging.
    #[default]
    Development,
    /// Production: debug off, demo secret key when none is set.
    Production,
    /// Test runs: debug on, fixed secret key.
    Testing,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Profile ===
    /// Deployment profile.
    #[serde(default, deserialize_with = "deserialize_environment")]
    pub app_env: Environment,

    // === Service ===
    /// Version reported by `GET /`.
    #[serde(default = "default_app_version")]
    pub app_version: String,

    /// Secret key for the service.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Debug mode. Unset means the profile decides.
    #[serde(default)]
    pub debug: Option<bool>,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error). Unset means the profile
    /// decides.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Port for the Prometheus exporter. Disabled when unset.
    #[serde(default)]
    pub metrics_port: Option<u16>,

    // === Build Metadata ===
    /// Commit the running build was made from.
    #[serde(default)]
    pub github_sha: Option<String>,

    /// CI run number of the running build.
    #[serde(default)]
    pub github_run_number: Option<String>,

    /// Branch the running build was made from.
    #[serde(default)]
    pub github_ref_name: Option<String>,
}

/// Build metadata reported by `GET /api/pipeline-info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Commit id.
    pub commit_sha: String,
    /// CI build number.
    pub build_number: String,
    /// Source branch.
    pub branch: String,
}

fn deserialize_environment<'de, D>(deserializer: D) -> Result<Environment, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

fn default_app_version() -> String {
    "1.0.0".to_string()
}

fn default_secret_key() -> String {
    DEFAULT_SECRET_KEY.to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_env: Environment::default(),
            app_version: default_app_version(),
            secret_key: default_secret_key(),
            debug: None,
            port: default_port(),
            log_level: None,
            metrics_port: None,
            github_sha: None,
            github_run_number: None,
            github_ref_name: None,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    ///
    /// The profile selected by `APP_ENV` is applied before returning.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        let config: Config = envy::from_env()?;
        Ok(config.apply_profile())
    }

    /// Fill the settings left unset with the selected profile's values.
    ///
    /// Explicit `DEBUG` and `LOG_LEVEL` values always win. The testing
    /// profile is the exception for the secret key, which it always pins.
    pub fn apply_profile(mut self) -> Self {
        match self.app_env {
            Environment::Development => {
                self.debug.get_or_insert(true);
                self.log_level.get_or_insert_with(|| "debug".to_string());
            }
            Environment::Production => {
                self.debug.get_or_insert(false);
                if self.secret_key == DEFAULT_SECRET_KEY {
                    self.secret_key = DEMO_SECRET_KEY.to_string();
                }
            }
            Environment::Testing => {
                self.debug.get_or_insert(true);
                self.secret_key = TEST_SECRET_KEY.to_string();
            }
        }
        self
    }

    /// Effective debug flag.
    pub fn debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    /// Effective log level, lowercased.
    pub fn log_level(&self) -> String {
        self.log_level
            .as_deref()
            .unwrap_or("info")
            .to_lowercase()
    }

    /// Whether the secret key is one of the built-in placeholders.
    pub fn uses_placeholder_secret(&self) -> bool {
        [DEFAULT_SECRET_KEY, DEMO_SECRET_KEY, TEST_SECRET_KEY].contains(&self.secret_key.as_str())
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.secret_key.is_empty() {
            return Err("SECRET_KEY must not be empty".to_string());
        }

        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        Ok(())
    }

    /// Build metadata with literal fallbacks for unset values.
    pub fn build_info(&self) -> BuildInfo {
        BuildInfo {
            commit_sha: self
                .github_sha
                .clone()
                .unwrap_or_else(|| FALLBACK_COMMIT_SHA.to_string()),
            build_number: self
                .github_run_number
                .clone()
                .unwrap_or_else(|| FALLBACK_BUILD_NUMBER.to_string()),
            branch: self
                .github_ref_name
                .clone()
                .unwrap_or_else(|| FALLBACK_BRANCH.to_string()),
        }
    }

    /// Secret key with at most half of it, and never more than four
    /// characters, left visible.
    pub fn masked_secret_key(&self) -> String {
        let len = self.secret_key.chars().count();
        let visible: String = self.secret_key.chars().take((len / 2).min(4)).collect();
        format!("{}****", visible)
    }
}
