//! Configuration management for userscout.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User agent sent with every probe request.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "userscout/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/userscout/userscout)"
);

/// Default shared deadline for one username check, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main application configuration.
///
/// This is loaded from `~/.config/userscout/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Probe engine settings
    pub probe: ProbeConfig,
    /// Service catalog settings
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if absent.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `USERSCOUT_TIMEOUT_SECS`: Override the probe deadline
    /// - `USERSCOUT_INCLUDE_NSFW`: Override NSFW inclusion (true/false)
    /// - `USERSCOUT_CATALOG_DIR`: Load definitions from this directory
    /// - `USERSCOUT_USER_AGENT`: Override the probe user agent
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides using the given variable lookup.
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("USERSCOUT_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.probe.timeout_secs = secs;
                tracing::debug!("Override probe.timeout_secs from env: {}", secs);
            }
        }

        if let Some(val) = lookup("USERSCOUT_INCLUDE_NSFW") {
            if let Ok(include) = val.parse() {
                self.probe.include_nsfw = include;
                tracing::debug!("Override probe.include_nsfw from env: {}", include);
            }
        }

        if let Some(val) = lookup("USERSCOUT_CATALOG_DIR") {
            if !val.trim().is_empty() {
                tracing::debug!("Override catalog.directory from env: {}", val);
                self.catalog.directory = Some(PathBuf::from(val));
            }
        }

        if let Some(val) = lookup("USERSCOUT_USER_AGENT") {
            if !val.trim().is_empty() {
                self.probe.user_agent = val;
            }
        }
    }

    /// Check that the configured values are usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.probe.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "probe.timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.probe.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "probe.user_agent".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        if self.probe.max_concurrent_probes == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "probe.max_concurrent_probes".to_string(),
                reason: "must be at least 1 when set".to_string(),
            });
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/userscout/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "userscout", "userscout").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Probe engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Shared deadline for one username check, in seconds
    pub timeout_secs: u64,
    /// Whether NSFW-flagged services are probed
    pub include_nsfw: bool,
    /// User agent string
    pub user_agent: String,
    /// Upper bound on in-flight probes per check (unset = one per service)
    pub max_concurrent_probes: Option<usize>,
    /// Default allow-list of service names (empty = all)
    pub services: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            include_nsfw: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrent_probes: None,
            services: Vec::new(),
        }
    }
}

/// Service catalog settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory of `*.json` definition files used instead of the bundled catalog
    pub directory: Option<PathBuf>,
}
