//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml
//!
//! Dataset URLs can additionally be overridden with the VENUES_URL and
//! SESSIONS_URL environment variables; CLI flags win over both.

use crate::services::dwell::DwellGrouping;
use crate::services::report::{AnalysisOptions, DEFAULT_NAMED_VENUE};
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";
pub const DEFAULT_CONFIG_PATH: &str = "config/dev.toml";
pub const VENUES_URL_ENV: &str = "VENUES_URL";
pub const SESSIONS_URL_ENV: &str = "SESSIONS_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_venues_url")]
    pub venues_url: String,
    #[serde(default = "default_sessions_url")]
    pub sessions_url: String,
    /// HTTP request timeout per dataset
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            venues_url: default_venues_url(),
            sessions_url: default_sessions_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_venues_url() -> String {
    "http://localhost:8080/venues".to_string()
}

fn default_sessions_url() -> String {
    "http://localhost:8080/sessions".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Venue whose unique visitors are reported as `ducatiVisitorsCount`
    #[serde(default = "default_named_venue")]
    pub named_venue: String,
    #[serde(default)]
    pub dwell_grouping: DwellGrouping,
    #[serde(default)]
    pub require_named_venue: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            named_venue: default_named_venue(),
            dwell_grouping: DwellGrouping::default(),
            require_named_venue: false,
        }
    }
}

fn default_named_venue() -> String {
    DEFAULT_NAMED_VENUE.to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    venues_url: String,
    sessions_url: String,
    timeout_ms: u64,
    named_venue: String,
    dwell_grouping: DwellGrouping,
    require_named_venue: bool,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            venues_url: toml_config.sources.venues_url,
            sessions_url: toml_config.sources.sessions_url,
            timeout_ms: toml_config.sources.timeout_ms,
            named_venue: toml_config.analysis.named_venue,
            dwell_grouping: toml_config.analysis.dwell_grouping,
            require_named_venue: toml_config.analysis.require_named_venue,
            config_file,
        }
    }

    /// Config file path when --config is not given: CONFIG_FILE, then config/dev.toml
    pub fn resolve_config_path() -> String {
        Self::resolve_config_path_from(|key| env::var(key).ok())
    }

    /// Same as [`Config::resolve_config_path`] with an arbitrary variable lookup
    pub fn resolve_config_path_from<F>(lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(CONFIG_FILE_ENV)
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration from a specific path, falling back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "config_load_failed_using_defaults");
                Self::default()
            }
        }
    }

    /// Apply VENUES_URL / SESSIONS_URL from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    /// Apply URL overrides from an arbitrary lookup (environment in production)
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(VENUES_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.venues_url = url;
        }
        if let Some(url) = lookup(SESSIONS_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.sessions_url = url;
        }
        self
    }

    /// Options for the analytics pass
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            named_venue: self.named_venue.clone(),
            dwell_grouping: self.dwell_grouping,
            require_named_venue: self.require_named_venue,
        }
    }

    // Getters for all config fields
    pub fn venues_url(&self) -> &str {
        &self.venues_url
    }

    pub fn sessions_url(&self) -> &str {
        &self.sessions_url
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn named_venue(&self) -> &str {
        &self.named_venue
    }

    pub fn dwell_grouping(&self) -> DwellGrouping {
        self.dwell_grouping
    }

    pub fn require_named_venue(&self) -> bool {
        self.require_named_venue
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    // Builders used for CLI overrides and tests
    pub fn with_venues_url(mut self, url: impl Into<String>) -> Self {
        self.venues_url = url.into();
        self
    }

    pub fn with_sessions_url(mut self, url: impl Into<String>) -> Self {
        self.sessions_url = url.into();
        self
    }

    pub fn with_named_venue(mut self, name: impl Into<String>) -> Self {
        self.named_venue = name.into();
        self
    }

    pub fn with_dwell_grouping(mut self, grouping: DwellGrouping) -> Self {
        self.dwell_grouping = grouping;
        self
    }

    pub fn with_require_named_venue(mut self, required: bool) -> Self {
        self.require_named_venue = required;
        self
    }
}
