//! Application configuration.
//!
//! Settings are read from `catalog.toml`, which is embedded at build time.
//! Every key has a default, so an empty file is a valid configuration.

use std::time::Duration;

use catalog_data::DEFAULT_CATALOG_URL;
use catalog_observability::LogConfig;
use catalog_query::QueryKey;
use serde::{Deserialize, Serialize};

use crate::notify::{ToastOptions, ToastPosition};

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("Query key must not be empty")]
    EmptyQueryKey,
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub toast: ToastSettings,

    #[serde(default)]
    pub logging: LogConfig,
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The configuration shipped with the application.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml_str(include_str!("../catalog.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = &self.catalog.endpoint;
        let has_host = endpoint
            .strip_prefix("https://")
            .or_else(|| endpoint.strip_prefix("http://"))
            .is_some_and(|rest| !rest.is_empty());
        if !has_host {
            return Err(ConfigError::InvalidEndpoint(endpoint.clone()));
        }
        if self.catalog.query_key.trim().is_empty() {
            return Err(ConfigError::EmptyQueryKey);
        }
        Ok(())
    }

    pub fn query_key(&self) -> QueryKey {
        QueryKey::new(self.catalog.query_key.clone())
    }
}

/// Where the catalog comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Product listing URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Cache key of the listing query.
    #[serde(default = "default_query_key")]
    pub query_key: String,
}

fn default_endpoint() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_query_key() -> String {
    "products".to_string()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            query_key: default_query_key(),
        }
    }
}

/// Toast appearance and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToastSettings {
    #[serde(default)]
    pub position: ToastPosition,

    /// Display time of the selection toast; 0 disables auto-close.
    #[serde(default = "default_auto_close_ms")]
    pub auto_close_ms: u64,

    /// Display time of the load-failure toast; 0 disables auto-close.
    #[serde(default = "default_error_auto_close_ms")]
    pub error_auto_close_ms: u64,

    #[serde(default = "default_true")]
    pub show_progress_bar: bool,

    #[serde(default = "default_true")]
    pub close_on_click: bool,

    #[serde(default = "default_true")]
    pub pause_on_hover: bool,

    #[serde(default = "default_true")]
    pub draggable: bool,
}

fn default_auto_close_ms() -> u64 {
    3000
}

fn default_error_auto_close_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self {
            position: ToastPosition::default(),
            auto_close_ms: default_auto_close_ms(),
            error_auto_close_ms: default_error_auto_close_ms(),
            show_progress_bar: true,
            close_on_click: true,
            pause_on_hover: true,
            draggable: true,
        }
    }
}

impl ToastSettings {
    fn options(&self, auto_close_ms: u64) -> ToastOptions {
        ToastOptions {
            position: self.position,
            auto_close: (auto_close_ms > 0).then(|| Duration::from_millis(auto_close_ms)),
            show_progress_bar: self.show_progress_bar,
            close_on_click: self.close_on_click,
            pause_on_hover: self.pause_on_hover,
            draggable: self.draggable,
        }
    }

    /// Options for the "Selected: ..." toast.
    pub fn selection_options(&self) -> ToastOptions {
        self.options(self.auto_close_ms)
    }

    /// Options for the load-failure toast.
    pub fn error_options(&self) -> ToastOptions {
        self.options(self.error_auto_close_ms)
    }
}
