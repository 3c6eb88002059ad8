//! Settings management for `poimap`
//!
//! Handles loading settings from a TOML file and environment variables,
//! and validates them before the server starts.

use crate::PoiMapError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Env var checked when `maps.api_key` is not configured
pub const FALLBACK_API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

/// Root settings structure for the `poimap` application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiMapSettings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Where map documents come from
    #[serde(default)]
    pub documents: DocumentsSettings,
    /// Map widget settings
    #[serde(default)]
    pub maps: MapsSettings,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Document source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsSettings {
    /// Directory holding `<name>.json` documents, also served under `/configs`
    #[serde(default = "default_documents_dir")]
    pub dir: String,
    /// When set, documents are fetched from `<remote_base_url>/<name>.json` instead of `dir`
    pub remote_base_url: Option<String>,
    /// Fetch timeout in seconds for the remote source
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: u32,
}

/// Map widget settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsSettings {
    /// Google Maps JavaScript API key
    pub api_key: Option<String>,
    /// Map style id handed to the widget
    #[serde(default = "default_map_id")]
    pub map_id: String,
    /// Initial zoom level
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
    /// Favicon lookup service, queried with `?domain=<host>&sz=32`
    #[serde(default = "default_favicon_service")]
    pub favicon_service: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_documents_dir() -> String {
    "public/configs".to_string()
}

fn default_fetch_timeout() -> u32 {
    10
}

fn default_map_id() -> String {
    "DEMO_MAP_ID".to_string()
}

fn default_zoom() -> u8 {
    12
}

fn default_favicon_service() -> String {
    "https://www.google.com/s2/favicons".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DocumentsSettings {
    fn default() -> Self {
        Self {
            dir: default_documents_dir(),
            remote_base_url: None,
            timeout_seconds: default_fetch_timeout(),
        }
    }
}

impl Default for MapsSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            map_id: default_map_id(),
            default_zoom: default_zoom(),
            favicon_service: default_favicon_service(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for PoiMapSettings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            documents: DocumentsSettings::default(),
            maps: MapsSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl PoiMapSettings {
    /// Load settings from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load settings from specified path
    pub fn load_from_path(settings_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let settings_file = settings_path.unwrap_or_else(|| {
            Self::get_settings_path().unwrap_or_else(|| PathBuf::from("settings.toml"))
        });

        if settings_file.exists() {
            builder = builder.add_source(
                File::from(settings_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // POIMAP_MAPS__API_KEY -> maps.api_key
        builder = builder.add_source(
            Environment::with_prefix("POIMAP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build settings")?;

        let mut settings: PoiMapSettings = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize settings")?;

        if settings.maps.api_key.is_none() {
            settings.maps.api_key = std::env::var(FALLBACK_API_KEY_VAR).ok();
        }

        settings.apply_defaults();
        settings.validate()?;

        Ok(settings)
    }

    /// Get the default settings file path
    #[must_use]
    pub fn get_settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("poimap").join("settings.toml"))
    }

    /// Apply default values to empty settings fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.documents.dir.is_empty() {
            self.documents.dir = default_documents_dir();
        }
        if self.documents.timeout_seconds == 0 {
            self.documents.timeout_seconds = default_fetch_timeout();
        }
        if self
            .documents
            .remote_base_url
            .as_deref()
            .is_some_and(str::is_empty)
        {
            self.documents.remote_base_url = None;
        }
        if self.maps.api_key.as_deref().is_some_and(str::is_empty) {
            self.maps.api_key = None;
        }
        if self.maps.map_id.is_empty() {
            self.maps.map_id = default_map_id();
        }
        if self.maps.default_zoom == 0 {
            self.maps.default_zoom = default_zoom();
        }
        if self.maps.favicon_service.is_empty() {
            self.maps.favicon_service = default_favicon_service();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// The map widget cannot start without a key, so `serve` checks this before binding.
    pub fn require_api_key(&self) -> std::result::Result<&str, PoiMapError> {
        self.maps
            .api_key
            .as_deref()
            .ok_or_else(|| PoiMapError::MissingCredential {
                name: "POIMAP_MAPS__API_KEY",
                remediation: format!(
                    "Google Maps API key is missing. Add it to your `.env` file like so: \
                     `POIMAP_MAPS__API_KEY=\"YOUR_API_KEY_HERE\"` (or set `{FALLBACK_API_KEY_VAR}`), \
                     or set `maps.api_key` in the settings file."
                ),
            })
    }

    /// Validate numeric settings ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.maps.default_zoom > 22 {
            return Err(PoiMapError::settings("Default zoom cannot exceed 22").into());
        }

        if self.documents.timeout_seconds > 300 {
            return Err(
                PoiMapError::settings("Document fetch timeout cannot exceed 300 seconds").into(),
            );
        }

        Ok(())
    }

    /// Validate string settings values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PoiMapError::settings(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PoiMapError::settings(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if let Some(base_url) = &self.documents.remote_base_url {
            if !is_http_url(base_url) {
                return Err(PoiMapError::settings(
                    "Remote document base URL must be a valid HTTP or HTTPS URL",
                )
                .into());
            }
        }

        if !is_http_url(&self.maps.favicon_service) {
            return Err(PoiMapError::settings(
                "Favicon service must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}

fn is_http_url(raw: &str) -> bool {
    reqwest::Url::parse(raw).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|host| !host.is_empty())
    })
}
