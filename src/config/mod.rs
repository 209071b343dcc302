//! Configuration management
//!
//! This module provides YAML-based configuration management with support for:
//! - Environment variable overrides
//! - Multiple configuration file locations
//! - Default values for all settings
//! - Page sizes and dashboard parameters for the list views

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub views: ViewsConfig,
}

/// Depot API connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the depot API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout in seconds (supports both timeout_secs and timeout field names)
    #[serde(default = "default_timeout", alias = "timeout")]
    pub timeout_secs: u64,
    /// Bearer token used for every call (usually supplied through DEPOT_TOKEN)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            token: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    /// Log output target (console or file)
    #[serde(default = "default_log_target")]
    pub target: LogTarget,
    /// Directory for log files (used when target is "file")
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Log file name prefix (default: "depot-console")
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,
    /// Enable daily log rotation
    #[serde(default = "default_log_rotation")]
    pub daily_rotation: bool,
}

/// Log output target
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// Log to stderr, keeping stdout for tables
    #[default]
    Console,
    /// Log to file with optional rotation
    File,
    /// Log to both console and file
    Both,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_log_target() -> LogTarget {
    LogTarget::Console
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("depot-console/logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn default_log_prefix() -> String {
    "depot-console".to_string()
}

fn default_log_rotation() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            target: default_log_target(),
            log_dir: default_log_dir(),
            log_prefix: default_log_prefix(),
            daily_rotation: default_log_rotation(),
        }
    }
}

/// List view and dashboard parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewsConfig {
    /// Number of log entries per page
    #[serde(default = "default_log_page_size")]
    pub log_page_size: usize,
    /// Number of users per page in the admin table
    #[serde(default = "default_user_page_size")]
    pub user_page_size: usize,
    /// Quantity below which a product counts as low stock
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: u32,
    /// Length of the daily series on the dashboard
    #[serde(default = "default_daily_stats_days")]
    pub daily_stats_days: u32,
    /// Directory CSV exports are written to
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

fn default_log_page_size() -> usize {
    12
}

fn default_user_page_size() -> usize {
    10
}

fn default_low_stock_threshold() -> u32 {
    10
}

fn default_daily_stats_days() -> u32 {
    7
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            log_page_size: default_log_page_size(),
            user_page_size: default_user_page_size(),
            low_stock_threshold: default_low_stock_threshold(),
            daily_stats_days: default_daily_stats_days(),
            export_dir: default_export_dir(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
            views: ViewsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file (YAML)
    /// 3. Environment variables (prefixed with DEPOT_)
    ///
    /// An explicit file path takes precedence over the lookup chain and must exist.
    pub fn load_from(explicit: Option<&PathBuf>) -> Result<Self> {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let config_path = explicit.cloned().or_else(|| {
            std::env::var("DEPOT_CONFIG")
                .map(PathBuf::from)
                .ok()
                .or_else(Self::find_config_file)
        });

        let mut config = match config_path {
            Some(ref path) if path.exists() => Self::from_file(path)?,
            Some(ref path) if explicit.is_some() => {
                anyhow::bail!("Config file not found: {:?}", path);
            }
            _ => AppConfig::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration file without applying overrides
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_norway::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Find the configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            // Current directory
            PathBuf::from("config.yaml"),
            PathBuf::from("config/config.yaml"),
            // System config directory
            PathBuf::from("/etc/depot-console/config.yaml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("depot-console/config.yaml"))
                .unwrap_or_default(),
        ];

        paths.into_iter().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // API overrides
        if let Ok(url) = std::env::var("DEPOT_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("DEPOT_API_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.api.timeout_secs = t;
            }
        }
        if let Ok(token) = std::env::var("DEPOT_TOKEN") {
            if !token.trim().is_empty() {
                self.api.token = Some(token);
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("DEPOT_LOG_FORMAT") {
            self.logging.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" => LogFormat::Compact,
                _ => LogFormat::Pretty,
            };
        }
        if let Ok(target) = std::env::var("DEPOT_LOG_TARGET") {
            self.logging.target = match target.to_lowercase().as_str() {
                "file" => LogTarget::File,
                "both" => LogTarget::Both,
                _ => LogTarget::Console,
            };
        }

        // View overrides
        if let Ok(dir) = std::env::var("DEPOT_EXPORT_DIR") {
            self.views.export_dir = PathBuf::from(dir);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            anyhow::bail!("API base URL cannot be empty");
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!(
                "Invalid API base URL: {}. Must start with http:// or https://",
                url
            );
        }

        if self.api.timeout_secs == 0 {
            anyhow::bail!("API timeout cannot be 0");
        }

        if self.views.log_page_size == 0 || self.views.user_page_size == 0 {
            anyhow::bail!("Page sizes must be greater than 0");
        }

        if !(1..=30).contains(&self.views.daily_stats_days) {
            anyhow::bail!(
                "Invalid daily_stats_days: {}. Must be between 1 and 30",
                self.views.daily_stats_days
            );
        }

        Ok(())
    }

    /// Create a default configuration file
    pub fn create_default_config(path: &PathBuf) -> Result<()> {
        let config = AppConfig::default();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_norway::to_string(&config)?;
        std::fs::write(path, yaml)?;

        Ok(())
    }
}
