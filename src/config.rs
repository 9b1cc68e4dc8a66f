//! Configuration management for scrapegate.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::{Result, ScrapeError};

/// Minimum spacing between two permitted fetches, in milliseconds.
pub const DEFAULT_MIN_SPACING_MS: u64 = 1_000;
/// Maximum number of fetches granted per rolling window.
pub const DEFAULT_MAX_CALLS_PER_WINDOW: usize = 10;
/// Length of the rolling quota window, in seconds.
pub const DEFAULT_WINDOW_SECS: u64 = 60;
/// Per-request HTTP deadline, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
/// Number of characters shown in a scrape preview.
pub const DEFAULT_PREVIEW_LENGTH: usize = 500;
/// User agent sent with every outbound request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Main configuration for the scrapegate service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Outbound pacing configuration
    #[serde(default)]
    pub gate: GateConfig,

    /// HTTP fetch configuration
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Pacing and quota settings for the rate gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Minimum spacing between permitted fetches in milliseconds
    #[serde(default = "default_min_spacing_ms")]
    pub min_spacing_ms: u64,

    /// Maximum permitted fetches per rolling window
    #[serde(default = "default_max_calls_per_window")]
    pub max_calls_per_window: usize,

    /// Rolling window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_spacing_ms: default_min_spacing_ms(),
            max_calls_per_window: default_max_calls_per_window(),
            window_secs: default_window_secs(),
        }
    }
}

impl GateConfig {
    /// Minimum spacing as a [`Duration`].
    pub fn min_spacing(&self) -> Duration {
        Duration::from_millis(self.min_spacing_ms)
    }

    /// Rolling window length as a [`Duration`].
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

fn default_min_spacing_ms() -> u64 {
    DEFAULT_MIN_SPACING_MS
}

fn default_max_calls_per_window() -> usize {
    DEFAULT_MAX_CALLS_PER_WINDOW
}

fn default_window_secs() -> u64 {
    DEFAULT_WINDOW_SECS
}

/// HTTP fetch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Characters of extracted text shown in chat replies
    #[serde(default = "default_preview_length")]
    pub preview_length: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            preview_length: default_preview_length(),
        }
    }
}

impl FetchConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_preview_length() -> usize {
    DEFAULT_PREVIEW_LENGTH
}

impl ScrapeConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading scrapegate configuration");

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ScrapeConfig = serde_yaml::from_str(yaml)
            .map_err(|e| ScrapeError::Config(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every fetch fail or hang.
    pub fn validate(&self) -> Result<()> {
        if self.gate.max_calls_per_window == 0 {
            return Err(ScrapeError::Config(
                "gate.max_calls_per_window must be at least 1".to_string(),
            ));
        }
        if self.gate.window_secs == 0 {
            return Err(ScrapeError::Config(
                "gate.window_secs must be at least 1".to_string(),
            ));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ScrapeError::Config(
                "fetch.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.fetch.preview_length == 0 {
            return Err(ScrapeError::Config(
                "fetch.preview_length must be at least 1".to_string(),
            ));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(ScrapeError::Config(
                "fetch.user_agent must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
