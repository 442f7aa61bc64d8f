//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

use crate::discord::client::{default_user_agent, DEFAULT_API_BASE, DEFAULT_RATE_LIMIT, MAX_PAGE_SIZE};
use crate::export::OutputFormat;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub filters: FilterDefaults,
}

impl Config {
    /// Check value ranges after deserialization.
    pub fn validate(&self) -> Result<(), String> {
        self.api.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

/// Discord API access settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound on outgoing requests per second; 0 disables throttling
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,
    #[serde(default = "default_page_size")]
    pub page_size: u8,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempts per page, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

pub fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

pub fn default_requests_per_second() -> f64 {
    DEFAULT_RATE_LIMIT
}

pub fn default_page_size() -> u8 {
    MAX_PAGE_SIZE
}

pub fn default_timeout_secs() -> u64 {
    15
}

pub fn default_max_attempts() -> u32 {
    5
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            requests_per_second: default_requests_per_second(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("api.base_url must not be empty".to_string());
        }
        if !self.requests_per_second.is_finite() || self.requests_per_second < 0.0 {
            return Err(format!(
                "api.requests_per_second {} must be a non-negative number",
                self.requests_per_second
            ));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(format!(
                "api.page_size {} must be between 1 and {}",
                self.page_size, MAX_PAGE_SIZE
            ));
        }
        if self.timeout_secs == 0 {
            return Err("api.timeout_secs must be > 0".to_string());
        }
        if self.max_attempts == 0 {
            return Err("api.max_attempts must be > 0".to_string());
        }
        if self.max_attempts > 20 {
            return Err(format!(
                "api.max_attempts {} exceeds maximum (20)",
                self.max_attempts
            ));
        }
        Ok(())
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// One of json, markdown (md) or both
    #[serde(default = "default_format")]
    pub format: String,
    /// Directory for exports written under the default file name
    #[serde(default = "default_directory")]
    pub directory: String,
}

pub fn default_format() -> String {
    "json".to_string()
}

pub fn default_directory() -> String {
    ".".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            directory: default_directory(),
        }
    }
}

impl OutputConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.format.parse::<OutputFormat>().map(|_| ())
    }
}

/// Filter defaults applied when the matching flag is absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterDefaults {
    #[serde(default)]
    pub include_bots: bool,
}
