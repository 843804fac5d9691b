//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::log;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Proxy servers for outbound requests
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                if path.as_ref().exists() {
                    log::warn(&format!(
                        "Config load failed from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        e
                    ));
                }
                Self::default()
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.base_url.trim().is_empty() {
            return Err(AppError::config("crawler.base_url is empty"));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Base URL of the judge site
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between status pages in seconds
    #[serde(default = "defaults::page_delay")]
    pub page_delay_secs: u64,

    /// Delay between users in batch mode, in seconds
    #[serde(default = "defaults::user_delay")]
    pub user_delay_secs: u64,

    /// Retries after a blocked request (total attempts = retries + 1)
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Delay between blocked-request retries, in seconds
    #[serde(default = "defaults::retry_delay")]
    pub retry_delay_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            page_delay_secs: defaults::page_delay(),
            user_delay_secs: defaults::user_delay(),
            max_retries: defaults::max_retries(),
            retry_delay_secs: defaults::retry_delay(),
        }
    }
}

/// Outbound proxy settings. Absent fields mean direct connections.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProxyConfig {
    /// Proxy for plain HTTP requests
    #[serde(default)]
    pub http: Option<String>,

    /// Proxy for HTTPS requests
    #[serde(default)]
    pub https: Option<String>,
}

impl ProxyConfig {
    /// Whether any proxy is configured.
    pub fn is_configured(&self) -> bool {
        self.http.is_some() || self.https.is_some()
    }
}

/// Filesystem output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory under which per-user folders are created
    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,

    /// Directory for batch report files
    #[serde(default = "defaults::report_dir")]
    pub report_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: defaults::output_dir(),
            report_dir: defaults::report_dir(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level to print: debug, info, warn, error
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn base_url() -> String {
        "https://www.acmicpc.net".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn page_delay() -> u64 {
        2
    }
    pub fn user_delay() -> u64 {
        5
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn retry_delay() -> u64 {
        2
    }

    // Path defaults
    pub fn output_dir() -> String {
        ".".into()
    }
    pub fn report_dir() -> String {
        "reports".into()
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
