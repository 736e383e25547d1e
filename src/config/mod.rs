//! Configuration management.
//!
//! Settings come from, in increasing priority: built-in defaults, an optional
//! TOML file, `RESEARCH_PAPER_FINDER_*` environment variables, and finally the
//! command line. The NCBI API key additionally falls back to `NCBI_API_KEY`.
//!
//! ```toml
//! api_key = "your-ncbi-key"
//! verbose = false
//!
//! [eutils]
//! base_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils"
//! timeout_secs = 30
//! batch_size = 100
//! batch_delay_ms = 500
//!
//! [retry]
//! max_attempts = 3
//! initial_delay_ms = 1000
//! max_delay_ms = 4000
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sources::{DEFAULT_EUTILS_BASE, MAX_BATCH_SIZE};
use crate::utils::{RetryConfig, DEFAULT_TIMEOUT};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "RESEARCH_PAPER_FINDER";

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "research-paper-finder.toml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// NCBI API key (optional, for higher rate limits)
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,

    /// Verbose/debug output
    #[serde(default)]
    pub verbose: bool,

    /// E-utilities endpoint settings
    #[serde(default)]
    pub eutils: EutilsConfig,

    /// Retry settings for each remote call
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            verbose: false,
            eutils: EutilsConfig::default(),
            retry: RetrySettings::default(),
        }
    }
}

fn default_api_key() -> Option<String> {
    std::env::var("NCBI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
}

/// E-utilities endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EutilsConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Identifiers per efetch call (at most 100)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause between efetch batches
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
}

impl Default for EutilsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
        }
    }
}

impl EutilsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

fn default_base_url() -> String {
    DEFAULT_EUTILS_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}

fn default_batch_delay_ms() -> u64 {
    500
}

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetrySettings {
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig::default()
            .max_attempts(self.max_attempts)
            .initial_delay(Duration::from_millis(self.initial_delay_ms))
            .max_delay(Duration::from_millis(self.max_delay_ms))
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    4000
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, ::config::ConfigError> {
    let settings = ::config::Config::builder()
        .add_source(::config::File::from(path))
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a configuration file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("research-paper-finder").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Get the default configuration (from env vars or defaults)
pub fn get_config() -> Config {
    Config::default()
}
