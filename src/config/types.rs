use crate::extract::DEFAULT_PATTERN;
use crate::fetch::{DelayPolicy, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Document to fetch and extract records from
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Directory holding cached responses
    #[serde(rename = "cache-path")]
    pub cache_path: String,

    /// JSON file the records are written to
    pub output: String,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Network fetch behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Attempts per document before giving up
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Lower bound of the pre-flight delay (seconds)
    #[serde(rename = "min-delay-secs", default = "default_min_delay_secs")]
    pub min_delay_secs: u64,

    /// Upper bound of the pre-flight delay (seconds, inclusive)
    #[serde(rename = "max-delay-secs", default = "default_max_delay_secs")]
    pub max_delay_secs: u64,

    /// Deadline for a single attempt (seconds)
    #[serde(rename = "attempt-timeout-secs", default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,
}

impl FetchConfig {
    pub fn delay_policy(&self) -> DelayPolicy {
        DelayPolicy::new(self.min_delay_secs, self.max_delay_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts).with_attempt_timeout(self.attempt_timeout())
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            min_delay_secs: default_min_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
            attempt_timeout_secs: default_attempt_timeout_secs(),
        }
    }
}

/// Record extraction settings
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Regular expression with `code2`, `code3` and `code` named groups
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
        }
    }
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_min_delay_secs() -> u64 {
    1
}

fn default_max_delay_secs() -> u64 {
    3
}

fn default_attempt_timeout_secs() -> u64 {
    30
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}
