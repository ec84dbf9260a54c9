//! calling-codes: fetch, cache and extract country calling codes
//!
//! This crate fetches a single remote document through a content-addressed disk cache,
//! retrying failed requests a bounded number of times, then extracts calling-code records
//! from it with a regular expression and writes them out as JSON.

pub mod cache;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod output;
pub mod pipeline;
pub mod target;

use thiserror::Error;

/// Main error type for a harvest run
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to resolve document: {0}")]
    Resolve(#[from] fetch::ResolveError),

    #[error("Extraction error: {0}")]
    Extract(#[from] extract::ExtractError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid record pattern: {0}")]
    InvalidPattern(String),
}

/// Errors raised while turning a raw string into a request target
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Failed to parse URL '{url}': {source}")]
    Parse {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Unsupported URL scheme '{scheme}' in {url}")]
    UnsupportedScheme { url: String, scheme: String },
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::CacheStore;
pub use config::Config;
pub use extract::{CallingCode, RecordPattern};
pub use fetch::{Document, Fetcher, HttpFetcher, Resolver};
pub use target::RequestTarget;
