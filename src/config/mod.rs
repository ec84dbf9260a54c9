//! Configuration module
//!
//! This module handles loading, parsing, and validating the TOML settings file,
//! and preparing the filesystem locations it names.
//!
//! # Example
//!
//! ```no_run
//! use calling_codes::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("calling-codes.toml")).unwrap();
//! println!("Will retry up to {} times", config.fetch.max_attempts);
//! ```

mod parser;
mod paths;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ExtractConfig, FetchConfig};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, DEFAULT_CONFIG_FILE,
};
pub use paths::{absolute_path, output_path, prepare_cache_dir};
