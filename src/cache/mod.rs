//! Content-addressed document cache
//!
//! This module handles the on-disk cache of fetched documents:
//! - Deriving a stable file name from a request target
//! - Reading and writing cached payloads
//! - Serializing concurrent resolves of the same key

mod locks;
mod store;

pub use locks::KeyLocks;
pub use store::{CacheStore, CACHE_KEY_EXTENSION, CACHE_KEY_PREFIX};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;
