use crate::config::types::Config;
use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Resolves `path` against the current working directory if it is relative
pub fn absolute_path(path: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
    let path = path.as_ref();
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Resolves the cache directory and creates it if missing
///
/// Only the last path component is created; a missing parent is an error.
pub fn prepare_cache_dir(config: &Config) -> Result<PathBuf, ConfigError> {
    let dir = absolute_path(&config.cache_path)?;

    if !dir.exists() {
        tracing::info!("Creating cache directory {}", dir.display());
        std::fs::create_dir(&dir)?;
    } else if !dir.is_dir() {
        return Err(ConfigError::Validation(format!(
            "cache-path {} exists but is not a directory",
            dir.display()
        )));
    }

    Ok(dir)
}

/// Resolves the output file path
pub fn output_path(config: &Config) -> Result<PathBuf, ConfigError> {
    absolute_path(&config.output)
}
