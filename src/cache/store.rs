use crate::cache::{CacheError, CacheResult, KeyLocks};
use crate::target::RequestTarget;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tokio::sync::OwnedMutexGuard;

/// Prefix of every cache file name
pub const CACHE_KEY_PREFIX: &str = "cache_";

/// Extension of every cache file name
pub const CACHE_KEY_EXTENSION: &str = ".dat";

/// File-backed cache keyed by the MD5 digest of the target URL
///
/// Entries are created on the first successful fetch and never expire. Text payloads
/// are stored as-is, binary payloads are stored base64-encoded by the caller; there is
/// no header telling the two apart.
#[derive(Debug)]
pub struct CacheStore {
    dir: PathBuf,
    locks: KeyLocks,
}

impl CacheStore {
    /// Creates a cache store rooted at `dir`
    ///
    /// The directory is expected to exist already (see `config::prepare_cache_dir`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: KeyLocks::default(),
        }
    }

    /// Computes the cache file name for a target
    ///
    /// The key is a pure function of the canonical URL string:
    /// `cache_<32 hex chars of md5>.dat`.
    ///
    /// # Examples
    ///
    /// ```
    /// use calling_codes::cache::CacheStore;
    /// use calling_codes::target::RequestTarget;
    ///
    /// let target = RequestTarget::parse("https://example.com/").unwrap();
    /// let key = CacheStore::key_for(&target);
    /// assert!(key.starts_with("cache_") && key.ends_with(".dat"));
    /// assert_eq!(key.len(), "cache_".len() + 32 + ".dat".len());
    /// ```
    pub fn key_for(target: &RequestTarget) -> String {
        let digest = md5::compute(target.as_str().as_bytes());
        format!("{}{:x}{}", CACHE_KEY_PREFIX, digest, CACHE_KEY_EXTENSION)
    }

    /// Full path of the cache file for a target
    pub fn path_for(&self, target: &RequestTarget) -> PathBuf {
        self.dir.join(Self::key_for(target))
    }

    /// Reads the cached content for a target
    ///
    /// # Returns
    ///
    /// * `Ok(Some(content))` - A cache file exists (it may be empty)
    /// * `Ok(None)` - Nothing cached for this target
    /// * `Err(CacheError)` - The file exists but could not be read
    pub fn read(&self, target: &RequestTarget) -> CacheResult<Option<String>> {
        let path = self.path_for(target);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Read { path, source }),
        }
    }

    /// Writes content for a target, replacing any previous file
    ///
    /// The content goes to a temporary file in the cache directory that is renamed over
    /// the entry only once fully written, so a failed write never leaves a partial entry.
    pub fn write(&self, target: &RequestTarget, content: &str) -> CacheResult<()> {
        self.write_with(target, |file| file.write_all(content.as_bytes()))
    }

    pub(crate) fn write_with<W>(&self, target: &RequestTarget, fill: W) -> CacheResult<()>
    where
        W: FnOnce(&mut File) -> std::io::Result<()>,
    {
        let path = self.path_for(target);
        let fail = |source| CacheError::Write {
            path: path.clone(),
            source,
        };

        // Dropping the temp file on any error removes it
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(fail)?;
        fill(tmp.as_file_mut()).map_err(fail)?;
        tmp.as_file_mut().sync_all().map_err(fail)?;
        tmp.persist(&path).map_err(|e| fail(e.error))?;
        Ok(())
    }

    /// Acquires the per-key lock for a target
    ///
    /// Holding the guard across lookup, fetch and write keeps two resolves of the same
    /// URL from fetching and writing the same file concurrently.
    pub async fn lock(&self, target: &RequestTarget) -> OwnedMutexGuard<()> {
        self.locks.acquire(&Self::key_for(target)).await
    }
}
