//! Request orchestration
//!
//! `Resolver::resolve` is the single entry point for obtaining document text:
//! 1. Parse the raw URL into a target (terminal on failure)
//! 2. Serve from the cache if an entry exists, with no delay and no network
//! 3. Sleep a randomized pre-flight delay
//! 4. Fetch with bounded retries
//! 5. Encode binary payloads as base64, write the result to the cache, return it

use crate::cache::CacheStore;
use crate::fetch::{
    with_retry, Clock, DelayPolicy, Fetcher, Payload, RetryError, RetryPolicy, TokioClock,
};
use crate::target::RequestTarget;
use crate::TargetError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

/// Where a resolved document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Read from an existing cache entry
    Cache,
    /// Fetched from the network and written to the cache
    Network { binary: bool, attempts: u32 },
}

/// Content obtained for a URL
///
/// Empty content is a valid document, not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Text as fetched, or base64 for binary responses
    pub content: String,
    pub origin: Origin,
}

/// Why a resolve produced no document
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid request target: {0}")]
    InvalidTarget(#[from] TargetError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] RetryError),
}

/// Ties together the cache, the pre-flight delay and the retrying fetcher
pub struct Resolver<F, C = TokioClock> {
    fetcher: F,
    clock: C,
    cache: CacheStore,
    delay: DelayPolicy,
    retry: RetryPolicy,
}

impl<F: Fetcher> Resolver<F, TokioClock> {
    /// Creates a resolver with the default delay (1–3 s) and retry budget (3 attempts)
    pub fn new(fetcher: F, cache: CacheStore) -> Self {
        Self {
            fetcher,
            clock: TokioClock,
            cache,
            delay: DelayPolicy::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl<F: Fetcher, C: Clock> Resolver<F, C> {
    /// Replaces the clock used for the pre-flight delay
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Resolver<F, C2> {
        Resolver {
            fetcher: self.fetcher,
            clock,
            cache: self.cache,
            delay: self.delay,
            retry: self.retry,
        }
    }

    pub fn with_delay(mut self, delay: DelayPolicy) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Obtains the document for `raw_url`
    ///
    /// # Returns
    ///
    /// * `Ok(Document)` - From the cache, or freshly fetched and cached
    /// * `Err(ResolveError::InvalidTarget)` - Malformed URL or unsupported scheme; nothing
    ///   was fetched or cached
    /// * `Err(ResolveError::Fetch)` - Every attempt failed; nothing was cached
    pub async fn resolve(&self, raw_url: &str) -> Result<Document, ResolveError> {
        let target = RequestTarget::parse(raw_url).map_err(|e| {
            tracing::error!("Rejecting {}: {}", raw_url, e);
            e
        })?;

        tracing::info!("Requesting {}", target);

        let _guard = self.cache.lock(&target).await;

        match self.cache.read(&target) {
            Ok(Some(content)) => {
                tracing::info!("Loaded {} from cache", target);
                return Ok(Document {
                    content,
                    origin: Origin::Cache,
                });
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring unreadable cache entry: {}", e),
        }

        let wait = self.delay.pick();
        tracing::info!("Waiting {}s before fetching {}", wait.as_secs(), target);
        self.clock.sleep(wait).await;

        let retrieved = with_retry(&self.fetcher, &target, &self.retry)
            .await
            .map_err(|e| {
                tracing::error!("Giving up on {}: {}", target, e);
                e
            })?;

        let binary = retrieved.payload.is_binary();
        let content = match retrieved.payload {
            Payload::Text(text) => text,
            Payload::Binary(bytes) => BASE64.encode(bytes),
        };

        match self.cache.write(&target, &content) {
            Ok(()) => tracing::info!("Cached {} as {}", target, CacheStore::key_for(&target)),
            Err(e) => tracing::warn!("Could not cache {}: {}", target, e),
        }

        Ok(Document {
            content,
            origin: Origin::Network {
                binary,
                attempts: retrieved.attempts,
            },
        })
    }
}
