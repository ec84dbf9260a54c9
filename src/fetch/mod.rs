//! Fetch-cache-retry subsystem
//!
//! This module contains everything between a raw URL string and document text:
//! - A single-attempt HTTP fetcher with binary/text classification
//! - An attempt state machine that retries failed fetches a bounded number of times
//! - An injectable clock for the randomized pre-flight delay
//! - The resolver that ties cache, delay and retries together

mod clock;
mod fetcher;
mod resolver;
mod retry;


pub use clock::{Clock, DelayPolicy, TokioClock};
pub use fetcher::{build_http_client, FetchFailure, Fetcher, HttpFetcher, Payload};
pub use resolver::{Document, Origin, ResolveError, Resolver};
pub use retry::{with_retry, AttemptState, Retrieved, RetryError, RetryPolicy};

/// Attempts made per resolve unless configured otherwise
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
