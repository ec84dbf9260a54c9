//! End-to-end harvest run
//!
//! One run resolves the configured root URL, extracts calling-code records from the
//! document, drops duplicates, and writes the result as JSON.

use crate::cache::CacheStore;
use crate::config::{output_path, prepare_cache_dir, Config};
use crate::extract::{CallingCode, Deduplicator, RecordPattern};
use crate::fetch::{build_http_client, Clock, Fetcher, HttpFetcher, Origin, Resolver};
use crate::output::write_records;
use crate::HarvestError;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound on establishing a TCP/TLS connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Records extracted from one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Harvest {
    /// Unique records in first-seen order
    pub records: Vec<CallingCode>,
    /// Matches dropped because their (code2, code3) pair was already seen
    pub duplicates: usize,
    pub origin: Origin,
}

/// Outcome of a full run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub records_written: usize,
    pub duplicates: usize,
    pub origin: Origin,
    pub output: PathBuf,
}

/// Resolves `root_url` and extracts unique records from it
///
/// The first record that fails field validation aborts the harvest.
pub async fn harvest<F, C>(
    resolver: &Resolver<F, C>,
    pattern: &RecordPattern,
    root_url: &str,
) -> Result<Harvest, HarvestError>
where
    F: Fetcher,
    C: Clock,
{
    let document = resolver.resolve(root_url).await?;

    let mut dedup = Deduplicator::new();
    let mut records = Vec::new();
    let mut duplicates = 0;

    for record in pattern.records(&document.content) {
        let record = record?;
        if dedup.admit(&record) {
            records.push(record);
        } else {
            tracing::debug!("Dropping duplicate {}/{}", record.code2, record.code3);
            duplicates += 1;
        }
    }

    tracing::info!(
        "Extracted {} record(s), dropped {} duplicate(s)",
        records.len(),
        duplicates
    );

    Ok(Harvest {
        records,
        duplicates,
        origin: document.origin,
    })
}

/// Runs a complete harvest from configuration
///
/// This will:
/// 1. Resolve and create the cache directory
/// 2. Build the HTTP client, fetcher and resolver
/// 3. Fetch (or load from cache) the root document
/// 4. Extract and deduplicate records
/// 5. Write the JSON output file
pub async fn run(config: &Config) -> Result<RunSummary, HarvestError> {
    let cache_dir = prepare_cache_dir(config)?;
    let output = output_path(config)?;
    let pattern = RecordPattern::compile(&config.extract.pattern)?;

    let client = build_http_client(CONNECT_TIMEOUT)?;
    let resolver = Resolver::new(HttpFetcher::new(client), CacheStore::new(cache_dir))
        .with_delay(config.fetch.delay_policy())
        .with_retry_policy(config.fetch.retry_policy());

    let harvest = harvest(&resolver, &pattern, &config.root_url).await?;

    write_records(&output, &harvest.records)?;
    tracing::info!(
        "Wrote {} record(s) to {}",
        harvest.records.len(),
        output.display()
    );

    Ok(RunSummary {
        records_written: harvest.records.len(),
        duplicates: harvest.duplicates,
        origin: harvest.origin,
        output,
    })
}
