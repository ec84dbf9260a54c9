//! Record extraction
//!
//! This module turns document text into calling-code records:
//! - Compiling the record pattern and checking its named groups
//! - Lazily mapping each match to a validated `CallingCode`
//! - Dropping records whose (code2, code3) pair was already seen

mod dedup;
mod pattern;
mod record;

pub use dedup::Deduplicator;
pub use pattern::{RecordPattern, Records, DEFAULT_PATTERN};
pub use record::CallingCode;

use thiserror::Error;

/// Named capture groups every record pattern must define
pub const REQUIRED_GROUPS: [&str; 3] = ["code2", "code3", "code"];

/// Errors that can occur during extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid record pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Record pattern is missing the named group '{0}'")]
    MissingGroup(&'static str),

    #[error("Match at byte {offset} has no value for '{field}'")]
    MissingField { field: &'static str, offset: usize },
}

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;
