//! JSON output generation

use crate::extract::CallingCode;
use crate::output::{OutputError, OutputResult};
use std::path::Path;

/// Writes records to `output_path` as a pretty-printed JSON array
///
/// # Arguments
///
/// * `output_path` - File to create or overwrite
/// * `records` - Records in output order
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the file
/// * `Err(OutputError)` - Failed to serialize or write
pub fn write_records(output_path: &Path, records: &[CallingCode]) -> OutputResult<()> {
    let json = format_records(records)?;

    std::fs::write(output_path, json).map_err(|source| OutputError::Write {
        path: output_path.to_path_buf(),
        source,
    })
}

/// Formats records as a JSON array indented with two spaces
pub fn format_records(records: &[CallingCode]) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
