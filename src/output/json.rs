//! JSON report output writer.
//!
//! Wraps a shaped parse result with report metadata and writes it to disk.

use super::shape::shape;
use crate::aggregator::HotPath;
use crate::parser::ParseResult;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Report file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Report schema version
    pub version: String,

    /// Where the log came from (usually its file name)
    pub source: String,

    /// RFC 3339 timestamp of report creation
    pub generated_at: String,

    #[serde(default)]
    pub hot_paths: Vec<HotPath>,

    /// Shaped parse result (see [`shape`])
    pub result: Value,
}

/// Build a report from a parse result
///
/// **Public** - used by the parse command
///
/// # Arguments
/// * `result` - Parse result to shape
/// * `source` - Origin of the log
/// * `hot_paths` - Top frame paths, possibly empty
///
/// # Errors
/// * `OutputError::SerializationFailed` - The result could not be shaped
pub fn to_report(
    result: &ParseResult,
    source: impl Into<String>,
    hot_paths: Vec<HotPath>,
) -> Result<Report, OutputError> {
    Ok(Report {
        version: SCHEMA_VERSION.to_string(),
        source: source.into(),
        generated_at: Utc::now().to_rfc3339(),
        hot_paths,
        result: shape(result)?,
    })
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `report` - Report to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let result = parse_log(&text)?;
/// let report = to_report(&result, "apex.log", Vec::new())?;
/// write_report(&report, "report.json")?;
/// ```
pub fn write_report(report: &Report, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    info!("Report written successfully ({} bytes)", calculate_file_size(output_path));

    Ok(())
}

/// Serialize a report to a pretty JSON string
pub fn report_to_string(report: &Report) -> Result<String, OutputError> {
    serde_json::to_string_pretty(report).map_err(OutputError::SerializationFailed)
}

/// Read a report from a JSON file
///
/// **Public** - used by the validate command and tests
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<Report, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: Report = serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!("Report loaded: version {}, source {}", report.version, report.source);

    Ok(report)
}

/// Validate that output path is writable
///
/// **Private** - shared by the output writers
pub(crate) fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// **Private** - shared by the output writers
pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
            })?;
        }
    }
    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
