//! Record stream assembly.
//!
//! Turns raw log text into the ordered record sequence the call tree builder
//! consumes. Preamble lines before the start marker are dropped, blank lines
//! are skipped, and every other line goes through the classifier with the
//! previous record threaded in for continuation folding.

use super::classifier::classify_line;
use super::record::Record;
use crate::aggregator::diagnostics::Diagnostics;
use crate::utils::config::{ParseOptions, START_MARKER};
use crate::utils::error::ParseError;
use log::debug;

/// Slice of the log that holds the actual trace
///
/// Starts at the beginning of the first line containing the start marker.
/// Without a marker the whole text is the trace.
pub fn trace_body(log: &str) -> &str {
    match log.find(START_MARKER) {
        Some(at) => {
            let line_start = log[..at].rfind('\n').map_or(0, |newline| newline + 1);
            &log[line_start..]
        }
        None => log,
    }
}

/// Classify every trace line in order
///
/// **Public** - first stage of parse_log
///
/// # Arguments
/// * `log` - Complete raw log text
/// * `diagnostics` - Receives skip markers and classification alerts
/// * `options` - Bounds for this parse call
///
/// # Returns
/// Records in chronological (input) order
///
/// # Errors
/// * `ParseError::MalformedField` - From the classifier
/// * `ParseError::ResourceLimit` - More than `options.max_records` records
pub fn assemble_records(
    log: &str,
    diagnostics: &mut Diagnostics,
    options: &ParseOptions,
) -> Result<Vec<Record>, ParseError> {
    let body = trace_body(log);
    if is_marker_only(body) {
        debug!("Trace holds only the start marker");
        return Ok(Vec::new());
    }

    let mut records: Vec<Record> = Vec::new();

    for (line_index, line) in body.lines().enumerate() {
        if line.is_empty() {
            continue;
        }

        let Some(record) = classify_line(line, line_index, records.last_mut(), diagnostics)? else {
            continue;
        };

        if records.len() >= options.max_records {
            return Err(ParseError::ResourceLimit {
                limit: "max_records",
                value: options.max_records,
            });
        }
        records.push(record);
    }

    debug!("Assembled {} records", records.len());
    Ok(records)
}

/// True when the start marker line is the only non-blank line of the trace
fn is_marker_only(body: &str) -> bool {
    let mut lines = body.lines().filter(|line| !line.trim().is_empty());
    matches!(lines.next(), Some(first) if first.contains(START_MARKER)) && lines.next().is_none()
}
