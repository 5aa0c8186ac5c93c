//! Parse entry points.
//!
//! Every call builds its own [`Diagnostics`] and tree builder; nothing is
//! shared between calls, so independent logs can be parsed concurrently.

use super::settings::{parse_settings, LogSetting};
use super::stream::assemble_records;
use crate::aggregator::call_tree::CallTreeBuilder;
use crate::aggregator::diagnostics::{Diagnostics, TruncationEvent};
use crate::aggregator::frame::Frame;
use crate::utils::config::ParseOptions;
use crate::utils::error::ParseError;
use log::{debug, info};
use serde::Serialize;

/// Outcome of one parse call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    /// Synthetic unbounded root frame
    pub root: Frame,

    /// Deduplicated by reason, in the order raised: events from line
    /// classification first, then events from tree building
    pub truncated: Vec<TruncationEvent>,

    /// Highest `Maximum CPU time` seen, in nanoseconds
    pub cpu_peak: i64,

    pub settings: Vec<LogSetting>,
}

/// Parse a complete log with default limits
///
/// **Public** - main library entry point
///
/// # Errors
/// See [`parse_log_with_options`]
pub fn parse_log(log: &str) -> Result<ParseResult, ParseError> {
    parse_log_with_options(log, &ParseOptions::default())
}

/// Parse a complete log
///
/// **Public** - entry point with explicit limits
///
/// # Arguments
/// * `log` - Complete raw log text, preamble included
/// * `options` - Depth and record count bounds
///
/// # Returns
/// Best-effort call tree plus diagnostics. Truncated or inconsistent logs
/// still succeed.
///
/// # Errors
/// * `ParseError::MalformedField` - A required field could not be parsed
/// * `ParseError::ResourceLimit` - The log exceeds `options`
pub fn parse_log_with_options(log: &str, options: &ParseOptions) -> Result<ParseResult, ParseError> {
    let mut diagnostics = Diagnostics::new();

    let settings = parse_settings(log);
    let records = assemble_records(log, &mut diagnostics, options)?;
    let record_count = records.len();

    let root = CallTreeBuilder::new(records, &mut diagnostics, options.max_depth).build()?;
    let (truncated, cpu_peak) = diagnostics.into_parts();

    info!(
        "Parsed {} records into {} top-level children ({} truncation events)",
        record_count,
        root.children.len(),
        truncated.len()
    );
    debug!("CPU peak: {} ns, settings: {}", cpu_peak, settings.len());

    Ok(ParseResult {
        root,
        truncated,
        cpu_peak,
        settings,
    })
}
