//! Apex Log Tree
//!
//! Call tree reconstruction and timing analysis for Apex debug logs.
//!
//! A debug log is a flat, chronological list of pipe-delimited records.
//! This crate classifies each line, rebuilds the nested call tree (frames,
//! block groups, duration and self-time), and collects truncation
//! diagnostics for logs that were cut short, skipped lines or unwound
//! through exceptions.
//!
//! ## Getting Started
//!
//! ```ignore
//! let text = std::fs::read_to_string("apex.log")?;
//! let result = apex_log_tree::parse_log(&text)?;
//! let shaped = apex_log_tree::output::shape(&result)?;
//! ```
//!
//! The `apex-log-tree` binary wraps this in a CLI:
//!
//! ```bash
//! apex-log-tree parse --input apex.log --output report.json --summary
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;

pub use parser::{parse_log, parse_log_with_options, ParseResult};
pub use utils::{OutputError, ParseError, ParseOptions};
