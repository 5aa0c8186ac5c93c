//! Log parsing: from raw text to a call tree.
//!
//! This module handles:
//! - Classifying physical lines into typed records (catalog + classifier)
//! - Assembling the ordered record stream
//! - Extracting the debug level header
//! - The `parse_log` entry points

pub mod catalog;
pub mod classifier;
pub mod log_parser;
pub mod record;
pub mod settings;
pub mod stream;

// Re-export main types
pub use log_parser::{parse_log, parse_log_with_options, ParseResult};
pub use record::{Category, LineNumber, Record};
pub use settings::{parse_settings, LogSetting};
