//! Output shaping and writers.
//!
//! This module handles:
//! - Shaping parse results for transport (pruning, ids)
//! - JSON reports
//! - Collapsed stack files

pub mod collapsed;
pub mod json;
pub mod shape;

// Re-export main functions
pub use collapsed::write_collapsed;
pub use json::{read_report, report_to_string, to_report, write_report, Report};
pub use shape::{reshape, shape};
