//! Configuration and constants for log parsing.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Record kind that marks the start of the actual trace.
/// Everything before the first line containing it is preamble.
pub const START_MARKER: &str = "EXECUTION_STARTED";

/// Field delimiter inside a trace line
pub const FIELD_DELIMITER: char = '|';

// Raw-text markers the runtime writes when it drops part of the log
pub const SKIPPED_LINES_MARKER: &str = "*** Skipped";
pub const MAX_SIZE_MARKER: &str = "MAXIMUM DEBUG LOG SIZE REACHED";

/// Prefix of the CPU usage figure inside LIMIT_USAGE_FOR_NS text
pub const CPU_TIME_PREFIX: &str = "Maximum CPU time: ";

/// CPU limits are reported in milliseconds, timestamps are nanoseconds
pub const NANOS_PER_MILLI: i64 = 1_000_000;

/// Kind used by fixtures; never warned about
pub const SILENT_KIND: &str = "DUMMY";

// Truncation reasons raised by the engine itself
pub const REASON_UNEXPECTED_END: &str = "Unexpected-End";
pub const REASON_UNEXPECTED_EXIT: &str = "Unexpected-Exit";
pub const REASON_SKIPPED_LINES: &str = "Skipped-Lines";
pub const REASON_MAX_SIZE: &str = "Max-Size-reached";

pub const DEFAULT_MAX_DEPTH: usize = 1000;
pub const DEFAULT_MAX_RECORDS: usize = 5_000_000;

/// Bounds applied to a single parse call.
///
/// A pathological log (very deep nesting or an enormous record count) fails
/// with [`ParseError::ResourceLimit`](super::error::ParseError::ResourceLimit)
/// instead of exhausting the host stack or memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of simultaneously open frames
    pub max_depth: usize,

    /// Maximum number of classified records
    pub max_records: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }
}
