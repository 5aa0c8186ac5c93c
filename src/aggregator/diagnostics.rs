//! Truncation events and resource peaks collected during one parse.
//!
//! A [`Diagnostics`] value is created per parse call and threaded through
//! classification and tree building, so concurrent parses never share it.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Severity class of a truncation event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Exceptions, fatal errors, governor limits
    Error,
    /// The runtime dropped part of the log
    Skip,
    /// Structure could not be matched up
    Unexpected,
}

/// A point where the log could not be resolved cleanly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncationEvent {
    pub timestamp: i64,
    pub reason: String,
    pub severity: Severity,
}

/// Per-parse diagnostics accumulator
#[derive(Debug, Default)]
pub struct Diagnostics {
    events: Vec<TruncationEvent>,
    reasons: HashSet<String>,
    cpu_peak: i64,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a truncation event unless one with the same reason exists
    ///
    /// Returns `true` when the event was kept.
    pub fn truncate(&mut self, timestamp: i64, reason: impl Into<String>, severity: Severity) -> bool {
        let reason = reason.into();
        if self.reasons.contains(&reason) {
            return false;
        }

        debug!("Truncation at {}: {} ({:?})", timestamp, reason, severity);
        self.reasons.insert(reason.clone());
        self.events.push(TruncationEvent {
            timestamp,
            reason,
            severity,
        });
        true
    }

    /// Raise the running CPU peak (nanoseconds)
    pub fn record_cpu_time(&mut self, nanos: i64) {
        self.cpu_peak = self.cpu_peak.max(nanos);
    }

    pub fn events(&self) -> &[TruncationEvent] {
        &self.events
    }

    pub fn cpu_peak(&self) -> i64 {
        self.cpu_peak
    }

    /// Events in first-occurrence order, and the CPU peak
    pub fn into_parts(self) -> (Vec<TruncationEvent>, i64) {
        (self.events, self.cpu_peak)
    }
}
