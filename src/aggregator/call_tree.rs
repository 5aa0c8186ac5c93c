//! Call tree reconstruction.
//!
//! Walks the record stream once, forward only. A record with closing kinds
//! opens a frame and everything up to its closer becomes its children;
//! other records collect into block groups between nested frames.
//!
//! Mismatched closers are never consumed by the frame that sees them: the
//! frame is ended there and the parent re-examines the same closer. While an
//! exception or fatal error is propagating (`unwinding`), those mismatches
//! are expected and not reported.

use super::diagnostics::{Diagnostics, Severity};
use super::durations::recalculate_durations;
use super::frame::Frame;
use crate::parser::catalog::CloseHook;
use crate::parser::record::Record;
use crate::utils::config::{REASON_UNEXPECTED_END, REASON_UNEXPECTED_EXIT};
use crate::utils::error::ParseError;
use log::debug;
use std::iter::Peekable;
use std::mem;
use std::vec;

/// Per-parse tree builder
///
/// **Public** - constructed once per parse call by parse_log
pub struct CallTreeBuilder<'d> {
    records: Peekable<vec::IntoIter<Record>>,
    diagnostics: &'d mut Diagnostics,

    /// An exception is propagating through open frames
    unwinding: bool,

    /// Timestamp of the last consumed record
    last_seen: i64,

    depth: usize,
    max_depth: usize,
}

impl<'d> CallTreeBuilder<'d> {
    pub fn new(records: Vec<Record>, diagnostics: &'d mut Diagnostics, max_depth: usize) -> Self {
        Self {
            records: records.into_iter().peekable(),
            diagnostics,
            unwinding: false,
            last_seen: 0,
            depth: 0,
            max_depth,
        }
    }

    /// Build the whole tree under a synthetic root
    ///
    /// **Public** - consumes the builder
    ///
    /// # Returns
    /// The root frame. It has no exit or duration; it simply runs until the
    /// records are exhausted. Closers that match nothing land in its blocks.
    ///
    /// # Errors
    /// * `ParseError::ResourceLimit` - Nesting deeper than `max_depth`
    pub fn build(mut self) -> Result<Frame, ParseError> {
        let mut root = Frame::new(Record::root());
        let mut leaves = Vec::new();

        while let Some(record) = self.records.next() {
            self.last_seen = record.timestamp;
            if record.opens_frame() {
                root.push_block(mem::take(&mut leaves));
                let frame = self.build_frame(record)?;
                root.push_frame(frame);
            } else {
                leaves.push(record);
            }
        }
        root.push_block(leaves);

        debug!("Call tree built with {} root children", root.children.len());
        Ok(root)
    }

    /// Collect the children of `opener` and resolve its exit
    ///
    /// **Private** - recursive step of build
    fn build_frame(&mut self, opener: Record) -> Result<Frame, ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::ResourceLimit {
                limit: "max_depth",
                value: self.max_depth,
            });
        }

        self.last_seen = opener.timestamp;
        let mut frame = Frame::new(opener);
        let mut leaves = Vec::new();
        let mut reached_closer = false;

        while let Some(next) = self.records.peek() {
            if next.marks_discontinuity() {
                self.unwinding = true;
            }
            if next.is_closing_record() {
                reached_closer = true;
                break;
            }

            let Some(record) = self.records.next() else {
                break;
            };
            self.last_seen = record.timestamp;

            if record.opens_frame() {
                frame.push_block(mem::take(&mut leaves));
                let child = self.build_frame(record)?;
                frame.push_frame(child);
            } else {
                leaves.push(record);
            }
        }

        if !reached_closer {
            frame.record.exit_timestamp = Some(self.last_seen);
            frame.record.duration = Some(self.last_seen.saturating_sub(frame.record.timestamp));
            self.diagnostics
                .truncate(self.last_seen, REASON_UNEXPECTED_END, Severity::Unexpected);
        }

        frame.push_block(leaves);

        if reached_closer {
            self.end_frame(&mut frame);
        }

        recalculate_durations(&mut frame);
        self.depth -= 1;
        Ok(frame)
    }

    /// Resolve the pending closer against `frame`
    ///
    /// **Private** - consumes the closer only when it genuinely matches
    fn end_frame(&mut self, frame: &mut Frame) {
        let Some(end) = self.records.peek() else {
            return;
        };

        frame.record.exit_timestamp = Some(end.timestamp);
        match frame.record.traits.on_close {
            Some(CloseHook::RowCount) => frame.record.row_count = end.row_count,
            Some(CloseHook::AppendFirstChildText) => {
                if let Some(text) = frame.first_child_text().map(str::to_string) {
                    frame.record.text.push_str(" - ");
                    frame.record.text.push_str(&text);
                }
            }
            None => {}
        }

        if frame.record.is_closed_by(end) {
            self.unwinding = false;
            self.records.next();
        } else if !self.unwinding {
            let timestamp = end.timestamp;
            self.diagnostics
                .truncate(timestamp, REASON_UNEXPECTED_EXIT, Severity::Unexpected);
        }
    }
}
