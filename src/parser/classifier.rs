//! Line classification: one physical line to one typed record.
//!
//! Lines whose type tag is not in the catalog are either folded into the
//! previous record (continuation text), turned into truncation events
//! (raw "lines skipped" / "max size" markers), or dropped with a warning.

use super::catalog::{self, Alert, GroupRule, NextHook, RecordKind, TextRule};
use super::record::{Fields, Record};
use crate::aggregator::diagnostics::{Diagnostics, Severity};
use crate::utils::config::{
    CPU_TIME_PREFIX, FIELD_DELIMITER, MAX_SIZE_MARKER, NANOS_PER_MILLI, REASON_MAX_SIZE,
    REASON_SKIPPED_LINES, SILENT_KIND, SKIPPED_LINES_MARKER,
};
use crate::utils::error::ParseError;
use log::warn;
use regex::Regex;
use std::sync::OnceLock;

/// Classify one non-blank line
///
/// **Public** - used by the stream assembler
///
/// # Arguments
/// * `line` - Physical line, without its terminator
/// * `line_index` - Index of the line relative to the trace start
/// * `previous` - Last record produced so far, if any
/// * `diagnostics` - Per-parse accumulator
///
/// # Returns
/// The new record, or `None` when the line was folded, turned into a
/// diagnostic, or dropped.
///
/// # Errors
/// * `ParseError::MalformedField` - A required field of a recognized kind
///   could not be parsed
pub fn classify_line(
    line: &str,
    line_index: usize,
    previous: Option<&mut Record>,
    diagnostics: &mut Diagnostics,
) -> Result<Option<Record>, ParseError> {
    let fields = Fields::split(line, FIELD_DELIMITER, line_index);
    let kind_name = fields.kind();

    if let Some(kind) = kind_name.and_then(catalog::lookup) {
        let record = build_record(kind, &fields, diagnostics)?;
        if let Some(previous) = previous {
            run_next_hook(previous, &record, diagnostics);
        }
        return Ok(Some(record));
    }

    let looks_like_kind = kind_name.is_some_and(is_type_tag);

    match (previous, kind_name) {
        (Some(previous), _) if !looks_like_kind && previous.accepts_trailing_text() => {
            previous.append_text(line);
        }
        (_, Some(kind)) if !kind.is_empty() => {
            if kind != SILENT_KIND {
                warn!("Unknown log line: {}", kind);
            }
        }
        (Some(previous), _) if line.starts_with(SKIPPED_LINES_MARKER) => {
            diagnostics.truncate(previous.timestamp, REASON_SKIPPED_LINES, Severity::Skip);
        }
        (Some(previous), _) if line.contains(MAX_SIZE_MARKER) => {
            diagnostics.truncate(previous.timestamp, REASON_MAX_SIZE, Severity::Skip);
        }
        _ => warn!("Bad log line: {}", line),
    }

    Ok(None)
}

/// Strict type tag shape: uppercase letters and underscores only
pub fn is_type_tag(candidate: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Z_]*$").expect("type tag pattern is valid"))
        .is_match(candidate)
}

/// Build a record from its catalog entry
///
/// **Private** - internal helper for classify_line
fn build_record(
    kind: &'static RecordKind,
    fields: &Fields<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<Record, ParseError> {
    let timestamp = fields.timestamp()?;
    let mut record = Record::new(kind, timestamp, fields.line_index());

    if let Some(index) = kind.line_field {
        record.line_number = Some(fields.line_number(index)?);
    }
    if let Some(index) = kind.rows_field {
        record.row_count = Some(fields.rows(index)?);
    }
    if let Some(index) = kind.value_field {
        record.value = fields.non_empty(index).map(str::to_string);
    }

    record.text = match kind.text {
        TextRule::None => String::new(),
        TextRule::Kind => kind.name.to_string(),
        TextRule::Template(template) => {
            fields.render(template, kind.name, record.line_number.as_ref())
        }
        TextRule::Custom(render) => render(fields),
    };

    record.group = match kind.group {
        GroupRule::None => None,
        GroupRule::Kind => Some(kind.name.to_string()),
        GroupRule::Fixed(group) => Some(group.to_string()),
    };
    record.namespace = kind.namespace.map(str::to_string);
    record.category = kind.category;

    if let Some(extract) = kind.extract {
        extract(fields, &mut record)?;
    }

    match kind.alert {
        Some(Alert::LimitException) if record.text.contains("System.LimitException") => {
            diagnostics.truncate(record.timestamp, record.text.clone(), Severity::Error);
        }
        Some(Alert::FatalError) => {
            let reason = format!("FATAL ERROR! cause={}", fields.get(2));
            diagnostics.truncate(record.timestamp, reason, Severity::Error);
        }
        _ => {}
    }

    Ok(record)
}

/// Let the previous record look at the one that follows it
///
/// **Private** - internal helper for classify_line
fn run_next_hook(previous: &mut Record, next: &Record, diagnostics: &mut Diagnostics) {
    match previous.traits.on_next {
        Some(NextHook::PeakCpu) => {
            diagnostics.record_cpu_time(cpu_time_from_text(&previous.text));
        }
        Some(NextHook::CloseAtNext) => {
            let duration = next.timestamp.saturating_sub(previous.timestamp);
            previous.exit_timestamp = Some(next.timestamp);
            previous.duration = Some(duration);
            previous.self_time = Some(duration);
        }
        None => {}
    }
}

/// Extract `Maximum CPU time: N` (milliseconds) as nanoseconds; 0 if absent
pub fn cpu_time_from_text(text: &str) -> i64 {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        let source = format!("{}([0-9]+)", regex::escape(CPU_TIME_PREFIX));
        Regex::new(&source).expect("cpu time pattern is valid")
    });

    pattern
        .captures(text)
        .and_then(|captures| captures[1].parse::<i64>().ok())
        .map_or(0, |millis| millis.saturating_mul(NANOS_PER_MILLI))
}
