//! Classified trace records.
//!
//! A [`Record`] is one recognized log line. Its behaviour in the call tree
//! (whether it opens a frame, closes one, swallows continuation text or
//! starts stack unwinding) comes from the catalog entry it was built from;
//! the per-line values (timestamp, text, line number, ...) live on the
//! record itself.

use super::catalog::{RecordKind, ROOT_KIND};
use crate::utils::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source line number reported by a record.
///
/// Most records carry `[42]`, but the runtime also writes symbolic
/// positions such as `[EXTERNAL]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineNumber {
    Line(i64),
    Symbol(String),
}

impl LineNumber {
    /// Parse a bracketed line number field
    ///
    /// Returns `None` when there is nothing between the brackets.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        chars.next();
        chars.next_back();
        let inner = chars.as_str();

        if inner.is_empty() {
            return None;
        }

        Some(match inner.trim().parse::<i64>() {
            Ok(line) => LineNumber::Line(line),
            Err(_) => LineNumber::Symbol(inner.to_string()),
        })
    }

    /// Line 0 means "no line" for closer matching
    pub fn is_set(&self) -> bool {
        !matches!(self, LineNumber::Line(0))
    }
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineNumber::Line(line) => write!(f, "{}", line),
            LineNumber::Symbol(symbol) => f.write_str(symbol),
        }
    }
}

/// How the runtime bills time spent inside a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Method,
    Free,
    Custom,
    System,
    Pkg,
    Loading,
}

/// One classified trace line
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Type tag, e.g. `METHOD_ENTRY`
    pub kind: &'static str,

    /// Nanoseconds since the start of the transaction
    pub timestamp: i64,

    pub exit_timestamp: Option<i64>,
    pub duration: Option<i64>,
    pub self_time: Option<i64>,

    /// Display payload; continuation lines are appended to it
    pub text: String,

    pub line_number: Option<LineNumber>,
    pub row_count: Option<i64>,
    pub value: Option<String>,
    pub group: Option<String>,
    pub namespace: Option<String>,
    pub category: Option<Category>,

    /// Physical line index, relative to the start of the trace
    pub line_index: usize,

    #[serde(skip)]
    pub(crate) traits: &'static RecordKind,
}

impl Record {
    pub(crate) fn new(traits: &'static RecordKind, timestamp: i64, line_index: usize) -> Self {
        Self {
            kind: traits.name,
            timestamp,
            exit_timestamp: None,
            duration: None,
            self_time: None,
            text: String::new(),
            line_number: None,
            row_count: None,
            value: None,
            group: None,
            namespace: None,
            category: None,
            line_index,
            traits,
        }
    }

    /// The synthetic, unbounded record at the top of every call tree
    pub fn root() -> Self {
        let mut root = Self::new(&ROOT_KIND, 0, 0);
        root.text = "Log Root".to_string();
        root
    }

    /// Kinds that may legally close this record; empty for leaves
    pub fn closing_kinds(&self) -> &'static [&'static str] {
        self.traits.closing_kinds
    }

    pub fn opens_frame(&self) -> bool {
        !self.traits.closing_kinds.is_empty()
    }

    pub fn is_closing_record(&self) -> bool {
        self.traits.is_exit
    }

    pub fn accepts_trailing_text(&self) -> bool {
        self.traits.accepts_text
    }

    pub fn marks_discontinuity(&self) -> bool {
        self.traits.discontinuity
    }

    /// Line number a closer must report to close this record
    pub fn expected_line_number(&self) -> Option<&LineNumber> {
        if !self.opens_frame() {
            return None;
        }
        self.line_number.as_ref().filter(|line| line.is_set())
    }

    /// Whether `end` is a genuine closer for this record.
    ///
    /// Same kind but a different line number does not match: the closer
    /// belongs to another (usually nested, recursive) call.
    pub fn is_closed_by(&self, end: &Record) -> bool {
        if !self.closing_kinds().contains(&end.kind) {
            return false;
        }
        match self.expected_line_number() {
            None => true,
            Some(expected) => end.line_number.as_ref() == Some(expected),
        }
    }

    /// Fold an unclassifiable continuation line into this record
    pub fn append_text(&mut self, line: &str) {
        self.text.push_str(" | ");
        self.text.push_str(line);
    }

    /// Display label: text when present, otherwise the kind
    pub fn label(&self) -> &str {
        if self.text.is_empty() {
            self.kind
        } else {
            &self.text
        }
    }
}

/// Delimited fields of one physical line
///
/// Field 0 is the timestamp, field 1 the type tag, the rest depend on the
/// kind. Missing fields read as empty strings.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    parts: Vec<&'a str>,
    line_index: usize,
}

impl<'a> Fields<'a> {
    pub fn split(line: &'a str, delimiter: char, line_index: usize) -> Self {
        Self {
            parts: line.split(delimiter).collect(),
            line_index,
        }
    }

    /// Type tag, if the line has a second field at all
    pub fn kind(&self) -> Option<&'a str> {
        self.parts.get(1).copied()
    }

    pub fn get(&self, index: usize) -> &'a str {
        self.parts.get(index).copied().unwrap_or("")
    }

    /// Field value when present and non-empty
    pub fn non_empty(&self, index: usize) -> Option<&'a str> {
        self.parts.get(index).copied().filter(|field| !field.is_empty())
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn line_index(&self) -> usize {
        self.line_index
    }

    /// Parse `HH:MM:SS.s (nanos)` into nanoseconds
    pub fn timestamp(&self) -> Result<i64, ParseError> {
        let raw = self.get(0);
        raw.find('(')
            .and_then(|open| raw[open + 1..].strip_suffix(')'))
            .and_then(|nanos| nanos.trim().parse::<i64>().ok())
            .ok_or_else(|| ParseError::malformed(self.line_index, "timestamp", raw))
    }

    pub fn line_number(&self, index: usize) -> Result<LineNumber, ParseError> {
        let raw = self.get(index);
        LineNumber::parse(raw).ok_or_else(|| ParseError::malformed(self.line_index, "line number", raw))
    }

    /// Parse a `Rows:N` field
    pub fn rows(&self, index: usize) -> Result<i64, ParseError> {
        let raw = self.get(index);
        raw.find("Rows:")
            .and_then(|at| raw[at + 5..].trim().parse::<i64>().ok())
            .ok_or_else(|| ParseError::malformed(self.line_index, "row count", raw))
    }

    /// Render a text template.
    ///
    /// `{N}` is field N, `{kind}` the type tag and `{line}` the parsed line
    /// number. Anything else is copied through.
    pub fn render(&self, template: &str, kind: &str, line: Option<&LineNumber>) -> String {
        let mut out = String::with_capacity(template.len() + 32);
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                return out;
            };

            let token = &after[..close];
            match token {
                "kind" => out.push_str(kind),
                "line" => {
                    if let Some(line) = line {
                        out.push_str(&line.to_string());
                    }
                }
                _ => match token.parse::<usize>() {
                    Ok(index) => out.push_str(self.get(index)),
                    Err(_) => {
                        out.push('{');
                        out.push_str(token);
                        out.push('}');
                    }
                },
            }
            rest = &after[close + 1..];
        }

        out.push_str(rest);
        out
    }
}
