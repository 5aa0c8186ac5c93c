//! Call tree node types.

use crate::parser::record::Record;
use serde::Serialize;

/// A record that opened a frame, plus everything nested under it
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    #[serde(flatten)]
    pub record: Record,

    /// Blocks and nested frames, in chronological order
    pub children: Vec<Child>,
}

/// One entry of a frame's child list
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum Child {
    Block(BlockGroup),
    Frame(Frame),
}

/// Run of consecutive sibling leaves with no frame among them
#[derive(Debug, Clone, Serialize)]
pub struct BlockGroup {
    pub records: Vec<Record>,
}

impl Frame {
    pub fn new(record: Record) -> Self {
        Self {
            record,
            children: Vec::new(),
        }
    }

    /// Append a run of leaves; empty runs are dropped
    pub fn push_block(&mut self, records: Vec<Record>) {
        if !records.is_empty() {
            self.children.push(Child::Block(BlockGroup { records }));
        }
    }

    pub fn push_frame(&mut self, frame: Frame) {
        self.children.push(Child::Frame(frame));
    }

    /// Text of the first child, looking inside a leading block
    pub fn first_child_text(&self) -> Option<&str> {
        match self.children.first()? {
            Child::Block(block) => block.records.first().map(|record| record.text.as_str()),
            Child::Frame(frame) => Some(frame.record.text.as_str()),
        }
    }

    /// Nested frames only, skipping blocks
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.children.iter().filter_map(|child| match child {
            Child::Frame(frame) => Some(frame),
            Child::Block(_) => None,
        })
    }
}

impl Child {
    /// Duration this child accounts for inside its parent
    ///
    /// Block groups carry none.
    pub fn duration(&self) -> Option<i64> {
        match self {
            Child::Frame(frame) => frame.record.duration,
            Child::Block(_) => None,
        }
    }
}
