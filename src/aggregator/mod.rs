//! Call tree reconstruction and aggregation.
//!
//! This module transforms the classified record stream into:
//! - The call tree (frames, block groups, durations, self-time)
//! - Deduplicated truncation diagnostics and the CPU peak
//! - Collapsed stacks, hot paths and time distribution statistics

pub mod call_tree;
pub mod diagnostics;
pub mod durations;
pub mod frame;
pub mod metrics;
pub mod stack_builder;

// Re-export main types and functions
pub use call_tree::CallTreeBuilder;
pub use diagnostics::{Diagnostics, Severity, TruncationEvent};
pub use frame::{BlockGroup, Child, Frame};
pub use metrics::{
    calculate_hot_paths, calculate_time_distribution, total_duration, HotPath, TimeDistribution,
};
pub use stack_builder::{build_collapsed_stacks, CollapsedStack};
