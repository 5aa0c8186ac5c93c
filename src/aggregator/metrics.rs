//! Calculate hot paths and time distribution from collapsed stacks.
//!
//! Hot paths are the frame paths that spend the most self-time.
//! These are the primary targets for optimization.

use super::frame::Frame;
use super::stack_builder::CollapsedStack;
use log::debug;
use serde::{Deserialize, Serialize};

/// One of the heaviest frame paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotPath {
    /// `;`-separated frame labels
    pub stack: String,

    /// Self-time in nanoseconds
    pub self_time: u64,

    /// Share of the total traced time
    pub percentage: f64,
}

/// Total traced time: the sum of top-level frame durations
///
/// **Public** - denominator for calculate_hot_paths
pub fn total_duration(root: &Frame) -> u64 {
    root.frames()
        .filter_map(|frame| frame.record.duration)
        .filter_map(|duration| u64::try_from(duration).ok())
        .fold(0, u64::saturating_add)
}

/// Calculate hot paths from collapsed stacks
///
/// **Public** - main entry point for metrics calculation
///
/// # Arguments
/// * `stacks` - Collapsed stacks from stack_builder
/// * `total` - Total traced time (see [`total_duration`])
/// * `top_n` - Number of top paths to return (e.g., 10)
///
/// # Returns
/// Vector of hot paths, sorted by self-time (descending)
pub fn calculate_hot_paths(stacks: &[CollapsedStack], total: u64, top_n: usize) -> Vec<HotPath> {
    debug!("Calculating top {} hot paths from {} stacks", top_n, stacks.len());

    // Stacks are already sorted by weight from stack_builder
    stacks
        .iter()
        .take(top_n)
        .map(|stack| create_hot_path(stack, total))
        .collect()
}

/// **Private** - internal conversion
fn create_hot_path(stack: &CollapsedStack, total: u64) -> HotPath {
    HotPath {
        stack: stack.stack.clone(),
        self_time: stack.weight,
        percentage: percentage_of(stack.weight, total),
    }
}

fn percentage_of(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Calculate self-time distribution statistics
///
/// **Public** - provides summary statistics
pub fn calculate_time_distribution(stacks: &[CollapsedStack]) -> TimeDistribution {
    if stacks.is_empty() {
        return TimeDistribution::default();
    }

    let total: u64 = stacks.iter().map(|s| s.weight).fold(0, u64::saturating_add);
    let count = stacks.len();
    let mean = total / count as u64;

    let mut weights: Vec<u64> = stacks.iter().map(|s| s.weight).collect();
    weights.sort_unstable();
    let median = weights[weights.len() / 2];

    // Top 10% of stacks
    let top_10_percent_count = (count as f64 * 0.1).ceil() as usize;
    let top_10_percent_time: u64 = stacks
        .iter()
        .take(top_10_percent_count)
        .map(|s| s.weight)
        .fold(0, u64::saturating_add);

    TimeDistribution {
        total_time: total,
        stack_count: count,
        mean_time_per_stack: mean,
        median_time_per_stack: median,
        top_10_percent_time,
        top_10_percent_percentage: percentage_of(top_10_percent_time, total),
    }
}

/// Self-time distribution statistics, in nanoseconds
///
/// **Public** - returned from calculate_time_distribution
#[derive(Debug, Clone, Default)]
pub struct TimeDistribution {
    pub total_time: u64,
    pub stack_count: usize,
    pub mean_time_per_stack: u64,
    pub median_time_per_stack: u64,

    /// Time spent in the heaviest 10% of stacks
    pub top_10_percent_time: u64,
    pub top_10_percent_percentage: f64,
}

impl TimeDistribution {
    /// True if the top 10% of stacks spend more than 80% of the time
    pub fn is_highly_concentrated(&self) -> bool {
        self.top_10_percent_percentage > 80.0
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and the summary printout
    pub fn summary(&self) -> String {
        format!(
            "Total: {} ns | Stacks: {} | Mean: {} | Median: {} | Top 10%: {:.1}%",
            self.total_time,
            self.stack_count,
            self.mean_time_per_stack,
            self.median_time_per_stack,
            self.top_10_percent_percentage
        )
    }
}
