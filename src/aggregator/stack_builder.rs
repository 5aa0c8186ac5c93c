//! Build collapsed stack format from the call tree.
//!
//! Collapsed stacks are the input format for flame graph tools.
//! Format: "parent;child;grandchild weight"
//!
//! Example: "Foo.run();SOQL: SELECT Id FROM Account 1200000"
//! This means: Foo.run() issued the query, which spent 1.2 ms in itself.

use super::frame::Frame;
use log::debug;
use std::collections::HashMap;

/// A single collapsed stack entry
///
/// **Public** - used by metrics and the collapsed output writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedStack {
    /// Frame labels from outermost to innermost, `;`-separated
    pub stack: String,

    /// Self-time in nanoseconds summed over every frame with this path
    pub weight: u64,
}

impl CollapsedStack {
    /// Create a new collapsed stack
    ///
    /// **Public** - constructor
    pub fn new(stack: String, weight: u64) -> Self {
        Self { stack, weight }
    }

    /// Render as a `stack weight` line
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Build collapsed stacks from a call tree
///
/// **Public** - main entry point for stack building
///
/// # Arguments
/// * `root` - Root frame returned by the parser; it is not part of any path
///
/// # Returns
/// One collapsed stack per unique frame path, heaviest first, ties broken
/// by path
///
/// # Algorithm
/// 1. Walk frames depth-first, tracking the label path
/// 2. Weight each frame by its self-time (negative counts as zero)
/// 3. Aggregate by unique path (sum weights)
pub fn build_collapsed_stacks(root: &Frame) -> Vec<CollapsedStack> {
    let mut stack_map: HashMap<String, u64> = HashMap::new();
    let mut path: Vec<String> = Vec::new();

    for frame in root.frames() {
        collect_frame(frame, &mut path, &mut stack_map);
    }

    let mut stacks: Vec<CollapsedStack> = stack_map
        .into_iter()
        .map(|(stack, weight)| CollapsedStack::new(stack, weight))
        .collect();

    stacks.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.stack.cmp(&b.stack)));

    debug!("Built {} unique collapsed stacks", stacks.len());

    stacks
}

/// **Private** - recursive walk for build_collapsed_stacks
fn collect_frame(frame: &Frame, path: &mut Vec<String>, stack_map: &mut HashMap<String, u64>) {
    path.push(frame.record.label().replace(';', ":"));

    let self_time = frame.record.self_time.unwrap_or(0);
    let weight = u64::try_from(self_time).unwrap_or(0);
    *stack_map.entry(path.join(";")).or_insert(0) += weight;

    for child in frame.frames() {
        collect_frame(child, path, stack_map);
    }

    path.pop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_log;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapsed_stack_to_line() {
        let stack = CollapsedStack::new("Foo.run();Bar.go()".to_string(), 1000);
        assert_eq!(stack.to_line(), "Foo.run();Bar.go() 1000");
    }

    #[test]
    fn test_build_from_tree() {
        let log = "\
1 (0)|METHOD_ENTRY|[1]|a|Outer.run()
1 (10)|METHOD_ENTRY|[2]|b|Inner.go()
1 (40)|METHOD_EXIT|[2]
1 (50)|METHOD_ENTRY|[3]|b|Inner.go()
1 (60)|METHOD_EXIT|[3]
1 (100)|METHOD_EXIT|[1]
";
        let result = parse_log(log).unwrap();
        let stacks = build_collapsed_stacks(&result.root);

        assert_eq!(
            stacks,
            vec![
                CollapsedStack::new("Outer.run()".to_string(), 60),
                CollapsedStack::new("Outer.run();Inner.go()".to_string(), 40),
            ]
        );
    }

    #[test]
    fn test_semicolons_in_labels_are_escaped() {
        let log = "1 (0)|METHOD_ENTRY|[1]|a|Foo.x(a;b)\n1 (5)|METHOD_EXIT|[1]\n";
        let result = parse_log(log).unwrap();
        let stacks = build_collapsed_stacks(&result.root);

        assert_eq!(stacks[0].stack, "Foo.x(a:b)");
    }
}
