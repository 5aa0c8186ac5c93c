//! Parse command implementation.
//!
//! The parse command:
//! 1. Reads the log file
//! 2. Parses it into a call tree
//! 3. Builds collapsed stacks and hot paths
//! 4. Writes the JSON report (and optionally the collapsed stacks)
//! 5. Optionally prints a summary

use crate::aggregator::{
    build_collapsed_stacks, calculate_hot_paths, calculate_time_distribution, total_duration,
    CollapsedStack, HotPath,
};
use crate::output::{to_report, write_collapsed, write_report};
use crate::parser::{parse_log_with_options, ParseResult};
use crate::utils::config::ParseOptions;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments for the parse command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ParseArgs {
    /// Debug log to parse
    pub input: PathBuf,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Output path for collapsed stacks (optional)
    pub output_collapsed: Option<PathBuf>,

    /// Number of top hot paths to include in the report
    pub top_paths: usize,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Engine limits
    pub options: ParseOptions,
}

impl Default for ParseArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_json: PathBuf::from("report.json"),
            output_collapsed: None,
            top_paths: 20,
            print_summary: false,
            options: ParseOptions::default(),
        }
    }
}

/// Execute the parse command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable input file
/// * Malformed log fields or exceeded limits
/// * File write errors
pub fn execute_parse(args: ParseArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Parsing log: {}", args.input.display());

    info!("Step 1/4: Reading log file...");
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read log file {}", args.input.display()))?;

    info!("Step 2/4: Building call tree...");
    let result = parse_log_with_options(&text, &args.options).context("Failed to parse log")?;

    info!("Step 3/4: Calculating top {} hot paths...", args.top_paths);
    let stacks = build_collapsed_stacks(&result.root);
    let distribution = calculate_time_distribution(&stacks);
    info!("Time distribution: {}", distribution.summary());

    let hot_paths = calculate_hot_paths(&stacks, total_duration(&result.root), args.top_paths);
    for (i, path) in hot_paths.iter().take(3).enumerate() {
        debug!("  {}. {} ns ({:.1}%): {}", i + 1, path.self_time, path.percentage, path.stack);
    }

    info!("Step 4/4: Writing output files...");
    let report = to_report(&result, source_name(&args.input), hot_paths.clone())
        .context("Failed to shape parse result")?;
    write_report(&report, &args.output_json).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", args.output_json.display());

    if let Some(collapsed_path) = &args.output_collapsed {
        write_collapsed(&stacks, collapsed_path).context("Failed to write collapsed stacks")?;
        info!("✓ Collapsed stacks written to: {}", collapsed_path.display());
    }

    if args.print_summary {
        print_summary(&args.input, &result, &stacks, &hot_paths);
    }

    info!("Parse completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Validate parse arguments
///
/// **Public** - can be called before execute_parse for early validation
pub fn validate_args(args: &ParseArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.input.is_file() {
        anyhow::bail!("Input log not found: {}", args.input.display());
    }

    if args.top_paths == 0 {
        anyhow::bail!("top_paths must be greater than 0");
    }

    if args.top_paths > 1000 {
        anyhow::bail!("top_paths is too large (max 1000)");
    }

    if args.options.max_depth == 0 {
        anyhow::bail!("max_depth must be greater than 0");
    }

    if args.options.max_records == 0 {
        anyhow::bail!("max_records must be greater than 0");
    }

    Ok(())
}

fn source_name(input: &Path) -> String {
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}

/// **Private** - text summary for `--summary`
fn print_summary(input: &Path, result: &ParseResult, stacks: &[CollapsedStack], hot_paths: &[HotPath]) {
    println!("\n{}", "=".repeat(80));
    println!("CALL TREE SUMMARY");
    println!("{}", "=".repeat(80));
    println!("Log:           {}", input.display());
    println!("Root children: {}", result.root.children.len());
    println!("Unique stacks: {}", stacks.len());
    println!("CPU peak:      {:.3} ms", result.cpu_peak as f64 / 1_000_000.0);

    if result.truncated.is_empty() {
        println!("Truncation:    none");
    } else {
        println!("Truncation:");
        for event in &result.truncated {
            println!("  [{:?}] {} at {} ns", event.severity, event.reason, event.timestamp);
        }
    }

    if !hot_paths.is_empty() {
        println!("\nHot paths:");
        for (i, path) in hot_paths.iter().enumerate() {
            println!("{:>3}. {:>6.1}% {:>12} ns  {}", i + 1, path.percentage, path.self_time, path.stack);
        }
    }
    println!("{}", "=".repeat(80));
}
