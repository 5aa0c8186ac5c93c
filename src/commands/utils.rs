use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    if report.version != SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported report version {} (expected {})",
            report.version,
            SCHEMA_VERSION
        );
    }

    let result = &report.result;
    let truncated = result["truncated"].as_array().map_or(0, Vec::len);
    let root_children = result["root"]["children"].as_array().map_or(0, Vec::len);
    let cpu_peak = result["cpuPeak"].as_i64().unwrap_or(0);

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Source: {}", report.source);
    println!("  Generated: {}", report.generated_at);
    println!("  Root Children: {}", root_children);
    println!("  Truncation Events: {}", truncated);
    println!("  CPU Peak: {} ns", cpu_peak);
    println!("  Settings: {}", count_settings(&result["settings"]));
    println!("  Hot Paths: {}", report.hot_paths.len());

    Ok(())
}

fn count_settings(settings: &Value) -> usize {
    settings.as_array().map_or(0, Vec::len)
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Apex Log Tree Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  source: string             - Log file name");
        println!("  generatedAt: string        - RFC 3339 timestamp");
        println!("  hotPaths: array            - Heaviest frame paths by self-time");
        println!("    stack: string            - ';'-separated frame labels");
        println!("    selfTime: number         - Nanoseconds");
        println!("    percentage: number       - Share of total traced time");
        println!("  result: object             - Shaped parse result (empty members omitted)");
        println!("    root: frame              - Synthetic root ('Log Root')");
        println!("    truncated: array         - Truncation events, first occurrence per reason");
        println!("      timestamp: number");
        println!("      reason: string         - e.g. 'Unexpected-End', 'Skipped-Lines'");
        println!("      severity: string       - error | skip | unexpected");
        println!("    cpuPeak: number          - Peak 'Maximum CPU time' in nanoseconds");
        println!("    settings: array          - Debug levels: {{ category, level }}");
        println!();
        println!("  frame: kind, text, timestamp, exitTimestamp, duration, selfTime,");
        println!("         lineNumber, rowCount, group, namespace, category, children");
        println!("  children: {{ node: 'frame', ... }} | {{ node: 'block', records: [...] }}");
        println!("  every object carries a numeric 'id', assigned children first");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Apex Log Tree v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Call tree reconstruction and timing analysis for Apex debug logs.");
}
