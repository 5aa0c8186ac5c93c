//! Apex Log Tree CLI
//!
//! Rebuilds the call tree of an Apex debug log and reports timing,
//! truncation diagnostics and hot paths.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use apex_log_tree::commands::{
    display_schema, display_version, execute_parse, validate_args, validate_report_file, ParseArgs,
};
use apex_log_tree::utils::config::{ParseOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_RECORDS};

/// Apex Log Tree - call tree reconstruction for Apex debug logs
#[derive(Parser, Debug)]
#[command(name = "apex-log-tree")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a debug log into a call tree report
    Parse {
        /// Debug log file
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Output path for collapsed stacks (optional)
        #[arg(short, long)]
        collapsed: Option<PathBuf>,

        /// Number of top hot paths to include
        #[arg(long, default_value = "20")]
        top_paths: usize,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Maximum frame nesting depth
        #[arg(long, env = "APEX_LOG_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Maximum number of records
        #[arg(long, env = "APEX_LOG_MAX_RECORDS", default_value_t = DEFAULT_MAX_RECORDS)]
        max_records: usize,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Parse {
            input,
            output,
            collapsed,
            top_paths,
            summary,
            max_depth,
            max_records,
        } => {
            let args = ParseArgs {
                input,
                output_json: output,
                output_collapsed: collapsed,
                top_paths,
                print_summary: summary,
                options: ParseOptions::new()
                    .with_max_depth(max_depth)
                    .with_max_records(max_records),
            };

            // Validate args first
            validate_args(&args)?;

            execute_parse(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
