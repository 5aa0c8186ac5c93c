//! Collapsed stack output writer.
//!
//! One `path weight` line per stack, readable by flame graph tools.

use super::json::{create_parent_dirs, validate_output_path};
use crate::aggregator::CollapsedStack;
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write collapsed stacks to a text file
///
/// **Public** - used by the parse command's `--collapsed` option
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_collapsed(stacks: &[CollapsedStack], output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing collapsed stacks to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    for stack in stacks {
        writeln!(writer, "{}", stack.to_line())?;
    }
    writer.flush()?;

    info!("Collapsed stacks written successfully ({} lines)", stacks.len());

    Ok(())
}
