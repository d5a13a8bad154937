//! Report difference command
//!
//! Usage: exscan diff <BASELINE_CSV> <TARGET_CSV> <OUTPUT_CSV>

use clap::Args;
use exscan_core::codec::{diff_files, export_report};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Baseline report CSV
    pub baseline: PathBuf,

    /// Target report CSV
    pub target: PathBuf,

    /// Difference CSV to write
    pub output: PathBuf,
}

/// Execute diff command
pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    super::require_input(&args.baseline)?;
    super::require_input(&args.target)?;

    let diff = diff_files(&args.baseline, &args.target)?;
    let count = export_report(&diff, &args.output)?;
    println!(
        "✓ {} member(s) differ; wrote {}",
        count,
        args.output.display()
    );
    Ok(())
}
