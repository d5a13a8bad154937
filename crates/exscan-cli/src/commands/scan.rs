//! Single-version scan command
//!
//! Usage: exscan scan <INPUT> <OUTPUT> [INDEX] [--tfm <TFM>] [--label <LABEL>]

use clap::Args;
use exscan_core::codec::export_report;
use exscan_core::inbox::DEFAULT_TFM;
use exscan_core::scan::{DeclaredClassifier, InProcessRunner, TracingSink};
use exscan_core::{log_op_end, log_op_error, log_op_start, InboxFilter, ScanSettings};
use exscan_core_types::RunId;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Metadata dump file, or directory searched recursively for dumps
    pub input: PathBuf,

    /// Report CSV to write
    pub output: PathBuf,

    /// Inbox index JSON; without it every assembly is scanned
    pub index: Option<PathBuf>,

    /// Target framework moniker used for the inbox check
    #[arg(long, default_value = DEFAULT_TFM)]
    pub tfm: String,

    /// Version label written to the Api column (defaults to the input name)
    #[arg(long)]
    pub label: Option<String>,
}

/// Execute scan command
pub fn execute(args: ScanArgs) -> Result<(), Box<dyn std::error::Error>> {
    super::require_input(&args.input)?;

    let run_id = RunId::new();
    let label = args.label.unwrap_or_else(|| default_label(&args.input));
    let start = Instant::now();
    log_op_start!("cli_scan", run_id = %run_id, version_label = %label, tfm = %args.tfm);

    let result = scan(
        &args.input,
        &args.output,
        args.index.as_deref(),
        &args.tfm,
        &label,
        &run_id,
    );
    match &result {
        Ok(count) => {
            log_op_end!(
                "cli_scan",
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = %run_id,
                record_count = *count
            );
            println!("✓ Wrote {} record(s) to {}", count, args.output.display());
        }
        Err(e) => log_op_error!(
            "cli_scan",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = %run_id
        ),
    }
    result?;
    Ok(())
}

fn scan(
    input: &Path,
    output: &Path,
    index: Option<&Path>,
    tfm: &str,
    label: &str,
    run_id: &RunId,
) -> exscan_core::Result<usize> {
    let settings = ScanSettings::new(tfm, InboxFilter::from_optional_path(index)?);
    let source = super::dump_source(index);
    let runner = InProcessRunner::new(
        &source,
        &DeclaredClassifier,
        &TracingSink,
        &settings,
    )
    .with_run_id(run_id.clone());

    let set = runner.scan(label, input)?;
    export_report(&set, output)
}

/// Directory name, or the file name without `.json` for a single dump
fn default_label(input: &Path) -> String {
    let is_dump_file = !input.is_dir() && input.extension().is_some_and(|ext| ext == "json");
    let name = if is_dump_file {
        input.file_stem()
    } else {
        input.file_name()
    };
    name.and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("baseline")
        .to_string()
}
