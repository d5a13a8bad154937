//! Baseline/target comparison command
//!
//! Usage: exscan compare --baseline <LABEL=PATH> --target <LABEL=PATH> --out <DIR>
//!        [--index <FILE>] [--scanner <EXE>] [--tfm <TFM>]
//!
//! Writes `<DIR>/<label>.csv` for each version and `<DIR>/diff.csv`. The
//! difference is only written once both single-version passes succeeded.

use clap::Args;
use exscan_core::codec::{diff_files, export_report};
use exscan_core::inbox::DEFAULT_TFM;
use exscan_core::scan::{
    DeclaredClassifier, InProcessRunner, PassRunner, ProcessRunner, TracingSink,
};
use exscan_core::{
    log_op_end, log_op_error, log_op_start, ExError, ExErrorKind, ExScanError, InboxFilter,
    ScanSettings,
};
use exscan_core_types::RunId;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

const DIFF_FILE: &str = "diff.csv";

/// A version label bound to its input root, written `label=path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledInput {
    pub label: String,
    pub path: PathBuf,
}

impl LabeledInput {
    fn report_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(format!("{}.csv", self.label))
    }
}

impl FromStr for LabeledInput {
    type Err = ExScanError;

    fn from_str(arg: &str) -> Result<Self, Self::Err> {
        let invalid = || ExScanError::InvalidLabeledInput {
            input: arg.to_string(),
        };
        let (label, path) = arg.split_once('=').ok_or_else(invalid)?;
        let label = label.trim();
        // The label names a report file inside the output directory
        if label.is_empty()
            || path.is_empty()
            || label.contains(['/', '\\'])
            || label == "."
            || label == ".."
        {
            return Err(invalid());
        }
        Ok(Self {
            label: label.to_string(),
            path: PathBuf::from(path),
        })
    }
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Baseline version as LABEL=PATH
    #[arg(long)]
    pub baseline: LabeledInput,

    /// Target version as LABEL=PATH
    #[arg(long)]
    pub target: LabeledInput,

    /// Output directory for the per-version reports and diff.csv
    #[arg(long)]
    pub out: PathBuf,

    /// Inbox index JSON; without it every assembly is scanned
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// External per-version scanner, invoked as `<EXE> <input> <output.csv> [index]`
    #[arg(long)]
    pub scanner: Option<PathBuf>,

    /// Target framework moniker used for the inbox check
    #[arg(long, default_value = DEFAULT_TFM)]
    pub tfm: String,
}

/// Execute compare command
pub fn execute(args: CompareArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate(&args)?;

    let run_id = RunId::new();
    let start = Instant::now();
    log_op_start!(
        "cli_compare",
        run_id = %run_id,
        baseline = %args.baseline.label,
        target = %args.target.label
    );

    let result = compare(&args, &run_id);
    match &result {
        Ok(count) => {
            log_op_end!(
                "cli_compare",
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = %run_id,
                record_count = *count
            );
            println!("✓ Wrote {}", args.baseline.report_path(&args.out).display());
            println!("✓ Wrote {}", args.target.report_path(&args.out).display());
            println!(
                "✓ {} member(s) differ; wrote {}",
                count,
                args.out.join(DIFF_FILE).display()
            );
        }
        Err(e) => log_op_error!(
            "cli_compare",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = %run_id
        ),
    }
    result?;
    Ok(())
}

fn validate(args: &CompareArgs) -> exscan_core::Result<()> {
    super::require_input(&args.baseline.path)?;
    super::require_input(&args.target.path)?;

    let reserved = Path::new(DIFF_FILE).file_stem().and_then(|s| s.to_str());
    for input in [&args.baseline, &args.target] {
        if Some(input.label.as_str()) == reserved {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("bind_version_label")
                .with_message(format!(
                    "label '{}' collides with {}",
                    input.label, DIFF_FILE
                )));
        }
    }
    if args.baseline.label == args.target.label {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("bind_version_label")
            .with_message(format!(
                "baseline and target share the label '{}'",
                args.baseline.label
            )));
    }
    Ok(())
}

fn compare(args: &CompareArgs, run_id: &RunId) -> exscan_core::Result<usize> {
    std::fs::create_dir_all(&args.out)
        .map_err(|e| exscan_core::errors::io_error("create_out_dir", &args.out, e))?;

    let baseline_csv = args.baseline.report_path(&args.out);
    let target_csv = args.target.report_path(&args.out);

    let diff = match &args.scanner {
        Some(scanner) => {
            let runner = ProcessRunner::new(scanner, args.index.clone());
            run_both(&runner, args, &baseline_csv, &target_csv)?;
            diff_files(&baseline_csv, &target_csv)?
        }
        None => {
            let filter = InboxFilter::from_optional_path(args.index.as_deref())?;
            let settings = ScanSettings::new(&args.tfm, filter);
            let source = super::dump_source(args.index.as_deref());
            let runner = InProcessRunner::new(
                &source,
                &DeclaredClassifier,
                &TracingSink,
                &settings,
            )
            .with_run_id(run_id.clone());

            // One baseline pass and one target pass yield all three reports
            let comparison = runner.compare(
                (args.baseline.label.as_str(), args.baseline.path.as_path()),
                (args.target.label.as_str(), args.target.path.as_path()),
            )?;
            export_report(&comparison.baseline, &baseline_csv)?;
            export_report(&comparison.target, &target_csv)?;
            comparison.diff
        }
    };

    export_report(&diff, &args.out.join(DIFF_FILE))
}

fn run_both(
    runner: &dyn PassRunner,
    args: &CompareArgs,
    baseline_csv: &Path,
    target_csv: &Path,
) -> exscan_core::Result<()> {
    runner.run(&args.baseline.label, &args.baseline.path, baseline_csv)?;
    runner.run(&args.target.label, &args.target.path, target_csv)
}
