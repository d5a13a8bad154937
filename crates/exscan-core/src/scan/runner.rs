//! Producing one labeled single-version report
//!
//! A [`PassRunner`] turns one labeled input root into a report file. The
//! in-process runner drives the engine directly; the process runner spawns an
//! external per-module scanner. Both are interchangeable behind the trait.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use exscan_core_types::RunId;

use crate::codec::export_report;
use crate::errors::{ExError, ExErrorKind, ExScanError, Result};
use crate::toggle_set::ToggleSet;

use super::collaborators::{AssemblySource, Classifier};
use super::orchestrator::{Comparison, Orchestrator, ScanSettings};
use super::sink::ReportSink;

/// Produces the report for one labeled input root
pub trait PassRunner {
    /// Scan `input` as version `label` and write its report to `output`
    ///
    /// # Errors
    ///
    /// Any failure means no report was produced for this pass.
    fn run(&self, label: &str, input: &Path, output: &Path) -> Result<()>;
}

/// Runs passes in this process through the engine
pub struct InProcessRunner<'a> {
    source: &'a dyn AssemblySource,
    classifier: &'a dyn Classifier,
    sink: &'a dyn ReportSink,
    settings: &'a ScanSettings,
    run_id: RunId,
}

impl<'a> InProcessRunner<'a> {
    pub fn new(
        source: &'a dyn AssemblySource,
        classifier: &'a dyn Classifier,
        sink: &'a dyn ReportSink,
        settings: &'a ScanSettings,
    ) -> Self {
        Self {
            source,
            classifier,
            sink,
            settings,
            run_id: RunId::new(),
        }
    }

    /// Tag every pass run by this runner with `run_id`
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    fn orchestrator(&self) -> Orchestrator<'a> {
        Orchestrator::new(self.classifier, self.sink, self.settings)
            .with_run_id(self.run_id.clone())
    }

    /// Single baseline pass over `input`
    ///
    /// # Errors
    ///
    /// Propagates load and pass failures.
    pub fn scan(&self, label: &str, input: &Path) -> Result<ToggleSet> {
        let assemblies = self.source.load(&[input.to_path_buf()])?;
        Ok(self.orchestrator().baseline(label, &assemblies)?.into_set())
    }

    /// Baseline pass over `baseline`, then target pass over `target`
    ///
    /// Both inputs are loaded before either pass starts, so a load failure
    /// aborts the run before any observation.
    ///
    /// # Errors
    ///
    /// Propagates load and pass failures.
    pub fn diff(&self, baseline: (&str, &Path), target: (&str, &Path)) -> Result<ToggleSet> {
        Ok(self.compare(baseline, target)?.diff)
    }

    /// Like [`diff`](Self::diff), also keeping each version's own report
    ///
    /// Each input is loaded and classified exactly once.
    ///
    /// # Errors
    ///
    /// Propagates load and pass failures.
    pub fn compare(&self, baseline: (&str, &Path), target: (&str, &Path)) -> Result<Comparison> {
        let baseline_assemblies = self.source.load(&[baseline.1.to_path_buf()])?;
        let target_assemblies = self.source.load(&[target.1.to_path_buf()])?;

        self.orchestrator()
            .baseline(baseline.0, &baseline_assemblies)?
            .compare(target.0, &target_assemblies)
    }
}

impl PassRunner for InProcessRunner<'_> {
    fn run(&self, label: &str, input: &Path, output: &Path) -> Result<()> {
        let set = self.scan(label, input)?;
        export_report(&set, output)?;
        Ok(())
    }
}

/// Runs each pass by spawning an external scanner
///
/// Invoked as `<executable> <input> <output.csv> [index.json]`. Standard
/// output and error are inherited unmodified; only the exit code decides
/// whether the pass succeeded.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    executable: PathBuf,
    index: Option<PathBuf>,
}

impl ProcessRunner {
    pub fn new(executable: impl Into<PathBuf>, index: Option<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            index,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl PassRunner for ProcessRunner {
    fn run(&self, label: &str, input: &Path, output: &Path) -> Result<()> {
        if !self.executable.is_file() {
            return Err(ExScanError::ScannerNotFound {
                path: self.executable.display().to_string(),
            }
            .into());
        }

        tracing::info!(
            component = module_path!(),
            version_label = %label,
            scanner = %self.executable.display(),
            input = %input.display(),
            "spawning scanner"
        );

        let mut command = Command::new(&self.executable);
        command
            .arg(input)
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(index) = &self.index {
            command.arg(index);
        }

        let status = command.status().map_err(|e| {
            ExError::new(ExErrorKind::ExternalService)
                .with_op("run_scanner")
                .with_path(&self.executable)
                .with_message(e.to_string())
        })?;

        if !status.success() {
            return Err(ExScanError::ScannerFailed {
                label: label.to_string(),
                code: status.code(),
            }
            .into());
        }
        Ok(())
    }
}
