//! Baseline/target pass driver

use std::time::Instant;

use exscan_core_types::RunId;

use crate::errors::{ExError, ExErrorKind, Result};
use crate::inbox::{InboxFilter, DEFAULT_TFM};
use crate::model::{Assembly, MemberRecord};
use crate::toggle_set::{ToggleSet, Toggled};
use crate::{log_op_end, log_op_error, log_op_start};

use super::collaborators::Classifier;
use super::sink::{ReportSink, ScanEvent};

/// Which of the two ordered passes an observation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    Baseline,
    Target,
}

impl std::fmt::Display for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pass::Baseline => f.write_str("baseline"),
            Pass::Target => f.write_str("target"),
        }
    }
}

/// Engine settings shared by both passes
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Target framework moniker queried against the inbox filter
    pub tfm: String,
    pub filter: InboxFilter,
}

impl ScanSettings {
    pub fn new(tfm: impl Into<String>, filter: InboxFilter) -> Self {
        Self {
            tfm: tfm.into(),
            filter,
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self::new(DEFAULT_TFM, InboxFilter::allow_all())
    }
}

/// Drives the baseline pass; see [`BaselinePass::target`] for the second pass
pub struct Orchestrator<'a> {
    classifier: &'a dyn Classifier,
    sink: &'a dyn ReportSink,
    settings: &'a ScanSettings,
    run_id: RunId,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        classifier: &'a dyn Classifier,
        sink: &'a dyn ReportSink,
        settings: &'a ScanSettings,
    ) -> Self {
        Self {
            classifier,
            sink,
            settings,
            run_id: RunId::new(),
        }
    }

    /// Correlate this run's log events with an existing run id
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Run the baseline pass to completion
    ///
    /// Every throwing member is added to a fresh set, tagged with `label`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty label and `DuplicateKey` if a
    /// DocId is observed twice; the pass is aborted and no set is produced.
    pub fn baseline(self, label: &str, assemblies: &[Assembly]) -> Result<BaselinePass<'a>> {
        let mut set = ToggleSet::new();
        self.run_pass(Pass::Baseline, label, assemblies, &mut set)?;
        Ok(BaselinePass {
            orchestrator: self,
            label: label.to_string(),
            set,
        })
    }

    fn run_pass(
        &self,
        pass: Pass,
        label: &str,
        assemblies: &[Assembly],
        set: &mut ToggleSet,
    ) -> Result<ToggleSet> {
        let start = Instant::now();
        let op = pass_op(pass);
        log_op_start!(
            op,
            run_id = %self.run_id,
            version_label = %label,
            assembly_count = assemblies.len()
        );

        match self.observe(pass, label, assemblies, set) {
            Ok(observed) => {
                log_op_end!(
                    op,
                    duration_ms = start.elapsed().as_millis() as u64,
                    run_id = %self.run_id,
                    record_count = set.len()
                );
                Ok(observed)
            }
            Err(err) => {
                let err = err.with_run_id(self.run_id.clone());
                log_op_error!(
                    op,
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    run_id = %self.run_id
                );
                Err(err)
            }
        }
    }

    /// Apply one pass to `set`, returning the pass's own throwing members
    fn observe(
        &self,
        pass: Pass,
        label: &str,
        assemblies: &[Assembly],
        set: &mut ToggleSet,
    ) -> Result<ToggleSet> {
        if label.trim().is_empty() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("bind_version_label")
                .with_message("version label must not be empty"));
        }

        self.sink.report(&ScanEvent::PassStarted {
            pass,
            label: label.to_string(),
        });

        // Throwing observations of this pass alone; a repeat is a duplicate
        let mut observed = ToggleSet::new();
        let tfm = self.settings.tfm.as_str();

        for assembly in assemblies {
            if !self.settings.filter.is_inbox(&assembly.name, tfm) {
                self.sink.report(&ScanEvent::AssemblySkipped {
                    pass,
                    assembly: assembly.name.clone(),
                    tfm: tfm.to_string(),
                });
                continue;
            }

            for (member, verdict) in self.classifier.classify_assembly(assembly) {
                let doc_id = member.doc_id();
                let classification = match verdict {
                    Ok(classification) => classification,
                    Err(err) => {
                        self.sink.report(&ScanEvent::MemberSkipped {
                            pass,
                            doc_id: doc_id.to_string(),
                            reason: err.to_string(),
                        });
                        continue;
                    }
                };

                if !classification.throws {
                    continue;
                }

                let record = MemberRecord::new(
                    doc_id,
                    member.namespace.clone(),
                    member.type_name.clone(),
                    member.signature(),
                    label,
                    classification.severity,
                );
                let doc_id = record.doc_id.to_string();
                observed
                    .add(record.clone())
                    .map_err(|e| e.with_op(pass_op(pass)))?;

                match pass {
                    Pass::Baseline => {
                        set.add(record).map_err(|e| e.with_op(pass_op(pass)))?;
                        self.sink
                            .report(&ScanEvent::MemberRecorded { pass, doc_id });
                    }
                    Pass::Target => match set.toggle(record) {
                        Toggled::Recorded => {
                            self.sink
                                .report(&ScanEvent::MemberRecorded { pass, doc_id });
                        }
                        Toggled::Cleared(_) => {
                            self.sink
                                .report(&ScanEvent::MemberCleared { pass, doc_id });
                        }
                    },
                }
            }

            self.sink.report(&ScanEvent::AssemblyScanned {
                pass,
                assembly: assembly.name.clone(),
                members: assembly.members.len(),
            });
        }

        self.sink.report(&ScanEvent::PassFinished {
            pass,
            label: label.to_string(),
            flagged: set.len(),
        });
        Ok(observed)
    }
}

fn pass_op(pass: Pass) -> &'static str {
    match pass {
        Pass::Baseline => "scan_baseline",
        Pass::Target => "scan_target",
    }
}

/// A completed baseline pass, ready for the target pass
pub struct BaselinePass<'a> {
    orchestrator: Orchestrator<'a>,
    label: String,
    set: ToggleSet,
}

impl<'a> BaselinePass<'a> {
    /// Label the baseline pass was bound to
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Members flagged by the baseline pass
    pub fn set(&self) -> &ToggleSet {
        &self.set
    }

    /// Stop after one pass (single-version report)
    pub fn into_set(self) -> ToggleSet {
        self.set
    }

    /// Run the target pass and return the final difference
    ///
    /// Throwing members already flagged by the baseline are cleared; the rest
    /// are recorded tagged with `label`. Baseline entries never matched by a
    /// throwing target observation remain, including members that still exist
    /// in the target but no longer throw.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty label and `DuplicateKey` if a
    /// DocId is observed twice within the target pass.
    pub fn target(mut self, label: &str, assemblies: &[Assembly]) -> Result<ToggleSet> {
        self.orchestrator
            .run_pass(Pass::Target, label, assemblies, &mut self.set)?;
        Ok(self.set)
    }

    /// Run the target pass, keeping both single-version reports
    ///
    /// Same protocol as [`target`](Self::target); the target's own throwing
    /// members are collected during that one pass, so no input is observed
    /// twice.
    ///
    /// # Errors
    ///
    /// As [`target`](Self::target).
    pub fn compare(mut self, label: &str, assemblies: &[Assembly]) -> Result<Comparison> {
        let baseline = self.set.clone();
        let target = self
            .orchestrator
            .run_pass(Pass::Target, label, assemblies, &mut self.set)?;
        Ok(Comparison {
            baseline,
            target,
            diff: self.set,
        })
    }
}

/// Outcome of a baseline/target run
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Throwing members of the baseline, tagged with its label
    pub baseline: ToggleSet,
    /// Throwing members of the target, tagged with its label
    pub target: ToggleSet,
    /// Members whose throwing status differs between the two
    pub diff: ToggleSet,
}
