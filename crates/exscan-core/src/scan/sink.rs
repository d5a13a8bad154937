//! Injectable progress reporting for scan passes

use std::sync::{Arc, Mutex};

use exscan_core_types::schema::{
    EVENT_ASSEMBLY_SCANNED, EVENT_ASSEMBLY_SKIPPED, EVENT_MEMBER_CLEARED, EVENT_MEMBER_RECORDED,
    EVENT_MEMBER_SKIPPED,
};

use super::orchestrator::Pass;

/// Progress event emitted by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    PassStarted {
        pass: Pass,
        label: String,
    },
    /// Assembly rejected by the inbox filter
    AssemblySkipped {
        pass: Pass,
        assembly: String,
        tfm: String,
    },
    AssemblyScanned {
        pass: Pass,
        assembly: String,
        members: usize,
    },
    /// Classifier failed on a member; the member was not recorded
    MemberSkipped {
        pass: Pass,
        doc_id: String,
        reason: String,
    },
    MemberRecorded {
        pass: Pass,
        doc_id: String,
    },
    /// Target observation matched a baseline entry, which was removed
    MemberCleared {
        pass: Pass,
        doc_id: String,
    },
    PassFinished {
        pass: Pass,
        label: String,
        flagged: usize,
    },
}

/// Receives orchestrator progress events
pub trait ReportSink: Send + Sync {
    fn report(&self, event: &ScanEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn report(&self, _event: &ScanEvent) {}
}

/// Forwards events to `tracing`
///
/// Per-member events are emitted at debug level, skips at warn/info.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn report(&self, event: &ScanEvent) {
        match event {
            ScanEvent::PassStarted { pass, label } => {
                tracing::info!(
                    component = module_path!(),
                    pass = %pass,
                    version_label = %label,
                    "pass started"
                );
            }
            ScanEvent::AssemblySkipped { pass, assembly, tfm } => {
                tracing::info!(
                    component = module_path!(),
                    event = EVENT_ASSEMBLY_SKIPPED,
                    pass = %pass,
                    assembly = %assembly,
                    tfm = %tfm,
                );
            }
            ScanEvent::AssemblyScanned {
                pass,
                assembly,
                members,
            } => {
                tracing::debug!(
                    component = module_path!(),
                    event = EVENT_ASSEMBLY_SCANNED,
                    pass = %pass,
                    assembly = %assembly,
                    members = *members,
                );
            }
            ScanEvent::MemberSkipped {
                pass,
                doc_id,
                reason,
            } => {
                tracing::warn!(
                    component = module_path!(),
                    event = EVENT_MEMBER_SKIPPED,
                    pass = %pass,
                    doc_id = %doc_id,
                    reason = %reason,
                );
            }
            ScanEvent::MemberRecorded { pass, doc_id } => {
                tracing::debug!(
                    component = module_path!(),
                    event = EVENT_MEMBER_RECORDED,
                    pass = %pass,
                    doc_id = %doc_id,
                );
            }
            ScanEvent::MemberCleared { pass, doc_id } => {
                tracing::debug!(
                    component = module_path!(),
                    event = EVENT_MEMBER_CLEARED,
                    pass = %pass,
                    doc_id = %doc_id,
                );
            }
            ScanEvent::PassFinished {
                pass,
                label,
                flagged,
            } => {
                tracing::info!(
                    component = module_path!(),
                    pass = %pass,
                    version_label = %label,
                    record_count = *flagged,
                    "pass finished"
                );
            }
        }
    }
}

/// Collects events in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<ScanEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events reported so far
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Count events matching a predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&ScanEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

impl ReportSink for RecordingSink {
    fn report(&self, event: &ScanEvent) {
        self.events
            .lock()
            .map(|mut events| events.push(event.clone()))
            .ok();
    }
}
