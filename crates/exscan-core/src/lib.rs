//! exscan core - exception-contract differencing engine
//!
//! Determines which public members change their exception-throwing contract
//! between a baseline and a target version of a class library:
//! - Member identity (`model`): canonical DocIds, the sole cross-version key
//! - Toggle set (`toggle_set`): key-unique store computing the difference
//! - Inbox filter (`inbox`): which assemblies are eligible for a pass
//! - Scan orchestration (`scan`): ordered baseline/target passes over
//!   external metadata and throw-classifier collaborators
//! - Tabular codec (`codec`): deterministic CSV reports and file-to-file diff

pub mod codec;
pub mod errors;
pub mod inbox;
pub mod logging_facility;
pub mod model;
pub mod scan;
pub mod toggle_set;

// Used by the exported logging macros
pub use exscan_core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, ExScanError, Result};
pub use inbox::{InboxFilter, InboxIndex};
pub use model::{Assembly, DocId, Member, MemberKind, MemberRecord};
pub use scan::{Orchestrator, ScanSettings};
pub use toggle_set::ToggleSet;
