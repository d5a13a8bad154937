//! Two-pass scan orchestration
//!
//! The orchestrator drives a baseline pass and then a target pass over the
//! members of every inbox-eligible assembly, asks the external
//! [`Classifier`] whether each member throws, and folds the throwing members
//! into a [`ToggleSet`](crate::toggle_set::ToggleSet).
//!
//! ## Entry point
//!
//! ```ignore
//! use exscan_core::scan::{Orchestrator, ScanSettings, TracingSink};
//!
//! let baseline = Orchestrator::new(&classifier, &TracingSink, &settings)
//!     .baseline("netcore3.1", &baseline_assemblies)?;
//! let diff = baseline.target("net5.0", &target_assemblies)?;
//! ```
//!
//! Pass order is carried in the types: a target pass can only be started from
//! the [`BaselinePass`] returned by a completed baseline pass.

pub mod collaborators;
pub mod metadata_dump;
pub mod orchestrator;
pub mod runner;
pub mod sink;

pub use collaborators::{AssemblySource, Classification, Classifier};
pub use metadata_dump::{DeclaredClassifier, MetadataDumpSource};
pub use orchestrator::{BaselinePass, Comparison, Orchestrator, Pass, ScanSettings};
pub use runner::{InProcessRunner, PassRunner, ProcessRunner};
pub use sink::{NullSink, RecordingSink, ReportSink, ScanEvent, TracingSink};
