//! Correlation identifier for a single tool run
//!
//! Every log event emitted while a run is in progress carries the run's id,
//! so the baseline pass, the target pass and the export of one comparison
//! can be grouped when logs from several runs are interleaved.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single scan, diff or compare run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generate a new RunId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
