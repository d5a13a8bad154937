//! Inbox membership filter
//!
//! An assembly is "inbox" for a target framework when it ships as part of
//! that runtime rather than as a separate package. Eligibility is decided
//! against an optional package index:
//!
//! - no index supplied: every assembly is eligible (default-allow)
//! - index supplied, assembly absent from it: not eligible (default-deny)
//! - assembly present: eligible iff its `InboxOn` map contains the moniker
//!
//! Callers choose between the two defaults by supplying an index or not.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::errors::{io_error, ExScanError, Result};

/// Default target framework moniker queried by the CLI
pub const DEFAULT_TFM: &str = "net5.0";

/// Per-package entry of the inbox index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Package {
    #[serde(default)]
    pub baseline_version: Option<String>,

    #[serde(default)]
    pub stable_versions: Option<Vec<String>>,

    /// Target framework moniker -> version the package is inbox on
    #[serde(default)]
    pub inbox_on: Option<BTreeMap<String, String>>,
}

/// Read-only package index keyed by package (assembly) name
///
/// JSON shape: `{ "Packages": { <name>: { "BaselineVersion", "StableVersions", "InboxOn" } } }`.
/// An index whose `Packages` is null or missing admits every assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InboxIndex {
    #[serde(default)]
    pub packages: Option<BTreeMap<String, Package>>,
}

impl InboxIndex {
    /// Load an index from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `Serialization` if it is not a
    /// valid index.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| io_error("load_inbox_index", path, e))?;
        Self::from_json(&content).map_err(|reason| {
            ExScanError::InvalidIndex {
                path: path.display().to_string(),
                reason,
            }
            .into()
        })
    }

    /// Parse an index from JSON text
    pub fn from_json(content: &str) -> std::result::Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    /// Number of packages listed
    pub fn package_count(&self) -> usize {
        self.packages.as_ref().map(|p| p.len()).unwrap_or(0)
    }

    fn admits(&self, assembly_name: &str, tfm: &str) -> bool {
        let Some(packages) = &self.packages else {
            return true;
        };
        packages
            .get(assembly_name)
            .and_then(|package| package.inbox_on.as_ref())
            .map(|inbox_on| inbox_on.contains_key(tfm))
            .unwrap_or(false)
    }
}

/// Predicate gating which assemblies a pass scans
#[derive(Debug, Clone, Default)]
pub struct InboxFilter {
    index: Option<InboxIndex>,
}

impl InboxFilter {
    /// Filter that admits every assembly
    pub fn allow_all() -> Self {
        Self { index: None }
    }

    /// Filter backed by a package index
    pub fn with_index(index: InboxIndex) -> Self {
        Self { index: Some(index) }
    }

    /// Filter from an optional index file path
    ///
    /// # Errors
    ///
    /// Propagates [`InboxIndex::load`] failures.
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::with_index(InboxIndex::load(path)?)),
            None => Ok(Self::allow_all()),
        }
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// Whether `assembly_name` is inbox on `tfm`
    pub fn is_inbox(&self, assembly_name: &str, tfm: &str) -> bool {
        match &self.index {
            None => true,
            Some(index) => index.admits(assembly_name, tfm),
        }
    }
}
