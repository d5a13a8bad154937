pub mod compare;
pub mod diff;
pub mod scan;

use std::path::Path;

use exscan_core::scan::MetadataDumpSource;
use exscan_core::{ExError, ExScanError};

/// Dump source that never mistakes the inbox index for a dump
fn dump_source(index: Option<&Path>) -> MetadataDumpSource {
    match index {
        Some(index) => MetadataDumpSource::new().excluding(index),
        None => MetadataDumpSource::new(),
    }
}

/// Reject an input root that is neither a file nor a directory
fn require_input(path: &Path) -> Result<(), ExError> {
    if path.is_file() || path.is_dir() {
        Ok(())
    } else {
        Err(ExScanError::InputNotFound {
            path: path.display().to_string(),
        }
        .into())
    }
}
