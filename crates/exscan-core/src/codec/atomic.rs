//! Atomic write primitives
//!
//! Uses temp→rename so a report path only ever holds a complete report.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::{io_error, Result};

fn temp_path_for(target_path: &Path) -> PathBuf {
    let mut name = target_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target_path.with_file_name(name)
}

/// Atomically write a file through a buffered writer
///
/// `write` receives a writer on a temp file next to `target_path`; the temp
/// file is renamed over the target only if `write` and the flush succeed, and
/// is removed otherwise.
pub fn atomic_write_with<F>(target_path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    if let Some(parent) = target_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error("create_report_dir", parent, e))?;
    }

    let temp_path = temp_path_for(target_path);
    let outcome = File::create(&temp_path).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    });

    if let Err(e) = outcome {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("write_report_temp", &temp_path, e));
    }

    fs::rename(&temp_path, target_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        io_error("rename_report_temp", target_path, e)
    })
}
