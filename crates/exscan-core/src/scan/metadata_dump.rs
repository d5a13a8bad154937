//! Metadata dump collaborators
//!
//! Reading binary modules is done by an external tool that writes one JSON
//! dump per assembly:
//!
//! ```json
//! { "name": "System.Buffers",
//!   "members": [ { "namespace": "System.Buffers", "type": "ArrayPool`1",
//!                  "kind": "method", "name": "Rent", "parameters": ["System.Int32"],
//!                  "throws": true, "severity": "1" } ] }
//! ```
//!
//! [`MetadataDumpSource`] loads those dumps and [`DeclaredClassifier`]
//! classifies members from the verdict recorded in them.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::errors::{io_error, ExError, ExErrorKind, ExScanError, Result};
use crate::model::{Assembly, Member};

use super::collaborators::{AssemblySource, Classification, Classifier};

const DUMP_EXTENSION: &str = "json";

#[derive(Debug, Deserialize)]
struct DumpFile {
    name: String,
    #[serde(default)]
    members: Vec<Member>,
}

/// Loads assemblies from `*.json` metadata dumps
///
/// Each input may be a dump file or a directory searched recursively.
/// Directory entries are visited in file-name order and assemblies are
/// de-duplicated by name (first occurrence wins), so the same inputs always
/// yield the same sequence. Files registered with
/// [`excluding`](Self::excluding), such as an inbox index kept beside the
/// dumps, are not treated as dumps when met during a directory walk.
#[derive(Debug, Clone, Default)]
pub struct MetadataDumpSource {
    excluded: Vec<PathBuf>,
}

impl MetadataDumpSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip `path` when walking input directories
    pub fn excluding(mut self, path: impl AsRef<Path>) -> Self {
        self.excluded.push(normalized(path.as_ref()));
        self
    }

    fn is_excluded(&self, path: &Path) -> bool {
        !self.excluded.is_empty() && self.excluded.contains(&normalized(path))
    }

    /// Resolve inputs to the dump files they contain
    ///
    /// # Errors
    ///
    /// Returns `InputNotFound` for a path that is neither a file nor a
    /// directory, `Io` if a directory cannot be walked.
    pub fn dump_paths(&self, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for input in inputs {
            if input.is_file() {
                paths.push(input.clone());
            } else if input.is_dir() {
                for entry in WalkDir::new(input).sort_by_file_name() {
                    let entry = entry.map_err(|e| {
                        ExError::new(ExErrorKind::Io)
                            .with_op("walk_inputs")
                            .with_path(input)
                            .with_message(e.to_string())
                    })?;
                    let path = entry.path();
                    if entry.file_type().is_file()
                        && path.extension().is_some_and(|ext| ext == DUMP_EXTENSION)
                        && !self.is_excluded(path)
                    {
                        paths.push(path.to_path_buf());
                    }
                }
            } else {
                return Err(ExScanError::InputNotFound {
                    path: input.display().to_string(),
                }
                .into());
            }
        }
        Ok(paths)
    }

    /// Parse one dump file
    ///
    /// Members are ordered namespace, then type; declaration order is kept
    /// within a type.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `Serialization` if it is not a
    /// valid dump.
    pub fn read_dump(&self, path: &Path) -> Result<Assembly> {
        let content =
            fs::read_to_string(path).map_err(|e| io_error("load_metadata_dump", path, e))?;
        let dump: DumpFile = serde_json::from_str(&content).map_err(|e| {
            ExError::from(ExScanError::InvalidDump {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;

        let mut members = dump.members;
        members.sort_by(|a, b| {
            a.namespace
                .cmp(&b.namespace)
                .then_with(|| a.type_name.cmp(&b.type_name))
        });
        Ok(Assembly::new(dump.name, members))
    }
}

fn normalized(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

impl AssemblySource for MetadataDumpSource {
    fn load(&self, inputs: &[PathBuf]) -> Result<Vec<Assembly>> {
        let mut names = HashSet::new();
        let mut assemblies = Vec::new();
        for path in self.dump_paths(inputs)? {
            let assembly = self.read_dump(&path)?;
            if names.insert(assembly.name.clone()) {
                assemblies.push(assembly);
            } else {
                tracing::debug!(
                    component = module_path!(),
                    assembly = %assembly.name,
                    path = %path.display(),
                    "duplicate assembly ignored"
                );
            }
        }
        Ok(assemblies)
    }
}

/// Classifies members from the verdict recorded in their metadata dump
///
/// A member with an `error` entry, or without a `throws` verdict, fails
/// classification and is skipped by the orchestrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredClassifier;

impl Classifier for DeclaredClassifier {
    fn classify(&self, _assembly: &Assembly, member: &Member) -> Result<Classification> {
        if let Some(reason) = &member.error {
            return Err(ExScanError::ClassificationFailed {
                doc_id: member.doc_id().to_string(),
                reason: reason.clone(),
            }
            .into());
        }
        match member.throws {
            Some(true) => Ok(Classification::throws(
                member.severity.clone().unwrap_or_default(),
            )),
            Some(false) => Ok(Classification::clean()),
            None => Err(ExScanError::ClassificationFailed {
                doc_id: member.doc_id().to_string(),
                reason: "no throw verdict recorded".to_string(),
            }
            .into()),
        }
    }
}
