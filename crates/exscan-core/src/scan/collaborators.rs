//! Seams to the external metadata reader and throw classifier

use std::path::PathBuf;

use crate::errors::Result;
use crate::model::{Assembly, Member};

/// Verdict of the throw classifier for one member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub throws: bool,
    pub severity: String,
}

impl Classification {
    pub fn throws(severity: impl Into<String>) -> Self {
        Self {
            throws: true,
            severity: severity.into(),
        }
    }

    pub fn clean() -> Self {
        Self {
            throws: false,
            severity: String::new(),
        }
    }
}

/// Decides whether a member throws, and at what severity
///
/// An error for one member is a classification failure: the orchestrator
/// skips that member and continues the pass.
pub trait Classifier: Send + Sync {
    /// Classify a single member of `assembly`
    ///
    /// # Errors
    ///
    /// Returns a `Classification` error when the member cannot be analysed.
    fn classify(&self, assembly: &Assembly, member: &Member) -> Result<Classification>;

    /// Classify every member of an assembly in traversal order
    fn classify_assembly<'a>(
        &self,
        assembly: &'a Assembly,
    ) -> Vec<(&'a Member, Result<Classification>)> {
        assembly
            .members
            .iter()
            .map(|member| (member, self.classify(assembly, member)))
            .collect()
    }
}

/// Loads the assemblies found under a set of input paths
pub trait AssemblySource {
    /// Load assemblies from files or directories (searched recursively)
    ///
    /// # Errors
    ///
    /// Returns `InputNotFound` for a path that is neither a file nor a
    /// directory, or an IO/decoding error for an unreadable module.
    fn load(&self, inputs: &[PathBuf]) -> Result<Vec<Assembly>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ExScanError, ExErrorKind};
    use crate::model::MemberKind;

    struct ThrowsOnOddNames;

    impl Classifier for ThrowsOnOddNames {
        fn classify(&self, _assembly: &Assembly, member: &Member) -> Result<Classification> {
            if member.name == "broken" {
                return Err(ExScanError::ClassificationFailed {
                    doc_id: member.doc_id().to_string(),
                    reason: "unreadable body".to_string(),
                }
                .into());
            }
            if member.name.len() % 2 == 1 {
                Ok(Classification::throws("1"))
            } else {
                Ok(Classification::clean())
            }
        }
    }

    #[test]
    fn test_classify_assembly_preserves_order_and_errors() {
        let assembly = Assembly::new(
            "A",
            vec![
                Member::new(MemberKind::Method, "N", "T", "abc", vec![]),
                Member::new(MemberKind::Method, "N", "T", "broken", vec![]),
                Member::new(MemberKind::Method, "N", "T", "ab", vec![]),
            ],
        );

        let results = ThrowsOnOddNames.classify_assembly(&assembly);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0.name, "abc");
        assert!(results[0].1.as_ref().unwrap().throws);
        assert_eq!(
            results[1].1.as_ref().unwrap_err().kind(),
            ExErrorKind::Classification
        );
        assert!(!results[2].1.as_ref().unwrap().throws);
    }
}
