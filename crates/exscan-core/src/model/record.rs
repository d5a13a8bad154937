use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::doc_id::DocId;

/// One row of a throw-contract report
///
/// A record describes a member flagged as differing, tagged with the version
/// label of the pass that recorded it and the classifier's severity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRecord {
    /// Canonical member identifier, unique within a pass
    pub doc_id: DocId,

    pub namespace: String,

    /// Declaring type name
    pub type_name: String,

    /// Member signature as written to the `Member` column
    pub signature: String,

    /// Label of the pass that recorded this member (`Api` column)
    pub version_label: String,

    /// Classifier severity (`Nesting` column)
    pub severity: String,
}

impl MemberRecord {
    pub fn new(
        doc_id: DocId,
        namespace: impl Into<String>,
        type_name: impl Into<String>,
        signature: impl Into<String>,
        version_label: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            doc_id,
            namespace: namespace.into(),
            type_name: type_name.into(),
            signature: signature.into(),
            version_label: version_label.into(),
            severity: severity.into(),
        }
    }

    /// Fixed multi-key report order
    ///
    /// Namespace, then type, then member, then DocId, then version label and
    /// severity. Total over records, so sorting is deterministic regardless
    /// of the order records were collected in.
    pub fn report_cmp(&self, other: &Self) -> Ordering {
        self.namespace
            .cmp(&other.namespace)
            .then_with(|| self.type_name.cmp(&other.type_name))
            .then_with(|| self.signature.cmp(&other.signature))
            .then_with(|| self.doc_id.cmp(&other.doc_id))
            .then_with(|| self.version_label.cmp(&other.version_label))
            .then_with(|| self.severity.cmp(&other.severity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ns: &str, ty: &str, member: &str, label: &str) -> MemberRecord {
        MemberRecord::new(
            DocId::from_string(format!("M:{}.{}.{}", ns, ty, member)),
            ns,
            ty,
            member,
            label,
            "1",
        )
    }

    #[test]
    fn test_report_order_is_namespace_first() {
        let a = record("A", "Z", "z", "v1");
        let b = record("B", "A", "a", "v1");
        assert_eq!(a.report_cmp(&b), Ordering::Less);
    }

    #[test]
    fn test_report_order_breaks_ties_on_label() {
        let a = record("N", "T", "m", "baseline");
        let b = record("N", "T", "m", "target");
        assert_eq!(a.report_cmp(&b), Ordering::Less);
        assert_eq!(a.report_cmp(&a.clone()), Ordering::Equal);
    }
}
