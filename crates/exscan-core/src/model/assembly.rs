use serde::{Deserialize, Serialize};

use super::doc_id::{member_signature, DocId, MemberKind};

/// A loaded module and its visible members, as produced by an `AssemblySource`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    /// Simple assembly name, the key looked up in the inbox index
    pub name: String,

    /// Members in traversal order (namespace, type, member)
    pub members: Vec<Member>,
}

impl Assembly {
    pub fn new(name: impl Into<String>, members: Vec<Member>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }
}

/// A declared member observed in an assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub namespace: String,

    #[serde(rename = "type")]
    pub type_name: String,

    pub kind: MemberKind,

    pub name: String,

    /// Fully qualified parameter type names
    #[serde(default)]
    pub parameters: Vec<String>,

    /// Classifier hints carried by metadata dumps; ignored by other classifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throws: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Member {
    pub fn new(
        kind: MemberKind,
        namespace: impl Into<String>,
        type_name: impl Into<String>,
        name: impl Into<String>,
        parameters: Vec<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            type_name: type_name.into(),
            kind,
            name: name.into(),
            parameters,
            throws: None,
            severity: None,
            error: None,
        }
    }

    /// Canonical identifier of this member
    pub fn doc_id(&self) -> DocId {
        DocId::for_member(
            self.kind,
            &self.namespace,
            &self.type_name,
            &self.name,
            self.parameters.as_slice(),
        )
    }

    /// Signature as written to the `Member` report column
    pub fn signature(&self) -> String {
        member_signature(self.kind, &self.name, self.parameters.as_slice())
    }
}
