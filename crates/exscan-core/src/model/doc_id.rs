use serde::{Deserialize, Serialize};

/// Kind of declared member, rendered as the DocId prefix letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Type,
    Method,
    Property,
    Field,
    Event,
}

impl MemberKind {
    /// Prefix letter used in the canonical DocId form
    pub fn prefix(&self) -> char {
        match self {
            MemberKind::Type => 'T',
            MemberKind::Method => 'M',
            MemberKind::Property => 'P',
            MemberKind::Field => 'F',
            MemberKind::Event => 'E',
        }
    }
}

/// Canonical textual identifier for a declared member
///
/// A DocId is derived from namespace, declaring type and member signature
/// only, so it is stable under member reordering and independent of the name
/// or version of the module that declares the member. It is the sole
/// cross-version join key: two observations are the same logical member iff
/// their DocIds are equal as strings. Renamed or moved members are not
/// reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    /// Build the DocId of a member
    ///
    /// Renders `<prefix>:<namespace>.<type>.<name>`, omitting the namespace
    /// segment when it is empty and appending `(<p1>,<p2>)` only when the
    /// member has parameters. For [`MemberKind::Type`] the name is ignored and
    /// the result is `T:<namespace>.<type>`.
    ///
    /// # Example
    ///
    /// ```
    /// use exscan_core::model::{DocId, MemberKind};
    ///
    /// let id = DocId::for_member(
    ///     MemberKind::Method,
    ///     "System.IO",
    ///     "File",
    ///     "ReadAllText",
    ///     &["System.String"],
    /// );
    /// assert_eq!(id.as_str(), "M:System.IO.File.ReadAllText(System.String)");
    /// ```
    pub fn for_member(
        kind: MemberKind,
        namespace: &str,
        type_name: &str,
        name: &str,
        parameters: &[impl AsRef<str>],
    ) -> Self {
        let mut id = String::new();
        id.push(kind.prefix());
        id.push(':');
        if !namespace.is_empty() {
            id.push_str(namespace);
            id.push('.');
        }
        id.push_str(type_name);

        if kind == MemberKind::Type {
            return Self(id);
        }

        id.push('.');
        id.push_str(name);
        if !parameters.is_empty() {
            id.push('(');
            id.push_str(&join(parameters, ","));
            id.push(')');
        }
        Self(id)
    }

    /// Wrap an already-canonical DocId (e.g. one read back from a report)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for DocId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable member signature written to the `Member` report column
///
/// Methods are always parenthesized (`Dispose()`), other kinds are the bare
/// member name.
pub fn member_signature(kind: MemberKind, name: &str, parameters: &[impl AsRef<str>]) -> String {
    match kind {
        MemberKind::Method => format!("{}({})", name, join(parameters, ", ")),
        _ => name.to_string(),
    }
}

fn join(parts: &[impl AsRef<str>], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(sep)
}
