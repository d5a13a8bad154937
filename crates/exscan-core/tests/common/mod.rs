use exscan_core::{Assembly, Member, MemberKind};
use std::fs;
use std::path::Path;

/// A method observed as throwing with the given severity
#[allow(dead_code)]
pub fn throwing(namespace: &str, type_name: &str, name: &str, severity: &str) -> Member {
    let mut member = Member::new(MemberKind::Method, namespace, type_name, name, Vec::new());
    member.throws = Some(true);
    member.severity = Some(severity.to_string());
    member
}

/// A method observed as not throwing
#[allow(dead_code)]
pub fn clean(namespace: &str, type_name: &str, name: &str) -> Member {
    let mut member = Member::new(MemberKind::Method, namespace, type_name, name, Vec::new());
    member.throws = Some(false);
    member
}

/// A method the classifier cannot decide on
#[allow(dead_code)]
pub fn unclassifiable(namespace: &str, type_name: &str, name: &str, reason: &str) -> Member {
    let mut member = Member::new(MemberKind::Method, namespace, type_name, name, Vec::new());
    member.error = Some(reason.to_string());
    member
}

/// Write `assembly` as a metadata dump `<dir>/<name>.json`
#[allow(dead_code)]
pub fn write_dump(dir: &Path, assembly: &Assembly) {
    fs::create_dir_all(dir).unwrap();
    let json = serde_json::to_string_pretty(assembly).unwrap();
    fs::write(dir.join(format!("{}.json", assembly.name)), json).unwrap();
}

/// Inbox index listing `System.Runtime` inbox on net5.0 and
/// `System.Text.Json` as an out-of-band package
#[allow(dead_code)]
pub const INDEX_JSON: &str = r#"{
  "Packages": {
    "System.Runtime": {
      "BaselineVersion": "5.0.0",
      "StableVersions": ["4.3.0", "5.0.0"],
      "InboxOn": { "net5.0": "5.0.0.0", "net6.0": "6.0.0.0" }
    },
    "System.Text.Json": {
      "BaselineVersion": "5.0.0",
      "StableVersions": ["5.0.0"]
    }
  }
}"#;
