//! CLI integration tests
//!
//! Drive the `exscan` binary end to end over metadata dumps written to a
//! temporary directory and check exit codes and written reports.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const HEADER: &str = "DocId,Namespace,Type,Member,Api,Nesting";

fn exscan(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_exscan"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

/// Run with info-level diagnostics on stderr
fn exscan_logged(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_exscan"))
        .args(args)
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to execute CLI")
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn method(name: &str, throws: bool, severity: &str) -> String {
    format!(
        r#"{{"namespace":"N","type":"T","kind":"method","name":"{}","throws":{},"severity":"{}"}}"#,
        name, throws, severity
    )
}

/// Write a one-assembly metadata dump under `<root>/<dir>`
fn write_version(root: &Path, dir: &str, assembly: &str, members: &[String]) -> PathBuf {
    let input = root.join(dir);
    fs::create_dir_all(&input).unwrap();
    let json = format!(r#"{{"name":"{}","members":[{}]}}"#, assembly, members.join(","));
    fs::write(input.join(format!("{}.json", assembly)), json).unwrap();
    input
}

fn data_rows(path: &Path) -> Vec<String> {
    let text = fs::read_to_string(path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(HEADER));
    lines.map(|l| l.to_string()).collect()
}

fn setup_versions(temp: &TempDir) -> (PathBuf, PathBuf) {
    let v1 = write_version(
        temp.path(),
        "v1",
        "Lib",
        &[method("A", true, "1"), method("B", true, "2")],
    );
    let v2 = write_version(
        temp.path(),
        "v2",
        "Lib",
        &[method("A", true, "1"), method("C", true, "3"), method("D", false, "")],
    );
    (v1, v2)
}

#[test]
fn test_cli_scan_writes_report() {
    let temp = TempDir::new().unwrap();
    let (v1, _) = setup_versions(&temp);
    let out = temp.path().join("v1.csv");

    let output = exscan(&["scan", arg(&v1), arg(&out), "--label", "net5.0"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        data_rows(&out),
        vec!["M:N.T.A,N,T,A(),net5.0,1", "M:N.T.B,N,T,B(),net5.0,2"]
    );
}

#[test]
fn test_cli_scan_missing_input_exits_one() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out.csv");

    let output = exscan(&["scan", arg(&temp.path().join("absent")), arg(&out)]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "stderr: {}", stderr);
    assert!(!out.exists());
}

#[test]
fn test_cli_usage_error_exits_one() {
    let output = exscan(&["scan"]);
    assert_eq!(output.status.code(), Some(1));

    let output = exscan(&[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_cli_help_exits_zero() {
    let output = exscan(&["--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("compare"));
}

#[test]
fn test_cli_scan_with_inbox_index_skips_package_assemblies() {
    let temp = TempDir::new().unwrap();
    let input = write_version(temp.path(), "v1", "System.Runtime", &[method("A", true, "1")]);
    write_version(temp.path(), "v1/oob", "System.Text.Json", &[method("B", true, "1")]);
    let index = temp.path().join("index.json");
    fs::write(
        &index,
        r#"{"Packages":{"System.Runtime":{"InboxOn":{"net6.0":"6.0.0.0"}},"System.Text.Json":{}}}"#,
    )
    .unwrap();
    let out = temp.path().join("v1.csv");

    let output = exscan(&["scan", arg(&input), arg(&out), arg(&index), "--tfm", "net6.0"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(data_rows(&out).len(), 1);

    // Default moniker is net5.0, on which System.Runtime is not inbox here
    let output = exscan(&["scan", arg(&input), arg(&out), arg(&index)]);
    assert!(output.status.success());
    assert!(data_rows(&out).is_empty());
}

#[test]
fn test_cli_compare_writes_reports_and_diff() {
    let temp = TempDir::new().unwrap();
    let (v1, v2) = setup_versions(&temp);
    let out = temp.path().join("out");

    let output = exscan(&[
        "compare",
        "--baseline",
        &format!("v1={}", arg(&v1)),
        "--target",
        &format!("v2={}", arg(&v2)),
        "--out",
        arg(&out),
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(data_rows(&out.join("v1.csv")).len(), 2);
    assert_eq!(data_rows(&out.join("v2.csv")).len(), 2);
    assert_eq!(
        data_rows(&out.join("diff.csv")),
        vec!["M:N.T.B,N,T,B(),v1,2", "M:N.T.C,N,T,C(),v2,3"]
    );
}

#[test]
fn test_cli_scan_default_label_keeps_directory_name() {
    let temp = TempDir::new().unwrap();
    let input = write_version(temp.path(), "net6.0", "Lib", &[method("a", true, "1")]);
    let out = temp.path().join("o.csv");

    let output = exscan(&["scan", arg(&input), arg(&out)]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(data_rows(&out), vec!["M:N.T.a,N,T,a(),net6.0,1"]);
}

#[test]
fn test_cli_scan_with_index_inside_input_directory() {
    let temp = TempDir::new().unwrap();
    let input = write_version(temp.path(), "v1", "Lib", &[method("a", true, "1")]);
    let index = input.join("index.json");
    fs::write(&index, r#"{"Packages":{"Lib":{"InboxOn":{"net5.0":"5.0.0.0"}}}}"#).unwrap();
    let out = temp.path().join("v1.csv");

    let output = exscan(&["scan", arg(&input), arg(&out), arg(&index)]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(data_rows(&out), vec!["M:N.T.a,N,T,a(),v1,1"]);
}

#[test]
fn test_cli_compare_runs_exactly_two_passes() {
    let temp = TempDir::new().unwrap();
    let (v1, v2) = setup_versions(&temp);
    let out = temp.path().join("out");

    let output = exscan_logged(&[
        "compare",
        "--baseline",
        &format!("v1={}", arg(&v1)),
        "--target",
        &format!("v2={}", arg(&v2)),
        "--out",
        arg(&out),
    ]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("pass started").count(), 2, "stderr: {}", stderr);
    assert_eq!(
        data_rows(&out.join("v2.csv")),
        vec!["M:N.T.A,N,T,A(),v2,1", "M:N.T.C,N,T,C(),v2,3"]
    );
    assert_eq!(
        data_rows(&out.join("diff.csv")),
        vec!["M:N.T.B,N,T,B(),v1,2", "M:N.T.C,N,T,C(),v2,3"]
    );
}

#[test]
fn test_cli_redirected_stderr_has_no_colour_codes() {
    let temp = TempDir::new().unwrap();
    let (v1, _) = setup_versions(&temp);
    let out = temp.path().join("v1.csv");

    let output = exscan_logged(&["scan", arg(&v1), arg(&out)]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("pass started"), "stderr: {}", stderr);
    assert!(!stderr.contains('\u{1b}'), "stderr: {}", stderr);
}

#[test]
fn test_cli_compare_rejects_malformed_labeled_input() {
    let temp = TempDir::new().unwrap();
    let (v1, _) = setup_versions(&temp);
    let out = temp.path().join("out");

    let output = exscan(&[
        "compare",
        "--baseline",
        &format!("v1={}", arg(&v1)),
        "--target",
        "no-separator",
        "--out",
        arg(&out),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!out.join("diff.csv").exists());
}

#[test]
fn test_cli_compare_rejects_shared_label() {
    let temp = TempDir::new().unwrap();
    let (v1, v2) = setup_versions(&temp);
    let out = temp.path().join("out");

    let output = exscan(&[
        "compare",
        "--baseline",
        &format!("same={}", arg(&v1)),
        "--target",
        &format!("same={}", arg(&v2)),
        "--out",
        arg(&out),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!out.join("diff.csv").exists());
}

#[test]
fn test_cli_diff_of_written_reports() {
    let temp = TempDir::new().unwrap();
    let (v1, v2) = setup_versions(&temp);
    let a = temp.path().join("a.csv");
    let b = temp.path().join("b.csv");
    let d = temp.path().join("d.csv");

    assert!(exscan(&["scan", arg(&v1), arg(&a), "--label", "v1"]).status.success());
    assert!(exscan(&["scan", arg(&v2), arg(&b), "--label", "v2"]).status.success());
    let output = exscan(&["diff", arg(&a), arg(&b), arg(&d)]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        data_rows(&d),
        vec!["M:N.T.B,N,T,B(),v1,2", "M:N.T.C,N,T,C(),v2,3"]
    );
}

#[test]
fn test_cli_diff_malformed_report_exits_one() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a.csv");
    let b = temp.path().join("b.csv");
    fs::write(&a, format!("{}\n", HEADER)).unwrap();
    fs::write(&b, "not,a,report\n").unwrap();
    let d = temp.path().join("d.csv");

    let output = exscan(&["diff", arg(&a), arg(&b), arg(&d)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!d.exists());
}

#[cfg(unix)]
mod external_scanner {
    use super::*;

    /// Shell script that writes a fixed report to its first argument
    fn scanner_script(root: &Path, name: &str, rows: &[&str]) -> PathBuf {
        let mut body = format!("printf '%s\\n' '{}'", HEADER);
        for row in rows {
            body.push_str(&format!(" '{}'", row));
        }
        let script = root.join(name);
        fs::write(&script, format!("{} > \"$1\"\n", body)).unwrap();
        script
    }

    #[test]
    fn test_cli_compare_with_external_scanner() {
        let temp = TempDir::new().unwrap();
        // The scanner is /bin/sh; each version's "input" is the script it runs
        let v1 = scanner_script(
            temp.path(),
            "v1.sh",
            &["M:N.T.A,N,T,A(),v1,1", "M:N.T.B,N,T,B(),v1,2"],
        );
        let v2 = scanner_script(
            temp.path(),
            "v2.sh",
            &["M:N.T.A,N,T,A(),v2,1", "M:N.T.C,N,T,C(),v2,3"],
        );
        let out = temp.path().join("out");

        let output = exscan(&[
            "compare",
            "--baseline",
            &format!("v1={}", arg(&v1)),
            "--target",
            &format!("v2={}", arg(&v2)),
            "--out",
            arg(&out),
            "--scanner",
            "/bin/sh",
        ]);

        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
        assert_eq!(
            data_rows(&out.join("diff.csv")),
            vec!["M:N.T.B,N,T,B(),v1,2", "M:N.T.C,N,T,C(),v2,3"]
        );
    }

    #[test]
    fn test_cli_compare_failed_pass_writes_no_diff() {
        let temp = TempDir::new().unwrap();
        let v1 = scanner_script(temp.path(), "v1.sh", &[]);
        let v2 = temp.path().join("v2.sh");
        fs::write(&v2, "exit 7\n").unwrap();
        let out = temp.path().join("out");

        let output = exscan(&[
            "compare",
            "--baseline",
            &format!("v1={}", arg(&v1)),
            "--target",
            &format!("v2={}", arg(&v2)),
            "--out",
            arg(&out),
            "--scanner",
            "/bin/sh",
        ]);

        assert_eq!(output.status.code(), Some(1));
        assert!(out.join("v1.csv").exists());
        assert!(!out.join("diff.csv").exists());
    }
}
