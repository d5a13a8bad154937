//! Report export, import and file-to-file diff

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use crate::errors::{io_error, ExError, ExScanError, Result};
use crate::model::{DocId, MemberRecord};
use crate::toggle_set::ToggleSet;
use crate::{log_op_end, log_op_error, log_op_start};

use super::atomic::atomic_write_with;
use super::csv::{parse_records, render_row};

/// Report columns, in order
pub const HEADER: [&str; 6] = ["DocId", "Namespace", "Type", "Member", "Api", "Nesting"];

/// Render records as report text, sorting them into report order
pub fn render_report<'a>(records: impl IntoIterator<Item = &'a MemberRecord>) -> String {
    let mut records: Vec<&MemberRecord> = records.into_iter().collect();
    records.sort_by(|a, b| a.report_cmp(b));

    let mut out = render_row(&HEADER);
    for r in records {
        out.push_str(&render_row(&[
            r.doc_id.as_str(),
            &r.namespace,
            &r.type_name,
            &r.signature,
            &r.version_label,
            &r.severity,
        ]));
    }
    out
}

/// Write the set's records to `path` in report order
///
/// The file is written to a sibling temp file and renamed into place, so
/// `path` never holds a partial report. Returns the number of rows written.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn export_report(set: &ToggleSet, path: &Path) -> Result<usize> {
    let start = Instant::now();
    log_op_start!("export_report", path = %path.display());

    let text = render_report(set.entries());
    match atomic_write_with(path, |w| w.write_all(text.as_bytes())) {
        Ok(()) => {
            log_op_end!(
                "export_report",
                duration_ms = start.elapsed().as_millis() as u64,
                record_count = set.len()
            );
            Ok(set.len())
        }
        Err(err) => {
            log_op_error!(
                "export_report",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

/// Parse report text into records, in file order
///
/// `source` names the report in error messages.
///
/// # Errors
///
/// Returns `Parse` if the header is missing or different, or any row does not
/// have exactly six fields or has an empty DocId.
pub fn parse_report(text: &str, source: &str) -> Result<Vec<MemberRecord>> {
    let malformed = |line: u64, reason: String| -> ExError {
        ExScanError::MalformedRow {
            path: source.to_string(),
            line,
            reason,
        }
        .into()
    };

    let records = parse_records(text).map_err(|(line, reason)| malformed(line, reason))?;
    let mut rows = records.into_iter();

    match rows.next() {
        Some(header) if header.fields == HEADER => {}
        _ => {
            return Err(ExScanError::MissingHeader {
                path: source.to_string(),
            }
            .into())
        }
    }

    rows.map(|row| {
        let line = row.line;
        let fields: [String; 6] = row.fields.try_into().map_err(|fields: Vec<String>| {
            malformed(
                line,
                format!("expected {} fields, found {}", HEADER.len(), fields.len()),
            )
        })?;
        let [doc_id, namespace, type_name, signature, version_label, severity] = fields;
        if doc_id.is_empty() {
            return Err(malformed(line, "empty DocId".to_string()));
        }
        Ok(MemberRecord::new(
            DocId::from_string(doc_id),
            namespace,
            type_name,
            signature,
            version_label,
            severity,
        ))
    })
    .collect()
}

/// Read a report file
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, `Parse` if it is malformed. No
/// records are returned from a malformed file.
pub fn import_report(path: &Path) -> Result<Vec<MemberRecord>> {
    let text = fs::read_to_string(path).map_err(|e| io_error("import_report", path, e))?;
    parse_report(&text, &path.display().to_string())
}

/// Re-derive the difference between two earlier reports
///
/// Baseline rows are added (a repeated DocId is fatal); target rows clear a
/// matching baseline entry or are recorded as new. Rows carry their own
/// version labels, so the result can be exported directly.
///
/// # Errors
///
/// Returns `Io`/`Parse` from either import, or `DuplicateKey` if a DocId
/// repeats within one file.
pub fn diff_files(baseline: &Path, target: &Path) -> Result<ToggleSet> {
    let start = Instant::now();
    log_op_start!(
        "diff_files",
        baseline = %baseline.display(),
        target = %target.display()
    );

    let result = import_report(baseline)
        .and_then(|b| Ok((b, import_report(target)?)))
        .and_then(|(b, t)| diff_reports(b, t));
    match result {
        Ok(set) => {
            log_op_end!(
                "diff_files",
                duration_ms = start.elapsed().as_millis() as u64,
                record_count = set.len()
            );
            Ok(set)
        }
        Err(err) => {
            log_op_error!(
                "diff_files",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

/// Toggle protocol over two already-filtered record lists
///
/// # Errors
///
/// Returns `DuplicateKey` if a DocId repeats within one list.
pub fn diff_reports(baseline: Vec<MemberRecord>, target: Vec<MemberRecord>) -> Result<ToggleSet> {
    let mut set = ToggleSet::new();
    for record in baseline {
        set.add(record).map_err(|e| e.with_op("diff_baseline"))?;
    }

    let mut seen = std::collections::HashSet::new();
    for record in target {
        if !seen.insert(record.doc_id.clone()) {
            return Err(ExError::from(ExScanError::DuplicateKey {
                doc_id: record.doc_id.to_string(),
            })
            .with_op("diff_target"));
        }
        set.toggle(record);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

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
    fn test_render_report_header_and_order() {
        let b = record("System.IO", "File", "Delete(System.String)", "v1");
        let a = record("System", "Convert", "ToInt32(System.String)", "v1");
        let text = render_report([&b, &a]);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "DocId,Namespace,Type,Member,Api,Nesting");
        assert!(lines[1].starts_with("M:System.Convert."));
        assert!(lines[2].starts_with("M:System.IO.File."));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_render_quotes_signatures_with_commas() {
        let r = record("N", "T", "M(System.Int32, System.Int32)", "v1");
        let text = render_report([&r]);
        assert!(text.contains(",\"M(System.Int32, System.Int32)\","));
    }

    #[test]
    fn test_parse_report_reads_rows_positionally() {
        let text = "DocId,Namespace,Type,Member,Api,Nesting\nM:N.T.m,N,T,m(),v2,3\n";
        let rows = parse_report(text, "mem").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].doc_id.as_str(), "M:N.T.m");
        assert_eq!(rows[0].signature, "m()");
        assert_eq!(rows[0].version_label, "v2");
        assert_eq!(rows[0].severity, "3");
    }

    #[test]
    fn test_parse_report_requires_header() {
        let err = parse_report("M:N.T.m,N,T,m,v1,1\n", "mem").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Parse);

        let err = parse_report("", "mem").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Parse);
    }

    #[test]
    fn test_parse_report_rejects_short_row_with_line() {
        let text = "DocId,Namespace,Type,Member,Api,Nesting\nM:N.T.a,N,T,a,v1,1\nM:N.T.b,N,T\n";
        let err = parse_report(text, "r.csv").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Parse);
        assert_eq!(err.line(), Some(3));
        assert!(err.message().contains("found 3"));
    }

    #[test]
    fn test_parse_report_rejects_empty_doc_id() {
        let text = "DocId,Namespace,Type,Member,Api,Nesting\n,N,T,a,v1,1\n";
        let err = parse_report(text, "r.csv").unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_diff_reports_toggles() {
        let baseline = vec![record("N", "T", "a", "v1"), record("N", "T", "b", "v1")];
        let target = vec![record("N", "T", "a", "v2"), record("N", "T", "c", "v2")];

        let set = diff_reports(baseline, target).unwrap();
        let rows: Vec<(String, String)> = set
            .into_sorted()
            .into_iter()
            .map(|r| (r.signature, r.version_label))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("b".to_string(), "v1".to_string()),
                ("c".to_string(), "v2".to_string())
            ]
        );
    }

    #[test]
    fn test_diff_reports_duplicate_in_either_list_is_fatal() {
        let dup = vec![record("N", "T", "a", "v1"), record("N", "T", "a", "v1")];
        let err = diff_reports(dup.clone(), vec![]).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::DuplicateKey);

        let err = diff_reports(vec![], dup).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::DuplicateKey);
        assert_eq!(err.op(), Some("diff_target"));
    }
}
