//! Tabular report codec
//!
//! Reports are CSV files with the fixed header
//! `DocId,Namespace,Type,Member,Api,Nesting`, one row per flagged member,
//! rows in [`MemberRecord::report_cmp`](crate::model::MemberRecord::report_cmp)
//! order. `Api` carries the version label and `Nesting` the severity.
//!
//! - [`export_report`] writes a set atomically (no partial file on failure)
//! - [`import_report`] parses a report; any malformed row fails the import
//! - [`diff_files`] re-derives a difference from two earlier reports

pub mod atomic;
pub mod csv;
pub mod report;

pub use report::{
    diff_files, diff_reports, export_report, import_report, parse_report, render_report, HEADER,
};
