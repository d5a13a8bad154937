//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Scan identifiers
pub const FIELD_PASS: &str = "pass";
pub const FIELD_VERSION_LABEL: &str = "version_label";
pub const FIELD_ASSEMBLY: &str = "assembly";
pub const FIELD_DOC_ID: &str = "doc_id";
pub const FIELD_TFM: &str = "tfm";

// Collection sizes
pub const FIELD_ASSEMBLY_COUNT: &str = "assembly_count";
pub const FIELD_RECORD_COUNT: &str = "record_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Scan progress event names
pub const EVENT_ASSEMBLY_SKIPPED: &str = "assembly_skipped";
pub const EVENT_ASSEMBLY_SCANNED: &str = "assembly_scanned";
pub const EVENT_MEMBER_SKIPPED: &str = "member_skipped";
pub const EVENT_MEMBER_RECORDED: &str = "member_recorded";
pub const EVENT_MEMBER_CLEARED: &str = "member_cleared";
