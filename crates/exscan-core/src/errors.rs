use exscan_core_types::RunId;
use std::path::Path;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and the CLI's error output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Usage
    InvalidInput,
    InputNotFound,

    // Scanning
    /// The throw classifier failed on a single member (recoverable, member skipped)
    Classification,
    /// The same DocId was observed twice within one pass
    DuplicateKey,

    // Tabular codec
    /// A report file is malformed (bad header, wrong column count, empty DocId)
    Parse,

    // Integration/IO
    Io,
    Serialization,
    /// The external per-module scanner could not be started or exited non-zero
    ExternalService,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InputNotFound => "ERR_INPUT_NOT_FOUND",
            ExErrorKind::Classification => "ERR_CLASSIFICATION",
            ExErrorKind::DuplicateKey => "ERR_DUPLICATE_KEY",
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether a pass may continue after an error of this kind
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ExErrorKind::Classification)
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling plus the context
/// (operation, member, file position) needed to debug a failed run.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    doc_id: Option<String>,
    path: Option<String>,
    line: Option<u64>,
    run_id: Option<RunId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            doc_id: None,
            path: None,
            line: None,
            run_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add DocId context
    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().display().to_string());
        self
    }

    /// Add 1-based line number context
    pub fn with_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    /// Add run ID context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn line(&self) -> Option<u64> {
        self.line
    }

    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            match self.line {
                Some(line) => write!(f, " ({}:{})", path, line)?,
                None => write!(f, " ({})", path)?,
            }
        }
        if let Some(doc_id) = &self.doc_id {
            write!(f, " (doc_id: {})", doc_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, ": caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain failures raised by the differencing engine and its collaborators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExScanError {
    /// A DocId was observed twice within the same pass (upstream identity bug)
    #[error("Duplicate DocId within a single pass: {doc_id}")]
    DuplicateKey { doc_id: String },

    /// Input path is neither a file nor a directory
    #[error("'{path}' must be a file or directory")]
    InputNotFound { path: String },

    /// The classifier could not decide whether a member throws
    #[error("Failed to classify {doc_id}: {reason}")]
    ClassificationFailed { doc_id: String, reason: String },

    /// Report file does not start with the expected header row
    #[error("Report {path} has no valid header row")]
    MissingHeader { path: String },

    /// A report row could not be parsed
    #[error("Malformed row at {path}:{line}: {reason}")]
    MalformedRow {
        path: String,
        line: u64,
        reason: String,
    },

    /// Inbox index JSON could not be decoded
    #[error("Invalid inbox index {path}: {reason}")]
    InvalidIndex { path: String, reason: String },

    /// Member metadata dump could not be decoded
    #[error("Invalid metadata dump {path}: {reason}")]
    InvalidDump { path: String, reason: String },

    /// A `label=path` argument could not be split
    #[error("Invalid labeled input '{input}': expected <label>=<path>")]
    InvalidLabeledInput { input: String },

    /// The external scanner executable does not exist
    #[error("Scanner executable not found at: {path}")]
    ScannerNotFound { path: String },

    /// The external scanner exited unsuccessfully
    #[error("Scanner pass '{label}' failed with exit code {code:?}")]
    ScannerFailed { label: String, code: Option<i32> },
}

impl From<ExScanError> for ExError {
    fn from(err: ExScanError) -> Self {
        match err {
            ExScanError::DuplicateKey { doc_id } => ExError::new(ExErrorKind::DuplicateKey)
                .with_doc_id(doc_id)
                .with_message("DocId observed twice within a single pass"),

            ExScanError::InputNotFound { path } => ExError::new(ExErrorKind::InputNotFound)
                .with_message(format!("'{}' must be a file or directory", path)),

            ExScanError::ClassificationFailed { doc_id, reason } => {
                ExError::new(ExErrorKind::Classification)
                    .with_op("classify")
                    .with_doc_id(doc_id)
                    .with_message(reason)
            }

            ExScanError::MissingHeader { path } => ExError::new(ExErrorKind::Parse)
                .with_op("import_report")
                .with_path(path)
                .with_message("missing or unexpected header row"),

            ExScanError::MalformedRow { path, line, reason } => ExError::new(ExErrorKind::Parse)
                .with_op("import_report")
                .with_path(path)
                .with_line(line)
                .with_message(reason),

            ExScanError::InvalidIndex { path, reason } => {
                ExError::new(ExErrorKind::Serialization)
                    .with_op("load_inbox_index")
                    .with_path(path)
                    .with_message(reason)
            }

            ExScanError::InvalidDump { path, reason } => ExError::new(ExErrorKind::Serialization)
                .with_op("load_metadata_dump")
                .with_path(path)
                .with_message(reason),

            ExScanError::InvalidLabeledInput { input } => ExError::new(ExErrorKind::InvalidInput)
                .with_message(format!("expected <label>=<path>, got '{}'", input)),

            ExScanError::ScannerNotFound { path } => ExError::new(ExErrorKind::ExternalService)
                .with_op("run_scanner")
                .with_path(path)
                .with_message("scanner executable not found"),

            ExScanError::ScannerFailed { label, code } => {
                let status = code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                ExError::new(ExErrorKind::ExternalService)
                    .with_op("run_scanner")
                    .with_message(format!("pass '{}' exited with {}", label, status))
            }
        }
    }
}

/// Create an IO error for the given operation and path
pub fn io_error(op: &str, path: impl AsRef<Path>, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(op.to_string())
        .with_path(path)
        .with_message(err.to_string())
}
