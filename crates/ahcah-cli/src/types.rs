//! Typed results for the pipeline stages.
//!
//! Each stage returns one result value: per-file summaries for the table,
//! the files it skipped, and the errors it accumulated. Per-file errors
//! never abort a stage; they surface here and drive the exit code.

use std::path::PathBuf;

use ahcah_model::RecordKind;

/// Result of the redaction stage.
#[derive(Debug, Default)]
pub struct RedactResult {
    pub files: Vec<RedactFileSummary>,
    pub errors: Vec<String>,
}

/// One raw export, redacted.
#[derive(Debug)]
pub struct RedactFileSummary {
    pub source: String,
    /// Identifier occurrences masked.
    pub masked: usize,
    /// Destination path; None on a dry run.
    pub output: Option<PathBuf>,
}

/// Result of the standardization stage.
#[derive(Debug, Default)]
pub struct StandardizeResult {
    pub files: Vec<StandardizeFileSummary>,
    /// Files whose names did not classify as a dataset.
    pub skipped: Vec<String>,
    pub errors: Vec<String>,
}

/// One redacted export, standardized.
#[derive(Debug)]
pub struct StandardizeFileSummary {
    pub source: String,
    /// Canonical dataset stem, e.g. `tier-1-measures`.
    pub dataset: String,
    pub rows_in: usize,
    pub rows_out: usize,
    pub missing_ccn: usize,
    pub testing_excluded: usize,
    pub date_nulls: usize,
    pub output: Option<PathBuf>,
}

/// Result of the cleaning stage.
#[derive(Debug, Default)]
pub struct CleanResult {
    pub files: Vec<CleanFileSummary>,
    /// Files whose stems did not parse as a dataset name.
    pub skipped: Vec<String>,
    pub errors: Vec<String>,
}

/// One standardized table, cleaned.
#[derive(Debug)]
pub struct CleanFileSummary {
    pub dataset: String,
    pub kind: RecordKind,
    pub rows_in: usize,
    pub rows_out: usize,
    pub excluded: usize,
    pub duplicate_status: usize,
    pub deduped: usize,
    pub output: Option<PathBuf>,
}

/// Results of a full three-stage run.
#[derive(Debug)]
pub struct RunResult {
    pub redact: RedactResult,
    pub standardize: StandardizeResult,
    pub clean: CleanResult,
}

impl RedactResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl StandardizeResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl CleanResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        self.redact.has_errors() || self.standardize.has_errors() || self.clean.has_errors()
    }
}
