//! Stage transformations for the AHCAH export pipeline.
//!
//! Three stages, each total over one table: redaction masks tracker issue
//! keys in the raw text, standardization gives every table one shape, and
//! cleaning applies the manual correction rules. All of them work on the
//! all-string nullable frames produced by `ahcah-ingest`; orchestration
//! over directories lives in the CLI crate.

pub mod clean;
pub mod datetime;
pub mod frame_utils;
pub mod redact;
pub mod standardize;

pub use clean::{CleanOutcome, clean_frame};
pub use redact::{RedactOutcome, Redactor};
pub use standardize::{
    ColumnNamer, DateMode, StandardizeOptions, StandardizeOutcome, standardize_frame,
};
