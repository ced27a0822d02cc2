//! Static configuration for the AHCAH export pipeline.
//!
//! Everything here has lifecycle "load once at startup, read-only
//! thereafter": the CSV-backed column-rename lookup, the cleaner's
//! correction rules, the source-file conventions (redaction pattern,
//! two-block split), the canonical column vocabulary, and the stage
//! directory layout. Transformation code receives these by reference and
//! never mutates them.

pub mod corrections;
pub mod error;
pub mod layout;
pub mod renames;
pub mod schema;
pub mod sources;

pub use corrections::CorrectionTable;
pub use error::TablesError;
pub use layout::DataLayout;
pub use renames::RenameTable;
