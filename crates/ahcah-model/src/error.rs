//! Error types for vocabulary parsing.

use thiserror::Error;

/// Errors raised when classifying source files or parsing vocabulary values.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A source filename did not contain a recognizable tier/kind pattern.
    #[error("unrecognized source filename: {name}")]
    UnrecognizedSource { name: String },

    /// A dataset stem (e.g. "tier-1-measures") did not parse.
    #[error("invalid dataset name: {name}")]
    InvalidDatasetName { name: String },

    /// A record kind string did not match measures or waivers.
    #[error("unknown record kind: {value}")]
    UnknownKind { value: String },

    /// A tier value was not 1 or 2.
    #[error("unknown tier: {value}")]
    UnknownTier { value: String },

    /// A schema profile string did not match legacy or current.
    #[error("unknown schema profile: {value}")]
    UnknownProfile { value: String },
}
