//! Core vocabulary for the AHCAH measure/waiver export pipeline.
//!
//! The tracking system exports one CSV per (tier, record kind) pair. These
//! types give the pipeline a shared, typed vocabulary for classifying source
//! files and naming destination files, so the stages never pass raw strings
//! around.

pub mod dataset;
pub mod error;
pub mod kind;
pub mod profile;
pub mod tier;

pub use dataset::DatasetName;
pub use error::ModelError;
pub use kind::RecordKind;
pub use profile::SchemaProfile;
pub use tier::Tier;
