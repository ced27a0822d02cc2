//! Library components of the AHCAH pipeline CLI.
//!
//! The stage orchestration lives here rather than in the binary so the
//! integration tests can drive a whole run in-process.

pub mod logging;
pub mod pipeline;
pub mod types;
