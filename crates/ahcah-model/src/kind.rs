//! Record kind: measures vs. waivers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// The two record families the tracking system exports.
///
/// A **measure** row tracks a reporting requirement a hospital may be
/// exempted from for a period; a **waiver** row tracks an approved exception
/// to measure reporting. The cleaner branches on this value, so it is a
/// typed enum rather than a string carried through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Measures,
    Waivers,
}

impl RecordKind {
    /// Returns the plural, lowercase form used in destination filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Measures => "measures",
            RecordKind::Waivers => "waivers",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ModelError;

    /// Parse a kind token. Source filenames use "Measure"/"Measures" and
    /// "Waiver"/"Waivers" in mixed case; both singular and plural accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "measure" | "measures" => Ok(RecordKind::Measures),
            "waiver" | "waivers" => Ok(RecordKind::Waivers),
            _ => Err(ModelError::UnknownKind {
                value: s.to_string(),
            }),
        }
    }
}
