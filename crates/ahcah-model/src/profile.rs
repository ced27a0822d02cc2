//! Schema profiles for the two export format generations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Which generation of the export format a file follows.
///
/// The tracking system's export schema drifted over time. The older variant
/// spreads linked issues over repeated "Outward issue"/"Inward issue"
/// columns, carries `poc_` plan-of-correction columns, and includes test
/// rows flagged by a "Testing" summary prefix. The newer variant drops all
/// of that and instead carries `created`/`status` bookkeeping columns with a
/// timestamped `created` value.
///
/// The profile is an explicit input flag; the standardizer never guesses it
/// from filenames, so a run's behavior is auditable from its invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaProfile {
    /// Older export variant: issue-column flattening, "Testing" row
    /// exclusion, and `poc_`/`_issues` ordering buckets apply.
    #[default]
    Legacy,
    /// Newer export variant: created/status ordering bucket and `created`
    /// timestamp parsing apply.
    Current,
}

impl SchemaProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaProfile::Legacy => "legacy",
            SchemaProfile::Current => "current",
        }
    }

    /// True for the older export variant.
    pub fn is_legacy(&self) -> bool {
        matches!(self, SchemaProfile::Legacy)
    }
}

impl fmt::Display for SchemaProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SchemaProfile {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" | "older" => Ok(SchemaProfile::Legacy),
            "current" | "newer" => Ok(SchemaProfile::Current),
            _ => Err(ModelError::UnknownProfile {
                value: s.to_string(),
            }),
        }
    }
}
