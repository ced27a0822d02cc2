//! Dataset naming: classify source files, name destination files.
//!
//! Source exports arrive with verbose names like
//! `FOIA - Tier 1 Measures (QualityNet JIRA) 2023-04-19.csv`. Every pipeline
//! stage after redaction writes the dataset under its canonical stem,
//! `tier-1-measures`, so downstream stages (and consumers) address files by
//! what they contain rather than by the export's naming whims.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::kind::RecordKind;
use crate::tier::Tier;

/// A (tier, kind) pair identifying one exported dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DatasetName {
    pub tier: Tier,
    pub kind: RecordKind,
}

impl DatasetName {
    pub fn new(tier: Tier, kind: RecordKind) -> Self {
        Self { tier, kind }
    }

    /// Classify a source filename by scanning its tokens.
    ///
    /// Looks for a "Tier" token followed by a tier number, and any token that
    /// reads as a record kind (singular or plural, mixed case, possibly
    /// wrapped in punctuation). Both must be present; anything else is
    /// unrecognized and the caller decides whether to skip or fail.
    pub fn from_source_filename(name: &str) -> Result<Self, ModelError> {
        let base = match name.rfind('.') {
            Some(idx) if name[idx + 1..].eq_ignore_ascii_case("csv") => &name[..idx],
            _ => name,
        };
        let tokens: Vec<&str> = base.split_whitespace().collect();
        let mut tier = None;
        let mut kind = None;
        for (idx, token) in tokens.iter().enumerate() {
            let word = token.trim_matches(|ch: char| !ch.is_ascii_alphanumeric());
            if word.eq_ignore_ascii_case("tier") {
                if tier.is_none()
                    && let Some(next) = tokens.get(idx + 1)
                {
                    let number = next.trim_matches(|ch: char| !ch.is_ascii_alphanumeric());
                    tier = number.parse::<Tier>().ok();
                }
                continue;
            }
            if kind.is_none() {
                kind = word.parse::<RecordKind>().ok();
            }
        }
        match (tier, kind) {
            (Some(tier), Some(kind)) => Ok(Self { tier, kind }),
            _ => Err(ModelError::UnrecognizedSource {
                name: name.to_string(),
            }),
        }
    }

    /// Canonical destination stem, e.g. `tier-1-measures`.
    pub fn file_stem(&self) -> String {
        self.to_string()
    }

    /// Canonical destination filename, e.g. `tier-1-measures.csv`.
    pub fn output_filename(&self) -> String {
        format!("{self}.csv")
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tier-{}-{}", self.tier, self.kind)
    }
}

impl FromStr for DatasetName {
    type Err = ModelError;

    /// Parse a canonical stem (`tier-1-measures`). Used by the cleaner to
    /// recover the record kind from standardized filenames.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidDatasetName {
            name: s.to_string(),
        };
        let mut parts = s.trim().splitn(3, '-');
        let (Some(label), Some(number), Some(kind)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if !label.eq_ignore_ascii_case("tier") {
            return Err(invalid());
        }
        let tier = number.parse::<Tier>().map_err(|_| invalid())?;
        let kind = kind.parse::<RecordKind>().map_err(|_| invalid())?;
        Ok(Self { tier, kind })
    }
}
