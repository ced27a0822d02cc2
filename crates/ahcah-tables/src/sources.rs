//! Conventions of the raw source exports.

/// Prefix of the tracking identifiers redacted out of raw files.
pub const REDACTION_PREFIX: &str = "AHCAH";

/// Mask substituted for the digits of a redacted identifier.
pub const REDACTION_MASK: &str = "***";

/// A source export known to contain two physically concatenated tables.
///
/// This is input-format-specific data, not generalized logic: the split
/// index depends on the exact shape of one shipped file and nothing else
/// consults it.
#[derive(Debug, Clone, Copy)]
pub struct SplitSource {
    /// Substring of the source filename this rule applies to.
    pub filename_token: &'static str,
    /// 0-based CSV record index of the second block's header row, counting
    /// the first block's header as record 0.
    pub second_header_record: usize,
}

/// The "Tier 1 Measures" export carries a footer block and then a second
/// header-delimited table beginning at record 1001.
pub const SPLIT_SOURCES: [SplitSource; 1] = [SplitSource {
    filename_token: "Tier 1 Measures",
    second_header_record: 1001,
}];

/// Returns the record index where `file_name` must be split, if any.
pub fn split_point_for(file_name: &str) -> Option<usize> {
    SPLIT_SOURCES
        .iter()
        .find(|rule| file_name.contains(rule.filename_token))
        .map(|rule| rule.second_header_record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_point_matches_token() {
        assert_eq!(
            split_point_for("FOIA - Tier 1 Measures (QualityNet JIRA) 2023-04-19.csv"),
            Some(1001)
        );
        assert_eq!(split_point_for("FOIA - Tier 2 Measures.csv"), None);
        assert_eq!(split_point_for("FOIA - Tier 1 Waivers.csv"), None);
    }
}
