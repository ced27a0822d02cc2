//! Canonical column vocabulary for standardized tables.
//!
//! Everything downstream of the standardizer addresses columns by these
//! names. The raw-side constants (`Custom field` wrapper, issue-column
//! prefixes) describe the export's own conventions and are matched against
//! pre-rename column names.

/// The hospital identifier column (CMS Certification Number). The sole
/// admission requirement of the standardizer: rows without it are dropped.
pub const CCN: &str = "ccn";

/// The hospital display-name column.
pub const HOSPITAL_NAME: &str = "hospital_name";

/// Human-readable summary text carried from the tracking system.
pub const SUMMARY: &str = "summary";

/// Tracking status column ("Duplicate" rows are removed by the cleaner).
pub const STATUS: &str = "status";

/// Record-creation timestamp column (newer export variant only).
pub const CREATED: &str = "created";

/// Substring marking a column as a date (`measure_from_date`, `poc_date`, ...).
pub const DATE_COLUMN_MARKER: &str = "_date";

/// Suffix of the flattened issue-list columns the cleaner removes.
pub const ISSUES_COLUMN_SUFFIX: &str = "_issues";

/// Wrapper the tracking system puts around user-defined columns.
pub const CUSTOM_FIELD_PREFIX: &str = "Custom field (";
pub const CUSTOM_FIELD_SUFFIX: &str = ")";

/// Measure-response columns arrive as "<token>. <description>" where the
/// token is 1-3 digits with an optional a-c suffix; they collapse to
/// `m_<token>`. The capture group is the token.
pub const MEASURE_COLUMN_PATTERN: &str = r"^(\d{1,3}[a-c]?)\..*$";
pub const MEASURE_COLUMN_PREFIX: &str = "m_";

/// Pre-rename prefixes of the grouped issue-link columns (older variant).
pub const OUTWARD_ISSUE_PREFIX: &str = "Outward issue";
pub const INWARD_ISSUE_PREFIX: &str = "Inward issue";

/// Flattened issue-list column names.
pub const OUTWARD_ISSUES: &str = "outward_issues";
pub const INWARD_ISSUES: &str = "inward_issues";

/// Separator glyph joining the distinct issue values of one row.
pub const ISSUE_SEPARATOR: &str = " \u{2022} ";

/// Summary prefix flagging test rows in the older export variant.
pub const TESTING_SUMMARY_PREFIX: &str = "Testing";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_separator_is_bulleted() {
        assert_eq!(ISSUE_SEPARATOR, " \u{2022} ");
        assert_eq!(ISSUE_SEPARATOR.chars().count(), 3);
    }
}
