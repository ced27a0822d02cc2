//! Manual correction rules applied by the cleaner.
//!
//! These encode upstream data-entry findings: misspelled or renamed
//! facilities, waiver rows filed against the wrong CCN, and the composite
//! key the measures table deduplicates on. They change only when the data
//! owners document a new finding.

/// Literal hospital-name substitutions (exact cell match).
///
/// Huntsman merged its listing under the University of Utah Health name;
/// "Las Clinas" is a recurring misspelling of Las Colinas.
pub const HOSPITAL_NAME_FIXES: [(&str, &str); 2] = [
    (
        "Huntsman Cancer Hospital",
        "University of Utah Health and Huntsman Cancer Institute",
    ),
    ("Medical City Las Clinas", "Medical City Las Colinas"),
];

/// Waiver rows removed by CCN.
///
/// 380051 was filed for Salem Medical Center and 330195 for North Shore
/// University Hospital; both were confirmed upstream as data-entry errors.
pub const EXCLUDED_WAIVER_CCNS: [&str; 2] = ["380051", "330195"];

/// Status value marking a row the tracking system itself flagged as a
/// duplicate filing.
pub const DUPLICATE_STATUS: &str = "Duplicate";

/// Composite key for measures deduplication; first occurrence wins.
pub const MEASURE_DEDUPE_KEY: [&str; 3] = ["ccn", "hospital_name", "measure_from_date"];

/// Administrative columns dropped from cleaned measures tables.
pub const MEASURE_DROP_COLUMNS: [&str; 4] = ["issue_type", "priority", "reporter", "summary"];

/// The cleaner's correction rules as one read-only structure.
///
/// Constructed once at startup from the built-in rules and passed by
/// reference into the cleaning functions.
#[derive(Debug, Clone)]
pub struct CorrectionTable {
    pub hospital_name_fixes: Vec<(String, String)>,
    pub excluded_waiver_ccns: Vec<String>,
    pub duplicate_status: String,
    pub measure_dedupe_key: Vec<String>,
    pub measure_drop_columns: Vec<String>,
}

impl CorrectionTable {
    /// The rules shipped with the pipeline.
    pub fn builtin() -> Self {
        Self {
            hospital_name_fixes: HOSPITAL_NAME_FIXES
                .iter()
                .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
                .collect(),
            excluded_waiver_ccns: EXCLUDED_WAIVER_CCNS
                .iter()
                .map(|ccn| (*ccn).to_string())
                .collect(),
            duplicate_status: DUPLICATE_STATUS.to_string(),
            measure_dedupe_key: MEASURE_DEDUPE_KEY
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            measure_drop_columns: MEASURE_DROP_COLUMNS
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
        }
    }
}

impl Default for CorrectionTable {
    fn default() -> Self {
        Self::builtin()
    }
}
