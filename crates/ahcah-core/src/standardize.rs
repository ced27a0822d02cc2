//! Column standardization for redacted export tables.
//!
//! One standardized table looks the same no matter which export generation
//! produced it: canonical snake_case column names, a stable column order,
//! ISO dates, and only rows that carry a CCN. The operations run in a fixed
//! order per table:
//!
//! 1. Flatten the repeated issue-link columns (legacy profile)
//! 2. Rename every column to its canonical form
//! 3. Reorder columns
//! 4. Drop "Testing" rows (legacy profile)
//! 5. Drop rows without a CCN
//! 6. Parse date columns
//!
//! Two-block exports run this per block; the blocks concatenate afterwards.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result, bail};
use polars::prelude::*;
use regex::Regex;
use tracing::{debug, warn};

use ahcah_model::SchemaProfile;
use ahcah_tables::RenameTable;
use ahcah_tables::schema;

use crate::datetime;
use crate::frame_utils::{column_values, filter_rows};

/// How unparseable date values are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateMode {
    /// Fail the file on the first bad value.
    #[default]
    Strict,
    /// Null the value and log a warning per occurrence.
    Lenient,
}

/// Per-run standardization inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardizeOptions {
    pub profile: SchemaProfile,
    pub date_mode: DateMode,
}

/// Row accounting for one standardized table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardizeOutcome {
    pub rows_in: usize,
    pub rows_out: usize,
    /// Rows dropped for a null or blank `ccn`.
    pub missing_ccn: usize,
    /// Rows dropped for a "Testing" summary (legacy profile).
    pub testing_excluded: usize,
    /// Date cells nulled in lenient mode.
    pub date_nulls: usize,
}

impl StandardizeOutcome {
    /// Folds another block's accounting into this one.
    pub fn merge(&mut self, other: StandardizeOutcome) {
        self.rows_in += other.rows_in;
        self.rows_out += other.rows_out;
        self.missing_ccn += other.missing_ccn;
        self.testing_excluded += other.testing_excluded;
        self.date_nulls += other.date_nulls;
    }
}

/// Rewrites raw export column names to their canonical snake_case form.
///
/// The cascade: strip the `Custom field (`…`)` wrapper, apply the manual
/// rename table, collapse measure-response names ("14a. Measure Response")
/// to `m_<token>`, then lowercase and replace spaces with underscores.
/// Canonical names are a fixpoint of the cascade.
pub struct ColumnNamer<'a> {
    renames: &'a RenameTable,
    measure: Regex,
}

impl<'a> ColumnNamer<'a> {
    pub fn new(renames: &'a RenameTable) -> Result<Self> {
        let measure = Regex::new(schema::MEASURE_COLUMN_PATTERN)
            .context("compile measure column pattern")?;
        Ok(Self { renames, measure })
    }

    /// The canonical form of one raw header.
    pub fn canonical(&self, raw: &str) -> String {
        let mut name = raw.to_string();
        if let Some(inner) = name
            .strip_prefix(schema::CUSTOM_FIELD_PREFIX)
            .and_then(|rest| rest.strip_suffix(schema::CUSTOM_FIELD_SUFFIX))
        {
            name = inner.to_string();
        }
        if let Some(renamed) = self.renames.get(&name) {
            name = renamed.to_string();
        }
        if let Some(captures) = self.measure.captures(&name) {
            name = format!("{}{}", schema::MEASURE_COLUMN_PREFIX, &captures[1]);
        }
        name.to_lowercase().replace(' ', "_")
    }
}

/// Standardizes one table (one physical block of one export file).
pub fn standardize_frame(
    df: DataFrame,
    renames: &RenameTable,
    options: &StandardizeOptions,
) -> Result<(DataFrame, StandardizeOutcome)> {
    let mut outcome = StandardizeOutcome {
        rows_in: df.height(),
        ..StandardizeOutcome::default()
    };
    let mut df = df;
    if options.profile.is_legacy() {
        df = flatten_issue_columns(df, schema::OUTWARD_ISSUE_PREFIX, schema::OUTWARD_ISSUES)?;
        df = flatten_issue_columns(df, schema::INWARD_ISSUE_PREFIX, schema::INWARD_ISSUES)?;
    }
    df = rename_columns(df, renames)?;
    df = order_columns(&df, options.profile)?;
    if options.profile.is_legacy() {
        let (filtered, dropped) = exclude_testing_rows(&df)?;
        df = filtered;
        outcome.testing_excluded = dropped;
    }
    let (filtered, dropped) = require_ccn(&df)?;
    df = filtered;
    outcome.missing_ccn = dropped;
    let (parsed, nulled) = parse_date_columns(df, options)?;
    df = parsed;
    outcome.date_nulls = nulled;
    outcome.rows_out = df.height();
    Ok((df, outcome))
}

/// Merges the repeated issue-link columns into one bulleted list column.
///
/// Per row, the distinct non-blank values across every matching source
/// column, sorted and joined with the bullet separator. The target column
/// is emitted even when no source matched, so legacy tables keep a stable
/// shape downstream. Source columns drop afterwards.
fn flatten_issue_columns(
    mut df: DataFrame,
    source_marker: &str,
    target: &str,
) -> Result<DataFrame> {
    let sources: Vec<String> = df
        .get_column_names()
        .iter()
        .filter(|name| name.contains(source_marker))
        .map(|name| name.as_str().to_string())
        .collect();
    let source_values = sources
        .iter()
        .map(|name| column_values(&df, name))
        .collect::<PolarsResult<Vec<_>>>()?;
    let mut merged: Vec<Option<String>> = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut distinct = BTreeSet::new();
        for values in &source_values {
            if let Some(value) = &values[idx]
                && !value.trim().is_empty()
            {
                distinct.insert(value.clone());
            }
        }
        if distinct.is_empty() {
            merged.push(None);
        } else {
            let values: Vec<String> = distinct.into_iter().collect();
            merged.push(Some(values.join(schema::ISSUE_SEPARATOR)));
        }
    }
    if !sources.is_empty() {
        debug!(column = target, sources = sources.len(), "flattening issue columns");
        df = df.drop_many(sources.iter().map(String::as_str));
    }
    df.with_column(Series::new(target.into(), merged))?;
    Ok(df)
}

/// Applies the naming cascade to every column, failing on collisions.
fn rename_columns(mut df: DataFrame, renames: &RenameTable) -> Result<DataFrame> {
    let namer = ColumnNamer::new(renames)?;
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    let mut canonicals = Vec::with_capacity(df.width());
    for name in df.get_column_names() {
        let original = name.as_str();
        let canonical = namer.canonical(original);
        if let Some(earlier) = seen.get(&canonical) {
            bail!("columns {earlier:?} and {original:?} both standardize to {canonical:?}");
        }
        seen.insert(canonical.clone(), original.to_string());
        canonicals.push(canonical);
    }
    df.set_column_names(canonicals)?;
    Ok(df)
}

/// The priority bucket a canonical name sorts into: identity columns first,
/// dates and measure responses in the middle, bookkeeping last.
fn sort_priority(name: &str, profile: SchemaProfile) -> u8 {
    if name.starts_with(schema::CCN) {
        0
    } else if name.starts_with(schema::HOSPITAL_NAME) {
        10
    } else if name.starts_with("hospital_phone") {
        19
    } else if name.starts_with("hospital") {
        11
    } else if profile == SchemaProfile::Current
        && (name.contains(schema::CREATED) || name.contains(schema::STATUS))
    {
        20
    } else if name.ends_with(schema::DATE_COLUMN_MARKER) {
        30
    } else if name.starts_with(schema::MEASURE_COLUMN_PREFIX)
        || name.starts_with("measure")
        || name.starts_with("resp_")
    {
        40
    } else if profile.is_legacy() && name.starts_with("poc_") {
        90
    } else if profile.is_legacy() && name.contains(schema::ISSUES_COLUMN_SUFFIX) {
        100
    } else {
        50
    }
}

/// Reorders columns by (priority bucket, name). The tie-break on the name
/// itself makes the order a function of the column set alone, never of the
/// order the export happened to use.
fn order_columns(df: &DataFrame, profile: SchemaProfile) -> Result<DataFrame> {
    let mut names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.as_str().to_string())
        .collect();
    names.sort_by_key(|name| (sort_priority(name, profile), name.clone()));
    Ok(df.select(names)?)
}

/// Drops legacy test rows, flagged by a summary starting with "Testing".
/// Null summaries are kept.
fn exclude_testing_rows(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let Ok(values) = column_values(df, schema::SUMMARY) else {
        bail!("legacy table has no {:?} column", schema::SUMMARY);
    };
    let keep: Vec<bool> = values
        .iter()
        .map(|value| match value.as_deref() {
            Some(text) => !text.starts_with(schema::TESTING_SUMMARY_PREFIX),
            None => true,
        })
        .collect();
    let dropped = keep.iter().filter(|&&kept| !kept).count();
    Ok((filter_rows(df, &keep)?, dropped))
}

/// Drops rows without a CCN. A table that never had the column is broken
/// input, not a row-level condition, and fails the file.
fn require_ccn(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let Ok(values) = column_values(df, schema::CCN) else {
        bail!("table has no {:?} column after renaming", schema::CCN);
    };
    let keep: Vec<bool> = values
        .iter()
        .map(|value| {
            value
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
        })
        .collect();
    let dropped = keep.iter().filter(|&&kept| !kept).count();
    Ok((filter_rows(df, &keep)?, dropped))
}

/// Rewrites export-format date columns as ISO text. Every column whose name
/// contains `_date` parses as a calendar date; in the current profile the
/// `created` column parses as a timestamp.
fn parse_date_columns(
    mut df: DataFrame,
    options: &StandardizeOptions,
) -> Result<(DataFrame, usize)> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.as_str().to_string())
        .collect();
    let mut nulled = 0usize;
    for name in &names {
        if name.contains(schema::DATE_COLUMN_MARKER) {
            nulled += rewrite_date_column(&mut df, name, options.date_mode, parse_date_value)?;
        } else if options.profile == SchemaProfile::Current && name == schema::CREATED {
            nulled += rewrite_date_column(&mut df, name, options.date_mode, parse_datetime_value)?;
        }
    }
    Ok((df, nulled))
}

fn parse_date_value(value: &str) -> Result<String, chrono::ParseError> {
    datetime::parse_export_date(value).map(datetime::iso_date)
}

fn parse_datetime_value(value: &str) -> Result<String, chrono::ParseError> {
    datetime::parse_export_datetime(value).map(datetime::iso_datetime)
}

fn rewrite_date_column(
    df: &mut DataFrame,
    name: &str,
    mode: DateMode,
    parse: fn(&str) -> Result<String, chrono::ParseError>,
) -> Result<usize> {
    let values = column_values(df, name)?;
    let mut nulled = 0usize;
    let mut rewritten: Vec<Option<String>> = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        match value.as_deref() {
            None => rewritten.push(None),
            Some(text) if text.trim().is_empty() => rewritten.push(None),
            Some(text) => match parse(text) {
                Ok(iso) => rewritten.push(Some(iso)),
                Err(error) => match mode {
                    DateMode::Strict => {
                        bail!(
                            "unparseable date in column {name:?} row {idx}: {text:?} ({error})"
                        );
                    }
                    DateMode::Lenient => {
                        warn!(column = name, row = idx, value = text, %error, "nulling unparseable date");
                        nulled += 1;
                        rewritten.push(None);
                    }
                },
            },
        }
    }
    df.with_column(Series::new(name.into(), rewritten))?;
    Ok(nulled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use crate::frame_utils::column_value_string;

    fn frame(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
        let columns = columns
            .into_iter()
            .map(|(name, values)| {
                let values: Vec<Option<String>> =
                    values.into_iter().map(|value| value.map(str::to_string)).collect();
                Series::new(name.into(), values).into_column()
            })
            .collect();
        DataFrame::new(columns).unwrap()
    }

    fn names_of(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|name| name.as_str().to_string())
            .collect()
    }

    fn rename_table() -> RenameTable {
        RenameTable::from_pairs([
            ("Hospital CCN", "ccn"),
            ("Participating Hospital Name", "hospital_name"),
            ("Measure Exception From Date", "measure_from_date"),
        ])
    }

    fn empty_renames() -> RenameTable {
        RenameTable::from_pairs(Vec::<(String, String)>::new())
    }

    fn legacy_options() -> StandardizeOptions {
        StandardizeOptions::default()
    }

    fn current_options() -> StandardizeOptions {
        StandardizeOptions {
            profile: SchemaProfile::Current,
            ..StandardizeOptions::default()
        }
    }

    #[test]
    fn test_canonical_collapses_measure_columns() {
        let renames = empty_renames();
        let namer = ColumnNamer::new(&renames).unwrap();
        assert_eq!(namer.canonical("Custom field (14a. Measure Response)"), "m_14a");
        assert_eq!(namer.canonical("Custom field (7. Egress Time)"), "m_7");
        assert_eq!(namer.canonical("100c. Follow Up"), "m_100c");
    }

    #[test]
    fn test_canonical_collapse_is_anchored() {
        let renames = empty_renames();
        let namer = ColumnNamer::new(&renames).unwrap();
        // A digit run inside the name must not trigger the collapse.
        assert_eq!(namer.canonical("Backup 14a. Response"), "backup_14a._response");
        assert_eq!(namer.canonical("1234. Too Long"), "1234._too_long");
    }

    #[test]
    fn test_canonical_applies_rename_table_after_unwrapping() {
        let renames = rename_table();
        let namer = ColumnNamer::new(&renames).unwrap();
        assert_eq!(namer.canonical("Custom field (Hospital CCN)"), "ccn");
        assert_eq!(namer.canonical("Hospital CCN"), "ccn");
        assert_eq!(namer.canonical("Summary"), "summary");
        assert_eq!(namer.canonical("Issue Type"), "issue_type");
    }

    #[test]
    fn test_standardize_legacy_frame() {
        let renames = rename_table();
        let df = frame(vec![
            ("Issue Type", vec![Some("Measure Exception"); 4]),
            (
                "Summary",
                vec![
                    Some("Row one"),
                    Some("Testing do not use"),
                    Some("No ccn here"),
                    None,
                ],
            ),
            (
                "Custom field (Hospital CCN)",
                vec![Some("010001"), Some("020002"), None, Some("030003")],
            ),
            (
                "Custom field (Participating Hospital Name)",
                vec![Some("Alpha"), Some("Beta"), Some("Ghost"), Some("Delta")],
            ),
            ("Status", vec![Some("Open"); 4]),
            (
                "Custom field (Measure Exception From Date)",
                vec![Some("Jan/05/2023 12:00 AM"), None, None, Some("Feb/01/2023 12:00 AM")],
            ),
            (
                "Custom field (14a. Measure Response)",
                vec![Some("Yes"), Some("No"), Some("No"), None],
            ),
            (
                "Outward issue link (Relates)",
                vec![Some("L2"), None, None, None],
            ),
            (
                "Outward issue link (Relates).1",
                vec![Some("L1"), None, None, None],
            ),
        ]);

        let (out, outcome) = standardize_frame(df, &renames, &legacy_options()).unwrap();

        assert_eq!(outcome.rows_in, 4);
        assert_eq!(outcome.testing_excluded, 1);
        assert_eq!(outcome.missing_ccn, 1);
        assert_eq!(outcome.rows_out, 2);
        assert_eq!(
            names_of(&out),
            vec![
                "ccn",
                "hospital_name",
                "measure_from_date",
                "m_14a",
                "issue_type",
                "status",
                "summary",
                "inward_issues",
                "outward_issues",
            ]
        );
        assert_eq!(column_value_string(&out, "measure_from_date", 0), "2023-01-05");
        // Distinct issue links, sorted, bulleted.
        assert_eq!(column_value_string(&out, "outward_issues", 0), "L1 \u{2022} L2");
        assert_eq!(out.column("inward_issues").unwrap().null_count(), 2);
    }

    #[test]
    fn test_standardize_current_frame() {
        let renames = rename_table();
        let df = frame(vec![
            ("Created", vec![Some("Apr/19/2023 1:50 PM")]),
            ("Status", vec![Some("Open")]),
            ("Summary", vec![Some("Testing row stays in current")]),
            ("Custom field (Hospital CCN)", vec![Some("010001")]),
            (
                "Custom field (Participating Hospital Name)",
                vec![Some("Alpha")],
            ),
            ("Waiver From Date", vec![Some("Feb/03/2023 12:00 AM")]),
        ]);

        let (out, outcome) = standardize_frame(df, &renames, &current_options()).unwrap();

        // No "Testing" exclusion and no issue flattening in the current profile.
        assert_eq!(outcome.rows_out, 1);
        assert_eq!(outcome.testing_excluded, 0);
        assert_eq!(
            names_of(&out),
            vec![
                "ccn",
                "hospital_name",
                "created",
                "status",
                "waiver_from_date",
                "summary",
            ]
        );
        assert_eq!(column_value_string(&out, "created", 0), "2023-04-19 13:50:00");
        assert_eq!(column_value_string(&out, "waiver_from_date", 0), "2023-02-03");
    }

    #[test]
    fn test_flatten_emits_targets_without_sources() {
        let renames = rename_table();
        let df = frame(vec![
            ("Custom field (Hospital CCN)", vec![Some("010001")]),
            ("Summary", vec![Some("Row")]),
        ]);
        let (out, _) = standardize_frame(df, &renames, &legacy_options()).unwrap();
        assert!(names_of(&out).contains(&"outward_issues".to_string()));
        assert!(names_of(&out).contains(&"inward_issues".to_string()));
        assert_eq!(out.column("outward_issues").unwrap().null_count(), 1);
    }

    #[test]
    fn test_rename_collision_is_fatal() {
        let renames = rename_table();
        let df = frame(vec![
            ("CCN", vec![Some("010001")]),
            ("Ccn", vec![Some("010001")]),
            ("Summary", vec![Some("Row")]),
        ]);
        let error = standardize_frame(df, &renames, &legacy_options()).unwrap_err();
        assert!(error.to_string().contains("both standardize to"));
    }

    #[test]
    fn test_legacy_without_summary_is_fatal() {
        let renames = rename_table();
        let df = frame(vec![("Custom field (Hospital CCN)", vec![Some("010001")])]);
        let error = standardize_frame(df, &renames, &legacy_options()).unwrap_err();
        assert!(error.to_string().contains("summary"));
    }

    #[test]
    fn test_missing_ccn_column_is_fatal() {
        let renames = rename_table();
        let df = frame(vec![("Summary", vec![Some("Row")])]);
        let error = standardize_frame(df, &renames, &legacy_options()).unwrap_err();
        assert!(error.to_string().contains("ccn"));
    }

    #[test]
    fn test_blank_ccn_counts_as_missing() {
        let renames = rename_table();
        let df = frame(vec![
            ("Custom field (Hospital CCN)", vec![Some("010001"), Some("   ")]),
            ("Summary", vec![Some("Row"), Some("Row")]),
        ]);
        let (out, outcome) = standardize_frame(df, &renames, &legacy_options()).unwrap();
        assert_eq!(out.height(), 1);
        assert_eq!(outcome.missing_ccn, 1);
    }

    #[test]
    fn test_strict_date_failure_names_the_cell() {
        let renames = rename_table();
        let df = frame(vec![
            ("Custom field (Hospital CCN)", vec![Some("010001")]),
            ("Summary", vec![Some("Row")]),
            (
                "Custom field (Measure Exception From Date)",
                vec![Some("05/01/2023")],
            ),
        ]);
        let error = standardize_frame(df, &renames, &legacy_options()).unwrap_err();
        let message = error.to_string();
        assert!(message.contains("measure_from_date"));
        assert!(message.contains("05/01/2023"));
    }

    #[test]
    fn test_lenient_dates_null_and_count() {
        let renames = rename_table();
        let options = StandardizeOptions {
            date_mode: DateMode::Lenient,
            ..StandardizeOptions::default()
        };
        let df = frame(vec![
            ("Custom field (Hospital CCN)", vec![Some("010001"), Some("020002")]),
            ("Summary", vec![Some("Row"), Some("Row")]),
            (
                "Custom field (Measure Exception From Date)",
                vec![Some("Jan/05/2023 12:00 AM"), Some("not a date")],
            ),
        ]);
        let (out, outcome) = standardize_frame(df, &renames, &options).unwrap();
        assert_eq!(outcome.date_nulls, 1);
        assert_eq!(out.column("measure_from_date").unwrap().null_count(), 1);
        assert_eq!(column_value_string(&out, "measure_from_date", 0), "2023-01-05");
    }

    const ORDER_POOL: [&str; 13] = [
        "ccn",
        "hospital_name",
        "hospital_phone",
        "hospital_address",
        "measure_from_date",
        "m_14a",
        "m_2",
        "issue_type",
        "status",
        "summary",
        "poc_status",
        "outward_issues",
        "inward_issues",
    ];

    const ORDER_EXPECTED: [&str; 13] = [
        "ccn",
        "hospital_name",
        "hospital_address",
        "hospital_phone",
        "measure_from_date",
        "m_14a",
        "m_2",
        "issue_type",
        "status",
        "summary",
        "poc_status",
        "inward_issues",
        "outward_issues",
    ];

    proptest! {
        #[test]
        fn prop_column_order_ignores_input_order(
            permutation in Just(ORDER_POOL.to_vec()).prop_shuffle()
        ) {
            let columns = permutation
                .iter()
                .map(|name| (*name, vec![None::<&str>]))
                .collect();
            let df = frame(columns);
            let ordered = order_columns(&df, SchemaProfile::Legacy).unwrap();
            prop_assert_eq!(names_of(&ordered), ORDER_EXPECTED.to_vec());
        }

        #[test]
        fn prop_canonical_names_are_a_fixpoint(name in "[a-z][a-z0-9_]{0,24}") {
            let renames = empty_renames();
            let namer = ColumnNamer::new(&renames).unwrap();
            prop_assert_eq!(namer.canonical(&name), name);
        }
    }
}
