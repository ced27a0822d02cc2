//! Manual corrections applied to standardized tables.
//!
//! Everything here encodes a human decision about specific records:
//! misspelled hospital names, waivers entered in error, duplicate
//! submissions. The rules live in `CorrectionTable`; this module only
//! applies them, dispatched on the record kind.

use std::collections::BTreeSet;

use anyhow::{Result, bail};
use polars::prelude::*;
use tracing::debug;

use ahcah_model::RecordKind;
use ahcah_tables::CorrectionTable;
use ahcah_tables::schema;

use crate::frame_utils::{column_value_string, column_values, filter_rows};

/// Row accounting for one cleaned table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanOutcome {
    pub rows_in: usize,
    pub rows_out: usize,
    /// Waiver rows dropped by the CCN exclusion list.
    pub excluded: usize,
    /// Measure rows dropped for a "Duplicate" tracking status.
    pub duplicate_status: usize,
    /// Measure rows dropped as key-wise duplicates.
    pub deduped: usize,
}

/// Cleans one standardized table according to its record kind.
pub fn clean_frame(
    df: DataFrame,
    kind: RecordKind,
    corrections: &CorrectionTable,
) -> Result<(DataFrame, CleanOutcome)> {
    let mut outcome = CleanOutcome {
        rows_in: df.height(),
        ..CleanOutcome::default()
    };
    let mut df = drop_issue_columns(df);
    df = normalize_hospital_names(df)?;
    match kind {
        RecordKind::Waivers => {
            let (filtered, dropped) = exclude_waiver_ccns(&df, corrections)?;
            df = filtered;
            outcome.excluded = dropped;
        }
        RecordKind::Measures => {
            df = fix_hospital_names(df, corrections)?;
            let (filtered, dropped) = drop_duplicate_status(&df, corrections)?;
            df = filtered;
            outcome.duplicate_status = dropped;
            let (deduped, dropped) = dedupe_measures(&df, corrections)?;
            df = deduped;
            outcome.deduped = dropped;
            df = drop_admin_columns(df, corrections);
        }
    }
    outcome.rows_out = df.height();
    Ok((df, outcome))
}

/// The flattened issue-list columns carried no content after redaction;
/// they end here.
fn drop_issue_columns(df: DataFrame) -> DataFrame {
    let issue_columns: Vec<String> = df
        .get_column_names()
        .iter()
        .filter(|name| name.contains(schema::ISSUES_COLUMN_SUFFIX))
        .map(|name| name.as_str().to_string())
        .collect();
    if issue_columns.is_empty() {
        df
    } else {
        df.drop_many(issue_columns.iter().map(String::as_str))
    }
}

/// Trims and collapses runs of internal whitespace in the hospital name.
fn normalize_hospital_names(mut df: DataFrame) -> Result<DataFrame> {
    let Ok(values) = column_values(&df, schema::HOSPITAL_NAME) else {
        bail!("table has no {:?} column", schema::HOSPITAL_NAME);
    };
    let normalized: Vec<Option<String>> = values
        .into_iter()
        .map(|value| {
            value.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        })
        .collect();
    df.with_column(Series::new(schema::HOSPITAL_NAME.into(), normalized))?;
    Ok(df)
}

/// Exact-cell spelling corrections on the hospital name.
fn fix_hospital_names(mut df: DataFrame, corrections: &CorrectionTable) -> Result<DataFrame> {
    let values = column_values(&df, schema::HOSPITAL_NAME)?;
    let mut corrected = 0usize;
    let fixed: Vec<Option<String>> = values
        .into_iter()
        .map(|value| {
            value.map(|text| {
                let fix = corrections
                    .hospital_name_fixes
                    .iter()
                    .find(|(from, _)| *from == text);
                match fix {
                    Some((_, to)) => {
                        corrected += 1;
                        to.clone()
                    }
                    None => text,
                }
            })
        })
        .collect();
    if corrected > 0 {
        debug!(count = corrected, "hospital names corrected");
    }
    df.with_column(Series::new(schema::HOSPITAL_NAME.into(), fixed))?;
    Ok(df)
}

/// Waivers entered in error are dropped by CCN.
fn exclude_waiver_ccns(
    df: &DataFrame,
    corrections: &CorrectionTable,
) -> Result<(DataFrame, usize)> {
    let Ok(values) = column_values(df, schema::CCN) else {
        bail!("waivers table has no {:?} column", schema::CCN);
    };
    let keep: Vec<bool> = values
        .iter()
        .map(|value| match value.as_deref() {
            Some(text) => !corrections
                .excluded_waiver_ccns
                .iter()
                .any(|ccn| ccn.as_str() == text.trim()),
            None => true,
        })
        .collect();
    let dropped = keep.iter().filter(|&&kept| !kept).count();
    Ok((filter_rows(df, &keep)?, dropped))
}

/// Rows the tracker itself marked as duplicates. The match is exact; null
/// and any other status values are kept.
fn drop_duplicate_status(
    df: &DataFrame,
    corrections: &CorrectionTable,
) -> Result<(DataFrame, usize)> {
    let Ok(values) = column_values(df, schema::STATUS) else {
        bail!("measures table has no {:?} column", schema::STATUS);
    };
    let keep: Vec<bool> = values
        .iter()
        .map(|value| value.as_deref() != Some(corrections.duplicate_status.as_str()))
        .collect();
    let dropped = keep.iter().filter(|&&kept| !kept).count();
    Ok((filter_rows(df, &keep)?, dropped))
}

/// Keeps the first row per dedupe key, in row order.
///
/// Repeated submissions of the same measure period appear as rows agreeing
/// on (ccn, hospital name, measure start); only the first survives. Rows
/// whose key columns are all blank are left alone.
fn dedupe_measures(
    df: &DataFrame,
    corrections: &CorrectionTable,
) -> Result<(DataFrame, usize)> {
    for key in &corrections.measure_dedupe_key {
        if df.column(key).is_err() {
            bail!("measures table has no {key:?} column to deduplicate by");
        }
    }
    let mut seen = BTreeSet::new();
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let parts: Vec<String> = corrections
            .measure_dedupe_key
            .iter()
            .map(|key| column_value_string(df, key, idx).trim().to_string())
            .collect();
        if parts.iter().all(String::is_empty) {
            keep.push(true);
            continue;
        }
        keep.push(seen.insert(parts.join("|")));
    }
    let dropped = keep.iter().filter(|&&kept| !kept).count();
    Ok((filter_rows(df, &keep)?, dropped))
}

/// Columns that only carried tracker bookkeeping; absent ones are ignored.
fn drop_admin_columns(df: DataFrame, corrections: &CorrectionTable) -> DataFrame {
    df.drop_many(corrections.measure_drop_columns.iter().map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn measures_frame() -> DataFrame {
        frame(vec![
            (
                "ccn",
                vec![Some("010001"), Some("010001"), Some("010001"), Some("010003")],
            ),
            (
                "hospital_name",
                vec![
                    Some("Test  Hospital"),
                    Some("Test Hospital"),
                    Some("Test Hospital"),
                    Some("Dup Hospital"),
                ],
            ),
            (
                "measure_from_date",
                vec![
                    Some("2023-01-05"),
                    Some("2023-01-05"),
                    Some("2023-02-01"),
                    Some("2023-01-08"),
                ],
            ),
            (
                "m_14a",
                vec![Some("Yes"), Some("No"), Some("No"), Some("Yes")],
            ),
            (
                "status",
                vec![Some("Open"), Some("Open"), None, Some("Duplicate")],
            ),
        ])
    }

    #[test]
    fn test_clean_measures_end_to_end() {
        let corrections = CorrectionTable::builtin();
        let (out, outcome) =
            clean_frame(measures_frame(), RecordKind::Measures, &corrections).unwrap();

        // The Duplicate-status row goes first, then the whitespace-normalized
        // duplicate of row one; the first occurrence keeps its payload.
        assert_eq!(outcome.rows_in, 4);
        assert_eq!(outcome.duplicate_status, 1);
        assert_eq!(outcome.deduped, 1);
        assert_eq!(outcome.rows_out, 2);
        assert_eq!(column_value_string(&out, "hospital_name", 0), "Test Hospital");
        assert_eq!(column_value_string(&out, "m_14a", 0), "Yes");
        assert_eq!(column_value_string(&out, "measure_from_date", 1), "2023-02-01");
    }

    #[test]
    fn test_clean_waivers_exclusion_list() {
        let corrections = CorrectionTable::builtin();
        let df = frame(vec![
            ("ccn", vec![Some("380051"), Some("330195"), Some("050001")]),
            (
                "hospital_name",
                vec![
                    Some("Salem Hospital"),
                    Some("North Shore University Hospital"),
                    Some("Good Hospital"),
                ],
            ),
        ]);

        let (out, outcome) = clean_frame(df, RecordKind::Waivers, &corrections).unwrap();

        assert_eq!(outcome.excluded, 2);
        assert_eq!(out.height(), 1);
        assert_eq!(column_value_string(&out, "ccn", 0), "050001");
    }

    #[test]
    fn test_waiver_exclusion_trims_ccn() {
        let corrections = CorrectionTable::builtin();
        let df = frame(vec![
            ("ccn", vec![Some(" 380051 ")]),
            ("hospital_name", vec![Some("Salem Hospital")]),
        ]);
        let (out, outcome) = clean_frame(df, RecordKind::Waivers, &corrections).unwrap();
        assert_eq!(outcome.excluded, 1);
        assert_eq!(out.height(), 0);
    }

    #[test]
    fn test_hospital_name_whitespace_normalized() {
        let corrections = CorrectionTable::builtin();
        let df = frame(vec![
            ("ccn", vec![Some("050001")]),
            ("hospital_name", vec![Some("  Good   General  Hospital ")]),
        ]);
        let (out, _) = clean_frame(df, RecordKind::Waivers, &corrections).unwrap();
        assert_eq!(
            column_value_string(&out, "hospital_name", 0),
            "Good General Hospital"
        );
    }

    #[test]
    fn test_missing_hospital_name_is_fatal() {
        let corrections = CorrectionTable::builtin();
        let df = frame(vec![("ccn", vec![Some("050001")])]);
        let error = clean_frame(df, RecordKind::Waivers, &corrections).unwrap_err();
        assert!(error.to_string().contains("hospital_name"));
    }

    #[test]
    fn test_measure_fixes_are_exact_cell() {
        let corrections = CorrectionTable::builtin();
        let df = frame(vec![
            ("ccn", vec![Some("460001"), Some("460002")]),
            (
                "hospital_name",
                vec![
                    Some("Huntsman Cancer Hospital"),
                    Some("The Huntsman Cancer Hospital Annex"),
                ],
            ),
            ("measure_from_date", vec![Some("2023-01-05"), Some("2023-01-05")]),
            ("status", vec![Some("Open"), Some("Open")]),
        ]);

        let (out, _) = clean_frame(df, RecordKind::Measures, &corrections).unwrap();

        assert_eq!(
            column_value_string(&out, "hospital_name", 0),
            "University of Utah Health and Huntsman Cancer Institute"
        );
        // Not an exact match, left alone.
        assert_eq!(
            column_value_string(&out, "hospital_name", 1),
            "The Huntsman Cancer Hospital Annex"
        );
    }

    #[test]
    fn test_issues_columns_drop() {
        let corrections = CorrectionTable::builtin();
        let df = frame(vec![
            ("ccn", vec![Some("050001")]),
            ("hospital_name", vec![Some("Good Hospital")]),
            ("outward_issues", vec![Some("AHCAH-***")]),
            ("inward_issues", vec![None]),
        ]);
        let (out, _) = clean_frame(df, RecordKind::Waivers, &corrections).unwrap();
        assert_eq!(names_of(&out), vec!["ccn", "hospital_name"]);
    }

    #[test]
    fn test_admin_columns_drop_for_measures_only() {
        let corrections = CorrectionTable::builtin();
        let df = frame(vec![
            ("ccn", vec![Some("050001")]),
            ("hospital_name", vec![Some("Good Hospital")]),
            ("measure_from_date", vec![Some("2023-01-05")]),
            ("status", vec![Some("Open")]),
            ("summary", vec![Some("Row")]),
            ("issue_type", vec![Some("Measure Exception")]),
            ("priority", vec![Some("Low")]),
            ("reporter", vec![Some("jdoe")]),
        ]);
        let (out, _) = clean_frame(df, RecordKind::Measures, &corrections).unwrap();
        assert_eq!(
            names_of(&out),
            vec!["ccn", "hospital_name", "measure_from_date", "status"]
        );
    }

    #[test]
    fn test_missing_status_is_fatal_for_measures() {
        let corrections = CorrectionTable::builtin();
        let df = frame(vec![
            ("ccn", vec![Some("050001")]),
            ("hospital_name", vec![Some("Good Hospital")]),
            ("measure_from_date", vec![Some("2023-01-05")]),
        ]);
        let error = clean_frame(df, RecordKind::Measures, &corrections).unwrap_err();
        assert!(error.to_string().contains("status"));
    }

    #[test]
    fn test_missing_dedupe_key_is_fatal_for_measures() {
        let corrections = CorrectionTable::builtin();
        let df = frame(vec![
            ("ccn", vec![Some("050001")]),
            ("hospital_name", vec![Some("Good Hospital")]),
            ("status", vec![Some("Open")]),
        ]);
        let error = clean_frame(df, RecordKind::Measures, &corrections).unwrap_err();
        assert!(error.to_string().contains("measure_from_date"));
    }

    #[test]
    fn test_clean_is_idempotent_for_measures() {
        let corrections = CorrectionTable::builtin();
        let (once, first) =
            clean_frame(measures_frame(), RecordKind::Measures, &corrections).unwrap();
        let (twice, second) = clean_frame(once.clone(), RecordKind::Measures, &corrections)
            .unwrap();
        assert_eq!(once, twice);
        assert_eq!(first.rows_out, second.rows_out);
        assert_eq!(second.duplicate_status, 0);
        assert_eq!(second.deduped, 0);
    }
}
