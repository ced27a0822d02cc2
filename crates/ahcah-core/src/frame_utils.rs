//! DataFrame helpers shared by the stage transformations.
//!
//! Every frame in the pipeline is all-string and nullable; these helpers
//! read cells through that lens and rebuild frames after row or column
//! surgery.

use polars::prelude::*;

use ahcah_ingest::any_to_string;

/// All values of a column, nulls preserved, values verbatim.
pub fn column_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = match column.get(idx)? {
            AnyValue::Null => None,
            other => Some(any_to_string(other)),
        };
        values.push(value);
    }
    Ok(values)
}

/// The cell at (`name`, `idx`) as text; nulls and missing columns read as
/// the empty string.
pub fn column_value_string(df: &DataFrame, name: &str, idx: usize) -> String {
    match df.column(name) {
        Ok(column) => any_to_string(column.get(idx).unwrap_or(AnyValue::Null)),
        Err(_) => String::new(),
    }
}

/// Keeps the rows whose mask entry is true.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> PolarsResult<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    df.filter(&mask)
}

/// Stacks frames row-wise, aligning columns by name.
///
/// Column order follows the first frame, with columns new to later frames
/// appended in encounter order; cells a frame never had are null. Plain
/// vertical stacking would reject the two-block exports, whose blocks can
/// disagree on columns.
pub fn concat_rows(frames: &[DataFrame]) -> PolarsResult<DataFrame> {
    let mut ordered: Vec<String> = Vec::new();
    for frame in frames {
        for name in frame.get_column_names() {
            if !ordered.iter().any(|existing| existing == name.as_str()) {
                ordered.push(name.as_str().to_string());
            }
        }
    }
    let total: usize = frames.iter().map(DataFrame::height).sum();
    let mut columns = Vec::with_capacity(ordered.len());
    for name in &ordered {
        let mut values: Vec<Option<String>> = Vec::with_capacity(total);
        for frame in frames {
            let present = frame
                .get_column_names()
                .iter()
                .any(|existing| existing.as_str() == name);
            if present {
                values.extend(column_values(frame, name)?);
            } else {
                values.extend(std::iter::repeat_n(None, frame.height()));
            }
        }
        columns.push(Series::new(name.as_str().into(), values).into_column());
    }
    DataFrame::new(columns)
}
