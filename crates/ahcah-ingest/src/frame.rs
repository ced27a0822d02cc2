//! DataFrame construction from raw CSV tables.

use polars::prelude::*;

use crate::csv_table::CsvTable;
use crate::error::Result;

/// Builds an all-string DataFrame from a raw table.
///
/// Empty cells become nulls so required-field filters and non-null joins see
/// them the same way regardless of how the export quoted them.
pub fn dataframe_from_table(table: &CsvTable) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(table.headers.len());
    for (idx, header) in table.headers.iter().enumerate() {
        let values: Vec<Option<String>> = table
            .rows
            .iter()
            .map(|row| row.get(idx).filter(|value| !value.is_empty()).cloned())
            .collect();
        columns.push(Series::new(header.as_str().into(), values).into_column());
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataframe_from_table() {
        let table = CsvTable {
            headers: vec!["ccn".to_string(), "summary".to_string()],
            rows: vec![
                vec!["010001".to_string(), "First".to_string()],
                vec!["020002".to_string(), String::new()],
            ],
        };
        let df = dataframe_from_table(&table).unwrap();
        assert_eq!(df.shape(), (2, 2));
        let summary = df.column("summary").unwrap();
        assert_eq!(summary.null_count(), 1);
    }

    #[test]
    fn test_dataframe_from_empty_table() {
        let table = CsvTable {
            headers: vec!["ccn".to_string()],
            rows: Vec::new(),
        };
        let df = dataframe_from_table(&table).unwrap();
        assert_eq!(df.shape(), (0, 1));
    }
}
