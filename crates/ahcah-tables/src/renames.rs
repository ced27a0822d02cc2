//! The external column-rename lookup table.
//!
//! A CSV with columns `original`,`rename` maps the export's verbose column
//! names to short canonical names. It is loaded once at startup from
//! `manual/column-renames.csv` under the data root and applied to every
//! input file.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::TablesError;

/// Lookup from original export column names to canonical names.
#[derive(Debug, Clone, Default)]
pub struct RenameTable {
    map: BTreeMap<String, String>,
}

fn header_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().trim_matches('\u{feff}') == name)
}

fn get_string(row: &csv::StringRecord, idx: usize) -> Option<String> {
    row.get(idx)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

impl RenameTable {
    /// Load the lookup from a CSV file with `original` and `rename` columns.
    ///
    /// Rows with an empty original or rename are skipped. A repeated
    /// original keeps the last entry, matching how the upstream table has
    /// always been consumed.
    pub fn load(path: &Path) -> Result<Self, TablesError> {
        let bytes = std::fs::read(path).map_err(|e| TablesError::io(path, e))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes.as_slice());
        let headers = reader
            .headers()
            .map_err(|e| TablesError::csv(path, e.to_string()))?
            .clone();

        let idx_original =
            header_index(&headers, "original").ok_or_else(|| TablesError::MissingColumn {
                column: "original".to_string(),
                path: path.to_path_buf(),
            })?;
        let idx_rename =
            header_index(&headers, "rename").ok_or_else(|| TablesError::MissingColumn {
                column: "rename".to_string(),
                path: path.to_path_buf(),
            })?;

        let mut map = BTreeMap::new();
        for row in reader.records() {
            let row = row.map_err(|e| TablesError::csv(path, e.to_string()))?;
            let Some(original) = get_string(&row, idx_original) else {
                continue;
            };
            let Some(rename) = get_string(&row, idx_rename) else {
                continue;
            };
            map.insert(original, rename);
        }

        if map.is_empty() {
            return Err(TablesError::EmptyTable {
                path: path.to_path_buf(),
            });
        }

        Ok(Self { map })
    }

    /// Build a table from in-memory pairs. Used by tests and callers that
    /// assemble the lookup without a file.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(original, rename)| (original.into(), rename.into()))
            .collect();
        Self { map }
    }

    /// Look up the canonical name for an original column name.
    pub fn get(&self, original: &str) -> Option<&str> {
        self.map.get(original).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_table(contents: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("column-renames.csv");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_basic() {
        let (_dir, path) = write_table(
            "original,rename\nCCN,ccn\nHospital Name,hospital_name\nMeasure From Date,measure_from_date\n",
        );
        let table = RenameTable::load(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("CCN"), Some("ccn"));
        assert_eq!(table.get("Hospital Name"), Some("hospital_name"));
        assert_eq!(table.get("unknown"), None);
    }

    #[test]
    fn test_load_skips_blank_rows_and_keeps_last_duplicate() {
        let (_dir, path) = write_table("original,rename\nCCN,ccn\n,ignored\nCCN,ccn_number\n");
        let table = RenameTable::load(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("CCN"), Some("ccn_number"));
    }

    #[test]
    fn test_load_missing_column() {
        let (_dir, path) = write_table("original,new_name\nCCN,ccn\n");
        let err = RenameTable::load(&path).unwrap_err();
        assert!(matches!(err, TablesError::MissingColumn { column, .. } if column == "rename"));
    }

    #[test]
    fn test_load_empty_table() {
        let (_dir, path) = write_table("original,rename\n");
        assert!(matches!(
            RenameTable::load(&path),
            Err(TablesError::EmptyTable { .. })
        ));
    }

    #[test]
    fn test_load_strips_bom_from_header() {
        let (_dir, path) = write_table("\u{feff}original,rename\nCCN,ccn\n");
        let table = RenameTable::load(&path).unwrap();
        assert_eq!(table.get("CCN"), Some("ccn"));
    }
}
