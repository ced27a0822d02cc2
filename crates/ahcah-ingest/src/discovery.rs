//! Source file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename so runs are deterministic.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_csv_files_sorted() {
        let dir = TempDir::new().unwrap();
        for name in &[
            "FOIA - Tier 2 Waiver.csv",
            "FOIA - Tier 1 Measures.csv",
            "notes.txt",
        ] {
            std::fs::write(dir.path().join(name), "header\ndata").unwrap();
        }

        let files = list_csv_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(
            files[0]
                .file_name()
                .unwrap()
                .to_str()
                .unwrap()
                .contains("Tier 1")
        );
    }

    #[test]
    fn test_list_csv_files_case_insensitive_extension() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("EXPORT.CSV"), "header\ndata").unwrap();
        let files = list_csv_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_list_csv_files_missing_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = list_csv_files(&missing).unwrap_err();
        assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
    }
}
