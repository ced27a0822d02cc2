//! Error types for configuration-table loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the startup lookup tables.
#[derive(Debug, Error)]
pub enum TablesError {
    /// Failed to read the table file.
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table file did not parse as CSV.
    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// A required column is missing from the table header.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// The table parsed but contained no usable rows.
    #[error("lookup table is empty: {path}")]
    EmptyTable { path: PathBuf },
}

impl TablesError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Csv {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TablesError::MissingColumn {
            column: "rename".to_string(),
            path: PathBuf::from("/data/manual/column-renames.csv"),
        };
        assert_eq!(
            err.to_string(),
            "required column 'rename' not found in /data/manual/column-renames.csv"
        );
    }
}
