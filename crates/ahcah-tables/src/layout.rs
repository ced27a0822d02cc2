//! Stage directory layout under one data root.
//!
//! Every stage reads from exactly one directory and writes to the next:
//! `raw/` → `redacted/` → `standardized/` → `cleaned/`. The rename lookup
//! lives beside them in `manual/column-renames.csv`.

use std::path::{Path, PathBuf};

/// Resolves the pipeline's fixed directory structure from a data root.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Raw exports as delivered; never written by the pipeline.
    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("raw")
    }

    /// Redactor output, standardizer input.
    pub fn redacted_dir(&self) -> PathBuf {
        self.root.join("redacted")
    }

    /// Standardizer output, cleaner input.
    pub fn standardized_dir(&self) -> PathBuf {
        self.root.join("standardized")
    }

    /// Cleaner output; the pipeline's final product.
    pub fn cleaned_dir(&self) -> PathBuf {
        self.root.join("cleaned")
    }

    /// Hand-maintained inputs (the column-rename lookup).
    pub fn manual_dir(&self) -> PathBuf {
        self.root.join("manual")
    }

    /// Location of the column-rename lookup table.
    pub fn rename_table_path(&self) -> PathBuf {
        self.manual_dir().join("column-renames.csv")
    }
}
