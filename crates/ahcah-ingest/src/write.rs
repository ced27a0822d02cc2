//! CSV output.

use std::fs;
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Writes a frame as CSV, header included.
///
/// The frame is serialized to memory first and written in one call, so a
/// failure never leaves a truncated destination file behind.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer).include_header(true).finish(df)?;
    fs::write(path, &buffer).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}
