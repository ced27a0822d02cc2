//! Directory-level orchestration of the pipeline stages.
//!
//! The stages run in order over one data root:
//!
//! 1. **Redact**: mask tracker issue keys, `raw/` -> `redacted/`
//! 2. **Standardize**: one canonical shape per table, `redacted/` -> `standardized/`
//! 3. **Clean**: manual correction rules, `standardized/` -> `cleaned/`
//!
//! Every stage reads one directory and writes the next, file by file.
//! Per-file failures are accumulated in the stage result and reported at
//! the end; only configuration-level problems (a missing input directory,
//! an unloadable rename table) abort a stage.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use ahcah_core::frame_utils::concat_rows;
use ahcah_core::standardize::{StandardizeOptions, StandardizeOutcome};
use ahcah_core::{CleanOutcome, Redactor, clean_frame, standardize_frame};
use ahcah_ingest::{
    dataframe_from_table, list_csv_files, read_csv_blocks, read_csv_table, write_csv,
};
use ahcah_model::DatasetName;
use ahcah_tables::{CorrectionTable, DataLayout, RenameTable, sources};

use crate::types::{
    CleanFileSummary, CleanResult, RedactFileSummary, RedactResult, RunResult,
    StandardizeFileSummary, StandardizeResult,
};

/// Masks tracker issue keys in every raw export.
pub fn redact(layout: &DataLayout, dry_run: bool) -> Result<RedactResult> {
    let span = info_span!("redact", dir = %layout.raw_dir().display());
    let _guard = span.enter();
    let start = Instant::now();

    let redactor = Redactor::new(sources::REDACTION_PREFIX, sources::REDACTION_MASK)?;
    let files = list_csv_files(&layout.raw_dir()).context("list raw exports")?;
    let out_dir = layout.redacted_dir();
    if !dry_run {
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("create {}", out_dir.display()))?;
    }

    let mut result = RedactResult::default();
    for path in &files {
        let source = file_name_of(path);
        let file_start = Instant::now();
        let outcome = if dry_run {
            fs::read_to_string(path)
                .map(|text| redactor.count_in_text(&text))
                .with_context(|| format!("read {}", path.display()))
        } else {
            let dest = out_dir.join(&source);
            redactor
                .redact_file(path, &dest)
                .map(|outcome| outcome.replaced)
        };
        match outcome {
            Ok(masked) => {
                let output = (!dry_run).then(|| out_dir.join(&source));
                debug!(
                    file = %source,
                    masked,
                    duration_ms = file_start.elapsed().as_millis(),
                    "file redacted"
                );
                result.files.push(RedactFileSummary {
                    source,
                    masked,
                    output,
                });
            }
            Err(error) => result.errors.push(format!("{source}: {error:#}")),
        }
    }

    info!(
        file_count = result.files.len(),
        error_count = result.errors.len(),
        duration_ms = start.elapsed().as_millis(),
        "redaction complete"
    );
    Ok(result)
}

/// Standardizes every redacted export that classifies as a dataset.
pub fn standardize(
    layout: &DataLayout,
    options: &StandardizeOptions,
    dry_run: bool,
) -> Result<StandardizeResult> {
    let span = info_span!(
        "standardize",
        dir = %layout.redacted_dir().display(),
        profile = %options.profile,
    );
    let _guard = span.enter();
    let start = Instant::now();

    let rename_path = layout.rename_table_path();
    let renames = RenameTable::load(&rename_path)
        .with_context(|| format!("load rename table {}", rename_path.display()))?;
    debug!(entries = renames.len(), "rename table loaded");

    let files = list_csv_files(&layout.redacted_dir()).context("list redacted exports")?;
    let out_dir = layout.standardized_dir();
    if !dry_run {
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("create {}", out_dir.display()))?;
    }

    let mut result = StandardizeResult::default();
    for path in &files {
        let source = file_name_of(path);
        let dataset = match DatasetName::from_source_filename(&source) {
            Ok(dataset) => dataset,
            Err(_) => {
                warn!(file = %source, "skipping unrecognized export");
                result.skipped.push(source);
                continue;
            }
        };
        let file_start = Instant::now();
        match standardize_file(path, &renames, options) {
            Ok((mut df, outcome)) => {
                let output = if dry_run {
                    None
                } else {
                    let dest = out_dir.join(dataset.output_filename());
                    if let Err(error) = write_csv(&mut df, &dest) {
                        result.errors.push(format!("{source}: {error:#}"));
                        continue;
                    }
                    Some(dest)
                };
                debug!(
                    file = %source,
                    dataset = %dataset,
                    rows_in = outcome.rows_in,
                    rows_out = outcome.rows_out,
                    duration_ms = file_start.elapsed().as_millis(),
                    "file standardized"
                );
                result.files.push(StandardizeFileSummary {
                    source,
                    dataset: dataset.file_stem(),
                    rows_in: outcome.rows_in,
                    rows_out: outcome.rows_out,
                    missing_ccn: outcome.missing_ccn,
                    testing_excluded: outcome.testing_excluded,
                    date_nulls: outcome.date_nulls,
                    output,
                });
            }
            Err(error) => result.errors.push(format!("{source}: {error:#}")),
        }
    }

    info!(
        file_count = result.files.len(),
        skipped = result.skipped.len(),
        error_count = result.errors.len(),
        duration_ms = start.elapsed().as_millis(),
        "standardization complete"
    );
    Ok(result)
}

/// Applies the manual correction rules to every standardized table.
pub fn clean(layout: &DataLayout, dry_run: bool) -> Result<CleanResult> {
    let span = info_span!("clean", dir = %layout.standardized_dir().display());
    let _guard = span.enter();
    let start = Instant::now();

    let corrections = CorrectionTable::builtin();
    let files = list_csv_files(&layout.standardized_dir()).context("list standardized tables")?;
    let out_dir = layout.cleaned_dir();
    if !dry_run {
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("create {}", out_dir.display()))?;
    }

    let mut result = CleanResult::default();
    for path in &files {
        let source = file_name_of(path);
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        let Ok(dataset) = stem.parse::<DatasetName>() else {
            warn!(file = %source, "skipping file without a dataset stem");
            result.skipped.push(source);
            continue;
        };
        let file_start = Instant::now();
        match clean_file(path, dataset, &corrections) {
            Ok((mut df, outcome)) => {
                let output = if dry_run {
                    None
                } else {
                    let dest = out_dir.join(dataset.output_filename());
                    if let Err(error) = write_csv(&mut df, &dest) {
                        result.errors.push(format!("{source}: {error:#}"));
                        continue;
                    }
                    Some(dest)
                };
                debug!(
                    dataset = %dataset,
                    rows_in = outcome.rows_in,
                    rows_out = outcome.rows_out,
                    duration_ms = file_start.elapsed().as_millis(),
                    "file cleaned"
                );
                result.files.push(CleanFileSummary {
                    dataset: dataset.file_stem(),
                    kind: dataset.kind,
                    rows_in: outcome.rows_in,
                    rows_out: outcome.rows_out,
                    excluded: outcome.excluded,
                    duplicate_status: outcome.duplicate_status,
                    deduped: outcome.deduped,
                    output,
                });
            }
            Err(error) => result.errors.push(format!("{source}: {error:#}")),
        }
    }

    info!(
        file_count = result.files.len(),
        skipped = result.skipped.len(),
        error_count = result.errors.len(),
        duration_ms = start.elapsed().as_millis(),
        "cleaning complete"
    );
    Ok(result)
}

/// Runs all three stages in order over one data root.
///
/// A dry run writes nothing anywhere, so the later stages see whatever the
/// input directories held before the run.
pub fn run(
    layout: &DataLayout,
    options: &StandardizeOptions,
    dry_run: bool,
) -> Result<RunResult> {
    let redact_result = redact(layout, dry_run)?;
    let standardize_result = standardize(layout, options, dry_run)?;
    let clean_result = clean(layout, dry_run)?;
    Ok(RunResult {
        redact: redact_result,
        standardize: standardize_result,
        clean: clean_result,
    })
}

/// Standardizes one export file, block by block.
///
/// Most exports are a single table. The ones named in the split table carry
/// a second header mid-file; each block standardizes on its own and the
/// results concatenate row-wise, aligning columns by name.
fn standardize_file(
    path: &Path,
    renames: &RenameTable,
    options: &StandardizeOptions,
) -> Result<(DataFrame, StandardizeOutcome)> {
    let file_name = file_name_of(path);
    let tables = match sources::split_point_for(&file_name) {
        Some(record) => read_csv_blocks(path, record)?,
        None => vec![read_csv_table(path)?],
    };
    let mut outcome = StandardizeOutcome::default();
    let mut frames = Vec::with_capacity(tables.len());
    for table in &tables {
        let df = dataframe_from_table(table)?;
        let (standardized, block) = standardize_frame(df, renames, options)?;
        outcome.merge(block);
        frames.push(standardized);
    }
    let df = if frames.len() == 1 {
        frames.remove(0)
    } else {
        concat_rows(&frames)?
    };
    Ok((df, outcome))
}

fn clean_file(
    path: &Path,
    dataset: DatasetName,
    corrections: &CorrectionTable,
) -> Result<(DataFrame, CleanOutcome)> {
    let table = read_csv_table(path)?;
    let df = dataframe_from_table(&table)?;
    clean_frame(df, dataset.kind, corrections)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unknown")
        .to_string()
}
