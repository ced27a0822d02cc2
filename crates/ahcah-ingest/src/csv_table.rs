//! Raw CSV reading.
//!
//! Exports are read as text tables before any frame is built: every cell is
//! kept verbatim so later stages decide what counts as null or noise. The one
//! exception is headers, which are trimmed and de-duplicated here because the
//! rest of the pipeline addresses columns by name.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Raw CSV contents with every cell kept as text.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Renames repeated headers to `name.1`, `name.2`, … so every column can be
/// addressed unambiguously. The first occurrence keeps its original name.
pub fn mangle_duplicate_headers(headers: &[String]) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut mangled = Vec::with_capacity(headers.len());
    for header in headers {
        match seen.get(header).copied() {
            None => {
                seen.insert(header.clone(), 0);
                mangled.push(header.clone());
            }
            Some(count) => {
                let mut next = count + 1;
                let mut candidate = format!("{header}.{next}");
                while seen.contains_key(&candidate) {
                    next += 1;
                    candidate = format!("{header}.{next}");
                }
                seen.insert(header.clone(), next);
                seen.insert(candidate.clone(), 0);
                mangled.push(candidate);
            }
        }
    }
    mangled
}

fn csv_error(path: &Path, err: csv::Error) -> IngestError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        },
        _ => IngestError::CsvParse {
            path: path.to_path_buf(),
            message,
        },
    }
}

fn read_records(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|err| csv_error(path, err))?;
    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| csv_error(path, err))?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        records.push(row);
    }
    Ok(records)
}

fn table_from_records(path: &Path, header_record: &[String], data_records: &[Vec<String>]) -> CsvTable {
    let raw_headers: Vec<String> = header_record
        .iter()
        .map(|value| normalize_header(value))
        .collect();
    // Unnamed columns are export artifacts (trailing separators); drop them.
    let keep: Vec<usize> = raw_headers
        .iter()
        .enumerate()
        .filter(|(_, header)| !header.is_empty())
        .map(|(idx, _)| idx)
        .collect();
    if keep.len() < raw_headers.len() {
        debug!(
            path = %path.display(),
            dropped = raw_headers.len() - keep.len(),
            "dropping unnamed columns"
        );
    }
    let kept_headers: Vec<String> = keep.iter().map(|&idx| raw_headers[idx].clone()).collect();
    let headers = mangle_duplicate_headers(&kept_headers);
    let mut rows = Vec::with_capacity(data_records.len());
    for record in data_records {
        let mut row = Vec::with_capacity(headers.len());
        for &idx in &keep {
            row.push(record.get(idx).cloned().unwrap_or_default());
        }
        rows.push(row);
    }
    CsvTable { headers, rows }
}

/// Reads a single-table CSV file. The first non-blank record is the header.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let records = read_records(path)?;
    let Some((header_record, data_records)) = records.split_first() else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    Ok(table_from_records(path, header_record, data_records))
}

/// Reads a file that physically contains two header-delimited tables.
///
/// `second_header_record` is the zero-based index of the record holding the
/// second block's header, counting non-blank records from the top of the file
/// (the first block's header is record zero). Each block becomes its own
/// table; callers standardize them separately and concatenate afterwards.
pub fn read_csv_blocks(path: &Path, second_header_record: usize) -> Result<Vec<CsvTable>> {
    let records = read_records(path)?;
    if records.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    if second_header_record == 0 || second_header_record >= records.len() {
        return Err(IngestError::SplitOutOfRange {
            path: path.to_path_buf(),
            record: second_header_record,
        });
    }
    let first = table_from_records(path, &records[0], &records[1..second_header_record]);
    let second = table_from_records(
        path,
        &records[second_header_record],
        &records[second_header_record + 1..],
    );
    Ok(vec![first, second])
}
