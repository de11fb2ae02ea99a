//! Raw dataset parsing and the strict completeness filter.

use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use serde::Serialize;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use crate::error::DataError;
use crate::record::{binarize_target, CleanedDataset, LabeledRecord};
use crate::schema::{COLUMN_COUNT, COLUMN_NAMES, FEATURE_COUNT, MISSING_MARKER};

/// Diagnostics gathered while cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub rows_read: usize,
    pub rows_dropped: usize,
    /// Missing-marker count per raw column, before any row is dropped.
    pub missing_per_column: [usize; COLUMN_COUNT],
}

impl CleaningReport {
    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.rows_dropped
    }

    pub fn total_missing(&self) -> usize {
        self.missing_per_column.iter().sum()
    }

    /// `(column name, missing count)` pairs in raw column order.
    pub fn missing_by_name(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        COLUMN_NAMES
            .iter()
            .copied()
            .zip(self.missing_per_column.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    pub dataset: CleanedDataset,
    pub report: CleaningReport,
}

/// Read a raw Cleveland file, drop incomplete rows and binarize the target.
pub fn load_and_clean(path: impl AsRef<Path>) -> Result<LoadedDataset, DataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            DataError::DatasetNotFound(path.to_path_buf())
        } else {
            DataError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let loaded = clean_from(file, path)?;
    info!(
        "loaded {}: {} rows read, {} kept, {} dropped for missing values",
        path.display(),
        loaded.report.rows_read,
        loaded.report.rows_kept(),
        loaded.report.rows_dropped
    );
    Ok(loaded)
}

/// Same as [`load_and_clean`] over an arbitrary reader.
pub fn clean_reader<R: Read>(reader: R) -> Result<LoadedDataset, DataError> {
    clean_from(reader, Path::new("<reader>"))
}

fn clean_from<R: Read>(reader: R, origin: &Path) -> Result<LoadedDataset, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut report = CleaningReport::default();
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| csv_error(e, origin))?;
        let line = record.position().map_or(0, |p| p.line());
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        if record.len() != COLUMN_COUNT {
            return Err(DataError::Parse {
                line,
                message: format!("expected {COLUMN_COUNT} fields, found {}", record.len()),
            });
        }
        report.rows_read += 1;

        let mut values = [0.0f64; COLUMN_COUNT];
        let mut complete = true;
        for (col, field) in record.iter().enumerate() {
            if field == MISSING_MARKER {
                report.missing_per_column[col] += 1;
                complete = false;
                continue;
            }
            values[col] = parse_field(field, col, line)?;
        }

        if !complete {
            report.rows_dropped += 1;
            debug!("line {line}: dropping row with missing values");
            continue;
        }

        let mut features = [0.0f64; FEATURE_COUNT];
        features.copy_from_slice(&values[..FEATURE_COUNT]);
        records.push(LabeledRecord {
            features,
            target: binarize_target(values[FEATURE_COUNT]),
        });
    }

    for (name, count) in report.missing_by_name() {
        if count > 0 {
            debug!("column {name}: {count} missing");
        }
    }
    if report.rows_dropped > 0 {
        warn!(
            "{} of {} rows dropped because of missing values",
            report.rows_dropped, report.rows_read
        );
    }

    Ok(LoadedDataset {
        dataset: CleanedDataset::from_records(records),
        report,
    })
}

fn parse_field(field: &str, col: usize, line: u64) -> Result<f64, DataError> {
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DataError::Parse {
            line,
            message: format!("column {}: '{field}' is not a number", COLUMN_NAMES[col]),
        }),
    }
}

fn csv_error(err: csv::Error, origin: &Path) -> DataError {
    let line = err.position().map_or(0, |p| p.line());
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => DataError::Io {
            path: PathBuf::from(origin),
            source,
        },
        _ => DataError::Parse { line, message },
    }
}
