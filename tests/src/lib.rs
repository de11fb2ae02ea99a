//! Shared fixtures for the cross-crate pipeline tests.

use std::fs;
use std::path::{Path, PathBuf};

use cardio_data::testdata::{synthetic_rows, to_raw_csv};

/// Write a raw Cleveland-style file with `n` rows, blanking the given
/// `(row, column)` cells, and return its path.
pub fn write_raw_dataset(dir: &Path, n: usize, seed: u64, missing: &[(usize, usize)]) -> PathBuf {
    let path = dir.join("heart.csv");
    fs::write(&path, to_raw_csv(&synthetic_rows(n, seed), missing))
        .unwrap_or_else(|e| panic!("writing {}: {e}", path.display()));
    path
}

#[cfg(test)]
mod pipeline;
