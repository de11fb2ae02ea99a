//! Seeded train/test partitioning.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::DataError;
use crate::record::CleanedDataset;

/// Seed used by the trainer and the evaluator unless configured otherwise.
pub const DEFAULT_SEED: u64 = 42;

/// Share of rows held out for evaluation unless configured otherwise.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: CleanedDataset,
    pub test: CleanedDataset,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Shuffle row indices with a seeded RNG; the first `ceil(test_fraction * n)`
/// shuffled rows form the test partition.
pub fn train_test_split(
    dataset: &CleanedDataset,
    test_fraction: f64,
    seed: u64,
) -> Result<Split, DataError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(DataError::InvalidSplit(format!(
            "test fraction must be strictly between 0 and 1, got {test_fraction}"
        )));
    }
    let n = dataset.len();
    let n_test = (test_fraction * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(DataError::InvalidSplit(format!(
            "{n} rows cannot be split into non-empty partitions with test fraction {test_fraction}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train_indices = indices.split_off(n_test);
    let test_indices = indices;
    debug!(
        "split {n} rows into {} train / {} test (seed {seed})",
        train_indices.len(),
        test_indices.len()
    );

    Ok(Split {
        train: dataset.subset(&train_indices),
        test: dataset.subset(&test_indices),
        train_indices,
        test_indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LabeledRecord;
    use crate::schema::FEATURE_COUNT;

    fn dataset(n: usize) -> CleanedDataset {
        CleanedDataset::from_records(
            (0..n)
                .map(|i| LabeledRecord {
                    features: [i as f64; FEATURE_COUNT],
                    target: (i % 2) as u8,
                })
                .collect(),
        )
    }

    #[test]
    fn sizes_follow_ceiling_rule() {
        let split = train_test_split(&dataset(297), 0.2, DEFAULT_SEED).unwrap();
        assert_eq!(split.test.len(), 60);
        assert_eq!(split.train.len(), 237);
    }

    #[test]
    fn partitions_are_disjoint_and_cover_all_rows() {
        let split = train_test_split(&dataset(50), 0.2, 7).unwrap();
        let mut all: Vec<usize> = split
            .train_indices
            .iter()
            .chain(split.test_indices.iter())
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_partition() {
        let ds = dataset(100);
        let a = train_test_split(&ds, 0.2, DEFAULT_SEED).unwrap();
        let b = train_test_split(&ds, 0.2, DEFAULT_SEED).unwrap();
        assert_eq!(a, b);
        let c = train_test_split(&ds, 0.2, DEFAULT_SEED + 1).unwrap();
        assert_ne!(a.test_indices, c.test_indices);
    }

    #[test]
    fn rejects_degenerate_requests() {
        let ds = dataset(10);
        assert!(train_test_split(&ds, 0.0, 1).is_err());
        assert!(train_test_split(&ds, 1.0, 1).is_err());
        assert!(train_test_split(&ds, f64::NAN, 1).is_err());
        assert!(train_test_split(&dataset(1), 0.2, 1).is_err());
        assert!(train_test_split(&CleanedDataset::default(), 0.2, 1).is_err());
    }
}
