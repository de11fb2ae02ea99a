use cardio_data::testdata::{synthetic_rows, to_raw_csv};
use cardio_data::{binarize_target, clean_reader, load_and_clean, DataError, COLUMN_COUNT};
use proptest::prelude::*;

proptest! {
    #[test]
    fn binarized_target_is_one_iff_positive(t in 0u8..=4) {
        let expected = if t > 0 { 1 } else { 0 };
        prop_assert_eq!(binarize_target(t as f64), expected);
    }

    #[test]
    fn completeness_filter_drops_exactly_the_marked_rows(
        n in 1usize..60,
        cells in proptest::collection::vec((0usize..60, 0usize..COLUMN_COUNT), 0..40),
    ) {
        let rows = synthetic_rows(n, 11);
        let missing: Vec<(usize, usize)> = cells.into_iter().filter(|(r, _)| *r < n).collect();
        let mut marked: Vec<usize> = missing.iter().map(|(r, _)| *r).collect();
        marked.sort_unstable();
        marked.dedup();

        let loaded = clean_reader(to_raw_csv(&rows, &missing).as_bytes()).unwrap();
        prop_assert_eq!(loaded.report.rows_read, n);
        prop_assert_eq!(loaded.report.rows_dropped, marked.len());
        prop_assert_eq!(loaded.dataset.len(), n - marked.len());

        let mut distinct_cells = missing.clone();
        distinct_cells.sort_unstable();
        distinct_cells.dedup();
        prop_assert_eq!(loaded.report.total_missing(), distinct_cells.len());

        let kept: Vec<usize> = (0..n).filter(|r| !marked.contains(r)).collect();
        for (record, &r) in loaded.dataset.records().iter().zip(kept.iter()) {
            prop_assert_eq!(record.features[0], rows[r][0]);
            prop_assert_eq!(record.target, binarize_target(rows[r][COLUMN_COUNT - 1]));
        }
    }
}

#[test]
fn missing_file_is_dataset_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("absent.csv");
    match load_and_clean(&path) {
        Err(DataError::DatasetNotFound(p)) => assert_eq!(p, path),
        other => panic!("expected DatasetNotFound, got {other:?}"),
    }
}

#[test]
fn loads_from_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("heart.csv");
    let rows = synthetic_rows(30, 5);
    std::fs::write(&path, to_raw_csv(&rows, &[(3, 12), (3, 11), (7, 0)])).unwrap();

    let loaded = load_and_clean(&path).unwrap();
    assert_eq!(loaded.report.rows_read, 30);
    assert_eq!(loaded.report.rows_dropped, 2);
    assert_eq!(loaded.report.missing_per_column[12], 1);
    assert_eq!(loaded.report.missing_per_column[0], 1);
    assert_eq!(loaded.dataset.len(), 28);
    assert!(loaded.dataset.labels().iter().all(|&t| t <= 1));
}
