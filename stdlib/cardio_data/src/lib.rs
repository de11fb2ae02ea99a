//! Cleveland heart-disease dataset primitives.
//!
//! - `schema`: canonical feature order and the shared field table
//! - `acquire`: download the raw file
//! - `load`: parse, drop incomplete rows, binarize the outcome
//! - `split`: seeded train/test partitioning
//!
//! Cleaning a raw file:
//! ```
//! use cardio_data::clean_reader;
//! let raw = "63,1,1,145,233,1,2,150,0,2.3,3,0,6,0\n67,1,4,160,286,0,2,108,1,1.5,2,?,3,2\n";
//! let loaded = clean_reader(raw.as_bytes()).unwrap();
//! assert_eq!(loaded.dataset.len(), 1);
//! assert_eq!(loaded.report.rows_dropped, 1);
//! ```

pub mod acquire;
pub mod error;
pub mod load;
pub mod record;
pub mod schema;
pub mod split;
pub mod testdata;

pub use acquire::{download, fetch, Acquirer, DEFAULT_DATASET_PATH, DEFAULT_DATASET_URL};
pub use error::{DataError, FetchError};
pub use load::{clean_reader, load_and_clean, CleaningReport, LoadedDataset};
pub use record::{binarize_target, CleanedDataset, FeatureRow, LabeledRecord, PatientFeatures};
pub use schema::{
    Domain, Feature, FieldSpec, COLUMN_COUNT, COLUMN_NAMES, FEATURE_COUNT, FEATURE_NAMES, FIELDS,
};
pub use split::{train_test_split, Split, DEFAULT_SEED, DEFAULT_TEST_FRACTION};
