use cardio_ai::{InferenceService, PredictionRequest, RiskTier};
use cardio_data::{load_and_clean, PatientFeatures};
use cardio_model::{train_and_save, TrainConfig};
use pretty_assertions::assert_eq;
use std::fs;

use crate::write_raw_dataset;

#[test]
fn raw_file_to_served_prediction() {
    let tmp = tempfile::tempdir().unwrap();
    let raw = write_raw_dataset(tmp.path(), 160, 99, &[(0, 11), (7, 12), (7, 11), (50, 0)]);
    let model_path = tmp.path().join("heart_disease_model.json");

    let loaded = load_and_clean(&raw).unwrap();
    assert_eq!(loaded.report.rows_read, 160);
    assert_eq!(loaded.report.rows_dropped, 3);
    assert_eq!(loaded.report.total_missing(), 4);

    let trained = train_and_save(&loaded.dataset, &TrainConfig::default(), &model_path).unwrap();
    let service = InferenceService::open(&model_path).unwrap();

    for record in trained.split.test.records() {
        let request =
            PredictionRequest::from_features(PatientFeatures::from_row(record.features)).unwrap();
        let prediction = service.predict(&request).unwrap();
        assert!((0.0..=1.0).contains(&prediction.probability));
        assert_eq!(prediction.label == 1, prediction.probability >= 0.5);
        assert_eq!(prediction.tier == RiskTier::High, prediction.label == 1);
        assert_eq!(
            prediction.probability.to_bits(),
            trained.model.predict_proba(&record.features).to_bits()
        );
    }
}

#[test]
fn same_seed_gives_byte_identical_files() {
    let tmp = tempfile::tempdir().unwrap();
    let raw = write_raw_dataset(tmp.path(), 200, 4, &[]);
    let dataset = load_and_clean(&raw).unwrap().dataset;
    let a = tmp.path().join("a.json");
    let b = tmp.path().join("b.json");

    train_and_save(&dataset, &TrainConfig::default(), &a).unwrap();
    train_and_save(&dataset, &TrainConfig::default(), &b).unwrap();
    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());

    let other_seed = TrainConfig {
        seed: 7,
        ..TrainConfig::default()
    };
    train_and_save(&dataset, &other_seed, &b).unwrap();
    assert_ne!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn running_service_keeps_its_snapshot_after_retraining() {
    let tmp = tempfile::tempdir().unwrap();
    let raw = write_raw_dataset(tmp.path(), 200, 12, &[]);
    let dataset = load_and_clean(&raw).unwrap().dataset;
    let model_path = tmp.path().join("model.json");

    train_and_save(&dataset, &TrainConfig::default(), &model_path).unwrap();
    let service = InferenceService::open(&model_path).unwrap();
    let request = PredictionRequest::from_json(&serde_json::json!({
        "age": 58, "sex": 0, "cp": 3, "trestbps": 132, "chol": 224, "fbs": 0,
        "restecg": 2, "thalach": 173, "exang": 0, "oldpeak": 3.2, "slope": 1, "ca": 2, "thal": 7
    }))
    .unwrap();
    let before = service.predict(&request).unwrap();

    let retrain = TrainConfig {
        seed: 1234,
        c: 0.05,
        ..TrainConfig::default()
    };
    train_and_save(&dataset, &retrain, &model_path).unwrap();

    assert_eq!(service.predict(&request).unwrap(), before);
    let fresh = InferenceService::open(&model_path).unwrap();
    assert_ne!(
        fresh.predict(&request).unwrap().probability,
        before.probability
    );
}
