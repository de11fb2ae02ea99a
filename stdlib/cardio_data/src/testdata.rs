//! Synthetic Cleveland-like rows for tests and demos.
//!
//! Values stay inside the field-table domains and the outcome depends on the
//! usual risk markers, so a fitted model has real signal to find.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::schema::COLUMN_COUNT;

/// One raw row: 13 features followed by a 0-4 outcome.
pub type RawRow = [f64; COLUMN_COUNT];

pub fn synthetic_rows(n: usize, seed: u64) -> Vec<RawRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| synthetic_row(&mut rng)).collect()
}

fn synthetic_row(rng: &mut StdRng) -> RawRow {
    let age = rng.gen_range(29..=77) as f64;
    let sex = if rng.gen_bool(0.68) { 1.0 } else { 0.0 };
    let cp = rng.gen_range(1..=4) as f64;
    let trestbps = rng.gen_range(94..=200) as f64;
    let chol = rng.gen_range(126..=400) as f64;
    let fbs = if rng.gen_bool(0.15) { 1.0 } else { 0.0 };
    let restecg = rng.gen_range(0..=2) as f64;
    let thalach = (205.0 - 0.9 * age + rng.gen_range(-25.0..25.0f64)).round().clamp(71.0, 202.0);
    let exang = if rng.gen_bool(0.33) { 1.0 } else { 0.0 };
    let oldpeak = (rng.gen_range(0.0..4.0f64) * 10.0).round() / 10.0;
    let slope = rng.gen_range(1..=3) as f64;
    let ca = [0.0, 0.0, 1.0, 2.0, 3.0][rng.gen_range(0..5)];
    let thal = [3.0, 3.0, 6.0, 7.0, 7.0][rng.gen_range(0..5)];

    let logit = -5.8
        + 0.04 * age
        + 0.9 * sex
        + if cp == 4.0 { 1.2 } else { -0.3 }
        + 0.9 * exang
        + 0.7 * oldpeak
        + 0.8 * ca
        + if thal == 7.0 { 1.3 } else { 0.0 }
        - 0.02 * (thalach - 150.0)
        + 0.005 * (trestbps - 130.0);
    let p = 1.0 / (1.0 + (-logit).exp());
    let target = if rng.gen_bool(p) {
        rng.gen_range(1..=4) as f64
    } else {
        0.0
    };

    [
        age, sex, cp, trestbps, chol, fbs, restecg, thalach, exang, oldpeak, slope, ca, thal,
        target,
    ]
}

/// Render rows in the raw file format; `missing` lists `(row, column)` cells to
/// replace with the missing marker.
pub fn to_raw_csv(rows: &[RawRow], missing: &[(usize, usize)]) -> String {
    let mut out = String::new();
    for (r, row) in rows.iter().enumerate() {
        let fields: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(c, v)| {
                if missing.contains(&(r, c)) {
                    crate::schema::MISSING_MARKER.to_string()
                } else {
                    format!("{v:.1}")
                }
            })
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// `n` synthetic rows rendered as a raw file with no missing values.
pub fn synthetic_csv(n: usize, seed: u64) -> String {
    to_raw_csv(&synthetic_rows(n, seed), &[])
}
