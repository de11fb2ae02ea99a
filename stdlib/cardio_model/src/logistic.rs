//! Binary L2-regularised logistic regression.
//!
//! Minimises `½‖w‖² + C·Σ logloss(yᵢ, w·xᵢ + b)` with Newton steps and a
//! backtracking line search. The intercept is not penalised. Features are used
//! as given; no scaling happens here or at prediction time.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::Classifier;

/// Stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^z)` without overflow.
fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegressionParams {
    /// Inverse regularisation strength.
    pub c: f64,
    pub max_iter: usize,
    /// Stop once every gradient component is at most this large.
    pub tolerance: f64,
}

impl Default for LogisticRegressionParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tolerance: 1e-4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub iterations: usize,
    pub converged: bool,
    pub objective: f64,
    /// Largest absolute gradient component at the returned solution.
    pub gradient_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    pub fn fit<R: AsRef<[f64]>>(
        x: &[R],
        y: &[u8],
        params: &LogisticRegressionParams,
    ) -> Result<(Self, FitSummary), ModelError> {
        if !(params.c > 0.0 && params.c.is_finite()) {
            return Err(ModelError::InvalidConfig(format!(
                "C must be a positive number, got {}",
                params.c
            )));
        }
        if !(params.tolerance > 0.0) {
            return Err(ModelError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                params.tolerance
            )));
        }
        let n_features = check_design(x, y)?;
        let d = n_features + 1;
        let problem = Problem {
            x,
            y,
            c: params.c,
            n_features,
        };

        let mut theta = vec![0.0f64; d];
        let mut iterations = 0;
        let mut converged = false;
        let mut objective = problem.objective(&theta);

        while iterations < params.max_iter {
            let (grad, hess) = problem.gradient_and_hessian(&theta);
            let gmax = max_abs(&grad);
            if gmax <= params.tolerance {
                converged = true;
                break;
            }
            let step = solve_with_jitter(&hess, &grad, d)?;

            // Armijo backtracking along the Newton direction.
            let slope: f64 = grad.iter().zip(&step).map(|(g, s)| g * s).sum();
            let mut t = 1.0;
            let mut candidate = vec![0.0f64; d];
            let mut accepted = false;
            while t > 1e-12 {
                for ((c, th), s) in candidate.iter_mut().zip(&theta).zip(&step) {
                    *c = th - t * s;
                }
                let value = problem.objective(&candidate);
                if value <= objective - 1e-4 * t * slope {
                    objective = value;
                    accepted = true;
                    break;
                }
                t *= 0.5;
            }
            iterations += 1;
            if !accepted {
                debug!("line search stalled after {iterations} iterations");
                break;
            }
            std::mem::swap(&mut theta, &mut candidate);
        }

        let (grad, _) = problem.gradient_and_hessian(&theta);
        let gradient_max = max_abs(&grad);
        converged = converged || gradient_max <= params.tolerance;
        if !converged {
            warn!(
                "logistic regression stopped after {iterations} iterations without converging (max |grad| = {gradient_max:.3e})"
            );
        }

        let intercept = theta[n_features];
        theta.truncate(n_features);
        let model = Self {
            coefficients: theta,
            intercept,
        };
        Ok((
            model,
            FitSummary {
                iterations,
                converged,
                objective,
                gradient_max,
            },
        ))
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Raw score `w·x + b`.
    pub fn decision_function(&self, row: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(row.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }

    /// Probability of class 1.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        sigmoid(self.decision_function(row))
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "Logistic Regression"
    }

    fn predict_proba(&self, row: &[f64]) -> f64 {
        LogisticRegression::predict_proba(self, row)
    }
}

/// Validate shapes and labels; returns the feature count.
pub(crate) fn check_design<R: AsRef<[f64]>>(x: &[R], y: &[u8]) -> Result<usize, ModelError> {
    if x.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }
    if x.len() != y.len() {
        return Err(ModelError::DimensionMismatch {
            expected: x.len(),
            found: y.len(),
        });
    }
    let n_features = x[0].as_ref().len();
    for row in x {
        let row = row.as_ref();
        if row.len() != n_features {
            return Err(ModelError::DimensionMismatch {
                expected: n_features,
                found: row.len(),
            });
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidConfig(
                "feature values must be finite".into(),
            ));
        }
    }
    if let Some(bad) = y.iter().find(|&&label| label > 1) {
        return Err(ModelError::InvalidConfig(format!(
            "labels must be 0 or 1, found {bad}"
        )));
    }
    let positives = y.iter().filter(|&&label| label == 1).count();
    if positives == 0 {
        return Err(ModelError::SingleClass(0));
    }
    if positives == y.len() {
        return Err(ModelError::SingleClass(1));
    }
    Ok(n_features)
}

struct Problem<'a, R> {
    x: &'a [R],
    y: &'a [u8],
    c: f64,
    n_features: usize,
}

impl<R: AsRef<[f64]>> Problem<'_, R> {
    fn score(&self, theta: &[f64], row: &[f64]) -> f64 {
        let nf = self.n_features;
        theta[..nf]
            .iter()
            .zip(row.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + theta[nf]
    }

    fn objective(&self, theta: &[f64]) -> f64 {
        let nf = self.n_features;
        let penalty = 0.5 * theta[..nf].iter().map(|w| w * w).sum::<f64>();
        let loss: f64 = self
            .x
            .iter()
            .zip(self.y.iter())
            .map(|(row, &label)| {
                let z = self.score(theta, row.as_ref());
                softplus(z) - f64::from(label) * z
            })
            .sum();
        penalty + self.c * loss
    }

    /// Gradient and row-major Hessian of the objective; the last coordinate is the intercept.
    fn gradient_and_hessian(&self, theta: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let nf = self.n_features;
        let d = nf + 1;
        let mut grad = vec![0.0f64; d];
        let mut hess = vec![0.0f64; d * d];
        let mut xi = vec![1.0f64; d];

        for (row, &label) in self.x.iter().zip(self.y.iter()) {
            let row = row.as_ref();
            xi[..nf].copy_from_slice(row);
            let p = sigmoid(self.score(theta, row));
            let residual = p - f64::from(label);
            let weight = p * (1.0 - p);
            for j in 0..d {
                grad[j] += residual * xi[j];
                let wj = weight * xi[j];
                for k in 0..=j {
                    hess[j * d + k] += wj * xi[k];
                }
            }
        }

        for j in 0..d {
            grad[j] *= self.c;
            for k in 0..=j {
                hess[j * d + k] *= self.c;
                hess[k * d + j] = hess[j * d + k];
            }
        }
        for j in 0..nf {
            grad[j] += theta[j];
            hess[j * d + j] += 1.0;
        }
        (grad, hess)
    }
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0f64, |m, x| m.max(x.abs()))
}

fn solve_with_jitter(a: &[f64], b: &[f64], n: usize) -> Result<Vec<f64>, ModelError> {
    if let Some(x) = solve_spd(a, b, n) {
        return Ok(x);
    }
    let scale = (0..n).map(|i| a[i * n + i].abs()).fold(0.0f64, f64::max).max(1.0);
    let mut jitter = scale * 1e-10;
    let mut shifted = a.to_vec();
    for _ in 0..8 {
        for i in 0..n {
            shifted[i * n + i] = a[i * n + i] + jitter;
        }
        if let Some(x) = solve_spd(&shifted, b, n) {
            return Ok(x);
        }
        jitter *= 100.0;
    }
    Err(ModelError::Singular)
}

/// Solve `A x = b` for a symmetric positive definite `A` via Cholesky.
fn solve_spd(a: &[f64], b: &[f64], n: usize) -> Option<Vec<f64>> {
    let mut l = vec![0.0f64; n * n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i * n + j];
            for k in 0..j {
                sum -= l[i * n + k] * l[j * n + k];
            }
            if i == j {
                if !(sum > 0.0) || !sum.is_finite() {
                    return None;
                }
                l[i * n + i] = sum.sqrt();
            } else {
                l[i * n + j] = sum / l[j * n + j];
            }
        }
    }

    let mut z = vec![0.0f64; n];
    for i in 0..n {
        let mut s = b[i];
        for k in 0..i {
            s -= l[i * n + k] * z[k];
        }
        z[i] = s / l[i * n + i];
    }
    let mut x = vec![0.0f64; n];
    for i in (0..n).rev() {
        let mut s = z[i];
        for k in i + 1..n {
            s -= l[k * n + i] * x[k];
        }
        x[i] = s / l[i * n + i];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn toy() -> (Vec<[f64; 2]>, Vec<u8>) {
        let x = vec![
            [2.0, 1.5],
            [1.8, 2.2],
            [2.5, 1.9],
            [3.0, 2.8],
            [3.5, 2.5],
            [6.5, 5.0],
            [7.0, 8.5],
            [6.8, 7.2],
            [8.0, 6.5],
            [5.5, 3.0],
        ];
        let y = vec![0, 0, 0, 1, 0, 1, 1, 1, 1, 0];
        (x, y)
    }

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_abs_diff_eq!(sigmoid(0.0), 0.5, epsilon = 1e-15);
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_abs_diff_eq!(softplus(-1000.0), 0.0, epsilon = 1e-300);
        assert_abs_diff_eq!(softplus(1000.0), 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn cholesky_solves_small_system() {
        // [[4,2],[2,3]] x = [2,1] -> x = [0.5, 0]
        let x = solve_spd(&[4.0, 2.0, 2.0, 3.0], &[2.0, 1.0], 2).unwrap();
        assert_abs_diff_eq!(x[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 0.0, epsilon = 1e-12);
        assert!(solve_spd(&[0.0, 0.0, 0.0, 1.0], &[1.0, 1.0], 2).is_none());
    }

    #[test]
    fn fit_reaches_stationary_point() {
        let (x, y) = toy();
        let params = LogisticRegressionParams::default();
        let (model, summary) = LogisticRegression::fit(&x, &y, &params).unwrap();
        assert!(summary.converged, "{summary:?}");
        assert!(summary.iterations < 100);
        assert!(summary.gradient_max <= params.tolerance);

        // Stationarity: w = -C * Σ (p - y) x, and Σ (p - y) = 0 for the free intercept.
        let mut residual_sum = 0.0;
        let mut weighted = [0.0f64; 2];
        for (row, &label) in x.iter().zip(&y) {
            let r = model.predict_proba(row) - f64::from(label);
            residual_sum += r;
            weighted[0] += r * row[0];
            weighted[1] += r * row[1];
        }
        assert_abs_diff_eq!(residual_sum, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(model.coefficients[0], -weighted[0], epsilon = 1e-3);
        assert_abs_diff_eq!(model.coefficients[1], -weighted[1], epsilon = 1e-3);
    }

    #[test]
    fn larger_values_push_towards_disease() {
        let (x, y) = toy();
        let (model, _) =
            LogisticRegression::fit(&x, &y, &LogisticRegressionParams::default()).unwrap();
        assert!(model.predict_proba(&[8.0, 8.0]) > 0.5);
        assert!(model.predict_proba(&[1.5, 1.5]) < 0.5);
        assert_eq!(Classifier::predict(&model, &[8.0, 8.0]), 1);
    }

    #[test]
    fn stronger_regularisation_shrinks_weights() {
        let (x, y) = toy();
        let (loose, _) =
            LogisticRegression::fit(&x, &y, &LogisticRegressionParams::default()).unwrap();
        let tight_params = LogisticRegressionParams {
            c: 0.01,
            ..LogisticRegressionParams::default()
        };
        let (tight, _) = LogisticRegression::fit(&x, &y, &tight_params).unwrap();
        let norm = |m: &LogisticRegression| m.coefficients.iter().map(|w| w * w).sum::<f64>();
        assert!(norm(&tight) < norm(&loose));
    }

    #[test]
    fn rejects_bad_training_input() {
        let params = LogisticRegressionParams::default();
        let empty: Vec<[f64; 2]> = vec![];
        assert!(matches!(
            LogisticRegression::fit(&empty, &[], &params),
            Err(ModelError::EmptyTrainingSet)
        ));
        assert!(matches!(
            LogisticRegression::fit(&[[1.0], [2.0]], &[1, 1], &params),
            Err(ModelError::SingleClass(1))
        ));
        assert!(matches!(
            LogisticRegression::fit(&[[1.0], [2.0]], &[0], &params),
            Err(ModelError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            LogisticRegression::fit(&[[1.0], [2.0]], &[0, 2], &params),
            Err(ModelError::InvalidConfig(_))
        ));
        let ragged: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(
            LogisticRegression::fit(&ragged, &[0, 1], &params),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }
}
