//! Mean-squared-error objective and its gradient.
//!
//! The sample set is always an explicit argument; nothing here captures data.

use nalgebra::{DVector, Vector3};

use crate::domain::{SampleSet, SineParams};
use crate::models::{jacobian, predict};

/// Residuals `e_i = y_i - ŷ_i`.
pub fn residuals(samples: &SampleSet, params: &SineParams) -> DVector<f64> {
    DVector::from_iterator(
        samples.len(),
        samples
            .t()
            .iter()
            .zip(samples.y().iter())
            .map(|(&t, &y)| y - predict(t, params)),
    )
}

/// `MSE = (1/n)·Σ(y_i - ŷ_i)²`.
pub fn mse(samples: &SampleSet, params: &SineParams) -> f64 {
    residuals(samples, params).norm_squared() / samples.len() as f64
}

/// Gradient of the squared-residual objective: `-2·D·e`.
///
/// `D` is the 3×n partials matrix and `e` the residual vector. The `1/n` factor of
/// the MSE is not applied.
pub fn loss_gradient(samples: &SampleSet, params: &SineParams) -> Vector3<f64> {
    let d = jacobian(samples.t(), params);
    let e = residuals(samples, params);
    (d * e) * -2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::predict_all;
    use std::f64::consts::PI;

    fn samples_for(truth: &SineParams) -> SampleSet {
        let t: Vec<f64> = (0..40).map(|i| i as f64 * 0.2).collect();
        let y = predict_all(&t, truth);
        SampleSet::new(t, y).unwrap()
    }

    #[test]
    fn mse_is_zero_for_perfect_fit_and_positive_otherwise() {
        let truth = SineParams::new(3.0, 2.0, PI / 6.0);
        let samples = samples_for(&truth);
        assert_eq!(mse(&samples, &truth), 0.0);
        assert!(mse(&samples, &SineParams::new(1.0, 1.0, 1.0)) > 0.0);
    }

    #[test]
    fn mse_of_constant_offset() {
        let samples = SampleSet::new(vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 1.0]).unwrap();
        // amplitude 0 predicts 0 everywhere
        let p = SineParams::new(0.0, 1.0, 0.0);
        assert!((mse(&samples, &p) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn gradient_is_zero_at_generating_params() {
        let truth = SineParams::new(3.0, 2.0, PI / 6.0);
        let samples = samples_for(&truth);
        assert_eq!(loss_gradient(&samples, &truth), Vector3::zeros());
    }

    #[test]
    fn gradient_matches_finite_differences_of_sse() {
        let truth = SineParams::new(3.0, 2.0, PI / 6.0);
        let samples = samples_for(&truth);
        let p = SineParams::new(2.5, 1.9, 0.3);
        let n = samples.len() as f64;
        let sse = |q: &SineParams| mse(&samples, q) * n;

        let g = loss_gradient(&samples, &p);
        let h = 1e-6;
        for k in 0..3 {
            let mut up = p.to_vector();
            let mut down = p.to_vector();
            up[k] += h;
            down[k] -= h;
            let fd = (sse(&SineParams::from_vector(&up)) - sse(&SineParams::from_vector(&down)))
                / (2.0 * h);
            let scale = g[k].abs().max(1.0);
            assert!((g[k] - fd).abs() / scale < 1e-5, "k={k}: {} vs {fd}", g[k]);
        }
    }
}
