//! Sinusoid model evaluation.
//!
//! The fitter relies on two primitive operations:
//! - predict `y(t)` for given parameters (for residuals/plots)
//! - the per-sample partial derivatives of `y(t)` w.r.t. `(A, W, Z)` (for the gradient)

use nalgebra::{Matrix3xX, Vector3};

use crate::domain::SineParams;

/// Predict `y(t) = A·sin(W·t + Z)`.
pub fn predict(t: f64, params: &SineParams) -> f64 {
    params.amplitude * (params.omega * t + params.phase).sin()
}

/// Element-wise [`predict`] over a sequence of `t` values.
pub fn predict_all(ts: &[f64], params: &SineParams) -> Vec<f64> {
    ts.iter().map(|&t| predict(t, params)).collect()
}

/// Partial derivatives of `y(t)` in `(A, W, Z)` order:
///
/// - `∂y/∂A = sin(Wt + Z)`
/// - `∂y/∂W = A·t·cos(Wt + Z)`
/// - `∂y/∂Z = A·cos(Wt + Z)`
pub fn partials(t: f64, params: &SineParams) -> Vector3<f64> {
    let (sin, cos) = (params.omega * t + params.phase).sin_cos();
    let a = params.amplitude;
    Vector3::new(sin, a * t * cos, a * cos)
}

/// The 3×n matrix of partials: one row per parameter, one column per sample.
pub fn jacobian(ts: &[f64], params: &SineParams) -> Matrix3xX<f64> {
    Matrix3xX::from_iterator(
        ts.len(),
        ts.iter().flat_map(|&t| {
            let d = partials(t, params);
            [d[0], d[1], d[2]]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn predict_matches_closed_form() {
        let p = SineParams::new(3.0, 2.0, PI / 6.0);
        assert!((predict(0.0, &p) - 1.5).abs() < 1e-12);
        let ys = predict_all(&[0.0, PI / 6.0], &p);
        assert_eq!(ys.len(), 2);
        // 3·sin(π/3 + π/6) = 3
        assert!((ys[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn partials_agree_with_finite_differences() {
        let p = SineParams::new(1.7, 0.8, -0.4);
        let h = 1e-6;
        for &t in &[0.0, 0.5, 2.0, 7.3] {
            let d = partials(t, &p);
            let base = p.to_vector();
            for k in 0..3 {
                let mut up = base;
                let mut down = base;
                up[k] += h;
                down[k] -= h;
                let fd = (predict(t, &SineParams::from_vector(&up))
                    - predict(t, &SineParams::from_vector(&down)))
                    / (2.0 * h);
                assert!((d[k] - fd).abs() < 1e-6, "t={t} k={k}: {} vs {fd}", d[k]);
            }
        }
    }

    #[test]
    fn jacobian_of_empty_sequence_is_3x0() {
        let d = jacobian(&[], &SineParams::new(1.0, 1.0, 1.0));
        assert_eq!(d.shape(), (3, 0));
        assert!(predict_all(&[], &SineParams::new(1.0, 1.0, 1.0)).is_empty());
    }

    #[test]
    fn jacobian_has_one_row_per_parameter() {
        let p = SineParams::new(2.0, 1.0, 0.0);
        let ts = [0.0, 1.0, 2.0, 3.0];
        let d = jacobian(&ts, &p);
        assert_eq!(d.nrows(), 3);
        assert_eq!(d.ncols(), ts.len());
        for (j, &t) in ts.iter().enumerate() {
            assert_eq!(d.column(j).into_owned(), partials(t, &p));
        }
    }
}
