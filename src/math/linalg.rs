//! Curvature inversion for the pseudo-Newton step.
//!
//! The fitter approximates curvature with the outer product `M = g·gᵗ`. For a
//! nonzero `g` in three dimensions this matrix has rank 1, so a true inverse does
//! not exist. How the step `M⁻¹·g` is produced is therefore a policy:
//!
//! - `Exact`: rank-check `M` via SVD and refuse when it is numerically singular
//!   (`σ_min ≤ σ_max · RCOND`). This is the generic outcome for rank-1 `M`.
//! - `Pseudo`: Moore–Penrose pseudo-inverse, which for `g·gᵗ` yields `g / |g|²`.
//! - `Ridge`: `(M + λI)⁻¹·g`, solved with Cholesky since `M + λI` is SPD for
//!   `λ > 0`. Equals `g / (|g|² + λ)`.
//!
//! A zero gradient makes `M` the zero matrix, which every policy reports as
//! singular.

use nalgebra::{Matrix3, Vector3};

use crate::domain::InversePolicy;
use crate::error::AppError;

/// Relative singular-value cutoff used for rank decisions.
pub const RCOND: f64 = 1e-12;

/// Outer product `g·gᵗ`.
pub fn outer(g: &Vector3<f64>) -> Matrix3<f64> {
    g * g.transpose()
}

/// Compute `step = (g·gᵗ)⁻¹·g` under the given policy.
pub fn curvature_step(g: &Vector3<f64>, policy: InversePolicy) -> Result<Vector3<f64>, AppError> {
    let m = outer(g);
    if m.iter().all(|&v| v == 0.0) {
        return Err(AppError::singular(
            "Curvature matrix g·gᵗ is the zero matrix (gradient is exactly zero); cannot invert.",
        ));
    }

    match policy {
        InversePolicy::Exact => {
            let sv = m.singular_values();
            let (s_max, s_min) = (sv.max(), sv.min());
            if s_min <= s_max * RCOND {
                return Err(AppError::singular(format!(
                    "Curvature matrix g·gᵗ is singular (σ_max={s_max:.3e}, σ_min={s_min:.3e}); \
                     use --inverse pseudo or --inverse ridge to substitute a regularized inverse."
                )));
            }
            let inv = m
                .try_inverse()
                .ok_or_else(|| AppError::singular("Curvature matrix g·gᵗ is not invertible."))?;
            Ok(inv * g)
        }
        InversePolicy::Pseudo => {
            let svd = m.svd(true, true);
            let eps = svd.singular_values.max() * RCOND;
            let pinv = svd
                .pseudo_inverse(eps)
                .map_err(|e| AppError::singular(format!("Pseudo-inverse failed: {e}")))?;
            Ok(pinv * g)
        }
        InversePolicy::Ridge { lambda } => {
            if !(lambda.is_finite() && lambda > 0.0) {
                return Err(AppError::invalid(format!(
                    "Ridge lambda must be finite and > 0 (got {lambda})."
                )));
            }
            let regularized = m + Matrix3::identity() * lambda;
            let chol = regularized.cholesky().ok_or_else(|| {
                AppError::singular("Regularized curvature matrix is not positive definite.")
            })?;
            Ok(chol.solve(g))
        }
    }
}
