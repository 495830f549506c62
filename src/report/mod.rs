//! Reporting utilities: fit diagnostics and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{SampleSet, SineParams};
use crate::fit::residuals;

/// Summary statistics of a fit against its samples and (optionally) the
/// generating parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FitDiagnostics {
    pub rmse: f64,
    pub max_abs_residual: f64,
    /// Fitted parameters folded into canonical form.
    pub canonical: SineParams,
    /// `canonical - truth.canonical()`, component-wise.
    pub param_error: Option<SineParams>,
}

pub fn compute_diagnostics(
    samples: &SampleSet,
    params: &SineParams,
    truth: Option<&SineParams>,
) -> FitDiagnostics {
    let e = residuals(samples, params);
    let rmse = (e.norm_squared() / samples.len() as f64).sqrt();
    let max_abs_residual = e.iter().fold(0.0_f64, |acc, r| acc.max(r.abs()));
    let canonical = params.canonical();
    let param_error = truth.map(|t| {
        let t = t.canonical();
        SineParams::new(
            canonical.amplitude - t.amplitude,
            canonical.omega - t.omega,
            canonical.phase - t.phase,
        )
    });

    FitDiagnostics {
        rmse,
        max_abs_residual,
        canonical,
        param_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn diagnostics_of_sign_flipped_exact_fit() {
        let truth = SineParams::new(3.0, 2.0, PI / 6.0);
        let t: Vec<f64> = (0..10).map(|i| i as f64 * 0.3).collect();
        let y = crate::models::predict_all(&t, &truth);
        let samples = SampleSet::new(t, y).unwrap();

        let flipped = SineParams::new(-3.0, 2.0, PI / 6.0 + PI);
        let d = compute_diagnostics(&samples, &flipped, Some(&truth));
        assert!(d.rmse < 1e-12);
        assert!(d.max_abs_residual < 1e-12);
        let err = d.param_error.unwrap();
        assert!(err.amplitude.abs() < 1e-12);
        assert!(err.omega.abs() < 1e-12);
        assert!(err.phase.abs() < 1e-12);
    }
}
