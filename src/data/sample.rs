//! Synthetic sample generation from a known sinusoid.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::{SampleSet, SampleSpec};
use crate::error::AppError;
use crate::math::linspace;
use crate::models::predict;

/// Generate `spec.count` samples of `spec.truth` on a regular `t` grid.
///
/// With `noise_sigma > 0` each observation gets i.i.d. Gaussian noise from a
/// `StdRng` seeded with `spec.seed`, so the same spec always yields the same data.
pub fn generate_samples(spec: &SampleSpec) -> Result<SampleSet, AppError> {
    if !spec.truth.is_finite() {
        return Err(AppError::invalid(format!(
            "Generating parameters must be finite ({}).",
            spec.truth
        )));
    }
    if !(spec.noise_sigma.is_finite() && spec.noise_sigma >= 0.0) {
        return Err(AppError::invalid(format!(
            "Noise sigma must be finite and >= 0 (got {}).",
            spec.noise_sigma
        )));
    }

    let t = linspace(spec.t_min, spec.t_max, spec.count)?;
    let mut y: Vec<f64> = t.iter().map(|&ti| predict(ti, &spec.truth)).collect();

    if spec.noise_sigma > 0.0 {
        let mut rng = StdRng::seed_from_u64(spec.seed);
        let normal = Normal::new(0.0, spec.noise_sigma)
            .map_err(|e| AppError::invalid(format!("Noise distribution error: {e}")))?;
        for yi in &mut y {
            *yi += normal.sample(&mut rng);
        }
    }

    SampleSet::new(t, y)
}
