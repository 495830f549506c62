//! Pseudo-Newton parameter fitting.
//!
//! Each step:
//!
//! 1. `g = ∇L(p)` from [`loss_gradient`]
//! 2. `step = (g·gᵗ)⁻¹·g` per the configured [`InversePolicy`]
//! 3. `p' = p - step`
//!
//! The driver is a small state machine (`Running` → `Converged` | `Exhausted`)
//! around the pure [`NewtonFitter::step`]. Non-convergence is reported through
//! [`FitStatus::Exhausted`], not as an error; only inversion failures (and
//! non-finite values) abort the fit.

use log::{debug, info, warn};
use nalgebra::Vector3;

use crate::domain::{FitOutcome, FitStatus, IterationRecord, NewtonOptions, SampleSet, SineParams};
use crate::error::AppError;
use crate::fit::objective::{loss_gradient, mse};
use crate::math::curvature_step;

/// Result of a single update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonStep {
    /// Parameters after the update.
    pub params: SineParams,
    /// Gradient at the parameters the step started from.
    pub gradient: Vector3<f64>,
    /// `‖p' - p‖₂`
    pub step_norm: f64,
}

/// Pseudo-Newton driver bound to one sample set.
#[derive(Debug, Clone)]
pub struct NewtonFitter<'a> {
    samples: &'a SampleSet,
    options: NewtonOptions,
}

impl<'a> NewtonFitter<'a> {
    pub fn new(samples: &'a SampleSet, options: NewtonOptions) -> Result<Self, AppError> {
        if !(options.tol.is_finite() && options.tol >= 0.0) {
            return Err(AppError::invalid(format!(
                "Tolerance must be finite and >= 0 (got {}).",
                options.tol
            )));
        }
        Ok(Self { samples, options })
    }

    pub fn options(&self) -> &NewtonOptions {
        &self.options
    }

    /// Apply one update to `params`. Pure: the same input always yields the same step.
    pub fn step(&self, params: &SineParams) -> Result<NewtonStep, AppError> {
        let gradient = loss_gradient(self.samples, params);
        if !gradient.iter().all(|v| v.is_finite()) {
            return Err(AppError::non_finite(format!(
                "Gradient is not finite at {params}; the iteration diverged."
            )));
        }

        let delta = curvature_step(&gradient, self.options.inverse)?;
        let current = params.to_vector();
        let next = current - delta;
        let next_params = SineParams::from_vector(&next);
        if !next_params.is_finite() {
            return Err(AppError::non_finite(format!(
                "Newton step from {params} produced non-finite parameters."
            )));
        }

        Ok(NewtonStep {
            params: next_params,
            gradient,
            step_norm: (next - current).norm(),
        })
    }

    /// Iterate from `initial` until the step norm drops below `tol` or `max_iter`
    /// steps have been applied.
    pub fn fit(&self, initial: SineParams) -> Result<FitOutcome, AppError> {
        let NewtonOptions { max_iter, tol, .. } = self.options;

        let mut current = initial;
        let mut trace = Vec::new();
        let mut iterations = 0;
        let mut status = FitStatus::Running;

        while status == FitStatus::Running {
            if iterations >= max_iter {
                status = FitStatus::Exhausted;
                continue;
            }

            let step = self.step(&current)?;
            iterations += 1;

            let loss = mse(self.samples, &step.params);
            debug!(
                "iter {iterations}: {} loss={loss:.6e} |g|={:.3e} |step|={:.3e}",
                step.params,
                step.gradient.norm(),
                step.step_norm
            );
            trace.push(IterationRecord {
                iteration: iterations,
                params: step.params,
                loss,
                grad_norm: step.gradient.norm(),
                step_norm: step.step_norm,
            });

            current = step.params;
            if step.step_norm < tol {
                status = FitStatus::Converged;
            }
        }

        match status {
            FitStatus::Converged => info!("converged after {iterations} iteration(s): {current}"),
            _ => warn!("no convergence within {max_iter} iteration(s); returning last iterate {current}"),
        }

        Ok(FitOutcome {
            params: current,
            status,
            iterations,
            loss: mse(self.samples, &current),
            trace,
        })
    }
}

/// Fit `samples` from `initial` with the given options.
pub fn fit(
    samples: &SampleSet,
    initial: SineParams,
    options: NewtonOptions,
) -> Result<FitOutcome, AppError> {
    NewtonFitter::new(samples, options)?.fit(initial)
}
