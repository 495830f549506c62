//! Shared fit pipeline used by the `fit` and `scan` commands.
//!
//! sample generation -> fit (single start or scan) -> diagnostics
//!
//! The commands then only deal with presentation (printing, plotting, exports).

use crate::data::generate_samples;
use crate::domain::{FitOutcome, RunConfig, SampleSet, ScanConfig};
use crate::error::AppError;
use crate::fit::{ScanReport, fit, scan};
use crate::math::linspace;
use crate::report::{FitDiagnostics, compute_diagnostics};

/// All computed outputs of a single `sinefit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub samples: SampleSet,
    pub outcome: FitOutcome,
    pub diagnostics: FitDiagnostics,
}

/// Execute the single-start pipeline.
pub fn run_fit(config: &RunConfig) -> Result<RunOutput, AppError> {
    let samples = generate_samples(&config.sample)?;
    let outcome = fit(&samples, config.initial, config.options)?;
    let diagnostics = compute_diagnostics(&samples, &outcome.params, Some(&config.sample.truth));

    Ok(RunOutput {
        samples,
        outcome,
        diagnostics,
    })
}

/// Execute the multi-start pipeline.
pub fn run_scan(config: &ScanConfig) -> Result<ScanReport, AppError> {
    let samples = generate_samples(&config.run.sample)?;
    let omegas = linspace(config.omega_min, config.omega_max, config.omega_steps)?;
    scan(&samples, config.run.initial, &omegas, config.run.options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitStatus, InversePolicy, NewtonOptions, SampleSpec, SineParams};
    use crate::error::ErrorKind;

    fn config(options: NewtonOptions) -> RunConfig {
        RunConfig {
            sample: SampleSpec::default(),
            initial: SineParams::new(1.0, 1.0, 1.0),
            options,
            show_trace: false,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_fit: None,
            export_samples: None,
            export_trace: None,
        }
    }

    #[test]
    fn default_pipeline_surfaces_singular_curvature() {
        let err = run_fit(&config(NewtonOptions::default())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SingularMatrix);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn ridge_pipeline_produces_diagnostics() {
        let options = NewtonOptions {
            max_iter: 10,
            tol: 1e-6,
            inverse: InversePolicy::Ridge { lambda: 1e4 },
        };
        let run = run_fit(&config(options)).unwrap();
        assert_eq!(run.samples.len(), 100);
        assert_eq!(run.outcome.status, FitStatus::Exhausted);
        assert!(run.diagnostics.param_error.is_some());
        assert!((run.diagnostics.rmse.powi(2) - run.outcome.loss).abs() < 1e-9);
    }

    #[test]
    fn scan_rejects_bad_grid() {
        let cfg = ScanConfig {
            run: config(NewtonOptions::default()),
            omega_min: 2.0,
            omega_max: 1.0,
            omega_steps: 5,
            top_n: 3,
        };
        assert_eq!(run_scan(&cfg).unwrap_err().kind(), ErrorKind::InvalidInput);
    }
}
