//! Multi-start scan over initial angular frequencies.
//!
//! The sinusoid objective is highly non-convex in `W`, so the fitted optimum
//! depends strongly on the initial guess. The scan reruns the same fitter from a
//! grid of starting `W` values (keeping the starting `A` and `Z`) and ranks the
//! results by final loss. Runs are sequential.

use log::warn;

use crate::domain::{FitOutcome, NewtonOptions, SampleSet, SineParams};
use crate::error::AppError;
use crate::fit::newton::NewtonFitter;

/// One start of the scan.
#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub initial: SineParams,
    /// Fit outcome, or the error message if the fit aborted.
    pub result: Result<FitOutcome, String>,
}

#[derive(Debug, Clone)]
pub struct ScanReport {
    pub entries: Vec<ScanEntry>,
}

impl ScanReport {
    /// Successful entries ordered by final loss (lowest first).
    pub fn ranked(&self) -> Vec<(&SineParams, &FitOutcome)> {
        let mut ok: Vec<(&SineParams, &FitOutcome)> = self
            .entries
            .iter()
            .filter_map(|e| e.result.as_ref().ok().map(|o| (&e.initial, o)))
            .collect();
        ok.sort_by(|a, b| a.1.loss.total_cmp(&b.1.loss));
        ok
    }

    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_err()).count()
    }
}

/// Run the fitter once per value in `omegas`.
///
/// Invalid options fail the whole scan; per-start fit failures (e.g. singular
/// curvature) are recorded in the entry.
pub fn scan(
    samples: &SampleSet,
    base_initial: SineParams,
    omegas: &[f64],
    options: NewtonOptions,
) -> Result<ScanReport, AppError> {
    let fitter = NewtonFitter::new(samples, options)?;

    let entries = omegas
        .iter()
        .map(|&omega| {
            let initial = SineParams { omega, ..base_initial };
            let result = fitter.fit(initial).map_err(|e| {
                warn!("scan start W={omega:.4} failed: {e}");
                e.to_string()
            });
            ScanEntry { initial, result }
        })
        .collect();

    Ok(ScanReport { entries })
}
