//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::f64::consts::{PI, TAU};
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Parameter names in vector order.
pub const PARAM_NAMES: [&str; 3] = ["A", "W", "Z"];

/// Parameters of `y(t) = A·sin(W·t + Z)`.
///
/// The vector form is always ordered `(A, W, Z)`; gradients use the same order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SineParams {
    pub amplitude: f64,
    pub omega: f64,
    pub phase: f64,
}

impl SineParams {
    pub const fn new(amplitude: f64, omega: f64, phase: f64) -> Self {
        Self {
            amplitude,
            omega,
            phase,
        }
    }

    pub fn from_vector(v: &Vector3<f64>) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.amplitude, self.omega, self.phase)
    }

    pub fn is_finite(&self) -> bool {
        self.amplitude.is_finite() && self.omega.is_finite() && self.phase.is_finite()
    }

    /// Canonical representative of the equivalence class of sinusoids.
    ///
    /// `(A, W, Z)`, `(-A, W, Z + π)` and `(-A, -W, -Z)` describe the same curve. The
    /// result has `A ≥ 0`, `W ≥ 0` and `Z ∈ (-π, π]`, which makes fitted parameters
    /// comparable against the generating ones.
    pub fn canonical(&self) -> Self {
        let (mut a, mut w, mut z) = (self.amplitude, self.omega, self.phase);
        if w < 0.0 {
            a = -a;
            w = -w;
            z = -z;
        }
        if a < 0.0 {
            a = -a;
            z += PI;
        }
        Self::new(a, w, wrap_phase(z))
    }
}

impl std::fmt::Display for SineParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A={:.6} W={:.6} Z={:.6}",
            self.amplitude, self.omega, self.phase
        )
    }
}

/// Parses `"A,W,Z"`.
impl FromStr for SineParams {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|e| format!("invalid number '{}': {e}", part.trim()))
            })
            .collect::<Result<Vec<f64>, String>>()?;

        match values.as_slice() {
            [a, w, z] => Ok(Self::new(*a, *w, *z)),
            _ => Err(format!(
                "expected 3 comma-separated values (A,W,Z), got {}",
                values.len()
            )),
        }
    }
}

/// Wrap an angle into `(-π, π]`.
pub fn wrap_phase(z: f64) -> f64 {
    let r = z.rem_euclid(TAU);
    if r > PI { r - TAU } else { r }
}

/// Observed samples: parallel `t` and `y` sequences.
///
/// Immutable once built. The constructor is the only place lengths and values are
/// validated, so loss/gradient code can rely on `t.len() == y.len() >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSet {
    t: Vec<f64>,
    y: Vec<f64>,
}

impl SampleSet {
    pub fn new(t: Vec<f64>, y: Vec<f64>) -> Result<Self, AppError> {
        if t.len() != y.len() {
            return Err(AppError::invalid(format!(
                "Sample length mismatch: {} t-values vs {} y-values.",
                t.len(),
                y.len()
            )));
        }
        if t.is_empty() {
            return Err(AppError::invalid("Sample set must contain at least one point."));
        }
        if let Some(i) = t
            .iter()
            .zip(y.iter())
            .position(|(a, b)| !(a.is_finite() && b.is_finite()))
        {
            return Err(AppError::invalid(format!(
                "Non-finite sample at index {i}: t={}, y={}.",
                t[i], y[i]
            )));
        }
        Ok(Self { t, y })
    }

    pub fn t(&self) -> &[f64] {
        &self.t
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// `(min t, max t)`; always defined because the set is non-empty.
    pub fn t_range(&self) -> (f64, f64) {
        self.t
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| {
                (lo.min(t), hi.max(t))
            })
    }
}

/// How the rank-1 curvature `g·gᵗ` is turned into a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InversePolicy {
    /// True inverse; fails with a singular-matrix error when rank-deficient.
    Exact,
    /// Moore–Penrose pseudo-inverse.
    Pseudo,
    /// Tikhonov regularization `(g·gᵗ + λI)⁻¹`.
    Ridge { lambda: f64 },
}

impl std::fmt::Display for InversePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InversePolicy::Exact => write!(f, "exact"),
            InversePolicy::Pseudo => write!(f, "pseudo"),
            InversePolicy::Ridge { lambda } => write!(f, "ridge(λ={lambda})"),
        }
    }
}

/// CLI-facing selector for [`InversePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InverseKind {
    Exact,
    Pseudo,
    Ridge,
}

impl InverseKind {
    pub fn policy(self, ridge_lambda: f64) -> InversePolicy {
        match self {
            InverseKind::Exact => InversePolicy::Exact,
            InverseKind::Pseudo => InversePolicy::Pseudo,
            InverseKind::Ridge => InversePolicy::Ridge {
                lambda: ridge_lambda,
            },
        }
    }
}

/// Options for the Newton driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonOptions {
    pub max_iter: usize,
    pub tol: f64,
    pub inverse: InversePolicy,
}

impl Default for NewtonOptions {
    fn default() -> Self {
        Self {
            max_iter: 100,
            tol: 1e-6,
            inverse: InversePolicy::Exact,
        }
    }
}

/// Driver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitStatus {
    Running,
    Converged,
    /// `max_iter` steps were applied without meeting the tolerance.
    Exhausted,
}

/// One applied Newton step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based step index.
    pub iteration: usize,
    /// Parameters after the step.
    pub params: SineParams,
    /// MSE at `params`.
    pub loss: f64,
    /// Norm of the gradient the step was computed from.
    pub grad_norm: f64,
    /// Norm of the parameter update `‖p' - p‖₂`.
    pub step_norm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOutcome {
    pub params: SineParams,
    pub status: FitStatus,
    pub iterations: usize,
    pub loss: f64,
    pub trace: Vec<IterationRecord>,
}

/// How synthetic samples are generated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSpec {
    pub truth: SineParams,
    pub t_min: f64,
    pub t_max: f64,
    pub count: usize,
    pub noise_sigma: f64,
    pub seed: u64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            truth: SineParams::new(3.0, 2.0, PI / 6.0),
            t_min: 0.0,
            t_max: 3.0 * PI,
            count: 100,
            noise_sigma: 0.0,
            seed: 42,
        }
    }
}

/// Everything a single `sinefit fit` run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub sample: SampleSpec,
    pub initial: SineParams,
    pub options: NewtonOptions,
    pub show_trace: bool,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_fit: Option<PathBuf>,
    pub export_samples: Option<PathBuf>,
    pub export_trace: Option<PathBuf>,
}

/// Multi-start scan over initial angular frequencies.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub run: RunConfig,
    pub omega_min: f64,
    pub omega_max: f64,
    pub omega_steps: usize,
    pub top_n: usize,
}

/// Compact fit result stored in [`FitFile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub params: SineParams,
    pub status: FitStatus,
    pub iterations: usize,
    pub loss: f64,
}

/// Fitted curve sampled on a regular grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub t: Vec<f64>,
    pub y: Vec<f64>,
}

/// Portable JSON representation of a fit run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub truth: SineParams,
    pub initial: SineParams,
    pub inverse: InversePolicy,
    pub result: FitSummary,
    pub grid: CurveGrid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_set_rejects_length_mismatch() {
        let err = SampleSet::new(vec![0.0, 1.0], vec![0.0]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidInput);
    }

    #[test]
    fn sample_set_rejects_empty_and_nan() {
        assert!(SampleSet::new(vec![], vec![]).is_err());
        assert!(SampleSet::new(vec![0.0, f64::NAN], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn params_parse_from_csv_triplet() {
        let p: SineParams = "1, 2.5,-0.5".parse().unwrap();
        assert_eq!(p, SineParams::new(1.0, 2.5, -0.5));
        assert!("1,2".parse::<SineParams>().is_err());
        assert!("1,x,3".parse::<SineParams>().is_err());
    }

    #[test]
    fn canonical_folds_sign_and_phase_ambiguity() {
        let truth = SineParams::new(3.0, 2.0, PI / 6.0);

        let flipped = SineParams::new(-3.0, 2.0, PI / 6.0 - PI).canonical();
        assert!((flipped.amplitude - 3.0).abs() < 1e-12);
        assert!((flipped.phase - truth.phase).abs() < 1e-12);

        let mirrored = SineParams::new(-3.0, -2.0, -PI / 6.0).canonical();
        assert!((mirrored.amplitude - 3.0).abs() < 1e-12);
        assert!((mirrored.omega - 2.0).abs() < 1e-12);
        assert!((mirrored.phase - truth.phase).abs() < 1e-12);
    }

    #[test]
    fn wrap_phase_range() {
        for &z in &[-10.0, -PI, 0.0, PI, 7.0, 100.0] {
            let w = wrap_phase(z);
            assert!(w > -PI - 1e-12 && w <= PI + 1e-12, "{z} -> {w}");
            assert!(((z - w) / TAU - ((z - w) / TAU).round()).abs() < 1e-9);
        }
    }
}
