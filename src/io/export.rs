//! Export fit results to JSON/CSV and reload fit JSON for plotting.
//!
//! Fit JSON is the "portable" representation of a run:
//! - generating, initial and fitted parameters
//! - inverse policy and convergence status
//! - a precomputed fitted grid for quick plotting
//!
//! The schema is defined by `domain::FitFile`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Utc;

use crate::domain::{CurveGrid, FitFile, FitOutcome, FitSummary, InversePolicy, SampleSet, SineParams};
use crate::error::AppError;
use crate::models::predict;

/// Points in the exported curve grid.
pub const GRID_POINTS: usize = 201;

/// Assemble the JSON document for a finished fit.
pub fn build_fit_file(
    samples: &SampleSet,
    truth: SineParams,
    initial: SineParams,
    inverse: InversePolicy,
    outcome: &FitOutcome,
) -> FitFile {
    let (t_min, t_max) = samples.t_range();
    FitFile {
        tool: "sinefit".to_string(),
        generated_at: Utc::now(),
        truth,
        initial,
        inverse,
        result: FitSummary {
            params: outcome.params,
            status: outcome.status,
            iterations: outcome.iterations,
            loss: outcome.loss,
        },
        grid: build_grid(&outcome.params, t_min, t_max, GRID_POINTS),
    }
}

/// Write a fit JSON file.
pub fn write_fit_json(path: &Path, fit: &FitFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create fit JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, fit)
        .map_err(|e| AppError::io(format!("Failed to write fit JSON: {e}")))?;
    Ok(())
}

/// Read a fit JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open fit JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::io(format!("Invalid fit JSON: {e}")))
}

/// Write per-sample observed/fitted values to CSV.
pub fn write_samples_csv(path: &Path, samples: &SampleSet, params: &SineParams) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create samples CSV '{}': {e}", path.display())))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "t,y,y_fit,residual")
        .map_err(|e| AppError::io(format!("Failed to write samples CSV header: {e}")))?;
    for (&t, &y) in samples.t().iter().zip(samples.y().iter()) {
        let y_fit = predict(t, params);
        writeln!(w, "{t:.10},{y:.10},{y_fit:.10},{:.10}", y - y_fit)
            .map_err(|e| AppError::io(format!("Failed to write samples CSV row: {e}")))?;
    }
    w.flush()
        .map_err(|e| AppError::io(format!("Failed to flush samples CSV: {e}")))
}

/// Write the per-iteration trace to CSV.
pub fn write_trace_csv(path: &Path, outcome: &FitOutcome) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create trace CSV '{}': {e}", path.display())))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "iteration,amplitude,omega,phase,loss,grad_norm,step_norm")
        .map_err(|e| AppError::io(format!("Failed to write trace CSV header: {e}")))?;
    for r in &outcome.trace {
        writeln!(
            w,
            "{},{:.12},{:.12},{:.12},{:.12e},{:.6e},{:.6e}",
            r.iteration,
            r.params.amplitude,
            r.params.omega,
            r.params.phase,
            r.loss,
            r.grad_norm,
            r.step_norm
        )
        .map_err(|e| AppError::io(format!("Failed to write trace CSV row: {e}")))?;
    }
    w.flush()
        .map_err(|e| AppError::io(format!("Failed to flush trace CSV: {e}")))
}

fn build_grid(params: &SineParams, t_min: f64, t_max: f64, n: usize) -> CurveGrid {
    let n = n.max(2);
    let (t0, t1) = if t_max > t_min { (t_min, t_max) } else { (t_min - 0.5, t_min + 0.5) };

    let t: Vec<f64> = (0..n)
        .map(|i| t0 + (i as f64 / (n as f64 - 1.0)) * (t1 - t0))
        .collect();
    let y = t.iter().map(|&ti| predict(ti, params)).collect();
    CurveGrid { t, y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitStatus, IterationRecord};
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sinefit_{}_{name}", std::process::id()))
    }

    fn outcome() -> FitOutcome {
        let p = SineParams::new(2.9, 2.01, 0.5);
        FitOutcome {
            params: p,
            status: FitStatus::Exhausted,
            iterations: 1,
            loss: 0.25,
            trace: vec![IterationRecord {
                iteration: 1,
                params: p,
                loss: 0.25,
                grad_norm: 3.0,
                step_norm: 0.01,
            }],
        }
    }

    fn samples() -> SampleSet {
        SampleSet::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]).unwrap()
    }

    #[test]
    fn fit_json_round_trips() {
        let path = temp_path("fit.json");
        let fit = build_fit_file(
            &samples(),
            SineParams::new(3.0, 2.0, 0.5),
            SineParams::new(1.0, 1.0, 1.0),
            InversePolicy::Ridge { lambda: 2.0 },
            &outcome(),
        );
        assert_eq!(fit.grid.t.len(), GRID_POINTS);
        assert_eq!(fit.grid.t[0], 0.0);
        assert_eq!(fit.grid.t[GRID_POINTS - 1], 2.0);

        write_fit_json(&path, &fit).unwrap();
        let back = read_fit_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.inverse, fit.inverse);
        assert_eq!(back.result, fit.result);
        assert_eq!(back.truth, fit.truth);
        assert_eq!(back.grid.t.len(), GRID_POINTS);
    }

    #[test]
    fn csv_exports_have_header_and_rows() {
        let samples_path = temp_path("samples.csv");
        let trace_path = temp_path("trace.csv");
        let out = outcome();

        write_samples_csv(&samples_path, &samples(), &out.params).unwrap();
        write_trace_csv(&trace_path, &out).unwrap();

        let samples_txt = std::fs::read_to_string(&samples_path).unwrap();
        let trace_txt = std::fs::read_to_string(&trace_path).unwrap();
        let _ = std::fs::remove_file(&samples_path);
        let _ = std::fs::remove_file(&trace_path);

        assert_eq!(samples_txt.lines().next(), Some("t,y,y_fit,residual"));
        assert_eq!(samples_txt.lines().count(), 4);
        assert!(trace_txt.starts_with("iteration,amplitude"));
        assert_eq!(trace_txt.lines().count(), 2);
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let err = read_fit_json(&temp_path("does_not_exist.json")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}
