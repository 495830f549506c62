//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{FitOutcome, FitStatus, PARAM_NAMES, RunConfig, SampleSet, SineParams};
use crate::fit::ScanReport;
use crate::report::FitDiagnostics;

/// Format the full run summary (data, options, result, diagnostics).
pub fn format_run_summary(
    config: &RunConfig,
    samples: &SampleSet,
    outcome: &FitOutcome,
    diagnostics: &FitDiagnostics,
) -> String {
    let mut out = String::new();
    let (t_min, t_max) = samples.t_range();

    out.push_str("=== sinefit - Newton fit of y = A·sin(W·t + Z) ===\n");
    out.push_str(&format!("Truth:   {}\n", config.sample.truth));
    out.push_str(&format!(
        "Samples: n={} | t=[{t_min:.4}, {t_max:.4}] | noise σ={} (seed {})\n",
        samples.len(),
        config.sample.noise_sigma,
        config.sample.seed,
    ));
    out.push_str(&format!(
        "Options: max_iter={} tol={:e} inverse={}\n",
        config.options.max_iter, config.options.tol, config.options.inverse
    ));
    out.push_str(&format!("Initial: {}\n", config.initial));

    out.push_str("\nResult:\n");
    out.push_str(&format!(
        "- status: {} after {} iteration(s)\n",
        status_label(outcome.status),
        outcome.iterations
    ));
    out.push_str(&format!("- params: {}\n", outcome.params));
    out.push_str(&format!("- canon : {}\n", diagnostics.canonical));
    out.push_str(&format!(
        "- MSE={:.6e} RMSE={:.6e} max|e|={:.6e}\n",
        outcome.loss, diagnostics.rmse, diagnostics.max_abs_residual
    ));
    if let Some(err) = &diagnostics.param_error {
        out.push_str(&format!(
            "- error vs truth: dA={:+.6} dW={:+.6} dZ={:+.6}\n",
            err.amplitude, err.omega, err.phase
        ));
    }

    out
}

/// Per-iteration trace table.
pub fn format_trace(outcome: &FitOutcome) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>5} {:>12} {:>12} {:>12} {:>13} {:>11} {:>11}\n",
        "iter", PARAM_NAMES[0], PARAM_NAMES[1], PARAM_NAMES[2], "loss", "|g|", "|step|"
    ));
    for r in &outcome.trace {
        out.push_str(&format!(
            "{:>5} {:>12.6} {:>12.6} {:>12.6} {:>13.6e} {:>11.3e} {:>11.3e}\n",
            r.iteration,
            r.params.amplitude,
            r.params.omega,
            r.params.phase,
            r.loss,
            r.grad_norm,
            r.step_norm
        ));
    }
    out
}

/// Format the multi-start ranking table.
pub fn format_scan(report: &ScanReport, top_n: usize) -> String {
    let mut out = String::new();
    let ranked = report.ranked();

    out.push_str(&format!(
        "Scan: {} start(s), {} succeeded, {} failed\n",
        report.entries.len(),
        ranked.len(),
        report.failures()
    ));
    out.push_str(&format!(
        "{:>4} {:>10} | {:<40} {:>13} {:>10}\n",
        "rank", "W0", "fitted", "loss", "status"
    ));
    for (i, (initial, outcome)) in ranked.iter().take(top_n).enumerate() {
        out.push_str(&format!(
            "{:>4} {:>10.4} | {:<40} {:>13.6e} {:>10}\n",
            i + 1,
            initial.omega,
            fmt_params(&outcome.params.canonical()),
            outcome.loss,
            status_label(outcome.status)
        ));
    }

    let failed: Vec<_> = report
        .entries
        .iter()
        .filter_map(|e| e.result.as_ref().err().map(|msg| (e.initial.omega, msg)))
        .collect();
    if !failed.is_empty() {
        out.push_str("\nFailed starts:\n");
        for (omega, msg) in failed {
            out.push_str(&format!("  W0={omega:.4}: {msg}\n"));
        }
    }

    out
}

fn status_label(status: FitStatus) -> &'static str {
    match status {
        FitStatus::Running => "running",
        FitStatus::Converged => "converged",
        FitStatus::Exhausted => "exhausted",
    }
}

fn fmt_params(p: &SineParams) -> String {
    format!("[{:.4}, {:.4}, {:.4}]", p.amplitude, p.omega, p.phase)
}
