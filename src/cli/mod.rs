//! Command-line parsing for the sinusoid Newton fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::f64::consts::{FRAC_PI_6, PI};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{InverseKind, SineParams};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sinefit", version, about = "Newton fit of y = A·sin(W·t + Z) to synthetic data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate samples, fit from one initial guess, print diagnostics, optionally plot/export.
    Fit(FitArgs),
    /// Fit from a grid of initial angular frequencies and rank the results.
    Scan(ScanArgs),
    /// Plot a previously exported fit JSON.
    Plot(PlotArgs),
}

/// Options shared by `fit` and `scan`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Amplitude A of the generating sinusoid.
    #[arg(long, default_value_t = 3.0, allow_negative_numbers = true)]
    pub amplitude: f64,

    /// Angular frequency W of the generating sinusoid.
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub omega: f64,

    /// Phase Z of the generating sinusoid (radians).
    #[arg(long, default_value_t = FRAC_PI_6, allow_negative_numbers = true)]
    pub phase: f64,

    /// Start of the sample interval.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub t_min: f64,

    /// End of the sample interval.
    #[arg(long, default_value_t = 3.0 * PI, allow_negative_numbers = true)]
    pub t_max: f64,

    /// Number of samples.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub samples: usize,

    /// Standard deviation of Gaussian noise added to the samples.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for noise generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Initial guess as "A,W,Z".
    #[arg(long, default_value = "1,1,1", allow_hyphen_values = true)]
    pub initial: SineParams,

    /// Maximum number of Newton steps.
    #[arg(long, default_value_t = 100)]
    pub max_iter: usize,

    /// Stop when the parameter update norm drops below this value.
    #[arg(long, default_value_t = 1e-6)]
    pub tol: f64,

    /// How the rank-1 curvature matrix is inverted.
    #[arg(long, value_enum, default_value_t = InverseKind::Exact)]
    pub inverse: InverseKind,

    /// Regularization strength for `--inverse ridge`.
    #[arg(long, default_value_t = 1.0)]
    pub ridge_lambda: f64,

    /// Print the per-iteration trace.
    #[arg(long)]
    pub trace: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the fit (params + status + curve grid) to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export samples with fitted values and residuals to CSV.
    #[arg(long = "export-samples")]
    pub export_samples: Option<PathBuf>,

    /// Export the per-iteration trace to CSV.
    #[arg(long = "export-trace")]
    pub export_trace: Option<PathBuf>,
}

/// Options for the multi-start scan.
#[derive(Debug, Args, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub fit: FitArgs,

    /// Smallest initial angular frequency.
    #[arg(long, default_value_t = 0.5)]
    pub omega_min: f64,

    /// Largest initial angular frequency.
    #[arg(long, default_value_t = 4.0)]
    pub omega_max: f64,

    /// Number of initial angular frequencies.
    #[arg(long, default_value_t = 15)]
    pub omega_steps: usize,

    /// Show the top-N starts.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

/// Options for plotting a saved fit.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Fit JSON file produced by `sinefit fit --export`.
    #[arg(long, value_name = "JSON")]
    pub fit: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_defaults_match_reference_scenario() {
        let cli = Cli::parse_from(["sinefit", "fit"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit subcommand");
        };
        assert_eq!(args.samples, 100);
        assert_eq!(args.initial, SineParams::new(1.0, 1.0, 1.0));
        assert_eq!(args.max_iter, 100);
        assert_eq!(args.tol, 1e-6);
        assert_eq!(args.inverse, InverseKind::Exact);
        assert_eq!(args.t_max, 3.0 * PI);
    }

    #[test]
    fn scan_accepts_fit_flags_and_negative_initial() {
        let cli = Cli::parse_from([
            "sinefit",
            "scan",
            "--initial",
            "-1,0.5,2",
            "--inverse",
            "ridge",
            "--omega-steps",
            "4",
        ]);
        let Command::Scan(args) = cli.command else {
            panic!("expected scan subcommand");
        };
        assert_eq!(args.fit.initial, SineParams::new(-1.0, 0.5, 2.0));
        assert_eq!(args.fit.inverse, InverseKind::Ridge);
        assert_eq!(args.omega_steps, 4);
    }
}
