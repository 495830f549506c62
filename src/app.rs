//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and installs the logger
//! - parses CLI arguments
//! - generates synthetic samples and runs the fit or scan
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use log::info;

use crate::cli::{Command, FitArgs, PlotArgs, ScanArgs};
use crate::domain::{NewtonOptions, RunConfig, SampleSpec, ScanConfig, SineParams};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `sinefit` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may carry RUST_LOG; it must be loaded before the logger reads it.
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .init();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Scan(args) => handle_scan(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&config, &run.samples, &run.outcome, &run.diagnostics)
    );
    if config.show_trace {
        println!("{}", crate::report::format_trace(&run.outcome));
    }
    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.samples,
            &run.outcome.params,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    if let Some(path) = &config.export_fit {
        let file = crate::io::build_fit_file(
            &run.samples,
            config.sample.truth,
            config.initial,
            config.options.inverse,
            &run.outcome,
        );
        crate::io::write_fit_json(path, &file)?;
        info!("wrote fit JSON to {}", path.display());
    }
    if let Some(path) = &config.export_samples {
        crate::io::write_samples_csv(path, &run.samples, &run.outcome.params)?;
        info!("wrote samples CSV to {}", path.display());
    }
    if let Some(path) = &config.export_trace {
        crate::io::write_trace_csv(path, &run.outcome)?;
        info!("wrote trace CSV to {}", path.display());
    }

    Ok(())
}

fn handle_scan(args: ScanArgs) -> Result<(), AppError> {
    let config = ScanConfig {
        run: run_config_from_args(&args.fit),
        omega_min: args.omega_min,
        omega_max: args.omega_max,
        omega_steps: args.omega_steps,
        top_n: args.top,
    };
    let report = pipeline::run_scan(&config)?;
    println!("{}", crate::report::format_scan(&report, config.top_n));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::read_fit_json(&args.fit)?;
    println!(
        "Fit from {} ({}): {} [{:?}, {} iteration(s)]",
        file.tool, file.generated_at, file.result.params, file.result.status, file.result.iterations
    );
    println!(
        "{}",
        crate::plot::render_ascii_plot_from_fit_file(&file, args.width, args.height)
    );
    Ok(())
}

pub fn run_config_from_args(args: &FitArgs) -> RunConfig {
    RunConfig {
        sample: SampleSpec {
            truth: SineParams::new(args.amplitude, args.omega, args.phase),
            t_min: args.t_min,
            t_max: args.t_max,
            count: args.samples,
            noise_sigma: args.noise,
            seed: args.seed,
        },
        initial: args.initial,
        options: NewtonOptions {
            max_iter: args.max_iter,
            tol: args.tol,
            inverse: args.inverse.policy(args.ridge_lambda),
        },
        show_trace: args.trace,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_fit: args.export.clone(),
        export_samples: args.export_samples.clone(),
        export_trace: args.export_trace.clone(),
    }
}

/// Rewrite argv so `sinefit` defaults to `sinefit fit`.
///
/// Rules:
/// - `sinefit`                      -> `sinefit fit`
/// - `sinefit --inverse ridge ...`  -> `sinefit fit --inverse ridge ...`
/// - `sinefit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fit".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
    }
    argv
}
