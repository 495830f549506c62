//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed samples: `o`
//! - fitted curve: `-` line

use crate::domain::{FitFile, SampleSet, SineParams};
use crate::models::predict;

/// Render samples overlaid on the curve given by `params`.
pub fn render_ascii_plot(samples: &SampleSet, params: &SineParams, width: usize, height: usize) -> String {
    let (t_min, t_max) = valid_range(samples.t_range()).unwrap_or((0.0, 1.0));
    let curve = sample_curve(params, t_min, t_max, width.max(2));
    let points: Vec<(f64, f64)> = samples
        .t()
        .iter()
        .zip(samples.y().iter())
        .map(|(&t, &y)| (t, y))
        .collect();
    render_plot(&points, &curve, t_min, t_max, width, height)
}

/// Render the curve grid stored in a saved fit file (curve only).
pub fn render_ascii_plot_from_fit_file(file: &FitFile, width: usize, height: usize) -> String {
    let range = file
        .grid
        .t
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| (lo.min(t), hi.max(t)));
    let (t_min, t_max) = valid_range(range).unwrap_or((0.0, 1.0));
    let curve: Vec<(f64, f64)> = file
        .grid
        .t
        .iter()
        .zip(file.grid.y.iter())
        .map(|(&t, &y)| (t, y))
        .collect();

    render_plot(&[], &curve, t_min, t_max, width, height)
}

fn render_plot(
    points: &[(f64, f64)],
    curve: &[(f64, f64)],
    t_min: f64,
    t_max: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(points, curve).unwrap_or((-1.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curve first so samples overlay it.
    draw_curve(&mut grid, curve, t_min, t_max, y_min, y_max);

    for &(t, y) in points {
        let x = map_x(t, t_min, t_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: t=[{t_min:.3}, {t_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn valid_range((lo, hi): (f64, f64)) -> Option<(f64, f64)> {
    if lo.is_finite() && hi.is_finite() && hi > lo {
        Some((lo, hi))
    } else {
        None
    }
}

fn sample_curve(params: &SineParams, t_min: f64, t_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let t = t_min + u * (t_max - t_min);
            (t, predict(t, params))
        })
        .collect()
}

fn y_range(points: &[(f64, f64)], curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let (lo, hi) = points
        .iter()
        .chain(curve.iter())
        .filter(|(_, y)| y.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    valid_range((lo, hi))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let pad = ((max - min).abs() * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // row 0 is the top (y_max)
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], t_min: f64, t_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in curve {
        if !y.is_finite() {
            prev = None;
            continue;
        }
        let x = map_x(t, t_min, t_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, x, row, '-'),
            None => grid[row][x] = '-',
        }
        prev = Some((x, row));
    }
}

/// Integer line drawing (Bresenham).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let (mut x0, mut y0) = (x0 as isize, y0 as isize);
    let (x1, y1) = (x1 as isize, y1 as isize);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let Some(cell) = grid
            .get_mut(y0 as usize)
            .and_then(|row| row.get_mut(x0 as usize))
        {
            if *cell == ' ' {
                *cell = ch;
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let samples = SampleSet::new(vec![1.0, 10.0], vec![0.0, 10.0]).unwrap();
        // Zero amplitude: a flat curve at y = 0.
        let flat = SineParams::new(0.0, 1.0, 0.0);

        let txt = render_ascii_plot(&samples, &flat, 10, 5);
        let expected = concat!(
            "Plot: t=[1.000, 10.000] | y=[-0.50, 10.50]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o---------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn plot_has_requested_dimensions() {
        let t: Vec<f64> = (0..50).map(|i| i as f64 * 0.2).collect();
        let params = SineParams::new(3.0, 2.0, 0.5);
        let y = crate::models::predict_all(&t, &params);
        let samples = SampleSet::new(t, y).unwrap();

        let txt = render_ascii_plot(&samples, &params, 60, 15);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 16);
        assert!(lines[1..].iter().all(|l| l.chars().count() == 60));
        assert!(txt.contains('o') && txt.contains('-'));
    }
}
