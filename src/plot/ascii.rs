//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks of a single-feature fit
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted line: `-`

use nalgebra::DMatrix;

use crate::error::RegressionError;
use crate::models::RidgeRegression;

/// Render observed `(x, y)` pairs and the fitted line of a one-feature model.
pub fn render_fit_plot(
    x: &[f64],
    y: &[f64],
    model: &RidgeRegression,
    width: usize,
    height: usize,
) -> Result<String, RegressionError> {
    if x.len() != y.len() {
        return Err(RegressionError::mismatch("len(x) vs len(y)", x.len(), y.len()));
    }
    let n_features = model.n_features()?;
    if n_features != 1 {
        return Err(RegressionError::mismatch("plot features", 1, n_features));
    }

    let width = width.max(10);
    let height = height.max(5);
    let (x_min, x_max) = value_range(x).unwrap_or((0.0, 1.0));
    let line = sample_line(model, x_min, x_max, width)?;

    Ok(render_plot(x, y, &line, x_min, x_max, width, height))
}

fn render_plot(
    x: &[f64],
    y: &[f64],
    line: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    width: usize,
    height: usize,
) -> String {
    let line_y: Vec<f64> = line.iter().map(|&(_, v)| v).collect();
    let (y_min, y_max) = value_range(&[y, line_y.as_slice()].concat()).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the line first so points can overlay.
    draw_curve(&mut grid, line, x_min, x_max, y_min, y_max);

    for (&xi, &yi) in x.iter().zip(y) {
        let col = map_x(xi, x_min, x_max, width);
        let row = map_y(yi, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn sample_line(model: &RidgeRegression, x_min: f64, x_max: f64, n: usize) -> Result<Vec<(f64, f64)>, RegressionError> {
    let n = n.max(2);
    let xs: Vec<f64> = (0..n)
        .map(|i| x_min + (i as f64 / (n as f64 - 1.0)) * (x_max - x_min))
        .collect();
    let ys = model.predict(&DMatrix::from_column_slice(n, 1, &xs))?;
    Ok(xs.into_iter().zip(ys.iter().copied()).collect())
}

/// Finite min/max of `values`; a degenerate range is widened by ±0.5.
fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max > min { Some((min, max)) } else { Some((min - 0.5, max + 0.5)) }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
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
