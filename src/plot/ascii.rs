//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The y axis is always probability `[0, 1]`, top row = 1. Plot elements:
//! - fitted probability curve: `-`
//! - 50% decision boundary: `|`
//! - observed swings: `x` (whiff, top row), `o` (contact, bottom row)

use crate::domain::{AnalysisRecord, FittedModel, Predictor, ProbabilityGrid};
use crate::models::{observed_range, probability_grid};

const LEGEND: &str = "x whiff  o contact  - fitted p(whiff)  | p = 0.5";

/// Render a univariate fit over the records it was fitted on.
///
/// Returns `None` for a multi-predictor model.
pub fn render_model_plot(
    model: &FittedModel,
    records: &[AnalysisRecord],
    boundary: Option<f64>,
    width: usize,
    height: usize,
) -> Option<String> {
    let predictor = model.kind.univariate_predictor()?;
    let points: Vec<(f64, u8)> = records
        .iter()
        .filter_map(|r| r.value(predictor).map(|x| (x, r.response)))
        .collect();

    let (x_min, x_max) = observed_range(records, predictor).unwrap_or((0.0, 1.0));
    let grid = probability_grid(model, x_min, x_max, width.max(2))?;
    let curve: Vec<(f64, f64)> = grid.x.into_iter().zip(grid.p).collect();
    let header = header(model.kind.display_name(), predictor, x_min, x_max, boundary);

    Some(render_plot(&header, &points, &curve, x_min, x_max, boundary, width, height))
}

/// Render a probability grid loaded from a models file (curve only, no observed points).
pub fn render_grid_plot(grid: &ProbabilityGrid, boundary: Option<f64>, width: usize, height: usize) -> String {
    let (x_min, x_max) = x_range(grid.x.iter().copied()).unwrap_or((0.0, 1.0));
    let curve: Vec<(f64, f64)> = grid.x.iter().copied().zip(grid.p.iter().copied()).collect();
    let header = header(grid.kind.display_name(), grid.predictor, x_min, x_max, boundary);

    render_plot(&header, &[], &curve, x_min, x_max, boundary, width, height)
}

fn header(name: &str, predictor: Predictor, x_min: f64, x_max: f64, boundary: Option<f64>) -> String {
    let mut out = format!(
        "Plot {name}: p(whiff) vs {}=[{x_min:.2}, {x_max:.2}] {}",
        predictor.column(),
        predictor.unit()
    );
    if let Some(b) = boundary {
        out.push_str(&format!(" | boundary={b:.3}"));
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn render_plot(
    header: &str,
    points: &[(f64, u8)],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    boundary: Option<f64>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mut grid = vec![vec![' '; width]; height];

    // Curve first, then boundary into the gaps, then points on top.
    draw_curve(&mut grid, curve, x_min, x_max);

    if let Some(b) = boundary.filter(|b| (x_min..=x_max).contains(b)) {
        let x = map_x(b, x_min, x_max, width);
        for row in grid.iter_mut() {
            if row[x] == ' ' {
                row[x] = '|';
            }
        }
    }

    for &(x, response) in points {
        let col = map_x(x, x_min, x_max, width);
        let (row, ch) = if response == 1 { (0, 'x') } else { (height - 1, 'o') };
        grid[row][col] = ch;
    }

    let mut out = String::new();
    out.push_str(header);
    out.push('\n');
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(LEGEND);
    out.push('\n');

    out
}

fn x_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for x in values {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if !(min_x.is_finite() && max_x.is_finite()) {
        return None;
    }
    if max_x > min_x {
        Some((min_x, max_x))
    } else {
        Some((min_x - 0.5, max_x + 0.5))
    }
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_p(p: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = p.clamp(0.0, 1.0);
    // p=1 -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, p) in curve {
        if !p.is_finite() {
            prev = None;
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_p(p, height);
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
