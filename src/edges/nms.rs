//! Canny-style edge detection: direction-aligned non-maximum suppression
//! followed by dual-threshold hysteresis.
//!
//! Gradients come from a 3×3 Sobel on the raw 0–255 intensities with
//! replicated borders and the L1 magnitude `|gx| + |gy|`, so the thresholds
//! are expressed on that scale. The gradient direction is quantized to one
//! of four axes (0°, 45°, 90°, 135°) using `tan(22.5°)`/`tan(67.5°)` slopes.
//! Along horizontal and vertical axes a pixel must beat the preceding
//! neighbour strictly and the following one non-strictly; along diagonals
//! both comparisons are strict. Magnitudes outside the image count as zero.
//!
//! Survivors above `high` seed the edge set; survivors above `low` join it
//! when 8-connected to a seed, directly or through other survivors.
use crate::edges::grad::{sobel_gradients, BorderMode, Grad, GradientNorm};
use crate::image::{EdgeMap, ImageF32, ImageView};
use serde::Serialize;

const TAN_22_5_DEG: f32 = 0.414_213_57;
const TAN_67_5_DEG: f32 = 2.414_213_6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cell {
    Suppressed,
    Weak,
    Edge,
}

/// Per-run statistics, useful for tooling.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CannyStats {
    pub strong_seeds: usize,
    pub weak_candidates: usize,
    pub edge_pixels: usize,
}

pub struct CannyResult {
    pub edges: EdgeMap,
    pub grad: Grad,
    pub stats: CannyStats,
}

#[inline]
fn mag_at(mag: &ImageF32, x: isize, y: isize) -> f32 {
    if x < 0 || y < 0 || x as usize >= mag.w || y as usize >= mag.h {
        return 0.0;
    }
    mag.get(x as usize, y as usize)
}

/// Classify every pixel after non-maximum suppression.
fn run_nms(grad: &Grad, low: f32, high: f32) -> Vec<Cell> {
    let w = grad.mag.w;
    let h = grad.mag.h;
    let mut cells = vec![Cell::Suppressed; w * h];
    for y in 0..h {
        let mag_row = grad.mag.row(y);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);
        let yi = y as isize;
        for x in 0..w {
            let mag = mag_row[x];
            if mag <= low {
                continue;
            }
            let xi = x as isize;
            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();

            let is_max = if abs_gy < abs_gx * TAN_22_5_DEG {
                mag > mag_at(&grad.mag, xi - 1, yi) && mag >= mag_at(&grad.mag, xi + 1, yi)
            } else if abs_gy > abs_gx * TAN_67_5_DEG {
                mag > mag_at(&grad.mag, xi, yi - 1) && mag >= mag_at(&grad.mag, xi, yi + 1)
            } else {
                let s: isize = if (gx < 0.0) != (gy < 0.0) { -1 } else { 1 };
                mag > mag_at(&grad.mag, xi - s, yi - 1) && mag > mag_at(&grad.mag, xi + s, yi + 1)
            };
            if !is_max {
                continue;
            }
            cells[y * w + x] = if mag > high { Cell::Edge } else { Cell::Weak };
        }
    }
    cells
}

/// Promote weak cells 8-connected to seeds; everything else is dropped.
fn hysteresis(cells: &mut [Cell], w: usize, h: usize) -> EdgeMap {
    let mut stack: Vec<usize> = cells
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == Cell::Edge)
        .map(|(i, _)| i)
        .collect();
    while let Some(i) = stack.pop() {
        let x = (i % w) as isize;
        let y = (i / w) as isize;
        for dy in -1..=1isize {
            for dx in -1..=1isize {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 || nx as usize >= w || ny as usize >= h {
                    continue;
                }
                let j = ny as usize * w + nx as usize;
                if cells[j] == Cell::Weak {
                    cells[j] = Cell::Edge;
                    stack.push(j);
                }
            }
        }
    }
    EdgeMap::from_fn(w, h, |x, y| cells[y * w + x] == Cell::Edge)
}

/// Detect edges on raw 0–255 intensities with `low`/`high` magnitude thresholds.
pub fn detect_edges_canny(l: &ImageF32, low: f32, high: f32) -> CannyResult {
    // Swapped thresholds behave as if given in order.
    let (low, high) = if low > high { (high, low) } else { (low, high) };
    let grad = sobel_gradients(l, BorderMode::Replicate, GradientNorm::L1);
    let mut cells = run_nms(&grad, low, high);
    let strong_seeds = cells.iter().filter(|&&c| c == Cell::Edge).count();
    let weak_candidates = cells.iter().filter(|&&c| c == Cell::Weak).count();
    let edges = hysteresis(&mut cells, l.w, l.h);
    let stats = CannyStats {
        strong_seeds,
        weak_candidates,
        edge_pixels: edges.count(),
    };
    CannyResult { edges, grad, stats }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_image(size: usize, x0: usize, side: usize) -> ImageF32 {
        let inside = |v: usize| (x0..x0 + side).contains(&v);
        ImageF32::from_fn(size, size, |x, y| if inside(x) && inside(y) { 0.0 } else { 255.0 })
    }

    #[test]
    fn flat_image_has_no_edges() {
        let img = ImageF32::filled(16, 16, 128.0);
        let res = detect_edges_canny(&img, 100.0, 200.0);
        assert!(res.edges.is_empty());
        assert_eq!(res.stats.strong_seeds, 0);
    }

    #[test]
    fn step_edge_is_thin_and_located_at_the_step() {
        let mut img = ImageF32::new(12, 8);
        for y in 0..8 {
            for x in 6..12 {
                img.set(x, y, 255.0);
            }
        }
        let res = detect_edges_canny(&img, 100.0, 200.0);
        for y in 0..8 {
            let cols: Vec<usize> = (0..12).filter(|&x| res.edges.get(x, y)).collect();
            // Columns 5 and 6 tie; the strict/non-strict rule keeps exactly one.
            assert_eq!(cols, vec![5], "row {y}: {cols:?}");
        }
    }

    #[test]
    fn square_outline_is_closed_and_inside_bounds() {
        let img = square_image(40, 10, 20);
        let res = detect_edges_canny(&img, 100.0, 200.0);
        assert!(!res.edges.is_empty());
        let bbox = res.edges.bounding_box().unwrap();
        assert!(bbox.x >= 8 && bbox.x <= 10, "bbox {bbox:?}");
        assert!(bbox.x + bbox.width <= 32);
        // Nothing deep inside the square or far outside it.
        assert!(!res.edges.get(20, 20));
        assert!(!res.edges.get(2, 2));
    }

    #[test]
    fn weak_pixels_without_seed_are_dropped() {
        // A faint step (magnitude 4 * 40 = 160) sits between the thresholds.
        let mut img = ImageF32::new(10, 10);
        for y in 0..10 {
            for x in 5..10 {
                img.set(x, y, 40.0);
            }
        }
        let res = detect_edges_canny(&img, 100.0, 200.0);
        assert!(res.stats.weak_candidates > 0);
        assert!(res.edges.is_empty());
        let res = detect_edges_canny(&img, 100.0, 150.0);
        assert!(!res.edges.is_empty());
    }
}
