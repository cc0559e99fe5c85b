// mripipe-core/src/rasterizer.rs
//! Polygon to mask conversion.
//!
//! Pixel `(col, row)` covers the unit square `[col, col + 1) x [row, row + 1)` and is
//! sampled at its centre `(col + 0.5, row + 0.5)`. A centre is interior when it lies
//! strictly inside the polygon under the even-odd rule. With integer corners an
//! axis-aligned rectangle `(x0, y0)-(x1, y1)` therefore covers exactly
//! `(x1 - x0) * (y1 - y0)` pixels.

use crate::grid::Grid;

/// A polygon vertex in pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Whether pixels touched by the polygon outline count as interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Only pixels whose centre is strictly inside the polygon are set.
    #[default]
    Exclude,
    /// Interior pixels plus every pixel the rasterised outline passes through.
    Include,
}

/// Converts a polygon outline into a boolean mask of a given size.
pub trait MaskRasterizer: Send + Sync {
    /// Returns a `height x width` mask. Vertices may lie outside the canvas;
    /// anything outside is clipped.
    fn rasterize(&self, polygon: &[Point], width: usize, height: usize) -> Grid<bool>;
}

/// Even-odd scanline fill with a configurable [`BoundaryPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanlineRasterizer {
    policy: BoundaryPolicy,
}

impl ScanlineRasterizer {
    pub fn new(policy: BoundaryPolicy) -> Self {
        ScanlineRasterizer { policy }
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }
}

impl MaskRasterizer for ScanlineRasterizer {
    fn rasterize(&self, polygon: &[Point], width: usize, height: usize) -> Grid<bool> {
        let mut mask = Grid::filled(height, width, false);
        if width == 0 || height == 0 {
            return mask;
        }

        if polygon.len() >= 3 {
            fill_interior(&mut mask, polygon);
        }
        if self.policy == BoundaryPolicy::Include {
            for (col, row) in outline_pixels(polygon, width, height) {
                if let Some(cell) = mask.get_mut(row, col) {
                    *cell = true;
                }
            }
        }
        mask
    }
}

fn fill_interior(mask: &mut Grid<bool>, polygon: &[Point]) {
    let width = mask.width();
    let mut crossings: Vec<f64> = Vec::with_capacity(polygon.len());

    for row in 0..mask.height() {
        let yc = row as f64 + 0.5;
        crossings.clear();

        for (i, a) in polygon.iter().enumerate() {
            let b = polygon[(i + 1) % polygon.len()];
            // Half-open in y so shared vertices are counted once.
            if (a.y <= yc && b.y > yc) || (b.y <= yc && a.y > yc) {
                crossings.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
            }
        }
        crossings.sort_by(|l, r| l.total_cmp(r));

        // Clamping keeps the order and the columns covered on the canvas.
        let (lo, hi) = (-1.0, width as f64 + 1.0);
        for span in crossings.chunks_exact(2) {
            let (left, right) = (span[0].max(lo).min(hi), span[1].max(lo).min(hi));
            // Columns whose centre lies strictly between the two crossings.
            let first = (left - 0.5).floor() as i64 + 1;
            let last = (right - 0.5).ceil() as i64 - 1;
            let first = first.max(0);
            let last = last.min(width as i64 - 1);
            for col in first..=last {
                if let Some(cell) = mask.get_mut(row, col as usize) {
                    *cell = true;
                }
            }
        }
    }
}

/// Pixels crossed by the closed outline of `polygon`, clipped to the canvas.
///
/// Returned as `(col, row)` pairs; consecutive duplicates are possible where
/// edges meet.
pub fn outline_pixels(polygon: &[Point], width: usize, height: usize) -> Vec<(usize, usize)> {
    let mut pixels = Vec::new();
    if polygon.is_empty() || width == 0 || height == 0 {
        return pixels;
    }

    let cell = |p: Point| (p.x.floor() as i64, p.y.floor() as i64);
    for (i, a) in polygon.iter().enumerate() {
        let b = &polygon[(i + 1) % polygon.len()];
        let Some((a, b)) = clip_segment(*a, *b, width as f64, height as f64) else {
            continue;
        };
        let (mut x0, mut y0) = cell(a);
        let (x1, y1) = cell(b);

        // Bresenham
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if x0 >= 0 && y0 >= 0 && (x0 as usize) < width && (y0 as usize) < height {
                pixels.push((x0 as usize, y0 as usize));
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
    pixels
}

/// Liang-Barsky clipping of segment `a`-`b` to `[0, width] x [0, height]`.
///
/// `None` when the segment misses the canvas or its extent is not representable.
fn clip_segment(a: Point, b: Point, width: f64, height: f64) -> Option<(Point, Point)> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }

    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, a.x), (dx, width - a.x), (-dy, a.y), (dy, height - a.y)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    // Rounding near huge coordinates can land slightly off the canvas.
    let at = |t: f64| {
        Point::new(
            (a.x + t * dx).clamp(0.0, width),
            (a.y + t * dy).clamp(0.0, height),
        )
    };
    Some((at(t0), at(t1)))
}

#[cfg(test)]
#[path = "rasterizer_test.rs"]
mod tests;
