// mripipe-core/src/grid.rs

use crate::error::PipelineError;
use num_traits::ToPrimitive;

/// A dense, row-major 2D matrix with `height` rows and `width` columns.
///
/// Used for both decoded pixel data (`Grid<f32>`) and region masks (`Grid<bool>`).
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    data: Vec<T>,
    height: usize,
    width: usize,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn filled(height: usize, width: usize, value: T) -> Self {
        Self {
            data: vec![value; height * width],
            height,
            width,
        }
    }
}

impl<T> Grid<T> {
    /// Creates a grid from row-major data.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::ShapeMismatch` if `data.len() != height * width`.
    pub fn from_vec(height: usize, width: usize, data: Vec<T>) -> Result<Self, PipelineError> {
        if data.len() != height * width {
            return Err(PipelineError::ShapeMismatch {
                expected: (height, width),
                actual: (data.len(), 1),
            });
        }
        Ok(Self {
            data,
            height,
            width,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the cell at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col)
    }

    /// Mutable access to the cell at `(row, col)`, or `None` when out of bounds.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get_mut(row * self.width + col)
    }

    /// One row as a slice, `None` if `row >= height`.
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        self.data.get(start..start + self.width)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Grid<bool> {
    /// Number of `true` cells.
    pub fn count_true(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

impl<T: ToPrimitive + Copy> Grid<T> {
    /// Smallest and largest finite value in the grid, as `f64`.
    ///
    /// Returns `None` for an empty grid or one without any finite value.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .filter_map(|v| v.to_f64())
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod tests;
