use crate::error::{Result, SimError};

/// A fixed-size, row-major field of concentrations.
///
/// Cells live in one contiguous buffer indexed by `row * width + col`. The
/// dimensions are set at construction and never change; cloning a grid
/// yields an independent copy.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<f64>,
}

impl Grid {
    /// Creates a `height x width` grid with every cell set to `fill`.
    ///
    /// ### Errors
    /// [`SimError::InvalidConfiguration`] if either dimension is zero or the
    /// cell count overflows `usize`.
    pub fn new(height: usize, width: usize, fill: f64) -> Result<Self> {
        let len = checked_area(height, width)?;
        Ok(Self {
            height,
            width,
            cells: vec![fill; len],
        })
    }

    /// Wraps an existing row-major buffer.
    pub fn from_vec(height: usize, width: usize, cells: Vec<f64>) -> Result<Self> {
        let len = checked_area(height, width)?;
        if cells.len() != len {
            return Err(SimError::config(format!(
                "{height}x{width} grid needs {len} cells, got {}",
                cells.len()
            )));
        }
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Builds a grid from a buffer whose length is already known to match.
    pub(crate) fn from_parts(height: usize, width: usize, cells: Vec<f64>) -> Self {
        debug_assert_eq!(cells.len(), height * width);
        Self {
            height,
            width,
            cells,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        let idx = self.index(row, col)?;
        Ok(self.cells[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let idx = self.index(row, col)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Row-major view of every cell.
    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.cells
    }

    /// Returns `true` if no cell holds NaN or an infinity.
    pub fn is_finite(&self) -> bool {
        self.cells.iter().all(|v| v.is_finite())
    }

    /// Smallest and largest cell value. NaN cells are ignored.
    pub fn min_max(&self) -> (f64, f64) {
        self.cells
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Applies `f` to every cell, producing a new grid of the same shape.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Grid {
        let cells = self.cells.iter().map(|&v| f(v)).collect();
        Grid::from_parts(self.height, self.width, cells)
    }

    /// Combines two grids cell by cell.
    ///
    /// ### Panics
    /// Panics if the two grids have different dimensions.
    pub fn zip_map(&self, other: &Grid, f: impl Fn(f64, f64) -> f64) -> Grid {
        assert_eq!(self.dimensions(), other.dimensions());
        let cells = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(&x, &y)| f(x, y))
            .collect();
        Grid::from_parts(self.height, self.width, cells)
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.height || col >= self.width {
            return Err(SimError::OutOfBounds {
                row,
                col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(row * self.width + col)
    }
}

fn checked_area(height: usize, width: usize) -> Result<usize> {
    if height == 0 || width == 0 {
        return Err(SimError::config(format!(
            "grid dimensions must be positive, got {height}x{width}"
        )));
    }
    height
        .checked_mul(width)
        .ok_or_else(|| SimError::config(format!("{height}x{width} grid is too large")))
}
