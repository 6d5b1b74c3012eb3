//! 3x3 stencil convolution with an absorbing (zero-padded) boundary.
//!
//! [`convolve`] approximates the Laplacian of a field:
//! 1. [`pad`] surrounds the source with a one-cell border of zeros.
//! 2. Each original cell is replaced by the weighted sum of its 3x3
//!    neighbourhood in the padded copy.
//!
//! Cells next to the edge therefore see zero concentration beyond the
//! grid, so material diffusing outwards is lost.

use crate::error::{Result, SimError};
use crate::grid::Grid;

/// Weights of the discrete Laplacian: corners 0.05, edges 0.2, centre -1.
///
/// The nine weights sum to zero, so a uniform field has no diffusion away
/// from the border.
pub const LAPLACIAN_WEIGHTS: [[f64; 3]; 3] = [
    [0.05, 0.2, 0.05],
    [0.2, -1.0, 0.2],
    [0.05, 0.2, 0.05],
];

/// An immutable 3x3 weight matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kernel {
    weights: [[f64; 3]; 3],
}

impl Kernel {
    /// Builds a kernel from a 3x3 [`Grid`].
    ///
    /// ### Errors
    /// [`SimError::InvalidConfiguration`] if the grid is not 3x3 or holds a
    /// non-finite weight.
    pub fn new(grid: &Grid) -> Result<Self> {
        if grid.dimensions() != (3, 3) {
            let (h, w) = grid.dimensions();
            return Err(SimError::config(format!(
                "stencil kernel must be 3x3, got {h}x{w}"
            )));
        }
        if !grid.is_finite() {
            return Err(SimError::config("stencil kernel weights must be finite"));
        }

        let mut weights = [[0.0; 3]; 3];
        for (r, row) in weights.iter_mut().enumerate() {
            row.copy_from_slice(&grid.as_slice()[r * 3..r * 3 + 3]);
        }
        Ok(Self { weights })
    }

    /// The Gray-Scott diffusion stencil, see [`LAPLACIAN_WEIGHTS`].
    pub const fn laplacian() -> Self {
        Self {
            weights: LAPLACIAN_WEIGHTS,
        }
    }

    pub fn weights(&self) -> &[[f64; 3]; 3] {
        &self.weights
    }

    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().flatten().sum()
    }

    pub fn to_grid(&self) -> Grid {
        Grid::from_parts(3, 3, self.weights.iter().flatten().copied().collect())
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::laplacian()
    }
}

/// Returns a copy of `source` surrounded by a one-cell border of zeros.
///
/// The result has dimensions `(height + 2, width + 2)` and `source` sits at
/// offset `(1, 1)`.
pub fn pad(source: &Grid) -> Grid {
    let (h, w) = source.dimensions();
    let pw = w + 2;
    let mut cells = vec![0.0; (h + 2) * pw];

    for (r, row) in source.as_slice().chunks_exact(w).enumerate() {
        let start = (r + 1) * pw + 1;
        cells[start..start + w].copy_from_slice(row);
    }

    Grid::from_parts(h + 2, pw, cells)
}

/// Convolves `source` with `kernel` over a zero-padded copy.
///
/// For every cell `(i, j)` of `source` the output is
///
/// ```text
/// out[i][j] = sum over (di, dj) in 0..3 x 0..3 of
///             kernel[di][dj] * padded[i + di][j + dj]
/// ```
///
/// The kernel is applied without flipping; the Laplacian is symmetric so
/// this equals a true convolution. Rows and columns are bounded by the
/// source's height and width independently.
///
/// ### Returns
/// A new [`Grid`] with the same dimensions as `source`.
pub fn convolve(source: &Grid, kernel: &Kernel) -> Grid {
    let (h, w) = source.dimensions();
    let padded = pad(source);
    let pw = padded.width();
    let p = padded.as_slice();
    let k = kernel.weights();

    let mut out = Vec::with_capacity(h * w);
    for i in 0..h {
        for j in 0..w {
            let mut acc = 0.0;
            for (di, k_row) in k.iter().enumerate() {
                let base = (i + di) * pw + j;
                for (dj, weight) in k_row.iter().enumerate() {
                    acc += weight * p[base + dj];
                }
            }
            out.push(acc);
        }
    }

    Grid::from_parts(h, w, out)
}
