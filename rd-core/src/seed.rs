//! Random initial condition: B patches stamped on an empty field.

use std::ops::{Range, RangeInclusive};

use glam::UVec2;
use log::{debug, info};
use rand::Rng;

use crate::error::{Result, SimError};
use crate::grid::Grid;

/// Inclusive range of the number of patches stamped at seed time.
pub const PATCH_COUNT: RangeInclusive<usize> = 1..=9;

/// Inclusive range of each patch half extent, in cells.
pub const HALF_EXTENT: RangeInclusive<u32> = 5..=49;

/// Smallest grid side that still admits a centre for the widest patch.
pub const MIN_SEED_DIMENSION: usize = 2 * *HALF_EXTENT.end() as usize + 1;

/// An axis-aligned rectangle of B set to 1.0.
///
/// `x` is the column axis and `y` the row axis. The patch covers the
/// half-open ranges `[center - half_extents, center + half_extents)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Patch {
    pub center: UVec2,
    pub half_extents: UVec2,
}

impl Patch {
    /// Draws a patch that fits entirely inside a `height x width` grid.
    ///
    /// ### Errors
    /// [`SimError::InvalidConfiguration`] if either side is smaller than
    /// [`MIN_SEED_DIMENSION`].
    pub fn random(height: usize, width: usize, rng: &mut impl Rng) -> Result<Self> {
        check_seedable(height, width)?;
        let (h, w) = (to_u32(height)?, to_u32(width)?);

        let hx = rng.random_range(HALF_EXTENT);
        let hy = rng.random_range(HALF_EXTENT);
        let cx = rng.random_range(hx..w - hx);
        let cy = rng.random_range(hy..h - hy);

        Ok(Self {
            center: UVec2::new(cx, cy),
            half_extents: UVec2::new(hx, hy),
        })
    }

    pub fn rows(&self) -> Range<usize> {
        let lo = self.center.y.saturating_sub(self.half_extents.y);
        let hi = self.center.y.saturating_add(self.half_extents.y);
        lo as usize..hi as usize
    }

    pub fn cols(&self) -> Range<usize> {
        let lo = self.center.x.saturating_sub(self.half_extents.x);
        let hi = self.center.x.saturating_add(self.half_extents.x);
        lo as usize..hi as usize
    }

    /// Sets every covered cell of `grid` to 1.0. Overlaps do not accumulate.
    ///
    /// ### Errors
    /// [`SimError::OutOfBounds`] if the patch reaches past the grid; nothing
    /// is written in that case.
    pub fn stamp(&self, grid: &mut Grid) -> Result<()> {
        let (height, width) = grid.dimensions();
        let (rows, cols) = (self.rows(), self.cols());
        if rows.end > height || cols.end > width {
            return Err(SimError::OutOfBounds {
                row: rows.end.saturating_sub(1),
                col: cols.end.saturating_sub(1),
                height,
                width,
            });
        }

        let cells = grid.as_mut_slice();
        for r in rows {
            cells[r * width + cols.start..r * width + cols.end].fill(1.0);
        }
        Ok(())
    }
}

/// Builds the starting fields: A is 1.0 everywhere, B is 0.0 except for
/// one to nine random patches of 1.0.
///
/// ### Parameters
/// - `height`, `width` - Grid dimensions; both must be at least
///   [`MIN_SEED_DIMENSION`].
/// - `rng` - Source of randomness. Pass a seeded generator for a
///   reproducible layout.
///
/// ### Returns
/// The `(A, B)` pair.
pub fn seed_initial_condition(
    height: usize,
    width: usize,
    rng: &mut impl Rng,
) -> Result<(Grid, Grid)> {
    check_seedable(height, width)?;

    let a = Grid::new(height, width, 1.0)?;
    let mut b = Grid::new(height, width, 0.0)?;

    let count = rng.random_range(PATCH_COUNT);
    for _ in 0..count {
        let patch = Patch::random(height, width, rng)?;
        debug!(
            "seed patch rows {:?} cols {:?}",
            patch.rows(),
            patch.cols()
        );
        patch.stamp(&mut b)?;
    }

    info!("seeded {height}x{width} grid with {count} patches");
    Ok((a, b))
}

fn check_seedable(height: usize, width: usize) -> Result<()> {
    if height < MIN_SEED_DIMENSION || width < MIN_SEED_DIMENSION {
        return Err(SimError::config(format!(
            "{height}x{width} grid is too small to seed; both sides must be at least {MIN_SEED_DIMENSION}"
        )));
    }
    Ok(())
}

fn to_u32(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| SimError::config(format!("grid side {n} is too large to seed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn min_dimension_fits_widest_patch() {
        assert_eq!(MIN_SEED_DIMENSION, 99);
    }

    #[test]
    fn seeded_fields_have_expected_values() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let (a, b) = seed_initial_condition(120, 150, &mut rng).unwrap();

        assert_eq!(a.dimensions(), (120, 150));
        assert_eq!(b.dimensions(), (120, 150));
        assert!(a.as_slice().iter().all(|&v| v == 1.0));
        assert!(b.as_slice().iter().all(|&v| v == 0.0 || v == 1.0));

        // The smallest patch still covers 10x10 cells.
        let ones = b.as_slice().iter().filter(|&&v| v == 1.0).count();
        assert!(ones >= 100, "expected at least one patch, found {ones} cells");
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let (_, b1) = seed_initial_condition(100, 100, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        let (_, b2) = seed_initial_condition(100, 100, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(b1, b2);
    }

    #[test]
    fn small_grid_fails_fast() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            seed_initial_condition(98, 300, &mut rng),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            seed_initial_condition(300, 98, &mut rng),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            seed_initial_condition(0, 0, &mut rng),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn minimum_grid_seeds_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let p = Patch::random(99, 99, &mut rng).unwrap();
            assert!(p.rows().end <= 99);
            assert!(p.cols().end <= 99);
            assert!(HALF_EXTENT.contains(&p.half_extents.x));
            assert!(HALF_EXTENT.contains(&p.half_extents.y));
        }
    }

    #[test]
    fn random_patch_respects_each_axis() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let p = Patch::random(100, 400, &mut rng).unwrap();
            assert!(p.rows().end <= 100, "rows {:?}", p.rows());
            assert!(p.cols().end <= 400, "cols {:?}", p.cols());
        }
    }

    #[test]
    fn stamp_covers_half_open_rectangle() {
        let mut g = Grid::new(10, 12, 0.0).unwrap();
        let p = Patch {
            center: UVec2::new(6, 4),
            half_extents: UVec2::new(2, 1),
        };
        p.stamp(&mut g).unwrap();

        for r in 0..10 {
            for c in 0..12 {
                let expected = if (3..5).contains(&r) && (4..8).contains(&c) {
                    1.0
                } else {
                    0.0
                };
                assert_eq!(g.get(r, c).unwrap(), expected, "cell ({r}, {c})");
            }
        }

        // Stamping again leaves the value at 1.0.
        p.stamp(&mut g).unwrap();
        assert_eq!(g.get(3, 4).unwrap(), 1.0);
    }

    #[test]
    fn stamp_rejects_patch_past_edge() {
        let mut g = Grid::new(4, 4, 0.0).unwrap();
        let p = Patch {
            center: UVec2::new(3, 3),
            half_extents: UVec2::new(2, 2),
        };
        assert!(matches!(p.stamp(&mut g), Err(SimError::OutOfBounds { .. })));
        assert!(g.as_slice().iter().all(|&v| v == 0.0));
    }
}
