//! The Gray-Scott update, split into its individual terms.
//!
//! One explicit Euler step reads the current fields `A` and `B` and
//! produces fresh grids:
//! 1. [`diffusion_phase`] - `D * laplacian(field)` for each field.
//! 2. [`reaction_phase`] - `A * B * B`, consumed from A and produced in B.
//! 3. [`feed_phase`] - `F * (1 - A)`, replenishing A.
//! 4. [`kill_phase`] - `-(K + F) * B`, removing B.
//! 5. [`integrate`] - combines the terms:
//!    `A' = A + dt * (diffA - reaction + feed)` and
//!    `B' = B + dt * (diffB + reaction + kill)`.
//!
//! Every function is pure: inputs are only read and the results are new
//! grids, so a step never sees partially updated neighbours. Nothing is
//! clamped.

use crate::config::Parameters;
use crate::grid::Grid;
use crate::stencil::{Kernel, convolve};

/// Diffusion term of one field: `rate * convolve(field, kernel)`.
///
/// ### Parameters
/// - `field` - Current concentrations.
/// - `kernel` - Stencil approximating the Laplacian.
/// - `rate` - Diffusion coefficient (`DA` or `DB`).
pub fn diffusion_phase(field: &Grid, kernel: &Kernel, rate: f64) -> Grid {
    convolve(field, kernel).map(|v| rate * v)
}

/// Reaction term `A * B * B`, computed cell by cell.
///
/// ### Panics
/// Panics if `a` and `b` have different dimensions.
pub fn reaction_phase(a: &Grid, b: &Grid) -> Grid {
    a.zip_map(b, |a, b| a * b * b)
}

/// Feed term `F * (1 - A)`.
pub fn feed_phase(a: &Grid, feed: f64) -> Grid {
    a.map(|a| feed * (1.0 - a))
}

/// Kill term `-(K + F) * B`.
pub fn kill_phase(b: &Grid, feed: f64, kill: f64) -> Grid {
    let rate = -(kill + feed);
    b.map(|b| rate * b)
}

/// Output of [`integrate`].
#[derive(Clone, Debug)]
pub struct Integrated {
    pub a: Grid,
    pub b: Grid,
    /// `false` if any cell of either field is NaN or infinite.
    pub finite: bool,
}

/// Advances `(a, b)` by one time step using the parameter snapshot `p`.
///
/// Diffusion, reaction, feed and kill terms are all computed from the
/// inputs before either output is assembled.
///
/// ### Parameters
/// - `a`, `b` - Current fields; must have identical dimensions.
/// - `kernel` - Diffusion stencil.
/// - `p` - Coefficients for this step.
///
/// ### Returns
/// The next fields plus a finiteness flag gathered while writing them.
///
/// ### Panics
/// Panics if `a` and `b` have different dimensions.
pub fn integrate(a: &Grid, b: &Grid, kernel: &Kernel, p: &Parameters) -> Integrated {
    assert_eq!(a.dimensions(), b.dimensions());
    let (height, width) = a.dimensions();

    let diff_a = diffusion_phase(a, kernel, p.da);
    let diff_b = diffusion_phase(b, kernel, p.db);
    let reaction = reaction_phase(a, b);
    let feed = feed_phase(a, p.feed);
    let kill = kill_phase(b, p.feed, p.kill);

    let len = height * width;
    let mut next_a = Vec::with_capacity(len);
    let mut next_b = Vec::with_capacity(len);
    let mut finite = true;

    for i in 0..len {
        let r = reaction.as_slice()[i];
        let na = a.as_slice()[i] + p.dt * (diff_a.as_slice()[i] - r + feed.as_slice()[i]);
        let nb = b.as_slice()[i] + p.dt * (diff_b.as_slice()[i] + r + kill.as_slice()[i]);
        finite &= na.is_finite() && nb.is_finite();
        next_a.push(na);
        next_b.push(nb);
    }

    Integrated {
        a: Grid::from_parts(height, width, next_a),
        b: Grid::from_parts(height, width, next_b),
        finite,
    }
}
