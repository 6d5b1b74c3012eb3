//! Core Gray-Scott reaction-diffusion simulation library.
//!
//! Main components:
//! - [`grid`] - fixed-size 2-D concentration fields.
//! - [`stencil`] - 3x3 Laplacian kernel and zero-padded convolution.
//! - [`config`] - reaction coefficients, grid and driver settings.
//! - [`phases`] - diffusion, reaction, feed and kill terms of one step.
//! - [`seed`] - random rectangular patches for the initial condition.
//! - [`state`] - the shared simulation and its published snapshots.
//! - [`driver`] - background thread stepping at a fixed cadence.
//! - [`error`] - the crate error type.
//! - [`types`] - shared type aliases.

pub mod config;
pub mod driver;
pub mod error;
pub mod grid;
pub mod phases;
pub mod seed;
pub mod state;
pub mod stencil;
pub mod types;

pub use config::{DriverConfig, Parameters, SimConfig};
pub use driver::Driver;
pub use error::{Result, SimError};
pub use grid::Grid;
pub use state::{Fields, Simulation};
pub use stencil::{Kernel, convolve};
