//! Error type shared by every fallible operation in the core.

use thiserror::Error;

/// Errors raised by grid access, configuration and the driver thread.
#[derive(Error, Debug)]
pub enum SimError {
    /// A coordinate fell outside the grid. Access never clamps or wraps.
    #[error("cell ({row}, {col}) is outside a {height}x{width} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    /// Dimensions, shapes or settings that cannot produce a valid simulation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A parameter setter was handed NaN or an infinity.
    #[error("parameter `{name}` must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },

    /// The operating system refused to start the driver thread.
    #[error("failed to spawn simulation driver thread: {0}")]
    DriverSpawn(#[source] std::io::Error),
}

impl SimError {
    pub fn config(message: impl Into<String>) -> Self {
        SimError::InvalidConfiguration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
