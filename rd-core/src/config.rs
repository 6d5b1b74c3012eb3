use std::time::Duration;

use crate::error::{Result, SimError};

/// Coefficients of the Gray-Scott update.
///
/// Only finiteness is checked. Values outside the ranges that give
/// interesting patterns are accepted and may make the integration unstable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parameters {
    /// Diffusion rate of field A.
    pub da: f64,
    /// Diffusion rate of field B.
    pub db: f64,
    /// Feed rate.
    pub feed: f64,
    /// Kill rate.
    pub kill: f64,
    /// Explicit Euler time step.
    pub dt: f64,
}

impl Parameters {
    pub fn new(da: f64, db: f64, feed: f64, kill: f64, dt: f64) -> Result<Self> {
        let params = Self {
            da,
            db,
            feed,
            kill,
            dt,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        check_finite("da", self.da)?;
        check_finite("db", self.db)?;
        check_finite("feed", self.feed)?;
        check_finite("kill", self.kill)?;
        check_finite("dt", self.dt)?;
        Ok(())
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            da: 1.0,
            db: 0.5,
            feed: 0.055,
            kill: 0.062,
            dt: 1.0,
        }
    }
}

pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::NonFiniteParameter { name, value })
    }
}

/// Everything needed to construct a [`crate::state::Simulation`].
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub height: usize,
    pub width: usize,
    pub parameters: Parameters,
    /// Seed for the initial patches and later resets. `None` draws one from
    /// the thread-local generator.
    pub seed: Option<u64>,
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if self.height == 0 || self.width == 0 {
            return Err(SimError::config(format!(
                "grid dimensions must be positive, got {}x{}",
                self.height, self.width
            )));
        }
        self.parameters.validate()
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            height: 300,
            width: 300,
            parameters: Parameters::default(),
            seed: None,
        }
    }
}

/// Cadence of the background [`crate::driver::Driver`].
#[derive(Clone, Copy, Debug)]
pub struct DriverConfig {
    pub interval: Duration,
    pub start_paused: bool,
}

impl DriverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(SimError::config("driver interval must be non-zero"));
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(10),
            start_paused: false,
        }
    }
}
