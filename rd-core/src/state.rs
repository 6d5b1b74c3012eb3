//! Simulation state shared between a stepping driver and display readers.
//!
//! The current `(A, B)` pair is an immutable [`Fields`] value behind an
//! `Arc`. [`Simulation::step`] computes the next pair without holding the
//! read lock and then swaps the `Arc` in one write, so a reader calling
//! [`Simulation::snapshot`] always gets a complete, consistent pair.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{Parameters, SimConfig, check_finite};
use crate::error::{Result, SimError};
use crate::grid::Grid;
use crate::phases;
use crate::seed::seed_initial_condition;
use crate::stencil::Kernel;
use crate::types::Generation;

/// One published generation of both concentration fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Fields {
    a: Grid,
    b: Grid,
    generation: Generation,
}

impl Fields {
    /// Pairs two grids of identical dimensions as generation 0.
    pub fn new(a: Grid, b: Grid) -> Result<Self> {
        if a.dimensions() != b.dimensions() {
            return Err(SimError::config(format!(
                "field A is {:?} but field B is {:?}",
                a.dimensions(),
                b.dimensions()
            )));
        }
        Ok(Self {
            a,
            b,
            generation: 0,
        })
    }

    /// Activator field.
    pub fn a(&self) -> &Grid {
        &self.a
    }

    /// Inhibitor field.
    pub fn b(&self) -> &Grid {
        &self.b
    }

    /// Number of steps that produced this pair.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.a.dimensions()
    }

    /// Diagnostic only; the simulation never corrects non-finite cells.
    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite()
    }
}

/// A Gray-Scott reaction-diffusion simulation.
///
/// All methods take `&self`; share it between threads with `Arc`.
/// Parameters may change at any time and take effect from the next step.
pub struct Simulation {
    fields: RwLock<Arc<Fields>>,
    params: Mutex<Parameters>,
    kernel: Kernel,
    step_lock: Mutex<()>,
    rng: Mutex<ChaCha8Rng>,
}

// Shared by the driver thread and the UI thread.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Simulation>();
};

impl Simulation {
    /// Builds a simulation and seeds it with random B patches.
    ///
    /// ### Errors
    /// [`SimError::InvalidConfiguration`] for empty or too-small grids, and
    /// [`SimError::NonFiniteParameter`] for bad coefficients.
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };

        let (a, b) = seed_initial_condition(config.height, config.width, &mut rng)?;
        let sim = Self::assemble(Fields::new(a, b)?, config.parameters, rng);
        info!(
            "created {}x{} simulation with {:?}",
            config.height, config.width, config.parameters
        );
        Ok(sim)
    }

    /// Builds a simulation from explicit fields, skipping random seeding.
    ///
    /// Later [`Simulation::reset`] calls use an entropy-seeded generator.
    pub fn from_fields(a: Grid, b: Grid, parameters: Parameters) -> Result<Self> {
        parameters.validate()?;
        let fields = Fields::new(a, b)?;
        Ok(Self::assemble(
            fields,
            parameters,
            ChaCha8Rng::from_rng(&mut rand::rng()),
        ))
    }

    fn assemble(fields: Fields, parameters: Parameters, rng: ChaCha8Rng) -> Self {
        Self {
            fields: RwLock::new(Arc::new(fields)),
            params: Mutex::new(parameters),
            kernel: Kernel::laplacian(),
            step_lock: Mutex::new(()),
            rng: Mutex::new(rng),
        }
    }

    /// Latest published fields. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<Fields> {
        let guard = self.fields.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.snapshot().dimensions()
    }

    pub fn generation(&self) -> Generation {
        self.snapshot().generation()
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Advances both fields by one time step and publishes the result.
    ///
    /// Parameters are read once at the start. Concurrent calls are
    /// serialized, so every call yields exactly one new generation.
    ///
    /// ### Returns
    /// The newly published fields.
    pub fn step(&self) -> Arc<Fields> {
        let _stepping = lock(&self.step_lock);
        let params = self.parameters();
        let current = self.snapshot();

        let next = phases::integrate(&current.a, &current.b, &self.kernel, &params);
        if !next.finite && current.is_finite() {
            warn!(
                "fields became non-finite at generation {} with {:?}",
                current.generation + 1,
                params
            );
        }

        let published = Arc::new(Fields {
            a: next.a,
            b: next.b,
            generation: current.generation + 1,
        });
        self.publish(Arc::clone(&published));
        published
    }

    /// Runs `n` steps back to back and returns the last published fields.
    pub fn step_n(&self, n: u64) -> Arc<Fields> {
        let mut last = self.snapshot();
        for _ in 0..n {
            last = self.step();
        }
        last
    }

    /// Re-seeds the fields with fresh random patches at generation 0.
    pub fn reset(&self) -> Result<()> {
        let _stepping = lock(&self.step_lock);
        let (height, width) = self.dimensions();
        let (a, b) = {
            let mut rng = lock(&self.rng);
            seed_initial_condition(height, width, &mut *rng)?
        };
        self.publish(Arc::new(Fields::new(a, b)?));
        info!("reset {height}x{width} simulation");
        Ok(())
    }

    fn publish(&self, fields: Arc<Fields>) {
        let mut guard = self.fields.write().unwrap_or_else(PoisonError::into_inner);
        *guard = fields;
    }

    /// Copy of the current coefficients.
    pub fn parameters(&self) -> Parameters {
        *lock(&self.params)
    }

    pub fn set_parameters(&self, parameters: Parameters) -> Result<()> {
        parameters.validate()?;
        *lock(&self.params) = parameters;
        Ok(())
    }

    pub fn set_da(&self, value: f64) -> Result<()> {
        self.set_one("da", value, |p| &mut p.da)
    }

    pub fn set_db(&self, value: f64) -> Result<()> {
        self.set_one("db", value, |p| &mut p.db)
    }

    pub fn set_feed(&self, value: f64) -> Result<()> {
        self.set_one("feed", value, |p| &mut p.feed)
    }

    pub fn set_kill(&self, value: f64) -> Result<()> {
        self.set_one("kill", value, |p| &mut p.kill)
    }

    pub fn set_dt(&self, value: f64) -> Result<()> {
        self.set_one("dt", value, |p| &mut p.dt)
    }

    fn set_one(
        &self,
        name: &'static str,
        value: f64,
        field: impl FnOnce(&mut Parameters) -> &mut f64,
    ) -> Result<()> {
        check_finite(name, value)?;
        let mut params = lock(&self.params);
        *field(&mut *params) = value;
        Ok(())
    }
}

// Every guarded value is replaced whole, so a poisoned lock still holds a
// complete value.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
