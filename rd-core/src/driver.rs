//! Fixed-cadence background stepping.
//!
//! [`Driver`] owns a named thread that calls [`Simulation::step`] once per
//! interval, independent of whoever is drawing the fields. After each step
//! it hands the published [`Fields`] to a callback, typically used to
//! request a redraw.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, error, info};

use crate::config::DriverConfig;
use crate::error::{Result, SimError};
use crate::state::{Fields, Simulation};

/// Handle to the stepping thread. Dropping it stops and joins the thread.
pub struct Driver {
    shutdown: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Driver {
    /// Starts stepping `sim` every `config.interval`.
    ///
    /// ### Parameters
    /// - `sim` - Shared simulation to advance.
    /// - `config` - Interval and initial pause state.
    /// - `on_step` - Called on the driver thread after every step.
    ///
    /// ### Errors
    /// [`SimError::InvalidConfiguration`] for a zero interval and
    /// [`SimError::DriverSpawn`] if the thread cannot be created.
    pub fn spawn<F>(sim: Arc<Simulation>, config: DriverConfig, mut on_step: F) -> Result<Self>
    where
        F: FnMut(&Fields) + Send + 'static,
    {
        config.validate()?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let paused = Arc::new(AtomicBool::new(config.start_paused));
        let interval = config.interval;

        let handle = {
            let shutdown = Arc::clone(&shutdown);
            let paused = Arc::clone(&paused);
            thread::Builder::new()
                .name("rd-driver".into())
                .spawn(move || {
                    while !shutdown.load(Ordering::Acquire) {
                        let deadline = Instant::now() + interval;
                        let was_paused = paused.load(Ordering::Acquire);
                        if !was_paused {
                            let fields = sim.step();
                            on_step(&*fields);
                        }
                        wait_until(deadline, || {
                            shutdown.load(Ordering::Acquire)
                                || paused.load(Ordering::Acquire) != was_paused
                        });
                    }
                    debug!("driver thread exiting at generation {}", sim.generation());
                })
                .map_err(SimError::DriverSpawn)?
        };

        info!(
            "driver started: interval {:?}, paused {}",
            interval, config.start_paused
        );
        Ok(Self {
            shutdown,
            paused,
            handle: Some(handle),
        })
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
        self.wake();
    }

    /// Resumes stepping. The first step runs without waiting out the
    /// interval the driver was parked in.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.wake();
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Stops the thread and waits for the step in progress to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn wake(&self) {
        if let Some(handle) = &self.handle {
            handle.thread().unpark();
        }
    }

    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        self.wake();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("driver thread panicked");
            }
            info!("driver stopped");
        }
    }
}

/// Parks the current thread until `deadline` or until `interrupted`
/// reports true. Spurious wakeups park again for the remaining time.
fn wait_until(deadline: Instant, interrupted: impl Fn() -> bool) {
    while !interrupted() {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::park_timeout(deadline - now);
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.stop();
    }
}
