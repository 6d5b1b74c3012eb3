//! Application entry point for the Gray-Scott reaction-diffusion viewer.
//!
//! This binary parses the command line, builds the shared simulation,
//! sets up eframe/egui and delegates all interactive logic and rendering
//! to [`Viewer`] from the `viewer` module.

mod render;
mod screenshot;
mod viewer;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::info;
use rd_core::{DriverConfig, Parameters, SimConfig, Simulation};

use viewer::Viewer;

/// Interactive Gray-Scott reaction-diffusion viewer.
///
/// Press `S` to save the grid as a PNG and `C` to close the window.
#[derive(Parser, Debug)]
#[command(name = "rd-view", version, about)]
struct Args {
    /// Grid rows.
    #[arg(long, default_value_t = 300)]
    height: usize,

    /// Grid columns.
    #[arg(long, default_value_t = 300)]
    width: usize,

    /// Seed for the initial patches; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between simulation steps.
    #[arg(long, default_value_t = 10)]
    interval_ms: u64,

    /// Start with stepping paused.
    #[arg(long)]
    paused: bool,

    #[arg(long, default_value_t = Parameters::default().da)]
    da: f64,

    #[arg(long, default_value_t = Parameters::default().db)]
    db: f64,

    #[arg(long, default_value_t = Parameters::default().feed)]
    feed: f64,

    #[arg(long, default_value_t = Parameters::default().kill)]
    kill: f64,

    #[arg(long, default_value_t = Parameters::default().dt)]
    dt: f64,

    /// Directory receiving screenshots.
    #[arg(long, default_value = "images")]
    screenshot_dir: PathBuf,
}

impl Args {
    fn sim_config(&self) -> anyhow::Result<SimConfig> {
        let parameters = Parameters::new(self.da, self.db, self.feed, self.kill, self.dt)?;
        Ok(SimConfig {
            height: self.height,
            width: self.width,
            parameters,
            seed: self.seed,
        })
    }

    fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            interval: Duration::from_millis(self.interval_ms),
            start_paused: self.paused,
        }
    }
}

/// Starts the native eframe application.
///
/// The window is sized to fit the grid plus the parameter panel. The
/// simulation is built before the window opens so configuration errors
/// surface on the command line.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the configuration is invalid or eframe fails to create the
///   native window or event loop.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.sim_config()?;
    let sim = Arc::new(Simulation::new(&config).context("building simulation")?);
    let driver_config = args.driver_config();
    driver_config.validate()?;
    info!("starting viewer with {args:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Reaction Diffusion")
            .with_inner_size([config.width as f32 + 280.0, config.height as f32 + 80.0]),
        ..Default::default()
    };

    let screenshot_dir = args.screenshot_dir;
    eframe::run_native(
        "Reaction Diffusion",
        options,
        Box::new(move |cc| {
            // Construct the root app state; this also starts the driver thread.
            let viewer = Viewer::launch(cc, sim, driver_config, screenshot_dir)?;
            Ok(Box::new(viewer))
        }),
    )
    .map_err(|err| anyhow::anyhow!("eframe failed: {err}"))
}
