//! Interactive Gray-Scott viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which holds a shared [`Simulation`],
//! the background [`Driver`] stepping it, and the slider-bound copy of the
//! reaction parameters. It implements [`eframe::App`] to draw the fields
//! and forward user input to the simulation.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::Arc;

use eframe::App;
use log::{error, warn};
use rd_core::{Driver, DriverConfig, Fields, Parameters, Simulation};

use crate::{render, screenshot};

const DA_RANGE: RangeInclusive<f64> = 0.0..=1.0;
const DB_RANGE: RangeInclusive<f64> = 0.0..=1.0;
const FEED_RANGE: RangeInclusive<f64> = 0.002..=0.12;
const KILL_RANGE: RangeInclusive<f64> = 0.01..=0.07;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: a shared [`Simulation`] and the [`Driver`] thread
///   that steps it on a fixed cadence.
/// - UI state: slider values, zoom, hovered cell, last status message.
/// - eframe/egui callbacks for drawing and key handling.
///
/// The typical per-frame update is:
/// 1. Handle key presses (`S` saves a screenshot, `C` closes the window).
/// 2. Upload the latest published fields to the texture if they changed.
/// 3. Draw the panels and push any slider change to the simulation.
///
/// ### Fields
/// - `sim` - Simulation shared with the driver thread.
/// - `driver` - Background stepper; `None` when stepping is manual only.
/// - `params` - Slider-bound copy of the reaction parameters.
///
/// - `fields` - Latest snapshot read by the UI.
/// - `texture` - GPU texture holding a grayscale rendering.
/// - `shown` - Snapshot currently uploaded to `texture`.
///
/// - `zoom` - Screen pixels per grid cell.
/// - `hovered` - Grid cell under the pointer, if any.
/// - `screenshot_dir` - Directory receiving PNG screenshots.
/// - `status` - Last message shown in the status bar.
pub struct Viewer {
    sim: Arc<Simulation>,
    driver: Option<Driver>,
    params: Parameters,

    fields: Arc<Fields>,
    texture: Option<egui::TextureHandle>,
    shown: Option<Arc<Fields>>,

    zoom: f32,
    hovered: Option<(usize, usize)>,
    screenshot_dir: PathBuf,
    status: Option<String>,
}

impl Viewer {
    /// Creates a viewer around an existing simulation and optional driver.
    ///
    /// ### Parameters
    /// - `sim` - Simulation to display and control.
    /// - `driver` - Background stepper for `sim`, if any.
    /// - `screenshot_dir` - Where `S` writes PNG files.
    pub fn new(sim: Arc<Simulation>, driver: Option<Driver>, screenshot_dir: PathBuf) -> Self {
        let params = sim.parameters();
        let fields = sim.snapshot();
        Self {
            sim,
            driver,
            params,
            fields,
            texture: None,
            shown: None,
            zoom: 1.0,
            hovered: None,
            screenshot_dir,
            status: None,
        }
    }

    /// Starts the driver thread and builds the viewer from eframe's
    /// creation context.
    ///
    /// The driver requests a repaint after every step, so the raster
    /// refreshes at the simulation cadence rather than only on input.
    ///
    /// ### Errors
    /// Propagates [`rd_core::SimError`] from [`Driver::spawn`].
    pub fn launch(
        cc: &eframe::CreationContext<'_>,
        sim: Arc<Simulation>,
        driver_config: DriverConfig,
        screenshot_dir: PathBuf,
    ) -> rd_core::Result<Self> {
        let ctx = cc.egui_ctx.clone();
        let driver = Driver::spawn(Arc::clone(&sim), driver_config, move |_| {
            ctx.request_repaint();
        })?;
        Ok(Self::new(sim, Some(driver), screenshot_dir))
    }

    fn is_running(&self) -> bool {
        self.driver.as_ref().is_some_and(|d| !d.is_paused())
    }

    /// Pauses or resumes the driver. No-op without a driver.
    fn toggle_running(&mut self) {
        if let Some(driver) = &self.driver {
            if driver.is_paused() {
                driver.resume();
            } else {
                driver.pause();
            }
        }
    }

    /// Advances the simulation by a single step outside the driver cadence.
    fn step_once(&mut self) {
        self.fields = self.sim.step();
    }

    /// Re-seeds the simulation with fresh random patches.
    fn reset(&mut self) {
        match self.sim.reset() {
            Ok(()) => {
                self.fields = self.sim.snapshot();
                self.status = Some("reset".to_owned());
            }
            Err(err) => {
                error!("reset failed: {err}");
                self.status = Some(format!("reset failed: {err}"));
            }
        }
    }

    /// Pushes the slider values to the simulation.
    ///
    /// On rejection the sliders snap back to the simulation's values.
    fn apply_parameters(&mut self) {
        if let Err(err) = self.sim.set_parameters(self.params) {
            warn!("rejected parameters: {err}");
            self.params = self.sim.parameters();
        }
    }

    fn save_screenshot(&mut self) {
        let fields = self.sim.snapshot();
        self.status = Some(match screenshot::save_png(&fields, &self.screenshot_dir) {
            Ok(path) => format!("image saved to {}", path.display()),
            Err(err) => {
                error!("screenshot failed: {err:#}");
                format!("screenshot failed: {err}")
            }
        });
    }

    /// Maps a pointer offset from the raster's top-left corner to a cell.
    ///
    /// ### Returns
    /// `(row, col)` if the offset lies on the grid, `None` otherwise.
    fn cell_at(&self, offset: egui::Vec2) -> Option<(usize, usize)> {
        if offset.x < 0.0 || offset.y < 0.0 {
            return None;
        }
        let (height, width) = self.fields.dimensions();
        let row = (offset.y / self.zoom) as usize;
        let col = (offset.x / self.zoom) as usize;
        (row < height && col < width).then_some((row, col))
    }

    /// Uploads the latest snapshot if a new generation was published.
    fn refresh_texture(&mut self, ctx: &egui::Context) {
        let latest = self.sim.snapshot();
        let uploaded = self
            .shown
            .as_ref()
            .is_some_and(|shown| Arc::ptr_eq(shown, &latest));
        if uploaded && self.texture.is_some() {
            return;
        }

        let image = render::color_image(&latest);
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ctx.load_texture("fields", image, egui::TextureOptions::NEAREST));
            }
        }
        self.shown = Some(Arc::clone(&latest));
        self.fields = latest;
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (save, close) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::S),
                i.key_pressed(egui::Key::C),
            )
        });
        if save {
            self.save_screenshot();
        }
        if close {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    /// Helper to draw one labeled parameter slider.
    ///
    /// ### Returns
    /// `true` if the value changed this frame.
    fn parameter_slider(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f64,
        range: RangeInclusive<f64>,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(
                egui::Slider::new(value, range)
                    .step_by(0.001)
                    .fixed_decimals(3),
            )
            .changed()
        })
        .inner
    }

    /// Builds the top panel (run controls, stepping, reset, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.driver.is_some()
                    && ui
                        .button(if self.is_running() { "⏸ Pause" } else { "▶ Run" })
                        .clicked()
                {
                    self.toggle_running();
                }

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                if ui.button("Save (S)").clicked() {
                    self.save_screenshot();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 1.0..=4.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (generation, value ranges, hover readout).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("generation = {}", self.fields.generation()));

                let (a_lo, a_hi) = self.fields.a().min_max();
                let (b_lo, b_hi) = self.fields.b().min_max();
                ui.label(format!("A in [{a_lo:.3}, {a_hi:.3}]"));
                ui.label(format!("B in [{b_lo:.3}, {b_hi:.3}]"));

                if !self.fields.is_finite() {
                    ui.colored_label(egui::Color32::RED, "non-finite values");
                }

                if let Some((row, col)) = self.hovered
                    && let Ok(a) = self.fields.a().get(row, col)
                    && let Ok(b) = self.fields.b().get(row, col)
                {
                    ui.separator();
                    ui.label(format!("({row}, {col}): A = {a:.3}, B = {b:.3}"));
                }

                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });
    }

    /// Builds the right-hand panel with the reaction parameter sliders.
    fn ui_controls_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("controls_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Parameters");
                ui.separator();

                let mut changed = false;
                changed |= Self::parameter_slider(ui, "DA", &mut self.params.da, DA_RANGE);
                changed |= Self::parameter_slider(ui, "DB", &mut self.params.db, DB_RANGE);
                changed |= Self::parameter_slider(ui, "f", &mut self.params.feed, FEED_RANGE);
                changed |= Self::parameter_slider(ui, "k", &mut self.params.kill, KILL_RANGE);

                ui.horizontal(|ui| {
                    ui.label("dt");
                    changed |= ui
                        .add(
                            egui::DragValue::new(&mut self.params.dt)
                                .speed(0.01)
                                .range(0.0..=2.0),
                        )
                        .changed();
                });

                ui.separator();
                if ui.button("Reset parameters to default").clicked() {
                    self.params = Parameters::default();
                    changed = true;
                }

                if changed {
                    self.apply_parameters();
                }
            });
    }

    /// Builds the central panel where the fields are drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(render::BACKGROUND))
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::hover());
                painter.rect_filled(response.rect, 0.0, render::BACKGROUND);

                let (height, width) = self.fields.dimensions();
                let raster = egui::Rect::from_min_size(
                    response.rect.min,
                    egui::vec2(width as f32, height as f32) * self.zoom,
                );

                if let Some(texture) = &self.texture {
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    painter.image(texture.id(), raster, uv, egui::Color32::WHITE);
                }

                self.hovered = response
                    .hover_pos()
                    .and_then(|p| self.cell_at(p - raster.min));
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        self.refresh_texture(ctx);
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_controls_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
