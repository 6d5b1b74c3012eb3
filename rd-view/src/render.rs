//! Display mapping from concentration fields to grayscale pixels.
//!
//! Each cell is drawn as `clamp(A - B, 0, 1) * 255`. The clamp exists only
//! here; the simulation itself keeps unclamped values.

use rd_core::Fields;

/// Colour drawn wherever there is no grid cell.
pub const BACKGROUND: egui::Color32 = egui::Color32::BLACK;

/// Grayscale intensity of one cell. NaN maps to black.
pub fn intensity(a: f64, b: f64) -> u8 {
    ((a - b).clamp(0.0, 1.0) * 255.0) as u8
}

/// Row-major grayscale pixels, one per cell.
pub fn grayscale(fields: &Fields) -> Vec<u8> {
    fields
        .a()
        .as_slice()
        .iter()
        .zip(fields.b().as_slice())
        .map(|(&a, &b)| intensity(a, b))
        .collect()
}

/// Grid-sized image ready to upload as an egui texture.
pub fn color_image(fields: &Fields) -> egui::ColorImage {
    let (height, width) = fields.dimensions();
    egui::ColorImage::from_gray([width, height], &grayscale(fields))
}
