//! PNG export of the rendered grid.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use rd_core::Fields;

use crate::render;

/// Writes the current fields as a grid-sized grayscale PNG into `dir`.
///
/// The file is named after the local time, e.g.
/// `2024-05-01T13-45-10.123.png`, with a `-1`, `-2`, ... suffix if that
/// name is already taken. The directory is created if missing.
///
/// ### Returns
/// The path of the written file.
pub fn save_png(fields: &Fields, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating screenshot directory {}", dir.display()))?;

    let (height, width) = fields.dimensions();
    let image = image::GrayImage::from_raw(
        u32::try_from(width)?,
        u32::try_from(height)?,
        render::grayscale(fields),
    )
    .context("pixel buffer does not match the grid size")?;

    let stamp = chrono::Local::now().format("%Y-%m-%dT%H-%M-%S%.3f");
    let path = unused_path(dir, &stamp.to_string());
    image
        .save_with_format(&path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;

    info!(
        "image saved to {} (generation {})",
        path.display(),
        fields.generation()
    );
    Ok(path)
}

fn unused_path(dir: &Path, stem: &str) -> PathBuf {
    let mut path = dir.join(format!("{stem}.png"));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{stem}-{n}.png"));
        n += 1;
    }
    path
}
