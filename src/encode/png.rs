//! PNG export of rendered surfaces.

use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    foundation::error::{CheckinError, CheckinResult},
    render::surface::RenderSurface,
};

/// MIME type of exported rasters.
pub const PNG_MIME: &str = "image/png";
/// File stem used when a display name sanitizes to nothing.
pub const FALLBACK_FILE_STEM: &str = "checkin";

const FILE_SUFFIX: &str = "-checkin-qr.png";

/// An encoded, downloadable raster.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportedRaster {
    /// Suggested file name, `<sanitized name>-checkin-qr.png`.
    pub file_name: String,
    /// Always [`PNG_MIME`].
    pub mime: &'static str,
    /// Encoded PNG bytes.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ExportedRaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportedRaster")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl ExportedRaster {
    /// Write the PNG into `dir` under [`ExportedRaster::file_name`]. Returns the written path.
    pub fn save(&self, dir: impl AsRef<Path>) -> CheckinResult<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(path)
    }
}

/// Lowercase `name`, collapse every run of characters outside `[a-z0-9]` into one `-` and trim
/// dashes at both ends.
pub fn sanitize_file_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() {
        FALLBACK_FILE_STEM.to_string()
    } else {
        out
    }
}

/// Encode `surface` as PNG, exactly as displayed (transparent outside the disc).
#[tracing::instrument(skip(surface), fields(width = surface.width, height = surface.height))]
pub fn export_png(surface: &RenderSurface, display_name: &str) -> CheckinResult<ExportedRaster> {
    let expected = (surface.width as usize) * (surface.height as usize) * 4;
    if surface.width == 0 || surface.height == 0 || surface.data.len() != expected {
        return Err(CheckinError::export(format!(
            "surface is {}x{} with {} bytes",
            surface.width,
            surface.height,
            surface.data.len()
        )));
    }

    let img = image::RgbaImage::from_raw(surface.width, surface.height, surface.to_straight_rgba8())
        .ok_or_else(|| CheckinError::export("surface buffer does not match its dimensions"))?;
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| CheckinError::export(format!("png encode failed: {e}")))?;

    let file_name = format!("{}{FILE_SUFFIX}", sanitize_file_stem(display_name));
    tracing::debug!(file_name, bytes = bytes.len(), "exported png");
    Ok(ExportedRaster {
        file_name,
        mime: PNG_MIME,
        bytes,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
