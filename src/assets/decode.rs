//! Logo decoding into premultiplied rasters.

use std::sync::Arc;

use anyhow::Context;

use crate::{
    assets::svg_raster::rasterize_svg_to_premul_rgba8,
    foundation::error::{CheckinError, CheckinResult},
    render::surface::premultiply_rgba8_in_place,
};

/// Largest logo side kept after decoding; bigger images are downscaled.
pub const MAX_LOGO_SIDE: u32 = 1024;

/// Decoded raster ready for compositing.
#[derive(Clone, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl std::fmt::Debug for PreparedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Decode logo bytes. SVG documents are rasterized, everything else goes through `image`.
pub fn decode_logo(bytes: &[u8]) -> CheckinResult<PreparedImage> {
    if looks_like_svg(bytes) {
        let tree = parse_svg(bytes)?;
        let size = tree.size();
        let scale = (MAX_LOGO_SIDE as f32 / size.width().max(size.height())).min(1.0);
        let w = ((size.width() * scale).ceil() as u32).max(1);
        let h = ((size.height() * scale).ceil() as u32).max(1);
        let rgba8_premul = rasterize_svg_to_premul_rgba8(&tree, w, h)?;
        return Ok(PreparedImage {
            width: w,
            height: h,
            rgba8_premul: Arc::new(rgba8_premul),
        });
    }
    decode_image(bytes)
}

/// Decode a raster image (PNG, JPEG, GIF, WebP, ...) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> CheckinResult<PreparedImage> {
    let mut dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    if dyn_img.width() == 0 || dyn_img.height() == 0 {
        return Err(CheckinError::validation("image has zero size"));
    }
    if dyn_img.width() > MAX_LOGO_SIDE || dyn_img.height() > MAX_LOGO_SIDE {
        dyn_img = dyn_img.thumbnail(MAX_LOGO_SIDE, MAX_LOGO_SIDE);
    }
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn parse_svg(bytes: &[u8]) -> CheckinResult<usvg::Tree> {
    let opts = crate::assets::svg_raster::svg_options();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with("<?xml") && text.contains("<svg"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
