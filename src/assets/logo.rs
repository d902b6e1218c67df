//! Centre artwork: fetched logos and the monogram fallback.

use std::sync::Arc;

use crate::{
    assets::{
        decode::{PreparedImage, decode_logo},
        source::LogoSource,
        svg_raster::{rasterize_svg_str, xml_escape},
    },
    foundation::{core::CheckinIdentity, error::CheckinResult},
    theme::{Rgb, Theme},
};

/// Lightening applied to the primary color for the second gradient stop of the monogram.
pub const MONOGRAM_LIGHTEN: f64 = 0.35;

/// Glyph used when the display name is empty.
pub const MONOGRAM_PLACEHOLDER: &str = "?";

/// Synthetic logo: gradient disc with the site's initial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Monogram {
    /// Upper-cased first character of the display name.
    pub glyph: String,
    /// Top-left gradient stop.
    pub from: Rgb,
    /// Bottom-right gradient stop.
    pub to: Rgb,
}

impl Monogram {
    /// Monogram for `display_name` in the theme's primary color.
    pub fn new(display_name: &str, theme: &Theme) -> Self {
        let glyph = display_name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_else(|| MONOGRAM_PLACEHOLDER.to_string());
        Self {
            glyph,
            from: theme.primary,
            to: theme.primary.lighten(MONOGRAM_LIGHTEN),
        }
    }

    /// SVG document of the monogram filling a `diameter` square.
    pub fn to_svg(&self, diameter: u32) -> String {
        let d = diameter.max(1);
        let r = f64::from(d) / 2.0;
        let font_size = r;
        format!(
            concat!(
                r##"<svg xmlns="http://www.w3.org/2000/svg" width="{d}" height="{d}" viewBox="0 0 {d} {d}">"##,
                r##"<defs><linearGradient id="g" x1="0" y1="0" x2="1" y2="1">"##,
                r##"<stop offset="0" stop-color="{from}"/><stop offset="1" stop-color="{to}"/>"##,
                r##"</linearGradient></defs>"##,
                r##"<circle cx="{r}" cy="{r}" r="{r}" fill="url(#g)"/>"##,
                r##"<text x="{r}" y="{r}" text-anchor="middle" dominant-baseline="central" "##,
                r##"font-family="sans-serif" font-weight="bold" font-size="{fs}" fill="#ffffff">{glyph}</text>"##,
                r##"</svg>"##
            ),
            d = d,
            r = r,
            fs = font_size,
            from = self.from.to_hex(),
            to = self.to.to_hex(),
            glyph = xml_escape(&self.glyph),
        )
    }
}

/// Artwork for the centre of the disc.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogoArt {
    /// A fetched and decoded raster logo.
    Image(PreparedImage),
    /// The synthetic fallback.
    Monogram(Monogram),
}

impl LogoArt {
    /// Raster of the artwork for a disc of `diameter` pixels.
    ///
    /// Images are returned at their native size; the renderer scales them to cover the disc.
    pub fn rasterize(&self, diameter: u32) -> CheckinResult<PreparedImage> {
        match self {
            LogoArt::Image(img) => Ok(img.clone()),
            LogoArt::Monogram(m) => {
                let d = diameter.max(1);
                let bytes = rasterize_svg_str(&m.to_svg(d), d, d)?;
                Ok(PreparedImage {
                    width: d,
                    height: d,
                    rgba8_premul: Arc::new(bytes),
                })
            }
        }
    }

    /// Whether this is the synthetic fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(self, LogoArt::Monogram(_))
    }
}

/// Loads a location's logo, falling back to a [`Monogram`] on absence or any failure.
#[derive(Debug)]
pub struct LogoCompositor<S> {
    source: S,
}

impl<S: LogoSource> LogoCompositor<S> {
    /// Compositor fetching through `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The synthetic fallback for an identity.
    pub fn fallback(identity: &CheckinIdentity, theme: &Theme) -> LogoArt {
        LogoArt::Monogram(Monogram::new(&identity.display_name, theme))
    }

    /// Resolve the artwork for `identity`. Never fails.
    #[tracing::instrument(skip_all, fields(location = %identity.location_id))]
    pub async fn load(&self, identity: &CheckinIdentity, theme: &Theme) -> LogoArt {
        let Some(resource) = identity
            .logo_resource
            .as_deref()
            .filter(|r| !r.trim().is_empty())
        else {
            return Self::fallback(identity, theme);
        };

        match self.fetch_and_decode(resource).await {
            Ok(img) => {
                tracing::debug!(width = img.width, height = img.height, "logo loaded");
                LogoArt::Image(img)
            }
            Err(err) => {
                tracing::warn!(resource, error = %err, "logo unavailable, using monogram");
                Self::fallback(identity, theme)
            }
        }
    }

    async fn fetch_and_decode(&self, resource: &str) -> CheckinResult<PreparedImage> {
        let bytes = self.source.fetch(resource).await?;
        decode_logo(&bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/logo.rs"]
mod tests;
