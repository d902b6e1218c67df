//! The coupled geometry constants and the module-to-pixel mapping.

use crate::foundation::{
    core::Point,
    error::{CheckinError, CheckinResult},
};

/// The coupled geometry constants of the circular renderer.
///
/// `padding_ratio`, `logo_zone_ratio` and the outer radius margins jointly decide how many
/// modules are dropped, and that count has to stay inside the level-H error-correction budget.
/// Every length is a fraction of the surface side (or of the module size), so the drop count
/// does not depend on the surface size.
/// Change them together and re-run the decodability regression tests (`tests/decodability.rs`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QrGeometry {
    /// Inset of the module grid from each surface edge, as a fraction of the surface side.
    pub padding_ratio: f64,
    /// Radius of the center logo disc, as a fraction of the surface side.
    pub logo_zone_ratio: f64,
    /// Dot radius as a fraction of the module size.
    pub dot_ratio: f64,
    /// Extra clearance around the logo zone, in modules.
    pub occlusion_margin_modules: f64,
    /// Dots whose centre is closer than this to the disc edge are skipped, as a fraction of the
    /// surface side.
    pub edge_margin_ratio: f64,
    /// Inset of the drawing clip from the disc edge, as a fraction of the surface side.
    pub clip_inset_ratio: f64,
    /// How far the light backing disc extends past the logo zone, as a fraction of the surface
    /// side.
    pub backing_pad_ratio: f64,
}

impl Default for QrGeometry {
    fn default() -> Self {
        Self {
            padding_ratio: 0.17,
            logo_zone_ratio: 0.09,
            dot_ratio: 0.42,
            occlusion_margin_modules: 1.5,
            // 12 px, 2 px and 6 px at a 600 px surface.
            edge_margin_ratio: 12.0 / 600.0,
            clip_inset_ratio: 2.0 / 600.0,
            backing_pad_ratio: 6.0 / 600.0,
        }
    }
}

impl QrGeometry {
    /// Reject values that cannot produce a sensible layout.
    pub fn validate(&self) -> CheckinResult<()> {
        fn finite(name: &str, v: f64) -> CheckinResult<f64> {
            if v.is_finite() {
                Ok(v)
            } else {
                Err(CheckinError::validation(format!("geometry.{name} must be finite")))
            }
        }

        let padding = finite("padding_ratio", self.padding_ratio)?;
        if !(0.0..0.5).contains(&padding) {
            return Err(CheckinError::validation(
                "geometry.padding_ratio must be in [0, 0.5)",
            ));
        }
        let logo = finite("logo_zone_ratio", self.logo_zone_ratio)?;
        if !(0.0..0.5).contains(&logo) {
            return Err(CheckinError::validation(
                "geometry.logo_zone_ratio must be in [0, 0.5)",
            ));
        }
        let dot = finite("dot_ratio", self.dot_ratio)?;
        if dot <= 0.0 || dot > 0.5 {
            return Err(CheckinError::validation("geometry.dot_ratio must be in (0, 0.5]"));
        }
        if finite("occlusion_margin_modules", self.occlusion_margin_modules)? < 0.0 {
            return Err(CheckinError::validation(
                "geometry.occlusion_margin_modules must be >= 0",
            ));
        }
        for (name, v) in [
            ("edge_margin_ratio", self.edge_margin_ratio),
            ("clip_inset_ratio", self.clip_inset_ratio),
            ("backing_pad_ratio", self.backing_pad_ratio),
        ] {
            if !(0.0..0.5).contains(&finite(name, v)?) {
                return Err(CheckinError::validation(format!(
                    "geometry.{name} must be in [0, 0.5)"
                )));
            }
        }
        Ok(())
    }

    /// Resolve the constants against a concrete surface and symbol size.
    pub fn layout_for(&self, surface_size: u32, module_count: usize) -> CheckinResult<CircularLayout> {
        self.validate()?;
        if surface_size == 0 {
            return Err(CheckinError::validation("surface size must be > 0"));
        }
        if module_count == 0 {
            return Err(CheckinError::validation("module count must be > 0"));
        }

        let size = f64::from(surface_size);
        let outer_radius = size / 2.0;
        let padding = size * self.padding_ratio;
        let module_size = (size - 2.0 * padding) / module_count as f64;
        let logo_radius = size * self.logo_zone_ratio;

        Ok(CircularLayout {
            surface_size,
            module_count,
            center: Point::new(outer_radius, outer_radius),
            outer_radius,
            padding,
            module_size,
            dot_radius: self.dot_ratio * module_size,
            logo_radius,
            occlusion_radius: logo_radius + self.occlusion_margin_modules * module_size,
            edge_radius: outer_radius - size * self.edge_margin_ratio,
            clip_radius: (outer_radius - size * self.clip_inset_ratio).max(0.0),
            backing_radius: logo_radius + size * self.backing_pad_ratio,
        })
    }
}

/// What happens to a dark module when the symbol is mapped onto the disc.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModuleFate {
    /// Drawn as a dot.
    Drawn,
    /// Skipped: inside the reserved logo zone.
    LogoZone,
    /// Skipped: too close to (or beyond) the disc edge.
    OutsideDisc,
}

/// Pixel-space geometry of one symbol on one surface.
///
/// This is also the mapping a reader needs to go from module coordinates to surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircularLayout {
    /// Surface side `S`.
    pub surface_size: u32,
    /// Symbol side `N`.
    pub module_count: usize,
    /// Disc centre `(S/2, S/2)`.
    pub center: Point,
    /// `S/2`.
    pub outer_radius: f64,
    /// Grid inset from the surface edges.
    pub padding: f64,
    /// `(S - 2 * padding) / N`.
    pub module_size: f64,
    /// Radius of each drawn dot.
    pub dot_radius: f64,
    /// Radius of the logo disc.
    pub logo_radius: f64,
    /// Dark modules closer than this to the centre are skipped.
    pub occlusion_radius: f64,
    /// Dark modules farther than this from the centre are skipped.
    pub edge_radius: f64,
    /// Radius of the drawing clip.
    pub clip_radius: f64,
    /// Radius of the light disc behind the logo.
    pub backing_radius: f64,
}

impl CircularLayout {
    /// Surface coordinates of the centre of module `(row, col)`.
    pub fn module_center(&self, row: usize, col: usize) -> Point {
        Point::new(
            self.padding + (col as f64 + 0.5) * self.module_size,
            self.padding + (row as f64 + 0.5) * self.module_size,
        )
    }

    /// Classify module `(row, col)` as drawn or dropped.
    pub fn fate(&self, row: usize, col: usize) -> ModuleFate {
        let d = self.module_center(row, col).distance(self.center);
        if d < self.occlusion_radius {
            ModuleFate::LogoZone
        } else if d > self.edge_radius {
            ModuleFate::OutsideDisc
        } else {
            ModuleFate::Drawn
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
