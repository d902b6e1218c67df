//! Dot layout and painting of the circular symbol.
//!
//! The disc is filled with the primary color and every surviving dark module becomes a light
//! dot, so polarity is inverted relative to a printed QR code.

use kurbo::Shape;

use crate::{
    assets::{decode::PreparedImage, logo::LogoArt},
    foundation::{
        core::{BezPath, Point},
        error::{CheckinError, CheckinResult},
    },
    qr::QrMatrix,
    render::{
        geometry::{CircularLayout, ModuleFate, QrGeometry},
        surface::{RenderSurface, image_paint, surface_side_u16},
    },
    theme::{Rgb, Theme},
};

/// Color of the dots and of the backing disc behind the logo.
pub const LIGHT: Rgb = Rgb::WHITE;

const PATH_TOLERANCE: f64 = 0.1;

/// Counts of what happened to the symbol's dark modules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct LayoutStats {
    /// Dark modules in the symbol.
    pub dark_modules: usize,
    /// Dark modules drawn as dots.
    pub drawn: usize,
    /// Dark modules skipped for the logo zone.
    pub dropped_logo: usize,
    /// Dark modules skipped at the disc edge.
    pub dropped_edge: usize,
}

impl LayoutStats {
    /// Fraction of dark modules not drawn.
    pub fn dropped_fraction(&self) -> f64 {
        if self.dark_modules == 0 {
            return 0.0;
        }
        (self.dropped_logo + self.dropped_edge) as f64 / self.dark_modules as f64
    }
}

/// Resolved dot positions for one symbol on one surface.
#[derive(Clone, Debug)]
pub struct DotLayout {
    /// Pixel geometry used to place the dots.
    pub geometry: CircularLayout,
    /// Centres of the dots to draw.
    pub dots: Vec<Point>,
    /// Drop accounting.
    pub stats: LayoutStats,
}

/// Maps a QR matrix onto a disc of dots around a centre logo.
#[derive(Clone, Copy, Debug, Default)]
pub struct CircularRenderer {
    geometry: QrGeometry,
}

impl CircularRenderer {
    /// Renderer using the given geometry group.
    pub fn new(geometry: QrGeometry) -> CheckinResult<Self> {
        geometry.validate()?;
        Ok(Self { geometry })
    }

    /// The geometry group in use.
    pub fn geometry(&self) -> &QrGeometry {
        &self.geometry
    }

    /// Decide which dark modules become dots.
    pub fn layout(&self, matrix: &QrMatrix, surface_size: u32) -> CheckinResult<DotLayout> {
        let geometry = self.geometry.layout_for(surface_size, matrix.module_count())?;
        let n = matrix.module_count();

        let mut dots = Vec::new();
        let mut stats = LayoutStats::default();
        for row in 0..n {
            for col in 0..n {
                if !matrix.is_dark(row, col) {
                    continue;
                }
                stats.dark_modules += 1;
                match geometry.fate(row, col) {
                    ModuleFate::Drawn => {
                        stats.drawn += 1;
                        dots.push(geometry.module_center(row, col));
                    }
                    ModuleFate::LogoZone => stats.dropped_logo += 1,
                    ModuleFate::OutsideDisc => stats.dropped_edge += 1,
                }
            }
        }

        tracing::debug!(
            module_count = n,
            drawn = stats.drawn,
            dropped_logo = stats.dropped_logo,
            dropped_edge = stats.dropped_edge,
            dropped_fraction = stats.dropped_fraction(),
            "circular layout"
        );
        Ok(DotLayout {
            geometry,
            dots,
            stats,
        })
    }

    /// Paint a laid-out symbol. Without `logo` only the light backing disc is drawn at the
    /// centre.
    #[tracing::instrument(skip_all, fields(size = layout.geometry.surface_size, has_logo = logo.is_some()))]
    pub fn paint(
        &self,
        layout: &DotLayout,
        theme: &Theme,
        logo: Option<&LogoArt>,
    ) -> CheckinResult<RenderSurface> {
        let g = &layout.geometry;
        let side = surface_side_u16(g.surface_size)?;
        let mut ctx = vello_cpu::RenderContext::new(side, side);

        // Inverted polarity: the disc is the dark background, dots are light.
        ctx.set_paint(cpu_color(theme.primary));
        ctx.fill_path(&circle_path(g.center, g.outer_radius));

        ctx.push_clip_layer(&circle_path(g.center, g.clip_radius));

        let mut dots = BezPath::new();
        for &center in &layout.dots {
            dots.extend(kurbo::Circle::new(center, g.dot_radius).path_elements(PATH_TOLERANCE));
        }
        ctx.set_paint(cpu_color(LIGHT));
        ctx.fill_path(&bezpath_to_cpu(&dots));
        ctx.fill_path(&circle_path(g.center, g.backing_radius));

        if let Some(logo) = logo {
            let diameter = (g.logo_radius * 2.0).ceil().max(1.0) as u32;
            let img = logo.rasterize(diameter)?;
            draw_logo(&mut ctx, &img, g.center, g.logo_radius)?;
        }

        ctx.pop_layer();
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(side, side);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(RenderSurface {
            width: g.surface_size,
            height: g.surface_size,
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }

    /// Layout and paint in one step.
    pub fn render(
        &self,
        matrix: &QrMatrix,
        surface_size: u32,
        theme: &Theme,
        logo: Option<&LogoArt>,
    ) -> CheckinResult<(RenderSurface, LayoutStats)> {
        let layout = self.layout(matrix, surface_size)?;
        let surface = self.paint(&layout, theme, logo)?;
        Ok((surface, layout.stats))
    }
}

// Scale the image to cover the disc (aspect preserved, centred) and clip it to the circle.
fn draw_logo(
    ctx: &mut vello_cpu::RenderContext,
    img: &PreparedImage,
    center: Point,
    radius: f64,
) -> CheckinResult<()> {
    if img.width == 0 || img.height == 0 {
        return Err(CheckinError::render("logo raster has zero size"));
    }
    if radius <= 0.0 {
        return Ok(());
    }
    let (w, h) = (f64::from(img.width), f64::from(img.height));
    let scale = (2.0 * radius / w).max(2.0 * radius / h);
    let transform = kurbo::Affine::translate((center.x - w * scale / 2.0, center.y - h * scale / 2.0))
        * kurbo::Affine::scale(scale);

    let paint = image_paint(&img.rgba8_premul, img.width, img.height)?;
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    // Clip circle expressed in image space.
    ctx.fill_path(&circle_path(Point::new(w / 2.0, h / 2.0), radius / scale));
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    Ok(())
}

fn cpu_color(c: Rgb) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn circle_path(center: Point, radius: f64) -> vello_cpu::kurbo::BezPath {
    bezpath_to_cpu(&kurbo::Circle::new(center, radius).to_path(PATH_TOLERANCE))
}

fn affine_to_cpu(a: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/circular.rs"]
mod tests;
