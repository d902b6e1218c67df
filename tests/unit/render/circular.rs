use std::sync::Arc;

use super::*;
use crate::{assets::logo::Monogram, qr::EccLevel, theme::DEFAULT_PRIMARY};

const PAYLOAD: &str = "https://dojo.example.com/checkin/abc-123";

fn theme() -> Theme {
    Theme::resolve(Some("#6d28d9"), None, DEFAULT_PRIMARY)
}

fn matrix() -> QrMatrix {
    QrMatrix::generate(PAYLOAD, EccLevel::H).unwrap()
}

fn px(s: &RenderSurface, p: Point) -> [u8; 4] {
    s.pixel(p.x.floor() as u32, p.y.floor() as u32).unwrap()
}

#[test]
fn layout_accounts_for_every_dark_module() {
    let m = matrix();
    let layout = CircularRenderer::default().layout(&m, 600).unwrap();
    let s = layout.stats;
    assert_eq!(s.dark_modules, m.dark_count());
    assert_eq!(s.drawn + s.dropped_logo + s.dropped_edge, s.dark_modules);
    assert_eq!(layout.dots.len(), s.drawn);
    assert!(s.dropped_logo > 0);
    assert_eq!(s.dropped_edge, 0);
    assert!(s.dropped_fraction() < 0.2, "{s:?}");
}

#[test]
fn every_dot_respects_both_skip_rules() {
    let layout = CircularRenderer::default().layout(&matrix(), 600).unwrap();
    let g = layout.geometry;
    for dot in &layout.dots {
        let d = dot.distance(g.center);
        assert!(d >= g.occlusion_radius);
        assert!(d <= g.edge_radius);
    }
}

#[test]
fn tight_geometry_drops_edge_modules() {
    let renderer = CircularRenderer::new(QrGeometry {
        padding_ratio: 50.0 / 600.0,
        logo_zone_ratio: 0.18,
        ..QrGeometry::default()
    })
    .unwrap();
    let layout = renderer.layout(&matrix(), 600).unwrap();
    assert!(layout.stats.dropped_edge > 0);
}

#[test]
fn new_rejects_invalid_geometry() {
    let bad = QrGeometry {
        dot_ratio: 2.0,
        ..QrGeometry::default()
    };
    assert!(CircularRenderer::new(bad).is_err());
}

#[test]
fn paint_draws_disc_dots_and_backing() {
    let m = matrix();
    let renderer = CircularRenderer::default();
    let layout = renderer.layout(&m, 600).unwrap();
    let surface = renderer.paint(&layout, &theme(), None).unwrap();
    assert_eq!((surface.width, surface.height), (600, 600));
    assert_eq!(surface.data.len(), 600 * 600 * 4);

    // Outside the disc is transparent.
    assert_eq!(surface.pixel(2, 2).unwrap()[3], 0);
    // The rim between the grid and the disc edge is the primary color.
    assert_eq!(surface.pixel(300, 20).unwrap(), [0x6d, 0x28, 0xd9, 255]);
    // Backing disc at the centre.
    assert_eq!(surface.pixel(300, 300).unwrap(), [255, 255, 255, 255]);

    let g = layout.geometry;
    for &dot in layout.dots.iter().take(50) {
        assert_eq!(px(&surface, dot), [255, 255, 255, 255]);
    }

    // Light modules stay background.
    let n = m.module_count();
    let (r, c) = (0..n)
        .flat_map(|r| (0..n).map(move |c| (r, c)))
        .find(|&(r, c)| !m.is_dark(r, c) && g.fate(r, c) == ModuleFate::Drawn)
        .unwrap();
    assert_eq!(px(&surface, g.module_center(r, c)), [0x6d, 0x28, 0xd9, 255]);
}

#[test]
fn occluded_dark_modules_outside_the_backing_disc_show_background() {
    let m = matrix();
    let renderer = CircularRenderer::default();
    let layout = renderer.layout(&m, 600).unwrap();
    let surface = renderer.paint(&layout, &theme(), None).unwrap();
    let g = layout.geometry;
    let n = m.module_count();

    let skipped: Vec<_> = (0..n)
        .flat_map(|r| (0..n).map(move |c| (r, c)))
        .filter(|&(r, c)| m.is_dark(r, c) && g.fate(r, c) == ModuleFate::LogoZone)
        .filter(|&(r, c)| {
            g.module_center(r, c).distance(g.center) > g.backing_radius + 2.0
        })
        .collect();
    assert!(!skipped.is_empty());
    for (r, c) in skipped {
        assert_eq!(px(&surface, g.module_center(r, c)), [0x6d, 0x28, 0xd9, 255]);
    }
}

#[test]
fn monogram_logo_is_painted_inside_the_logo_disc() {
    let renderer = CircularRenderer::default();
    let layout = renderer.layout(&matrix(), 600).unwrap();
    let logo = LogoArt::Monogram(Monogram::new("Dojo Central", &theme()));
    let surface = renderer.paint(&layout, &theme(), Some(&logo)).unwrap();

    let g = layout.geometry;
    let top = surface
        .pixel(300, (g.center.y - g.logo_radius * 0.85) as u32)
        .unwrap();
    assert_eq!(top[3], 255);
    assert_ne!(top, [255, 255, 255, 255]);
    assert!(top[2] > top[1], "gradient should stay purple: {top:?}");

    // Ring between logo and backing disc stays light.
    let ring_x = (g.center.x + (g.logo_radius + g.backing_radius) / 2.0) as u32;
    assert_eq!(surface.pixel(ring_x, 300).unwrap(), [255, 255, 255, 255]);
}

#[test]
fn raster_logo_covers_the_logo_disc() {
    let renderer = CircularRenderer::default();
    let layout = renderer.layout(&matrix(), 600).unwrap();
    let mut red = Vec::new();
    for _ in 0..8 {
        red.extend_from_slice(&[255, 0, 0, 255]);
    }
    let logo = LogoArt::Image(PreparedImage {
        width: 4,
        height: 2,
        rgba8_premul: Arc::new(red),
    });
    let surface = renderer.paint(&layout, &theme(), Some(&logo)).unwrap();
    let g = layout.geometry;

    assert_eq!(surface.pixel(300, 300).unwrap(), [255, 0, 0, 255]);
    let inside = (g.center.y - g.logo_radius * 0.8) as u32;
    assert_eq!(surface.pixel(300, inside).unwrap(), [255, 0, 0, 255]);
    // The wide image is clipped to the circle horizontally.
    let outside = (g.center.x + g.logo_radius + 3.0) as u32;
    assert_eq!(surface.pixel(outside, 300).unwrap(), [255, 255, 255, 255]);
}
