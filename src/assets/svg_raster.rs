use std::sync::{Arc, LazyLock};

use crate::foundation::error::{CheckinError, CheckinResult};

static FONTDB: LazyLock<Arc<usvg::fontdb::Database>> = LazyLock::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "loaded system fonts for svg text");
    Arc::new(db)
});

/// Parse options sharing one lazily loaded system font database.
pub fn svg_options() -> usvg::Options<'static> {
    usvg::Options {
        fontdb: Arc::clone(&FONTDB),
        ..Default::default()
    }
}

/// Rasterize `svg` source text at exactly `width` x `height`.
pub fn rasterize_svg_str(svg: &str, width: u32, height: u32) -> CheckinResult<Vec<u8>> {
    let tree = usvg::Tree::from_str(svg, &svg_options())
        .map_err(|e| CheckinError::render(format!("invalid generated svg: {e}")))?;
    rasterize_svg_to_premul_rgba8(&tree, width, height)
}

/// Render a parsed tree scaled to `width` x `height`; output is premultiplied RGBA8.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> CheckinResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CheckinError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

/// Escape text for use inside SVG character data.
pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
