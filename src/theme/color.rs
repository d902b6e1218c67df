use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure white.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Pure black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Build from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex (`#rgb`, `#rrggbb`, `#` optional) or `"H S% L%"` color.
    ///
    /// Returns `None` for anything that is not a well-formed color.
    pub fn parse(spec: &str) -> Option<Self> {
        let s = spec.trim();
        if s.is_empty() {
            return None;
        }
        parse_hex(s).or_else(|| parse_hsl_triple(s))
    }

    /// Linear interpolation toward black; `factor` is clamped to `[0, 1]`.
    pub fn darken(self, factor: f64) -> Self {
        let f = clamp_factor(factor);
        let ch = |c: u8| -> u8 { (f64::from(c) * (1.0 - f)).round().clamp(0.0, 255.0) as u8 };
        Self::new(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Linear interpolation toward white; `factor` is clamped to `[0, 1]`.
    pub fn lighten(self, factor: f64) -> Self {
        let f = clamp_factor(factor);
        let ch = |c: u8| -> u8 {
            let c = f64::from(c);
            (c + (255.0 - c) * f).round().clamp(0.0, 255.0) as u8
        };
        Self::new(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Rec. 601 luma in `[0, 255]`.
    pub fn luma(self) -> f64 {
        0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b)
    }

    pub(crate) fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Resolve an optional color spec, falling back when absent or malformed. Never fails.
pub fn normalize(spec: Option<&str>, fallback: Rgb) -> Rgb {
    match spec.and_then(Rgb::parse) {
        Some(c) => c,
        None => {
            if let Some(raw) = spec.filter(|s| !s.trim().is_empty()) {
                tracing::debug!(spec = raw, fallback = %fallback.to_hex(), "unparseable color, using fallback");
            }
            fallback
        }
    }
}

/// Free-function form of [`Rgb::darken`].
pub fn darken(rgb: Rgb, factor: f64) -> Rgb {
    rgb.darken(factor)
}

/// Free-function form of [`Rgb::lighten`].
pub fn lighten(rgb: Rgb, factor: f64) -> Rgb {
    rgb.lighten(factor)
}

fn clamp_factor(factor: f64) -> f64 {
    if factor.is_finite() {
        factor.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn parse_hex(s: &str) -> Option<Rgb> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |b: u8| -> u8 {
        match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            _ => b - b'A' + 10,
        }
    };

    match *s.as_bytes() {
        [r, g, b] => Some(Rgb::new(
            nibble(r) * 17,
            nibble(g) * 17,
            nibble(b) * 17,
        )),
        [r1, r0, g1, g0, b1, b0] => Some(Rgb::new(
            nibble(r1) << 4 | nibble(r0),
            nibble(g1) << 4 | nibble(g0),
            nibble(b1) << 4 | nibble(b0),
        )),
        _ => None,
    }
}

// Accepts "262 83% 58%", "262, 83%, 58%", "hsl(262deg 83% 58%)" and similar.
fn parse_hsl_triple(s: &str) -> Option<Rgb> {
    let lower = s.to_ascii_lowercase();
    let inner = lower
        .strip_prefix("hsl(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(&lower);

    let parts: Vec<&str> = inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    let [h, s, l] = parts.as_slice() else {
        return None;
    };

    let h: f64 = h.trim_end_matches("deg").parse().ok()?;
    let s: f64 = s.trim_end_matches('%').parse().ok()?;
    let l: f64 = l.trim_end_matches('%').parse().ok()?;
    if !(h.is_finite() && s.is_finite() && l.is_finite()) {
        return None;
    }

    let (r, g, b) = hsl_to_rgb(h, s / 100.0, l / 100.0);
    let to_u8 = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
    Some(Rgb::new(to_u8(r), to_u8(g), to_u8(b)))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return (l, l, l);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/theme/color.rs"]
mod tests;
