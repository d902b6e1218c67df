//! Color resolution shared by the renderer and other report code.
//!
//! Everything here is pure: no shared state, no failure modes.

mod color;

pub use color::{Rgb, darken, lighten, normalize};

use crate::foundation::core::CheckinIdentity;

/// Lightening applied to the primary color when no accent is configured.
pub const DERIVED_ACCENT_LIGHTEN: f64 = 0.6;

/// Default primary when a location has no (usable) brand color.
pub const DEFAULT_PRIMARY: Rgb = Rgb::new(0x1f, 0x29, 0x37);

/// Fully resolved brand colors for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Theme {
    /// Background disc color.
    pub primary: Rgb,
    /// Decorative accent, derived from `primary` when not configured.
    pub accent: Rgb,
}

impl Theme {
    /// Resolve raw color specs. `primary` falls back to `fallback_primary`; an absent or
    /// malformed accent is derived as `lighten(primary, 0.6)`.
    pub fn resolve(primary: Option<&str>, accent: Option<&str>, fallback_primary: Rgb) -> Self {
        let primary = normalize(primary, fallback_primary);
        let derived = primary.lighten(DERIVED_ACCENT_LIGHTEN);
        Self {
            primary,
            accent: normalize(accent, derived),
        }
    }

    /// Resolve the colors of a check-in identity.
    pub fn for_identity(identity: &CheckinIdentity, fallback_primary: Rgb) -> Self {
        Self::resolve(
            identity.primary_color.as_deref(),
            identity.accent_color.as_deref(),
            fallback_primary,
        )
    }
}

#[cfg(test)]
#[path = "../tests/unit/theme/theme.rs"]
mod tests;
