use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::error::{CheckinError, CheckinResult},
    qr::validate_origin,
    render::geometry::QrGeometry,
    theme::{DEFAULT_PRIMARY, Rgb},
};

/// Env var overriding [`EngineConfig::app_origin`].
pub const ENV_APP_ORIGIN: &str = "CHECKIN_APP_ORIGIN";
/// Env var overriding [`EngineConfig::surface_size`].
pub const ENV_SURFACE_SIZE: &str = "CHECKIN_SURFACE_SIZE";

/// Smallest accepted surface side. Below this the dots get too small to resolve.
pub const MIN_SURFACE_SIZE: u32 = 256;
/// Largest accepted surface side.
pub const MAX_SURFACE_SIZE: u32 = 4096;

/// Engine-wide settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Origin the check-in URL is rooted at, e.g. `https://dojo.example.com`.
    pub app_origin: String,
    /// Side of the square output raster in pixels.
    pub surface_size: u32,
    /// Coupled renderer geometry.
    pub geometry: QrGeometry,
    /// Primary color used when a location has none (or an unparseable one).
    pub fallback_primary: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_origin: "http://localhost:3000".to_string(),
            surface_size: 600,
            geometry: QrGeometry::default(),
            fallback_primary: DEFAULT_PRIMARY.to_hex(),
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> CheckinResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .map_err(|e| CheckinError::serde(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `CHECKIN_APP_ORIGIN` / `CHECKIN_SURFACE_SIZE` when set.
    pub fn with_env_overrides(self) -> CheckinResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> CheckinResult<Self> {
        if let Some(origin) = lookup(ENV_APP_ORIGIN).filter(|v| !v.trim().is_empty()) {
            self.app_origin = origin.trim().to_string();
        }
        if let Some(size) = lookup(ENV_SURFACE_SIZE) {
            self.surface_size = size.trim().parse().map_err(|_| {
                CheckinError::validation(format!("{ENV_SURFACE_SIZE} is not a number: '{size}'"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check origin, surface bounds and geometry.
    pub fn validate(&self) -> CheckinResult<()> {
        validate_origin(self.app_origin.trim().trim_end_matches('/'))?;
        if !(MIN_SURFACE_SIZE..=MAX_SURFACE_SIZE).contains(&self.surface_size) {
            return Err(CheckinError::validation(format!(
                "surface_size must be in {MIN_SURFACE_SIZE}..={MAX_SURFACE_SIZE}, got {}",
                self.surface_size
            )));
        }
        self.geometry.validate()
    }

    /// Parsed fallback primary; an invalid value degrades to the built-in default.
    pub fn fallback_primary(&self) -> Rgb {
        crate::theme::normalize(Some(self.fallback_primary.as_str()), DEFAULT_PRIMARY)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
