use std::fmt;

pub use kurbo::{Affine, BezPath, Point, Rect};

/// Opaque identifier of a physical check-in site.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub String);

impl LocationId {
    /// Wrap any string-like identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of everything the engine needs to render one location's check-in artifact.
///
/// Colors and logo are owned by external settings flows; the engine only reads them.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CheckinIdentity {
    /// Site the token authorizes check-ins for.
    pub location_id: LocationId,
    /// Current secret token. Sole credential of the public check-in URL.
    pub checkin_token: String,
    /// Human-readable site name, used for the monogram and export filenames.
    pub display_name: String,
    /// Optional fetchable raster logo (URL or filesystem path).
    #[serde(default)]
    pub logo_resource: Option<String>,
    /// Primary brand color, hex or `"H S% L%"`.
    #[serde(default)]
    pub primary_color: Option<String>,
    /// Accent color; derived from the primary when absent.
    #[serde(default)]
    pub accent_color: Option<String>,
}

impl CheckinIdentity {
    /// Identity with no branding configured.
    pub fn new(
        location_id: LocationId,
        checkin_token: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            location_id,
            checkin_token: checkin_token.into(),
            display_name: display_name.into(),
            logo_resource: None,
            primary_color: None,
            accent_color: None,
        }
    }

    /// Same identity with a different token (after rotation).
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            checkin_token: token.into(),
            ..self.clone()
        }
    }
}

// The token is a credential; keep it out of logs and panic messages.
impl fmt::Debug for CheckinIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckinIdentity")
            .field("location_id", &self.location_id)
            .field("checkin_token", &"<redacted>")
            .field("display_name", &self.display_name)
            .field("logo_resource", &self.logo_resource)
            .field("primary_color", &self.primary_color)
            .field("accent_color", &self.accent_color)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
