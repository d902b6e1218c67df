//! Branded circular check-in QR codes.
//!
//! A location's secret check-in token is turned into a public URL, encoded as a level-H QR
//! symbol and drawn as a disc of dots around the location's logo (or a generated monogram):
//!
//! - Resolve colors with [`Theme`]
//! - Render with a [`CheckinRenderer`] (or the lower level [`CircularRenderer`])
//! - Export the result with [`export_png`]
//! - Rotate tokens through a [`TokenLifecycle`] so displays re-render automatically
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod assets;
pub mod encode;
pub mod qr;
pub mod render;
pub mod theme;
pub mod token;

pub use crate::foundation::config::{
    ENV_APP_ORIGIN, ENV_SURFACE_SIZE, EngineConfig, MAX_SURFACE_SIZE, MIN_SURFACE_SIZE,
};
pub use crate::foundation::core::{Affine, BezPath, CheckinIdentity, LocationId, Point, Rect};
pub use crate::foundation::error::{CheckinError, CheckinResult};

pub use crate::assets::{LogoArt, LogoSource, ResourceLogoSource, StaticLogoSource};
pub use crate::encode::{ExportedRaster, export_png, sanitize_file_stem};
pub use crate::qr::{EccLevel, QrMatrix, checkin_url};
pub use crate::render::{
    CheckinRenderer, CircularLayout, CircularRenderer, LayoutStats, LogoOutcome, LogoState,
    QrGeometry, RenderPass, RenderSurface, RenderedQr,
};
pub use crate::theme::{Rgb, Theme};
pub use crate::token::{
    InMemoryTokenStore, TokenLifecycle, TokenRotated, TokenStore, generate_token,
};
