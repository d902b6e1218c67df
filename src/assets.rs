//! Logo loading, decoding and the synthetic monogram fallback.

pub mod decode;
pub mod logo;
pub mod source;
pub(crate) mod svg_raster;

pub use decode::{MAX_LOGO_SIDE, PreparedImage, decode_image, decode_logo};
pub use logo::{LogoArt, LogoCompositor, MONOGRAM_LIGHTEN, Monogram};
pub use source::{LogoSource, ResourceLogoSource, StaticLogoSource};
