//! Circular renderer, surfaces and render-pass orchestration.

pub mod circular;
pub mod geometry;
pub mod session;
pub mod surface;

pub use circular::{CircularRenderer, DotLayout, LIGHT, LayoutStats};
pub use geometry::{CircularLayout, ModuleFate, QrGeometry};
pub use session::{CheckinRenderer, LogoOutcome, LogoState, RenderPass, RenderedQr};
pub use surface::RenderSurface;
