//! Exporting rendered surfaces.

pub mod png;

pub use png::{ExportedRaster, FALLBACK_FILE_STEM, PNG_MIME, export_png, sanitize_file_stem};
