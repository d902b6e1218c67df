//! Check-in payload construction and QR matrix generation.

mod matrix;
mod payload;

pub use matrix::{EccLevel, MIN_MODULE_COUNT, QrMatrix};
pub use payload::{CHECKIN_PATH, checkin_url, validate_origin, validate_token};
