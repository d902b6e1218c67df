//! Check-in token rotation and persistence.

mod lifecycle;
mod store;

pub use lifecycle::{TOKEN_LENGTH, TokenLifecycle, TokenRotated, generate_token};
pub use store::{InMemoryTokenStore, TokenStore};
