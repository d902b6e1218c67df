use std::{fmt, sync::Arc};

use rand::Rng;
use tokio::sync::broadcast;

use crate::{
    foundation::{core::LocationId, error::CheckinResult},
    token::store::TokenStore,
};

/// Length of generated tokens (alphanumeric, ~190 bits of entropy).
pub const TOKEN_LENGTH: usize = 32;

const EVENT_CAPACITY: usize = 64;

/// Generate a fresh check-in token from the thread-local CSPRNG.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Emitted after a successful rotation so dependent views can re-render.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenRotated {
    /// Location whose token changed.
    pub location_id: LocationId,
    /// The new token.
    pub token: String,
}

impl fmt::Debug for TokenRotated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRotated")
            .field("location_id", &self.location_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// The only sanctioned way to change a location's check-in token.
#[derive(Debug)]
pub struct TokenLifecycle<S> {
    store: Arc<S>,
    events: broadcast::Sender<TokenRotated>,
}

impl<S> Clone for TokenLifecycle<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            events: self.events.clone(),
        }
    }
}

impl<S: TokenStore> TokenLifecycle<S> {
    /// Lifecycle persisting through `store`.
    pub fn new(store: Arc<S>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { store, events }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Receive [`TokenRotated`] events.
    pub fn subscribe(&self) -> broadcast::Receiver<TokenRotated> {
        self.events.subscribe()
    }

    /// Replace `location`'s token with a new random one.
    ///
    /// On persistence failure the previous token stays authoritative and no event is emitted.
    #[tracing::instrument(skip(self), fields(location = %location))]
    pub async fn regenerate(&self, location: &LocationId) -> CheckinResult<String> {
        let token = generate_token();
        if let Err(err) = self.store.replace_token(location, &token).await {
            tracing::warn!(error = %err, "token rotation failed, previous token still valid");
            return Err(err);
        }

        tracing::info!("rotated check-in token");
        // No subscribers is fine.
        let _ = self.events.send(TokenRotated {
            location_id: location.clone(),
            token: token.clone(),
        });
        Ok(token)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/token/lifecycle.rs"]
mod tests;
