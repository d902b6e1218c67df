use std::{collections::HashMap, future::Future};

use tokio::sync::RwLock;

use crate::foundation::{
    core::LocationId,
    error::{CheckinError, CheckinResult},
};

/// Persistence of the one current check-in token per location.
///
/// `replace_token` must be atomic: once it returns `Ok`, the previous token no longer resolves
/// and the new one does, with no moment where both (or neither) resolve.
pub trait TokenStore: Send + Sync {
    /// Current token of `location`, if the location exists.
    fn current_token(
        &self,
        location: &LocationId,
    ) -> impl Future<Output = CheckinResult<Option<String>>> + Send;

    /// Atomically swap `location`'s token for `token`. Returns the previous token.
    fn replace_token(
        &self,
        location: &LocationId,
        token: &str,
    ) -> impl Future<Output = CheckinResult<String>> + Send;

    /// Location a presented token authorizes, if any.
    fn resolve(&self, token: &str) -> impl Future<Output = CheckinResult<Option<LocationId>>> + Send;
}

#[derive(Debug, Default)]
struct TokenIndex {
    by_location: HashMap<LocationId, String>,
    by_token: HashMap<String, LocationId>,
}

/// Process-local [`TokenStore`]. Both indexes are updated under one write lock.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    index: RwLock<TokenIndex>,
}

impl InMemoryTokenStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly created location with its initial token.
    pub async fn insert_location(&self, location: LocationId, token: &str) -> CheckinResult<()> {
        let mut idx = self.index.write().await;
        if idx.by_location.contains_key(&location) {
            return Err(CheckinError::persistence(format!(
                "location '{location}' already has a token"
            )));
        }
        if idx.by_token.contains_key(token) {
            return Err(CheckinError::persistence("token already in use"));
        }
        idx.by_token.insert(token.to_string(), location.clone());
        idx.by_location.insert(location, token.to_string());
        Ok(())
    }

    /// Number of locations with a token.
    pub async fn len(&self) -> usize {
        self.index.read().await.by_location.len()
    }

    /// Whether no location has been registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl TokenStore for InMemoryTokenStore {
    async fn current_token(&self, location: &LocationId) -> CheckinResult<Option<String>> {
        Ok(self.index.read().await.by_location.get(location).cloned())
    }

    async fn replace_token(&self, location: &LocationId, token: &str) -> CheckinResult<String> {
        let mut idx = self.index.write().await;
        if idx.by_token.contains_key(token) {
            return Err(CheckinError::persistence("token already in use"));
        }
        let Some(previous) = idx.by_location.get(location).cloned() else {
            return Err(CheckinError::persistence(format!(
                "unknown location '{location}'"
            )));
        };
        idx.by_token.remove(&previous);
        idx.by_token.insert(token.to_string(), location.clone());
        idx.by_location.insert(location.clone(), token.to_string());
        Ok(previous)
    }

    async fn resolve(&self, token: &str) -> CheckinResult<Option<LocationId>> {
        Ok(self.index.read().await.by_token.get(token).cloned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/token/store.rs"]
mod tests;
