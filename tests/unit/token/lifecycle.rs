use std::collections::HashSet;

use super::*;
use crate::{
    foundation::error::CheckinError,
    token::store::InMemoryTokenStore,
};

struct FailingStore {
    inner: InMemoryTokenStore,
}

impl TokenStore for FailingStore {
    async fn current_token(&self, location: &LocationId) -> CheckinResult<Option<String>> {
        self.inner.current_token(location).await
    }

    async fn replace_token(&self, _location: &LocationId, _token: &str) -> CheckinResult<String> {
        Err(CheckinError::persistence("database unavailable"))
    }

    async fn resolve(&self, token: &str) -> CheckinResult<Option<LocationId>> {
        self.inner.resolve(token).await
    }
}

#[test]
fn generated_tokens_are_url_safe_and_unique() {
    let mut seen = HashSet::new();
    for _ in 0..1000 {
        let t = generate_token();
        assert_eq!(t.len(), TOKEN_LENGTH);
        assert!(t.chars().all(|c| c.is_ascii_alphanumeric()));
        crate::qr::validate_token(&t).unwrap();
        assert!(seen.insert(t));
    }
}

#[test]
fn rotated_event_debug_redacts_token() {
    let ev = TokenRotated {
        location_id: LocationId::new("a"),
        token: "supersecret".to_string(),
    };
    assert!(!format!("{ev:?}").contains("supersecret"));
}

#[tokio::test]
async fn regenerate_replaces_and_invalidates_previous() {
    let store = Arc::new(InMemoryTokenStore::new());
    let loc = LocationId::new("dojo");
    store.insert_location(loc.clone(), "default-token").await.unwrap();
    let lifecycle = TokenLifecycle::new(Arc::clone(&store));

    let mut previous = "default-token".to_string();
    for _ in 0..1000 {
        let next = lifecycle.regenerate(&loc).await.unwrap();
        assert_ne!(next, previous);
        assert_eq!(store.resolve(&previous).await.unwrap(), None);
        assert_eq!(store.resolve(&next).await.unwrap(), Some(loc.clone()));
        previous = next;
    }
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn regenerate_emits_rotation_event() {
    let store = Arc::new(InMemoryTokenStore::new());
    let loc = LocationId::new("dojo");
    store.insert_location(loc.clone(), "t0").await.unwrap();
    let lifecycle = TokenLifecycle::new(store);
    let mut rx = lifecycle.subscribe();

    let token = lifecycle.regenerate(&loc).await.unwrap();
    let ev = rx.recv().await.unwrap();
    assert_eq!(ev.location_id, loc);
    assert_eq!(ev.token, token);
}

#[tokio::test]
async fn persistence_failure_keeps_previous_token_and_emits_nothing() {
    let inner = InMemoryTokenStore::new();
    let loc = LocationId::new("dojo");
    inner.insert_location(loc.clone(), "keep-me").await.unwrap();
    let lifecycle = TokenLifecycle::new(Arc::new(FailingStore { inner }));
    let mut rx = lifecycle.subscribe();

    let err = lifecycle.regenerate(&loc).await.unwrap_err();
    assert!(matches!(err, CheckinError::Persistence(_)));
    assert_eq!(
        lifecycle.store().resolve("keep-me").await.unwrap(),
        Some(loc.clone())
    );
    assert!(matches!(
        rx.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    ));
}

#[tokio::test]
async fn unknown_location_is_reported() {
    let lifecycle = TokenLifecycle::new(Arc::new(InMemoryTokenStore::new()));
    assert!(lifecycle.regenerate(&LocationId::new("nope")).await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_rotations_leave_exactly_one_valid_token() {
    let store = Arc::new(InMemoryTokenStore::new());
    let loc = LocationId::new("dojo");
    store.insert_location(loc.clone(), "t0").await.unwrap();
    let lifecycle = TokenLifecycle::new(Arc::clone(&store));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let lc = lifecycle.clone();
        let loc = loc.clone();
        handles.push(tokio::spawn(async move { lc.regenerate(&loc).await.unwrap() }));
    }
    let mut issued = Vec::new();
    for h in handles {
        issued.push(h.await.unwrap());
    }

    let current = store.current_token(&loc).await.unwrap().unwrap();
    let mut valid = 0;
    for t in issued.iter().chain(std::iter::once(&"t0".to_string())) {
        if store.resolve(t).await.unwrap().is_some() {
            valid += 1;
            assert_eq!(t, &current);
        }
    }
    assert_eq!(valid, 1);
}
