// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed session persistence on top of a per-origin key-value store.
//!
//! The store holds a single session slot made of two keys. Writes always
//! touch both keys; reads only report a session when both keys are present
//! and the stored user is valid. Without a backend (no storage context) every
//! operation is a no-op.

use super::user::{Session, User};

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "auth_token";

/// Key holding the JSON-serialized user.
pub const USER_KEY: &str = "auth_user";

/// Per-origin string key-value store (browser storage, cookie jar, memory).
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: String);
    fn remove_item(&mut self, key: &str);
}

/// Session store adapter.
#[derive(Debug, Clone)]
pub struct SessionStore<K> {
    backend: Option<K>,
}

impl<K: KeyValueStore> SessionStore<K> {
    pub fn new(backend: K) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A store for contexts without persistent storage.
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend(&self) -> Option<&K> {
        self.backend.as_ref()
    }

    pub fn into_backend(self) -> Option<K> {
        self.backend
    }

    /// Persist user and token together.
    pub fn save(&mut self, session: &Session) {
        let Some(backend) = self.backend.as_mut() else {
            tracing::debug!("No session storage available, skipping save");
            return;
        };

        let user_json = match serde_json::to_string(&session.user) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize user, session not saved");
                return;
            }
        };

        backend.set_item(TOKEN_KEY, session.token.clone());
        backend.set_item(USER_KEY, user_json);
        tracing::debug!(user_id = %session.user.id, role = %session.user.role, "Session saved");
    }

    /// Read the persisted session, if both halves are present and valid.
    pub fn load_session(&self) -> Option<Session> {
        let backend = self.backend.as_ref()?;
        let token = backend.get_item(TOKEN_KEY)?;
        let raw_user = backend.get_item(USER_KEY)?;

        let user: User = match serde_json::from_str(&raw_user) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Stored user is corrupt, ignoring session");
                return None;
            }
        };

        Session::new(user, token)
            .map_err(|e| tracing::warn!(error = %e, "Stored session is invalid, ignoring"))
            .ok()
    }

    pub fn load_user(&self) -> Option<User> {
        self.load_session().map(|session| session.user)
    }

    pub fn load_token(&self) -> Option<String> {
        self.load_session().map(|session| session.token)
    }

    pub fn clear(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.remove_item(TOKEN_KEY);
            backend.remove_item(USER_KEY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::Role;
    use crate::store::InMemoryStore;

    fn session() -> Session {
        Session::new(
            User::new("s-1", "sam@campus.test", "Sam", Role::Student),
            "tok-1",
        )
        .unwrap()
    }

    #[test]
    fn save_then_load_returns_both_halves() {
        let mut store = SessionStore::new(InMemoryStore::new());
        store.save(&session());

        assert_eq!(store.load_user(), Some(session().user));
        assert_eq!(store.load_token(), Some("tok-1".to_string()));
    }

    #[test]
    fn user_present_iff_token_present() {
        let mut store = SessionStore::new(InMemoryStore::new());
        assert_eq!(store.load_user().is_some(), store.load_token().is_some());

        store.save(&session());
        assert_eq!(store.load_user().is_some(), store.load_token().is_some());

        // A half-written slot reads as empty on both sides.
        let mut backend = store.into_backend().unwrap();
        backend.remove_item(TOKEN_KEY);
        let store = SessionStore::new(backend);
        assert!(store.load_user().is_none());
        assert!(store.load_token().is_none());
    }

    #[test]
    fn corrupt_user_reads_as_absent() {
        let mut backend = InMemoryStore::new();
        backend.set_item(TOKEN_KEY, "tok".to_string());
        backend.set_item(USER_KEY, "{not json".to_string());

        let store = SessionStore::new(backend);
        assert!(store.load_session().is_none());
    }

    #[test]
    fn clear_removes_session() {
        let mut store = SessionStore::new(InMemoryStore::new());
        store.save(&session());
        store.clear();
        assert!(store.load_session().is_none());
    }

    #[test]
    fn unavailable_store_is_a_no_op() {
        let mut store: SessionStore<InMemoryStore> = SessionStore::unavailable();
        assert!(!store.is_available());
        store.save(&session());
        store.clear();
        assert!(store.load_user().is_none());
        assert!(store.load_token().is_none());
    }
}
