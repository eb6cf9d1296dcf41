// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session orchestration for one page load.
//!
//! A [`SessionManager`] is built per page load (per request in the HTTP
//! host) from an explicit store, navigator and resolver. Nothing is shared
//! through globals.

use serde::Serialize;
use url::Url;

use super::credentials::{session_from_response, CredentialVerifier};
use super::error::AuthError;
use super::handoff;
use super::navigation::Navigator;
use super::origins::OriginResolver;
use super::roles::Role;
use super::session_store::{KeyValueStore, SessionStore};
use super::user::{Session, User};

pub struct SessionManager<K, N> {
    store: SessionStore<K>,
    navigator: N,
    resolver: OriginResolver,
}

impl<K: KeyValueStore, N: Navigator> SessionManager<K, N> {
    pub fn new(store: SessionStore<K>, navigator: N, resolver: OriginResolver) -> Self {
        Self {
            store,
            navigator,
            resolver,
        }
    }

    pub fn resolver(&self) -> &OriginResolver {
        &self.resolver
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    pub fn store(&self) -> &SessionStore<K> {
        &self.store
    }

    /// Hand back the store and navigator so the caller can act on what
    /// happened (set cookies, issue redirects).
    pub fn into_parts(self) -> (SessionStore<K>, N) {
        (self.store, self.navigator)
    }

    /// Verify credentials with the remote service.
    ///
    /// The session is returned, not stored; call [`Self::save_session`] to
    /// remember it.
    pub async fn login<C, E>(
        &self,
        verifier: &C,
        endpoint: &str,
        credentials: &E,
    ) -> Result<Session, AuthError>
    where
        C: CredentialVerifier,
        E: Serialize + ?Sized,
    {
        let body = serde_json::to_value(credentials)
            .map_err(|e| AuthError::Validation(format!("Invalid credentials payload: {e}")))?;

        let response = match verifier.post_data(endpoint, &body).await {
            Ok(response) => response,
            Err(failure) => {
                tracing::warn!(
                    status = ?failure.status,
                    endpoint,
                    "Login rejected by credential service"
                );
                return Err(failure.into());
            }
        };

        let session = session_from_response(response)?;
        tracing::info!(user_id = %session.user.id, role = %session.user.role, "Login succeeded");
        Ok(session)
    }

    /// Persist a session in this origin's store.
    pub fn save_session(&mut self, session: &Session) {
        self.store.save(session);
    }

    /// Current user: a handoff on the address wins over the stored session.
    pub fn get_current_user(&mut self) -> Option<User> {
        if let Some(session) = handoff::consume(&mut self.store, &mut self.navigator) {
            return Some(session.user);
        }
        self.store.load_user()
    }

    /// Persisted session, if any.
    pub fn current_session(&self) -> Option<Session> {
        self.store.load_session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.load_token().is_some()
    }

    /// Whether the stored user holds `role`. Unknown role names never match.
    pub fn has_role(&self, role: &str) -> bool {
        match (Role::from_str(role), self.store.load_user()) {
            (Some(wanted), Some(user)) => user.role == wanted,
            _ => false,
        }
    }

    /// Forget the session. Navigation is left to the caller.
    pub fn logout(&mut self) {
        self.store.clear();
        tracing::info!("Session cleared");
    }

    /// Send the user to the portal for `role`, carrying the session along.
    ///
    /// Returns the address navigated to, or `None` when there is no storage
    /// context to read a session from.
    pub fn redirect_to_role_app(&mut self, role: &str) -> Result<Option<Url>, AuthError> {
        if !self.store.is_available() {
            tracing::debug!("No session storage available, not redirecting");
            return Ok(None);
        }

        let origin = self.resolver.resolve(role).clone();
        let target = match self.store.load_session() {
            Some(session) => handoff::handoff_url(&origin, &session.user, &session.token)?,
            None => origin,
        };

        tracing::info!(
            role,
            destination = %target.origin().ascii_serialization(),
            "Redirecting to role portal"
        );
        self.navigator.navigate_to(target.clone());
        Ok(Some(target))
    }

    /// Send the user to the bare origin of `role`'s portal.
    pub fn redirect_to_origin(&mut self, role: Role) -> Url {
        let target = self.resolver.resolve_role(role).clone();
        self.navigator.navigate_to(target.clone());
        target
    }

    /// Send the user to the login application.
    pub fn redirect_to_login(&mut self) -> Url {
        let target = self.resolver.default_origin().clone();
        self.navigator.navigate_to(target.clone());
        target
    }
}
