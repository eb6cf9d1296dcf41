// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-portal page guard.
//!
//! ```text
//! CHECKING ──no user──────────────▶ REDIRECTING (login origin)
//!    │     ──role ≠ portal role───▶ REDIRECTING (user's own portal)
//!    └─────role = portal role─────▶ AUTHORIZED
//! ```
//!
//! The handoff is consumed synchronously inside the check, before anything
//! reads the session, so no settle delay is needed.

use serde::Serialize;
use url::Url;
use utoipa::ToSchema;

use super::manager::SessionManager;
use super::navigation::Navigator;
use super::roles::Role;
use super::session_store::KeyValueStore;
use super::user::User;

/// Guard progress for one page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Authorized(User),
    /// A full navigation to this address has been issued
    Redirecting(Url),
}

impl GuardState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GuardState::Checking)
    }
}

/// What hosting components receive. They render from this and never decide
/// role policy themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthView {
    pub user: Option<User>,
    pub is_authorized: bool,
    pub loading: bool,
}

impl From<&GuardState> for AuthView {
    fn from(state: &GuardState) -> Self {
        match state {
            GuardState::Checking => Self {
                user: None,
                is_authorized: false,
                loading: true,
            },
            GuardState::Authorized(user) => Self {
                user: Some(user.clone()),
                is_authorized: true,
                loading: false,
            },
            // The page is going away; keep showing the loading state.
            GuardState::Redirecting(_) => Self {
                user: None,
                is_authorized: false,
                loading: true,
            },
        }
    }
}

/// Guard for a portal reserved to one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortalGuard {
    expected: Role,
}

impl PortalGuard {
    pub fn new(expected: Role) -> Self {
        Self { expected }
    }

    pub fn expected_role(&self) -> Role {
        self.expected
    }

    /// Run the check. Always returns a terminal state.
    pub fn check<K, N>(&self, manager: &mut SessionManager<K, N>) -> GuardState
    where
        K: KeyValueStore,
        N: Navigator,
    {
        let Some(user) = manager.get_current_user() else {
            tracing::info!(portal = %self.expected, "No session, redirecting to login");
            return GuardState::Redirecting(manager.redirect_to_login());
        };

        if user.role != self.expected {
            tracing::info!(
                portal = %self.expected,
                role = %user.role,
                user_id = %user.id,
                "User belongs to another portal, redirecting"
            );
            let target = match manager.redirect_to_role_app(user.role.as_str()) {
                Ok(Some(target)) => target,
                Ok(None) => manager.redirect_to_origin(user.role),
                Err(e) => {
                    tracing::warn!(error = %e, "Could not carry session to role portal");
                    manager.redirect_to_origin(user.role)
                }
            };
            return GuardState::Redirecting(target);
        }

        tracing::debug!(portal = %self.expected, user_id = %user.id, "User authorized");
        GuardState::Authorized(user)
    }
}
