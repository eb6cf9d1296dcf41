// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor giving handlers a session manager for the current request.
//!
//! ```rust,ignore
//! async fn page(PortalSession(mut manager): PortalSession) -> impl IntoResponse {
//!     let user = manager.get_current_user();
//!     // ...
//! }
//! ```
//!
//! The store is this origin's cookie jar and the navigator starts at the
//! address the browser requested, rebuilt from the public origin and the
//! request path and query.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{RecordingNavigator, SessionManager, SessionStore};
use crate::state::AppState;
use crate::store::CookieStore;

pub type RequestManager = SessionManager<CookieStore, RecordingNavigator>;

pub struct PortalSession(pub RequestManager);

impl FromRequestParts<AppState> for PortalSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Only path and query come from the request; the origin is always ours.
        let mut current = state.config.public_url.clone();
        current.set_path(parts.uri.path());
        current.set_query(parts.uri.query());

        let cookies = CookieStore::from_headers(&parts.headers, state.config.secure_cookies());

        Ok(PortalSession(SessionManager::new(
            SessionStore::new(cookies),
            RecordingNavigator::new(current),
            state.resolver.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{handoff, Navigator, Role, User};
    use axum::http::{header::COOKIE, Request};
    use url::Url;

    fn parts(uri: &str, cookie: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn rebuilds_browser_address() {
        let state = AppState::default();
        let mut parts = parts("/courses?tab=2", None);

        let PortalSession(manager) = PortalSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        assert_eq!(
            manager.navigator().current_url().as_str(),
            "http://localhost:3000/courses?tab=2"
        );
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn double_slash_path_stays_on_own_origin() {
        let state = AppState::default();
        let mut parts = parts("//other.test/x?y=1", None);

        let PortalSession(manager) = PortalSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        let current = manager.navigator().current_url();
        assert_eq!(current.host_str(), Some("localhost"));
        assert_eq!(current.port(), Some(3000));
        assert_eq!(current.path(), "//other.test/x");
        assert_eq!(current.query(), Some("y=1"));
    }

    #[tokio::test]
    async fn reads_session_from_cookies() {
        let state = AppState::default();
        let user = serde_json::to_string(&User::new("7", "a@campus.test", "Ada", Role::Admin)).unwrap();
        let cookie = format!(
            "auth_token=tok; auth_user={}",
            urlencoding::encode(&user)
        );
        let mut parts = parts("/", Some(&cookie));

        let PortalSession(manager) = PortalSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        let session = manager.current_session().unwrap();
        assert_eq!(session.token, "tok");
        assert_eq!(session.user.role, Role::Admin);
    }

    #[tokio::test]
    async fn keeps_handoff_query_for_the_guard() {
        let state = AppState::default();
        let user = User::new("s-1", "s@campus.test", "Sam", Role::Student);
        let target =
            handoff::handoff_url(&Url::parse("http://localhost:3000/").unwrap(), &user, "t").unwrap();
        let mut parts = parts(&format!("/?{}", target.query().unwrap()), None);

        let PortalSession(mut manager) = PortalSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        assert_eq!(manager.get_current_user(), Some(user));
        assert!(manager.navigator().was_replaced());
    }
}
