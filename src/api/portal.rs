// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Portal page, login and logout handlers.
//!
//! Navigation recorded by the session manager becomes a `303 See Other`
//! redirect; session writes become `Set-Cookie` headers on the same response.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{
    error::INVALID_DATA_MESSAGE, extractor::RequestManager, handoff, AuthError, AuthView,
    GuardState, Navigator, PortalGuard, PortalSession, SessionStore,
};
use crate::state::AppState;
use crate::store::CookieStore;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Keeps the password out of logs.
impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedirectResponse {
    /// Address the client should navigate to
    pub redirect: String,
}

/// Turn what the manager did into a response.
///
/// A full navigation wins over an in-place address rewrite; with neither,
/// `body` is returned as is.
fn respond(manager: RequestManager, body: impl IntoResponse) -> Response {
    let (store, navigator) = manager.into_parts();

    let mut response = if let Some(target) = navigator.navigation() {
        Redirect::to(target.as_str()).into_response()
    } else if navigator.was_replaced() {
        Redirect::to(navigator.current_url().path()).into_response()
    } else {
        body.into_response()
    };

    set_cookies(&store, &mut response);
    response
}

fn set_cookies(store: &SessionStore<CookieStore>, response: &mut Response) {
    if let Some(cookies) = store.backend() {
        cookies.write_to(response.headers_mut());
    }
}

/// Page entry point.
///
/// Role portals run the guard. The auth portal forwards a signed-in user to
/// their own portal and otherwise reports that the login form is needed.
#[utoipa::path(
    get,
    path = "/",
    tag = "Portal",
    responses(
        (status = 200, description = "Session state for rendering", body = AuthView),
        (status = 303, description = "Redirect to another portal, the login portal or the stripped address")
    )
)]
pub async fn page(
    State(state): State<AppState>,
    PortalSession(mut manager): PortalSession,
) -> Response {
    let view = match state.config.portal.expected_role() {
        Some(role) => {
            let outcome = PortalGuard::new(role).check(&mut manager);
            AuthView::from(&outcome)
        }
        None => match manager.get_current_user() {
            Some(user) => {
                if let Err(e) = manager.redirect_to_role_app(user.role.as_str()) {
                    tracing::warn!(error = %e, "Could not forward signed-in user");
                    manager.redirect_to_origin(user.role);
                }
                AuthView::from(&GuardState::Checking)
            }
            None => AuthView {
                user: None,
                is_authorized: false,
                loading: false,
            },
        },
    };

    respond(manager, Json(view))
}

/// Sign in against the credential service.
///
/// On success the response names the user's portal with the session attached
/// as a handoff. The login origin itself keeps no session.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Portal",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = RedirectResponse),
        (status = 400, description = "Rejected request data"),
        (status = 401, description = "Invalid email or password"),
        (status = 502, description = "Credential service failure")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    PortalSession(manager): PortalSession,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AuthError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected login body");
        AuthError::Validation(INVALID_DATA_MESSAGE.to_string())
    })?;
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AuthError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let session = manager
        .login(
            state.credentials.as_ref(),
            &state.config.login_endpoint,
            &request,
        )
        .await?;

    // Nothing is stored for the login origin; the session lives on the role
    // portal only.
    let origin = manager.resolver().resolve_role(session.user.role);
    let target = handoff::handoff_url(origin, &session.user, &session.token)?;

    tracing::info!(
        role = %session.user.role,
        destination = %target.origin().ascii_serialization(),
        "Sending signed-in user to role portal"
    );

    // The client navigates itself; answer with JSON rather than a redirect.
    Ok(Json(RedirectResponse {
        redirect: target.to_string(),
    })
    .into_response())
}

/// Forget the session for this origin.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Portal",
    responses(
        (status = 200, description = "Signed out", body = RedirectResponse)
    )
)]
pub async fn logout(PortalSession(mut manager): PortalSession) -> Response {
    manager.logout();
    let target = manager.resolver().default_origin().to_string();

    let (store, _) = manager.into_parts();
    let mut response = Json(RedirectResponse { redirect: target }).into_response();
    set_cookies(&store, &mut response);
    response
}
