// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::Request,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{MakeSpan, TraceLayer},
};
use tracing::Span;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{AuthView, Role, User},
    state::AppState,
};

pub mod health;
pub mod portal;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(portal::page))
        .route("/{*path}", get(portal::page))
        .route("/login", post(portal::login))
        .route("/logout", post(portal::logout))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
        .layer(CorsLayer::permissive())
}

/// Request span carrying method and path. The query is left out: a handoff
/// query holds a bearer token.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path()
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        portal::page,
        portal::login,
        portal::logout,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            AuthView,
            User,
            Role,
            portal::LoginRequest,
            portal::RedirectResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Portal", description = "Page guard, login and logout"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
