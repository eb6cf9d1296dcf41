// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential verification collaborator.
//!
//! The portals never check passwords themselves. Login posts the credentials
//! to an external service and only looks at the outcome:
//!
//! - 401 → [`AuthError::InvalidCredentials`]
//! - 400 → [`AuthError::Validation`] with the service's message
//! - anything else → [`AuthError::RequestFailed`] with the most specific
//!   message available

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::error::{AuthError, INVALID_DATA_MESSAGE, LOGIN_FAILED_MESSAGE};
use super::user::{Session, User};

/// Failed call to the credential service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFailure {
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// `message` field of the response body
    pub data_message: Option<String>,
    /// Transport-level description
    pub message: Option<String>,
}

impl RequestFailure {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn status(status: u16, data_message: Option<String>) -> Self {
        Self {
            status: Some(status),
            data_message,
            message: Some(format!("HTTP {status}")),
        }
    }
}

impl From<RequestFailure> for AuthError {
    fn from(failure: RequestFailure) -> Self {
        match failure.status {
            Some(401) => AuthError::InvalidCredentials,
            Some(400) => AuthError::Validation(
                failure
                    .data_message
                    .unwrap_or_else(|| INVALID_DATA_MESSAGE.to_string()),
            ),
            _ => AuthError::RequestFailed(
                failure
                    .data_message
                    .or(failure.message)
                    .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string()),
            ),
        }
    }
}

/// Remote service that verifies credentials and issues sessions.
pub trait CredentialVerifier: Send + Sync {
    /// POST `body` as JSON to `endpoint`, returning the decoded JSON answer.
    fn post_data(
        &self,
        endpoint: &str,
        body: &Value,
    ) -> impl Future<Output = Result<Value, RequestFailure>> + Send;
}

/// Successful login answer.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: User,
    #[serde(alias = "accessToken", alias = "access_token")]
    token: String,
}

/// Turn a login answer into a validated session.
pub fn session_from_response(response: Value) -> Result<Session, AuthError> {
    let parsed: LoginResponse = serde_json::from_value(response)
        .map_err(|e| AuthError::RequestFailed(format!("Unexpected login response: {e}")))?;

    Session::new(parsed.user, parsed.token)
        .map_err(|e| AuthError::RequestFailed(format!("Unexpected login response: {e}")))
}

/// HTTP implementation of [`CredentialVerifier`].
#[derive(Debug, Clone)]
pub struct HttpCredentialClient {
    base_url: String,
    http: Client,
}

impl HttpCredentialClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::RequestFailed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

impl CredentialVerifier for HttpCredentialClient {
    async fn post_data(&self, endpoint: &str, body: &Value) -> Result<Value, RequestFailure> {
        let url = self.endpoint_url(endpoint);

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| RequestFailure::transport(e.to_string()))?;

        let status = response.status();
        // Error bodies are not always JSON; a missing body only loses the message.
        let data: Option<Value> = response.json().await.ok();

        if status.is_success() {
            return data.ok_or_else(|| RequestFailure {
                status: Some(status.as_u16()),
                data_message: None,
                message: Some("Response body is not JSON".to_string()),
            });
        }

        tracing::debug!(status = status.as_u16(), endpoint, "Credential service rejected request");
        let data_message = data
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Err(RequestFailure::status(status.as_u16(), data_message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::Role;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    #[test]
    fn status_401_is_invalid_credentials() {
        let err: AuthError = RequestFailure::status(401, Some("nope".to_string())).into();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn status_400_uses_service_message_or_fallback() {
        let err: AuthError = RequestFailure::status(400, Some("email required".to_string())).into();
        assert!(matches!(err, AuthError::Validation(ref m) if m == "email required"));

        let err: AuthError = RequestFailure::status(400, None).into();
        assert!(matches!(err, AuthError::Validation(ref m) if m == INVALID_DATA_MESSAGE));
    }

    #[test]
    fn other_failures_prefer_most_specific_message() {
        let err: AuthError = RequestFailure::status(500, Some("db down".to_string())).into();
        assert!(matches!(err, AuthError::RequestFailed(ref m) if m == "db down"));

        let err: AuthError = RequestFailure::status(503, None).into();
        assert!(matches!(err, AuthError::RequestFailed(ref m) if m == "HTTP 503"));

        let err: AuthError = RequestFailure::transport("connection refused").into();
        assert!(matches!(err, AuthError::RequestFailed(ref m) if m == "connection refused"));

        let err: AuthError = RequestFailure::default().into();
        assert!(matches!(err, AuthError::RequestFailed(ref m) if m == LOGIN_FAILED_MESSAGE));
    }

    #[test]
    fn session_from_response_validates_shape() {
        let ok = session_from_response(json!({
            "user": {"id": 3, "email": "p@campus.test", "name": "P", "role": "professor"},
            "accessToken": "jwt"
        }))
        .unwrap();
        assert_eq!(ok.user.role, Role::Professor);
        assert_eq!(ok.token, "jwt");

        assert!(session_from_response(json!({"user": null, "token": "x"})).is_err());
        assert!(session_from_response(json!({
            "user": {"id": "1", "role": "admin"},
            "token": ""
        }))
        .is_err());
    }

    async fn spawn_stub() -> String {
        let app = Router::new()
            .route(
                "/api/auth/login",
                post(|Json(body): Json<Value>| async move {
                    match body["password"].as_str() {
                        Some("secret") => (
                            StatusCode::OK,
                            Json(json!({
                                "user": {"id": "s-1", "email": "s@campus.test", "name": "S", "role": "student"},
                                "token": "tok"
                            })),
                        ),
                        Some("") => (
                            StatusCode::BAD_REQUEST,
                            Json(json!({"message": "password is required"})),
                        ),
                        _ => (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad"}))),
                    }
                }),
            )
            .route("/broken", post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn http_client_returns_body_on_success() {
        let base = spawn_stub().await;
        let client = HttpCredentialClient::new(base, Duration::from_secs(5)).unwrap();

        let body = client
            .post_data("/api/auth/login", &json!({"email": "s@campus.test", "password": "secret"}))
            .await
            .unwrap();
        assert_eq!(body["token"], "tok");
    }

    #[tokio::test]
    async fn http_client_reports_status_and_message() {
        let base = spawn_stub().await;
        let client = HttpCredentialClient::new(base, Duration::from_secs(5)).unwrap();

        let failure = client
            .post_data("api/auth/login", &json!({"email": "s@campus.test", "password": ""}))
            .await
            .unwrap_err();
        assert_eq!(failure.status, Some(400));
        assert_eq!(failure.data_message.as_deref(), Some("password is required"));

        let failure = client
            .post_data("api/auth/login", &json!({"email": "s@campus.test", "password": "x"}))
            .await
            .unwrap_err();
        assert_eq!(failure.status, Some(401));

        let failure = client.post_data("/broken", &json!({})).await.unwrap_err();
        assert_eq!(failure.status, Some(500));
        assert!(failure.data_message.is_none());
    }
}
