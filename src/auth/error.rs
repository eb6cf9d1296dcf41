// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message shown for a rejected email/password pair.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Fallback message for a 400 response without a body message.
pub const INVALID_DATA_MESSAGE: &str = "Invalid data";

/// Fallback message when neither the service nor the transport explains a failure.
pub const LOGIN_FAILED_MESSAGE: &str = "An error occurred while signing in";

/// Authentication error type.
///
/// Only the login variants reach callers as failures. Handoff and storage
/// problems are logged and then treated as "no session".
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The credential service rejected the email/password pair (401)
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    /// The credential service rejected the request body (400)
    #[error("{0}")]
    Validation(String),

    /// Transport failure or any other non-success answer
    #[error("{0}")]
    RequestFailed(String),

    /// The `auth` query parameter could not be turned into a session
    #[error("Invalid handoff payload: {0}")]
    HandoffDecodeFailed(String),

    /// A session could not be serialized
    #[error("Failed to encode session: {0}")]
    Encoding(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Validation(_) => "validation_error",
            AuthError::RequestFailed(_) => "auth_request_failed",
            AuthError::HandoffDecodeFailed(_) => "handoff_decode_failed",
            AuthError::Encoding(_) => "encoding_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Validation(_) | AuthError::HandoffDecodeFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::RequestFailed(_) => StatusCode::BAD_GATEWAY,
            AuthError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn invalid_credentials_returns_401() {
        let response = AuthError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "invalid_credentials");
        assert_eq!(body["error"], INVALID_CREDENTIALS_MESSAGE);
    }

    #[test]
    fn validation_carries_service_message() {
        let err = AuthError::Validation("email is required".to_string());
        assert_eq!(err.to_string(), "email is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn request_failure_maps_to_bad_gateway() {
        let err = AuthError::RequestFailed("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_code(), "auth_request_failed");
    }
}
