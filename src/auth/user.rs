// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Users and sessions as they cross portal boundaries.
//!
//! Every value arriving from outside (login response, `auth` parameter,
//! stored cookie) is deserialized into these types and then checked with
//! [`User::validate`] / [`Session::new`] before anything trusts it.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::error::AuthError;
use super::roles::Role;

/// Identity record issued by the credential service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Opaque user identifier
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Login email
    #[serde(default)]
    pub email: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Canonical role
    pub role: Role,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            role,
        }
    }

    /// Reject records that deserialized but cannot identify anyone.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.id.trim().is_empty() {
            return Err(AuthError::HandoffDecodeFailed("user id is empty".to_string()));
        }
        Ok(())
    }
}

/// An authenticated user together with their bearer token.
///
/// A session never exists without both halves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>) -> Result<Self, AuthError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AuthError::HandoffDecodeFailed("token is empty".to_string()));
        }
        user.validate()?;
        Ok(Self { user, token })
    }
}

/// Accept `"42"` and `42` alike for identifiers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new("u-1", "ada@campus.test", "Ada Lovelace", Role::Admin)
    }

    #[test]
    fn session_requires_token() {
        assert!(Session::new(sample_user(), "").is_err());
        assert!(Session::new(sample_user(), "   ").is_err());

        let session = Session::new(sample_user(), "t1").unwrap();
        assert_eq!(session.token, "t1");
    }

    #[test]
    fn session_requires_user_id() {
        let user = User::new("", "x@campus.test", "X", Role::Student);
        assert!(Session::new(user, "t1").is_err());
    }

    #[test]
    fn deserializes_numeric_id_and_mixed_case_role() {
        let user: User = serde_json::from_str(
            r#"{"id": 42, "email": "p@campus.test", "name": "Prof", "role": "Professor"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "42");
        assert_eq!(user.role, Role::Professor);
    }

    #[test]
    fn missing_display_fields_default_to_empty() {
        let user: User = serde_json::from_str(r#"{"id": "7", "role": "student"}"#).unwrap();
        assert_eq!(user.email, "");
        assert_eq!(user.name, "");
    }

    #[test]
    fn rejects_unknown_role() {
        let parsed = serde_json::from_str::<User>(r#"{"id": "7", "role": "guest"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn serializes_canonical_role() {
        let user = User::new("9", "s@campus.test", "Sam", Role::Student);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "student");
        assert_eq!(json["id"], "9");
    }
}
