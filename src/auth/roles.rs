// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles and their canonical form.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Campus roles.
///
/// Each role owns exactly one portal:
///
/// - `Admin` - administration portal
/// - `Student` - student portal
/// - `Professor` - teacher portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Campus administration staff
    Admin,
    /// Enrolled student
    Student,
    /// Teaching staff
    Professor,
}

impl Role {
    /// Parse role from string (case-insensitive, surrounding whitespace ignored).
    ///
    /// `teacher` is accepted as an alias of `professor`; both land on the
    /// teacher portal.
    pub fn from_str(s: &str) -> Option<Role> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "student" => Some(Role::Student),
            "professor" | "teacher" => Some(Role::Professor),
            _ => None,
        }
    }

    /// Canonical lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Professor => "professor",
        }
    }
}

/// Normalize a role identifier to its canonical string.
///
/// Unknown identifiers yield `None`. Applying it to its own output is a no-op.
pub fn normalize(role: &str) -> Option<&'static str> {
    Role::from_str(role).map(|r| r.as_str())
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Role::from_str(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown role `{raw}`")))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
