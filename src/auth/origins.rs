// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role-to-origin resolution.
//!
//! Every role owns one portal deployed on its own origin. The mapping is
//! chosen once from configuration ([`Environment`]) instead of being guessed
//! from the host a page happens to be served from.

use url::Url;

use super::roles::Role;

/// Deployment environment of the portal family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Everything on localhost ports
    #[default]
    Local,
    /// Pre-production; origins must be configured explicitly
    Staging,
    /// Public deployment
    Production,
}

impl Environment {
    /// Parse environment from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Environment> {
        match s.trim().to_lowercase().as_str() {
            "local" | "development" | "dev" => Some(Environment::Local),
            "staging" => Some(Environment::Staging),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Base URLs of the four applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOriginMap {
    /// Login application, also the fallback for unknown roles
    pub auth: Url,
    pub admin: Url,
    pub student: Url,
    pub teacher: Url,
}

impl RoleOriginMap {
    /// Localhost ports used during development.
    pub fn local() -> Self {
        Self {
            auth: fixed("http://localhost:3000"),
            admin: fixed("http://localhost:3001"),
            student: fixed("http://localhost:3003"),
            teacher: fixed("http://localhost:3002"),
        }
    }

    /// Public deployment origins.
    pub fn production() -> Self {
        Self {
            auth: fixed("https://campus-master-po-auth.vercel.app"),
            admin: fixed("https://campus-master-po-admin.vercel.app"),
            student: fixed("https://campus-master-po-student-portal.vercel.app"),
            teacher: fixed("https://campus-master-po-teacher-portal.vercel.app"),
        }
    }

    /// Preset for an environment, if it has one.
    pub fn preset(environment: Environment) -> Option<Self> {
        match environment {
            Environment::Local => Some(Self::local()),
            Environment::Production => Some(Self::production()),
            Environment::Staging => None,
        }
    }
}

/// Maps role identifiers to the origin of the application that serves them.
#[derive(Debug, Clone)]
pub struct OriginResolver {
    environment: Environment,
    origins: RoleOriginMap,
}

impl OriginResolver {
    pub fn new(environment: Environment, origins: RoleOriginMap) -> Self {
        Self {
            environment,
            origins,
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn origins(&self) -> &RoleOriginMap {
        &self.origins
    }

    /// Resolve a raw role identifier.
    ///
    /// Casing is ignored. Unknown or empty identifiers fall back to the
    /// default (login) origin.
    pub fn resolve(&self, role: &str) -> &Url {
        match Role::from_str(role) {
            Some(role) => self.resolve_role(role),
            None => self.default_origin(),
        }
    }

    /// Resolve a canonical role.
    pub fn resolve_role(&self, role: Role) -> &Url {
        match role {
            Role::Admin => &self.origins.admin,
            Role::Student => &self.origins.student,
            Role::Professor => &self.origins.teacher,
        }
    }

    /// Origin of the login application.
    pub fn default_origin(&self) -> &Url {
        &self.origins.auth
    }
}

// Only used for the compiled-in presets above.
fn fixed(raw: &str) -> Url {
    Url::parse(raw).expect("built-in origin is a valid URL")
}
