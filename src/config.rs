// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`PortalConfig`] assembled from them once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `PORTAL_ENV` | `local`, `staging` or `production` | `local` |
//! | `PORTAL_KIND` | Portal served by this process (`auth`, `admin`, `student`, `teacher`) | `auth` |
//! | `AUTH_APP_URL` | Login portal origin | Environment preset |
//! | `ADMIN_APP_URL` | Admin portal origin | Environment preset |
//! | `STUDENT_APP_URL` | Student portal origin | Environment preset |
//! | `TEACHER_APP_URL` | Teacher portal origin | Environment preset |
//! | `PUBLIC_URL` | Origin this process is reached at | Origin of `PORTAL_KIND` |
//! | `CREDENTIAL_API_URL` | Credential service base URL | `http://localhost:8080` |
//! | `LOGIN_ENDPOINT` | Login path on the credential service | `/api/auth/login` |
//! | `CREDENTIAL_TIMEOUT_SECS` | Credential service timeout | `10` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! Staging has no built-in origins: all four `*_APP_URL` variables are
//! required there.

use std::time::Duration;

use url::Url;

use crate::auth::{Environment, OriginResolver, Role, RoleOriginMap};

pub const PORTAL_ENV_ENV: &str = "PORTAL_ENV";
pub const PORTAL_KIND_ENV: &str = "PORTAL_KIND";
pub const AUTH_APP_URL_ENV: &str = "AUTH_APP_URL";
pub const ADMIN_APP_URL_ENV: &str = "ADMIN_APP_URL";
pub const STUDENT_APP_URL_ENV: &str = "STUDENT_APP_URL";
pub const TEACHER_APP_URL_ENV: &str = "TEACHER_APP_URL";
pub const PUBLIC_URL_ENV: &str = "PUBLIC_URL";
pub const CREDENTIAL_API_URL_ENV: &str = "CREDENTIAL_API_URL";
pub const LOGIN_ENDPOINT_ENV: &str = "LOGIN_ENDPOINT";
pub const CREDENTIAL_TIMEOUT_ENV: &str = "CREDENTIAL_TIMEOUT_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_CREDENTIAL_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const DEFAULT_CREDENTIAL_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an unsupported value `{value}`")]
    InvalidValue { name: &'static str, value: String },

    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("{0} is required in the staging environment")]
    MissingOrigin(&'static str),

    #[error("credential service client could not be built: {0}")]
    CredentialClient(String),
}

/// Which of the four applications this process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortalKind {
    /// Login application; no role restriction
    #[default]
    Auth,
    Admin,
    Student,
    Teacher,
}

impl PortalKind {
    pub fn from_str(s: &str) -> Option<PortalKind> {
        match s.trim().to_lowercase().as_str() {
            "auth" | "login" => Some(PortalKind::Auth),
            "admin" => Some(PortalKind::Admin),
            "student" => Some(PortalKind::Student),
            "teacher" | "professor" => Some(PortalKind::Teacher),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PortalKind::Auth => "auth",
            PortalKind::Admin => "admin",
            PortalKind::Student => "student",
            PortalKind::Teacher => "teacher",
        }
    }

    /// Role a user must hold to use this portal.
    pub fn expected_role(&self) -> Option<Role> {
        match self {
            PortalKind::Auth => None,
            PortalKind::Admin => Some(Role::Admin),
            PortalKind::Student => Some(Role::Student),
            PortalKind::Teacher => Some(Role::Professor),
        }
    }

    fn origin<'a>(&self, origins: &'a RoleOriginMap) -> &'a Url {
        match self {
            PortalKind::Auth => &origins.auth,
            PortalKind::Admin => &origins.admin,
            PortalKind::Student => &origins.student,
            PortalKind::Teacher => &origins.teacher,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Configuration of one portal process.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub environment: Environment,
    pub portal: PortalKind,
    pub origins: RoleOriginMap,
    pub public_url: Url,
    pub credential_api_url: String,
    pub login_endpoint: String,
    pub credential_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl PortalConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let environment = match var(PORTAL_ENV_ENV) {
            Some(raw) => Environment::from_str(&raw).ok_or(ConfigError::InvalidValue {
                name: PORTAL_ENV_ENV,
                value: raw,
            })?,
            None => Environment::default(),
        };

        let portal = match var(PORTAL_KIND_ENV) {
            Some(raw) => PortalKind::from_str(&raw).ok_or(ConfigError::InvalidValue {
                name: PORTAL_KIND_ENV,
                value: raw,
            })?,
            None => PortalKind::default(),
        };

        let preset = RoleOriginMap::preset(environment);

        let origins = RoleOriginMap {
            auth: origin(
                AUTH_APP_URL_ENV,
                var(AUTH_APP_URL_ENV),
                preset.as_ref().map(|m| m.auth.clone()),
            )?,
            admin: origin(
                ADMIN_APP_URL_ENV,
                var(ADMIN_APP_URL_ENV),
                preset.as_ref().map(|m| m.admin.clone()),
            )?,
            student: origin(
                STUDENT_APP_URL_ENV,
                var(STUDENT_APP_URL_ENV),
                preset.as_ref().map(|m| m.student.clone()),
            )?,
            teacher: origin(
                TEACHER_APP_URL_ENV,
                var(TEACHER_APP_URL_ENV),
                preset.as_ref().map(|m| m.teacher.clone()),
            )?,
        };

        let public_url = match var(PUBLIC_URL_ENV) {
            Some(raw) => parse_url(PUBLIC_URL_ENV, &raw)?,
            None => portal.origin(&origins).clone(),
        };

        let credential_timeout = match var(CREDENTIAL_TIMEOUT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue {
                    name: CREDENTIAL_TIMEOUT_ENV,
                    value: raw,
                })?,
            None => Duration::from_secs(DEFAULT_CREDENTIAL_TIMEOUT_SECS),
        };

        let port = match var(PORT_ENV) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let credential_api_url = match var(CREDENTIAL_API_URL_ENV) {
            Some(raw) => {
                parse_url(CREDENTIAL_API_URL_ENV, &raw)?;
                raw.trim().to_string()
            }
            None => DEFAULT_CREDENTIAL_API_URL.to_string(),
        };

        let log_format = match var(LOG_FORMAT_ENV).as_deref().map(str::to_lowercase).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            environment,
            portal,
            origins,
            public_url,
            credential_api_url,
            login_endpoint: var(LOGIN_ENDPOINT_ENV)
                .unwrap_or_else(|| DEFAULT_LOGIN_ENDPOINT.to_string()),
            credential_timeout,
            host: var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            log_format,
        })
    }

    pub fn resolver(&self) -> OriginResolver {
        OriginResolver::new(self.environment, self.origins.clone())
    }

    /// Cookies get the `Secure` attribute whenever the portal is served over HTTPS.
    pub fn secure_cookies(&self) -> bool {
        self.public_url.scheme() == "https"
    }
}

fn origin(
    name: &'static str,
    configured: Option<String>,
    preset: Option<Url>,
) -> Result<Url, ConfigError> {
    match configured {
        Some(raw) => parse_url(name, &raw),
        None => preset.ok_or(ConfigError::MissingOrigin(name)),
    }
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            name,
            reason: format!("unsupported scheme `{}`", url.scheme()),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<PortalConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PortalConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_to_local_auth_portal() {
        let config = load(&[]).unwrap();
        assert_eq!(config.environment, Environment::Local);
        assert_eq!(config.portal, PortalKind::Auth);
        assert_eq!(config.origins, RoleOriginMap::local());
        assert_eq!(config.public_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.login_endpoint, DEFAULT_LOGIN_ENDPOINT);
        assert!(!config.secure_cookies());
    }

    #[test]
    fn production_uses_preset_with_overrides() {
        let config = load(&[
            (PORTAL_ENV_ENV, "production"),
            (PORTAL_KIND_ENV, "teacher"),
            (STUDENT_APP_URL_ENV, "https://students.campus.test"),
        ])
        .unwrap();

        assert_eq!(config.origins.student.as_str(), "https://students.campus.test/");
        assert_eq!(config.origins.admin, RoleOriginMap::production().admin);
        assert_eq!(config.public_url, RoleOriginMap::production().teacher);
        assert_eq!(config.portal.expected_role(), Some(Role::Professor));
        assert!(config.secure_cookies());
    }

    #[test]
    fn staging_requires_every_origin() {
        let err = load(&[
            (PORTAL_ENV_ENV, "staging"),
            (AUTH_APP_URL_ENV, "https://auth.staging.test"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingOrigin(ADMIN_APP_URL_ENV)));

        let config = load(&[
            (PORTAL_ENV_ENV, "staging"),
            (AUTH_APP_URL_ENV, "https://auth.staging.test"),
            (ADMIN_APP_URL_ENV, "https://admin.staging.test"),
            (STUDENT_APP_URL_ENV, "https://student.staging.test"),
            (TEACHER_APP_URL_ENV, "https://teacher.staging.test"),
        ])
        .unwrap();
        assert_eq!(config.resolver().resolve("student").as_str(), "https://student.staging.test/");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[(PORTAL_ENV_ENV, "moon")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            load(&[(PORTAL_KIND_ENV, "janitor")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            load(&[(ADMIN_APP_URL_ENV, "ftp://admin.test")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            load(&[(CREDENTIAL_API_URL_ENV, "not a url")]),
            Err(ConfigError::InvalidUrl { name: CREDENTIAL_API_URL_ENV, .. })
        ));
        assert!(matches!(
            load(&[(PORT_ENV, "http")]),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn portal_kind_maps_to_roles() {
        assert_eq!(PortalKind::from_str("Admin"), Some(PortalKind::Admin));
        assert_eq!(PortalKind::from_str("professor"), Some(PortalKind::Teacher));
        assert_eq!(PortalKind::Auth.expected_role(), None);
        assert_eq!(PortalKind::Student.expected_role(), Some(Role::Student));
    }
}
