// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{HttpCredentialClient, OriginResolver};
use crate::config::{ConfigError, PortalConfig};

/// Shared, read-only state of one portal process.
///
/// Nothing here is mutable: every request builds its own session manager
/// from its cookies.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
    pub resolver: OriginResolver,
    pub credentials: Arc<HttpCredentialClient>,
}

impl AppState {
    pub fn new(config: PortalConfig) -> Result<Self, ConfigError> {
        let credentials =
            HttpCredentialClient::new(config.credential_api_url.clone(), config.credential_timeout)
                .map_err(|e| ConfigError::CredentialClient(e.to_string()))?;

        Ok(Self {
            resolver: config.resolver(),
            config: Arc::new(config),
            credentials: Arc::new(credentials),
        })
    }
}

impl Default for AppState {
    /// Local auth portal with built-in defaults.
    fn default() -> Self {
        let config = PortalConfig::from_lookup(|_| None)
            .expect("built-in configuration is valid");
        Self::new(config).expect("default HTTP client builds")
    }
}
