// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key-value backends for the session store.
//!
//! - [`InMemoryStore`] keeps values in a map (tests, embedding).
//! - [`CookieStore`] is the per-origin store of the HTTP host: the browser's
//!   cookie jar for this portal's origin. Values are read from the request
//!   `Cookie` header; writes are collected as `Set-Cookie` headers for the
//!   response.

use std::collections::HashMap;

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

use crate::auth::KeyValueStore;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    items: HashMap<String, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.items.insert(key.to_string(), value);
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// Cookie jar of one request/response exchange.
#[derive(Debug, Clone, Default)]
pub struct CookieStore {
    values: HashMap<String, String>,
    pending: Vec<String>,
    secure: bool,
}

impl CookieStore {
    /// Read every `Cookie` header of a request.
    ///
    /// `secure` adds the `Secure` attribute to cookies written later.
    pub fn from_headers(headers: &HeaderMap, secure: bool) -> Self {
        let mut values = HashMap::new();

        for header in headers.get_all(COOKIE) {
            let Ok(raw) = header.to_str() else {
                continue;
            };
            for pair in raw.split(';') {
                let Some((name, value)) = pair.trim().split_once('=') else {
                    continue;
                };
                match urlencoding::decode(value.trim()) {
                    Ok(decoded) => {
                        values.insert(name.trim().to_string(), decoded.into_owned());
                    }
                    Err(_) => {
                        tracing::debug!(cookie = name.trim(), "Skipping cookie with invalid encoding");
                    }
                }
            }
        }

        Self {
            values,
            pending: Vec::new(),
            secure,
        }
    }

    /// `Set-Cookie` values produced by writes, in order.
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Append the pending `Set-Cookie` headers to a response.
    pub fn write_to(&self, headers: &mut HeaderMap) {
        for cookie in &self.pending {
            match HeaderValue::from_str(cookie) {
                Ok(value) => {
                    headers.append(SET_COOKIE, value);
                }
                Err(e) => tracing::warn!(error = %e, "Dropping unrepresentable cookie"),
            }
        }
    }

    fn attributes(&self) -> &'static str {
        if self.secure {
            "Path=/; HttpOnly; SameSite=Lax; Secure"
        } else {
            "Path=/; HttpOnly; SameSite=Lax"
        }
    }
}

impl KeyValueStore for CookieStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.pending.push(format!(
            "{key}={}; {}",
            urlencoding::encode(&value),
            self.attributes()
        ));
        self.values.insert(key.to_string(), value);
    }

    fn remove_item(&mut self, key: &str) {
        self.pending
            .push(format!("{key}=; Max-Age=0; {}", self.attributes()));
        self.values.remove(key);
    }
}
