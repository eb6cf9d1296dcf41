// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cross-origin session handoff.
//!
//! ## Wire format
//!
//! The session travels as a single query parameter:
//!
//! ```text
//! https://student.example/?auth=<encodeURIComponent(JSON.stringify({user, token}))>
//! ```
//!
//! The receiving portal reads it once: the session is persisted in the local
//! store first, then the parameter is removed from the address so it does not
//! survive in history or get shared by copy/paste.
//!
//! Decoding never fails loudly. This runs on every page load, so a bad value
//! is logged and treated as "no handoff".

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::AuthError;
use super::navigation::Navigator;
use super::session_store::{KeyValueStore, SessionStore};
use super::user::{Session, User};

/// Query parameter carrying the handoff payload.
pub const AUTH_QUERY_PARAM: &str = "auth";

/// The handoff payload is a session in transit.
pub type HandoffPayload = Session;

/// Shapes accepted on the wire.
///
/// Older senders put the user fields and the token at the top level.
#[derive(Deserialize)]
#[serde(untagged)]
enum WirePayload {
    Nested {
        user: User,
        token: String,
    },
    Flat {
        #[serde(flatten)]
        user: User,
        token: String,
    },
}

#[derive(Serialize)]
struct OutgoingPayload<'a> {
    user: &'a User,
    token: &'a str,
}

/// Encode a session as a query parameter value.
pub fn encode(user: &User, token: &str) -> Result<String, AuthError> {
    let json = serde_json::to_string(&OutgoingPayload { user, token })
        .map_err(|e| AuthError::Encoding(e.to_string()))?;

    Ok(urlencoding::encode(&json).into_owned())
}

/// Build `origin?auth=<payload>`.
pub fn handoff_url(origin: &Url, user: &User, token: &str) -> Result<Url, AuthError> {
    let encoded = encode(user, token)?;
    let mut url = origin.clone();
    url.set_query(Some(&format!("{AUTH_QUERY_PARAM}={encoded}")));
    Ok(url)
}

/// Extract a handoff payload from `url` without side effects.
pub fn decode(url: &Url) -> Option<HandoffPayload> {
    let raw = url
        .query_pairs()
        .find(|(key, _)| key == AUTH_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())?;

    match parse_payload(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!(error = %e, path = url.path(), "Ignoring malformed auth parameter");
            None
        }
    }
}

/// Decode, persist, then strip the parameter from the address.
///
/// Persisting happens before the address is rewritten so a failed rewrite
/// can never lose the session.
pub fn consume<K, N>(store: &mut SessionStore<K>, navigator: &mut N) -> Option<HandoffPayload>
where
    K: KeyValueStore,
    N: Navigator,
{
    let session = decode(navigator.current_url())?;

    store.save(&session);

    let path = navigator.current_url().path().to_string();
    navigator.replace_url(&path);

    tracing::info!(
        user_id = %session.user.id,
        role = %session.user.role,
        "Session received through handoff"
    );
    Some(session)
}

fn parse_payload(raw: &str) -> Result<Session, AuthError> {
    // Query decoding already undid one layer; senders that encoded twice
    // leave another.
    let json = if raw.trim_start().starts_with('{') {
        raw.to_string()
    } else {
        urlencoding::decode(raw)
            .map_err(|e| AuthError::HandoffDecodeFailed(e.to_string()))?
            .into_owned()
    };

    let wire: WirePayload = serde_json::from_str(&json)
        .map_err(|e| AuthError::HandoffDecodeFailed(e.to_string()))?;

    let (user, token) = match wire {
        WirePayload::Nested { user, token } => (user, token),
        WirePayload::Flat { user, token } => (user, token),
    };

    Session::new(user, token)
}
