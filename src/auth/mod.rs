// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Cross-origin session handoff shared by the campus portals.
//!
//! ## Auth Flow
//!
//! 1. The user signs in on the auth portal; credentials go to the external
//!    credential service (`credentials`)
//! 2. The session is stored for the auth origin and the user is sent to the
//!    portal of their role with `?auth=<payload>` (`handoff`, `origins`)
//! 3. The receiving portal's guard consumes the parameter, stores the
//!    session for its own origin and strips the address (`guard`)
//! 4. Later loads on that portal read the stored session
//!
//! ## Security
//!
//! - The bearer token is visible in the handoff URL until the receiving
//!   portal strips it
//! - Every incoming user record is validated before use
//! - Tokens and passwords are never logged

pub mod credentials;
pub mod error;
pub mod extractor;
pub mod guard;
pub mod handoff;
pub mod manager;
pub mod navigation;
pub mod origins;
pub mod roles;
pub mod session_store;
pub mod user;

pub use credentials::{CredentialVerifier, HttpCredentialClient, RequestFailure};
pub use error::AuthError;
pub use extractor::PortalSession;
pub use guard::{AuthView, GuardState, PortalGuard};
pub use handoff::{HandoffPayload, AUTH_QUERY_PARAM};
pub use manager::SessionManager;
pub use navigation::{Navigator, RecordingNavigator};
pub use origins::{Environment, OriginResolver, RoleOriginMap};
pub use roles::Role;
pub use session_store::{KeyValueStore, SessionStore};
pub use user::{Session, User};
