// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Campus Portal - role-segregated portals with cross-origin session handoff
//!
//! Each role (admin, student, teacher) has its own application on its own
//! origin, plus a shared login application. A session established on one
//! origin travels to another as a one-time `auth` query parameter, is stored
//! for the receiving origin and stripped from the address.
//!
//! ## Modules
//!
//! - `api` - HTTP routes (Axum): page guard, login, logout, health
//! - `auth` - Session handoff, storage, role routing and the page guard
//! - `config` - Environment-driven configuration
//! - `store` - Key-value backends (cookie jar, in-memory)

pub mod api;
pub mod auth;
pub mod config;
pub mod state;
pub mod store;
