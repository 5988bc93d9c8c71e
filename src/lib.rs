// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Att-Device-API - attendance device service with a sealed configuration
//!
//! The service will not start unless its `config.json` carries a valid
//! `validation` envelope: the configuration sealed with AES-256-CBC under a
//! one-time key, that key wrapped with RSA-OAEP under a local keypair.
//!
//! ## Modules
//!
//! - `gate` - KeyStore, Sealer, Unsealer, Bootstrapper and the boot gate
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - API key authentication
//! - `app` / `cli` - process wiring and command line

pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod logging;
pub mod state;
