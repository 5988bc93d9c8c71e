// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Shared-secret API key authentication for device clients.
//!
//! ## Auth Flow
//!
//! 1. The API key (`eVoyze <token>`) is generated at first run and sealed in
//!    `config.json`
//! 2. Devices send `Authorization: eVoyze <token>`
//! 3. The server compares the presented token with the one from the opened
//!    configuration
//!
//! The key is never logged.

pub mod error;
pub mod extractor;

pub use error::AuthError;
pub use extractor::ApiKey;
