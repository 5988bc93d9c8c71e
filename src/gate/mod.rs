// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Configuration integrity gate.
//!
//! The service refuses to start unless `config.json` carries a `validation`
//! envelope that opens under the local private key. Layout of the config
//! directory:
//!
//! ```text
//! config/
//! ├── config.json   # plain fields + sealed `validation`
//! ├── public.key    # PEM, SPKI
//! └── private.key   # PEM, PKCS#8, mode 0600
//! ```
//!
//! Modules, bottom-up:
//!
//! - `paths` / `files` - directory layout and file I/O
//! - `document` / `envelope` - on-disk formats
//! - `keystore` - RSA keypair load/generate
//! - `sealer` / `unsealer` - hybrid RSA-OAEP + AES-256-CBC envelope
//! - `bootstrap` - first-run setup and operator reseal
//! - `boot` - the startup state machine

pub mod boot;
pub mod bootstrap;
pub mod document;
pub mod envelope;
pub mod error;
pub mod files;
pub mod keystore;
pub mod paths;
pub mod sealer;
pub mod unsealer;

pub use boot::{boot, AppConfig, BootGate, BootState};
pub use bootstrap::{generate_api_key, reseal, Bootstrapper, ConfigDefaults, API_KEY_SCHEME};
pub use document::{ConfigDocument, ConfigPayload};
pub use envelope::Envelope;
pub use error::{GateError, KeyArtifact};
pub use keystore::{KeyPair, KeyStore};
pub use paths::ConfigPaths;
pub use sealer::seal;
pub use unsealer::open;
