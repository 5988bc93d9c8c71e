// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The boot gate: the startup checkpoint that must produce an [`AppConfig`]
//! before anything network-facing is built.
//!
//! ```text
//! Uninitialized ──(no document)──▶ Bootstrapping ──▶ Sealed ──▶ Opening
//! Uninitialized ──(document)─────────────────────────────────▶ Opening
//! Opening ──▶ Ready | Aborted
//! ```
//!
//! `Ready` and `Aborted` are terminal for the process lifetime.

use std::fmt;

use serde_json::Value;
use tracing::{error, info, warn};

use super::bootstrap::{Bootstrapper, ConfigDefaults};
use super::keystore::KeyStore;
use super::unsealer::open;
use super::{files, ConfigDocument, ConfigPaths, ConfigPayload, Envelope, GateError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    Uninitialized,
    Bootstrapping,
    Sealed,
    Opening,
    Ready,
    Aborted,
}

impl BootState {
    pub fn is_terminal(self) -> bool {
        matches!(self, BootState::Ready | BootState::Aborted)
    }
}

impl fmt::Display for BootState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootState::Uninitialized => "uninitialized",
            BootState::Bootstrapping => "bootstrapping",
            BootState::Sealed => "sealed",
            BootState::Opening => "opening",
            BootState::Ready => "ready",
            BootState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Decrypted configuration, handed to the rest of the process after `Ready`.
///
/// Immutable once built. Holds no envelope or key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    payload: ConfigPayload,
    port: u16,
}

impl AppConfig {
    /// Validate a decrypted payload.
    pub fn from_payload(payload: ConfigPayload) -> Result<Self, GateError> {
        let digits_only =
            !payload.port.is_empty() && payload.port.bytes().all(|b| b.is_ascii_digit());
        let port = Some(&payload.port)
            .filter(|_| digits_only)
            .and_then(|p| p.parse::<u16>().ok())
            .filter(|p| *p != 0)
            .ok_or_else(|| {
                GateError::PayloadParseFailure(format!("port `{}` is not a valid port", payload.port))
            })?;
        Ok(Self { payload, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn version(&self) -> &str {
        &self.payload.version
    }

    /// Full API key, scheme word included.
    pub fn api_key(&self) -> &str {
        &self.payload.api_key
    }

    pub fn db_uid(&self) -> &str {
        &self.payload.db_uid
    }

    pub fn db_pwd(&self) -> &str {
        &self.payload.db_pwd
    }

    pub fn db_db(&self) -> &str {
        &self.payload.db_db
    }

    pub fn db_server(&self) -> &str {
        &self.payload.db_server
    }

    /// Key/value view over every configuration field.
    pub fn get(&self, key: &str) -> Option<String> {
        let p = &self.payload;
        let known = match key {
            "db_uid" => Some(&p.db_uid),
            "db_pwd" => Some(&p.db_pwd),
            "db_db" => Some(&p.db_db),
            "db_server" => Some(&p.db_server),
            "api_key" => Some(&p.api_key),
            "port" => Some(&p.port),
            "version" => Some(&p.version),
            _ => None,
        };
        if let Some(value) = known {
            return Some(value.clone());
        }
        p.extra.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Drives the startup sequence and records which state it reached.
pub struct BootGate {
    paths: ConfigPaths,
    defaults: ConfigDefaults,
    state: BootState,
}

impl BootGate {
    pub fn new(paths: ConfigPaths) -> Self {
        Self {
            paths,
            defaults: ConfigDefaults::default(),
            state: BootState::Uninitialized,
        }
    }

    /// Defaults used if the gate has to bootstrap a new document.
    pub fn with_defaults(mut self, defaults: ConfigDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    /// Run the gate to a terminal state.
    ///
    /// Synchronous and single-shot. Every failure is logged with its stage and
    /// returned; deciding to exit is left to the caller.
    pub fn run(&mut self) -> Result<AppConfig, GateError> {
        if self.state.is_terminal() {
            return Err(GateError::AlreadyFinished(self.state));
        }

        match self.advance() {
            Ok(config) => {
                self.transition(BootState::Ready);
                Ok(config)
            }
            Err(e) => {
                error!(stage = e.stage(), error = %e, "Configuration gate failed");
                self.transition(BootState::Aborted);
                Err(e)
            }
        }
    }

    fn advance(&mut self) -> Result<AppConfig, GateError> {
        if !files::exists(self.paths.document()) {
            self.transition(BootState::Bootstrapping);
            Bootstrapper::new(&self.paths)
                .with_defaults(self.defaults.clone())
                .bootstrap()?;
            self.transition(BootState::Sealed);
        }

        self.transition(BootState::Opening);
        self.open_document()
    }

    fn open_document(&self) -> Result<AppConfig, GateError> {
        let keys = KeyStore::new(&self.paths).load()?;
        let document: ConfigDocument = files::read_json(self.paths.document())?;
        let envelope = Envelope::from_text(&document.validation)?;
        let payload = open(&envelope, &keys.private)?;

        if payload != document.payload {
            warn!("Plain fields in config file differ from sealed values; using sealed values");
        }

        let config = AppConfig::from_payload(payload)?;
        info!(
            port = config.port(),
            version = %config.version(),
            "Configuration unsealed"
        );
        Ok(config)
    }

    fn transition(&mut self, next: BootState) {
        info!(from = %self.state, to = %next, "Boot gate transition");
        self.state = next;
    }
}

/// Run a fresh [`BootGate`] over `paths`.
pub fn boot(paths: ConfigPaths) -> Result<AppConfig, GateError> {
    BootGate::new(paths).run()
}
