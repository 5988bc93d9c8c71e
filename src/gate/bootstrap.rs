// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! First-run document creation and operator resealing.

use std::collections::BTreeMap;

use tracing::info;
use uuid::Uuid;

use super::boot::AppConfig;
use super::keystore::KeyStore;
use super::sealer::seal;
use super::{files, ConfigDocument, ConfigPaths, ConfigPayload, GateError};

/// Scheme word that prefixes the API key and the `Authorization` header.
pub const API_KEY_SCHEME: &str = "eVoyze";

/// Default listening port written on first run.
pub const DEFAULT_PORT: u16 = 38012;

/// Values used for the plain fields of a freshly bootstrapped document.
#[derive(Debug, Clone)]
pub struct ConfigDefaults {
    pub db_uid: String,
    pub db_pwd: String,
    pub db_db: String,
    pub db_server: String,
    pub port: u16,
    pub version: String,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            db_uid: "att_admin".to_string(),
            db_pwd: "att_admin".to_string(),
            db_db: "att_hrms".to_string(),
            db_server: "localhost\\SQLEXPRESS".to_string(),
            port: DEFAULT_PORT,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ConfigDefaults {
    fn into_payload(self) -> ConfigPayload {
        ConfigPayload {
            db_uid: self.db_uid,
            db_pwd: self.db_pwd,
            db_db: self.db_db,
            db_server: self.db_server,
            api_key: generate_api_key(),
            port: self.port.to_string(),
            version: self.version,
            extra: BTreeMap::new(),
        }
    }
}

/// `"<scheme> <64 hex chars>"`, built from two v4 UUIDs.
pub fn generate_api_key() -> String {
    format!(
        "{API_KEY_SCHEME} {}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

/// Creates the configuration document when none exists.
pub struct Bootstrapper<'a> {
    paths: &'a ConfigPaths,
    defaults: ConfigDefaults,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(paths: &'a ConfigPaths) -> Self {
        Self {
            paths,
            defaults: ConfigDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: ConfigDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Create, seal and persist a default document.
    ///
    /// When `config.json` already exists it is returned as found and no file
    /// is touched, keys included.
    pub fn bootstrap(self) -> Result<ConfigDocument, GateError> {
        let document_path = self.paths.document();
        if files::exists(&document_path) {
            info!(path = %document_path.display(), "Config file already exists");
            return files::read_json(&document_path);
        }

        info!(dir = %self.paths.root().display(), "Config file not found, running initial setup");
        files::create_dir(self.paths.root())?;

        let keys = KeyStore::new(self.paths).ensure()?;
        let mut document = ConfigDocument::unsealed(self.defaults.into_payload());
        document.validation = seal(&document, &keys.public)?.to_text()?;

        files::write_json(&document_path, &document)?;
        info!(
            path = %document_path.display(),
            port = %document.payload.port,
            "Config file created and sealed"
        );
        Ok(document)
    }
}

/// Re-seal the existing document's current plain fields.
///
/// Used after an operator edits `config.json` by hand. Keys are created if
/// either artifact is missing. Fields the boot gate would reject fail here
/// with `PayloadParseFailure` and nothing is written.
pub fn reseal(paths: &ConfigPaths) -> Result<ConfigDocument, GateError> {
    let document_path = paths.document();
    let mut document: ConfigDocument = files::read_json(&document_path)?;
    document.payload.check_scalars()?;
    AppConfig::from_payload(document.payload.clone())?;

    let keys = KeyStore::new(paths).ensure()?;
    info!("Encrypting configuration");
    document.validation = seal(&document, &keys.public)?.to_text()?;

    files::write_json(&document_path, &document)?;
    info!(path = %document_path.display(), "Config file updated with encrypted validation");
    Ok(document)
}
