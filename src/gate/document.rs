// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The configuration document persisted as `config.json`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::GateError;

/// The sealed part of the configuration: every field except `validation`.
///
/// Unknown scalar keys are kept in `extra` so hand-added settings survive a
/// seal/open cycle.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPayload {
    pub db_uid: String,
    pub db_pwd: String,
    pub db_db: String,
    pub db_server: String,
    pub api_key: String,
    pub port: String,
    pub version: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ConfigPayload {
    /// Serialize to the text that gets encrypted.
    ///
    /// Field order is fixed by the struct and `extra` is sorted, so equal
    /// payloads always produce identical text.
    pub fn to_sealing_text(&self) -> Result<String, GateError> {
        serde_json::to_string_pretty(self).map_err(|e| GateError::SealFailure(e.to_string()))
    }

    /// Parse decrypted text back into a payload.
    pub fn from_sealed_bytes(bytes: &[u8]) -> Result<Self, GateError> {
        let payload: Self = serde_json::from_slice(bytes)
            .map_err(|e| GateError::PayloadParseFailure(e.to_string()))?;
        payload.check_scalars()?;
        Ok(payload)
    }

    /// Every extra field must be a scalar.
    pub fn check_scalars(&self) -> Result<(), GateError> {
        match self.extra.iter().find(|(_, v)| !is_scalar(v)) {
            Some((key, _)) => Err(GateError::PayloadParseFailure(format!(
                "field `{key}` is not a scalar"
            ))),
            None => Ok(()),
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

impl fmt::Debug for ConfigPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigPayload")
            .field("db_uid", &self.db_uid)
            .field("db_pwd", &"<redacted>")
            .field("db_db", &self.db_db)
            .field("db_server", &self.db_server)
            .field("api_key", &"<redacted>")
            .field("port", &self.port)
            .field("version", &self.version)
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// `config.json`: the plain fields plus the `validation` envelope text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(flatten)]
    pub payload: ConfigPayload,
    /// Envelope text written by the sealer. Never edited by hand.
    #[serde(default)]
    pub validation: String,
}

impl ConfigDocument {
    /// A document whose `validation` has not been produced yet.
    pub fn unsealed(payload: ConfigPayload) -> Self {
        Self {
            payload,
            validation: String::new(),
        }
    }

    pub fn payload(&self) -> &ConfigPayload {
        &self.payload
    }
}
