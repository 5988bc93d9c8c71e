// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Envelope wire format.
//!
//! The envelope is a small JSON object stored as a string in the document's
//! `validation` field:
//!
//! ```text
//! {"iv":"<b64>","encryptedData":"<b64>","encryptedKey":"<b64>","tag":"<b64>"}
//! ```
//!
//! `tag` is absent on envelopes written by older tooling.

use base64ct::{Base64, Encoding};
use serde::{Deserialize, Serialize};

use super::GateError;

/// AES-256 key length in bytes.
pub const SYMMETRIC_KEY_LEN: usize = 32;

/// CBC initialization vector length in bytes.
pub const IV_LEN: usize = 16;

/// HMAC-SHA256 tag length in bytes.
pub const TAG_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub iv: String,
    pub encrypted_data: String,
    pub encrypted_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Envelope fields decoded to raw bytes, with lengths checked.
#[derive(Debug)]
pub(crate) struct DecodedEnvelope {
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
    pub wrapped_key: Vec<u8>,
    pub tag: Option<[u8; TAG_LEN]>,
}

impl Envelope {
    pub(crate) fn from_parts(
        iv: &[u8],
        ciphertext: &[u8],
        wrapped_key: &[u8],
        tag: &[u8],
    ) -> Self {
        Self {
            iv: Base64::encode_string(iv),
            encrypted_data: Base64::encode_string(ciphertext),
            encrypted_key: Base64::encode_string(wrapped_key),
            tag: Some(Base64::encode_string(tag)),
        }
    }

    /// Parse the text stored in `validation`.
    pub fn from_text(text: &str) -> Result<Self, GateError> {
        if text.trim().is_empty() {
            return Err(GateError::MalformedEnvelope(
                "validation field is empty".to_string(),
            ));
        }
        serde_json::from_str(text).map_err(|e| GateError::MalformedEnvelope(e.to_string()))
    }

    /// Render as the text stored in `validation`.
    pub fn to_text(&self) -> Result<String, GateError> {
        serde_json::to_string(self).map_err(|e| GateError::SealFailure(e.to_string()))
    }

    pub(crate) fn decode(&self) -> Result<DecodedEnvelope, GateError> {
        let iv = decode_field("iv", &self.iv)?;
        let iv: [u8; IV_LEN] = iv.try_into().map_err(|v: Vec<u8>| {
            GateError::MalformedEnvelope(format!("iv is {} bytes, expected {IV_LEN}", v.len()))
        })?;

        let ciphertext = decode_field("encryptedData", &self.encrypted_data)?;
        if ciphertext.is_empty() {
            return Err(GateError::MalformedEnvelope(
                "encryptedData is empty".to_string(),
            ));
        }

        let wrapped_key = decode_field("encryptedKey", &self.encrypted_key)?;

        let tag = match &self.tag {
            Some(tag) => {
                let tag = decode_field("tag", tag)?;
                let tag: [u8; TAG_LEN] = tag.try_into().map_err(|v: Vec<u8>| {
                    GateError::MalformedEnvelope(format!(
                        "tag is {} bytes, expected {TAG_LEN}",
                        v.len()
                    ))
                })?;
                Some(tag)
            }
            None => None,
        };

        Ok(DecodedEnvelope {
            iv,
            ciphertext,
            wrapped_key,
            tag,
        })
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, GateError> {
    Base64::decode_vec(value)
        .map_err(|e| GateError::MalformedEnvelope(format!("{name} is not valid base64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope::from_parts(&[1u8; IV_LEN], &[2u8; 32], &[3u8; 256], &[4u8; TAG_LEN])
    }

    #[test]
    fn text_uses_camel_case_keys() {
        let text = sample().to_text().unwrap();
        assert!(text.contains("\"encryptedData\""));
        assert!(text.contains("\"encryptedKey\""));
        assert!(text.contains("\"iv\""));
        assert!(text.contains("\"tag\""));
    }

    #[test]
    fn legacy_text_without_tag_parses() {
        let text = r#"{"iv":"AAAAAAAAAAAAAAAAAAAAAA==","encryptedData":"AA==","encryptedKey":"AA=="}"#;
        let envelope = Envelope::from_text(text).unwrap();
        assert!(envelope.tag.is_none());
        assert!(envelope.decode().unwrap().tag.is_none());
    }

    #[test]
    fn empty_validation_is_malformed() {
        assert!(matches!(
            Envelope::from_text("  "),
            Err(GateError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn non_json_validation_is_malformed() {
        assert!(matches!(
            Envelope::from_text("not an envelope"),
            Err(GateError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn bad_base64_is_malformed() {
        let mut envelope = sample();
        envelope.encrypted_key = "***".to_string();
        assert!(matches!(
            envelope.decode(),
            Err(GateError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn short_iv_is_malformed() {
        let mut envelope = sample();
        envelope.iv = Base64::encode_string(&[0u8; 8]);
        let err = envelope.decode().unwrap_err();
        assert!(err.to_string().contains("iv is 8 bytes"));
    }

    #[test]
    fn short_tag_is_malformed() {
        let mut envelope = sample();
        envelope.tag = Some(Base64::encode_string(&[0u8; 4]));
        assert!(matches!(
            envelope.decode(),
            Err(GateError::MalformedEnvelope(_))
        ));
    }
}
