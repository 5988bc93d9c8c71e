// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RSA keypair persistence.
//!
//! The public half is stored as SPKI DER and the private half as PKCS#8 DER,
//! each wrapped in a PEM block (`PUBLIC KEY` / `PRIVATE KEY`).

use std::fmt;
use std::path::Path;

use pem::{EncodeConfig, LineEnding, Pem};
use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::{debug, info, warn};

use super::{files, ConfigPaths, GateError, KeyArtifact};

/// Modulus size of generated keys.
pub const KEY_BITS: usize = 2048;

const PUBLIC_PEM_TAG: &str = "PUBLIC KEY";
const PRIVATE_PEM_TAG: &str = "PRIVATE KEY";

/// Both halves of one generation event.
#[derive(Clone)]
pub struct KeyPair {
    pub public: RsaPublicKey,
    pub private: RsaPrivateKey,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &(self.public.size() * 8))
            .field("private", &"<redacted>")
            .finish()
    }
}

impl KeyPair {
    /// Generate a fresh keypair from the OS RNG.
    pub fn generate() -> Result<Self, GateError> {
        let private = RsaPrivateKey::new(&mut OsRng, KEY_BITS)
            .map_err(|e| GateError::KeyGeneration(e.to_string()))?;
        let public = RsaPublicKey::from(&private);
        Ok(Self { public, private })
    }
}

/// Loads and persists the keypair next to the configuration document.
pub struct KeyStore<'a> {
    paths: &'a ConfigPaths,
}

impl<'a> KeyStore<'a> {
    pub fn new(paths: &'a ConfigPaths) -> Self {
        Self { paths }
    }

    /// Return the persisted keypair, generating one if either artifact is
    /// missing.
    ///
    /// A surviving half is overwritten along with its missing sibling. Any
    /// envelope sealed under the old public key can no longer be opened after
    /// that, so callers outside bootstrap should use [`KeyStore::load`].
    pub fn ensure(&self) -> Result<KeyPair, GateError> {
        let public_path = self.paths.public_key();
        let private_path = self.paths.private_key();
        let has_public = files::exists(&public_path);
        let has_private = files::exists(&private_path);

        if has_public && has_private {
            debug!("Key files already exist");
            return self.load();
        }

        if has_public || has_private {
            let survivor = if has_public {
                KeyArtifact::Public
            } else {
                KeyArtifact::Private
            };
            warn!(
                %survivor,
                "Only one key artifact present; regenerating keypair orphans envelopes sealed under the old key"
            );
        }

        info!(bits = KEY_BITS, "Generating keypair");
        let pair = KeyPair::generate()?;
        self.persist(&pair)?;
        info!(
            public = %public_path.display(),
            private = %private_path.display(),
            "Key files created"
        );
        Ok(pair)
    }

    /// Load both artifacts, failing if either is missing, unparsable, or
    /// not the matching half of the other.
    pub fn load(&self) -> Result<KeyPair, GateError> {
        let public = read_public(&self.paths.public_key())?;
        let private = read_private(&self.paths.private_key())?;

        if RsaPublicKey::from(&private) != public {
            return Err(GateError::KeyPairMismatch);
        }
        Ok(KeyPair { public, private })
    }

    fn persist(&self, pair: &KeyPair) -> Result<(), GateError> {
        let private_der = pair
            .private
            .to_pkcs8_der()
            .map_err(|e| GateError::KeyGeneration(format!("private key encoding: {e}")))?;
        let public_der = pair
            .public
            .to_public_key_der()
            .map_err(|e| GateError::KeyGeneration(format!("public key encoding: {e}")))?;

        let private_pem = encode_pem(PRIVATE_PEM_TAG, private_der.as_bytes());
        let public_pem = encode_pem(PUBLIC_PEM_TAG, public_der.as_bytes());

        files::write_raw(self.paths.private_key(), private_pem.as_bytes(), true)?;
        files::write_raw(self.paths.public_key(), public_pem.as_bytes(), false)
    }
}

fn encode_pem(tag: &str, der: &[u8]) -> String {
    pem::encode_config(
        &Pem::new(tag, der.to_vec()),
        EncodeConfig::new().set_line_ending(LineEnding::LF),
    )
}

fn read_pem(path: &Path, artifact: KeyArtifact, tag: &str) -> Result<Pem, GateError> {
    if !files::exists(path) {
        return Err(GateError::MissingKeyArtifact {
            artifact,
            path: path.to_path_buf(),
        });
    }

    let invalid = |reason: String| GateError::InvalidKeyArtifact {
        artifact,
        path: path.to_path_buf(),
        reason,
    };

    let text = files::read_text(path)?;
    let block = pem::parse(text.trim()).map_err(|e| invalid(format!("invalid PEM: {e}")))?;
    if block.tag() != tag {
        return Err(invalid(format!(
            "expected PEM tag `{tag}`, found `{}`",
            block.tag()
        )));
    }
    Ok(block)
}

fn read_public(path: &Path) -> Result<RsaPublicKey, GateError> {
    let block = read_pem(path, KeyArtifact::Public, PUBLIC_PEM_TAG)?;
    RsaPublicKey::from_public_key_der(block.contents()).map_err(|e| {
        GateError::InvalidKeyArtifact {
            artifact: KeyArtifact::Public,
            path: path.to_path_buf(),
            reason: format!("invalid SPKI: {e}"),
        }
    })
}

fn read_private(path: &Path) -> Result<RsaPrivateKey, GateError> {
    let block = read_pem(path, KeyArtifact::Private, PRIVATE_PEM_TAG)?;
    RsaPrivateKey::from_pkcs8_der(block.contents()).map_err(|e| {
        GateError::InvalidKeyArtifact {
            artifact: KeyArtifact::Private,
            path: path.to_path_buf(),
            reason: format!("invalid PKCS#8: {e}"),
        }
    })
}
