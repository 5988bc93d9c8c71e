// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Boot gate errors.
//!
//! Every variant is fatal at boot. None is retried or recovered locally and
//! none ever reaches an HTTP client, since the gate runs before any listener
//! exists.

use std::fmt;
use std::io;
use std::path::PathBuf;

use super::boot::BootState;

/// Which half of the keypair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyArtifact {
    Public,
    Private,
}

impl fmt::Display for KeyArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyArtifact::Public => write!(f, "public key"),
            KeyArtifact::Private => write!(f, "private key"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("configuration document not found at {}", path.display())]
    MissingDocument { path: PathBuf },

    #[error("configuration document at {} is unreadable: {reason}", path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("{artifact} artifact not found at {}", path.display())]
    MissingKeyArtifact { artifact: KeyArtifact, path: PathBuf },

    #[error("{artifact} artifact at {} is invalid: {reason}", path.display())]
    InvalidKeyArtifact {
        artifact: KeyArtifact,
        path: PathBuf,
        reason: String,
    },

    #[error("public and private key artifacts are not halves of the same keypair")]
    KeyPairMismatch,

    #[error("keypair generation failed: {0}")]
    KeyGeneration(String),

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("symmetric key could not be unwrapped: {0}")]
    AsymmetricDecryptionFailure(String),

    #[error("payload could not be decrypted: {0}")]
    SymmetricDecryptionFailure(String),

    #[error("decrypted payload is not a configuration: {0}")]
    PayloadParseFailure(String),

    #[error("sealing failed: {0}")]
    SealFailure(String),

    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("boot gate already finished in state {0}")]
    AlreadyFinished(BootState),
}

impl GateError {
    /// Short name of the boot stage that produced this error, for logs.
    pub fn stage(&self) -> &'static str {
        match self {
            GateError::MissingDocument { .. } | GateError::MalformedDocument { .. } => "document",
            GateError::MissingKeyArtifact { .. }
            | GateError::InvalidKeyArtifact { .. }
            | GateError::KeyPairMismatch
            | GateError::KeyGeneration(_) => "keystore",
            GateError::MalformedEnvelope(_) => "envelope",
            GateError::AsymmetricDecryptionFailure(_) => "key-unwrap",
            GateError::SymmetricDecryptionFailure(_) => "decrypt",
            GateError::PayloadParseFailure(_) => "payload",
            GateError::SealFailure(_) => "seal",
            GateError::Storage { .. } => "storage",
            GateError::AlreadyFinished(_) => "gate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_names_artifact_and_path() {
        let err = GateError::MissingKeyArtifact {
            artifact: KeyArtifact::Private,
            path: PathBuf::from("config/private.key"),
        };
        assert_eq!(
            err.to_string(),
            "private key artifact not found at config/private.key"
        );
        assert_eq!(err.stage(), "keystore");
    }

    #[test]
    fn stages_distinguish_decryption_steps() {
        assert_eq!(
            GateError::AsymmetricDecryptionFailure("x".into()).stage(),
            "key-unwrap"
        );
        assert_eq!(
            GateError::SymmetricDecryptionFailure("x".into()).stage(),
            "decrypt"
        );
        assert_eq!(GateError::PayloadParseFailure("x".into()).stage(), "payload");
    }
}
