// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Open an [`Envelope`] back into the sealed configuration payload.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
use hmac::Mac;
use rsa::{Oaep, RsaPrivateKey};
use sha1::Sha1;
use tracing::warn;
use zeroize::Zeroizing;

use super::envelope::SYMMETRIC_KEY_LEN;
use super::sealer::tag_mac;
use super::{ConfigPayload, Envelope, GateError};

/// Recover the payload sealed in `envelope` using `private`.
///
/// Fails with:
/// - `MalformedEnvelope` when a field is not base64 or has the wrong length,
/// - `AsymmetricDecryptionFailure` when the key does not unwrap under `private`,
/// - `SymmetricDecryptionFailure` when the tag or the padding is wrong,
/// - `PayloadParseFailure` when the plaintext is not a configuration.
///
/// Envelopes without a tag are accepted; for those, CBC padding and payload
/// parsing are the only corruption checks.
pub fn open(envelope: &Envelope, private: &RsaPrivateKey) -> Result<ConfigPayload, GateError> {
    let decoded = envelope.decode()?;

    let key = Zeroizing::new(
        private
            .decrypt(Oaep::new::<Sha1>(), &decoded.wrapped_key)
            .map_err(|e| GateError::AsymmetricDecryptionFailure(e.to_string()))?,
    );
    if key.len() != SYMMETRIC_KEY_LEN {
        return Err(GateError::AsymmetricDecryptionFailure(format!(
            "unwrapped key is {} bytes, expected {SYMMETRIC_KEY_LEN}",
            key.len()
        )));
    }

    match decoded.tag {
        Some(tag) => {
            let mut mac = tag_mac(&key)?;
            mac.update(&decoded.iv);
            mac.update(&decoded.ciphertext);
            mac.verify_slice(&tag).map_err(|_| {
                GateError::SymmetricDecryptionFailure("envelope tag mismatch".to_string())
            })?;
        }
        None => warn!("Envelope has no integrity tag; reseal to add one"),
    }

    let plaintext = Zeroizing::new(
        cbc::Decryptor::<Aes256>::new_from_slices(&key, &decoded.iv)
            .map_err(|e| GateError::SymmetricDecryptionFailure(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(&decoded.ciphertext)
            .map_err(|_| GateError::SymmetricDecryptionFailure("invalid padding".to_string()))?,
    );

    ConfigPayload::from_sealed_bytes(&plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::document::tests::sample_payload;
    use crate::gate::keystore::KeyPair;
    use crate::gate::sealer::seal;
    use crate::gate::ConfigDocument;
    use base64ct::{Base64, Encoding};
    use cbc::cipher::BlockEncryptMut;
    use rand::rngs::OsRng;
    use rsa::RsaPublicKey;

    fn sealed() -> (KeyPair, Envelope) {
        let pair = KeyPair::generate().unwrap();
        let envelope = seal(&ConfigDocument::unsealed(sample_payload()), &pair.public).unwrap();
        (pair, envelope)
    }

    /// Flip every bit of one decoded byte in a base64 field.
    fn flip(field: &str, index: usize) -> String {
        let mut bytes = Base64::decode_vec(field).unwrap();
        bytes[index] ^= 0xFF;
        Base64::encode_string(&bytes)
    }

    /// First, middle and last byte positions of a base64 field.
    fn positions(field: &str) -> [usize; 3] {
        let len = Base64::decode_vec(field).unwrap().len();
        [0, len / 2, len - 1]
    }

    #[test]
    fn round_trip_recovers_payload() {
        let (pair, envelope) = sealed();
        assert_eq!(open(&envelope, &pair.private).unwrap(), sample_payload());
    }

    #[test]
    fn independent_seals_open_to_same_payload() {
        let pair = KeyPair::generate().unwrap();
        let doc = ConfigDocument::unsealed(sample_payload());
        let a = seal(&doc, &pair.public).unwrap();
        let b = seal(&doc, &pair.public).unwrap();

        assert_ne!(a, b);
        assert_eq!(
            open(&a, &pair.private).unwrap(),
            open(&b, &pair.private).unwrap()
        );
    }

    #[test]
    fn unrelated_private_key_fails_at_key_unwrap() {
        let (_pair, envelope) = sealed();
        let stranger = KeyPair::generate().unwrap();

        let err = open(&envelope, &stranger.private).unwrap_err();
        assert!(matches!(err, GateError::AsymmetricDecryptionFailure(_)));
    }

    #[test]
    fn tampered_iv_or_ciphertext_fails_tag_check() {
        let (pair, envelope) = sealed();

        for index in positions(&envelope.iv) {
            let mut bad = envelope.clone();
            bad.iv = flip(&envelope.iv, index);
            let err = open(&bad, &pair.private).unwrap_err();
            assert!(
                matches!(err, GateError::SymmetricDecryptionFailure(_)),
                "iv byte {index}: {err}"
            );
        }

        for index in positions(&envelope.encrypted_data) {
            let mut bad = envelope.clone();
            bad.encrypted_data = flip(&envelope.encrypted_data, index);
            let err = open(&bad, &pair.private).unwrap_err();
            assert!(
                matches!(err, GateError::SymmetricDecryptionFailure(_)),
                "ciphertext byte {index}: {err}"
            );
        }
    }

    #[test]
    fn tampered_tag_fails() {
        let (pair, envelope) = sealed();
        let mut bad = envelope.clone();
        bad.tag = envelope.tag.as_deref().map(|t| flip(t, 0));

        let err = open(&bad, &pair.private).unwrap_err();
        assert!(matches!(err, GateError::SymmetricDecryptionFailure(_)));
    }

    #[test]
    fn tampered_wrapped_key_fails_at_key_unwrap() {
        let (pair, envelope) = sealed();
        for index in positions(&envelope.encrypted_key) {
            let mut bad = envelope.clone();
            bad.encrypted_key = flip(&envelope.encrypted_key, index);
            let err = open(&bad, &pair.private).unwrap_err();
            assert!(
                matches!(err, GateError::AsymmetricDecryptionFailure(_)),
                "wrapped key byte {index}: {err}"
            );
        }
    }

    // Untagged envelopes have no integrity check of their own. Tampering is
    // still caught, but only by the padding check or by payload parsing.
    #[test]
    fn untagged_envelope_tampering_still_fails() {
        let (pair, envelope) = sealed();
        let mut legacy = envelope.clone();
        legacy.tag = None;
        assert_eq!(open(&legacy, &pair.private).unwrap(), sample_payload());

        for index in positions(&legacy.iv) {
            let mut bad = legacy.clone();
            bad.iv = flip(&legacy.iv, index);
            let err = open(&bad, &pair.private).unwrap_err();
            assert!(
                matches!(
                    err,
                    GateError::SymmetricDecryptionFailure(_) | GateError::PayloadParseFailure(_)
                ),
                "iv byte {index}: {err}"
            );
        }

        for index in positions(&legacy.encrypted_data) {
            let mut bad = legacy.clone();
            bad.encrypted_data = flip(&legacy.encrypted_data, index);
            let err = open(&bad, &pair.private).unwrap_err();
            assert!(
                matches!(
                    err,
                    GateError::SymmetricDecryptionFailure(_) | GateError::PayloadParseFailure(_)
                ),
                "ciphertext byte {index}: {err}"
            );
        }
    }

    #[test]
    fn wrapped_key_of_wrong_length_is_rejected() {
        let (pair, mut envelope) = sealed();
        let short = RsaPublicKey::from(&pair.private)
            .encrypt(&mut OsRng, Oaep::new::<Sha1>(), &[7u8; 16])
            .unwrap();
        envelope.encrypted_key = Base64::encode_string(&short);

        let err = open(&envelope, &pair.private).unwrap_err();
        assert!(err.to_string().contains("expected 32"));
    }

    #[test]
    fn non_configuration_plaintext_fails_to_parse() {
        let pair = KeyPair::generate().unwrap();
        let key = [5u8; 32];
        let iv = [6u8; 16];
        let ciphertext = cbc::Encryptor::<Aes256>::new_from_slices(&key, &iv)
            .unwrap()
            .encrypt_padded_vec_mut::<Pkcs7>(b"[1, 2, 3]");
        let wrapped = pair
            .public
            .encrypt(&mut OsRng, Oaep::new::<Sha1>(), &key)
            .unwrap();
        let tag = crate::gate::sealer::envelope_tag(&key, &iv, &ciphertext).unwrap();
        let envelope = Envelope::from_parts(&iv, &ciphertext, &wrapped, &tag);

        let err = open(&envelope, &pair.private).unwrap_err();
        assert!(matches!(err, GateError::PayloadParseFailure(_)));
    }
}
