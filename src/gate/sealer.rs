// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Seal a configuration document into an [`Envelope`].
//!
//! 1. Serialize every field except `validation`.
//! 2. Draw a fresh 256-bit AES key and 128-bit IV.
//! 3. AES-256-CBC encrypt with PKCS#7 padding.
//! 4. Wrap the AES key with RSA-OAEP (SHA-1) under the public key.
//! 5. Tag `iv || ciphertext` with HMAC-SHA256 under a key derived from the
//!    AES key.
//!
//! No key or IV is ever reused, so sealing the same document twice yields two
//! different envelopes.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::{Oaep, RsaPublicKey};
use sha1::Sha1;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::envelope::{IV_LEN, SYMMETRIC_KEY_LEN, TAG_LEN};
use super::{ConfigDocument, Envelope, GateError};

type HmacSha256 = Hmac<Sha256>;

const MAC_KEY_LABEL: &[u8] = b"envelope-mac";

/// Seal `document`'s payload under `public`.
///
/// Pure apart from randomness: the caller writes the result into
/// `validation` and persists the document.
pub fn seal(document: &ConfigDocument, public: &RsaPublicKey) -> Result<Envelope, GateError> {
    let plaintext = Zeroizing::new(document.payload().to_sealing_text()?);

    let mut key = Zeroizing::new([0u8; SYMMETRIC_KEY_LEN]);
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut key[..]);
    OsRng.fill_bytes(&mut iv);

    let ciphertext = cbc::Encryptor::<Aes256>::new_from_slices(&key[..], &iv)
        .map_err(|e| GateError::SealFailure(format!("cipher init: {e}")))?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let wrapped_key = public
        .encrypt(&mut OsRng, Oaep::new::<Sha1>(), &key[..])
        .map_err(|e| GateError::SealFailure(format!("key wrap: {e}")))?;

    let tag = envelope_tag(&key[..], &iv, &ciphertext)?;

    Ok(Envelope::from_parts(&iv, &ciphertext, &wrapped_key, &tag))
}

/// HMAC-SHA256 over `iv || ciphertext`, keyed from the one-time AES key.
pub(crate) fn envelope_tag(
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<[u8; TAG_LEN], GateError> {
    let mut mac = tag_mac(key)?;
    mac.update(iv);
    mac.update(ciphertext);
    Ok(mac.finalize().into_bytes().into())
}

/// Prepared MAC for the envelope tag, ready for `update`/`verify_slice`.
pub(crate) fn tag_mac(key: &[u8]) -> Result<HmacSha256, GateError> {
    let mut kdf = HmacSha256::new_from_slice(key)
        .map_err(|e| GateError::SealFailure(format!("mac key: {e}")))?;
    kdf.update(MAC_KEY_LABEL);
    let mac_key = Zeroizing::new(<[u8; TAG_LEN]>::from(kdf.finalize().into_bytes()));

    HmacSha256::new_from_slice(&mac_key[..])
        .map_err(|e| GateError::SealFailure(format!("mac key: {e}")))
}
