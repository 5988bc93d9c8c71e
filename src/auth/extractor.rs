// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for API key authentication.
//!
//! Use the `ApiKey` extractor in handlers to require the configured key:
//!
//! ```rust,ignore
//! async fn my_handler(_: ApiKey) -> impl IntoResponse {
//!     // request carried `Authorization: eVoyze <token>`
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::AuthError;
use crate::gate::API_KEY_SCHEME;
use crate::state::AppState;

/// Proof that the request presented the configured API key.
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let presented = parse_header(header)?;
        let expected = parse_header(state.config.api_key()).map_err(|_| {
            debug!("Configured API key has no scheme prefix");
            AuthError::IncorrectToken
        })?;

        if token_digest(presented) != token_digest(expected) {
            debug!("API key rejected");
            return Err(AuthError::IncorrectToken);
        }
        Ok(ApiKey)
    }
}

/// Split `"<scheme> <token>"`, requiring the API key scheme.
fn parse_header(value: &str) -> Result<&str, AuthError> {
    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::InvalidAuthHeader)?;
    if scheme != API_KEY_SCHEME {
        return Err(AuthError::InvalidAuthHeader);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

// Tokens are compared by digest only.
fn token_digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}
