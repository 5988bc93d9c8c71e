// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-level errors and their exit codes.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

use crate::gate::GateError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration gate failed: {0}")]
    Gate(#[from] GateError),

    #[error("invalid bind address `{addr}`: {reason}")]
    BindAddress { addr: String, reason: String },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
}

impl AppError {
    /// Gate failures exit 1; everything after the gate exits 3.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Gate(_) => 1,
            AppError::BindAddress { .. }
            | AppError::Bind { .. }
            | AppError::Serve(_)
            | AppError::Runtime(_) => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_errors_exit_with_one() {
        let err = AppError::from(GateError::KeyPairMismatch);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("configuration gate failed"));
    }

    #[test]
    fn server_errors_exit_with_three() {
        let err = AppError::Serve(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(err.exit_code(), 3);
    }
}
