// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! Environment variable names and defaults for the process. These cover only
//! where things live and how to log; everything the service itself needs
//! (port, database credentials, API key) comes out of the sealed
//! `config.json` via the boot gate.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CONFIG_DIR` | Directory holding `config.json` and the keypair | `config` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `WWW_DIR` | Static files served for unmatched paths | `www` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! The listening port is deliberately absent: it is read from the sealed
//! configuration.

use std::path::PathBuf;

use crate::gate::ConfigPaths;

/// Environment variable name for the configuration directory.
pub const CONFIG_DIR_ENV: &str = "CONFIG_DIR";

/// Environment variable name for the bind host.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the static files directory.
pub const WWW_DIR_ENV: &str = "WWW_DIR";

/// Environment variable name for the log format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_WWW_DIR: &str = "www";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Page served for unknown paths, relative to the www directory.
pub const NOT_FOUND_PAGE: &str = "404.html";

/// Process-level settings resolved from the command line and environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config_dir: PathBuf,
    pub host: String,
    pub www_dir: PathBuf,
}

impl Settings {
    pub fn config_paths(&self) -> ConfigPaths {
        ConfigPaths::new(&self.config_dir)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_dir: ConfigPaths::default().root().to_path_buf(),
            host: DEFAULT_HOST.to_string(),
            www_dir: PathBuf::from(DEFAULT_WWW_DIR),
        }
    }
}
