// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{
    Settings, CONFIG_DIR_ENV, DEFAULT_HOST, DEFAULT_WWW_DIR, HOST_ENV, LOG_FORMAT_ENV, WWW_DIR_ENV,
};
use crate::gate::paths::CONFIG_ROOT;
use crate::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "att-device-api")]
#[command(version, about = "Attendance device API with sealed configuration")]
pub struct Cli {
    /// Directory holding config.json, public.key and private.key
    #[arg(long, global = true, env = CONFIG_DIR_ENV, default_value = CONFIG_ROOT)]
    pub config_dir: PathBuf,

    /// Address to bind the HTTP server to
    #[arg(long, global = true, env = HOST_ENV, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Directory of static files served for unmatched paths
    #[arg(long, global = true, env = WWW_DIR_ENV, default_value = DEFAULT_WWW_DIR)]
    pub www_dir: PathBuf,

    /// Log output format (json or pretty)
    #[arg(long, global = true, env = LOG_FORMAT_ENV, default_value = "pretty")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Open the sealed configuration and serve the API (default)
    Serve,
    /// Create keys and a sealed default config.json if none exists
    Init,
    /// Re-seal config.json after editing its plain fields
    Reseal,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            config_dir: self.config_dir.clone(),
            host: self.host.clone(),
            www_dir: self.www_dir.clone(),
        }
    }
}
