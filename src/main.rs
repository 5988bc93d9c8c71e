// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use att_device_api::{app, cli::Cli, error::AppError, logging};
use clap::Parser;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    match app::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Gate failures were already logged with their stage.
            if !matches!(e, AppError::Gate(_)) {
                error!(error = %e, "Exiting");
            }
            ExitCode::from(e.exit_code())
        }
    }
}
