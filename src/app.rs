// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process wiring: run the boot gate, then serve.

use std::net::{IpAddr, SocketAddr};

use tracing::{error, info};

use crate::api::router;
use crate::cli::{Cli, Command};
use crate::config::Settings;
use crate::error::AppError;
use crate::gate::{reseal, AppConfig, BootGate, Bootstrapper, GateError};
use crate::state::AppState;

/// Execute the selected command.
pub fn run(cli: &Cli) -> Result<(), AppError> {
    let settings = cli.settings();
    match cli.command() {
        Command::Serve => {
            // No runtime, listener or router exists until the gate is Ready.
            let config = BootGate::new(settings.config_paths()).run()?;
            serve(settings, config)
        }
        Command::Init => {
            Bootstrapper::new(&settings.config_paths())
                .bootstrap()
                .inspect_err(log_gate_failure)?;
            Ok(())
        }
        Command::Reseal => {
            reseal(&settings.config_paths()).inspect_err(log_gate_failure)?;
            Ok(())
        }
    }
}

fn log_gate_failure(e: &GateError) {
    error!(stage = e.stage(), error = %e, "Configuration command failed");
}

fn serve(settings: Settings, config: AppConfig) -> Result<(), AppError> {
    let addr = bind_addr(&settings.host, config.port())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;

    runtime.block_on(async move {
        let app = router(AppState::new(config), &settings.www_dir);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| AppError::Bind { addr, source })?;

        info!(%addr, www = %settings.www_dir.display(), "Att-Device-API listening (docs at /docs)");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(AppError::Serve)?;

        info!("Server shutdown complete");
        Ok(())
    })
}

fn bind_addr(host: &str, port: u16) -> Result<SocketAddr, AppError> {
    let ip: IpAddr = host.parse().map_err(|e: std::net::AddrParseError| {
        AppError::BindAddress {
            addr: host.to_string(),
            reason: e.to_string(),
        }
    })?;
    Ok(SocketAddr::new(ip, port))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Received shutdown signal");
}
