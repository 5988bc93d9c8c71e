// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::extract::State;

use crate::state::AppState;

/// Report the configured version as plain text.
#[utoipa::path(
    get,
    path = "/version",
    tag = "Device",
    responses(
        (status = 200, description = "Configured version", body = String, content_type = "text/plain")
    )
)]
pub async fn version(State(state): State<AppState>) -> String {
    format!(
        "FAST Peple Attendance Module: Att-Device-API Version: {}",
        state.config.version()
    )
}
