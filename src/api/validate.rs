// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::ApiKey;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub msg: String,
}

/// Check a device's API key.
#[utoipa::path(
    get,
    path = "/validate",
    tag = "Device",
    security(("api_key" = [])),
    responses(
        (status = 200, description = "API key accepted", body = MessageResponse),
        (status = 401, description = "Missing, malformed or incorrect API key")
    )
)]
pub async fn validate(_key: ApiKey) -> Json<MessageResponse> {
    Json(MessageResponse {
        msg: "success".to_string(),
    })
}
