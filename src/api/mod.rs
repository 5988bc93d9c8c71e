// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::path::Path;

use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::NOT_FOUND_PAGE, state::AppState};

pub mod health;
pub mod validate;
pub mod version;

/// Build the HTTP router. Unmatched paths are served from `www_dir`.
pub fn router(state: AppState, www_dir: &Path) -> Router {
    let static_files =
        ServeDir::new(www_dir).not_found_service(ServeFile::new(www_dir.join(NOT_FOUND_PAGE)));

    Router::new()
        .route("/version", get(version::version))
        .route("/validate", get(validate::validate))
        .route("/health/live", get(health::liveness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(version::version, validate::validate, health::liveness),
    components(schemas(validate::MessageResponse, health::HealthResponse)),
    modifiers(&ApiKeyScheme),
    tags(
        (name = "Device", description = "Attendance device endpoints"),
        (name = "Health", description = "Liveness probe")
    )
)]
struct ApiDoc;

struct ApiKeyScheme;

impl Modify for ApiKeyScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`eVoyze <token>`",
            ))),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::document::tests::sample_payload;
    use crate::gate::AppConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{header::AUTHORIZATION, Request, StatusCode};
    use std::fs;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    fn test_app() -> (TempDir, Router) {
        let www = TempDir::new().unwrap();
        fs::write(www.path().join("index.html"), "<h1>device api</h1>").unwrap();
        fs::write(www.path().join(NOT_FOUND_PAGE), "<h1>not here</h1>").unwrap();

        let config = AppConfig::from_payload(sample_payload()).unwrap();
        let app = router(AppState::new(config), www.path());
        (www, app)
    }

    async fn send(app: Router, uri: &str, auth: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::builder().uri(uri);
        if let Some(value) = auth {
            request = request.header(AUTHORIZATION, value);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn version_reports_configured_version() {
        let (_www, app) = test_app();
        let (status, body) = send(app, "/version", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            "FAST Peple Attendance Module: Att-Device-API Version: 24.08.3"
        );
    }

    #[tokio::test]
    async fn validate_accepts_configured_key() {
        let (_www, app) = test_app();
        let (status, body) = send(app, "/validate", Some("eVoyze 0123456789abcdef")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"msg":"success"}"#);
    }

    #[tokio::test]
    async fn validate_rejects_bad_credentials() {
        let cases = [
            (None, "missing_auth_header"),
            (Some("Bearer 0123456789abcdef"), "invalid_auth_header"),
            (Some("eVoyze 0123456789abcdeX"), "incorrect_token"),
        ];
        for (auth, code) in cases {
            let (_www, app) = test_app();
            let (status, body) = send(app, "/validate", auth).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{auth:?}");
            let body: serde_json::Value = serde_json::from_str(&body).unwrap();
            assert_eq!(body["error_code"], code);
        }
    }

    #[tokio::test]
    async fn liveness_is_ok() {
        let (_www, app) = test_app();
        let (status, body) = send(app, "/health/live", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn static_files_and_not_found_page() {
        let (_www, app) = test_app();
        let (status, body) = send(app.clone(), "/index.html", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("device api"));

        let (status, body) = send(app, "/no/such/page", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("not here"));
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let (_www, app) = test_app();
        let (status, body) = send(app, "/api-doc/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        let doc: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(doc["paths"]["/validate"].is_object());
        assert!(doc["components"]["securitySchemes"]["api_key"].is_object());
    }
}
