use crate::infra::AppState;
use application_docs::documents::{document_router, ApplicationDocumentGenerator};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_document_routes(
    generator: Arc<ApplicationDocumentGenerator>,
    templates_base: &str,
) -> axum::Router {
    document_router(generator, templates_base)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        DirectoryTemplatePaths, JsonApplicationRepository, MiniJinjaRenderer,
        WkhtmltopdfConverter,
    };
    use application_docs::config::DocumentConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    fn generator() -> Arc<ApplicationDocumentGenerator> {
        Arc::new(ApplicationDocumentGenerator::new(
            Arc::new(JsonApplicationRepository::default()),
            Arc::new(DirectoryTemplatePaths),
            Arc::new(MiniJinjaRenderer),
            Arc::new(WkhtmltopdfConverter::new("wkhtmltopdf")),
            DocumentConfig {
                support_email: "support@bank.test".to_string(),
                signature: "Onboarding".to_string(),
                tax_rate: Decimal::new(15, 2),
            },
        ))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_application_is_not_found() {
        let request = Request::builder()
            .uri("/api/v1/applications/8d0a3a4e-3c6f-4a57-9a0e-6f1f1f2b8c11/document")
            .body(Body::empty())
            .expect("request builds");

        let response = with_document_routes(generator(), "templates/")
            .oneshot(request)
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["error"], "no document available");
    }

    #[tokio::test]
    async fn document_route_renders_from_configured_templates() {
        let templates = tempfile::tempdir().expect("temp dir");
        let templates_base = format!("{}/", templates.path().display());
        let repository = JsonApplicationRepository::from_json(
            r#"[{
                "id": "8d0a3a4e-3c6f-4a57-9a0e-6f1f1f2b8c11",
                "reference_number": "APP-7781",
                "state": "Pending",
                "person": { "first_name": "Lerato", "surname": "Dlamini" },
                "date": "2025-04-01"
            }]"#,
        )
        .expect("fixture parses");
        let generator = Arc::new(ApplicationDocumentGenerator::new(
            Arc::new(repository),
            Arc::new(DirectoryTemplatePaths),
            Arc::new(MiniJinjaRenderer),
            Arc::new(WkhtmltopdfConverter::new("wkhtmltopdf")),
            DocumentConfig {
                support_email: "support@bank.test".to_string(),
                signature: "Onboarding".to_string(),
                tax_rate: Decimal::new(15, 2),
            },
        ));

        let request = Request::builder()
            .uri("/api/v1/applications/8d0a3a4e-3c6f-4a57-9a0e-6f1f1f2b8c11/document?base_uri=/etc/")
            .body(Body::empty())
            .expect("request builds");
        let response = with_document_routes(generator, &templates_base)
            .oneshot(request)
            .await
            .expect("router responds");

        // The template directory is empty, so the failure names the path that was tried.
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        let expected = templates.path().join("PendingApplication.html");
        let message = body["error"].as_str().expect("error message");
        assert!(message.contains(&*expected.to_string_lossy()), "{message}");
        assert!(!message.contains("/etc/"), "{message}");
    }

    #[tokio::test]
    async fn health_route_is_mounted() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request builds");

        let response = with_document_routes(generator(), "templates/")
            .oneshot(request)
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
