use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::error;

use super::domain::ApplicationId;
use super::generator::ApplicationDocumentGenerator;

/// Generator plus the template base every request renders against.
#[derive(Clone)]
pub struct DocumentRouteState {
    generator: Arc<ApplicationDocumentGenerator>,
    base_uri: Arc<str>,
}

impl DocumentRouteState {
    pub fn new(generator: Arc<ApplicationDocumentGenerator>, base_uri: impl Into<Arc<str>>) -> Self {
        Self {
            generator,
            base_uri: base_uri.into(),
        }
    }
}

/// Router exposing document generation over HTTP. Templates always resolve against
/// `base_uri`; callers cannot choose another location.
pub fn document_router(
    generator: Arc<ApplicationDocumentGenerator>,
    base_uri: impl Into<Arc<str>>,
) -> Router {
    Router::new()
        .route(
            "/api/v1/applications/:application_id/document",
            get(document_handler),
        )
        .with_state(DocumentRouteState::new(generator, base_uri))
}

pub(crate) async fn document_handler(
    State(state): State<DocumentRouteState>,
    Path(application_id): Path<String>,
) -> Response {
    let id = match ApplicationId::parse(&application_id) {
        Ok(id) => id,
        Err(error) => {
            let payload = json!({
                "application_id": application_id,
                "error": format!("invalid application id: {error}"),
            });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    // Rendering and pdf conversion touch the filesystem and external processes.
    let DocumentRouteState {
        generator,
        base_uri,
    } = state;
    let generated =
        tokio::task::spawn_blocking(move || generator.generate(&id, &base_uri)).await;

    match generated {
        Ok(Ok(Some(bytes))) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/pdf")],
            bytes,
        )
            .into_response(),
        Ok(Ok(None)) => {
            let payload = json!({
                "application_id": id.to_string(),
                "error": "no document available",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Ok(Err(other)) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        Err(join_error) => {
            error!(application_id = %id, %join_error, "document generation task failed");
            let payload = json!({
                "application_id": id.to_string(),
                "error": "document generation failed",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
