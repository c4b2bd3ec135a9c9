use crate::infra::{AppState, InMemoryBlobStore, InMemoryRewardsStore, StaticTokenAuthenticator};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use plastiside::rewards::{
    bearer_token, rewards_router, AccessError, BlobStore, Operation, RewardsStack,
};
use serde_json::json;
use std::sync::Arc;

/// State for the upload glue: the gate authorizes, the blob store keeps the
/// bytes, and only the returned reference travels onward.
#[derive(Clone)]
pub(crate) struct UploadState {
    pub(crate) stack: Arc<RewardsStack<StaticTokenAuthenticator, InMemoryRewardsStore>>,
    pub(crate) blobs: Arc<InMemoryBlobStore>,
}

pub(crate) fn with_rewards_routes(state: UploadState) -> axum::Router {
    let uploads = axum::Router::new()
        .route(
            "/api/v1/uploads/:file_name",
            axum::routing::post(upload_photo_endpoint),
        )
        .with_state(state.clone());

    rewards_router(state.stack)
        .merge(uploads)
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

pub(crate) async fn upload_photo_endpoint(
    State(state): State<UploadState>,
    Path(file_name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    match state
        .stack
        .gate
        .authorize(bearer_token(&headers), Operation::UploadPhoto)
    {
        Ok(_) => {}
        Err(AccessError::Unauthenticated) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "authentication required" })),
            )
                .into_response()
        }
        Err(AccessError::Forbidden) => {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "forbidden" })),
            )
                .into_response()
        }
        Err(AccessError::Store(err)) => {
            tracing::error!(error = %err, "upload authorization failed on the datastore");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response();
        }
    }

    if body.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "no file content provided" })),
        )
            .into_response();
    }

    match state.blobs.store(&file_name, &body) {
        Ok(blob) => (StatusCode::CREATED, Json(blob)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "photo upload failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response()
        }
    }
}
