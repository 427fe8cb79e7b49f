use crate::infra::{AppState, InMemoryAgentDirectory, InMemoryCaseStore, IntakeHandle};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use debtflow::workflows::allocation::{allocation_router, AllocationService};
use debtflow::workflows::intake::{CaseDraft, IntakeError};
use tracing::error;

#[derive(Debug, Deserialize)]
pub(crate) struct IngestRequest {
    pub(crate) cases: Vec<CaseDraft>,
}

pub(crate) fn with_allocation_routes(
    service: Arc<AllocationService<InMemoryCaseStore, InMemoryAgentDirectory>>,
) -> axum::Router {
    allocation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/cases/ingest",
            axum::routing::post(ingest_endpoint),
        )
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

pub(crate) async fn ingest_endpoint(
    Extension(intake): Extension<IntakeHandle>,
    Json(payload): Json<IngestRequest>,
) -> impl IntoResponse {
    match intake.0.ingest(payload.cases) {
        Ok(count) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "count": count,
                "message": format!("Successfully ingested and scored {count} cases."),
            })),
        ),
        Err(err @ IntakeError::InvalidAmount { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        ),
        Err(IntakeError::Store(store_error)) => {
            error!(%store_error, "case ingestion failed at the store");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Ingestion failed" })),
            )
        }
    }
}
