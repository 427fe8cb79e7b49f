use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::error;

use super::service::{AllocationError, AllocationService};
use super::store::{AgentDirectory, CaseStore};

/// Router builder exposing the allocation trigger endpoint.
pub fn allocation_router<S, D>(service: Arc<AllocationService<S, D>>) -> Router
where
    S: CaseStore + 'static,
    D: AgentDirectory + 'static,
{
    Router::new()
        .route("/api/v1/allocate", post(allocate_handler::<S, D>))
        .with_state(service)
}

pub(crate) async fn allocate_handler<S, D>(
    State(service): State<Arc<AllocationService<S, D>>>,
) -> Response
where
    S: CaseStore + 'static,
    D: AgentDirectory + 'static,
{
    match service.run() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(AllocationError::NoEligibleAgents) => {
            let payload = json!({
                "error": "No active agents available for assignment.",
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(AllocationError::Store(store_error)) => {
            error!(%store_error, "allocation run failed at the store");
            let payload = json!({
                "error": "Allocation failed",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
