//! HTTP route handlers

mod events;
mod intake;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;

use autoops_core::AutoOpsError;

use crate::AppState;

pub use intake::{IntakeResponse, ShiftMissingEvent};

/// Error returned by handlers, rendered as `{error: {code, message, category, recoverable}}`
#[derive(Debug)]
pub struct ApiError(pub AutoOpsError);

impl From<AutoOpsError> for ApiError {
    fn from(err: AutoOpsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!("{}", self.0);
        } else {
            tracing::debug!("{}", self.0);
        }
        (status, Json(self.0.to_error_response())).into_response()
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    state.store.health_check()?;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        service: "autoops-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// Service info response
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<String>,
}

/// Root endpoint - API info
async fn root() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "AutoOps API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Automated operations decisions with human override".to_string(),
        endpoints: vec![
            "GET  /health".to_string(),
            "GET  /api/events".to_string(),
            "GET  /api/events/:id".to_string(),
            "POST /api/events/:id/override".to_string(),
            "POST /api/intake/shift-missing".to_string(),
        ],
    })
}

/// Create the router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/events", get(events::list_events))
        .route("/api/events/:event_id", get(events::get_event))
        .route("/api/events/:event_id/override", post(events::override_decision))
        .route("/api/intake/shift-missing", post(intake::shift_missing))
        .with_state(state)
}
