//! Event, decision and override routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
};

use autoops_core::{EventDetail, EventsResponse, OverrideRequest, OverrideResponse};

use super::ApiError;
use crate::AppState;

/// List all events
pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EventsResponse>, ApiError> {
    let events = state.store.list()?;
    Ok(Json(EventsResponse { events }))
}

/// Get one event and its decision
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<EventDetail>, ApiError> {
    Ok(Json(state.store.get(&event_id)?))
}

/// Override an event's decision
pub async fn override_decision(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Json(req): Json<OverrideRequest>,
) -> Result<Json<OverrideResponse>, ApiError> {
    let response = state.store.apply_override(&event_id, &req)?;

    tracing::info!(
        event_id = %event_id,
        new_selection = ?req.new_selection,
        "Decision overridden"
    );

    Ok(Json(response))
}
