//! Shift-missing intake route

use std::sync::Arc;

use axum::{extract::State, response::Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use autoops_core::{AutoOpsError, Decision, Event, EventDetail, EventStatus, EventType};

use super::ApiError;
use crate::supervisor::ShiftMissingRequest;
use crate::AppState;

/// Incoming shift-missing event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftMissingEvent {
    #[serde(default = "default_event_type")]
    pub event_type: String,
    pub shift_id: String,
    pub missing_employee_id: String,
}

fn default_event_type() -> String {
    "shift_missing".to_string()
}

/// Intake response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeResponse {
    pub event_id: String,
    pub replacement_employee_id: Option<String>,
    pub confidence: f64,
    pub reasoning: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl ShiftMissingEvent {
    fn validate(&self) -> Result<(), AutoOpsError> {
        if self.event_type != "shift_missing" {
            return Err(AutoOpsError::InvalidIntake {
                reason: format!("unsupported event_type '{}'", self.event_type),
            });
        }
        if self.shift_id.trim().is_empty() || self.missing_employee_id.trim().is_empty() {
            return Err(AutoOpsError::InvalidIntake {
                reason: "shift_id and missing_employee_id are required".to_string(),
            });
        }
        Ok(())
    }
}

/// Record a shift-missing event and the supervisor's recommendation
pub async fn shift_missing(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ShiftMissingEvent>,
) -> Result<Json<IntakeResponse>, ApiError> {
    req.validate()?;

    let supervisor = state
        .supervisor
        .as_ref()
        .ok_or(AutoOpsError::SupervisorUnavailable)?;

    tracing::info!(
        "Received shift_missing event: shift_id={}, missing_employee={}",
        req.shift_id,
        req.missing_employee_id
    );

    let event_id = format!("evt_{}", Uuid::new_v4().simple());
    let mut event = Event::new(
        event_id.clone(),
        EventType::ShiftCoverage,
        format!("Callout: shift {}", req.shift_id),
        req.missing_employee_id.clone(),
    )
    .with_employee_id(req.missing_employee_id.as_str())
    .with_timestamp(Utc::now());
    event.shift_id = Some(req.shift_id.as_str().into());

    let request = ShiftMissingRequest {
        shift_id: req.shift_id.clone(),
        missing_employee_id: req.missing_employee_id.clone(),
    };

    let (decision, response) = match supervisor.recommend(&request).await {
        Ok(rec) => {
            event.status = if rec.replacement_employee_id.is_some() {
                EventStatus::Resolved
            } else {
                EventStatus::NeedsReview
            };
            let response = IntakeResponse {
                event_id: event_id.clone(),
                replacement_employee_id: rec.replacement_employee_id.clone(),
                confidence: rec.confidence,
                reasoning: rec.reasoning.clone(),
                error: false,
            };
            (rec.into_decision(&req.shift_id), response)
        }
        Err(err) => {
            tracing::error!("Supervisor '{}' failed: {}", supervisor.name(), err);
            event.status = EventStatus::NeedsReview;
            let reason = err.to_string();
            let mut decision = Decision::new("Escalated to manager", reason.clone());
            decision.shift_id = Some(req.shift_id.as_str().into());
            let response = IntakeResponse {
                event_id: event_id.clone(),
                replacement_employee_id: None,
                confidence: 0.0,
                reasoning: vec![reason],
                error: true,
            };
            (decision, response)
        }
    };

    state.store.insert(EventDetail {
        event,
        decision: Some(decision),
    })?;

    Ok(Json(response))
}
