//! Supervisor integration for shift-missing intake
//!
//! The supervisor is an external decision agent reached over a webhook. It
//! receives the uncovered shift and returns a replacement recommendation.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use autoops_core::{Alternative, AutoOpsError, Decision, Result};

/// Payload sent to the supervisor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftMissingRequest {
    pub shift_id: String,
    pub missing_employee_id: String,
}

/// A candidate the supervisor considered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorCandidate {
    #[serde(alias = "employee_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// Recommendation returned by the supervisor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorRecommendation {
    #[serde(default)]
    pub replacement_employee_id: Option<String>,
    #[serde(default)]
    pub replacement_employee_name: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: Vec<String>,
    #[serde(default)]
    pub policy: Option<String>,
    #[serde(default)]
    pub all_candidates: Vec<SupervisorCandidate>,
}

impl SupervisorRecommendation {
    /// Turn the recommendation into a decision record.
    ///
    /// Candidates become alternatives; the one matching the replacement is
    /// marked selected.
    pub fn into_decision(self, shift_id: &str) -> Decision {
        let action = match (&self.replacement_employee_name, &self.replacement_employee_id) {
            (Some(name), _) => format!("Assigned replacement: {}", name),
            (None, Some(id)) => format!("Assigned replacement: {}", id),
            (None, None) => "No replacement found".to_string(),
        };

        let mut decision = Decision::new(action, self.reasoning.join(" "));
        decision.policy = self.policy;
        decision.shift_id = Some(shift_id.into());

        for candidate in self.all_candidates {
            let mut alternative = Alternative::new(
                candidate.id.clone(),
                if candidate.name.is_empty() {
                    candidate.id.clone()
                } else {
                    candidate.name
                },
                candidate.score,
            );
            alternative.reasons = candidate.reasons;
            if self.replacement_employee_id.as_deref() == Some(candidate.id.as_str()) {
                alternative = alternative.selected();
            }
            decision = decision.with_alternative(alternative);
        }

        if decision.selected.is_none() {
            decision.selected = self.replacement_employee_name.or(self.replacement_employee_id);
        }
        decision
    }
}

/// Supervisor interface
#[async_trait]
pub trait Supervisor: Send + Sync {
    /// Backend name (for logging)
    fn name(&self) -> &str;

    /// Ask for a replacement for the uncovered shift
    async fn recommend(&self, request: &ShiftMissingRequest) -> Result<SupervisorRecommendation>;
}

/// Supervisor reached through an HTTP webhook
pub struct WebhookSupervisor {
    url: String,
    http_client: reqwest::Client,
}

impl WebhookSupervisor {
    /// Create a webhook supervisor with the given request timeout
    pub fn new(url: impl Into<String>, timeout_ms: u64) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| AutoOpsError::InternalError {
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            url: url.into(),
            http_client,
        })
    }
}

#[async_trait]
impl Supervisor for WebhookSupervisor {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn recommend(&self, request: &ShiftMissingRequest) -> Result<SupervisorRecommendation> {
        tracing::info!(
            "Calling supervisor for shift_id={}, missing_employee={}",
            request.shift_id,
            request.missing_employee_id
        );

        let response = self
            .http_client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    "Supervisor timed out".to_string()
                } else {
                    format!("Supervisor request failed: {}", e)
                };
                AutoOpsError::SupervisorFailed { reason }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Supervisor HTTP error: {} - {}", status.as_u16(), body);
            return Err(AutoOpsError::SupervisorFailed {
                reason: format!("Supervisor failed with status {}", status.as_u16()),
            });
        }

        let recommendation: SupervisorRecommendation =
            response.json().await.map_err(|e| AutoOpsError::SupervisorFailed {
                reason: format!("Malformed supervisor response: {}", e),
            })?;

        tracing::info!(
            "Supervisor succeeded: replacement={:?}, confidence={}",
            recommendation.replacement_employee_id,
            recommendation.confidence
        );
        Ok(recommendation)
    }
}
