//! Override workflow state machine

use autoops_core::{validate_override_reason, OverrideRequest, OverrideResponse};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Where an override for one event stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideState {
    /// No override form open
    Idle,
    /// Manager is writing a justification
    Composing,
    /// Request in flight
    Submitting,
}

/// Result of the most recent submission attempt
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideOutcome {
    /// Rejected locally before any request was sent
    Rejected(String),
    /// The server accepted the override
    Succeeded(OverrideResponse),
    /// The request failed; the form stays open with the reason kept
    Failed(String),
}

/// Override workflow for a single event.
///
/// `Idle -> Composing` on open, `Composing -> Submitting` on a valid submit,
/// then back to `Idle` on success or `Composing` on failure. Cancel returns
/// to `Idle` from `Composing` and discards the draft.
#[derive(Debug, Clone)]
pub struct OverrideWorkflow {
    event_id: String,
    state: OverrideState,
    reason: String,
    new_selection: Option<usize>,
    last_outcome: Option<OverrideOutcome>,
}

impl OverrideWorkflow {
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            state: OverrideState::Idle,
            reason: String::new(),
            new_selection: None,
            last_outcome: None,
        }
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn state(&self) -> OverrideState {
        self.state
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn new_selection(&self) -> Option<usize> {
        self.new_selection
    }

    pub fn last_outcome(&self) -> Option<&OverrideOutcome> {
        self.last_outcome.as_ref()
    }

    /// Open the override form. Opening an already open form is a no-op.
    pub fn open(&mut self) -> ClientResult<()> {
        match self.state {
            OverrideState::Idle => {
                self.state = OverrideState::Composing;
                self.last_outcome = None;
                Ok(())
            }
            OverrideState::Composing => Ok(()),
            OverrideState::Submitting => Err(ClientError::SubmitInProgress(self.event_id.clone())),
        }
    }

    /// Replace the draft justification
    pub fn set_reason(&mut self, reason: impl Into<String>) -> ClientResult<()> {
        self.require_composing("edit the reason")?;
        self.reason = reason.into();
        Ok(())
    }

    /// Choose which alternative the override should select
    pub fn set_selection(&mut self, index: Option<usize>) -> ClientResult<()> {
        self.require_composing("change the selection")?;
        self.new_selection = index;
        Ok(())
    }

    /// Whether submit is currently allowed
    pub fn can_submit(&self) -> bool {
        self.state == OverrideState::Composing && validate_override_reason(&self.reason).is_ok()
    }

    /// Close the form and discard the draft
    pub fn cancel(&mut self) -> ClientResult<()> {
        match self.state {
            OverrideState::Submitting => Err(ClientError::SubmitInProgress(self.event_id.clone())),
            _ => {
                self.state = OverrideState::Idle;
                self.reason.clear();
                self.new_selection = None;
                Ok(())
            }
        }
    }

    /// Validate the draft and move to `Submitting`, yielding the request to send.
    ///
    /// A short reason leaves the workflow in `Composing` and records a
    /// rejected outcome.
    pub fn begin_submit(&mut self) -> ClientResult<OverrideRequest> {
        match self.state {
            OverrideState::Submitting => {
                return Err(ClientError::SubmitInProgress(self.event_id.clone()))
            }
            OverrideState::Idle => {
                return Err(ClientError::InvalidState(format!(
                    "no override open for event '{}'",
                    self.event_id
                )))
            }
            OverrideState::Composing => {}
        }

        if let Err(e) = validate_override_reason(&self.reason) {
            let message = e.to_string();
            self.last_outcome = Some(OverrideOutcome::Rejected(message.clone()));
            return Err(ClientError::Validation(message));
        }

        self.state = OverrideState::Submitting;
        Ok(OverrideRequest {
            reason: self.reason.clone(),
            new_selection: self.new_selection,
        })
    }

    /// Record the result of the request started by [`begin_submit`](Self::begin_submit)
    pub fn complete(&mut self, result: &ClientResult<OverrideResponse>) {
        if self.state != OverrideState::Submitting {
            return;
        }

        match result {
            Ok(response) => {
                self.state = OverrideState::Idle;
                self.reason.clear();
                self.new_selection = None;
                self.last_outcome = Some(OverrideOutcome::Succeeded(response.clone()));
            }
            Err(e) => {
                self.state = OverrideState::Composing;
                self.last_outcome = Some(OverrideOutcome::Failed(e.to_string()));
            }
        }
    }

    fn require_composing(&self, action: &str) -> ClientResult<()> {
        match self.state {
            OverrideState::Composing => Ok(()),
            OverrideState::Submitting => Err(ClientError::SubmitInProgress(self.event_id.clone())),
            OverrideState::Idle => Err(ClientError::InvalidState(format!(
                "cannot {} before opening the override for '{}'",
                action, self.event_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn accepted(event_id: &str) -> ClientResult<OverrideResponse> {
        Ok(OverrideResponse {
            success: true,
            event_id: event_id.to_string(),
            overridden_at: Utc::now(),
        })
    }

    #[test]
    fn test_happy_path() {
        let mut wf = OverrideWorkflow::new("E1");
        assert_eq!(wf.state(), OverrideState::Idle);

        wf.open().unwrap();
        wf.set_reason("Employee called in sick").unwrap();
        wf.set_selection(Some(2)).unwrap();
        assert!(wf.can_submit());

        let request = wf.begin_submit().unwrap();
        assert_eq!(request.reason, "Employee called in sick");
        assert_eq!(request.new_selection, Some(2));
        assert_eq!(wf.state(), OverrideState::Submitting);

        wf.complete(&accepted("E1"));
        assert_eq!(wf.state(), OverrideState::Idle);
        assert_eq!(wf.reason(), "");
        assert!(matches!(wf.last_outcome(), Some(OverrideOutcome::Succeeded(_))));
    }

    #[test]
    fn test_short_reason_is_rejected_locally() {
        let mut wf = OverrideWorkflow::new("E1");
        wf.open().unwrap();
        wf.set_reason("too short").unwrap();
        assert!(!wf.can_submit());

        let err = wf.begin_submit().unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(wf.state(), OverrideState::Composing);
        assert!(matches!(wf.last_outcome(), Some(OverrideOutcome::Rejected(_))));
    }

    #[test]
    fn test_exactly_ten_chars_is_enough() {
        let mut wf = OverrideWorkflow::new("E1");
        wf.open().unwrap();
        wf.set_reason("0123456789").unwrap();
        assert!(wf.can_submit());
        assert!(wf.begin_submit().is_ok());
    }

    #[test]
    fn test_failure_keeps_reason() {
        let mut wf = OverrideWorkflow::new("E1");
        wf.open().unwrap();
        wf.set_reason("Manager approved swap").unwrap();
        wf.begin_submit().unwrap();

        wf.complete(&Err(ClientError::Server {
            status: 500,
            message: "boom".to_string(),
        }));
        assert_eq!(wf.state(), OverrideState::Composing);
        assert_eq!(wf.reason(), "Manager approved swap");
        assert!(matches!(wf.last_outcome(), Some(OverrideOutcome::Failed(_))));
        assert!(wf.can_submit());
    }

    #[test]
    fn test_no_double_submit() {
        let mut wf = OverrideWorkflow::new("E1");
        wf.open().unwrap();
        wf.set_reason("Manager approved swap").unwrap();
        wf.begin_submit().unwrap();

        assert!(matches!(wf.begin_submit(), Err(ClientError::SubmitInProgress(_))));
        assert!(matches!(wf.cancel(), Err(ClientError::SubmitInProgress(_))));
        assert!(matches!(wf.set_reason("x"), Err(ClientError::SubmitInProgress(_))));
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut wf = OverrideWorkflow::new("E1");
        wf.open().unwrap();
        wf.set_reason("Half written reason").unwrap();
        wf.cancel().unwrap();

        assert_eq!(wf.state(), OverrideState::Idle);
        assert_eq!(wf.reason(), "");
        assert!(matches!(wf.begin_submit(), Err(ClientError::InvalidState(_))));
    }
}
