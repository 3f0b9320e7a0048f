//! Event, decision and override data model
//!
//! These types mirror the JSON shapes exchanged between the console and the
//! AutoOps API. Field names follow the wire format exactly.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AutoOpsError, Result};

/// Minimum number of characters an override justification must contain
pub const MIN_OVERRIDE_REASON_CHARS: usize = 10;

/// Category tag of an operational event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ShiftCoverage,
    PayoutApproval,
    Onboarding,
    FeedbackProcessing,
    /// Anything the upstream system did not classify
    #[default]
    #[serde(other)]
    Unclassified,
}

impl EventType {
    /// All tags in display order
    pub const ALL: [EventType; 5] = [
        EventType::ShiftCoverage,
        EventType::PayoutApproval,
        EventType::Onboarding,
        EventType::FeedbackProcessing,
        EventType::Unclassified,
    ];

    /// Wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ShiftCoverage => "shift_coverage",
            EventType::PayoutApproval => "payout_approval",
            EventType::Onboarding => "onboarding",
            EventType::FeedbackProcessing => "feedback_processing",
            EventType::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Resolved,
    Pending,
    NeedsReview,
}

impl EventStatus {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Resolved => "Resolved",
            EventStatus::Pending => "Pending",
            EventStatus::NeedsReview => "Needs Review",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier of an upstream row, sent either as a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordRef {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Number(n) => write!(f, "{}", n),
            RecordRef::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordRef {
    fn from(value: i64) -> Self {
        RecordRef::Number(value)
    }
}

impl From<&str> for RecordRef {
    fn from(value: &str) -> Self {
        RecordRef::Text(value.to_string())
    }
}

/// An operational occurrence requiring visibility or action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier
    pub id: String,

    /// Category tag
    #[serde(rename = "type", default)]
    pub event_type: EventType,

    /// Human-readable summary
    pub summary: String,

    /// Current status
    pub status: EventStatus,

    /// When the event occurred
    pub timestamp: DateTime<Utc>,

    /// Associated employee name
    pub employee: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<RecordRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<RecordRef>,

    /// Scheduled date, as provided upstream
    #[serde(default)]
    pub shift_date: String,

    /// Scheduled time, as provided upstream
    #[serde(default)]
    pub shift_time: String,
}

impl Event {
    /// Create a pending event with the given identity
    pub fn new(
        id: impl Into<String>,
        event_type: EventType,
        summary: impl Into<String>,
        employee: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            event_type,
            summary: summary.into(),
            status: EventStatus::Pending,
            timestamp: Utc::now(),
            employee: employee.into(),
            employee_id: None,
            shift_id: None,
            shift_date: String::new(),
            shift_time: String::new(),
        }
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_shift(
        mut self,
        shift_id: impl Into<RecordRef>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        self.shift_id = Some(shift_id.into());
        self.shift_date = date.into();
        self.shift_time = time.into();
        self
    }

    pub fn with_employee_id(mut self, employee_id: impl Into<RecordRef>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// "date time" as shown in the scheduled column
    pub fn scheduled(&self) -> String {
        format!("{} {}", self.shift_date, self.shift_time).trim().to_string()
    }
}

/// One candidate option considered when producing a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub id: String,
    pub name: String,
    pub score: f64,
    pub selected: bool,
    /// Why the candidate was included (if selected) or excluded (if not)
    #[serde(default)]
    pub reasons: Vec<String>,
}

impl Alternative {
    pub fn new(id: impl Into<String>, name: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            score,
            selected: false,
            reasons: Vec::new(),
        }
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }

    /// Reasons supporting inclusion; empty for unselected candidates
    pub fn supporting_reasons(&self) -> &[String] {
        if self.selected {
            &self.reasons
        } else {
            &[]
        }
    }

    /// Reasons explaining exclusion; empty for the selected candidate
    pub fn exclusion_reasons(&self) -> &[String] {
        if self.selected {
            &[]
        } else {
            &self.reasons
        }
    }
}

/// Audit record attached to a decision when a human overrides it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideRecord {
    pub override_id: Uuid,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_selection: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_selection: Option<usize>,
    pub overridden_at: DateTime<Utc>,
}

/// The automated system's recorded choice for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordRef>,

    /// Chosen action label
    pub action: String,

    /// Policy identifier used to reach the decision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,

    /// Label of the selected alternative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,

    /// Free-text justification
    pub reason: String,

    /// Ranked candidates
    #[serde(default)]
    pub alternatives: Vec<Alternative>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<RecordRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(rename = "override", default, skip_serializing_if = "Option::is_none")]
    pub override_record: Option<OverrideRecord>,
}

impl Decision {
    pub fn new(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: None,
            action: action.into(),
            policy: None,
            selected: None,
            reason: reason.into(),
            alternatives: Vec::new(),
            shift_id: None,
            role: None,
            override_record: None,
        }
    }

    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    /// Append a candidate; a selected candidate also sets `selected`
    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        if alternative.selected {
            self.selected = Some(alternative.name.clone());
        }
        self.alternatives.push(alternative);
        self
    }

    /// The first alternative flagged as selected
    pub fn selected_alternative(&self) -> Option<&Alternative> {
        self.alternatives.iter().find(|a| a.selected)
    }

    /// Index of the first alternative flagged as selected
    pub fn selected_index(&self) -> Option<usize> {
        self.alternatives.iter().position(|a| a.selected)
    }

    pub fn selected_count(&self) -> usize {
        self.alternatives.iter().filter(|a| a.selected).count()
    }

    /// Check that exactly one alternative is selected.
    ///
    /// A decision without alternatives is accepted.
    pub fn validate_selection(&self) -> Result<()> {
        if self.alternatives.is_empty() {
            return Ok(());
        }
        match self.selected_count() {
            1 => Ok(()),
            n => Err(AutoOpsError::InvalidDecision {
                reason: format!(
                    "expected exactly one selected alternative, found {} of {}",
                    n,
                    self.alternatives.len()
                ),
            }),
        }
    }

    /// Record a human override on this decision.
    ///
    /// When `new_selection` is given the alternative at that index becomes
    /// the only selected one and `selected` takes its name.
    pub fn apply_override(
        &mut self,
        reason: &str,
        new_selection: Option<usize>,
        at: DateTime<Utc>,
    ) -> Result<OverrideRecord> {
        validate_override_reason(reason)?;

        let previous_selection = self.selected_index();
        if let Some(index) = new_selection {
            if index >= self.alternatives.len() {
                return Err(AutoOpsError::SelectionOutOfRange {
                    index,
                    available: self.alternatives.len(),
                });
            }
            for (i, alt) in self.alternatives.iter_mut().enumerate() {
                alt.selected = i == index;
            }
            self.selected = Some(self.alternatives[index].name.clone());
        }

        let record = OverrideRecord {
            override_id: Uuid::new_v4(),
            reason: reason.to_string(),
            previous_selection,
            new_selection,
            overridden_at: at,
        };
        self.override_record = Some(record.clone());
        Ok(record)
    }
}

/// An event together with its decision, if one was recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetail {
    pub event: Event,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
}

/// Response body of the event list endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

/// Body of an override submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRequest {
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_selection: Option<usize>,
}

impl OverrideRequest {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            new_selection: None,
        }
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.new_selection = Some(index);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_override_reason(&self.reason)
    }
}

/// Response body of a successful override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideResponse {
    pub success: bool,
    pub event_id: String,
    pub overridden_at: DateTime<Utc>,
}

/// Reject justifications shorter than [`MIN_OVERRIDE_REASON_CHARS`] characters
pub fn validate_override_reason(reason: &str) -> Result<()> {
    let actual = reason.chars().count();
    if actual < MIN_OVERRIDE_REASON_CHARS {
        return Err(AutoOpsError::ReasonTooShort {
            minimum: MIN_OVERRIDE_REASON_CHARS,
            actual,
        });
    }
    Ok(())
}
