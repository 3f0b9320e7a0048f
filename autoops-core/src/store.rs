//! In-memory event store
//!
//! Holds events and their decisions in insertion order. Thread-safe via
//! RwLock; the API server shares one store across handlers.
//!
//! # Example
//!
//! ```rust
//! use autoops_core::store::EventStore;
//! use autoops_core::model::OverrideRequest;
//!
//! let store = EventStore::demo();
//! let first = store.list().unwrap()[0].id.clone();
//! let response = store
//!     .apply_override(&first, &OverrideRequest::new("Covered by the manager"))
//!     .unwrap();
//! assert!(response.success);
//! ```

use std::path::Path;
use std::sync::RwLock;

use chrono::{Duration, TimeZone, Utc};

use crate::error::{AutoOpsError, Result};
use crate::model::{
    Alternative, Decision, Event, EventDetail, EventStatus, EventType, OverrideRequest,
    OverrideResponse, RecordRef,
};

/// In-memory store of events and decisions
#[derive(Debug, Default)]
pub struct EventStore {
    records: RwLock<Vec<EventDetail>>,
}

impl EventStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create a store holding the given records, keeping their order.
    ///
    /// Later duplicates of an ID are rejected.
    pub fn from_records(records: Vec<EventDetail>) -> Result<Self> {
        let store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Load records from a JSON file containing an array of `{event, decision?}`
    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| AutoOpsError::IoError {
            message: format!("Failed to read seed file '{}': {}", path.display(), e),
        })?;
        let records: Vec<EventDetail> = serde_json::from_str(&content)?;
        Self::from_records(records)
    }

    /// Add a new record
    pub fn insert(&self, record: EventDetail) -> Result<()> {
        let mut records = self.records.write().map_err(|_| AutoOpsError::StoreLocked)?;
        if records.iter().any(|r| r.event.id == record.event.id) {
            return Err(AutoOpsError::EventAlreadyExists {
                event_id: record.event.id,
            });
        }
        records.push(record);
        Ok(())
    }

    /// All events, in insertion order
    pub fn list(&self) -> Result<Vec<Event>> {
        let records = self.records.read().map_err(|_| AutoOpsError::StoreLocked)?;
        Ok(records.iter().map(|r| r.event.clone()).collect())
    }

    /// One event with its decision
    pub fn get(&self, event_id: &str) -> Result<EventDetail> {
        let records = self.records.read().map_err(|_| AutoOpsError::StoreLocked)?;
        records
            .iter()
            .find(|r| r.event.id == event_id)
            .cloned()
            .ok_or_else(|| AutoOpsError::EventNotFound {
                event_id: event_id.to_string(),
            })
    }

    /// Apply a human override to an event's decision.
    ///
    /// The event becomes `resolved` and the decision carries an override
    /// record. Nothing changes if validation fails.
    pub fn apply_override(
        &self,
        event_id: &str,
        request: &OverrideRequest,
    ) -> Result<OverrideResponse> {
        request.validate()?;

        let mut records = self.records.write().map_err(|_| AutoOpsError::StoreLocked)?;
        let record = records
            .iter_mut()
            .find(|r| r.event.id == event_id)
            .ok_or_else(|| AutoOpsError::EventNotFound {
                event_id: event_id.to_string(),
            })?;

        let decision = record.decision.as_mut().ok_or_else(|| AutoOpsError::NoDecision {
            event_id: event_id.to_string(),
        })?;

        let now = Utc::now();
        decision.apply_override(&request.reason, request.new_selection, now)?;
        record.event.status = EventStatus::Resolved;

        Ok(OverrideResponse {
            success: true,
            event_id: event_id.to_string(),
            overridden_at: now,
        })
    }

    /// Number of stored events
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the store lock is usable
    pub fn health_check(&self) -> Result<()> {
        let _records = self.records.read().map_err(|_| AutoOpsError::StoreLocked)?;
        Ok(())
    }

    /// A small store with one event per category, used when no seed file is given
    pub fn demo() -> Self {
        let base = Utc
            .with_ymd_and_hms(2026, 3, 2, 6, 15, 0)
            .single()
            .unwrap_or_else(Utc::now);

        let coverage = EventDetail {
            event: Event::new(
                "evt_1001",
                EventType::ShiftCoverage,
                "Callout: front desk morning shift",
                "Jane Doe",
            )
            .with_employee_id(1)
            .with_shift(42, "2026-03-02", "07:00-15:00")
            .with_status(EventStatus::Resolved)
            .with_timestamp(base),
            decision: Some(Decision {
                id: Some(RecordRef::Number(50001)),
                shift_id: Some(RecordRef::Number(42)),
                role: Some("front_desk".to_string()),
                ..Decision::new(
                    "Assigned replacement: Alex Kim",
                    "Alex is available for the full window and has the highest reliability score.",
                )
                .with_policy("shift_coverage_v1.2")
                .with_alternative(
                    Alternative::new("emp_002", "Alex Kim", 0.84)
                        .selected()
                        .with_reason("available during shift window")
                        .with_reason("highest reliability score (4.8/5.0)"),
                )
                .with_alternative(
                    Alternative::new("emp_007", "Sam Lee", 0.61)
                        .with_reason("already scheduled within 12 hours"),
                )
                .with_alternative(
                    Alternative::new("emp_011", "Priya Nair", 0.0)
                        .with_reason("unavailable: approved leave"),
                )
            }),
        };

        let payout = EventDetail {
            event: Event::new(
                "evt_1002",
                EventType::PayoutApproval,
                "Overtime payout request",
                "Ray Ortiz",
            )
            .with_employee_id(4)
            .with_timestamp(base + Duration::minutes(20)),
            decision: Some(
                Decision::new(
                    "Held for manager review",
                    "Requested amount exceeds the automatic approval limit.",
                )
                .with_policy("payout_approval_v0.9")
                .with_alternative(
                    Alternative::new("hold", "Hold for review", 0.72)
                        .selected()
                        .with_reason("amount above auto-approve limit"),
                )
                .with_alternative(
                    Alternative::new("approve", "Approve automatically", 0.28)
                        .with_reason("limit exceeded"),
                ),
            ),
        };

        let onboarding = EventDetail {
            event: Event::new(
                "evt_1003",
                EventType::Onboarding,
                "New hire documents incomplete",
                "Lee Park",
            )
            .with_status(EventStatus::NeedsReview)
            .with_timestamp(base + Duration::minutes(45)),
            decision: None,
        };

        let feedback = EventDetail {
            event: Event::new(
                "evt_1004",
                EventType::FeedbackProcessing,
                "Customer feedback routed to team lead",
                "Ana Silva",
            )
            .with_status(EventStatus::Resolved)
            .with_timestamp(base + Duration::hours(1)),
            decision: Some(
                Decision::new("Routed to team lead", "Feedback mentions a named employee.")
                    .with_policy("feedback_routing_v1.0"),
            ),
        };

        let store = Self::new();
        if let Ok(mut records) = store.records.write() {
            records.extend([coverage, payout, onboarding, feedback]);
        }
        store
    }
}
