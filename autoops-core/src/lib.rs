//! # AutoOps Core
//!
//! Shared data model for the AutoOps manager console:
//!
//! - **Events**: operational occurrences (shift callouts, payout approvals,
//!   onboarding, feedback) listed in the ops inbox
//! - **Decisions**: the automated choice recorded for an event, with ranked
//!   alternatives and their reasons
//! - **Overrides**: human corrections to a decision, with a mandatory
//!   justification of at least ten characters
//!
//! The crate also provides the inbox filter and an in-memory event store used
//! by the API server.
//!
//! ## Example
//!
//! ```rust
//! use autoops_core::{filter_events, EventStore, EventType, FilterKey};
//!
//! let store = EventStore::demo();
//! let events = store.list().unwrap();
//!
//! let coverage = filter_events(&events, FilterKey::Type(EventType::ShiftCoverage));
//! assert!(coverage.iter().all(|e| e.event_type == EventType::ShiftCoverage));
//!
//! let detail = store.get(&coverage[0].id).unwrap();
//! let decision = detail.decision.unwrap();
//! assert_eq!(decision.selected_count(), 1);
//! ```

pub mod error;
pub mod filter;
pub mod model;
pub mod store;

pub use error::{AutoOpsError, ErrorCategory, ErrorResponse, Result};
pub use filter::{filter_events, FilterKey};
pub use model::{
    validate_override_reason, Alternative, Decision, Event, EventDetail, EventStatus, EventType,
    EventsResponse, OverrideRecord, OverrideRequest, OverrideResponse, RecordRef,
    MIN_OVERRIDE_REASON_CHARS,
};
pub use store::EventStore;
