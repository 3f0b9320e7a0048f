//! Inbox filtering
//!
//! Filtering is a pure derivation over an already-fetched event list: it
//! never reorders or mutates the input.

use std::fmt;
use std::str::FromStr;

use crate::error::AutoOpsError;
use crate::model::{Event, EventType};

/// Active inbox filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterKey {
    /// Every event passes
    #[default]
    All,
    /// Only events of the given category
    Type(EventType),
}

impl FilterKey {
    /// Filter chips offered by the inbox, in order
    pub const CHIPS: [FilterKey; 5] = [
        FilterKey::All,
        FilterKey::Type(EventType::ShiftCoverage),
        FilterKey::Type(EventType::PayoutApproval),
        FilterKey::Type(EventType::Onboarding),
        FilterKey::Type(EventType::FeedbackProcessing),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::All => "all",
            FilterKey::Type(t) => t.as_str(),
        }
    }

    /// Short chip label
    pub fn label(&self) -> &'static str {
        match self {
            FilterKey::All => "All",
            FilterKey::Type(EventType::ShiftCoverage) => "Coverage",
            FilterKey::Type(EventType::PayoutApproval) => "Payout",
            FilterKey::Type(EventType::Onboarding) => "Onboarding",
            FilterKey::Type(EventType::FeedbackProcessing) => "Feedback",
            FilterKey::Type(EventType::Unclassified) => "Unclassified",
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        match self {
            FilterKey::All => true,
            FilterKey::Type(t) => event.event_type == *t,
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = AutoOpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(FilterKey::All);
        }
        EventType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .map(|t| FilterKey::Type(*t))
            .ok_or_else(|| AutoOpsError::InvalidFilter {
                key: s.to_string(),
            })
    }
}

/// Events matching `key`, in their original relative order
pub fn filter_events(events: &[Event], key: FilterKey) -> Vec<&Event> {
    events.iter().filter(|e| key.matches(e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventStatus;

    fn inbox() -> Vec<Event> {
        vec![
            Event::new("E1", EventType::ShiftCoverage, "Callout", "Jane Doe")
                .with_shift(42, "2026-03-02", "07:00"),
            Event::new("E2", EventType::PayoutApproval, "Payout", "Ray"),
            Event::new("E3", EventType::ShiftCoverage, "Callout", "Ana")
                .with_status(EventStatus::Resolved),
            Event::new("E4", EventType::Unclassified, "Misc", "Bo"),
        ]
    }

    fn ids(events: &[&Event]) -> Vec<String> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_all_passes_everything_in_order() {
        let events = inbox();
        assert_eq!(
            ids(&filter_events(&events, FilterKey::All)),
            vec!["E1", "E2", "E3", "E4"]
        );
    }

    #[test]
    fn test_type_filter_preserves_order() {
        let events = inbox();
        let coverage = filter_events(&events, FilterKey::Type(EventType::ShiftCoverage));
        assert_eq!(ids(&coverage), vec!["E1", "E3"]);

        let payout = filter_events(&events, FilterKey::Type(EventType::PayoutApproval));
        assert_eq!(ids(&payout), vec!["E2"]);
        assert!(!ids(&payout).contains(&"E1".to_string()));
    }

    #[test]
    fn test_every_key_returns_only_matching_events() {
        let events = inbox();
        for key in FilterKey::CHIPS {
            for event in filter_events(&events, key) {
                assert!(key == FilterKey::All || FilterKey::Type(event.event_type) == key);
            }
        }
        assert!(filter_events(&events, FilterKey::Type(EventType::Onboarding)).is_empty());
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("all".parse::<FilterKey>().unwrap(), FilterKey::All);
        assert_eq!(
            "feedback_processing".parse::<FilterKey>().unwrap(),
            FilterKey::Type(EventType::FeedbackProcessing)
        );
        assert!("payouts".parse::<FilterKey>().is_err());
        assert_eq!(FilterKey::Type(EventType::ShiftCoverage).label(), "Coverage");
    }
}
