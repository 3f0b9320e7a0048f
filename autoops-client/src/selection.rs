//! Current event selection and the stale-response guard

/// Identifies the selection a detail fetch was started for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTicket {
    generation: u64,
    event_id: String,
}

impl SelectionTicket {
    pub fn event_id(&self) -> &str {
        &self.event_id
    }
}

/// The event currently selected in the console.
///
/// Every change of selection bumps a generation counter. A detail response
/// may only be displayed if the ticket taken when its fetch started is still
/// current, so a slow response for an earlier selection never overwrites the
/// detail of the event the user has since moved to.
#[derive(Debug, Default)]
pub struct Selection {
    current: Option<String>,
    generation: u64,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an event. Returns true if the selection changed.
    pub fn select(&mut self, event_id: impl Into<String>) -> bool {
        let event_id = event_id.into();
        if self.current.as_deref() == Some(event_id.as_str()) {
            return false;
        }
        self.current = Some(event_id);
        self.generation += 1;
        true
    }

    /// Clear the selection. Returns true if something was selected.
    pub fn clear(&mut self) -> bool {
        if self.current.take().is_some() {
            self.generation += 1;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ticket for the current selection, if any
    pub fn ticket(&self) -> Option<SelectionTicket> {
        self.current.as_ref().map(|event_id| SelectionTicket {
            generation: self.generation,
            event_id: event_id.clone(),
        })
    }

    pub fn is_current(&self, ticket: &SelectionTicket) -> bool {
        ticket.generation == self.generation
            && self.current.as_deref() == Some(ticket.event_id.as_str())
    }
}
