//! Event API interface and the in-process implementation

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use autoops_core::{EventDetail, EventStore, EventsResponse, OverrideRequest, OverrideResponse};

use crate::error::ClientResult;

/// Access to the event store, local or remote
#[async_trait]
pub trait EventApi: Send + Sync {
    /// Backend name, for logging
    fn name(&self) -> &str;

    /// Fetch the summary list of all events
    async fn list_events(&self) -> ClientResult<EventsResponse>;

    /// Fetch one event with its decision
    async fn get_event_detail(&self, event_id: &str) -> ClientResult<EventDetail>;

    /// Submit a human override for an event's decision
    async fn override_decision(
        &self,
        event_id: &str,
        request: &OverrideRequest,
    ) -> ClientResult<OverrideResponse>;
}

/// Event API backed by an in-process store
pub struct LocalEventApi {
    store: Arc<EventStore>,
}

impl LocalEventApi {
    pub fn new(store: Arc<EventStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<EventStore> {
        &self.store
    }
}

#[async_trait]
impl EventApi for LocalEventApi {
    fn name(&self) -> &str {
        "local"
    }

    async fn list_events(&self) -> ClientResult<EventsResponse> {
        Ok(EventsResponse {
            events: self.store.list()?,
        })
    }

    async fn get_event_detail(&self, event_id: &str) -> ClientResult<EventDetail> {
        Ok(self.store.get(event_id)?)
    }

    async fn override_decision(
        &self,
        event_id: &str,
        request: &OverrideRequest,
    ) -> ClientResult<OverrideResponse> {
        Ok(self.store.apply_override(event_id, request)?)
    }
}

/// Run a read, retrying up to `retries` more times on retryable errors
pub async fn read_with_retry<T, F, Fut>(operation: &str, retries: u32, mut read: F) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    let mut attempt = 0;
    loop {
        match read().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < retries => {
                attempt += 1;
                tracing::warn!(operation, attempt, error = %e, "Read failed, retrying");
            }
            Err(e) => return Err(e),
        }
    }
}
