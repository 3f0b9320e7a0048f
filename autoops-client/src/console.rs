//! Manager console state
//!
//! Ties together the read cache, the event filter, the current selection
//! with its stale-response guard, and one override workflow per event.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use autoops_core::{filter_events, Event, EventDetail, EventStore, FilterKey, OverrideResponse};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::cache::{CacheEntry, CacheKey, CacheStats, CachedValue, QueryCache};
use crate::client::{read_with_retry, EventApi, LocalEventApi};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::selection::Selection;
use crate::transport::HttpEventApi;
use crate::workflow::{OverrideState, OverrideWorkflow};

/// Fetches a read makes when each result is superseded by an invalidation
const MAX_READ_ATTEMPTS: usize = 3;

/// Outcome of loading the selected event's detail
#[derive(Debug, Clone, PartialEq)]
pub enum DetailLoad {
    /// Fetched and now displayed
    Loaded(EventDetail),
    /// The selection changed while the fetch was in flight; nothing displayed
    Stale,
    /// No event is selected
    NothingSelected,
}

/// The manager console
pub struct Console {
    config: ClientConfig,

    client: Arc<dyn EventApi>,

    cache: Arc<QueryCache>,

    filter: RwLock<FilterKey>,

    selection: RwLock<Selection>,

    /// Detail shown for the current selection
    displayed: RwLock<Option<EventDetail>>,

    workflows: Mutex<HashMap<String, OverrideWorkflow>>,
}

impl Console {
    pub fn new(config: ClientConfig, client: Arc<dyn EventApi>) -> Self {
        let cache = Arc::new(QueryCache::new(config.cache.clone()));
        Self {
            config,
            client,
            cache,
            filter: RwLock::new(FilterKey::All),
            selection: RwLock::new(Selection::new()),
            displayed: RwLock::new(None),
            workflows: Mutex::new(HashMap::new()),
        }
    }

    /// Console talking to the API at `config.base_url`
    pub fn http(config: ClientConfig) -> ClientResult<Self> {
        let client = HttpEventApi::new(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    /// Console over an in-process store
    pub fn local(config: ClientConfig, store: Arc<EventStore>) -> Self {
        Self::new(config, Arc::new(LocalEventApi::new(store)))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    // Reads

    /// All events, from cache when fresh.
    ///
    /// A result that was in flight when the list got invalidated is not
    /// cached; the list is fetched again instead.
    pub async fn events(&self) -> ClientResult<Vec<Event>> {
        if let Some(events) = self.cache.get_events().await {
            return Ok(events);
        }

        let client = &self.client;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let version = self.cache.version(&CacheKey::Events).await;
            let response = read_with_retry("list_events", self.config.read_retries, move || {
                client.list_events()
            })
            .await?;

            tracing::debug!(count = response.events.len(), backend = client.name(), "Fetched events");
            let entry = CacheEntry::new(CachedValue::Events(response.events.clone()));
            if self.cache.set_if_current(CacheKey::Events, entry, version).await
                || attempt >= MAX_READ_ATTEMPTS
            {
                return Ok(response.events);
            }
        }
    }

    /// Events matching the active filter, in server order
    pub async fn visible_events(&self) -> ClientResult<Vec<Event>> {
        let events = self.events().await?;
        let filter = *self.filter.read().await;
        Ok(filter_events(&events, filter).into_iter().cloned().collect())
    }

    /// Invalidate the event list and fetch it again
    pub async fn refresh(&self) -> ClientResult<Vec<Event>> {
        self.cache.invalidate(&CacheKey::Events).await;
        self.events().await
    }

    /// Refetch the list and apply the active filter to the fresh result
    pub async fn refresh_visible(&self) -> ClientResult<Vec<Event>> {
        let events = self.refresh().await?;
        let filter = *self.filter.read().await;
        Ok(filter_events(&events, filter).into_iter().cloned().collect())
    }

    /// One event's detail, from cache when fresh. Refetched like `events`
    /// when invalidated mid-flight.
    pub async fn event_detail(&self, event_id: &str) -> ClientResult<EventDetail> {
        if let Some(detail) = self.cache.get_detail(event_id).await {
            return Ok(detail);
        }

        let client = &self.client;
        let key = CacheKey::detail(event_id);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let version = self.cache.version(&key).await;
            let detail = read_with_retry("get_event_detail", self.config.read_retries, move || {
                client.get_event_detail(event_id)
            })
            .await?;

            if self.config.enforce_single_selection {
                if let Some(decision) = &detail.decision {
                    decision
                        .validate_selection()
                        .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
                }
            }

            let entry = CacheEntry::new(CachedValue::Detail(detail.clone()));
            if self.cache.set_if_current(key.clone(), entry, version).await
                || attempt >= MAX_READ_ATTEMPTS
            {
                return Ok(detail);
            }
        }
    }

    // Filter

    pub async fn filter(&self) -> FilterKey {
        *self.filter.read().await
    }

    /// Change the active filter. Selection is left alone even if the
    /// selected event is no longer visible.
    pub async fn set_filter(&self, filter: FilterKey) {
        *self.filter.write().await = filter;
    }

    // Selection

    pub async fn selected_id(&self) -> Option<String> {
        self.selection.read().await.current().map(str::to_string)
    }

    /// Select an event. The previous event's detail stops being displayed.
    pub async fn select(&self, event_id: &str) {
        let mut selection = self.selection.write().await;
        if selection.select(event_id) {
            *self.displayed.write().await = None;
        }
    }

    pub async fn clear_selection(&self) {
        let mut selection = self.selection.write().await;
        if selection.clear() {
            *self.displayed.write().await = None;
        }
    }

    /// Fetch and display the detail for the selected event.
    ///
    /// If the selection changes before the fetch completes, the result
    /// (success or failure) is dropped and [`DetailLoad::Stale`] returned.
    pub async fn load_selected_detail(&self) -> ClientResult<DetailLoad> {
        let ticket = match self.selection.read().await.ticket() {
            Some(ticket) => ticket,
            None => return Ok(DetailLoad::NothingSelected),
        };

        let result = self.event_detail(ticket.event_id()).await;

        let selection = self.selection.read().await;
        if !selection.is_current(&ticket) {
            tracing::debug!(event_id = ticket.event_id(), "Dropping detail for superseded selection");
            return Ok(DetailLoad::Stale);
        }

        let detail = result?;
        *self.displayed.write().await = Some(detail.clone());
        Ok(DetailLoad::Loaded(detail))
    }

    pub async fn displayed_detail(&self) -> Option<EventDetail> {
        self.displayed.read().await.clone()
    }

    // Overrides

    /// Open the override form for an event
    pub async fn open_override(&self, event_id: &str) -> ClientResult<()> {
        let mut workflows = self.workflows.lock().await;
        workflows
            .entry(event_id.to_string())
            .or_insert_with(|| OverrideWorkflow::new(event_id))
            .open()
    }

    /// Update the draft reason and chosen alternative
    pub async fn edit_override(
        &self,
        event_id: &str,
        reason: impl Into<String>,
        new_selection: Option<usize>,
    ) -> ClientResult<()> {
        let mut workflows = self.workflows.lock().await;
        let workflow = workflows
            .get_mut(event_id)
            .ok_or_else(|| not_open(event_id))?;
        workflow.set_reason(reason)?;
        workflow.set_selection(new_selection)
    }

    pub async fn cancel_override(&self, event_id: &str) -> ClientResult<()> {
        let mut workflows = self.workflows.lock().await;
        match workflows.get_mut(event_id) {
            Some(workflow) => workflow.cancel(),
            None => Ok(()),
        }
    }

    pub async fn override_state(&self, event_id: &str) -> OverrideState {
        self.workflows
            .lock()
            .await
            .get(event_id)
            .map(|w| w.state())
            .unwrap_or(OverrideState::Idle)
    }

    /// Snapshot of an event's override workflow
    pub async fn override_workflow(&self, event_id: &str) -> Option<OverrideWorkflow> {
        self.workflows.lock().await.get(event_id).cloned()
    }

    /// Submit the drafted override.
    ///
    /// A reason under the minimum length fails with a validation error and
    /// no request is sent. On success the event list and this event's
    /// detail are invalidated, and if this event is selected its displayed
    /// detail is dropped until `load_selected_detail` runs again.
    pub async fn submit_override(&self, event_id: &str) -> ClientResult<OverrideResponse> {
        let request = {
            let mut workflows = self.workflows.lock().await;
            workflows
                .get_mut(event_id)
                .ok_or_else(|| not_open(event_id))?
                .begin_submit()?
        };

        let result = self.client.override_decision(event_id, &request).await;

        match &result {
            Ok(_) => {
                self.cache.invalidate(&CacheKey::Events).await;
                self.cache.invalidate(&CacheKey::detail(event_id)).await;
                let selection = self.selection.read().await;
                if selection.current() == Some(event_id) {
                    *self.displayed.write().await = None;
                }
                drop(selection);
                tracing::info!(event_id, new_selection = ?request.new_selection, "Override submitted");
            }
            Err(e) => {
                tracing::warn!(event_id, error = %e, "Override failed");
            }
        }

        if let Some(workflow) = self.workflows.lock().await.get_mut(event_id) {
            workflow.complete(&result);
        }

        result
    }

    /// Open, fill in and submit an override in one step
    pub async fn override_event(
        &self,
        event_id: &str,
        reason: impl Into<String>,
        new_selection: Option<usize>,
    ) -> ClientResult<OverrideResponse> {
        self.open_override(event_id).await?;
        self.edit_override(event_id, reason, new_selection).await?;
        self.submit_override(event_id).await
    }

    /// Refresh the event list every `refresh_interval_ms` until the console
    /// is dropped or the handle aborted.
    pub fn spawn_auto_refresh(self: &Arc<Self>) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        let period = Duration::from_millis(self.config.refresh_interval_ms.max(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(console) = weak.upgrade() else {
                    break;
                };
                match console.refresh().await {
                    Ok(events) => tracing::debug!(count = events.len(), "Auto-refreshed events"),
                    Err(e) => tracing::warn!(error = %e, "Auto-refresh failed"),
                }
            }
        })
    }
}

fn not_open(event_id: &str) -> ClientError {
    ClientError::InvalidState(format!("no override open for event '{}'", event_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoops_core::EventType;

    fn console() -> Console {
        Console::local(ClientConfig::default(), Arc::new(EventStore::demo()))
    }

    #[tokio::test]
    async fn test_visible_events_follow_filter() {
        let console = console();
        assert_eq!(console.visible_events().await.unwrap().len(), 4);

        console.set_filter(FilterKey::Type(EventType::PayoutApproval)).await;
        let visible = console.visible_events().await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "evt_1002");

        let stats = console.cache_stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_select_clears_displayed_detail() {
        let console = console();
        console.select("evt_1001").await;
        assert!(matches!(
            console.load_selected_detail().await.unwrap(),
            DetailLoad::Loaded(_)
        ));
        assert!(console.displayed_detail().await.is_some());

        console.select("evt_1002").await;
        assert!(console.displayed_detail().await.is_none());

        console.clear_selection().await;
        assert_eq!(
            console.load_selected_detail().await.unwrap(),
            DetailLoad::NothingSelected
        );
    }

    #[tokio::test]
    async fn test_override_event_resolves() {
        let console = console();
        let response = console
            .override_event("evt_1002", "Approved after manual audit", Some(1))
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(console.override_state("evt_1002").await, OverrideState::Idle);

        let detail = console.event_detail("evt_1002").await.unwrap();
        assert_eq!(detail.decision.unwrap().selected_index(), Some(1));
    }

    #[tokio::test]
    async fn test_edit_without_open() {
        let console = console();
        let err = console
            .edit_override("evt_1002", "Approved after audit", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidState(_)));
    }
}
