//! Keyed read cache for event list and event detail queries

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use autoops_core::{Event, EventDetail};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::CacheConfig;

/// Identifies a cached query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full event list
    Events,
    /// One event's detail
    EventDetail(String),
}

impl CacheKey {
    pub fn detail(event_id: impl Into<String>) -> Self {
        CacheKey::EventDetail(event_id.into())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Events => write!(f, "events"),
            CacheKey::EventDetail(id) => write!(f, "event:{}", id),
        }
    }
}

/// Payload of a cache entry
#[derive(Debug, Clone)]
pub enum CachedValue {
    Events(Vec<Event>),
    Detail(EventDetail),
}

/// A cached query result
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: CachedValue,

    /// When it was fetched
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(value: CachedValue) -> Self {
        Self {
            value,
            fetched_at: Utc::now(),
        }
    }

    /// Whether the entry is older than `stale_seconds`
    pub fn is_stale(&self, stale_seconds: u64) -> bool {
        Utc::now() - self.fetched_at > Duration::seconds(stale_seconds as i64)
    }
}

/// Version of a key at the time a fetch started.
///
/// `invalidate` and `clear` move it on, so a result fetched under an older
/// version is not written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheVersion {
    epoch: u64,
    key: u64,
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: usize,

    /// Total cache hits
    pub hits: u64,

    /// Total cache misses
    pub misses: u64,

    /// Hit rate (0.0 - 1.0)
    pub hit_rate: f64,

    /// Number of capacity evictions
    pub evictions: u64,

    /// Number of explicit invalidations that removed an entry
    pub invalidations: u64,
}

/// Query cache shared by the console's reads
pub struct QueryCache {
    config: CacheConfig,

    entries: RwLock<HashMap<CacheKey, CacheEntry>>,

    /// Per-key invalidation counters; locked before `entries`
    versions: RwLock<HashMap<CacheKey, u64>>,
    epoch: AtomicU64,

    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    invalidations: AtomicU64,
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
            versions: RwLock::new(HashMap::new()),
            epoch: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Get a fresh entry; stale or absent entries count as misses
    pub async fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        if !self.config.enabled {
            self.misses.fetch_add(1, Ordering::SeqCst);
            return None;
        }

        let entries = self.entries.read().await;

        if let Some(entry) = entries.get(key) {
            if !entry.is_stale(self.config.stale_seconds) {
                self.hits.fetch_add(1, Ordering::SeqCst);
                return Some(entry.value.clone());
            }
        }

        self.misses.fetch_add(1, Ordering::SeqCst);
        None
    }

    pub async fn get_events(&self) -> Option<Vec<Event>> {
        match self.get(&CacheKey::Events).await {
            Some(CachedValue::Events(events)) => Some(events),
            _ => None,
        }
    }

    pub async fn get_detail(&self, event_id: &str) -> Option<EventDetail> {
        match self.get(&CacheKey::detail(event_id)).await {
            Some(CachedValue::Detail(detail)) => Some(detail),
            _ => None,
        }
    }

    /// Current version of `key`. Take it before fetching.
    pub async fn version(&self, key: &CacheKey) -> CacheVersion {
        let versions = self.versions.read().await;
        CacheVersion {
            epoch: self.epoch.load(Ordering::SeqCst),
            key: versions.get(key).copied().unwrap_or(0),
        }
    }

    /// Store an entry, evicting the oldest when at capacity
    pub async fn set(&self, key: CacheKey, entry: CacheEntry) {
        if !self.config.enabled {
            return;
        }

        let mut entries = self.entries.write().await;
        self.insert(&mut entries, key, entry);
    }

    /// Store an entry only if `key` has not been invalidated since `version`
    /// was taken. Returns whether the entry is current.
    pub async fn set_if_current(
        &self,
        key: CacheKey,
        entry: CacheEntry,
        version: CacheVersion,
    ) -> bool {
        let versions = self.versions.read().await;
        let current = CacheVersion {
            epoch: self.epoch.load(Ordering::SeqCst),
            key: versions.get(&key).copied().unwrap_or(0),
        };
        if current != version {
            tracing::debug!(key = %key, "Dropping result fetched before invalidation");
            return false;
        }

        if self.config.enabled {
            let mut entries = self.entries.write().await;
            self.insert(&mut entries, key, entry);
        }
        true
    }

    fn insert(
        &self,
        entries: &mut HashMap<CacheKey, CacheEntry>,
        key: CacheKey,
        entry: CacheEntry,
    ) {
        if entries.len() >= self.config.max_entries && !entries.contains_key(&key) {
            if let Some(oldest_key) = entries
                .iter()
                .min_by_key(|(_, v)| v.fetched_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest_key);
                self.evictions.fetch_add(1, Ordering::SeqCst);
            }
        }

        entries.insert(key, entry);
    }

    pub async fn set_events(&self, events: Vec<Event>) {
        self.set(CacheKey::Events, CacheEntry::new(CachedValue::Events(events)))
            .await;
    }

    pub async fn set_detail(&self, event_id: &str, detail: EventDetail) {
        self.set(
            CacheKey::detail(event_id),
            CacheEntry::new(CachedValue::Detail(detail)),
        )
        .await;
    }

    /// Drop one entry so the next read refetches, and move the key's
    /// version on. Returns whether an entry was present.
    pub async fn invalidate(&self, key: &CacheKey) -> bool {
        let mut versions = self.versions.write().await;
        *versions.entry(key.clone()).or_insert(0) += 1;

        let mut entries = self.entries.write().await;
        let removed = entries.remove(key).is_some();
        if removed {
            self.invalidations.fetch_add(1, Ordering::SeqCst);
        }
        removed
    }

    /// Clear the entire cache
    pub async fn clear(&self) {
        let _versions = self.versions.write().await;
        self.epoch.fetch_add(1, Ordering::SeqCst);

        let mut entries = self.entries.write().await;
        entries.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        let entry_count = self.entries.read().await.len();
        let hits = self.hits.load(Ordering::SeqCst);
        let misses = self.misses.load(Ordering::SeqCst);
        let total = hits + misses;

        CacheStats {
            entry_count,
            hits,
            misses,
            hit_rate: if total > 0 { hits as f64 / total as f64 } else { 0.0 },
            evictions: self.evictions.load(Ordering::SeqCst),
            invalidations: self.invalidations.load(Ordering::SeqCst),
        }
    }
}
