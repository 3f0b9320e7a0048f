//! Configuration for the AutoOps client

use serde::{Deserialize, Serialize};

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL, including the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Transport timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Extra attempts for failed reads
    #[serde(default = "default_read_retries")]
    pub read_retries: u32,

    /// Reject decisions that do not have exactly one selected alternative
    #[serde(default = "default_true")]
    pub enforce_single_selection: bool,

    /// Event list auto-refresh interval in milliseconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,

    /// Read cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
}

fn default_true() -> bool { true }
fn default_base_url() -> String { "http://localhost:3000/api".to_string() }
fn default_timeout() -> u64 { 30000 }
fn default_read_retries() -> u32 { 1 }
fn default_refresh_interval() -> u64 { 30000 }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: 30000,
            read_retries: 1,
            enforce_single_selection: true,
            refresh_interval_ms: 30000,
            cache: CacheConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `AUTOOPS_API_URL` and `AUTOOPS_TIMEOUT_MS`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("AUTOOPS_API_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if let Some(timeout) = std::env::var("AUTOOPS_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout_ms = timeout;
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Read cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Age in seconds after which an entry is refetched
    #[serde(default = "default_stale")]
    pub stale_seconds: u64,

    /// Maximum cache entries
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_stale() -> u64 { 30 }
fn default_max_entries() -> usize { 500 }

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stale_seconds: 30,
            max_entries: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url": "http://ops.internal/api", "cache": {"stale_seconds": 5}}"#)
                .unwrap();
        assert_eq!(config.base_url, "http://ops.internal/api");
        assert_eq!(config.timeout_ms, 30000);
        assert_eq!(config.read_retries, 1);
        assert!(config.enforce_single_selection);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.stale_seconds, 5);
        assert_eq!(config.cache.max_entries, 500);
    }
}
