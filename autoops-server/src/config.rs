//! Server configuration

use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SUPERVISOR_TIMEOUT_MS: u64 = 30_000;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
    /// JSON file with `[{event, decision?}]` records to serve
    pub seed_file: Option<PathBuf>,
    /// Webhook consulted for shift-missing intake
    pub supervisor_url: Option<String>,
    /// Timeout for supervisor calls
    pub supervisor_timeout_ms: u64,
}

impl ServerConfig {
    /// Create a new configuration builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Read configuration from `AUTOOPS_*` environment variables
    pub fn from_env() -> Self {
        let port = std::env::var("AUTOOPS_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let cors_origins = std::env::var("AUTOOPS_CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let supervisor_timeout_ms = std::env::var("AUTOOPS_SUPERVISOR_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SUPERVISOR_TIMEOUT_MS);

        Self {
            port,
            cors_origins,
            seed_file: std::env::var("AUTOOPS_SEED_FILE").ok().map(PathBuf::from),
            supervisor_url: std::env::var("AUTOOPS_SUPERVISOR_URL")
                .ok()
                .filter(|u| !u.is_empty()),
            supervisor_timeout_ms,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
            seed_file: None,
            supervisor_url: None,
            supervisor_timeout_ms: DEFAULT_SUPERVISOR_TIMEOUT_MS,
        }
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    port: Option<u16>,
    cors_origins: Vec<String>,
    seed_file: Option<PathBuf>,
    supervisor_url: Option<String>,
    supervisor_timeout_ms: Option<u64>,
}

impl ServerConfigBuilder {
    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Allow an additional CORS origin
    pub fn cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origins.push(origin.into());
        self
    }

    /// Serve records from a seed file
    pub fn seed_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_file = Some(path.into());
        self
    }

    /// Set the supervisor webhook URL
    pub fn supervisor_url(mut self, url: impl Into<String>) -> Self {
        self.supervisor_url = Some(url.into());
        self
    }

    /// Set the supervisor timeout
    pub fn supervisor_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.supervisor_timeout_ms = Some(timeout_ms);
        self
    }

    /// Build the configuration
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            port: self.port.unwrap_or(DEFAULT_PORT),
            cors_origins: self.cors_origins,
            seed_file: self.seed_file,
            supervisor_url: self.supervisor_url,
            supervisor_timeout_ms: self
                .supervisor_timeout_ms
                .unwrap_or(DEFAULT_SUPERVISOR_TIMEOUT_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ServerConfig::builder().build();
        assert_eq!(config.port, 3000);
        assert!(config.cors_origins.is_empty());
        assert!(config.supervisor_url.is_none());
        assert_eq!(config.supervisor_timeout_ms, 30_000);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ServerConfig::builder()
            .port(8080)
            .cors_origin("http://localhost:5173")
            .supervisor_url("http://hooks.local/shift")
            .supervisor_timeout_ms(500)
            .build();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.supervisor_url.as_deref(), Some("http://hooks.local/shift"));
        assert_eq!(config.supervisor_timeout_ms, 500);
    }
}
