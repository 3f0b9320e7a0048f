//! AutoOps Server - HTTP API for the manager console
//!
//! Serves the operational event inbox, the decision recorded for each event
//! and the override endpoint used by managers to correct a decision.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      AutoOpsServer                          │
//! │  ┌───────────────────────────────────────────────────┐      │
//! │  │            autoops-core::EventStore               │      │
//! │  └───────────────────────────────────────────────────┘      │
//! │                          │                                  │
//! │  ┌───────────────┬───────┴────────┬──────────────────┐      │
//! │  ▼               ▼                ▼                  ▼      │
//! │ GET /api/events  GET /api/events/:id  POST .../override     │
//! │                                   POST /api/intake/...  ──► Supervisor
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod routes;
pub mod supervisor;
mod config;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use supervisor::{Supervisor, SupervisorRecommendation, WebhookSupervisor};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use autoops_core::{EventStore, Result};

/// Shared application state
pub struct AppState {
    /// Events and decisions
    pub store: EventStore,
    /// Supervisor consulted on shift-missing intake
    pub supervisor: Option<Arc<dyn Supervisor>>,
}

impl AppState {
    /// Create new app state around the given store
    pub fn new(store: EventStore) -> Self {
        Self {
            store,
            supervisor: None,
        }
    }

    /// Attach a supervisor
    pub fn with_supervisor(mut self, supervisor: Arc<dyn Supervisor>) -> Self {
        self.supervisor = Some(supervisor);
        self
    }
}

/// AutoOps HTTP Server
///
/// # Example
///
/// ```rust,ignore
/// use autoops_core::EventStore;
/// use autoops_server::{AutoOpsServer, ServerConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let config = ServerConfig::builder().port(3000).build();
///     let server = AutoOpsServer::new(EventStore::demo(), config).unwrap();
///     server.run().await.unwrap();
/// }
/// ```
pub struct AutoOpsServer {
    state: Arc<AppState>,
    config: ServerConfig,
}

impl AutoOpsServer {
    /// Create a server; a webhook supervisor is attached when configured
    pub fn new(store: EventStore, config: ServerConfig) -> Result<Self> {
        let mut state = AppState::new(store);
        if let Some(url) = &config.supervisor_url {
            let supervisor = WebhookSupervisor::new(url.clone(), config.supervisor_timeout_ms)?;
            state = state.with_supervisor(Arc::new(supervisor));
        }
        Ok(Self::with_state(state, config))
    }

    /// Create a server around prepared state
    pub fn with_state(state: AppState, config: ServerConfig) -> Self {
        Self {
            state: Arc::new(state),
            config,
        }
    }

    /// Shared state
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Build the Axum router with all routes and middleware
    pub fn router(&self) -> Router {
        routes::create_router(Arc::clone(&self.state))
            .layer(cors_layer(&self.config.cors_origins))
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address for the server
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.config.port))
    }

    /// Run the server
    pub async fn run(&self) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let app = self.router();
        let addr = self.addr();

        tracing::info!("AutoOps API listening on http://{}", addr);
        tracing::info!("Endpoints:");
        tracing::info!("  GET  /health");
        tracing::info!("  GET  /api/events");
        tracing::info!("  GET  /api/events/:id");
        tracing::info!("  POST /api/events/:id/override");
        tracing::info!("  POST /api/intake/shift-missing");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
