//! AutoOps Server Binary
//!
//! ## Usage
//!
//! ```bash
//! # Start with demo data on port 3000
//! autoops-server
//!
//! # Custom port and seed data
//! AUTOOPS_PORT=8000 AUTOOPS_SEED_FILE=./events.json autoops-server
//!
//! # Enable shift-missing intake
//! AUTOOPS_SUPERVISOR_URL=https://hooks.example.com/shift autoops-server
//! ```

use autoops_core::EventStore;
use autoops_server::{AutoOpsServer, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autoops_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    let store = match &config.seed_file {
        Some(path) => {
            let store = EventStore::load_json_file(path)?;
            tracing::info!("Loaded {} event(s) from {:?}", store.len(), path);
            store
        }
        None => {
            tracing::warn!("AUTOOPS_SEED_FILE not set; serving demo events");
            EventStore::demo()
        }
    };

    if config.supervisor_url.is_none() {
        tracing::warn!("AUTOOPS_SUPERVISOR_URL not set; shift-missing intake disabled");
    }

    tracing::info!("Starting AutoOps Server v{}", env!("CARGO_PKG_VERSION"));

    let server = AutoOpsServer::new(store, config)?;
    server.run().await?;

    Ok(())
}
