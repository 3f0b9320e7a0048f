//! AutoOps Client - the manager console
//!
//! The client side of AutoOps. It reads events and decisions from the API,
//! keeps them in a short-lived cache, tracks which event the manager is
//! looking at, and drives the override workflow.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                       CONSOLE                        │
//! │                                                      │
//! │  ┌───────────┐  ┌───────────┐  ┌──────────────────┐  │
//! │  │  Filter   │  │ Selection │  │ Override         │  │
//! │  │           │  │ + guard   │  │ workflows        │  │
//! │  └───────────┘  └───────────┘  └──────────────────┘  │
//! │         │             │                 │            │
//! │         └─────────────┼─────────────────┘            │
//! │                 ┌─────▼─────┐                        │
//! │                 │   Query   │                        │
//! │                 │   Cache   │                        │
//! │                 └───────────┘                        │
//! │                       │                              │
//! │            ┌──────────┴──────────┐                   │
//! │         ┌──▼───┐             ┌───▼───┐               │
//! │         │ HTTP │             │ Local │               │
//! │         └──────┘             └───────┘               │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use autoops_client::{ClientConfig, Console, DetailLoad};
//!
//! let console = Console::http(ClientConfig::from_env())?;
//!
//! for event in console.visible_events().await? {
//!     println!("{} {}", event.id, event.summary);
//! }
//!
//! console.select("evt_1002").await;
//! if let DetailLoad::Loaded(detail) = console.load_selected_detail().await? {
//!     println!("{:?}", detail.decision);
//! }
//!
//! console.override_event("evt_1002", "Approved after manual audit", Some(1)).await?;
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod selection;
pub mod transport;
pub mod workflow;

pub use cache::{CacheEntry, CacheKey, CacheStats, CacheVersion, CachedValue, QueryCache};
pub use client::{EventApi, LocalEventApi};
pub use config::{CacheConfig, ClientConfig};
pub use console::{Console, DetailLoad};
pub use error::{ClientError, ClientResult, ErrorKind};
pub use selection::{Selection, SelectionTicket};
pub use transport::HttpEventApi;
pub use workflow::{OverrideOutcome, OverrideState, OverrideWorkflow};
