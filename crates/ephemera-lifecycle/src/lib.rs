//! Ephemera Lifecycle
//!
//! Lifecycle manager for ephemeral commerce resources: marks a transient
//! object as disposable, schedules its disposal, and reconciles disposal
//! against competing terminal events (claim settlement, cancellation, TTL
//! expiry, administrative deletion).
//!
//! # Overview
//!
//! The manager is responsible for:
//! - **Marking**: attaching lifecycle metadata to a resource the surrounding
//!   system just created (a draft quote product)
//! - **Scheduling**: registering a single one-shot deletion callback per
//!   resource
//! - **Reconciliation**: deleting a claim's resources when the claim settles
//!   or is cancelled, including a second-chance scan over line items
//! - **Sweeping**: batch deletion of everything expired and unprotected, as
//!   a backstop for lost callbacks
//! - **Stats & metrics**: a read-only projection for the operator surface
//!
//! Exactly one terminal outcome is guaranteed per resource — kept because
//! its claim settled, or deleted — because every deletion path re-validates
//! tracked state against the store immediately before acting and deletion is
//! an idempotent no-op the second time.
//!
//! # Usage
//!
//! ## Direct operations
//!
//! ```no_run
//! use ephemera_lifecycle::{InMemoryScheduler, LifecycleConfig, LifecycleManager};
//! use ephemera_store::{MemoryClaims, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! let claims = MemoryClaims::new();
//! let mut scheduler = InMemoryScheduler::new();
//! let mut manager = LifecycleManager::new(LifecycleConfig::default());
//!
//! let id = store.insert_resource("Custom quote", 4000.0);
//! manager.mark(&mut store, id, None, None).unwrap();
//! manager.schedule(&mut scheduler, id, 60);
//!
//! let stats = manager.get_stats(&store).unwrap();
//! assert_eq!(stats.total_tracked, 1);
//! ```
//!
//! ## Background worker
//!
//! ```no_run
//! use ephemera_lifecycle::{LifecycleConfig, LifecycleWorker};
//! use ephemera_store::{MemoryClaims, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = MemoryStore::new();
//!     let claims = MemoryClaims::new();
//!     let mut worker = LifecycleWorker::new(LifecycleConfig::default());
//!     worker.run(&mut store, &claims).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration presets
//!
//! ```
//! use ephemera_lifecycle::LifecycleConfig;
//!
//! // Default: 60 minute TTL, soft deletion, 30 minute sweeps
//! let config = LifecycleConfig::default();
//!
//! // Aggressive: short TTLs, hard deletion
//! let config = LifecycleConfig::aggressive();
//!
//! // Lenient: long TTLs for slow checkout funnels
//! let config = LifecycleConfig::lenient();
//! ```
//!
//! # Configuration
//!
//! The manager can be configured via TOML:
//!
//! ```toml
//! [lifecycle]
//! enabled = true
//! default_ttl_minutes = 60
//! deletion_mode = "soft"
//! sweep_interval_minutes = 30
//! cooldown_minutes = 30
//! protected_statuses = ["completed", "processing", "on-hold"]
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod events;
mod manager;
mod metrics;
mod scheduler;
mod worker;

pub use config::{LifecycleConfig, TTL_RANGE};
pub use error::LifecycleError;
pub use events::EventBridge;
pub use manager::{LifecycleManager, SweepOutcome};
pub use metrics::{DeleteReason, LifecycleStats, SweepMetrics};
pub use scheduler::InMemoryScheduler;
pub use worker::LifecycleWorker;
