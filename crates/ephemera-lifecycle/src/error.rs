//! Error types for lifecycle operations
//!
//! Only hard failures become errors. Missing resources and the disabled
//! feature flag are success no-ops by design; callers learn about them from
//! boolean/outcome return values and log lines, never from `Err`.

use thiserror::Error;

/// Errors that can occur during lifecycle operations
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Resource store read/write/delete failure
    #[error("Storage error: {0}")]
    Store(String),

    /// Claim lookup failure in the host transaction system
    #[error("Claim lookup error: {0}")]
    Lookup(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
