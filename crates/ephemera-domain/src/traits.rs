//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::resource::{ClaimId, DeletionMode, ResourceId, TrackedResource};
use crate::transaction::Transaction;

/// Trait for the resource store holding the ephemeral objects and their
/// lifecycle metadata
///
/// Implemented by the infrastructure layer (ephemera-store). Every mutation
/// is a single atomic store write; the lifecycle manager never holds state
/// across calls, so implementations need no locking beyond per-call
/// consistency.
pub trait ResourceStore {
    /// Error type for store operations
    type Error;

    /// Whether the underlying resource exists at all (tracked or not)
    fn exists(&self, id: ResourceId) -> Result<bool, Self::Error>;

    /// Read lifecycle metadata; `None` means the resource is untracked
    fn read_metadata(&self, id: ResourceId) -> Result<Option<TrackedResource>, Self::Error>;

    /// Write the full set of lifecycle metadata fields
    fn write_metadata(&mut self, meta: &TrackedResource) -> Result<(), Self::Error>;

    /// Clear all lifecycle metadata fields, making the resource untracked
    fn clear_metadata(&mut self, id: ResourceId) -> Result<(), Self::Error>;

    /// Delete the underlying resource. Returns false if there was nothing
    /// to delete.
    fn delete_resource(&mut self, id: ResourceId, mode: DeletionMode) -> Result<bool, Self::Error>;

    /// Ids of tracked resources matching the query
    fn query_tracked(&self, query: &TrackedQuery) -> Result<Vec<ResourceId>, Self::Error>;

    /// Unix seconds of the last opportunistic sweep, if one was recorded
    fn sweep_marker(&self) -> Result<Option<u64>, Self::Error>;

    /// Record the time of an opportunistic sweep
    fn set_sweep_marker(&mut self, at: u64) -> Result<(), Self::Error>;
}

/// Query criteria for retrieving tracked resources
#[derive(Debug, Clone, Default)]
pub struct TrackedQuery {
    /// Only resources linked to this claim
    pub claim_id: Option<ClaimId>,

    /// Only resources whose expiry time is at or before this instant
    pub expired_by: Option<u64>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

impl TrackedQuery {
    /// Query for everything tracked
    pub fn all() -> Self {
        Self::default()
    }

    /// Query for resources linked to a claim
    pub fn by_claim(claim_id: ClaimId) -> Self {
        Self {
            claim_id: Some(claim_id),
            ..Self::default()
        }
    }

    /// Query for resources expired at `now`
    pub fn expired_by(now: u64) -> Self {
        Self {
            expired_by: Some(now),
            ..Self::default()
        }
    }
}

/// Trait for looking up claiming transactions in the host commerce system
///
/// Implemented by the infrastructure layer. The lifecycle manager only reads
/// through this seam; it never mutates transactions.
pub trait ClaimLookup {
    /// Error type for lookup operations
    type Error;

    /// Fetch a transaction; `None` if the host no longer knows it
    fn get_transaction(&self, id: ClaimId) -> Result<Option<Transaction>, Self::Error>;
}

/// Trait for the one-shot deletion callback registry
///
/// The host scheduler fires callbacks at-least-once, possibly late, possibly
/// never. Implementations enforce the single-pending-callback invariant;
/// everything else (re-checking state at fire time) is the manager's job.
pub trait CleanupScheduler {
    /// Register a one-shot callback for `id` at `run_at` (unix seconds).
    /// Returns false without side effects if one is already pending.
    fn schedule_once(&mut self, id: ResourceId, run_at: u64) -> bool;

    /// Unix seconds of the pending callback for `id`, if any
    fn next_scheduled(&self, id: ResourceId) -> Option<u64>;

    /// Remove the pending callback for `id`. Returns whether one existed.
    fn unschedule(&mut self, id: ResourceId) -> bool;
}

/// Host lifecycle events, translated into lifecycle manager calls
///
/// Implemented by an adapter that bridges to whatever the host transaction
/// system is. Event delivery is fire-and-forget: implementations log
/// failures instead of propagating them, since host hooks cannot usefully
/// handle errors.
pub trait EventSink {
    /// The claiming transaction reached a settled state (paid)
    fn on_claim_success(&mut self, claim_id: ClaimId);

    /// The claiming transaction was cancelled or failed
    fn on_claim_cancelled(&mut self, claim_id: ClaimId);

    /// A line item referencing `resource_id` was attached to `claim_id`
    fn on_line_item_attached(&mut self, resource_id: ResourceId, claim_id: ClaimId);
}
