//! Bridge from host commerce events to lifecycle operations
//!
//! Host hooks cannot usefully handle errors, so the bridge is
//! fire-and-forget: failures are logged and swallowed at this boundary.

use crate::LifecycleManager;
use ephemera_domain::traits::{ClaimLookup, CleanupScheduler, EventSink, ResourceStore};
use ephemera_domain::{ClaimId, ResourceId};

/// Adapter translating host transaction events into lifecycle manager
/// calls.
///
/// Owns the manager together with the store, claim lookup and callback
/// registry it operates on, so a single value can be handed to the host's
/// event dispatch.
///
/// # Examples
///
/// ```no_run
/// use ephemera_domain::traits::EventSink;
/// use ephemera_domain::ClaimId;
/// use ephemera_lifecycle::{EventBridge, InMemoryScheduler, LifecycleManager};
/// use ephemera_store::{MemoryClaims, MemoryStore};
///
/// let mut bridge = EventBridge::new(
///     LifecycleManager::default_config(),
///     MemoryStore::new(),
///     MemoryClaims::new(),
///     InMemoryScheduler::new(),
/// );
///
/// // Wired into the host's payment-complete hook:
/// bridge.on_claim_success(ClaimId::new(1001));
/// ```
pub struct EventBridge<S, L, Q> {
    manager: LifecycleManager,
    store: S,
    claims: L,
    scheduler: Q,
}

impl<S, L, Q> EventBridge<S, L, Q>
where
    S: ResourceStore,
    S::Error: std::fmt::Display,
    L: ClaimLookup,
    L::Error: std::fmt::Display,
    Q: CleanupScheduler,
{
    /// Create a bridge over the given collaborators
    pub fn new(manager: LifecycleManager, store: S, claims: L, scheduler: Q) -> Self {
        Self {
            manager,
            store,
            claims,
            scheduler,
        }
    }

    /// Access the manager (stats, metrics)
    pub fn manager(&self) -> &LifecycleManager {
        &self.manager
    }

    /// Mutable access to the manager (admin setters)
    pub fn manager_mut(&mut self) -> &mut LifecycleManager {
        &mut self.manager
    }

    /// Access the store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Tear the bridge apart again
    pub fn into_parts(self) -> (LifecycleManager, S, L, Q) {
        (self.manager, self.store, self.claims, self.scheduler)
    }
}

impl<S, L, Q> EventSink for EventBridge<S, L, Q>
where
    S: ResourceStore,
    S::Error: std::fmt::Display,
    L: ClaimLookup,
    L::Error: std::fmt::Display,
    Q: CleanupScheduler,
{
    fn on_claim_success(&mut self, claim_id: ClaimId) {
        if let Err(e) = self.manager.reconcile_claim_success(
            &mut self.store,
            &self.claims,
            &mut self.scheduler,
            claim_id,
        ) {
            tracing::error!(claim = %claim_id, error = %e, "claim-success reconciliation failed");
        }
    }

    fn on_claim_cancelled(&mut self, claim_id: ClaimId) {
        // Cancellation shares the reconciliation routine: in both outcomes
        // the quote product's purpose has ended.
        if let Err(e) = self.manager.reconcile_claim_success(
            &mut self.store,
            &self.claims,
            &mut self.scheduler,
            claim_id,
        ) {
            tracing::error!(claim = %claim_id, error = %e, "cancellation reconciliation failed");
        }
    }

    fn on_line_item_attached(&mut self, resource_id: ResourceId, claim_id: ClaimId) {
        match self
            .manager
            .update_claim_link(&mut self.store, resource_id, claim_id)
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(
                    resource = %resource_id,
                    claim = %claim_id,
                    "line item references an untracked resource, ignoring"
                );
            }
            Err(e) => {
                tracing::error!(
                    resource = %resource_id,
                    claim = %claim_id,
                    error = %e,
                    "claim link update failed"
                );
            }
        }
    }
}
