//! Core lifecycle manager for ephemeral resources
//!
//! Owns the state machine UNTRACKED → TRACKED → {kept-because-claimed,
//! deleted} and the reconciliation/sweep algorithm around it.

use crate::{DeleteReason, LifecycleConfig, LifecycleError, LifecycleStats, SweepMetrics};
use ephemera_domain::traits::{ClaimLookup, CleanupScheduler, ResourceStore, TrackedQuery};
use ephemera_domain::{ClaimId, DeletionMode, ResourceId, TrackedResource};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current timestamp in seconds since Unix epoch
pub(crate) fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Result of a single scheduled-callback check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The resource is not tracked (never was, or another actor already
    /// deleted it); nothing to do
    NotTracked,
    /// The TTL has not elapsed yet (early or skewed callback fire)
    NotDue,
    /// Expired, but a settled claim protects it; remains tracked
    KeptClaimed,
    /// Expired and unprotected; deleted
    Deleted,
    /// Deletion was attempted and the store reported failure; the resource
    /// stays tracked and the next sweep retries
    Failed,
}

/// Lifecycle manager for ephemeral resources
///
/// Marks resources as disposable, schedules their disposal, and reconciles
/// disposal against competing terminal events (claim settlement,
/// cancellation, TTL expiry, administrative deletion). Every terminal
/// action re-validates TRACKED state against the store immediately before
/// acting, so concurrent actors race safely: the loser observes an
/// untracked resource and no-ops.
///
/// # Examples
///
/// ```no_run
/// use ephemera_lifecycle::{InMemoryScheduler, LifecycleConfig, LifecycleManager};
/// use ephemera_store::{MemoryClaims, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// let claims = MemoryClaims::new();
/// let mut scheduler = InMemoryScheduler::new();
/// let mut manager = LifecycleManager::new(LifecycleConfig::default());
///
/// let id = store.insert_resource("Custom quote", 4000.0);
/// manager.mark(&mut store, id, None, None).unwrap();
/// manager.schedule(&mut scheduler, id, 60);
///
/// let deleted = manager
///     .sweep_all_expired(&mut store, &claims, &mut scheduler)
///     .unwrap();
/// assert_eq!(deleted, 0); // freshly marked, nothing expired yet
/// ```
pub struct LifecycleManager {
    config: LifecycleConfig,
    metrics: SweepMetrics,
}

impl LifecycleManager {
    /// Create a new manager with the given configuration
    pub fn new(config: LifecycleConfig) -> Self {
        Self {
            config,
            metrics: SweepMetrics::new(),
        }
    }

    /// Create a manager with default configuration
    pub fn default_config() -> Self {
        Self::new(LifecycleConfig::default())
    }

    /// Get the active configuration
    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &SweepMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Admin reload point: flip the master switch
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Admin reload point: change the default TTL (clamped to the accepted
    /// range on use)
    pub fn set_default_ttl(&mut self, minutes: u32) {
        self.config.default_ttl_minutes = minutes;
    }

    /// Admin reload point: change the deletion mode
    pub fn set_deletion_mode(&mut self, mode: DeletionMode) {
        self.config.deletion_mode = mode;
    }

    /// Mark a resource as ephemeral: UNTRACKED → TRACKED.
    ///
    /// Writes the full metadata set; does not schedule deletion (call
    /// [`schedule`](Self::schedule) for that). Returns `Ok(false)` without
    /// side effects when the feature is disabled or the resource does not
    /// exist in the store.
    pub fn mark<S>(
        &self,
        store: &mut S,
        id: ResourceId,
        claim_id: Option<ClaimId>,
        ttl_minutes: Option<u32>,
    ) -> Result<bool, LifecycleError>
    where
        S: ResourceStore,
        S::Error: std::fmt::Display,
    {
        if !self.config.enabled {
            return Ok(false);
        }

        if !store.exists(id).map_err(store_err)? {
            tracing::warn!(resource = %id, "attempted to mark a missing resource");
            return Ok(false);
        }

        let ttl = self.config.effective_ttl(ttl_minutes);
        let meta = TrackedResource::new(id, claim_id, current_timestamp(), ttl);
        store.write_metadata(&meta).map_err(store_err)?;

        tracing::info!(
            resource = %id,
            claim = claim_id.map(|c| c.value()),
            ttl_minutes = ttl,
            "resource marked ephemeral"
        );
        Ok(true)
    }

    /// Register the one-shot deletion callback for a resource.
    ///
    /// Idempotent: if a callback is already pending for `id`, nothing
    /// happens and `false` is returned.
    pub fn schedule<Q>(&self, scheduler: &mut Q, id: ResourceId, ttl_minutes: u32) -> bool
    where
        Q: CleanupScheduler,
    {
        if !self.config.enabled || ttl_minutes == 0 {
            return false;
        }

        let run_at = current_timestamp() + u64::from(ttl_minutes) * 60;
        let registered = scheduler.schedule_once(id, run_at);
        if registered {
            tracing::info!(
                resource = %id,
                run_at,
                ttl_minutes,
                "deletion callback scheduled"
            );
        }
        registered
    }

    /// Reconcile against a claim reaching a terminal state.
    ///
    /// Finds every tracked resource linked to `claim_id`, plus — as a
    /// second-chance lookup — tracked resources referenced by the
    /// transaction's line items whose claim link was never written, and
    /// deletes the de-duplicated set. Shared by the payment-complete and
    /// cancel/fail paths: either way the quote product's purpose has ended.
    ///
    /// Returns the ids actually deleted. Calling again for the same claim
    /// finds nothing and returns empty.
    pub fn reconcile_claim_success<S, L, Q>(
        &mut self,
        store: &mut S,
        claims: &L,
        scheduler: &mut Q,
        claim_id: ClaimId,
    ) -> Result<Vec<ResourceId>, LifecycleError>
    where
        S: ResourceStore,
        S::Error: std::fmt::Display,
        L: ClaimLookup,
        L::Error: std::fmt::Display,
        Q: CleanupScheduler,
    {
        if !self.config.enabled {
            return Ok(Vec::new());
        }

        let mut targets = store
            .query_tracked(&TrackedQuery::by_claim(claim_id))
            .map_err(store_err)?;

        // Second chance: the claim may reference tracked resources whose
        // link was never set (the claim did not exist yet at mark time).
        match claims.get_transaction(claim_id) {
            Ok(Some(tx)) => {
                for item in tx.line_items {
                    if store.read_metadata(item).map_err(store_err)?.is_some() {
                        targets.push(item);
                    }
                }
            }
            Ok(None) => {
                tracing::debug!(claim = %claim_id, "claim unknown to host, nothing to reconcile");
            }
            Err(e) => return Err(LifecycleError::Lookup(e.to_string())),
        }

        targets.sort_unstable();
        targets.dedup();

        let mut deleted = Vec::new();
        for id in targets {
            match self.delete_tracked(store, scheduler, id, None, DeleteReason::ClaimSettled) {
                Ok(true) => deleted.push(id),
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(
                        resource = %id,
                        claim = %claim_id,
                        error = %e,
                        "reconciliation continuing past failed deletion"
                    );
                }
            }
        }

        if !deleted.is_empty() {
            tracing::info!(
                claim = %claim_id,
                count = deleted.len(),
                "ephemeral resources reconciled after claim settlement"
            );
        }
        Ok(deleted)
    }

    /// Scheduled-callback entry point for one resource.
    ///
    /// No-op unless the resource is tracked and its TTL has elapsed; an
    /// expired resource with a claim in a protected status is kept.
    pub fn check_and_sweep_one<S, L, Q>(
        &mut self,
        store: &mut S,
        claims: &L,
        scheduler: &mut Q,
        id: ResourceId,
    ) -> Result<SweepOutcome, LifecycleError>
    where
        S: ResourceStore,
        S::Error: std::fmt::Display,
        L: ClaimLookup,
        L::Error: std::fmt::Display,
        Q: CleanupScheduler,
    {
        let Some(meta) = store.read_metadata(id).map_err(store_err)? else {
            return Ok(SweepOutcome::NotTracked);
        };

        // Guards against clock skew and early callback fire
        if !meta.is_expired(current_timestamp()) {
            return Ok(SweepOutcome::NotDue);
        }

        if let Some(claim_id) = meta.claim_id {
            if self.claim_protects(claims, claim_id)? {
                self.metrics.record_kept();
                tracing::info!(
                    resource = %id,
                    claim = %claim_id,
                    "expired resource kept, claim is in a protected status"
                );
                return Ok(SweepOutcome::KeptClaimed);
            }
        }

        if self.delete_tracked(store, scheduler, id, None, DeleteReason::Expired)? {
            Ok(SweepOutcome::Deleted)
        } else {
            Ok(SweepOutcome::Failed)
        }
    }

    /// Batch sweep of everything expired.
    ///
    /// Exists because the host scheduler is not guaranteed to fire the
    /// per-resource callbacks. Applies the same claim-protection check per
    /// resource, continues past individual failures, and returns the number
    /// deleted.
    pub fn sweep_all_expired<S, L, Q>(
        &mut self,
        store: &mut S,
        claims: &L,
        scheduler: &mut Q,
    ) -> Result<usize, LifecycleError>
    where
        S: ResourceStore,
        S::Error: std::fmt::Display,
        L: ClaimLookup,
        L::Error: std::fmt::Display,
        Q: CleanupScheduler,
    {
        if !self.config.enabled {
            return Ok(0);
        }

        let start = SystemTime::now();
        let now = current_timestamp();
        let expired = store
            .query_tracked(&TrackedQuery::expired_by(now))
            .map_err(store_err)?;
        let found = expired.len();

        let mut deleted = 0;
        for id in expired {
            // Re-read per resource: the batch query result may be stale by
            // the time this item is reached.
            let meta = match store.read_metadata(id) {
                Ok(Some(meta)) => meta,
                Ok(None) => continue,
                Err(e) => {
                    tracing::error!(resource = %id, error = %e, "sweep skipping unreadable resource");
                    continue;
                }
            };

            if let Some(claim_id) = meta.claim_id {
                match self.claim_protects(claims, claim_id) {
                    Ok(true) => {
                        self.metrics.record_kept();
                        continue;
                    }
                    Ok(false) => {}
                    Err(e) => {
                        // Leave it tracked; the next sweep re-attempts
                        tracing::error!(
                            resource = %id,
                            claim = %claim_id,
                            error = %e,
                            "sweep skipping resource with unreadable claim"
                        );
                        continue;
                    }
                }
            }

            match self.delete_tracked(store, scheduler, id, None, DeleteReason::Expired) {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(
                        resource = %id,
                        error = %e,
                        "sweep continuing past failed deletion"
                    );
                }
            }
        }

        self.metrics.record_sweep();
        if let Ok(elapsed) = start.elapsed() {
            self.metrics.total_runtime_secs += elapsed.as_secs();
        }

        tracing::info!(found, deleted, "expired-resource sweep finished");
        Ok(deleted)
    }

    /// The single named callback the host scheduler invokes.
    ///
    /// With a resource id, checks that one resource; without, runs a full
    /// sweep.
    pub fn run_scheduled<S, L, Q>(
        &mut self,
        store: &mut S,
        claims: &L,
        scheduler: &mut Q,
        resource_id: Option<ResourceId>,
    ) -> Result<(), LifecycleError>
    where
        S: ResourceStore,
        S::Error: std::fmt::Display,
        L: ClaimLookup,
        L::Error: std::fmt::Display,
        Q: CleanupScheduler,
    {
        if !self.config.enabled {
            return Ok(());
        }

        match resource_id {
            Some(id) => {
                let outcome = self.check_and_sweep_one(store, claims, scheduler, id)?;
                tracing::debug!(resource = %id, ?outcome, "scheduled check finished");
            }
            None => {
                self.sweep_all_expired(store, claims, scheduler)?;
            }
        }
        Ok(())
    }

    /// Opportunistic backstop sweep, throttled through a marker in the
    /// store.
    ///
    /// Substitutes for an unreliable host scheduler: call it from ordinary
    /// request handling; it runs a full sweep at most once per cooldown
    /// window. Returns `None` when throttled or disabled, `Some(deleted)`
    /// when a sweep ran.
    pub fn maybe_sweep<S, L, Q>(
        &mut self,
        store: &mut S,
        claims: &L,
        scheduler: &mut Q,
    ) -> Result<Option<usize>, LifecycleError>
    where
        S: ResourceStore,
        S::Error: std::fmt::Display,
        L: ClaimLookup,
        L::Error: std::fmt::Display,
        Q: CleanupScheduler,
    {
        if !self.config.enabled {
            return Ok(None);
        }

        let now = current_timestamp();
        if let Some(last) = store.sweep_marker().map_err(store_err)? {
            if now.saturating_sub(last) < self.config.cooldown_minutes * 60 {
                return Ok(None);
            }
        }

        tracing::info!("running backstop sweep");
        let deleted = self.sweep_all_expired(store, claims, scheduler)?;
        store.set_sweep_marker(now).map_err(store_err)?;
        Ok(Some(deleted))
    }

    /// Direct administrative deletion, bypassing TTL and claim checks.
    ///
    /// Verifies the resource is currently tracked, clears its metadata and
    /// cancels any pending callback. `force` overrides the configured
    /// deletion mode: `Some(true)` forces hard deletion, `Some(false)`
    /// forces soft. Deliberately not gated on the enabled flag so operators
    /// can clean up with the feature off.
    pub fn delete<S, Q>(
        &mut self,
        store: &mut S,
        scheduler: &mut Q,
        id: ResourceId,
        force: Option<bool>,
    ) -> Result<bool, LifecycleError>
    where
        S: ResourceStore,
        S::Error: std::fmt::Display,
        Q: CleanupScheduler,
    {
        self.delete_tracked(store, scheduler, id, force, DeleteReason::Manual)
    }

    /// Update only the claim link of a tracked resource: TRACKED → TRACKED.
    ///
    /// Used when the claim is created after the resource was marked.
    /// Returns `Ok(false)` if the resource is not tracked.
    pub fn update_claim_link<S>(
        &self,
        store: &mut S,
        id: ResourceId,
        claim_id: ClaimId,
    ) -> Result<bool, LifecycleError>
    where
        S: ResourceStore,
        S::Error: std::fmt::Display,
    {
        let Some(mut meta) = store.read_metadata(id).map_err(store_err)? else {
            return Ok(false);
        };

        meta.claim_id = Some(claim_id);
        store.write_metadata(&meta).map_err(store_err)?;

        tracing::info!(resource = %id, claim = %claim_id, "claim link updated");
        Ok(true)
    }

    /// Read-only stats projection over the store
    pub fn get_stats<S>(&self, store: &S) -> Result<LifecycleStats, LifecycleError>
    where
        S: ResourceStore,
        S::Error: std::fmt::Display,
    {
        let total_tracked = store
            .query_tracked(&TrackedQuery::all())
            .map_err(store_err)?
            .len();
        let expired_pending = store
            .query_tracked(&TrackedQuery::expired_by(current_timestamp()))
            .map_err(store_err)?
            .len();

        Ok(LifecycleStats {
            total_tracked,
            expired_pending,
            enabled: self.config.enabled,
            default_ttl_minutes: self.config.default_ttl_minutes,
            deletion_mode: self.config.deletion_mode,
        })
    }

    /// Whether the claim is in a status that protects its resource from
    /// TTL deletion. An unknown claim protects nothing.
    fn claim_protects<L>(&self, claims: &L, claim_id: ClaimId) -> Result<bool, LifecycleError>
    where
        L: ClaimLookup,
        L::Error: std::fmt::Display,
    {
        match claims.get_transaction(claim_id) {
            Ok(Some(tx)) => Ok(self.config.is_protected(tx.status)),
            Ok(None) => Ok(false),
            Err(e) => Err(LifecycleError::Lookup(e.to_string())),
        }
    }

    /// Terminal action shared by every deletion path.
    ///
    /// Re-validates TRACKED immediately before acting so a concurrent
    /// deletion through another path becomes a no-op here, which is what
    /// makes deletion idempotent under the reconcile-vs-callback race.
    fn delete_tracked<S, Q>(
        &mut self,
        store: &mut S,
        scheduler: &mut Q,
        id: ResourceId,
        force: Option<bool>,
        reason: DeleteReason,
    ) -> Result<bool, LifecycleError>
    where
        S: ResourceStore,
        S::Error: std::fmt::Display,
        Q: CleanupScheduler,
    {
        if store.read_metadata(id).map_err(store_err)?.is_none() {
            return Ok(false);
        }

        if !store.exists(id).map_err(store_err)? {
            // The underlying object vanished outside our control; clear the
            // orphaned metadata and treat the deletion as done.
            store.clear_metadata(id).map_err(store_err)?;
            scheduler.unschedule(id);
            tracing::warn!(resource = %id, "resource already gone, cleared orphaned metadata");
            return Ok(true);
        }

        let mode = match force {
            Some(true) => DeletionMode::Hard,
            Some(false) => DeletionMode::Soft,
            None => self.config.deletion_mode,
        };

        let removed = store.delete_resource(id, mode).map_err(store_err)?;
        if removed {
            store.clear_metadata(id).map_err(store_err)?;
            scheduler.unschedule(id);
            self.metrics.record_deletion(reason, 1);
            tracing::info!(
                resource = %id,
                mode = %mode,
                ?reason,
                "ephemeral resource deleted"
            );
        } else {
            tracing::error!(resource = %id, mode = %mode, "store reported deletion failure");
        }
        Ok(removed)
    }
}

fn store_err<E: std::fmt::Display>(e: E) -> LifecycleError {
    LifecycleError::Store(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryScheduler;
    use ephemera_domain::{ClaimStatus, Transaction};
    use std::collections::HashMap;

    // Mock store for testing: resources keyed by id, metadata alongside,
    // deletion calls recorded for assertions.
    struct MockStore {
        resources: Vec<ResourceId>,
        meta: HashMap<ResourceId, TrackedResource>,
        marker: Option<u64>,
        delete_calls: Vec<(ResourceId, DeletionMode)>,
        fail_deletes: bool,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                resources: Vec::new(),
                meta: HashMap::new(),
                marker: None,
                delete_calls: Vec::new(),
                fail_deletes: false,
            }
        }

        fn add_resource(&mut self, raw: u64) -> ResourceId {
            let id = ResourceId::new(raw);
            self.resources.push(id);
            id
        }

        fn add_tracked(
            &mut self,
            raw: u64,
            claim: Option<ClaimId>,
            age_secs: u64,
            ttl_minutes: u32,
        ) -> ResourceId {
            let id = self.add_resource(raw);
            let created_at = current_timestamp() - age_secs;
            self.meta
                .insert(id, TrackedResource::new(id, claim, created_at, ttl_minutes));
            id
        }
    }

    impl ResourceStore for MockStore {
        type Error = String;

        fn exists(&self, id: ResourceId) -> Result<bool, Self::Error> {
            Ok(self.resources.contains(&id))
        }

        fn read_metadata(&self, id: ResourceId) -> Result<Option<TrackedResource>, Self::Error> {
            Ok(self.meta.get(&id).filter(|m| m.is_valid()).cloned())
        }

        fn write_metadata(&mut self, meta: &TrackedResource) -> Result<(), Self::Error> {
            self.meta.insert(meta.resource_id, meta.clone());
            Ok(())
        }

        fn clear_metadata(&mut self, id: ResourceId) -> Result<(), Self::Error> {
            self.meta.remove(&id);
            Ok(())
        }

        fn delete_resource(
            &mut self,
            id: ResourceId,
            mode: DeletionMode,
        ) -> Result<bool, Self::Error> {
            if self.fail_deletes {
                return Ok(false);
            }
            self.delete_calls.push((id, mode));
            self.resources.retain(|r| *r != id);
            Ok(true)
        }

        fn query_tracked(&self, query: &TrackedQuery) -> Result<Vec<ResourceId>, Self::Error> {
            let mut results: Vec<ResourceId> = self
                .meta
                .values()
                .filter(|m| m.is_valid())
                .filter(|m| query.claim_id.is_none() || m.claim_id == query.claim_id)
                .filter(|m| query.expired_by.is_none_or(|now| m.is_expired(now)))
                .map(|m| m.resource_id)
                .collect();
            results.sort_unstable();
            if let Some(limit) = query.limit {
                results.truncate(limit);
            }
            Ok(results)
        }

        fn sweep_marker(&self) -> Result<Option<u64>, Self::Error> {
            Ok(self.marker)
        }

        fn set_sweep_marker(&mut self, at: u64) -> Result<(), Self::Error> {
            self.marker = Some(at);
            Ok(())
        }
    }

    // Mock claim lookup backed by a plain map
    struct MockClaims {
        transactions: HashMap<ClaimId, Transaction>,
    }

    impl MockClaims {
        fn new() -> Self {
            Self {
                transactions: HashMap::new(),
            }
        }

        fn add(&mut self, raw: u64, status: ClaimStatus, line_items: Vec<ResourceId>) -> ClaimId {
            let id = ClaimId::new(raw);
            self.transactions
                .insert(id, Transaction::new(id, status, line_items));
            id
        }
    }

    impl ClaimLookup for MockClaims {
        type Error = String;

        fn get_transaction(&self, id: ClaimId) -> Result<Option<Transaction>, Self::Error> {
            Ok(self.transactions.get(&id).cloned())
        }
    }

    #[test]
    fn test_mark_writes_metadata() {
        let mut store = MockStore::new();
        let id = store.add_resource(1);
        let manager = LifecycleManager::default_config();

        assert!(manager.mark(&mut store, id, None, Some(30)).unwrap());

        let meta = store.read_metadata(id).unwrap().unwrap();
        assert_eq!(meta.ttl_minutes, 30);
        assert_eq!(meta.claim_id, None);
    }

    #[test]
    fn test_mark_missing_resource_is_noop() {
        let mut store = MockStore::new();
        let manager = LifecycleManager::default_config();

        let marked = manager
            .mark(&mut store, ResourceId::new(99), None, None)
            .unwrap();
        assert!(!marked);
        assert!(store.meta.is_empty());
    }

    #[test]
    fn test_mark_disabled_is_noop() {
        let mut store = MockStore::new();
        let id = store.add_resource(1);
        let manager = LifecycleManager::new(LifecycleConfig {
            enabled: false,
            ..Default::default()
        });

        assert!(!manager.mark(&mut store, id, None, None).unwrap());
        assert!(store.read_metadata(id).unwrap().is_none());
    }

    #[test]
    fn test_mark_clamps_ttl() {
        let mut store = MockStore::new();
        let id = store.add_resource(1);
        let manager = LifecycleManager::default_config();

        manager.mark(&mut store, id, None, Some(0)).unwrap();
        assert_eq!(store.read_metadata(id).unwrap().unwrap().ttl_minutes, 1);
    }

    #[test]
    fn test_schedule_is_idempotent() {
        let mut scheduler = InMemoryScheduler::new();
        let manager = LifecycleManager::default_config();
        let id = ResourceId::new(5);

        assert!(manager.schedule(&mut scheduler, id, 60));
        assert!(!manager.schedule(&mut scheduler, id, 60));
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_claim_protects_from_ttl() {
        let mut store = MockStore::new();
        let mut claims = MockClaims::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        let claim = claims.add(10, ClaimStatus::Completed, vec![]);
        // created 120s ago with a 1 minute TTL: expired
        let id = store.add_tracked(1, Some(claim), 120, 1);

        let outcome = manager
            .check_and_sweep_one(&mut store, &claims, &mut scheduler, id)
            .unwrap();

        assert_eq!(outcome, SweepOutcome::KeptClaimed);
        assert!(store.read_metadata(id).unwrap().is_some());
        assert!(store.delete_calls.is_empty());
        assert_eq!(manager.metrics().kept_claimed, 1);
    }

    #[test]
    fn test_expiry_without_claim_deletes() {
        let mut store = MockStore::new();
        let claims = MockClaims::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        let id = store.add_tracked(1, None, 120, 1);

        let outcome = manager
            .check_and_sweep_one(&mut store, &claims, &mut scheduler, id)
            .unwrap();

        assert_eq!(outcome, SweepOutcome::Deleted);
        assert!(store.read_metadata(id).unwrap().is_none());
        assert_eq!(store.delete_calls.len(), 1);
    }

    #[test]
    fn test_pending_claim_does_not_protect() {
        let mut store = MockStore::new();
        let mut claims = MockClaims::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        let claim = claims.add(10, ClaimStatus::Pending, vec![]);
        let id = store.add_tracked(1, Some(claim), 120, 1);

        let outcome = manager
            .check_and_sweep_one(&mut store, &claims, &mut scheduler, id)
            .unwrap();
        assert_eq!(outcome, SweepOutcome::Deleted);
    }

    #[test]
    fn test_no_premature_deletion() {
        let mut store = MockStore::new();
        let claims = MockClaims::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        // 30s into a 1 minute TTL
        let id = store.add_tracked(1, None, 30, 1);

        let outcome = manager
            .check_and_sweep_one(&mut store, &claims, &mut scheduler, id)
            .unwrap();

        assert_eq!(outcome, SweepOutcome::NotDue);
        assert!(store.read_metadata(id).unwrap().is_some());
    }

    #[test]
    fn test_callback_after_deletion_noops() {
        let mut store = MockStore::new();
        let claims = MockClaims::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        let id = store.add_tracked(1, None, 120, 1);
        manager.delete(&mut store, &mut scheduler, id, None).unwrap();

        let outcome = manager
            .check_and_sweep_one(&mut store, &claims, &mut scheduler, id)
            .unwrap();
        assert_eq!(outcome, SweepOutcome::NotTracked);
        assert_eq!(store.delete_calls.len(), 1);
    }

    #[test]
    fn test_idempotent_delete() {
        let mut store = MockStore::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        let id = store.add_tracked(1, None, 0, 60);

        assert!(manager.delete(&mut store, &mut scheduler, id, None).unwrap());
        assert!(!manager.delete(&mut store, &mut scheduler, id, None).unwrap());
        assert_eq!(store.delete_calls.len(), 1);
    }

    #[test]
    fn test_delete_cancels_pending_callback() {
        let mut store = MockStore::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        let id = store.add_tracked(1, None, 0, 60);
        manager.schedule(&mut scheduler, id, 60);
        assert_eq!(scheduler.len(), 1);

        manager.delete(&mut store, &mut scheduler, id, None).unwrap();
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_delete_force_overrides_mode() {
        let mut store = MockStore::new();
        let mut scheduler = InMemoryScheduler::new();
        // Configured soft, forced hard
        let mut manager = LifecycleManager::default_config();

        let id = store.add_tracked(1, None, 0, 60);
        manager
            .delete(&mut store, &mut scheduler, id, Some(true))
            .unwrap();

        assert_eq!(store.delete_calls, vec![(id, DeletionMode::Hard)]);
    }

    #[test]
    fn test_delete_untracked_is_noop() {
        let mut store = MockStore::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        let id = store.add_resource(1);
        assert!(!manager.delete(&mut store, &mut scheduler, id, None).unwrap());
        assert!(store.delete_calls.is_empty());
    }

    #[test]
    fn test_delete_vanished_resource_clears_metadata() {
        let mut store = MockStore::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        let id = store.add_tracked(1, None, 0, 60);
        store.resources.clear(); // the object vanished outside our control

        assert!(manager.delete(&mut store, &mut scheduler, id, None).unwrap());
        assert!(store.meta.is_empty());
        assert!(store.delete_calls.is_empty());
    }

    #[test]
    fn test_sweep_batch_correctness() {
        let mut store = MockStore::new();
        let mut claims = MockClaims::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        let paid = claims.add(10, ClaimStatus::Processing, vec![]);

        // M = 2 expired and unclaimed
        store.add_tracked(1, None, 120, 1);
        store.add_tracked(2, None, 600, 5);
        // K = 1 expired but claim-protected
        let kept = store.add_tracked(3, Some(paid), 120, 1);
        // N - M - K = 2 not yet expired
        let fresh_a = store.add_tracked(4, None, 30, 60);
        let fresh_b = store.add_tracked(5, None, 10, 1);

        let deleted = manager
            .sweep_all_expired(&mut store, &claims, &mut scheduler)
            .unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(store.delete_calls.len(), 2);
        for id in [kept, fresh_a, fresh_b] {
            assert!(store.read_metadata(id).unwrap().is_some());
        }
        assert_eq!(manager.metrics().kept_claimed, 1);
        assert_eq!(manager.metrics().sweep_count, 1);
    }

    #[test]
    fn test_sweep_disabled_is_noop() {
        let mut store = MockStore::new();
        let claims = MockClaims::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::new(LifecycleConfig {
            enabled: false,
            ..Default::default()
        });

        store.add_tracked(1, None, 120, 1);
        let deleted = manager
            .sweep_all_expired(&mut store, &claims, &mut scheduler)
            .unwrap();
        assert_eq!(deleted, 0);
        assert!(store.delete_calls.is_empty());
    }

    #[test]
    fn test_sweep_continues_past_failed_deletion() {
        let mut store = MockStore::new();
        let claims = MockClaims::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        let id = store.add_tracked(1, None, 120, 1);
        store.fail_deletes = true;

        let deleted = manager
            .sweep_all_expired(&mut store, &claims, &mut scheduler)
            .unwrap();
        assert_eq!(deleted, 0);
        // Still tracked: the next sweep naturally re-attempts
        assert!(store.read_metadata(id).unwrap().is_some());
    }

    #[test]
    fn test_reconcile_deletes_linked_and_line_item_resources() {
        let mut store = MockStore::new();
        let mut claims = MockClaims::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        // Linked through metadata and also present as a line item: must be
        // deleted exactly once despite appearing in both lookups.
        let linked = store.add_tracked(1, Some(ClaimId::new(10)), 0, 60);
        // Tracked, unlinked, but referenced by a line item (second chance)
        let orphan = store.add_tracked(2, None, 0, 60);
        // Tracked, unrelated to this claim
        let unrelated = store.add_tracked(3, None, 0, 60);

        let claim = claims.add(10, ClaimStatus::Completed, vec![linked, orphan]);

        let deleted = manager
            .reconcile_claim_success(&mut store, &claims, &mut scheduler, claim)
            .unwrap();

        assert_eq!(deleted, vec![linked, orphan]);
        assert_eq!(store.delete_calls.len(), 2);
        assert!(store.read_metadata(unrelated).unwrap().is_some());
    }

    #[test]
    fn test_reconcile_idempotence() {
        let mut store = MockStore::new();
        let mut claims = MockClaims::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        let linked = store.add_tracked(1, Some(ClaimId::new(10)), 0, 60);
        let claim = claims.add(10, ClaimStatus::Completed, vec![linked]);

        let first = manager
            .reconcile_claim_success(&mut store, &claims, &mut scheduler, claim)
            .unwrap();
        let second = manager
            .reconcile_claim_success(&mut store, &claims, &mut scheduler, claim)
            .unwrap();

        assert_eq!(first, vec![linked]);
        assert!(second.is_empty());
        assert_eq!(store.delete_calls.len(), 1);
    }

    #[test]
    fn test_reconcile_unknown_claim_is_noop() {
        let mut store = MockStore::new();
        let claims = MockClaims::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        store.add_tracked(1, None, 0, 60);
        let deleted = manager
            .reconcile_claim_success(&mut store, &claims, &mut scheduler, ClaimId::new(77))
            .unwrap();
        assert!(deleted.is_empty());
        assert!(store.delete_calls.is_empty());
    }

    #[test]
    fn test_update_claim_link() {
        let mut store = MockStore::new();
        let manager = LifecycleManager::default_config();

        let id = store.add_tracked(1, None, 0, 60);
        let claim = ClaimId::new(42);

        assert!(manager.update_claim_link(&mut store, id, claim).unwrap());
        assert_eq!(
            store.read_metadata(id).unwrap().unwrap().claim_id,
            Some(claim)
        );

        // Untracked resources are not linked
        let untracked = store.add_resource(2);
        assert!(!manager
            .update_claim_link(&mut store, untracked, claim)
            .unwrap());
    }

    #[test]
    fn test_run_scheduled_dispatch() {
        let mut store = MockStore::new();
        let claims = MockClaims::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        let expired = store.add_tracked(1, None, 120, 1);
        store.add_tracked(2, None, 600, 1);

        // With an id: only that resource is checked
        manager
            .run_scheduled(&mut store, &claims, &mut scheduler, Some(expired))
            .unwrap();
        assert_eq!(store.delete_calls.len(), 1);

        // Without an id: full sweep picks up the rest
        manager
            .run_scheduled(&mut store, &claims, &mut scheduler, None)
            .unwrap();
        assert_eq!(store.delete_calls.len(), 2);
    }

    #[test]
    fn test_maybe_sweep_respects_cooldown() {
        let mut store = MockStore::new();
        let claims = MockClaims::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        store.add_tracked(1, None, 120, 1);

        let first = manager
            .maybe_sweep(&mut store, &claims, &mut scheduler)
            .unwrap();
        assert_eq!(first, Some(1));
        assert!(store.marker.is_some());

        store.add_tracked(2, None, 120, 1);
        let second = manager
            .maybe_sweep(&mut store, &claims, &mut scheduler)
            .unwrap();
        assert_eq!(second, None);

        // Age the marker past the cooldown window
        store.marker = Some(current_timestamp() - 31 * 60);
        let third = manager
            .maybe_sweep(&mut store, &claims, &mut scheduler)
            .unwrap();
        assert_eq!(third, Some(1));
    }

    #[test]
    fn test_admin_setters_take_effect() {
        let mut store = MockStore::new();
        let mut scheduler = InMemoryScheduler::new();
        let mut manager = LifecycleManager::default_config();

        manager.set_enabled(false);
        let id = store.add_resource(1);
        assert!(!manager.mark(&mut store, id, None, None).unwrap());

        manager.set_enabled(true);
        manager.set_default_ttl(120);
        assert!(manager.mark(&mut store, id, None, None).unwrap());
        assert_eq!(store.read_metadata(id).unwrap().unwrap().ttl_minutes, 120);

        manager.set_deletion_mode(DeletionMode::Hard);
        manager.delete(&mut store, &mut scheduler, id, None).unwrap();
        assert_eq!(store.delete_calls, vec![(id, DeletionMode::Hard)]);
    }

    #[test]
    fn test_get_stats() {
        let mut store = MockStore::new();
        let manager = LifecycleManager::default_config();

        store.add_tracked(1, None, 120, 1); // expired
        store.add_tracked(2, None, 30, 60); // fresh

        let stats = manager.get_stats(&store).unwrap();
        assert_eq!(stats.total_tracked, 2);
        assert_eq!(stats.expired_pending, 1);
        assert!(stats.enabled);
        assert_eq!(stats.default_ttl_minutes, 60);
        assert_eq!(stats.deletion_mode, DeletionMode::Soft);
    }
}
