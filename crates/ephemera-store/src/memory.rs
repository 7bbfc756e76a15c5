//! In-memory store and claims doubles for tests and examples
//!
//! Mirror the SQLite surface exactly, and additionally record every
//! `delete_resource` call so tests can assert on deletion counts.

use crate::{ResourceRecord, ResourceStatus, StoreError};
use ephemera_domain::traits::{ClaimLookup, ResourceStore, TrackedQuery};
use ephemera_domain::{
    ClaimId, ClaimStatus, DeletionMode, ResourceId, TrackedResource, Transaction,
};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// In-memory implementation of `ResourceStore`
#[derive(Debug, Default)]
pub struct MemoryStore {
    resources: HashMap<ResourceId, ResourceRecord>,
    meta: HashMap<ResourceId, TrackedResource>,
    marker: Option<u64>,
    delete_log: Vec<(ResourceId, DeletionMode)>,
    next_id: u64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resource. The store assigns the id.
    pub fn insert_resource(&mut self, title: &str, price: f64) -> ResourceId {
        self.next_id += 1;
        let id = ResourceId::new(self.next_id);
        self.resources.insert(
            id,
            ResourceRecord {
                id,
                title: title.to_string(),
                price,
                status: ResourceStatus::Active,
            },
        );
        id
    }

    /// Fetch a resource row
    pub fn get_resource(&self, id: ResourceId) -> Option<ResourceRecord> {
        self.resources.get(&id).cloned()
    }

    /// Test helper: write tracking metadata with `created_at` backdated by
    /// `age_secs`, as if the resource had been marked in the past.
    pub fn backdate_tracking(
        &mut self,
        id: ResourceId,
        claim_id: Option<ClaimId>,
        age_secs: u64,
        ttl_minutes: u32,
    ) {
        self.meta.insert(
            id,
            TrackedResource::new(id, claim_id, now() - age_secs, ttl_minutes),
        );
    }

    /// How many times `delete_resource` was called for `id`
    pub fn delete_calls(&self, id: ResourceId) -> usize {
        self.delete_log.iter().filter(|(r, _)| *r == id).count()
    }

    /// Every recorded `delete_resource` call, in order
    pub fn delete_log(&self) -> &[(ResourceId, DeletionMode)] {
        &self.delete_log
    }

    fn is_active(&self, id: ResourceId) -> bool {
        self.resources
            .get(&id)
            .is_some_and(|r| r.status == ResourceStatus::Active)
    }
}

impl ResourceStore for MemoryStore {
    type Error = StoreError;

    fn exists(&self, id: ResourceId) -> Result<bool, Self::Error> {
        Ok(self.resources.contains_key(&id))
    }

    fn read_metadata(&self, id: ResourceId) -> Result<Option<TrackedResource>, Self::Error> {
        if !self.is_active(id) {
            return Ok(None);
        }
        Ok(self.meta.get(&id).filter(|m| m.is_valid()).cloned())
    }

    fn write_metadata(&mut self, meta: &TrackedResource) -> Result<(), Self::Error> {
        if !self.resources.contains_key(&meta.resource_id) {
            return Err(StoreError::NotFound(format!(
                "resource {}",
                meta.resource_id
            )));
        }
        self.meta.insert(meta.resource_id, meta.clone());
        Ok(())
    }

    fn clear_metadata(&mut self, id: ResourceId) -> Result<(), Self::Error> {
        self.meta.remove(&id);
        Ok(())
    }

    fn delete_resource(&mut self, id: ResourceId, mode: DeletionMode) -> Result<bool, Self::Error> {
        self.delete_log.push((id, mode));
        match mode {
            DeletionMode::Soft => match self.resources.get_mut(&id) {
                Some(record) if record.status == ResourceStatus::Active => {
                    record.status = ResourceStatus::Trashed;
                    Ok(true)
                }
                _ => Ok(false),
            },
            DeletionMode::Hard => Ok(self.resources.remove(&id).is_some()),
        }
    }

    fn query_tracked(&self, query: &TrackedQuery) -> Result<Vec<ResourceId>, Self::Error> {
        let mut results: Vec<ResourceId> = self
            .meta
            .values()
            .filter(|m| m.is_valid() && self.is_active(m.resource_id))
            .filter(|m| query.claim_id.is_none() || m.claim_id == query.claim_id)
            .filter(|m| query.expired_by.is_none_or(|cutoff| m.is_expired(cutoff)))
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

/// In-memory implementation of `ClaimLookup`
#[derive(Debug, Default)]
pub struct MemoryClaims {
    orders: HashMap<ClaimId, Transaction>,
    next_id: u64,
}

impl MemoryClaims {
    /// Create an empty claims view
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an order in the given status
    pub fn insert_order(&mut self, status: ClaimStatus) -> ClaimId {
        self.next_id += 1;
        let id = ClaimId::new(self.next_id);
        self.orders
            .insert(id, Transaction::new(id, status, Vec::new()));
        id
    }

    /// Change an order's status. Returns false if the order does not exist.
    pub fn set_status(&mut self, id: ClaimId, status: ClaimStatus) -> bool {
        match self.orders.get_mut(&id) {
            Some(tx) => {
                tx.status = status;
                true
            }
            None => false,
        }
    }

    /// Attach a resource as a line item of an order
    pub fn attach_item(&mut self, order: ClaimId, resource: ResourceId) {
        if let Some(tx) = self.orders.get_mut(&order) {
            if !tx.line_items.contains(&resource) {
                tx.line_items.push(resource);
            }
        }
    }
}

impl ClaimLookup for MemoryClaims {
    type Error = StoreError;

    fn get_transaction(&self, id: ClaimId) -> Result<Option<Transaction>, Self::Error> {
        Ok(self.orders.get(&id).cloned())
    }
}
