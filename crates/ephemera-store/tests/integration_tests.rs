//! Integration tests for the SQLite store

use ephemera_domain::traits::{ClaimLookup, ResourceStore, TrackedQuery};
use ephemera_domain::{ClaimId, ClaimStatus, DeletionMode, TrackedResource};
use ephemera_store::{ResourceStatus, SqliteClaims, SqliteStore, StoreError};
use std::time::{SystemTime, UNIX_EPOCH};

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

#[test]
fn test_insert_and_fetch_resource() {
    let mut store = SqliteStore::open(":memory:").unwrap();

    let id = store.insert_resource("Vehicle monitoring quote", 4000.0).unwrap();
    assert!(store.exists(id).unwrap());

    let record = store.get_resource(id).unwrap().unwrap();
    assert_eq!(record.title, "Vehicle monitoring quote");
    assert_eq!(record.price, 4000.0);
    assert_eq!(record.status, ResourceStatus::Active);
}

#[test]
fn test_metadata_roundtrip() {
    let mut store = SqliteStore::open(":memory:").unwrap();
    let id = store.insert_resource("Quote", 100.0).unwrap();

    assert!(store.read_metadata(id).unwrap().is_none());

    let meta = TrackedResource::new(id, Some(ClaimId::new(7)), now(), 60);
    store.write_metadata(&meta).unwrap();
    assert_eq!(store.read_metadata(id).unwrap().unwrap(), meta);

    store.clear_metadata(id).unwrap();
    assert!(store.read_metadata(id).unwrap().is_none());
}

#[test]
fn test_write_metadata_for_missing_resource_fails() {
    let mut store = SqliteStore::open(":memory:").unwrap();
    let meta = TrackedResource::new(ephemera_domain::ResourceId::new(99), None, now(), 60);

    let result = store.write_metadata(&meta);
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[test]
fn test_soft_delete_trashes_resource() {
    let mut store = SqliteStore::open(":memory:").unwrap();
    let id = store.insert_resource("Quote", 100.0).unwrap();
    store
        .write_metadata(&TrackedResource::new(id, None, now(), 60))
        .unwrap();

    assert!(store.delete_resource(id, DeletionMode::Soft).unwrap());

    // The row survives, hidden; its metadata reads as untracked
    assert!(store.exists(id).unwrap());
    assert_eq!(
        store.get_resource(id).unwrap().unwrap().status,
        ResourceStatus::Trashed
    );
    assert!(store.read_metadata(id).unwrap().is_none());

    // Deleting again is a reported no-op
    assert!(!store.delete_resource(id, DeletionMode::Soft).unwrap());
}

#[test]
fn test_hard_delete_removes_row() {
    let mut store = SqliteStore::open(":memory:").unwrap();
    let id = store.insert_resource("Quote", 100.0).unwrap();

    assert!(store.delete_resource(id, DeletionMode::Hard).unwrap());
    assert!(!store.exists(id).unwrap());
    assert!(store.get_resource(id).unwrap().is_none());
}

#[test]
fn test_query_tracked_by_claim_and_expiry() {
    let mut store = SqliteStore::open(":memory:").unwrap();
    let claim = ClaimId::new(10);

    let expired = store.insert_resource("expired", 1.0).unwrap();
    store
        .write_metadata(&TrackedResource::new(expired, None, now() - 3600, 1))
        .unwrap();

    let fresh = store.insert_resource("fresh", 1.0).unwrap();
    store
        .write_metadata(&TrackedResource::new(fresh, Some(claim), now(), 60))
        .unwrap();

    // Untracked noise
    store.insert_resource("untracked", 1.0).unwrap();

    assert_eq!(
        store.query_tracked(&TrackedQuery::all()).unwrap(),
        vec![expired, fresh]
    );
    assert_eq!(
        store.query_tracked(&TrackedQuery::by_claim(claim)).unwrap(),
        vec![fresh]
    );
    assert_eq!(
        store.query_tracked(&TrackedQuery::expired_by(now())).unwrap(),
        vec![expired]
    );

    let limited = store
        .query_tracked(&TrackedQuery {
            limit: Some(1),
            ..TrackedQuery::all()
        })
        .unwrap();
    assert_eq!(limited, vec![expired]);
}

#[test]
fn test_sweep_marker_roundtrip() {
    let mut store = SqliteStore::open(":memory:").unwrap();

    assert!(store.sweep_marker().unwrap().is_none());
    store.set_sweep_marker(1_700_000_000).unwrap();
    assert_eq!(store.sweep_marker().unwrap(), Some(1_700_000_000));
    store.set_sweep_marker(1_700_000_600).unwrap();
    assert_eq!(store.sweep_marker().unwrap(), Some(1_700_000_600));
}

#[test]
fn test_orders_and_line_items() {
    let mut claims = SqliteClaims::open(":memory:").unwrap();

    let order = claims.insert_order(ClaimStatus::Pending).unwrap();
    claims
        .attach_item(order, ephemera_domain::ResourceId::new(3))
        .unwrap();
    claims
        .attach_item(order, ephemera_domain::ResourceId::new(3))
        .unwrap(); // dedup
    claims
        .attach_item(order, ephemera_domain::ResourceId::new(8))
        .unwrap();

    let tx = claims.get_transaction(order).unwrap().unwrap();
    assert_eq!(tx.status, ClaimStatus::Pending);
    assert_eq!(tx.line_items.len(), 2);

    assert!(claims.set_status(order, ClaimStatus::Completed).unwrap());
    let tx = claims.get_transaction(order).unwrap().unwrap();
    assert_eq!(tx.status, ClaimStatus::Completed);

    assert!(!claims
        .set_status(ClaimId::new(404), ClaimStatus::Failed)
        .unwrap());
    assert!(claims.get_transaction(ClaimId::new(404)).unwrap().is_none());
}

#[test]
fn test_store_and_claims_share_a_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ephemera.db");

    let mut store = SqliteStore::open(&path).unwrap();
    let mut claims = SqliteClaims::open(&path).unwrap();

    let resource = store.insert_resource("Quote", 500.0).unwrap();
    let order = claims.insert_order(ClaimStatus::Pending).unwrap();
    claims.attach_item(order, resource).unwrap();

    store
        .write_metadata(&TrackedResource::new(resource, Some(order), now(), 60))
        .unwrap();

    // Both handles observe the same rows
    let tx = claims.get_transaction(order).unwrap().unwrap();
    assert_eq!(tx.line_items, vec![resource]);
    assert_eq!(
        store.read_metadata(resource).unwrap().unwrap().claim_id,
        Some(order)
    );
}
