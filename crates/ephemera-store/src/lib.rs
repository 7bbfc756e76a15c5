//! Ephemera Storage Layer
//!
//! Implements the `ResourceStore` and `ClaimLookup` traits over SQLite.
//!
//! # Architecture
//!
//! - `resources` table: the ephemeral quote products plus their lifecycle
//!   metadata columns (all four set together, all cleared together)
//! - `orders` / `order_items` tables: the claiming transactions, exposed
//!   through [`SqliteClaims`] — a separate handle because the transaction
//!   system is a distinct collaborator from the resource store
//! - `markers` table: small key/value side-channel (backstop sweep cooldown)
//!
//! [`MemoryStore`] and [`MemoryClaims`] mirror the same surface in memory
//! for tests and examples.
//!
//! # Examples
//!
//! ```no_run
//! use ephemera_store::SqliteStore;
//!
//! let mut store = SqliteStore::open("ephemera.db").unwrap();
//! let id = store.insert_resource("Custom quote", 4000.0).unwrap();
//! ```
//!
//! # Thread Safety
//!
//! SQLite connections are not thread-safe. Each thread should have its own
//! store instance; concurrent handles on the same database file are fine.

#![warn(missing_docs)]

mod memory;

pub use memory::{MemoryClaims, MemoryStore};

use ephemera_domain::traits::{ClaimLookup, ResourceStore, TrackedQuery};
use ephemera_domain::{
    ClaimId, ClaimStatus, DeletionMode, ResourceId, TrackedResource, Transaction,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Resource or order not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Visibility state of a resource in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStatus {
    /// Live and purchasable
    Active,
    /// Soft-deleted; recoverable but invisible to the shop
    Trashed,
}

impl ResourceStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Active => "active",
            ResourceStatus::Trashed => "trashed",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ResourceStatus::Active),
            "trashed" => Some(ResourceStatus::Trashed),
            _ => None,
        }
    }
}

/// A resource row as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    /// Store-assigned id
    pub id: ResourceId,
    /// Product title shown at checkout
    pub title: String,
    /// Quoted price
    pub price: f64,
    /// Visibility state
    pub status: ResourceStatus,
}

/// SQLite-backed implementation of `ResourceStore`
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (and initialize) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Create a resource (an ephemeral quote product). The store assigns
    /// the id.
    pub fn insert_resource(&mut self, title: &str, price: f64) -> Result<ResourceId, StoreError> {
        self.conn.execute(
            "INSERT INTO resources (title, price, status) VALUES (?1, ?2, 'active')",
            params![title, price],
        )?;
        Ok(ResourceId::new(self.conn.last_insert_rowid() as u64))
    }

    /// Fetch a resource row
    pub fn get_resource(&self, id: ResourceId) -> Result<Option<ResourceRecord>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, title, price, status FROM resources WHERE id = ?1",
                params![id.value() as i64],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?
            .map(|(id, title, price, status)| {
                let status = ResourceStatus::parse(&status).ok_or_else(|| {
                    StoreError::InvalidData(format!("unknown resource status: {}", status))
                })?;
                Ok(ResourceRecord {
                    id: ResourceId::new(id as u64),
                    title,
                    price,
                    status,
                })
            })
            .transpose()
    }
}

impl ResourceStore for SqliteStore {
    type Error = StoreError;

    fn exists(&self, id: ResourceId) -> Result<bool, Self::Error> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM resources WHERE id = ?1",
                params![id.value() as i64],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn read_metadata(&self, id: ResourceId) -> Result<Option<TrackedResource>, Self::Error> {
        let row = self
            .conn
            .query_row(
                "SELECT claim_id, tracked_at, ttl_minutes
                 FROM resources
                 WHERE id = ?1 AND status = 'active' AND tracked = 1
                   AND tracked_at IS NOT NULL
                   AND ttl_minutes IS NOT NULL AND ttl_minutes > 0",
                params![id.value() as i64],
                |row| {
                    Ok((
                        row.get::<_, Option<i64>>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(|(claim_id, tracked_at, ttl_minutes)| {
            TrackedResource::new(
                id,
                claim_id.map(|c| ClaimId::new(c as u64)),
                tracked_at as u64,
                ttl_minutes as u32,
            )
        }))
    }

    fn write_metadata(&mut self, meta: &TrackedResource) -> Result<(), Self::Error> {
        let changed = self.conn.execute(
            "UPDATE resources
             SET tracked = 1, claim_id = ?2, tracked_at = ?3, ttl_minutes = ?4
             WHERE id = ?1",
            params![
                meta.resource_id.value() as i64,
                meta.claim_id.map(|c| c.value() as i64),
                meta.created_at as i64,
                i64::from(meta.ttl_minutes),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!(
                "resource {}",
                meta.resource_id
            )));
        }
        Ok(())
    }

    fn clear_metadata(&mut self, id: ResourceId) -> Result<(), Self::Error> {
        self.conn.execute(
            "UPDATE resources
             SET tracked = 0, claim_id = NULL, tracked_at = NULL, ttl_minutes = NULL
             WHERE id = ?1",
            params![id.value() as i64],
        )?;
        Ok(())
    }

    fn delete_resource(&mut self, id: ResourceId, mode: DeletionMode) -> Result<bool, Self::Error> {
        let changed = match mode {
            DeletionMode::Soft => self.conn.execute(
                "UPDATE resources SET status = 'trashed' WHERE id = ?1 AND status = 'active'",
                params![id.value() as i64],
            )?,
            DeletionMode::Hard => self.conn.execute(
                "DELETE FROM resources WHERE id = ?1",
                params![id.value() as i64],
            )?,
        };
        Ok(changed > 0)
    }

    fn query_tracked(&self, query: &TrackedQuery) -> Result<Vec<ResourceId>, Self::Error> {
        let mut sql = String::from(
            "SELECT id FROM resources
             WHERE status = 'active' AND tracked = 1
               AND tracked_at IS NOT NULL
               AND ttl_minutes IS NOT NULL AND ttl_minutes > 0",
        );
        let mut args: Vec<i64> = Vec::new();

        if let Some(claim_id) = query.claim_id {
            args.push(claim_id.value() as i64);
            sql.push_str(&format!(" AND claim_id = ?{}", args.len()));
        }
        if let Some(now) = query.expired_by {
            args.push(now as i64);
            sql.push_str(&format!(
                " AND tracked_at + ttl_minutes * 60 <= ?{}",
                args.len()
            ));
        }
        sql.push_str(" ORDER BY id");
        if let Some(limit) = query.limit {
            args.push(limit as i64);
            sql.push_str(&format!(" LIMIT ?{}", args.len()));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let ids = stmt
            .query_map(rusqlite::params_from_iter(args), |row| {
                row.get::<_, i64>(0)
            })?
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(ids.into_iter().map(|id| ResourceId::new(id as u64)).collect())
    }

    fn sweep_marker(&self) -> Result<Option<u64>, Self::Error> {
        let value: Option<i64> = self
            .conn
            .query_row(
                "SELECT value FROM markers WHERE key = 'last_sweep'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.map(|v| v as u64))
    }

    fn set_sweep_marker(&mut self, at: u64) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO markers (key, value) VALUES ('last_sweep', ?1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![at as i64],
        )?;
        Ok(())
    }
}

/// SQLite-backed view of the claiming transactions
///
/// A separate handle from [`SqliteStore`] because the transaction system is
/// an external collaborator: the lifecycle manager only reads through it,
/// while the mutation surface below exists for the operator CLI and tests
/// to simulate the host.
pub struct SqliteClaims {
    conn: Connection,
}

impl SqliteClaims {
    /// Open (and initialize) a claims handle on the given database path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Create an order in the given status. The store assigns the id.
    pub fn insert_order(&mut self, status: ClaimStatus) -> Result<ClaimId, StoreError> {
        self.conn.execute(
            "INSERT INTO orders (status) VALUES (?1)",
            params![status.as_str()],
        )?;
        Ok(ClaimId::new(self.conn.last_insert_rowid() as u64))
    }

    /// Change an order's status. Returns false if the order does not exist.
    pub fn set_status(&mut self, id: ClaimId, status: ClaimStatus) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "UPDATE orders SET status = ?2 WHERE id = ?1",
            params![id.value() as i64, status.as_str()],
        )?;
        Ok(changed > 0)
    }

    /// Attach a resource as a line item of an order
    pub fn attach_item(&mut self, order: ClaimId, resource: ResourceId) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO order_items (order_id, resource_id) VALUES (?1, ?2)",
            params![order.value() as i64, resource.value() as i64],
        )?;
        Ok(())
    }
}

impl ClaimLookup for SqliteClaims {
    type Error = StoreError;

    fn get_transaction(&self, id: ClaimId) -> Result<Option<Transaction>, Self::Error> {
        let status: Option<String> = self
            .conn
            .query_row(
                "SELECT status FROM orders WHERE id = ?1",
                params![id.value() as i64],
                |row| row.get(0),
            )
            .optional()?;

        let Some(status) = status else {
            return Ok(None);
        };
        let status = ClaimStatus::parse(&status)
            .ok_or_else(|| StoreError::InvalidData(format!("unknown order status: {}", status)))?;

        let mut stmt = self
            .conn
            .prepare("SELECT resource_id FROM order_items WHERE order_id = ?1 ORDER BY resource_id")?;
        let items = stmt
            .query_map(params![id.value() as i64], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(Some(Transaction::new(
            id,
            status,
            items.into_iter().map(|r| ResourceId::new(r as u64)).collect(),
        )))
    }
}
