//! Resource module - identifiers and lifecycle metadata for tracked resources

use std::fmt;

/// Identifier of a resource in the external resource store.
///
/// The store owns these ids; the lifecycle manager never mints one itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(u64);

impl ResourceId {
    /// Wrap a raw store-assigned id.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw id value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a claiming transaction (an order in the host commerce
/// system).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClaimId(u64);

impl ClaimId {
    /// Wrap a raw host-assigned id.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw id value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a resource is removed from the store.
///
/// Soft deletion moves the resource to a recoverable trash state; hard
/// deletion removes it irreversibly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeletionMode {
    /// Reversible removal (trash)
    Soft,
    /// Irreversible removal
    Hard,
}

impl DeletionMode {
    /// Get the mode name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionMode::Soft => "soft",
            DeletionMode::Hard => "hard",
        }
    }

    /// Parse a mode from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "soft" => Some(DeletionMode::Soft),
            "hard" => Some(DeletionMode::Hard),
            _ => None,
        }
    }
}

impl std::str::FromStr for DeletionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid deletion mode: {}", s))
    }
}

impl fmt::Display for DeletionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle metadata attached to an ephemeral resource.
///
/// A resource is tracked if and only if the store holds a complete, valid
/// set of these fields for it. The metadata never outlives the tracking
/// decision: deletion through any path clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedResource {
    /// The resource under management
    pub resource_id: ResourceId,

    /// Transaction that may claim the resource; `None` means unclaimed
    pub claim_id: Option<ClaimId>,

    /// Unix seconds when tracking began
    pub created_at: u64,

    /// Minutes after `created_at` at which the resource becomes eligible
    /// for deletion absent a settled claim. Always positive for a valid
    /// record.
    pub ttl_minutes: u32,
}

impl TrackedResource {
    /// Create new tracking metadata.
    pub fn new(
        resource_id: ResourceId,
        claim_id: Option<ClaimId>,
        created_at: u64,
        ttl_minutes: u32,
    ) -> Self {
        Self {
            resource_id,
            claim_id,
            created_at,
            ttl_minutes,
        }
    }

    /// Unix seconds at which the resource expires.
    pub fn expiry_time(&self) -> u64 {
        self.created_at + u64::from(self.ttl_minutes) * 60
    }

    /// Whether the resource is expired at `now`.
    ///
    /// Expiry is inclusive: a resource is expired exactly at its expiry
    /// time, not one second after.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expiry_time()
    }

    /// Whether the metadata satisfies the tracking invariant
    /// (positive TTL).
    pub fn is_valid(&self) -> bool {
        self.ttl_minutes > 0
    }
}
