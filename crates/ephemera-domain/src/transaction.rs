//! Transaction module - the claiming side of the lifecycle

use crate::resource::{ClaimId, ResourceId};
use std::fmt;

/// Status of a claiming transaction in the host commerce system.
///
/// The vocabulary mirrors the host's order states. Which of these protect a
/// claimed resource from TTL deletion is policy, configured on the lifecycle
/// manager, not hardcoded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimStatus {
    /// Created, awaiting payment
    Pending,
    /// Payment received, fulfillment underway
    Processing,
    /// Awaiting manual confirmation of payment
    OnHold,
    /// Fulfilled and complete
    Completed,
    /// Cancelled by the buyer or an operator
    Cancelled,
    /// Payment failed or was declined
    Failed,
    /// Refunded after completion
    Refunded,
}

impl ClaimStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Processing => "processing",
            ClaimStatus::OnHold => "on-hold",
            ClaimStatus::Completed => "completed",
            ClaimStatus::Cancelled => "cancelled",
            ClaimStatus::Failed => "failed",
            ClaimStatus::Refunded => "refunded",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ClaimStatus::Pending),
            "processing" => Some(ClaimStatus::Processing),
            "on-hold" | "on_hold" => Some(ClaimStatus::OnHold),
            "completed" => Some(ClaimStatus::Completed),
            "cancelled" => Some(ClaimStatus::Cancelled),
            "failed" => Some(ClaimStatus::Failed),
            "refunded" => Some(ClaimStatus::Refunded),
            _ => None,
        }
    }
}

impl std::str::FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid claim status: {}", s))
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A claiming transaction as seen by the lifecycle manager.
///
/// Only the fields the manager consults are modeled: the status (for the
/// TTL protection check) and the line items (for the second-chance lookup
/// during reconciliation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Host-assigned transaction id
    pub id: ClaimId,

    /// Current status
    pub status: ClaimStatus,

    /// Resources referenced by the transaction's line items
    pub line_items: Vec<ResourceId>,
}

impl Transaction {
    /// Create a transaction view.
    pub fn new(id: ClaimId, status: ClaimStatus, line_items: Vec<ResourceId>) -> Self {
        Self {
            id,
            status,
            line_items,
        }
    }
}
