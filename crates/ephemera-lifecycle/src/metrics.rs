//! Metrics and statistics for lifecycle operations

use ephemera_domain::DeletionMode;
use std::collections::HashMap;

/// Why a resource was deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteReason {
    /// TTL expired with no protecting claim
    Expired,
    /// The claiming transaction settled (paid) or was cancelled
    ClaimSettled,
    /// Direct administrative deletion
    Manual,
}

/// Metrics collected during lifecycle operations
///
/// Tracks deletions per reason, resources kept because their claim settled,
/// and sweep-cycle counts.
#[derive(Debug, Clone, Default)]
pub struct SweepMetrics {
    /// Resources deleted per reason
    pub deleted: HashMap<DeleteReason, usize>,

    /// Expired resources left in place because a settled claim protects them
    pub kept_claimed: usize,

    /// Total sweep iterations completed
    pub sweep_count: usize,

    /// Total runtime in seconds
    pub total_runtime_secs: u64,
}

impl SweepMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record resource deletions
    pub fn record_deletion(&mut self, reason: DeleteReason, count: usize) {
        *self.deleted.entry(reason).or_insert(0) += count;
    }

    /// Record an expired resource kept because its claim settled
    pub fn record_kept(&mut self) {
        self.kept_claimed += 1;
    }

    /// Record a sweep cycle completion
    pub fn record_sweep(&mut self) {
        self.sweep_count += 1;
    }

    /// Get total resources deleted across all reasons
    pub fn total_deleted(&self) -> usize {
        self.deleted.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        self.deleted.clear();
        self.kept_claimed = 0;
        self.sweep_count = 0;
        self.total_runtime_secs = 0;
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Lifecycle Metrics Summary".to_string(),
            "=========================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Total runtime: {}s", self.total_runtime_secs),
            String::new(),
        ];

        if !self.deleted.is_empty() {
            lines.push("Deletions by reason:".to_string());
            for (reason, count) in &self.deleted {
                lines.push(format!("  {:?}: {}", reason, count));
            }
            lines.push(format!("  Total: {}", self.total_deleted()));
            lines.push(String::new());
        }

        if self.kept_claimed > 0 {
            lines.push(format!("Kept (claim settled): {}", self.kept_claimed));
        }

        lines.join("\n")
    }
}

/// Read-only projection of the lifecycle state in the store, for the
/// operator surface and the backstop's is-a-sweep-worth-it check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleStats {
    /// Resources currently tracked
    pub total_tracked: usize,

    /// Tracked resources past expiry that have not yet been deleted
    pub expired_pending: usize,

    /// Whether the feature is enabled
    pub enabled: bool,

    /// Configured default TTL in minutes
    pub default_ttl_minutes: u32,

    /// Configured deletion mode
    pub deletion_mode: DeletionMode,
}
