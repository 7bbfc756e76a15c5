//! Configuration for the lifecycle manager
//!
//! An explicit struct handed to the manager at construction; it is re-read
//! only at defined reload points (constructor and the admin setters), never
//! through ambient lookups.

use ephemera_domain::{ClaimStatus, DeletionMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounds on any TTL the manager will accept, in minutes (1 minute to
/// 7 days). Out-of-range values are clamped, not rejected.
pub const TTL_RANGE: std::ops::RangeInclusive<u32> = 1..=10_080;

/// Configuration for the lifecycle manager
///
/// # Examples
///
/// ```
/// use ephemera_lifecycle::LifecycleConfig;
///
/// // Default configuration (balanced)
/// let config = LifecycleConfig::default();
/// assert_eq!(config.default_ttl_minutes, 60);
///
/// // Aggressive cleanup
/// let config = LifecycleConfig::aggressive();
/// assert_eq!(config.default_ttl_minutes, 15);
///
/// // Lenient cleanup
/// let config = LifecycleConfig::lenient();
/// assert_eq!(config.default_ttl_minutes, 240);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Master switch. When off, every tracking and disposal operation is an
    /// immediate no-op.
    /// Default: true
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// TTL applied when `mark` is called without an explicit one (in
    /// minutes, clamped to `TTL_RANGE` on use)
    /// Default: 60 minutes
    #[serde(default = "default_ttl_minutes")]
    pub default_ttl_minutes: u32,

    /// How resources are removed: soft (recoverable trash) or hard
    /// Default: soft
    #[serde(with = "mode_serde", default = "default_deletion_mode")]
    pub deletion_mode: DeletionMode,

    /// Background worker tick interval (in minutes)
    /// Default: 30 minutes
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_minutes: u64,

    /// Minimum spacing between opportunistic backstop sweeps (in minutes)
    /// Default: 30 minutes
    #[serde(default = "default_cooldown")]
    pub cooldown_minutes: u64,

    /// Claim statuses that protect an expired resource from TTL deletion.
    /// A resource whose claim is merely `pending` is NOT protected by
    /// default; widen this list to change that.
    /// Default: completed, processing, on-hold
    #[serde(with = "status_list_serde", default = "default_protected_statuses")]
    pub protected_statuses: Vec<ClaimStatus>,
}

fn default_enabled() -> bool {
    true
}

fn default_ttl_minutes() -> u32 {
    60
}

fn default_deletion_mode() -> DeletionMode {
    DeletionMode::Soft
}

fn default_sweep_interval() -> u64 {
    30
}

fn default_cooldown() -> u64 {
    30
}

fn default_protected_statuses() -> Vec<ClaimStatus> {
    vec![
        ClaimStatus::Completed,
        ClaimStatus::Processing,
        ClaimStatus::OnHold,
    ]
}

impl Default for LifecycleConfig {
    /// Create default configuration with balanced disposal policies
    ///
    /// - TTL: 60 minutes
    /// - Deletion: soft (recoverable)
    /// - Worker tick / backstop cooldown: 30 minutes
    /// - Protected statuses: completed, processing, on-hold
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl_minutes: 60,
            deletion_mode: DeletionMode::Soft,
            sweep_interval_minutes: 30,
            cooldown_minutes: 30,
            protected_statuses: default_protected_statuses(),
        }
    }
}

impl LifecycleConfig {
    /// Aggressive cleanup configuration (short TTLs, frequent sweeps,
    /// irreversible deletion)
    ///
    /// Suitable when abandoned quote products pile up faster than buyers
    /// complete checkout.
    pub fn aggressive() -> Self {
        Self {
            enabled: true,
            default_ttl_minutes: 15,
            deletion_mode: DeletionMode::Hard,
            sweep_interval_minutes: 10,
            cooldown_minutes: 10,
            protected_statuses: default_protected_statuses(),
        }
    }

    /// Lenient cleanup configuration (long TTLs, infrequent sweeps)
    ///
    /// Suitable for development or slow checkout funnels.
    pub fn lenient() -> Self {
        Self {
            enabled: true,
            default_ttl_minutes: 240,
            deletion_mode: DeletionMode::Soft,
            sweep_interval_minutes: 60,
            cooldown_minutes: 60,
            protected_statuses: default_protected_statuses(),
        }
    }

    /// Resolve the TTL for a mark request: the caller's value if given,
    /// the configured default otherwise, clamped to `TTL_RANGE` either way.
    pub fn effective_ttl(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_ttl_minutes)
            .clamp(*TTL_RANGE.start(), *TTL_RANGE.end())
    }

    /// Whether a claim in `status` protects its resource from TTL deletion
    pub fn is_protected(&self, status: ClaimStatus) -> bool {
        self.protected_statuses.contains(&status)
    }

    /// Get the worker tick interval as a Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_minutes * 60)
    }

    /// Get the backstop cooldown as a Duration
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_minutes * 60)
    }
}

mod mode_serde {
    use ephemera_domain::DeletionMode;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(mode: &DeletionMode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(mode.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DeletionMode, D::Error> {
        let s = String::deserialize(deserializer)?;
        DeletionMode::parse(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid deletion mode: {}", s)))
    }
}

mod status_list_serde {
    use ephemera_domain::ClaimStatus;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        statuses: &[ClaimStatus],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(statuses.iter().map(|s| s.as_str()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<ClaimStatus>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|s| {
                ClaimStatus::parse(s)
                    .ok_or_else(|| de::Error::custom(format!("invalid claim status: {}", s)))
            })
            .collect()
    }
}
