//! Background worker for continuous lifecycle operation

use crate::manager::current_timestamp;
use crate::{InMemoryScheduler, LifecycleConfig, LifecycleError, LifecycleManager};
use ephemera_domain::traits::{ClaimLookup, ResourceStore};
use ephemera_domain::ResourceId;
use tokio::time::{interval, Duration};

/// Background worker that drives the lifecycle manager on a schedule
///
/// Each tick fires the one-shot callbacks that have come due and then runs
/// the throttled backstop sweep, so expired resources are removed even when
/// individual callbacks were lost.
///
/// # Examples
///
/// ```no_run
/// use ephemera_lifecycle::{LifecycleConfig, LifecycleWorker};
/// use ephemera_store::{MemoryClaims, MemoryStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut store = MemoryStore::new();
///     let claims = MemoryClaims::new();
///     let mut worker = LifecycleWorker::new(LifecycleConfig::default());
///
///     // Run indefinitely (until Ctrl+C)
///     worker.run(&mut store, &claims).await?;
///     Ok(())
/// }
/// ```
pub struct LifecycleWorker {
    manager: LifecycleManager,
    scheduler: InMemoryScheduler,
    interval: Duration,
}

impl LifecycleWorker {
    /// Create a new background worker with the given configuration
    pub fn new(config: LifecycleConfig) -> Self {
        let interval = config.sweep_interval();
        Self {
            manager: LifecycleManager::new(config),
            scheduler: InMemoryScheduler::new(),
            interval,
        }
    }

    /// Create a worker with default configuration
    pub fn default_config() -> Self {
        Self::new(LifecycleConfig::default())
    }

    /// Access the manager (stats, metrics)
    pub fn manager(&self) -> &LifecycleManager {
        &self.manager
    }

    /// Mutable access to the manager (admin setters)
    pub fn manager_mut(&mut self) -> &mut LifecycleManager {
        &mut self.manager
    }

    /// Register a one-shot deletion callback with the worker's registry
    pub fn schedule(&mut self, id: ResourceId, ttl_minutes: u32) -> bool {
        self.manager.schedule(&mut self.scheduler, id, ttl_minutes)
    }

    /// Run the worker indefinitely
    ///
    /// Ticks at the configured interval until a shutdown signal (Ctrl+C)
    /// is received. Tick failures are logged, never fatal.
    pub async fn run<S, L>(&mut self, store: &mut S, claims: &L) -> Result<(), LifecycleError>
    where
        S: ResourceStore,
        S::Error: std::fmt::Display,
        L: ClaimLookup,
        L::Error: std::fmt::Display,
    {
        let mut ticker = interval(self.interval);

        tracing::info!("lifecycle worker started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick(store, claims);
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutdown signal received, stopping worker");
                    break;
                }
            }
        }

        tracing::info!(
            "lifecycle worker stopped. Final metrics:\n{}",
            self.manager.metrics().summary()
        );
        Ok(())
    }

    /// Run for a specific number of ticks (useful for testing)
    pub async fn run_cycles<S, L>(
        &mut self,
        store: &mut S,
        claims: &L,
        cycles: usize,
    ) -> Result<(), LifecycleError>
    where
        S: ResourceStore,
        S::Error: std::fmt::Display,
        L: ClaimLookup,
        L::Error: std::fmt::Display,
    {
        let mut ticker = interval(self.interval);

        tracing::info!(
            "lifecycle worker started for {} cycles (interval: {:?})",
            cycles,
            self.interval
        );

        for cycle in 0..cycles {
            ticker.tick().await;
            tracing::debug!("tick {}/{}", cycle + 1, cycles);
            self.tick(store, claims);
        }

        tracing::info!(
            "lifecycle worker finished {} cycles. Final metrics:\n{}",
            cycles,
            self.manager.metrics().summary()
        );
        Ok(())
    }

    /// One worker tick: fire due callbacks, then the backstop sweep
    fn tick<S, L>(&mut self, store: &mut S, claims: &L)
    where
        S: ResourceStore,
        S::Error: std::fmt::Display,
        L: ClaimLookup,
        L::Error: std::fmt::Display,
    {
        let now = current_timestamp();

        for id in self.scheduler.due(now) {
            match self
                .manager
                .check_and_sweep_one(store, claims, &mut self.scheduler, id)
            {
                Ok(outcome) => {
                    tracing::debug!(resource = %id, ?outcome, "scheduled callback fired");
                }
                Err(e) => {
                    tracing::error!(resource = %id, error = %e, "scheduled callback failed");
                }
            }
        }

        match self.manager.maybe_sweep(store, claims, &mut self.scheduler) {
            Ok(Some(deleted)) => {
                tracing::info!(deleted, "backstop sweep completed");
            }
            Ok(None) => {
                tracing::debug!("backstop sweep throttled");
            }
            Err(e) => {
                tracing::error!(error = %e, "backstop sweep failed");
            }
        }
    }
}
