//! Sweep command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ephemera_lifecycle::{InMemoryScheduler, LifecycleManager};

/// Execute the sweep command: a manually triggered full sweep.
pub fn execute_sweep(config: &Config, formatter: &Formatter) -> Result<()> {
    if !config.lifecycle.enabled {
        println!(
            "{}",
            formatter.warning("Lifecycle feature is disabled; nothing swept")
        );
        return Ok(());
    }

    let mut store = config.open_store()?;
    let claims = config.open_claims()?;
    let mut scheduler = InMemoryScheduler::new();
    let mut manager = LifecycleManager::new(config.lifecycle.clone());

    let deleted = manager.sweep_all_expired(&mut store, &claims, &mut scheduler)?;
    println!(
        "{}",
        formatter.success(&format!("Swept {} expired quote product(s)", deleted))
    );
    Ok(())
}
