//! Watch command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ephemera_lifecycle::LifecycleWorker;

/// Execute the watch command: run the background worker until Ctrl+C.
pub async fn execute_watch(config: &Config, formatter: &Formatter) -> Result<()> {
    let mut store = config.open_store()?;
    let claims = config.open_claims()?;
    let mut worker = LifecycleWorker::new(config.lifecycle.clone());

    println!(
        "{}",
        formatter.info(&format!(
            "Watching {} (tick every {} min, Ctrl+C to stop)",
            config.database.display(),
            config.lifecycle.sweep_interval_minutes
        ))
    );

    worker.run(&mut store, &claims).await?;
    Ok(())
}
