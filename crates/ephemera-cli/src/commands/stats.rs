//! Stats command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ephemera_lifecycle::LifecycleManager;

/// Execute the stats command.
pub fn execute_stats(config: &Config, formatter: &Formatter) -> Result<()> {
    let store = config.open_store()?;
    let manager = LifecycleManager::new(config.lifecycle.clone());

    let stats = manager.get_stats(&store)?;
    println!("{}", formatter.format_stats(&stats)?);
    Ok(())
}
