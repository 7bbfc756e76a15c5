//! Mark command implementation.

use crate::cli::MarkArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ephemera_domain::{ClaimId, ResourceId};
use ephemera_lifecycle::LifecycleManager;

/// Execute the mark command.
pub fn execute_mark(args: MarkArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut store = config.open_store()?;
    let manager = LifecycleManager::new(config.lifecycle.clone());

    let id = ResourceId::new(args.id);
    let claim = args.order.map(ClaimId::new);

    if manager.mark(&mut store, id, claim, args.ttl)? {
        let ttl = config.lifecycle.effective_ttl(args.ttl);
        println!(
            "{}",
            formatter.success(&format!("Resource {} marked ephemeral (TTL {} min)", id, ttl))
        );
    } else if config.lifecycle.enabled {
        println!(
            "{}",
            formatter.warning(&format!("Resource {} not found; nothing marked", id))
        );
    } else {
        println!("{}", formatter.warning("Lifecycle feature is disabled"));
    }
    Ok(())
}
