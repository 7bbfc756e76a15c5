//! Delete command implementation.

use crate::cli::DeleteArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ephemera_domain::ResourceId;
use ephemera_lifecycle::{InMemoryScheduler, LifecycleManager};

/// Execute the delete command: direct administrative deletion, bypassing
/// TTL and claim checks.
pub fn execute_delete(args: DeleteArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut store = config.open_store()?;
    let mut scheduler = InMemoryScheduler::new();
    let mut manager = LifecycleManager::new(config.lifecycle.clone());

    let id = ResourceId::new(args.id);
    let force = match (args.hard, args.soft) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };

    if manager.delete(&mut store, &mut scheduler, id, force)? {
        println!("{}", formatter.success(&format!("Resource {} deleted", id)));
    } else {
        println!(
            "{}",
            formatter.warning(&format!("Resource {} is not tracked; nothing deleted", id))
        );
    }
    Ok(())
}
