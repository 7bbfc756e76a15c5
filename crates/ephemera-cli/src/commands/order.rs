//! Order command implementation.
//!
//! Simulates the host shop: creating orders, attaching line items, and
//! changing statuses, with each mutation fired through the same event
//! bridge the real host hooks would use.

use crate::cli::{OrderAction, OrderArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use ephemera_domain::traits::EventSink;
use ephemera_domain::{ClaimId, ClaimStatus, ResourceId};
use ephemera_lifecycle::{EventBridge, InMemoryScheduler, LifecycleManager};

/// Execute the order command.
pub fn execute_order(args: OrderArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut claims = config.open_claims()?;

    match args.action {
        OrderAction::Create { status } => {
            let status = parse_status(&status)?;
            let id = claims.insert_order(status)?;
            println!(
                "{}",
                formatter.success(&format!("Order {} created ({})", id, status))
            );
        }
        OrderAction::Attach { id, resource } => {
            let order = ClaimId::new(id);
            let resource = ResourceId::new(resource);
            claims.attach_item(order, resource)?;

            let mut bridge = EventBridge::new(
                LifecycleManager::new(config.lifecycle.clone()),
                config.open_store()?,
                claims,
                InMemoryScheduler::new(),
            );
            bridge.on_line_item_attached(resource, order);

            println!(
                "{}",
                formatter.success(&format!("Resource {} attached to order {}", resource, order))
            );
        }
        OrderAction::SetStatus { id, status } => {
            let order = ClaimId::new(id);
            let status = parse_status(&status)?;
            if !claims.set_status(order, status)? {
                println!(
                    "{}",
                    formatter.warning(&format!("Order {} not found", order))
                );
                return Ok(());
            }

            let mut bridge = EventBridge::new(
                LifecycleManager::new(config.lifecycle.clone()),
                config.open_store()?,
                claims,
                InMemoryScheduler::new(),
            );

            // Fire the lifecycle event the host would fire on this
            // transition
            match status {
                ClaimStatus::Completed | ClaimStatus::Processing | ClaimStatus::OnHold => {
                    bridge.on_claim_success(order);
                }
                ClaimStatus::Cancelled | ClaimStatus::Failed => {
                    bridge.on_claim_cancelled(order);
                }
                ClaimStatus::Pending | ClaimStatus::Refunded => {}
            }

            let deleted = bridge.manager().metrics().total_deleted();
            println!(
                "{}",
                formatter.success(&format!(
                    "Order {} set to {} ({} quote product(s) reconciled)",
                    order, status, deleted
                ))
            );
        }
    }
    Ok(())
}

fn parse_status(s: &str) -> Result<ClaimStatus> {
    ClaimStatus::parse(s).ok_or_else(|| CliError::InvalidInput(format!("Invalid order status: {}", s)))
}
