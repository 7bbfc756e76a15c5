//! Quote command implementation.

use crate::cli::{QuoteArgs, QuoteSelection};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use ephemera_domain::pricing::{self, MonitoringSelection, QuoteRequest, VehicleDetails, Zone};
use ephemera_lifecycle::{InMemoryScheduler, LifecycleManager};

/// Execute the quote command: validate, price, and with `--checkout`
/// create the ephemeral quote product the way the shop front end would.
pub fn execute_quote(args: QuoteArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (selection, vehicle) = build_request(&args.selection)?;

    let request = QuoteRequest {
        selection: selection.clone(),
        vehicle,
    };
    let violations = pricing::validate(&request);
    if !violations.is_empty() {
        return Err(CliError::InvalidInput(violations.join("; ")));
    }

    let quote = pricing::quote(&config.rates.rate_card(), &selection);
    println!("{}", formatter.format_quote(&quote, &selection)?);

    if !args.checkout {
        return Ok(());
    }

    if !config.lifecycle.enabled {
        println!(
            "{}",
            formatter.warning("Lifecycle feature is disabled; product created untracked")
        );
    }

    let mut store = config.open_store()?;
    let claims = config.open_claims()?;
    let mut scheduler = InMemoryScheduler::new();
    let mut manager = LifecycleManager::new(config.lifecycle.clone());

    // Housekeeping pass before adding yet another ephemeral product
    manager.sweep_all_expired(&mut store, &claims, &mut scheduler)?;

    let title = pricing::display_name(&selection, args.buyer);
    let id = store.insert_resource(&title, quote.total)?;

    // The order does not exist yet at this point; the link arrives later
    // through the line-item event. One-shot callbacks only live inside the
    // watch worker's process, so CLI-created products are collected by the
    // backstop sweep instead.
    manager.mark(&mut store, id, None, args.ttl)?;
    let ttl = config.lifecycle.effective_ttl(args.ttl);

    println!(
        "{}",
        formatter.success(&format!(
            "Created quote product {} \"{}\" (TTL {} min)",
            id, title, ttl
        ))
    );
    Ok(())
}

fn build_request(
    selection: &QuoteSelection,
) -> Result<(MonitoringSelection, Option<VehicleDetails>)> {
    match selection {
        QuoteSelection::Movement {
            zone,
            vehicles,
            make,
            model,
            year,
        } => {
            let zone = Zone::parse(zone)
                .ok_or_else(|| CliError::InvalidInput(format!("Invalid zone: {}", zone)))?;
            Ok((
                MonitoringSelection::VehicleMovement {
                    zone,
                    vehicles: *vehicles,
                },
                vehicle_details(make, model, year),
            ))
        }
        QuoteSelection::Fuel {
            tanks,
            make,
            model,
            year,
        } => Ok((
            MonitoringSelection::Fuel { tanks: *tanks },
            vehicle_details(make, model, year),
        )),
        QuoteSelection::Refrigeration {
            refrigerators,
            sensors,
        } => Ok((
            MonitoringSelection::Refrigeration {
                refrigerators: *refrigerators,
                sensors: *sensors,
            },
            None,
        )),
    }
}

fn vehicle_details(
    make: &Option<String>,
    model: &Option<String>,
    year: &Option<u32>,
) -> Option<VehicleDetails> {
    match (make, model, year) {
        (Some(make), Some(model), Some(year)) => Some(VehicleDetails {
            make: make.clone(),
            model: model.clone(),
            year: *year,
        }),
        _ => None,
    }
}
