//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use ephemera_domain::{MonitoringSelection, Quote};
use ephemera_lifecycle::LifecycleStats;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format lifecycle statistics.
    pub fn format_stats(&self, stats: &LifecycleStats) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "total_tracked": stats.total_tracked,
                    "expired_pending": stats.expired_pending,
                    "enabled": stats.enabled,
                    "default_ttl_minutes": stats.default_ttl_minutes,
                    "deletion_mode": stats.deletion_mode.as_str(),
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Metric", "Value"]);
                builder.push_record(["Tracked quote products", &stats.total_tracked.to_string()]);
                builder.push_record(["Expired, not yet deleted", &stats.expired_pending.to_string()]);
                builder.push_record([
                    "Feature enabled",
                    if stats.enabled { "yes" } else { "no" },
                ]);
                builder.push_record(["Default TTL (minutes)", &stats.default_ttl_minutes.to_string()]);
                builder.push_record(["Deletion mode", stats.deletion_mode.as_str()]);

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
            OutputFormat::Quiet => Ok(format!(
                "{} {}",
                stats.total_tracked, stats.expired_pending
            )),
        }
    }

    /// Format a computed quote.
    pub fn format_quote(&self, quote: &Quote, selection: &MonitoringSelection) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "unit_price": quote.unit_price,
                    "quantity": quote.quantity,
                    "total": quote.total,
                    "display_total": quote.display_total(),
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                let variant = match selection {
                    MonitoringSelection::VehicleMovement { .. } => "Vehicle movement",
                    MonitoringSelection::Fuel { .. } => "Fuel",
                    MonitoringSelection::Refrigeration { .. } => "Refrigeration",
                };
                let mut builder = Builder::default();
                builder.push_record(["Variant", "Unit price", "Quantity", "Total"]);
                builder.push_record([
                    variant,
                    &format!("{}", quote.unit_price),
                    &quote.quantity.to_string(),
                    &quote.display_total().to_string(),
                ]);

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
            OutputFormat::Quiet => Ok(quote.display_total().to_string()),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
