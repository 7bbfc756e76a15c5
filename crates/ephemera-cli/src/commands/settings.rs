//! Settings command implementation.

use crate::cli::{SettingsAction, SettingsArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use ephemera_domain::DeletionMode;
use ephemera_lifecycle::TTL_RANGE;

/// Execute the settings command.
pub fn execute_settings(
    args: SettingsArgs,
    config: &mut Config,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        SettingsAction::Show => {
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| CliError::Config(format!("Failed to render config: {}", e)))?;
            println!("{}", rendered);
        }
        SettingsAction::SetEnabled { value } => {
            config.lifecycle.enabled = value;
            config.save()?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Lifecycle feature {}",
                    if value { "enabled" } else { "disabled" }
                ))
            );
        }
        SettingsAction::SetTtl { minutes } => {
            let clamped = minutes.clamp(*TTL_RANGE.start(), *TTL_RANGE.end());
            config.lifecycle.default_ttl_minutes = clamped;
            config.save()?;
            if clamped != minutes {
                println!(
                    "{}",
                    formatter.warning(&format!(
                        "TTL clamped to {} minutes (accepted range {}..={})",
                        clamped,
                        TTL_RANGE.start(),
                        TTL_RANGE.end()
                    ))
                );
            } else {
                println!(
                    "{}",
                    formatter.success(&format!("Default TTL set to {} minutes", clamped))
                );
            }
        }
        SettingsAction::SetMode { mode } => {
            let mode = DeletionMode::parse(&mode)
                .ok_or_else(|| CliError::InvalidInput(format!("Invalid deletion mode: {}", mode)))?;
            config.lifecycle.deletion_mode = mode;
            config.save()?;
            println!(
                "{}",
                formatter.success(&format!("Deletion mode set to {}", mode))
            );
        }
    }
    Ok(())
}
