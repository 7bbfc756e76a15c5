//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use ephemera_domain::RateCard;
use ephemera_lifecycle::LifecycleConfig;
use ephemera_store::{SqliteClaims, SqliteStore};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the SQLite database holding resources and orders
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Lifecycle manager configuration
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Calculator rates
    #[serde(default)]
    pub rates: RatesConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

/// Per-unit calculator rates, as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    /// Per-vehicle rate, domestic movement monitoring
    #[serde(default = "default_movement_rate")]
    pub movement_domestic: f64,

    /// Per-vehicle rate, movement monitoring abroad
    #[serde(default = "default_movement_rate")]
    pub movement_abroad: f64,

    /// Per-tank rate, fuel monitoring
    #[serde(default = "default_fuel_rate")]
    pub fuel_tank: f64,

    /// Per-sensor rate, refrigeration monitoring
    #[serde(default = "default_sensor_rate")]
    pub refrigeration_sensor: f64,
}

impl RatesConfig {
    /// Convert to the domain rate card
    pub fn rate_card(&self) -> RateCard {
        RateCard {
            movement_domestic: self.movement_domestic,
            movement_abroad: self.movement_abroad,
            fuel_tank: self.fuel_tank,
            refrigeration_sensor: self.refrigeration_sensor,
        }
    }
}

impl Config {
    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".ephemera").join("config.toml"))
    }

    /// Load configuration from file or create default.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Open the resource store at the configured database path.
    pub fn open_store(&self) -> Result<SqliteStore> {
        if let Some(parent) = self.database.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(SqliteStore::open(&self.database)?)
    }

    /// Open the order view on the same database.
    pub fn open_claims(&self) -> Result<SqliteClaims> {
        Ok(SqliteClaims::open(&self.database)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            settings: Settings::default(),
            lifecycle: LifecycleConfig::default(),
            rates: RatesConfig::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            movement_domestic: default_movement_rate(),
            movement_abroad: default_movement_rate(),
            fuel_tank: default_fuel_rate(),
            refrigeration_sensor: default_sensor_rate(),
        }
    }
}

fn default_database() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".ephemera").join("ephemera.db"))
        .unwrap_or_else(|| PathBuf::from("ephemera.db"))
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_movement_rate() -> f64 {
    4000.0
}

fn default_fuel_rate() -> f64 {
    1000.0
}

fn default_sensor_rate() -> f64 {
    500.0
}
