//! CLI argument definitions.

use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Lifecycle manager for ephemeral quote products.
#[derive(Debug, Parser)]
#[command(name = "ephemera", version, about)]
pub struct Cli {
    /// Output format override
    #[arg(long, global = true, value_enum)]
    pub format: Option<FormatArg>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// Human-readable table
    Table,
    /// JSON
    Json,
    /// Minimal output
    Quiet,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Quiet => OutputFormat::Quiet,
        }
    }
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show lifecycle statistics
    Stats,

    /// Run a full sweep of expired quote products now
    Sweep,

    /// Price a monitoring selection and optionally create the quote product
    Quote(QuoteArgs),

    /// Mark an existing resource as ephemeral
    Mark(MarkArgs),

    /// Delete a tracked resource directly
    Delete(DeleteArgs),

    /// Create or mutate the claiming order (simulates the host shop)
    Order(OrderArgs),

    /// Show or change persisted settings
    Settings(SettingsArgs),

    /// Run the background worker until interrupted
    Watch,
}

/// Arguments for the quote command.
#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Buyer id recorded in the product title
    #[arg(long, default_value_t = 0)]
    pub buyer: u64,

    /// Create the ephemeral quote product after pricing
    #[arg(long)]
    pub checkout: bool,

    /// TTL in minutes for the created product (configured default if
    /// omitted)
    #[arg(long)]
    pub ttl: Option<u32>,

    #[command(subcommand)]
    pub selection: QuoteSelection,
}

/// What is being quoted.
#[derive(Debug, Subcommand)]
pub enum QuoteSelection {
    /// Vehicle movement monitoring, priced per vehicle by zone
    Movement {
        /// Coverage zone: domestic or abroad
        #[arg(long, default_value = "domestic")]
        zone: String,

        /// Number of vehicles
        #[arg(long, default_value_t = 1)]
        vehicles: u32,

        /// Vehicle make
        #[arg(long)]
        make: Option<String>,

        /// Vehicle model
        #[arg(long)]
        model: Option<String>,

        /// Production year
        #[arg(long)]
        year: Option<u32>,
    },

    /// Fuel monitoring, priced per tank
    Fuel {
        /// Number of fuel tanks
        #[arg(long, default_value_t = 0)]
        tanks: u32,

        /// Vehicle make
        #[arg(long)]
        make: Option<String>,

        /// Vehicle model
        #[arg(long)]
        model: Option<String>,

        /// Production year
        #[arg(long)]
        year: Option<u32>,
    },

    /// Refrigeration monitoring, priced per sensor
    Refrigeration {
        /// Number of refrigerated units
        #[arg(long, default_value_t = 1)]
        refrigerators: u32,

        /// Number of temperature sensors
        #[arg(long, default_value_t = 1)]
        sensors: u32,
    },
}

/// Arguments for the mark command.
#[derive(Debug, Args)]
pub struct MarkArgs {
    /// Resource id to mark
    pub id: u64,

    /// Order id to link, if one already exists
    #[arg(long)]
    pub order: Option<u64>,

    /// TTL in minutes (configured default if omitted)
    #[arg(long)]
    pub ttl: Option<u32>,
}

/// Arguments for the delete command.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Resource id to delete
    pub id: u64,

    /// Force irreversible deletion regardless of the configured mode
    #[arg(long)]
    pub hard: bool,

    /// Force recoverable deletion regardless of the configured mode
    #[arg(long, conflicts_with = "hard")]
    pub soft: bool,
}

/// Arguments for the order command.
#[derive(Debug, Args)]
pub struct OrderArgs {
    #[command(subcommand)]
    pub action: OrderAction,
}

/// Order sub-actions.
#[derive(Debug, Subcommand)]
pub enum OrderAction {
    /// Create an order
    Create {
        /// Initial status
        #[arg(long, default_value = "pending")]
        status: String,
    },

    /// Attach a resource as a line item (fires the link event)
    Attach {
        /// Order id
        id: u64,

        /// Resource id
        resource: u64,
    },

    /// Change an order's status (fires the matching lifecycle event)
    SetStatus {
        /// Order id
        id: u64,

        /// New status
        status: String,
    },
}

/// Arguments for the settings command.
#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: SettingsAction,
}

/// Settings sub-actions.
#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print the persisted configuration
    Show,

    /// Enable or disable the lifecycle feature
    SetEnabled {
        /// true or false
        value: bool,
    },

    /// Set the default TTL in minutes (clamped to 1..=10080)
    SetTtl {
        /// Minutes
        minutes: u32,
    },

    /// Set the deletion mode: soft or hard
    SetMode {
        /// Mode name
        mode: String,
    },
}
