//! Ephemera CLI - operator surface for the ephemeral quote product
//! lifecycle.

use clap::Parser;
use ephemera_cli::commands;
use ephemera_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> ephemera_cli::Result<()> {
    let cli = Cli::parse();

    // Load or create config
    let mut config = Config::load().unwrap_or_else(|_| {
        let cfg = Config::default();
        cfg.save().ok();
        cfg
    });

    // Determine output format and color setting
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Stats => commands::execute_stats(&config, &formatter)?,
        Command::Sweep => commands::execute_sweep(&config, &formatter)?,
        Command::Quote(args) => commands::execute_quote(args, &config, &formatter)?,
        Command::Mark(args) => commands::execute_mark(args, &config, &formatter)?,
        Command::Delete(args) => commands::execute_delete(args, &config, &formatter)?,
        Command::Order(args) => commands::execute_order(args, &config, &formatter)?,
        Command::Settings(args) => commands::execute_settings(args, &mut config, &formatter)?,
        Command::Watch => commands::execute_watch(&config, &formatter).await?,
    }

    Ok(())
}
