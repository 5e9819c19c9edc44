//! FreshTrack CLI - Command-line interface for the FreshTrack pantry tracker.

use anyhow::Context;
use clap::Parser;
use freshtrack_cli::commands;
use freshtrack_cli::repl;
use freshtrack_cli::{Cli, Command, Config, ConfigAuth, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (log to stderr)
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // Load or create config
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    if !config_path.exists() {
        config.save_to(&config_path).ok();
    }

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);
    let mut auth = ConfigAuth::new(config.clone(), &config_path);
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Some(Command::Login(args)) => {
            commands::execute_login(args, &mut auth, &formatter)?;
        }
        Some(Command::Logout) => {
            commands::execute_logout(&mut auth, &formatter)?;
        }
        Some(Command::Scan(args)) => {
            let gateway = config.gateway.build().context("Failed to set up the extraction gateway")?;
            commands::execute_scan(args, &gateway, config.scan.preferred_constraints(), &formatter)
                .await?;
        }
        Some(Command::Add(args)) => {
            let mut store = commands::open_store(&config).context("Failed to open product database")?;
            commands::execute_add(args, &mut store, &auth, &formatter)?;
        }
        Some(Command::List(args)) => {
            let store = commands::open_store(&config).context("Failed to open product database")?;
            commands::execute_list(args, &store, &auth, &formatter, today)?;
        }
        Some(Command::Delete(args)) => {
            let mut store = commands::open_store(&config).context("Failed to open product database")?;
            commands::execute_delete(args, &mut store, &auth, &formatter)?;
        }
        None | Some(Command::Form) => {
            let mut store = commands::open_store(&config).context("Failed to open product database")?;
            let gateway = config.gateway.build().context("Failed to set up the extraction gateway")?;
            repl::run_form_session(&config, &mut store, &auth, &gateway, &formatter).await?;
        }
    }

    Ok(())
}
