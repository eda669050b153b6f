use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trailscope::cli::{handle_client_command, handle_export_command, handle_history_command};
use trailscope::config::settings::API_URL_ENV;
use trailscope::config::{paths::TrailPaths, settings::Settings};
use trailscope::storage::Storage;

#[derive(Parser)]
#[command(
    name = "trailscope",
    version,
    about = "Terminal-based audit trail inspector",
    long_about = "trailscope is a terminal client for the audit trail recorded \
                  against every tracked client account. Browse change history in \
                  the interactive TUI, filter it by action, actor, or date, and \
                  export it to CSV, JSON, or YAML from the command line."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive TUI
    #[command(alias = "ui")]
    Tui,

    /// Client roster commands
    #[command(subcommand)]
    Client(trailscope::cli::ClientCommands),

    /// Audit history commands
    #[command(subcommand, alias = "log")]
    History(trailscope::cli::HistoryCommands),

    /// Export commands
    #[command(subcommand)]
    Export(trailscope::cli::ExportCommands),

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = TrailPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    init_tracing(&paths, matches!(cli.command, Some(Commands::Tui)))?;

    match cli.command {
        Some(Commands::Tui) => {
            trailscope::tui::run_tui(&storage, &settings, &paths)?;
        }
        Some(Commands::Client(cmd)) => {
            handle_client_command(&storage, cmd)?;
        }
        Some(Commands::History(cmd)) => {
            handle_history_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing trailscope at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!(
                "The audit API defaults to {}. Set {} or edit the settings \
                 file to point at your deployment.",
                settings.effective_base_url(),
                API_URL_ENV
            );
            println!("Run 'trailscope client add' to start building the roster.");
        }
        Some(Commands::Config) => {
            println!("trailscope Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Log file:         {}", paths.log_file().display());
            println!();
            println!("Settings:");
            if Settings::base_url_from_env() {
                println!(
                    "  API base URL: {} (from {})",
                    settings.effective_base_url(),
                    API_URL_ENV
                );
            } else {
                println!("  API base URL: {}", settings.effective_base_url());
            }
            println!("  API timeout:  {}s", settings.api.timeout_secs);
            println!("  Date format:  {}", settings.date_format);
        }
        None => {
            println!("trailscope - Terminal-based audit trail inspector");
            println!();
            println!("Run 'trailscope --help' for usage information.");
            println!("Run 'trailscope tui' to launch the interactive interface.");
        }
    }

    Ok(())
}

/// Route diagnostics to the operator log in TUI mode; the alternate screen
/// must stay clean, so nothing may write to stderr while the TUI runs.
/// CLI commands log to stderr at warn level unless `RUST_LOG` says otherwise.
fn init_tracing(paths: &TrailPaths, tui_mode: bool) -> Result<()> {
    if tui_mode {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(paths.log_file())?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(Mutex::new(log_file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}
