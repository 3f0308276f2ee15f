//! PlantCLIP - HTTP service exposing a BioCLIP plant species classifier.
//!
//! A backend that needs plant predictions posts an image path and gets a
//! ranked, normalized JSON answer without depending on the model runtime.
//!
//! # Usage
//!
//! ```bash
//! # Start the service on the configured address
//! plantclip serve --port 5000
//!
//! # View configuration
//! plantclip config show
//!
//! # Check which model files are installed
//! plantclip models list
//! ```

use clap::{Parser, Subcommand};
use plantclip_core::{Config, ConfigError};

mod cli;
mod logging;
mod server;

/// PlantCLIP - plant species classification over HTTP.
#[derive(Parser, Debug)]
#[command(name = "plantclip")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the classification HTTP server
    Serve(cli::serve::ServeArgs),

    /// Inspect the model directory
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = resolve_config(plantclip_core::Config::load(), |key| std::env::var(key).ok());
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("PlantCLIP v{}", plantclip_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Models(args) => cli::models::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args, &config).await,
    }
}

/// Combine the loaded config file with `BIOCLIP_*` overrides.
///
/// A broken config file falls back to defaults without losing the
/// environment overrides. Logging isn't initialized yet, so warnings go to
/// stderr directly.
fn resolve_config<F>(loaded: Result<Config, ConfigError>, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let base = loaded.unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config: {e}\n  \
             Using default configuration. Check your config file with `plantclip config path`."
        );
        Config::default()
    });

    let mut config = base.clone();
    match config.apply_env_overrides(lookup) {
        Ok(()) => config,
        Err(e) => {
            eprintln!("Warning: Ignoring environment overrides: {e}");
            base
        }
    }
}
