//! ledfx-config - inspect, migrate and repair LedFx configuration directories.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ledfx_config::default_config_dir;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ledfx-config")]
#[command(author, version, about = "LedFx configuration tool", long_about = None)]
struct Cli {
    /// Configuration directory [default: ~/.ledfx]
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether config.json loads without recovery
    Check(commands::check::CheckArgs),

    /// Migrate an old config file and print the result
    Migrate(commands::migrate::MigrateArgs),

    /// Print the default configuration
    Defaults,

    /// List effect types and their options
    Effects(commands::effects::EffectsArgs),

    /// Load, repair and write back config.json and presets.json
    Save,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    // Logs go to stderr so JSON on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_dir = cli.config_dir.unwrap_or_else(default_config_dir);

    match cli.command {
        Commands::Check(args) => commands::check::run(&config_dir, args),
        Commands::Migrate(args) => commands::migrate::run(args),
        Commands::Defaults => commands::defaults::run(),
        Commands::Effects(args) => commands::effects::run(args),
        Commands::Save => commands::save::run(&config_dir),
    }
}
