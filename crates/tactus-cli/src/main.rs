//! Tactus CLI - onset-strength detection from files and live input.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tactus")]
#[command(author, version, about = "Onset-strength detection for audio files and live input", long_about = None)]
struct Cli {
    /// Settings file (default: ./tactus.toml, then the user config file)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the onset-strength track of a WAV file
    Analyze(commands::analyze::AnalyzeArgs),

    /// Detect onsets live from an input device
    Listen(commands::listen::ListenArgs),

    /// List audio input devices
    Devices(commands::devices::DevicesArgs),

    /// Generate test signals
    Generate(commands::generate::GenerateArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args, config),
        Commands::Listen(args) => commands::listen::run(args, config),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Generate(args) => commands::generate::run(args),
    }
}
