mod commands;
mod summary;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adv2", about = "ADV2 astronomical video reader")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Reader configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show ADV2 file metadata
    Info(commands::info::InfoArgs),
    /// Print per-frame timestamps and exposure
    Frames(commands::frames::FramesArgs),
    /// Decode every frame and report failures
    Verify(commands::verify::VerifyArgs),
    /// Save a single frame as TIFF or PNG
    Export(commands::export::ExportArgs),
    /// Print or save the default reader configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = commands::config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Info(args) => commands::info::run(args, &config),
        Commands::Frames(args) => commands::frames::run(args, &config),
        Commands::Verify(args) => commands::verify::run(args, &config),
        Commands::Export(args) => commands::export::run(args, &config),
        Commands::Config(args) => commands::config::run(args),
    }
}
