//! `audiohal` - command-line interface for the audiohal routing engine.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "audiohal")]
#[command(author, version, about = "audiohal routing configuration engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a configuration and report what it declares
    Load(commands::load::LoadArgs),

    /// List the devices a configuration declares
    Devices(commands::devices::DevicesArgs),

    /// Open a stream and report its properties
    Open(commands::open::OpenArgs),

    /// Open a stream, route it to one or more devices, and release it
    Route(commands::route::RouteArgs),

    /// Open a named stream and set its hardware volume
    Volume(commands::volume::VolumeArgs),

    /// Open a named stream and apply one of its use-case cases
    UseCase(commands::usecase::UseCaseArgs),
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    tracing::debug!(command = ?std::mem::discriminant(&cli.command), "dispatching command");

    match cli.command {
        Commands::Load(args) => commands::load::run(args),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Open(args) => commands::open::run(args),
        Commands::Route(args) => commands::route::run(args),
        Commands::Volume(args) => commands::volume::run(args),
        Commands::UseCase(args) => commands::usecase::run(args),
    }
}
