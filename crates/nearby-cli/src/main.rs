mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nearby-cli")]
#[command(about = "Acquire, reverse-geocode, and inspect the last known location")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one acquisition cycle and persist the result.
    ///
    /// Without --lat/--lon the host has no position source and the cycle
    /// fails as unsupported.
    Locate {
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
        /// Start a new attempt even if one is already in flight.
        #[arg(long)]
        force_refresh: bool,
    },
    /// Print the restored location without any device or network call.
    Show,
    /// Reverse-geocode coordinates and print the address components.
    Geocode {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = nearby_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Locate {
            lat,
            lon,
            force_refresh,
        }) => commands::locate(&config, lat.zip(lon), force_refresh).await,
        Some(Commands::Show) => commands::show(&config),
        Some(Commands::Geocode { lat, lon }) => commands::geocode(&config, lat, lon).await,
        None => {
            println!("nearby-cli: try `locate`, `show`, or `geocode`");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
