//! Rocket Reserver - Main Entry Point
//!
//! Loads configuration, installs the process-wide network stack and runs
//! one command against the launch booking service.

mod commands;

use clap::Parser;
use rocket_application::Network;
use rocket_infrastructure::{ClientConfig, build_network};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = Cli::parse().into_command();
    let config = ClientConfig::load()?;

    tracing::info!("Starting Rocket Reserver v{}", env!("CARGO_PKG_VERSION"));

    let network = Network::install(build_network(&config)?)
        .map_err(|_| "a network stack is already installed")?;

    command.run(network).await?;
    Ok(())
}
