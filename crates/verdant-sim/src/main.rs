//! Verdant headless garden simulation.
//!
//! Usage: `verdant [config.toml] [hours]`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use verdant_garden::{GardenConfig, PlantCatalog};

mod sim;

use sim::Simulation;

/// Configuration file used when none is given.
const DEFAULT_CONFIG: &str = "verdant.toml";
/// In-game hours simulated when none are given.
const DEFAULT_HOURS: u32 = 48;

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("verdant=info".parse()?))
        .init();

    info!("Verdant starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    let hours = match args.next() {
        Some(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("invalid hour count: {raw}"))?,
        None => DEFAULT_HOURS,
    };

    let config = GardenConfig::load_from(&config_path);
    let catalog = match &config.catalog_path {
        Some(path) => {
            let (catalog, _warnings) = PlantCatalog::load_from_file(path)
                .with_context(|| format!("loading plant catalog {}", path.display()))?;
            catalog
        },
        None => PlantCatalog::with_defaults(),
    };
    anyhow::ensure!(!catalog.is_empty(), "plant catalog is empty");

    let mut simulation = Simulation::new(config, Arc::new(catalog));
    let report = simulation.run(hours)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    info!("Verdant shutdown complete");
    Ok(())
}
