//! Stayfinder Admin CLI
//!
//! Maintenance tool that works on the server's database directly.
//!
//! # Usage
//!
//! ```bash
//! stayfinder-admin seed            # add the sample catalogue
//! stayfinder-admin seed --clear    # replace everything with it
//! stayfinder-admin clear --force
//! ```
//!
//! Uses the same configuration as the server (`STAYFINDER_DATABASE_PATH`,
//! `STAYFINDER_CONFIG`).

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

use stayfinder::config::Config;
use stayfinder::db::{init_db, DestinationRepository, HotelRepository};
use stayfinder::seed;

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "stayfinder-admin")]
#[command(version)]
#[command(about = "Stayfinder database administration tool")]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert the sample destinations and hotels
    Seed {
        /// Remove all existing data first
        #[arg(long)]
        clear: bool,
    },
    /// Remove all destinations and hotels
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

// ============================================================================
// Commands
// ============================================================================

async fn run_seed(
    destinations: &DestinationRepository,
    hotels: &HotelRepository,
    clear_first: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if clear_first {
        let cleared = seed::clear(destinations, hotels).await?;
        println!(
            "Cleared {} destination(s) and {} hotel(s)",
            cleared.destinations, cleared.hotels
        );
    }

    let report = seed::seed(destinations, hotels).await?;
    println!("Inserted {} destinations", report.destinations.len());
    println!("Inserted {} hotels", report.hotels.len());

    println!("\nSample data created:");
    for destination in &report.destinations {
        println!("  - {}, {}", destination.name, destination.country);
    }
    for view in &report.hotels {
        println!("  - {}", view.hotel.name);
    }
    Ok(())
}

async fn run_clear(
    destinations: &DestinationRepository,
    hotels: &HotelRepository,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !force {
        print!("Remove ALL destinations and hotels? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let cleared = seed::clear(destinations, hotels).await?;
    println!(
        "Removed {} destination(s) and {} hotel(s)",
        cleared.destinations, cleared.hotels
    );
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(cli.config)?;
    let pool = init_db(&config.database_path).await?;
    let destinations = DestinationRepository::new(pool.clone());
    let hotels = HotelRepository::new(pool);

    match cli.command {
        Commands::Seed { clear } => run_seed(&destinations, &hotels, clear).await,
        Commands::Clear { force } => run_clear(&destinations, &hotels, force).await,
    }
}
