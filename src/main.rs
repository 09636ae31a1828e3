use clap::{Parser, Subcommand};
use std::path::PathBuf;

use stayfinder::client::ApiClient;
use stayfinder::commands::{self, DestinationCommand, HotelCommand};
use stayfinder::config::Config;

#[derive(Parser)]
#[command(name = "stayfinder")]
#[command(version)]
#[command(about = "Browse and manage destinations and hotels", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// API server URL (overrides config)
    #[arg(long, short, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage destinations
    Destination(DestinationCommand),

    /// Manage hotels
    Hotel(HotelCommand),

    /// Check that the server is reachable
    Health,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;
    let client = ApiClient::new(cli.server.unwrap_or(config.server_url));

    match cli.command {
        Some(Commands::Destination(cmd)) => cmd.run(&client).await?,
        Some(Commands::Hotel(cmd)) => cmd.run(&client).await?,
        Some(Commands::Health) => commands::health(&client).await?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
