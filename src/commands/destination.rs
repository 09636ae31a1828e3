use clap::{Args, Subcommand};
use serde_json::{json, Value};

use super::{confirm, fields_map, parse_field, truncate, OutputFormat};
use crate::client::ApiClient;
use crate::models::{Coordinates, Destination, DestinationDraft};

#[derive(Args)]
pub struct DestinationCommand {
    #[command(subcommand)]
    pub command: DestinationSubcommand,
}

#[derive(Subcommand)]
pub enum DestinationSubcommand {
    /// Create a new destination
    Add {
        /// Name of the destination
        name: String,

        /// Country
        #[arg(long)]
        country: String,

        /// Description
        #[arg(long)]
        description: String,

        /// Latitude
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Extra field as key=value (can be repeated)
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },

    /// List destinations
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only destinations whose country contains this text
        #[arg(long)]
        country: Option<String>,
    },

    /// Show a destination's details
    Show {
        /// Destination ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update an existing destination
    Update {
        /// Destination ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New country
        #[arg(long)]
        country: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New latitude (requires --lon)
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,

        /// New longitude (requires --lat)
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,

        /// Set a field as key=value (can be repeated)
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },

    /// Delete a destination
    Delete {
        /// Destination ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl DestinationCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            DestinationSubcommand::Add {
                name,
                country,
                description,
                lat,
                lon,
                fields,
            } => {
                let mut draft =
                    DestinationDraft::new(name, country, description, Coordinates::new(*lat, *lon));
                for (key, value) in fields {
                    draft = draft.with_field(key.clone(), value.clone());
                }

                let created = client.create_destination(&draft).await?;
                println!("Created destination:");
                println!("{}", created);
                Ok(())
            }

            DestinationSubcommand::List { format, country } => {
                let destinations = match country {
                    Some(country) => client.destinations_by_country(country).await?,
                    None => client.list_destinations().await?,
                };

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&destinations)?);
                    }
                    OutputFormat::Text => print_table(&destinations),
                }
                Ok(())
            }

            DestinationSubcommand::Show { id, format } => {
                let destination = client.get_destination(id).await?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&destination)?);
                    }
                    OutputFormat::Text => println!("{}", destination),
                }
                Ok(())
            }

            DestinationSubcommand::Update {
                id,
                name,
                country,
                description,
                lat,
                lon,
                fields,
            } => {
                let mut patch = fields_map(fields);
                if let Some(name) = name {
                    patch.insert("name".into(), json!(name));
                }
                if let Some(country) = country {
                    patch.insert("country".into(), json!(country));
                }
                if let Some(description) = description {
                    patch.insert("description".into(), json!(description));
                }
                if let (Some(lat), Some(lon)) = (lat, lon) {
                    patch.insert("coordinates".into(), json!({ "lat": lat, "lon": lon }));
                }

                if patch.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let updated = client.update_destination(id, &Value::Object(patch)).await?;
                println!("Updated destination:");
                println!("{}", updated);
                Ok(())
            }

            DestinationSubcommand::Delete { id, force } => {
                let destination = client.get_destination(id).await?;

                if !force
                    && !confirm(&format!(
                        "Delete destination '{}'? Its hotels are kept.",
                        destination.name
                    ))?
                {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                client.delete_destination(id).await?;
                println!("Deleted destination: {}", destination.name);
                Ok(())
            }
        }
    }
}

fn print_table(destinations: &[Destination]) {
    if destinations.is_empty() {
        println!("No destinations found");
        return;
    }

    println!("{:<36}  {:<24}  COUNTRY", "ID", "NAME");
    println!("{}", "-".repeat(80));
    for destination in destinations {
        println!(
            "{:<36}  {:<24}  {}",
            destination.id,
            truncate(&destination.name, 24),
            destination.country
        );
    }
    println!("\nTotal: {} destination(s)", destinations.len());
}
