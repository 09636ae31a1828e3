use clap::{Args, Subcommand};
use serde_json::{json, Value};

use super::{
    confirm, fields_map, parse_attraction, parse_field, parse_room, truncate, OutputFormat,
};
use crate::client::ApiClient;
use crate::db::HotelFilter;
use crate::models::{HotelDraft, HotelView, NearbyAttraction, Photo, RoomType};

#[derive(Args)]
pub struct HotelCommand {
    #[command(subcommand)]
    pub command: HotelSubcommand,
}

#[derive(Subcommand)]
pub enum HotelSubcommand {
    /// Create a new hotel
    Add {
        /// Name of the hotel
        name: String,

        /// Street address
        #[arg(long)]
        address: String,

        /// Star class (1-5)
        #[arg(long)]
        stars: i64,

        /// Guest rating (0-5)
        #[arg(long)]
        rating: f64,

        /// Lowest nightly price
        #[arg(long)]
        price_from: f64,

        /// ID of the destination the hotel belongs to
        #[arg(long)]
        destination: String,

        /// Room type as name:price[:facility,facility] (can be repeated)
        #[arg(long = "room", value_name = "ROOM", value_parser = parse_room)]
        rooms: Vec<RoomType>,

        /// Nearby attraction as name:distance (can be repeated)
        #[arg(long = "attraction", value_name = "ATTRACTION", value_parser = parse_attraction)]
        attractions: Vec<NearbyAttraction>,

        /// Photo URL (can be repeated)
        #[arg(long = "photo", value_name = "URL")]
        photos: Vec<String>,

        /// Extra field as key=value (can be repeated)
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },

    /// List hotels
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only hotels of this destination
        #[arg(long, conflicts_with = "stars")]
        destination: Option<String>,

        /// Only hotels with exactly this star class
        #[arg(long)]
        stars: Option<i64>,
    },

    /// Show a hotel's details
    Show {
        /// Hotel ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show average room price and facilities of a hotel
    Summary {
        /// Hotel ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List hotels whose starting price is within a range (inclusive)
    Price {
        min: f64,
        max: f64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Search hotels by any combination of criteria
    Filter {
        /// Destination ID
        #[arg(long)]
        destination: Option<String>,

        #[arg(long)]
        min_price: Option<f64>,

        #[arg(long)]
        max_price: Option<f64>,

        #[arg(long)]
        min_stars: Option<i64>,

        #[arg(long)]
        max_stars: Option<i64>,

        #[arg(long)]
        min_rating: Option<f64>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update an existing hotel
    Update {
        /// Hotel ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New address
        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        stars: Option<i64>,

        #[arg(long)]
        rating: Option<f64>,

        #[arg(long)]
        price_from: Option<f64>,

        /// Move the hotel to another destination
        #[arg(long)]
        destination: Option<String>,

        /// Replace room types; name:price[:facility,facility] (can be repeated)
        #[arg(long = "room", value_name = "ROOM", value_parser = parse_room)]
        rooms: Vec<RoomType>,

        /// Replace nearby attractions; name:distance (can be repeated)
        #[arg(long = "attraction", value_name = "ATTRACTION", value_parser = parse_attraction)]
        attractions: Vec<NearbyAttraction>,

        /// Replace photos (can be repeated)
        #[arg(long = "photo", value_name = "URL")]
        photos: Vec<String>,

        /// Set a field as key=value (can be repeated)
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },

    /// Delete a hotel
    Delete {
        /// Hotel ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl HotelCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            HotelSubcommand::Add {
                name,
                address,
                stars,
                rating,
                price_from,
                destination,
                rooms,
                attractions,
                photos,
                fields,
            } => {
                let mut draft =
                    HotelDraft::new(name, address, *stars, *rating, *price_from, destination)
                        .with_room_types(rooms.clone())
                        .with_attractions(attractions.clone())
                        .with_photos(photos.iter().map(Photo::new).collect());
                for (key, value) in fields {
                    draft = draft.with_field(key.clone(), value.clone());
                }

                let created = client.create_hotel(&draft).await?;
                println!("Created hotel:");
                println!("{}", created);
                Ok(())
            }

            HotelSubcommand::List {
                format,
                destination,
                stars,
            } => {
                let hotels = match (destination, stars) {
                    (Some(destination), _) => client.hotels_by_destination(destination).await?,
                    (None, Some(stars)) => client.hotels_by_stars(*stars).await?,
                    (None, None) => client.list_hotels().await?,
                };
                print_hotels(&hotels, format)
            }

            HotelSubcommand::Show { id, format } => {
                let hotel = client.get_hotel(id).await?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&hotel)?),
                    OutputFormat::Text => println!("{}", hotel),
                }
                Ok(())
            }

            HotelSubcommand::Summary { id, format } => {
                let summary = client.hotel_summary(id).await?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&summary)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", summary.name);
                        println!("Average room price: {:.2}", summary.average_room_price);
                        if summary.facilities.is_empty() {
                            println!("Facilities: none listed");
                        } else {
                            println!("Facilities: {}", summary.facilities.join(", "));
                        }
                    }
                }
                Ok(())
            }

            HotelSubcommand::Price { min, max, format } => {
                let hotels = client.hotels_by_price_range(*min, *max).await?;
                print_hotels(&hotels, format)
            }

            HotelSubcommand::Filter {
                destination,
                min_price,
                max_price,
                min_stars,
                max_stars,
                min_rating,
                format,
            } => {
                let filter = HotelFilter {
                    destination_id: destination.clone(),
                    price_min: *min_price,
                    price_max: *max_price,
                    stars_min: *min_stars,
                    stars_max: *max_stars,
                    rating_min: *min_rating,
                };
                let hotels = client.filter_hotels(&filter).await?;
                print_hotels(&hotels, format)
            }

            HotelSubcommand::Update {
                id,
                name,
                address,
                stars,
                rating,
                price_from,
                destination,
                rooms,
                attractions,
                photos,
                fields,
            } => {
                let mut patch = fields_map(fields);
                if let Some(name) = name {
                    patch.insert("name".into(), json!(name));
                }
                if let Some(address) = address {
                    patch.insert("address".into(), json!(address));
                }
                if let Some(stars) = stars {
                    patch.insert("stars".into(), json!(stars));
                }
                if let Some(rating) = rating {
                    patch.insert("rating".into(), json!(rating));
                }
                if let Some(price_from) = price_from {
                    patch.insert("priceFrom".into(), json!(price_from));
                }
                if let Some(destination) = destination {
                    patch.insert("destinationId".into(), json!(destination));
                }
                if !rooms.is_empty() {
                    patch.insert("roomTypes".into(), serde_json::to_value(rooms)?);
                }
                if !attractions.is_empty() {
                    patch.insert("nearbyAttractions".into(), serde_json::to_value(attractions)?);
                }
                if !photos.is_empty() {
                    let photos: Vec<Photo> = photos.iter().map(Photo::new).collect();
                    patch.insert("photos".into(), serde_json::to_value(photos)?);
                }

                if patch.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let updated = client.update_hotel(id, &Value::Object(patch)).await?;
                println!("Updated hotel:");
                println!("{}", updated);
                Ok(())
            }

            HotelSubcommand::Delete { id, force } => {
                let hotel = client.get_hotel(id).await?;

                if !force && !confirm(&format!("Delete hotel '{}'?", hotel.hotel.name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                client.delete_hotel(id).await?;
                println!("Deleted hotel: {}", hotel.hotel.name);
                Ok(())
            }
        }
    }
}

fn print_hotels(
    hotels: &[HotelView],
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(hotels)?);
        return Ok(());
    }

    if hotels.is_empty() {
        println!("No hotels found");
        return Ok(());
    }

    println!(
        "{:<36}  {:<28}  {:<5}  {:>9}  DESTINATION",
        "ID", "NAME", "STARS", "FROM"
    );
    println!("{}", "-".repeat(100));
    for view in hotels {
        let destination = view
            .destination
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_else(|| "(missing)".to_string());
        println!(
            "{:<36}  {:<28}  {:<5}  {:>9.2}  {}",
            view.hotel.id,
            truncate(&view.hotel.name, 28),
            "*".repeat(view.hotel.stars.max(0) as usize),
            view.hotel.price_from,
            destination
        );
    }
    println!("\nTotal: {} hotel(s)", hotels.len());
    Ok(())
}
