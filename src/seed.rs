//! Sample catalogue: five destinations with one hotel each.

use crate::db::{DestinationRepository, HotelRepository, StoreError};
use crate::models::{
    Coordinates, Destination, DestinationDraft, HotelDraft, HotelView, NearbyAttraction, Photo,
    RoomType,
};

/// What [`seed`] inserted.
#[derive(Debug)]
pub struct SeedReport {
    pub destinations: Vec<Destination>,
    pub hotels: Vec<HotelView>,
}

/// Counts removed by [`clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearReport {
    pub destinations: u64,
    pub hotels: u64,
}

pub fn sample_destinations() -> Vec<DestinationDraft> {
    vec![
        DestinationDraft::new(
            "Paris",
            "France",
            "The capital city of France, known for art, fashion, and the Eiffel Tower.",
            Coordinates::new(48.8566, 2.3522),
        ),
        DestinationDraft::new(
            "Tokyo",
            "Japan",
            "A bustling metropolis that seamlessly blends the ultramodern with the traditional.",
            Coordinates::new(35.6762, 139.6503),
        ),
        DestinationDraft::new(
            "New York",
            "USA",
            "The Big Apple, a global center for finance, culture, and entertainment.",
            Coordinates::new(40.7128, -74.0060),
        ),
        DestinationDraft::new(
            "Dubai",
            "UAE",
            "A futuristic city known for its luxury shopping, ultramodern architecture, and vibrant nightlife.",
            Coordinates::new(25.2048, 55.2708),
        ),
        DestinationDraft::new(
            "Sydney",
            "Australia",
            "A vibrant coastal city known for its stunning harbor, iconic Opera House, and beautiful beaches.",
            Coordinates::new(-33.8688, 151.2093),
        ),
    ]
}

fn room(name: &str, price: f64, facilities: &[&str]) -> RoomType {
    RoomType::new(name, price).with_facilities(facilities.iter().map(|f| f.to_string()).collect())
}

fn photo(id: &str) -> Vec<Photo> {
    vec![Photo::new(format!(
        "https://images.unsplash.com/photo-{id}?w=800"
    ))]
}

/// Sample hotels. The n-th hotel belongs to the n-th id in `destination_ids`;
/// hotels without a matching id are left out.
pub fn sample_hotels(destination_ids: &[String]) -> Vec<HotelDraft> {
    let hotels = [
        HotelDraft::new(
            "Hotel de Lumière",
            "123 Champs-Élysées, Paris, France",
            5,
            4.7,
            200.0,
            "",
        )
        .with_room_types(vec![
            room("Deluxe Room", 250.0, &["Free Wi-Fi", "King Bed", "AC", "Balcony"]),
            room("Suite", 400.0, &["Free Wi-Fi", "Living Area", "Mini Bar", "Jacuzzi"]),
        ])
        .with_attractions(vec![
            NearbyAttraction::new("Eiffel Tower", "2.1 km"),
            NearbyAttraction::new("Louvre Museum", "1.5 km"),
        ])
        .with_photos(photo("1566073771259-6a8506099945")),
        HotelDraft::new(
            "Tokyo Grand Hotel",
            "456 Shibuya Crossing, Tokyo, Japan",
            4,
            4.5,
            150.0,
            "",
        )
        .with_room_types(vec![
            room("Standard Room", 150.0, &["Free Wi-Fi", "Queen Bed", "AC", "City View"]),
            room(
                "Executive Room",
                280.0,
                &["Free Wi-Fi", "King Bed", "AC", "Balcony", "Mini Bar"],
            ),
        ])
        .with_attractions(vec![
            NearbyAttraction::new("Shibuya Crossing", "0.1 km"),
            NearbyAttraction::new("Tokyo Tower", "3.2 km"),
        ])
        .with_photos(photo("1542314831-068cd1dbfeeb")),
        HotelDraft::new(
            "Manhattan Luxury Hotel",
            "789 5th Avenue, New York, USA",
            5,
            4.8,
            300.0,
            "",
        )
        .with_room_types(vec![
            room(
                "Deluxe Suite",
                350.0,
                &["Free Wi-Fi", "King Bed", "AC", "Central Park View"],
            ),
            room(
                "Presidential Suite",
                800.0,
                &["Free Wi-Fi", "Multiple Bedrooms", "AC", "Terrace", "Butler Service"],
            ),
        ])
        .with_attractions(vec![
            NearbyAttraction::new("Central Park", "0.5 km"),
            NearbyAttraction::new("Times Square", "1.2 km"),
        ])
        .with_photos(photo("1571896349842-33c89424de2d")),
        HotelDraft::new(
            "Burj Al Arab View Hotel",
            "321 Sheikh Zayed Road, Dubai, UAE",
            5,
            4.9,
            400.0,
            "",
        )
        .with_room_types(vec![
            room(
                "Ocean View Room",
                450.0,
                &["Free Wi-Fi", "King Bed", "AC", "Ocean View", "Private Pool"],
            ),
            room(
                "Royal Suite",
                1200.0,
                &[
                    "Free Wi-Fi",
                    "Multiple Bedrooms",
                    "AC",
                    "Private Beach",
                    "Helicopter Service",
                ],
            ),
        ])
        .with_attractions(vec![
            NearbyAttraction::new("Burj Khalifa", "2.0 km"),
            NearbyAttraction::new("Dubai Mall", "1.8 km"),
        ])
        .with_photos(photo("1578662996442-48f60103fc96")),
        HotelDraft::new(
            "Harbor View Hotel",
            "654 Circular Quay, Sydney, Australia",
            4,
            4.6,
            180.0,
            "",
        )
        .with_room_types(vec![
            room(
                "Harbor View Room",
                200.0,
                &["Free Wi-Fi", "Queen Bed", "AC", "Harbor View"],
            ),
            room(
                "Executive Suite",
                350.0,
                &["Free Wi-Fi", "King Bed", "AC", "Balcony", "Opera House View"],
            ),
        ])
        .with_attractions(vec![
            NearbyAttraction::new("Sydney Opera House", "0.3 km"),
            NearbyAttraction::new("Sydney Harbour Bridge", "0.8 km"),
        ])
        .with_photos(photo("1520250497591-112f2f40a3f4")),
    ];

    hotels
        .into_iter()
        .zip(destination_ids)
        .map(|(mut hotel, id)| {
            hotel.destination_id = id.clone();
            hotel
        })
        .collect()
}

/// Removes every hotel and destination.
pub async fn clear(
    destinations: &DestinationRepository,
    hotels: &HotelRepository,
) -> Result<ClearReport, StoreError> {
    let hotels = hotels.clear().await?;
    let destinations = destinations.clear().await?;
    tracing::info!(hotels, destinations, "Cleared catalogue");
    Ok(ClearReport {
        destinations,
        hotels,
    })
}

/// Inserts the sample catalogue next to whatever is already stored.
pub async fn seed(
    destinations: &DestinationRepository,
    hotels: &HotelRepository,
) -> Result<SeedReport, StoreError> {
    let mut created_destinations = Vec::new();
    for draft in sample_destinations() {
        created_destinations.push(destinations.create(draft).await?);
    }

    let ids: Vec<String> = created_destinations.iter().map(|d| d.id.clone()).collect();
    let mut created_hotels = Vec::new();
    for draft in sample_hotels(&ids) {
        created_hotels.push(hotels.create(draft).await?);
    }

    tracing::info!(
        destinations = created_destinations.len(),
        hotels = created_hotels.len(),
        "Seeded catalogue"
    );
    Ok(SeedReport {
        destinations: created_destinations,
        hotels: created_hotels,
    })
}
