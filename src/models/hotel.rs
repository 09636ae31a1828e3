use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use super::destination::Destination;
use super::document::{
    client_fields, merge_fields, parse_fields, to_fields, Problems, ValidationError,
};

pub const MIN_STARS: i64 = 1;
pub const MAX_STARS: i64 = 5;
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomType {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub facilities: Vec<String>,
}

impl RoomType {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            facilities: Vec::new(),
        }
    }

    pub fn with_facilities(mut self, facilities: Vec<String>) -> Self {
        self.facilities = facilities;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NearbyAttraction {
    pub name: String,
    pub distance: String,
}

impl NearbyAttraction {
    pub fn new(name: impl Into<String>, distance: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            distance: distance.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Photo {
    pub url: String,
}

impl Photo {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub address: String,
    pub stars: i64,
    pub rating: f64,
    pub price_from: f64,
    #[serde(default)]
    pub room_types: Vec<RoomType>,
    #[serde(default)]
    pub nearby_attractions: Vec<NearbyAttraction>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    pub destination_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Client-controlled hotel fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotelDraft {
    pub name: String,
    pub address: String,
    pub stars: i64,
    pub rating: f64,
    pub price_from: f64,
    #[serde(default)]
    pub room_types: Vec<RoomType>,
    #[serde(default)]
    pub nearby_attractions: Vec<NearbyAttraction>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    pub destination_id: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A hotel as returned to readers: the stored document plus the
/// destination it points at. `destination` is `None` for orphaned hotels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HotelView {
    #[serde(flatten)]
    pub hotel: Hotel,
    pub destination: Option<Destination>,
}

/// Derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotelSummary {
    pub id: String,
    pub name: String,
    pub average_room_price: f64,
    pub facilities: Vec<String>,
}

/// Removes keys that are not part of a hotel payload. `destination` shows
/// up when a client sends back a [`HotelView`] it fetched earlier.
fn hotel_fields(payload: Value) -> Result<Map<String, Value>, ValidationError> {
    let mut fields = client_fields(payload)?;
    fields.remove("destination");
    Ok(fields)
}

impl HotelDraft {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        stars: i64,
        rating: f64,
        price_from: f64,
        destination_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            stars,
            rating,
            price_from,
            room_types: Vec::new(),
            nearby_attractions: Vec::new(),
            photos: Vec::new(),
            destination_id: destination_id.into(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_room_types(mut self, room_types: Vec<RoomType>) -> Self {
        self.room_types = room_types;
        self
    }

    pub fn with_attractions(mut self, attractions: Vec<NearbyAttraction>) -> Self {
        self.nearby_attractions = attractions;
        self
    }

    pub fn with_photos(mut self, photos: Vec<Photo>) -> Self {
        self.photos = photos;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn from_payload(payload: Value) -> Result<Self, ValidationError> {
        parse_fields(hotel_fields(payload)?)
    }

    /// Trims text and checks ranges on stars, rating, prices and nested
    /// entries.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.trim().to_string();
        self.address = self.address.trim().to_string();
        self.destination_id = self.destination_id.trim().to_string();

        let mut problems = Problems::default();
        problems.require_text("name", &self.name);
        problems.require_text("address", &self.address);
        problems.require_text("destinationId", &self.destination_id);

        if !(MIN_STARS..=MAX_STARS).contains(&self.stars) {
            problems.push("stars", "must be between 1 and 5");
        }
        if !(self.rating.is_finite() && (0.0..=MAX_RATING).contains(&self.rating)) {
            problems.push("rating", "must be between 0 and 5");
        }
        if !(self.price_from.is_finite() && self.price_from >= 0.0) {
            problems.push("priceFrom", "must not be negative");
        }

        for (i, room) in self.room_types.iter_mut().enumerate() {
            room.name = room.name.trim().to_string();
            for facility in room.facilities.iter_mut() {
                *facility = facility.trim().to_string();
            }
            problems.require_text(&format!("roomTypes[{i}].name"), &room.name);
            if !(room.price.is_finite() && room.price >= 0.0) {
                problems.push(&format!("roomTypes[{i}].price"), "must not be negative");
            }
        }
        for (i, attraction) in self.nearby_attractions.iter_mut().enumerate() {
            attraction.name = attraction.name.trim().to_string();
            attraction.distance = attraction.distance.trim().to_string();
            problems.require_text(&format!("nearbyAttractions[{i}].name"), &attraction.name);
            problems.require_text(
                &format!("nearbyAttractions[{i}].distance"),
                &attraction.distance,
            );
        }
        for (i, photo) in self.photos.iter_mut().enumerate() {
            photo.url = photo.url.trim().to_string();
            problems.require_text(&format!("photos[{i}].url"), &photo.url);
        }

        problems.into_result()?;
        Ok(self)
    }
}

impl Hotel {
    /// Builds a new document with a fresh id from an already validated draft.
    pub fn new(draft: HotelDraft) -> Self {
        let now = Utc::now();
        Self::from_draft(Uuid::new_v4().to_string(), draft, now, now)
    }

    fn from_draft(
        id: String,
        draft: HotelDraft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: draft.name,
            address: draft.address,
            stars: draft.stars,
            rating: draft.rating,
            price_from: draft.price_from,
            room_types: draft.room_types,
            nearby_attractions: draft.nearby_attractions,
            photos: draft.photos,
            destination_id: draft.destination_id,
            created_at,
            updated_at,
            extra: draft.extra,
        }
    }

    pub fn draft(&self) -> HotelDraft {
        HotelDraft {
            name: self.name.clone(),
            address: self.address.clone(),
            stars: self.stars,
            rating: self.rating,
            price_from: self.price_from,
            room_types: self.room_types.clone(),
            nearby_attractions: self.nearby_attractions.clone(),
            photos: self.photos.clone(),
            destination_id: self.destination_id.clone(),
            extra: self.extra.clone(),
        }
    }

    /// Applies `patch` on top of this hotel and validates the result.
    ///
    /// The second value is true when the patch names a `destinationId`,
    /// meaning the reference has to be checked again before writing.
    pub fn patched(&self, patch: Value) -> Result<(Self, bool), ValidationError> {
        let patch = hotel_fields(patch)?;
        let touches_destination = patch.contains_key("destinationId");
        let draft: HotelDraft = parse_fields(merge_fields(to_fields(&self.draft()), patch))?;
        let draft = draft.validate()?;

        let hotel = Self::from_draft(self.id.clone(), draft, self.created_at, Utc::now());
        Ok((hotel, touches_destination))
    }

    /// Mean room price, falling back to `price_from` when no room types are
    /// listed.
    pub fn average_room_price(&self) -> f64 {
        if self.room_types.is_empty() {
            return self.price_from;
        }
        let total: f64 = self.room_types.iter().map(|room| room.price).sum();
        total / self.room_types.len() as f64
    }

    /// Every facility offered by any room type, each listed once.
    pub fn facilities(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for facility in self.room_types.iter().flat_map(|room| &room.facilities) {
            if !seen.contains(facility) {
                seen.push(facility.clone());
            }
        }
        seen
    }

    pub fn summary(&self) -> HotelSummary {
        HotelSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            average_room_price: self.average_room_price(),
            facilities: self.facilities(),
        }
    }
}

impl fmt::Display for Hotel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.name, "*".repeat(self.stars.max(0) as usize))?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Address: {}", self.address)?;
        writeln!(f, "Rating: {:.1}/5", self.rating)?;
        writeln!(f, "From: {:.2}", self.price_from)?;

        if !self.room_types.is_empty() {
            writeln!(f, "\nRooms:")?;
            for room in &self.room_types {
                if room.facilities.is_empty() {
                    writeln!(f, "  - {} ({:.2})", room.name, room.price)?;
                } else {
                    writeln!(
                        f,
                        "  - {} ({:.2}): {}",
                        room.name,
                        room.price,
                        room.facilities.join(", ")
                    )?;
                }
            }
        }

        if !self.nearby_attractions.is_empty() {
            writeln!(f, "\nNearby:")?;
            for attraction in &self.nearby_attractions {
                writeln!(f, "  - {} ({})", attraction.name, attraction.distance)?;
            }
        }

        if !self.photos.is_empty() {
            writeln!(f, "\nPhotos:")?;
            for photo in &self.photos {
                writeln!(f, "  - {}", photo.url)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for HotelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hotel)?;
        match &self.destination {
            Some(destination) => {
                writeln!(f, "\nDestination: {}, {}", destination.name, destination.country)
            }
            None => writeln!(
                f,
                "\nDestination: {} (missing)",
                self.hotel.destination_id
            ),
        }
    }
}
