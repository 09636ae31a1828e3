mod destination;
mod document;
mod hotel;

pub use destination::{Coordinates, Destination, DestinationDraft};
pub use document::ValidationError;
pub use hotel::{
    Hotel, HotelDraft, HotelSummary, HotelView, NearbyAttraction, Photo, RoomType, MAX_STARS,
    MIN_STARS,
};
