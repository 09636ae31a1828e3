//! HTTP API for destinations and hotels.
//!
//! Every route is served both at the root and under `/api`.
//!
//! # Endpoints
//!
//! - `GET /health`: liveness check
//! - `GET|POST /destinations`, `GET|PUT|DELETE /destinations/{id}`
//! - `GET /destinations/country/{country}`: case-insensitive substring match
//! - `GET|POST /hotels`, `GET|PUT|DELETE /hotels/{id}`
//! - `GET /hotels/{id}/summary`: average room price and facility list
//! - `GET /hotels/destination/{destination_id}`
//! - `GET /hotels/price/{min}/{max}`: inclusive range on `priceFrom`
//! - `GET /hotels/stars/{stars}`: exact match, 1 to 5
//! - `GET /hotels/search/filter`: `destinationId`, `minPrice`, `maxPrice`,
//!   `minStars`, `maxStars`, `minRating`

mod destinations;
pub mod error;
mod extract;
mod hotels;

pub use error::{AppError, ErrorBody};

use axum::{
    extract::{DefaultBodyLimit, OriginalUri},
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::db::{DestinationRepository, HotelRepository};

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub destinations: DestinationRepository,
    pub hotels: HotelRepository,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            destinations: DestinationRepository::new(pool.clone()),
            hotels: HotelRepository::new(pool),
        }
    }
}

/// Body of successful deletes.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub timestamp: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Hotel & Destination API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Hotel & Destination API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "destinations": "/api/destinations",
            "hotels": "/api/hotels",
            "health": "/api/health"
        }
    }))
}

async fn route_not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound {
        kind: "route",
        id: uri.path().to_string(),
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/destinations",
            get(destinations::list_destinations).post(destinations::create_destination),
        )
        .route(
            "/destinations/{id}",
            get(destinations::get_destination)
                .put(destinations::update_destination)
                .delete(destinations::delete_destination),
        )
        .route(
            "/destinations/country/{country}",
            get(destinations::destinations_by_country),
        )
        .route(
            "/hotels",
            get(hotels::list_hotels).post(hotels::create_hotel),
        )
        .route(
            "/hotels/{id}",
            get(hotels::get_hotel)
                .put(hotels::update_hotel)
                .delete(hotels::delete_hotel),
        )
        .route("/hotels/{id}/summary", get(hotels::hotel_summary))
        .route(
            "/hotels/destination/{destination_id}",
            get(hotels::hotels_by_destination),
        )
        .route(
            "/hotels/price/{min}/{max}",
            get(hotels::hotels_by_price_range),
        )
        .route("/hotels/stars/{stars}", get(hotels::hotels_by_stars))
        .route("/hotels/search/filter", get(hotels::filter_hotels))
}

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Hardening headers added to every response unless a handler set them.
const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("referrer-policy", "no-referrer"),
    ("x-dns-prefetch-control", "off"),
    ("cross-origin-resource-policy", "same-origin"),
    ("x-permitted-cross-domain-policies", "none"),
];

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let api = api_routes();

    let mut app = Router::new()
        .route("/", get(root))
        .merge(api.clone())
        .nest("/api", api)
        .fallback(route_not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    for &(name, value) in SECURITY_HEADERS {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ));
    }

    app.layer(TraceLayer::new_for_http())
}

/// CORS policy for browser clients served from `origins`.
///
/// A `*` entry allows any origin; credentials are then not allowed, since
/// browsers refuse that combination. Origins that are not valid header
/// values are skipped with a warning.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|origin| origin.trim() == "*") {
        if origins.len() > 1 {
            tracing::warn!("CORS origin '*' given; other origins are redundant");
        }
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {:?}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(origins).allow_credentials(true)
}
